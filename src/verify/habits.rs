// Habit contract suite

use super::{login, unique_name, Runner, SuiteReport, VerifyOptions};
use crate::api::habits::NewHabit;
use crate::api::ApiClient;

pub async fn run(api: &ApiClient, opts: &VerifyOptions) -> SuiteReport {
    let mut run = Runner::new("habits");

    if !login(&mut run, api, opts).await {
        return run.finish();
    }

    let new_habit = NewHabit {
        tags: vec!["health".to_string()],
        frequency: Some("daily".to_string()),
        ..NewHabit::new(unique_name("verify-habit"))
    };
    let habit = run
        .step("create habit", true, api.create_habit(&new_habit))
        .await;

    let Some(habit) = habit else {
        return run.finish();
    };
    let baseline = habit.completion_count;

    if let Some(completed) = run
        .step("complete habit", true, api.complete_habit(&habit.id))
        .await
    {
        run.check(
            "completion count incremented by one",
            completed.completion_count == baseline + 1,
            &format!(
                "expected {}, got {}",
                baseline + 1,
                completed.completion_count
            ),
        );
        run.check(
            "completedToday set",
            completed.completed_today,
            "completedToday is still false",
        );
    }

    if let Some(reverted) = run
        .step("uncomplete habit", true, api.uncomplete_habit(&habit.id))
        .await
    {
        run.check(
            "completion count restored",
            reverted.completion_count == baseline,
            &format!("expected {}, got {}", baseline, reverted.completion_count),
        );
        run.check(
            "completedToday cleared",
            !reverted.completed_today,
            "completedToday is still true",
        );
    }

    let _ = run
        .step("fetch habit tags", false, api.habit_tags())
        .await;

    let _ = run
        .step("delete habit", false, api.delete_habit(&habit.id))
        .await;

    run.finish()
}
