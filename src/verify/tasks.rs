// Task / task-group / pomodoro contract suite

use chrono::{Duration, Utc};

use super::{login, unique_name, Runner, SuiteReport, VerifyOptions};
use crate::api::tasks::{NewPomodoro, NewTask, Priority};
use crate::api::ApiClient;

pub async fn run(api: &ApiClient, opts: &VerifyOptions) -> SuiteReport {
    let mut run = Runner::new("tasks");

    if !login(&mut run, api, opts).await {
        return run.finish();
    }

    let group_name = unique_name("verify-group");
    let group = run
        .step("create task group", true, api.create_task_group(&group_name))
        .await;

    let group_id = match &group {
        Some(group) => group.id.clone(),
        None => return run.finish(),
    };

    let new_task = NewTask {
        priority: Some(Priority::High),
        ..NewTask::new(unique_name("verify-task"), group_id.clone())
    };
    let task = run.step("create task", true, api.create_task(&new_task)).await;

    if let Some(task) = &task {
        run.check(
            "task references its group",
            task.group_id.id() == group_id,
            &format!("expected group {group_id}, got {}", task.group_id.id()),
        );
    }

    let task_id = task.as_ref().map(|t| t.id.clone());

    if let Some(task_id) = &task_id {
        let _ = run
            .step("fetch task by id", false, api.task(task_id))
            .await;

        let _ = run
            .step(
                "mark task completed",
                false,
                api.set_task_status(task_id, true),
            )
            .await;

        let now = Utc::now();
        let pomodoro = NewPomodoro {
            duration: 1500,
            start_time: now,
            end_time: now + Duration::seconds(1500),
            notes: None,
        };
        let _ = run
            .step("log pomodoro", false, api.log_pomodoro(task_id, &pomodoro))
            .await;

        if let Some(sessions) = run
            .step("list pomodoros", false, api.task_pomodoros(task_id))
            .await
        {
            run.check(
                "pomodoro was recorded",
                !sessions.is_empty(),
                "no pomodoro sessions returned",
            );
        } else {
            run.skip("pomodoro was recorded");
        }
    } else {
        for name in [
            "fetch task by id",
            "mark task completed",
            "log pomodoro",
            "list pomodoros",
            "pomodoro was recorded",
        ] {
            run.skip(name);
        }
    }

    let _ = run
        .step("fetch quadrants", false, api.tasks_by_quadrants())
        .await;

    // Teardown: cascade the group delete, then confirm nothing references it.
    let _ = run
        .step(
            "delete group with related tasks",
            false,
            api.delete_task_group(&group_id, true),
        )
        .await;

    if let Some(tasks) = run.step("list remaining tasks", false, api.tasks()).await {
        run.check(
            "no tasks reference the deleted group",
            tasks.iter().all(|t| t.group_id.id() != group_id),
            "orphaned tasks still reference the deleted group",
        );
    } else {
        run.skip("no tasks reference the deleted group");
    }

    run.finish()
}
