// Calendar contract suite

use chrono::{Duration, Utc};

use super::{login, unique_name, Runner, SuiteReport, VerifyOptions};
use crate::api::calendar::CalendarQuery;
use crate::api::tasks::NewTask;
use crate::api::ApiClient;

pub async fn run(api: &ApiClient, opts: &VerifyOptions) -> SuiteReport {
    let mut run = Runner::new("calendar");

    if !login(&mut run, api, opts).await {
        return run.finish();
    }

    let group = run
        .step(
            "create task group",
            true,
            api.create_task_group(&unique_name("verify-calendar")),
        )
        .await;
    let Some(group) = group else {
        return run.finish();
    };

    let due = Utc::now() + Duration::days(1);
    let new_task = NewTask {
        due_date: Some(due),
        ..NewTask::new(unique_name("verify-calendar-task"), group.id.clone())
    };
    let task = run
        .step(
            "create calendar task",
            true,
            api.create_calendar_task(&new_task),
        )
        .await;

    if let Some(task) = &task {
        let window = CalendarQuery::range(
            Utc::now().date_naive(),
            (Utc::now() + Duration::days(2)).date_naive(),
        );
        if let Some(tasks) = run
            .step("query tasks in window", false, api.calendar_tasks(&window))
            .await
        {
            run.check(
                "created task appears in the window",
                tasks.iter().any(|t| t.id == task.id),
                "created task missing from the date-range query",
            );
        } else {
            run.skip("created task appears in the window");
        }

        let renamed = NewTask {
            due_date: Some(due),
            ..NewTask::new(unique_name("verify-calendar-renamed"), group.id.clone())
        };
        let _ = run
            .step(
                "update calendar task",
                false,
                api.update_calendar_task(&task.id, &renamed),
            )
            .await;

        let _ = run
            .step(
                "delete calendar task",
                false,
                api.delete_calendar_task(&task.id),
            )
            .await;
    }

    let _ = run
        .step(
            "delete task group",
            false,
            api.delete_task_group(&group.id, true),
        )
        .await;

    run.finish()
}
