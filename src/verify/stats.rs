// Statistics contract suite

use chrono::Utc;

use super::{login, Runner, SuiteReport, VerifyOptions};
use crate::api::stats::{ReportType, TimeRange};
use crate::api::{ApiClient, ApiError};

pub async fn run(api: &ApiClient, opts: &VerifyOptions) -> SuiteReport {
    let mut run = Runner::new("stats");

    if !login(&mut run, api, opts).await {
        return run.finish();
    }

    let _ = run
        .step("today summary", false, api.today_summary(None))
        .await;

    if let Some(trends) = run
        .step("weekly trends", false, api.trends(TimeRange::Week, None))
        .await
    {
        run.check(
            "trends carry three datasets",
            trends.datasets.len() == 3,
            &format!("expected 3 datasets, got {}", trends.datasets.len()),
        );
    } else {
        run.skip("trends carry three datasets");
    }

    let month = Utc::now().format("%Y-%m").to_string();
    let _ = run
        .step("monthly summary", false, api.monthly_summary(&month))
        .await;

    run.expect_failure(
        "export answers 501",
        api.export_report(ReportType::Pdf, "last_month"),
        |e| matches!(e, ApiError::NotImplemented(_)),
    )
    .await;

    run.expect_failure(
        "invalid date rejected",
        api.stats_raw("today-summary", &[("date", "invalid-date")]),
        |e| matches!(e, ApiError::Http { status, .. } if (400..=599).contains(status)),
    )
    .await;

    run.expect_failure(
        "invalid time range rejected",
        api.stats_raw("trends", &[("timeRange", "invalid")]),
        |e| matches!(e, ApiError::Http { status, .. } if (400..=599).contains(status)),
    )
    .await;

    run.finish()
}
