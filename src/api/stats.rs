// Statistics endpoints

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::tasks::Task;
use super::{ApiClient, ApiResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Week,
    Month,
    Year,
}

impl TimeRange {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeRange::Week => "week",
            TimeRange::Month => "month",
            TimeRange::Year => "year",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ReportType {
    Pdf,
    Csv,
}

impl ReportType {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportType::Pdf => "pdf",
            ReportType::Csv => "csv",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodaySummary {
    pub completed_tasks: u32,
    pub habit_checkins: u32,
    /// Focused minutes accumulated over the day.
    pub focus_time: u32,
    #[serde(default)]
    pub total_tasks: Option<u32>,
    #[serde(default)]
    pub pomodoro_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct TrendDataset {
    pub label: String,
    pub data: Vec<f64>,
}

/// Chart-shaped trend payload: one label per bucket, one dataset each for
/// tasks, habits, and focus time.
#[derive(Debug, Deserialize)]
pub struct Trends {
    pub labels: Vec<String>,
    pub datasets: Vec<TrendDataset>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub labels: Vec<String>,
    pub actual_data: Vec<f64>,
    #[serde(default)]
    pub planned_data: Option<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitCheckin {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub checked_at: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusSession {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub task_name: Option<String>,
    /// Duration in seconds.
    pub duration: u32,
    #[serde(default)]
    pub start_time: Option<String>,
}

impl ApiClient {
    /// Summary for today, or for an explicit date.
    pub async fn today_summary(&self, date: Option<NaiveDate>) -> ApiResult<TodaySummary> {
        let token = self.bearer()?;
        let mut req = self
            .http()
            .get(self.url("/stats/today-summary"))
            .bearer_auth(token);
        if let Some(date) = date {
            req = req.query(&[("date", date.to_string())]);
        }
        self.send(req).await
    }

    pub async fn trends(
        &self,
        time_range: TimeRange,
        end_date: Option<NaiveDate>,
    ) -> ApiResult<Trends> {
        let token = self.bearer()?;
        let mut req = self
            .http()
            .get(self.url("/stats/trends"))
            .query(&[("timeRange", time_range.as_str())])
            .bearer_auth(token);
        if let Some(end) = end_date {
            req = req.query(&[("endDate", end.to_string())]);
        }
        self.send(req).await
    }

    /// `month` in `YYYY-MM` form.
    pub async fn monthly_summary(&self, month: &str) -> ApiResult<MonthlySummary> {
        let token = self.bearer()?;
        self.send(
            self.http()
                .get(self.url("/stats/monthly-summary"))
                .query(&[("month", month)])
                .bearer_auth(token),
        )
        .await
    }

    /// Report export. The backend intentionally answers 501, so the expected
    /// result today is `ApiError::NotImplemented`.
    pub async fn export_report(
        &self,
        report_type: ReportType,
        time_range: &str,
    ) -> ApiResult<serde_json::Value> {
        let token = self.bearer()?;
        self.send(
            self.http()
                .get(self.url("/stats/export"))
                .query(&[
                    ("reportType", report_type.as_str()),
                    ("timeRange", time_range),
                ])
                .bearer_auth(token),
        )
        .await
    }

    pub async fn completed_tasks(&self, date: NaiveDate) -> ApiResult<Vec<Task>> {
        let token = self.bearer()?;
        self.send(
            self.http()
                .get(self.url("/stats/completed-tasks"))
                .query(&[("date", date.to_string())])
                .bearer_auth(token),
        )
        .await
    }

    pub async fn habit_checkins(&self, date: NaiveDate) -> ApiResult<Vec<HabitCheckin>> {
        let token = self.bearer()?;
        self.send(
            self.http()
                .get(self.url("/stats/habit-checkins"))
                .query(&[("date", date.to_string())])
                .bearer_auth(token),
        )
        .await
    }

    pub async fn focus_sessions(&self, date: NaiveDate) -> ApiResult<Vec<FocusSession>> {
        let token = self.bearer()?;
        self.send(
            self.http()
                .get(self.url("/stats/focus-sessions"))
                .query(&[("date", date.to_string())])
                .bearer_auth(token),
        )
        .await
    }

    /// Raw GET under `/stats` with caller-supplied query pairs. The contract
    /// suites use this to assert that malformed parameters (e.g.
    /// `date=invalid-date`) fail with an error status instead of a 200.
    pub async fn stats_raw(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> ApiResult<serde_json::Value> {
        let token = self.bearer()?;
        self.send(
            self.http()
                .get(self.url(&format!("/stats/{endpoint}")))
                .query(query)
                .bearer_auth(token),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn today_summary_parses_required_fields() {
        let summary: TodaySummary = serde_json::from_str(
            r#"{"completedTasks":3,"habitCheckins":2,"focusTime":75,"pomodoroCount":3}"#,
        )
        .unwrap();
        assert_eq!(summary.completed_tasks, 3);
        assert_eq!(summary.focus_time, 75);
        assert_eq!(summary.pomodoro_count, Some(3));
        assert!(summary.total_tasks.is_none());
    }

    #[test]
    fn trends_parses_chart_shape() {
        let trends: Trends = serde_json::from_str(
            r#"{"labels":["Mon","Tue"],"datasets":[
                {"label":"tasks","data":[1.0,2.0]},
                {"label":"habits","data":[0.0,3.0]},
                {"label":"focus","data":[25.0,50.0]}]}"#,
        )
        .unwrap();
        assert_eq!(trends.labels.len(), 2);
        assert_eq!(trends.datasets.len(), 3);
    }

    #[test]
    fn time_range_is_lowercase_on_the_wire() {
        assert_eq!(TimeRange::Week.as_str(), "week");
        assert_eq!(TimeRange::Year.as_str(), "year");
    }
}
