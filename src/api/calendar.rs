// Calendar endpoints
// The calendar view works on the same Task resource, keyed by date windows.

use chrono::NaiveDate;
use serde::Serialize;

use super::tasks::{NewTask, Task};
use super::{ApiClient, ApiResult};

/// Date filter for `GET /calendar/tasks`: either a single day or a range.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl CalendarQuery {
    pub fn day(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            start_date: None,
            end_date: None,
        }
    }

    pub fn range(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            date: None,
            start_date: Some(start),
            end_date: Some(end),
        }
    }
}

impl ApiClient {
    pub async fn calendar_tasks(&self, query: &CalendarQuery) -> ApiResult<Vec<Task>> {
        let token = self.bearer()?;
        self.send(
            self.http()
                .get(self.url("/calendar/tasks"))
                .query(query)
                .bearer_auth(token),
        )
        .await
    }

    pub async fn create_calendar_task(&self, task: &NewTask) -> ApiResult<Task> {
        tracing::debug!(name = %task.name, "Creating calendar task");
        let token = self.bearer()?;
        self.send(
            self.http()
                .post(self.url("/calendar/tasks"))
                .bearer_auth(token)
                .json(task),
        )
        .await
    }

    pub async fn calendar_task(&self, task_id: &str) -> ApiResult<Task> {
        let token = self.bearer()?;
        self.send(
            self.http()
                .get(self.url(&format!("/calendar/tasks/{task_id}")))
                .bearer_auth(token),
        )
        .await
    }

    pub async fn update_calendar_task(&self, task_id: &str, task: &NewTask) -> ApiResult<Task> {
        let token = self.bearer()?;
        self.send(
            self.http()
                .put(self.url(&format!("/calendar/tasks/{task_id}")))
                .bearer_auth(token)
                .json(task),
        )
        .await
    }

    pub async fn delete_calendar_task(&self, task_id: &str) -> ApiResult<()> {
        tracing::debug!(%task_id, "Deleting calendar task");
        let token = self.bearer()?;
        self.send_unit(
            self.http()
                .delete(self.url(&format!("/calendar/tasks/{task_id}")))
                .bearer_auth(token),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(query: &CalendarQuery) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(query).unwrap() {
            serde_json::Value::Object(map) => map,
            other => panic!("expected an object, got {other:?}"),
        }
    }

    #[test]
    fn day_query_serializes_single_param() {
        let query = CalendarQuery::day(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        let params = params(&query);
        assert_eq!(params.len(), 1);
        assert_eq!(params["date"], "2025-06-01");
    }

    #[test]
    fn range_query_serializes_window() {
        let query = CalendarQuery::range(
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 7).unwrap(),
        );
        let params = params(&query);
        assert_eq!(params.len(), 2);
        assert_eq!(params["startDate"], "2025-06-01");
        assert_eq!(params["endDate"], "2025-06-07");
    }
}
