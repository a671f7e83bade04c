// Task, task-group, and pomodoro endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiResult};

/// A task's group reference. The backend sometimes returns the bare id and
/// sometimes the populated group object; both collapse to the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GroupRefWire")]
pub struct GroupRef(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum GroupRefWire {
    Id(String),
    Object {
        #[serde(alias = "_id")]
        id: String,
    },
}

impl From<GroupRefWire> for GroupRef {
    fn from(wire: GroupRefWire) -> Self {
        match wire {
            GroupRefWire::Id(id) => GroupRef(id),
            GroupRefWire::Object { id } => GroupRef(id),
        }
    }
}

impl GroupRef {
    pub fn id(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub group_id: GroupRef,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_important: bool,
    #[serde(default)]
    pub is_urgent: bool,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub description: Option<String>,
    /// Estimated hours to complete.
    #[serde(default)]
    pub estimated_time: Option<f64>,
    #[serde(default)]
    pub suggested_start_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskGroup {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    /// Populated client-side when tasks are bucketed into groups.
    #[serde(default)]
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub name: String,
    pub group_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_important: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_urgent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_start_time: Option<DateTime<Utc>>,
}

impl NewTask {
    pub fn new(name: impl Into<String>, group_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group_id: group_id.into(),
            ..Default::default()
        }
    }
}

/// Tasks bucketed by the importance/urgency matrix.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskQuadrants {
    #[serde(default)]
    pub urgent_important: Vec<Task>,
    #[serde(default)]
    pub urgent_not_important: Vec<Task>,
    #[serde(default)]
    pub not_urgent_important: Vec<Task>,
    #[serde(default)]
    pub not_urgent_not_important: Vec<Task>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkImportResult {
    #[serde(default)]
    pub imported: u32,
    #[serde(default)]
    pub skipped: u32,
    #[serde(default)]
    pub conflicts: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSession {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub task_id: Option<GroupRef>,
    /// Duration in seconds.
    pub duration: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPomodoro {
    /// Duration in seconds.
    pub duration: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ApiClient {
    /* Task group endpoints */

    pub async fn task_groups(&self) -> ApiResult<Vec<TaskGroup>> {
        let token = self.bearer()?;
        self.send(self.http().get(self.url("/task-groups")).bearer_auth(token))
            .await
    }

    pub async fn create_task_group(&self, name: &str) -> ApiResult<TaskGroup> {
        tracing::debug!(%name, "Creating task group");
        let token = self.bearer()?;
        self.send(
            self.http()
                .post(self.url("/task-groups"))
                .bearer_auth(token)
                .json(&serde_json::json!({ "name": name })),
        )
        .await
    }

    pub async fn update_task_group(&self, group_id: &str, name: &str) -> ApiResult<TaskGroup> {
        let token = self.bearer()?;
        self.send(
            self.http()
                .put(self.url(&format!("/task-groups/{group_id}")))
                .bearer_auth(token)
                .json(&serde_json::json!({ "name": name })),
        )
        .await
    }

    /// Delete a group. `delete_related_tasks` asks the backend to cascade.
    pub async fn delete_task_group(
        &self,
        group_id: &str,
        delete_related_tasks: bool,
    ) -> ApiResult<()> {
        tracing::debug!(%group_id, delete_related_tasks, "Deleting task group");
        let token = self.bearer()?;
        self.send_unit(
            self.http()
                .delete(self.url(&format!("/task-groups/{group_id}")))
                .query(&[("deleteRelatedTasks", delete_related_tasks)])
                .bearer_auth(token),
        )
        .await
    }

    /* Task endpoints */

    pub async fn tasks(&self) -> ApiResult<Vec<Task>> {
        let token = self.bearer()?;
        self.send(self.http().get(self.url("/tasks")).bearer_auth(token))
            .await
    }

    pub async fn tasks_by_quadrants(&self) -> ApiResult<TaskQuadrants> {
        let token = self.bearer()?;
        self.send(
            self.http()
                .get(self.url("/tasks/quadrants"))
                .bearer_auth(token),
        )
        .await
    }

    pub async fn task(&self, task_id: &str) -> ApiResult<Task> {
        let token = self.bearer()?;
        self.send(
            self.http()
                .get(self.url(&format!("/tasks/{task_id}")))
                .bearer_auth(token),
        )
        .await
    }

    pub async fn create_task(&self, task: &NewTask) -> ApiResult<Task> {
        tracing::debug!(name = %task.name, group_id = %task.group_id, "Creating task");
        let token = self.bearer()?;
        self.send(
            self.http()
                .post(self.url("/tasks"))
                .bearer_auth(token)
                .json(task),
        )
        .await
    }

    pub async fn update_task(&self, task_id: &str, task: &NewTask) -> ApiResult<Task> {
        let token = self.bearer()?;
        self.send(
            self.http()
                .put(self.url(&format!("/tasks/{task_id}")))
                .bearer_auth(token)
                .json(task),
        )
        .await
    }

    /// Patch just the completion flag.
    pub async fn set_task_status(&self, task_id: &str, completed: bool) -> ApiResult<()> {
        tracing::debug!(%task_id, completed, "Updating task status");
        let token = self.bearer()?;
        self.send_unit(
            self.http()
                .patch(self.url(&format!("/tasks/{task_id}/status")))
                .bearer_auth(token)
                .json(&serde_json::json!({ "completed": completed })),
        )
        .await
    }

    pub async fn delete_task(&self, task_id: &str) -> ApiResult<()> {
        tracing::debug!(%task_id, "Deleting task");
        let token = self.bearer()?;
        self.send_unit(
            self.http()
                .delete(self.url(&format!("/tasks/{task_id}")))
                .bearer_auth(token),
        )
        .await
    }

    pub async fn bulk_import_tasks(
        &self,
        tasks: &[NewTask],
        force_import: bool,
    ) -> ApiResult<BulkImportResult> {
        tracing::debug!(count = tasks.len(), force_import, "Bulk importing tasks");
        let token = self.bearer()?;
        self.send(
            self.http()
                .post(self.url("/tasks/bulk-import"))
                .bearer_auth(token)
                .json(&serde_json::json!({ "tasks": tasks, "forceImport": force_import })),
        )
        .await
    }

    /* Pomodoro sub-resource */

    pub async fn log_pomodoro(
        &self,
        task_id: &str,
        pomodoro: &NewPomodoro,
    ) -> ApiResult<PomodoroSession> {
        tracing::debug!(%task_id, duration = pomodoro.duration, "Logging pomodoro");
        let token = self.bearer()?;
        self.send(
            self.http()
                .post(self.url(&format!("/tasks/{task_id}/pomodoro")))
                .bearer_auth(token)
                .json(pomodoro),
        )
        .await
    }

    pub async fn task_pomodoros(&self, task_id: &str) -> ApiResult<Vec<PomodoroSession>> {
        let token = self.bearer()?;
        self.send(
            self.http()
                .get(self.url(&format!("/tasks/{task_id}/pomodoro")))
                .bearer_auth(token),
        )
        .await
    }
}
