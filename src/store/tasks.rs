// Task store
// Caches task groups with their tasks and mirrors mutations locally by id.

use futures::future::join_all;

use super::ActionResult;
use crate::api::tasks::{NewTask, Task, TaskGroup};
use crate::api::ApiClient;

/// A task annotated with its group for flattened listings.
#[derive(Debug, Clone)]
pub struct FlatTask {
    pub task: Task,
    pub group_id: String,
    pub group_name: String,
}

#[derive(Debug, Default)]
pub struct TasksStore {
    groups: Vec<TaskGroup>,
    last_error: Option<String>,
}

impl TasksStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups(&self) -> &[TaskGroup] {
        &self.groups
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Every task across all groups, annotated with its group.
    pub fn flat_tasks(&self) -> Vec<FlatTask> {
        self.groups
            .iter()
            .flat_map(|group| {
                group.tasks.iter().map(|task| FlatTask {
                    task: task.clone(),
                    group_id: group.id.clone(),
                    group_name: group.name.clone(),
                })
            })
            .collect()
    }

    /// Replace the cached groups with the server's list.
    pub async fn fetch_groups(&mut self, api: &ApiClient) -> ActionResult {
        match api.task_groups().await {
            Ok(groups) => {
                self.groups = groups;
                self.ok()
            }
            Err(e) => self.record_error("Failed to fetch task groups", e),
        }
    }

    /// Fetch groups and tasks, then bucket tasks into their groups.
    pub async fn fetch_tasks(&mut self, api: &ApiClient) -> ActionResult {
        let groups = match api.task_groups().await {
            Ok(groups) => groups,
            Err(e) => return self.record_error("Failed to fetch task groups", e),
        };
        let tasks = match api.tasks().await {
            Ok(tasks) => tasks,
            Err(e) => return self.record_error("Failed to fetch tasks", e),
        };

        self.groups = bucket_tasks(groups, tasks);
        self.ok()
    }

    pub async fn add_group(&mut self, api: &ApiClient, name: &str) -> ActionResult {
        if name.trim().is_empty() {
            return ActionResult::fail("Group name cannot be empty");
        }

        match api.create_task_group(name).await {
            Ok(group) => {
                self.groups.push(group);
                self.ok()
            }
            Err(e) => self.record_error("Failed to create group", e),
        }
    }

    pub async fn rename_group(
        &mut self,
        api: &ApiClient,
        group_id: &str,
        name: &str,
    ) -> ActionResult {
        match api.update_task_group(group_id, name).await {
            Ok(updated) => {
                if let Some(group) = self.groups.iter_mut().find(|g| g.id == group_id) {
                    group.name = updated.name;
                }
                self.ok()
            }
            Err(e) => self.record_error("Failed to update group", e),
        }
    }

    /// Delete a group. With `cascade`, every cached task in the group is
    /// deleted first, all requests in flight at once; individual failures are
    /// logged and do not abort the batch (orphans on the server are accepted).
    pub async fn delete_group(
        &mut self,
        api: &ApiClient,
        group_id: &str,
        cascade: bool,
    ) -> ActionResult {
        if cascade {
            let task_ids: Vec<String> = self
                .groups
                .iter()
                .find(|g| g.id == group_id)
                .map(|g| g.tasks.iter().map(|t| t.id.clone()).collect())
                .unwrap_or_default();

            if !task_ids.is_empty() {
                tracing::debug!(count = task_ids.len(), %group_id, "Cascading task deletes");
                let deletes = task_ids.iter().map(|task_id| {
                    let task_id = task_id.clone();
                    async move {
                        if let Err(e) = api.delete_task(&task_id).await {
                            tracing::error!(%task_id, error = %e, "Failed to delete task");
                        }
                    }
                });
                join_all(deletes).await;
            }
        }

        match api.delete_task_group(group_id, false).await {
            Ok(()) => {
                self.groups.retain(|g| g.id != group_id);
                self.ok()
            }
            Err(e) => self.record_error("Failed to delete group", e),
        }
    }

    pub async fn add_task(&mut self, api: &ApiClient, task: &NewTask) -> ActionResult {
        if task.name.trim().is_empty() {
            return ActionResult::fail("Task name cannot be empty");
        }

        match api.create_task(task).await {
            Ok(created) => {
                if let Some(group) = self.groups.iter_mut().find(|g| g.id == task.group_id) {
                    group.tasks.push(created);
                }
                self.ok()
            }
            Err(e) => self.record_error("Failed to create task", e),
        }
    }

    pub async fn update_task(
        &mut self,
        api: &ApiClient,
        task_id: &str,
        task: &NewTask,
    ) -> ActionResult {
        match api.update_task(task_id, task).await {
            Ok(updated) => {
                self.patch_task(task_id, |t| *t = updated.clone());
                self.ok()
            }
            Err(e) => self.record_error("Failed to update task", e),
        }
    }

    pub async fn set_task_status(
        &mut self,
        api: &ApiClient,
        task_id: &str,
        completed: bool,
    ) -> ActionResult {
        match api.set_task_status(task_id, completed).await {
            Ok(()) => {
                self.patch_task(task_id, |t| t.completed = completed);
                self.ok()
            }
            Err(e) => self.record_error("Failed to update task status", e),
        }
    }

    pub async fn delete_task(&mut self, api: &ApiClient, task_id: &str) -> ActionResult {
        match api.delete_task(task_id).await {
            Ok(()) => {
                for group in &mut self.groups {
                    group.tasks.retain(|t| t.id != task_id);
                }
                self.ok()
            }
            Err(e) => self.record_error("Failed to delete task", e),
        }
    }

    fn patch_task(&mut self, task_id: &str, patch: impl Fn(&mut Task)) {
        for group in &mut self.groups {
            if let Some(task) = group.tasks.iter_mut().find(|t| t.id == task_id) {
                patch(task);
                return;
            }
        }
    }

    fn ok(&mut self) -> ActionResult {
        self.last_error = None;
        ActionResult::ok()
    }

    fn record_error(&mut self, context: &str, e: crate::api::ApiError) -> ActionResult {
        let message = format!("{context}: {e}");
        tracing::error!("{message}");
        self.last_error = Some(message.clone());
        ActionResult::fail(message)
    }
}

/// Assign tasks to their groups by id, skipping duplicates and tasks whose
/// group is unknown.
fn bucket_tasks(mut groups: Vec<TaskGroup>, tasks: Vec<Task>) -> Vec<TaskGroup> {
    for group in &mut groups {
        group.tasks.clear();
    }

    for task in tasks {
        let group_id = task.group_id.id().to_string();
        match groups.iter_mut().find(|g| g.id == group_id) {
            Some(group) => {
                if group.tasks.iter().any(|t| t.id == task.id) {
                    tracing::warn!(task_id = %task.id, %group_id, "Skipping duplicate task");
                } else {
                    group.tasks.push(task);
                }
            }
            None => {
                tracing::warn!(task_id = %task.id, %group_id, "Task references unknown group");
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(id: &str, name: &str) -> TaskGroup {
        TaskGroup {
            id: id.to_string(),
            name: name.to_string(),
            tasks: Vec::new(),
        }
    }

    fn task(id: &str, group_id: &str, name: &str) -> Task {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "name": name,
            "groupId": group_id,
        }))
        .unwrap()
    }

    #[test]
    fn bucketing_assigns_and_deduplicates() {
        let groups = vec![group("g1", "Work"), group("g2", "Home")];
        let tasks = vec![
            task("t1", "g1", "report"),
            task("t2", "g2", "laundry"),
            task("t1", "g1", "report again"),
            task("t3", "g-missing", "orphan"),
        ];

        let bucketed = bucket_tasks(groups, tasks);
        assert_eq!(bucketed[0].tasks.len(), 1);
        assert_eq!(bucketed[1].tasks.len(), 1);
        assert_eq!(bucketed[0].tasks[0].id, "t1");
    }

    #[test]
    fn flat_tasks_carries_group_annotations() {
        let mut store = TasksStore::new();
        let mut g = group("g1", "Work");
        g.tasks.push(task("t1", "g1", "report"));
        g.tasks.push(task("t2", "g1", "slides"));
        store.groups.push(g);
        store.groups.push(group("g2", "Home"));

        let flat = store.flat_tasks();
        assert_eq!(flat.len(), 2);
        assert!(flat.iter().all(|f| f.group_name == "Work"));
        assert_eq!(flat[1].task.name, "slides");
    }

    #[tokio::test]
    async fn empty_names_are_rejected_locally() {
        // No server involved: validation short-circuits before any request.
        let settings = crate::config::Settings::default();
        let session = crate::session::SessionStore::with_path(
            std::env::temp_dir().join("focusflow-test-no-session.json"),
        );
        let api = ApiClient::new(&settings, session).unwrap();

        let mut store = TasksStore::new();
        let result = store.add_group(&api, "   ").await;
        assert!(!result.success);

        let result = store.add_task(&api, &NewTask::new("", "g1")).await;
        assert!(!result.success);
    }
}
