// Store flows against a mock backend

use mockito::{Matcher, Server, ServerGuard};
use tempfile::TempDir;

use focusflow::api::auth::User;
use focusflow::api::ApiClient;
use focusflow::config::Settings;
use focusflow::session::{Session, SessionStore};
use focusflow::store::{HabitsStore, TasksStore};

fn logged_in_client(server: &ServerGuard, dir: &TempDir) -> ApiClient {
    let settings = Settings {
        api_url: server.url(),
        ..Settings::default()
    };
    let session = SessionStore::with_path(dir.path().join("session.json"));
    session
        .save(&Session {
            token: "test-token".to_string(),
            user: User {
                id: "u-1".to_string(),
                email: "test@example.com".to_string(),
                name: None,
            },
        })
        .unwrap();
    ApiClient::new(&settings, session).unwrap()
}

async fn mock_groups_and_tasks(server: &mut ServerGuard) {
    server
        .mock("GET", "/task-groups")
        .with_status(200)
        .with_body(
            r#"{"success":true,"data":[
                {"_id":"g1","name":"Work"},
                {"_id":"g2","name":"Home"}]}"#,
        )
        .create_async()
        .await;
    server
        .mock("GET", "/tasks")
        .with_status(200)
        .with_body(
            r#"{"success":true,"data":[
                {"_id":"t1","name":"report","groupId":"g1"},
                {"_id":"t2","name":"slides","groupId":"g1"},
                {"_id":"t3","name":"laundry","groupId":"g2"}]}"#,
        )
        .create_async()
        .await;
}

#[tokio::test]
async fn fetch_tasks_buckets_into_groups() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();
    mock_groups_and_tasks(&mut server).await;

    let api = logged_in_client(&server, &dir);
    let mut store = TasksStore::new();

    let result = store.fetch_tasks(&api).await;
    assert!(result.success);
    assert_eq!(store.groups().len(), 2);
    assert_eq!(store.groups()[0].tasks.len(), 2);
    assert_eq!(store.groups()[1].tasks.len(), 1);
    assert_eq!(store.flat_tasks().len(), 3);
}

#[tokio::test]
async fn cascade_delete_survives_a_failing_task_delete() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();
    mock_groups_and_tasks(&mut server).await;

    // One of the two cached tasks refuses to die.
    let failing_delete = server
        .mock("DELETE", "/tasks/t1")
        .with_status(500)
        .with_body(r#"{"success":false,"error":{"message":"internal error"}}"#)
        .expect(1)
        .create_async()
        .await;
    let passing_delete = server
        .mock("DELETE", "/tasks/t2")
        .with_status(200)
        .with_body(r#"{"success":true}"#)
        .expect(1)
        .create_async()
        .await;
    let group_delete = server
        .mock("DELETE", "/task-groups/g1")
        .match_query(Matcher::UrlEncoded(
            "deleteRelatedTasks".into(),
            "false".into(),
        ))
        .with_status(200)
        .with_body(r#"{"success":true}"#)
        .expect(1)
        .create_async()
        .await;

    let api = logged_in_client(&server, &dir);
    let mut store = TasksStore::new();
    store.fetch_tasks(&api).await;

    let result = store.delete_group(&api, "g1", true).await;

    // The failed task delete is logged, not fatal: the group delete still
    // runs and the group leaves the cache.
    assert!(result.success);
    assert!(store.last_error().is_none());
    assert!(store.groups().iter().all(|g| g.id != "g1"));
    assert!(store.flat_tasks().iter().all(|f| f.group_id != "g1"));

    failing_delete.assert_async().await;
    passing_delete.assert_async().await;
    group_delete.assert_async().await;
}

#[tokio::test]
async fn failed_group_delete_keeps_the_cache_and_records_the_error() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();
    mock_groups_and_tasks(&mut server).await;

    server
        .mock("DELETE", "/task-groups/g2")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body(r#"{"success":false,"error":{"message":"internal error"}}"#)
        .create_async()
        .await;

    let api = logged_in_client(&server, &dir);
    let mut store = TasksStore::new();
    store.fetch_tasks(&api).await;

    let result = store.delete_group(&api, "g2", false).await;
    assert!(!result.success);
    assert!(store.last_error().is_some());
    assert!(store.groups().iter().any(|g| g.id == "g2"));
}

#[tokio::test]
async fn completing_a_habit_patches_counters_from_the_server() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();

    server
        .mock("GET", "/habits")
        .with_status(200)
        .with_body(
            r#"{"success":true,"data":[
                {"_id":"h1","name":"run","tags":["health"],"completionCount":5,"streak":1},
                {"_id":"h2","name":"read","tags":["reading"],"completionCount":1}]}"#,
        )
        .create_async()
        .await;
    server
        .mock("POST", "/habits/h1/complete")
        .with_status(200)
        .with_body(
            r#"{"success":true,"data":{"_id":"h1","name":"run","tags":["health"],
                "completionCount":6,"completedToday":true,"streak":2}}"#,
        )
        .create_async()
        .await;
    // The reading habit is at its daily cap; no request may go out for it.
    let capped = server
        .mock("POST", "/habits/h2/complete")
        .expect(0)
        .create_async()
        .await;

    let api = logged_in_client(&server, &dir);
    let mut store = HabitsStore::new();

    let result = store.fetch_habits(&api).await;
    assert!(result.success);
    assert_eq!(store.header_count(), 6);

    let result = store.complete(&api, "h1").await;
    assert!(result.success);
    let habit = &store.habits()[0];
    assert_eq!(habit.completion_count, 6);
    assert!(habit.completed_today);
    assert_eq!(habit.streak, 2);
    assert_eq!(store.header_count(), 7);

    let result = store.complete(&api, "h2").await;
    assert!(result.success);
    assert_eq!(store.habits()[1].completion_count, 1);
    capped.assert_async().await;
}
