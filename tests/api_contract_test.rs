// Contract tests for the API client against a mock backend

use mockito::{Matcher, Server, ServerGuard};
use tempfile::TempDir;

use focusflow::api::auth::User;
use focusflow::api::stats::ReportType;
use focusflow::api::voice::{FeedbackType, VoiceStatus};
use focusflow::api::{ApiClient, ApiError};
use focusflow::config::{PollSettings, Settings};
use focusflow::session::{Session, SessionStore};
use tokio_util::sync::CancellationToken;

fn client(server: &ServerGuard, dir: &TempDir) -> ApiClient {
    let settings = Settings {
        api_url: server.url(),
        pipeline_url: server.url(),
        ..Settings::default()
    };
    let session = SessionStore::with_path(dir.path().join("session.json"));
    ApiClient::new(&settings, session).unwrap()
}

fn logged_in_client(server: &ServerGuard, dir: &TempDir) -> ApiClient {
    let api = client(server, dir);
    api.session()
        .save(&Session {
            token: "test-token".to_string(),
            user: User {
                id: "u-1".to_string(),
                email: "test@example.com".to_string(),
                name: None,
            },
        })
        .unwrap();
    api
}

#[tokio::test]
async fn login_returns_and_stores_a_token() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();

    let mock = server
        .mock("POST", "/auth/login")
        .match_body(Matcher::PartialJsonString(
            r#"{"email":"test@example.com"}"#.to_string(),
        ))
        .with_status(200)
        .with_body(
            r#"{"success":true,"data":{"token":"jwt-abc","user":{"_id":"u-1","email":"test@example.com","name":"Test"}}}"#,
        )
        .create_async()
        .await;

    let api = client(&server, &dir);
    let auth = api.login("test@example.com", "123456").await.unwrap();

    assert_eq!(auth.token, "jwt-abc");
    assert_eq!(api.session().token().as_deref(), Some("jwt-abc"));
    assert!(api.is_authenticated());
    mock.assert_async().await;
}

#[tokio::test]
async fn login_with_bad_password_is_unauthorized() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();

    server
        .mock("POST", "/auth/login")
        .with_status(401)
        .with_body(r#"{"success":false,"error":{"code":"AUTH_FAILED","message":"Invalid credentials"}}"#)
        .create_async()
        .await;

    let api = client(&server, &dir);
    let err = api.login("test@example.com", "wrong").await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized(_)));
    assert!(!api.is_authenticated());
}

#[tokio::test]
async fn authenticated_calls_attach_the_bearer_token() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();

    let mock = server
        .mock("GET", "/tasks")
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_body(r#"{"success":true,"data":[]}"#)
        .create_async()
        .await;

    let api = logged_in_client(&server, &dir);
    let tasks = api.tasks().await.unwrap();
    assert!(tasks.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn calls_without_a_session_fail_before_the_network() {
    let server = Server::new_async().await;
    let dir = TempDir::new().unwrap();

    let api = client(&server, &dir);
    let err = api.tasks().await.unwrap_err();
    assert!(matches!(err, ApiError::NotAuthenticated));
}

#[tokio::test]
async fn created_task_references_its_group() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();

    server
        .mock("POST", "/task-groups")
        .with_status(201)
        .with_body(r#"{"success":true,"data":{"_id":"g-7","name":"Work"}}"#)
        .create_async()
        .await;
    server
        .mock("POST", "/tasks")
        .match_body(Matcher::PartialJsonString(r#"{"groupId":"g-7"}"#.to_string()))
        .with_status(201)
        .with_body(
            r#"{"success":true,"data":{"_id":"t-1","name":"report","groupId":"g-7","priority":"high"}}"#,
        )
        .create_async()
        .await;

    let api = logged_in_client(&server, &dir);
    let group = api.create_task_group("Work").await.unwrap();
    let task = api
        .create_task(&focusflow::api::tasks::NewTask::new("report", group.id.clone()))
        .await
        .unwrap();

    assert_eq!(task.group_id.id(), group.id);
}

#[tokio::test]
async fn habit_completion_bumps_counters() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();

    server
        .mock("POST", "/habits/h-1/complete")
        .with_status(200)
        .with_body(
            r#"{"success":true,"data":{"_id":"h-1","name":"run","tags":["health"],
                "completionCount":6,"completedToday":true,"streak":3}}"#,
        )
        .create_async()
        .await;
    server
        .mock("POST", "/habits/h-1/uncomplete")
        .with_status(200)
        .with_body(
            r#"{"success":true,"data":{"_id":"h-1","name":"run","tags":["health"],
                "completionCount":5,"completedToday":false,"streak":2}}"#,
        )
        .create_async()
        .await;

    let api = logged_in_client(&server, &dir);

    let completed = api.complete_habit("h-1").await.unwrap();
    assert_eq!(completed.completion_count, 6);
    assert!(completed.completed_today);

    let reverted = api.uncomplete_habit("h-1").await.unwrap();
    assert_eq!(reverted.completion_count, 5);
    assert!(!reverted.completed_today);
}

#[tokio::test]
async fn invalid_stats_date_maps_to_an_http_error() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();

    server
        .mock("GET", "/stats/today-summary")
        .match_query(Matcher::UrlEncoded("date".into(), "invalid-date".into()))
        .with_status(400)
        .with_body(r#"{"success":false,"error":{"code":"INVALID_DATE","message":"Invalid date format"}}"#)
        .create_async()
        .await;

    let api = logged_in_client(&server, &dir);
    let err = api
        .stats_raw("today-summary", &[("date", "invalid-date")])
        .await
        .unwrap_err();

    match err {
        ApiError::Http { status, code, .. } => {
            assert_eq!(status, 400);
            assert_eq!(code.as_deref(), Some("INVALID_DATE"));
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn export_maps_to_not_implemented() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();

    server
        .mock("GET", "/stats/export")
        .match_query(Matcher::Any)
        .with_status(501)
        .with_body(r#"{"success":false,"message":"Report export is not implemented"}"#)
        .create_async()
        .await;

    let api = logged_in_client(&server, &dir);
    let err = api
        .export_report(ReportType::Pdf, "last_month")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotImplemented(_)));
}

#[tokio::test]
async fn missing_feedback_audio_is_none_without_retrying() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();

    let mock = server
        .mock("GET", "/cosyvoice/feedback/f-1/audio")
        .match_query(Matcher::UrlEncoded("type".into(), "encourage".into()))
        .with_status(404)
        .with_body(r#"{"success":false,"error":{"message":"audio not found"}}"#)
        .expect(1)
        .create_async()
        .await;

    let api = logged_in_client(&server, &dir);
    let audio = api
        .feedback_audio("f-1", FeedbackType::Encourage)
        .await
        .unwrap();

    assert!(audio.is_none());
    // A 404 means "not ready", not a fault: exactly one request, no retries.
    mock.assert_async().await;
}

#[tokio::test]
async fn monitor_returns_a_terminal_job_immediately() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();

    server
        .mock("GET", "/cosyvoice/voice/v-1")
        .with_status(200)
        .with_body(
            r#"{"success":true,"data":{"cosyVoice":{"_id":"cv-1","voice_id":"v-1",
                "feedback_id":"f-1","status":"synthesized",
                "synthesized_encourage_url":"http://cdn/enc.wav",
                "synthesized_criticize_url":"http://cdn/cri.wav"}}}"#,
        )
        .create_async()
        .await;

    let api = logged_in_client(&server, &dir);
    let poll = PollSettings {
        interval_secs: 1,
        timeout_secs: 2,
    };
    let cancel = CancellationToken::new();

    let mut seen = Vec::new();
    let job = api
        .monitor_voice_processing("v-1", &poll, &cancel, |job| seen.push(job.status))
        .await
        .unwrap();

    assert_eq!(job.status, VoiceStatus::Synthesized);
    assert_eq!(job.encourage_url.as_deref(), Some("http://cdn/enc.wav"));
    assert_eq!(job.criticize_url.as_deref(), Some("http://cdn/cri.wav"));
    assert_eq!(seen, vec![VoiceStatus::Synthesized]);
}

#[tokio::test]
async fn monitor_times_out_when_the_job_never_finishes() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();

    server
        .mock("GET", "/cosyvoice/voice/v-2")
        .with_status(200)
        .with_body(
            r#"{"success":true,"data":{"cosyVoice":{"_id":"cv-2","voice_id":"v-2","status":"cloning"}}}"#,
        )
        .create_async()
        .await;

    let api = logged_in_client(&server, &dir);
    // One-second window with a one-second interval: the first non-terminal
    // poll exhausts the deadline.
    let poll = PollSettings {
        interval_secs: 1,
        timeout_secs: 1,
    };
    let cancel = CancellationToken::new();

    let result = api
        .monitor_voice_processing("v-2", &poll, &cancel, |_| {})
        .await;
    assert!(matches!(
        result,
        Err(focusflow::poll::PollError::Timeout { .. })
    ));
}

#[tokio::test]
async fn pipeline_voice_id_lookup_reads_flat_responses() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();

    server
        .mock("GET", "/get-voice-id")
        .match_query(Matcher::UrlEncoded("user_id".into(), "u-1".into()))
        .with_status(200)
        .with_body(r#"{"success":true,"voice_id":"v-9"}"#)
        .create_async()
        .await;

    let api = logged_in_client(&server, &dir);
    let voice_id = api.voice_id_for_user("u-1").await.unwrap();
    assert_eq!(voice_id.as_deref(), Some("v-9"));
}
