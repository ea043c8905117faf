//! Shared helpers for the business integration tests.

#![allow(dead_code)]

use std::time::Duration;

use serde_json::json;
use user_admin_business::{
    AdminConfig, HttpUserAdminApi, LifecycleEvent, TOTAL_COUNT_HEADER, User,
};
use user_admin_states::Reducer;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Start a mock server and an HTTP client pointed at it.
pub async fn setup() -> (MockServer, HttpUserAdminApi) {
    init_logging();
    let mock_server = MockServer::start().await;
    let config =
        AdminConfig::new(mock_server.uri()).with_request_timeout(Duration::from_secs(5));
    let api = HttpUserAdminApi::from_config(&config).expect("client should build");
    (mock_server, api)
}

pub fn user_json(id: i64, login: &str) -> serde_json::Value {
    json!({
        "id": id,
        "login": login,
        "firstName": login,
        "email": format!("{login}@localhost"),
        "activated": true,
        "langKey": "en",
        "authorities": ["ROLE_USER"],
        "createdBy": "system",
        "createdDate": "2024-01-01T00:00:00Z"
    })
}

pub fn user(login: &str) -> User {
    User {
        email: Some(format!("{login}@localhost")),
        activated: true,
        ..User::new(login)
    }
}

pub async fn mock_list_users(server: &MockServer, logins: &[&str], total: u64) {
    let body: Vec<_> = logins
        .iter()
        .zip(1..)
        .map(|(login, id)| user_json(id, login))
        .collect();

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(TOTAL_COUNT_HEADER, total.to_string())
                .set_body_json(body),
        )
        .mount(server)
        .await;
}

/// Reducer that keeps every event it sees, in order.
pub struct EventRecorder;

impl Reducer for EventRecorder {
    type State = Vec<LifecycleEvent>;
    type Event = LifecycleEvent;

    fn reduce(mut state: Vec<LifecycleEvent>, event: LifecycleEvent) -> Vec<LifecycleEvent> {
        state.push(event);
        state
    }

    fn starts_epoch(event: &LifecycleEvent) -> bool {
        matches!(event, LifecycleEvent::Reset)
    }
}

/// Action-type names of `events`, e.g. `userManagement/FETCH_USERS_PENDING`.
pub fn action_types(events: &[LifecycleEvent]) -> Vec<String> {
    events.iter().map(ToString::to_string).collect()
}
