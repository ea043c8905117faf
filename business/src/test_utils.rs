//! Test utilities for the user-management layer.
//!
//! - [`StubApi`]: an in-memory [`UserAdminApi`] that records every call.
//! - [`EventLog`]: a reducer whose state is the list of events it has seen, for
//!   asserting exact lifecycle sequences.
//! - [`TestContext`]: a wiremock server plus an [`AdminSession`] pointed at it.
//!
//! # Example
//!
//! ```ignore
//! let mut test_ctx = TestContext::new().await;
//! test_ctx.mock_list_users(vec![sample_user("admin")], 1).await;
//!
//! test_ctx.session.submit(Intent::FetchUsers(ListQuery::new()));
//! test_ctx.flush_and_wait().await;
//!
//! assert_eq!(test_ctx.session.state().total_items, 1);
//! ```

#![cfg(test)]

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use user_admin_states::{Reducer, StalePolicy};
use ustr::Ustr;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use crate::api::{ApiError, ApiResult, ListQuery, TOTAL_COUNT_HEADER, UserAdminApi, UsersPage};
use crate::config::AdminConfig;
use crate::event::LifecycleEvent;
use crate::model::{Authority, User};
use crate::session::AdminSession;

/// A user with a predictable shape for a given login.
pub fn sample_user(login: &str) -> User {
    User {
        id: Some(1),
        email: Some(format!("{login}@localhost")),
        activated: true,
        lang_key: Some("en".to_owned()),
        authorities: vec![Ustr::from("ROLE_USER")],
        ..User::new(login)
    }
}

pub fn sample_roles() -> Vec<Authority> {
    vec![Ustr::from("ROLE_ADMIN"), Ustr::from("ROLE_USER")]
}

/// In-memory API. Every call is recorded as `"<method> <args>"`.
#[derive(Debug, Default)]
pub struct StubApi {
    users: Vec<User>,
    failure: Option<String>,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
}

impl StubApi {
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users,
            ..Self::default()
        }
    }

    /// Every call fails with a transport error carrying `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_owned()),
            ..Self::default()
        }
    }

    /// Every call sleeps for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn answer<T>(&self, call: String, value: impl FnOnce() -> T) -> ApiResult<T> {
        self.calls.lock().unwrap().push(call);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(message) => Err(ApiError::Transport(message.clone())),
            None => Ok(value()),
        }
    }
}

#[async_trait]
impl UserAdminApi for StubApi {
    async fn list_users(&self, query: &ListQuery) -> ApiResult<UsersPage> {
        let mut call = "list_users".to_owned();
        for (name, value) in query.pairs() {
            call.push_str(&format!(" {name}={value}"));
        }
        self.answer(call, || UsersPage {
            users: self.users.clone(),
            total_items: self.users.len() as u64,
        })
        .await
    }

    async fn get_user(&self, login: &str) -> ApiResult<User> {
        self.answer(format!("get_user {login}"), || sample_user(login))
            .await
    }

    async fn list_authorities(&self) -> ApiResult<Vec<Authority>> {
        self.answer("list_authorities".to_owned(), sample_roles).await
    }

    async fn create_user(&self, user: &User) -> ApiResult<User> {
        self.answer(format!("create_user {}", user.login), || user.clone())
            .await
    }

    async fn update_user(&self, user: &User) -> ApiResult<User> {
        self.answer(format!("update_user {}", user.login), || user.clone())
            .await
    }

    async fn delete_user(&self, login: &str) -> ApiResult<()> {
        self.answer(format!("delete_user {login}"), || ()).await
    }
}

/// Records events instead of folding them.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventLog;

impl Reducer for EventLog {
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

/// A mock backend and a session configured to use it.
pub struct TestContext {
    pub mock_server: MockServer,
    pub session: AdminSession,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_policy(StalePolicy::Apply).await
    }

    pub async fn with_policy(policy: StalePolicy) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let mock_server = MockServer::start().await;
        let config = AdminConfig::new(mock_server.uri())
            .with_request_timeout(Duration::from_secs(5))
            .with_stale_policy(policy);
        let session = AdminSession::from_config(&config).unwrap();

        Self {
            mock_server,
            session,
        }
    }

    /// Await all submitted intents, failing the test if they take too long.
    pub async fn flush_and_wait(&mut self) {
        let flushed =
            tokio::time::timeout(Duration::from_secs(5), self.session.flush_and_wait()).await;
        assert!(
            flushed.is_ok(),
            "Timed out waiting for pending tasks ({} still in JoinSet)",
            self.session.task_count()
        );
    }

    pub async fn mock_list_users(&self, users: Vec<User>, total: u64) {
        let response = ResponseTemplate::new(200)
            .insert_header(TOTAL_COUNT_HEADER, total.to_string())
            .set_body_json(users);

        Mock::given(method("GET"))
            .and(path("/api/users"))
            .respond_with(response)
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_create_user(&self, created: User) {
        Mock::given(method("POST"))
            .and(path("/api/users"))
            .respond_with(ResponseTemplate::new(201).set_body_json(created))
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_delete_user(&self, login: &str) {
        Mock::given(method("DELETE"))
            .and(path(format!("/api/users/{login}")))
            .respond_with(ResponseTemplate::new(204))
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_error(&self, http_method: &str, route: &str, status: u16) {
        Mock::given(method(http_method))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.mock_server)
            .await;
    }
}
