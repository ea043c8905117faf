//! User-admin API client.
//!
//! [`UserAdminApi`] is the seam between the dispatcher and the network. The
//! production implementation, [`HttpUserAdminApi`], talks JSON over HTTP:
//!
//! - `GET    {api}/users?page&size&sort` → `User[]`, total in `x-total-count`
//! - `GET    {api}/users/{login}`        → `User`
//! - `GET    {api}/authorities`          → `string[]`
//! - `POST   {api}/users`                → `User` (create)
//! - `PUT    {api}/users`                → `User` (update)
//! - `DELETE {api}/users/{login}`
//!
//! Any non-2xx status is an error. Callers turn errors into rejected events.

use async_trait::async_trait;
use log::{debug, warn};
use thiserror::Error;

use crate::config::AdminConfig;
use crate::http::{Client, Response};
use crate::model::{Authority, User};

/// Header carrying the size of the full user collection.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

const JSON: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Connection refused, timeout, and other transport failures.
    #[error("{0}")]
    Transport(String),
    #[error("API returned status: {status}")]
    Status { status: u16 },
    #[error("Failed to parse {what}: {message}")]
    Decode { what: &'static str, message: String },
    #[error("Failed to serialize request: {0}")]
    Encode(String),
}

/// A typed API result.
pub type ApiResult<T> = Result<T, ApiError>;

/// Pagination and sort options for listing users. Unset fields are omitted from the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Option<String>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Sort expression such as `id,desc`.
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.page.is_none() && self.size.is_none() && self.sort.is_none()
    }

    /// Query pairs in `page`, `size`, `sort` order.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size", size.to_string()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.clone()));
        }
        pairs
    }
}

/// One page of users plus the size of the whole collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsersPage {
    pub users: Vec<User>,
    pub total_items: u64,
}

#[async_trait]
pub trait UserAdminApi: Send + Sync + std::fmt::Debug {
    async fn list_users(&self, query: &ListQuery) -> ApiResult<UsersPage>;

    async fn get_user(&self, login: &str) -> ApiResult<User>;

    async fn list_authorities(&self) -> ApiResult<Vec<Authority>>;

    async fn create_user(&self, user: &User) -> ApiResult<User>;

    async fn update_user(&self, user: &User) -> ApiResult<User>;

    async fn delete_user(&self, login: &str) -> ApiResult<()>;
}

/// [`UserAdminApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpUserAdminApi {
    client: Client,
    api_url: String,
}

impl HttpUserAdminApi {
    /// `api_url` is the route prefix, e.g. `http://localhost:8080/api`.
    pub fn new(api_url: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            api_url: api_url.into(),
        }
    }

    pub fn from_config(config: &AdminConfig) -> ApiResult<Self> {
        let mut client = Client::new(config.request_timeout())
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        if let Some(token) = config.api_token() {
            client = client.with_default_header("authorization", format!("Bearer {token}"));
        }
        Ok(Self::new(config.api_url().as_str(), client))
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.api_url.trim_end_matches('/'))
    }

    /// `users/{login}` with the login percent-encoded as one path segment.
    fn user_url(&self, login: &str) -> ApiResult<String> {
        let mut url = reqwest::Url::parse(&self.url("users"))
            .map_err(|e| ApiError::Transport(format!("invalid API URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::Transport(format!("invalid API URL: {}", self.api_url)))?
            .push(login);
        Ok(url.into())
    }
}

fn ensure_success(response: Response) -> ApiResult<Response> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status {
            status: response.status,
        })
    }
}

fn decode<T>(response: &Response, what: &'static str) -> ApiResult<T>
where
    T: serde::de::DeserializeOwned,
{
    response.json().map_err(|e| ApiError::Decode {
        what,
        message: e.to_string(),
    })
}

/// Total from `x-total-count`, or the page length when the header is missing or malformed.
fn total_items(response: &Response, page_len: usize) -> u64 {
    match response.header(TOTAL_COUNT_HEADER).map(|v| v.trim().parse::<u64>()) {
        Some(Ok(total)) => total,
        Some(Err(e)) => {
            warn!("list_users: invalid {TOTAL_COUNT_HEADER} header: {e}");
            page_len as u64
        }
        None => {
            warn!("list_users: response has no {TOTAL_COUNT_HEADER} header");
            page_len as u64
        }
    }
}

fn transport(e: crate::http::HttpError) -> ApiError {
    ApiError::Transport(e.message)
}

#[async_trait]
impl UserAdminApi for HttpUserAdminApi {
    async fn list_users(&self, query: &ListQuery) -> ApiResult<UsersPage> {
        let url = self.url("users");
        debug!("GET {url} {:?}", query.pairs());

        let response = self
            .client
            .get(&url)
            .header("accept", JSON)
            .query(query.pairs())
            .send()
            .await
            .map_err(transport)?;
        let response = ensure_success(response)?;

        let users: Vec<User> = decode(&response, "user list")?;
        let total_items = total_items(&response, users.len());
        Ok(UsersPage { users, total_items })
    }

    async fn get_user(&self, login: &str) -> ApiResult<User> {
        let url = self.user_url(login)?;
        debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .header("accept", JSON)
            .send()
            .await
            .map_err(transport)?;
        decode(&ensure_success(response)?, "user")
    }

    async fn list_authorities(&self) -> ApiResult<Vec<Authority>> {
        let url = self.url("authorities");
        debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .header("accept", JSON)
            .send()
            .await
            .map_err(transport)?;
        decode(&ensure_success(response)?, "authority list")
    }

    async fn create_user(&self, user: &User) -> ApiResult<User> {
        let url = self.url("users");
        debug!("POST {url} login={}", user.login);

        let request = self
            .client
            .post(&url)
            .header("accept", JSON)
            .json(user)
            .map_err(|e| ApiError::Encode(e.to_string()))?;
        let response = request.send().await.map_err(transport)?;
        decode(&ensure_success(response)?, "created user")
    }

    async fn update_user(&self, user: &User) -> ApiResult<User> {
        let url = self.url("users");
        debug!("PUT {url} login={}", user.login);

        let request = self
            .client
            .put(&url)
            .header("accept", JSON)
            .json(user)
            .map_err(|e| ApiError::Encode(e.to_string()))?;
        let response = request.send().await.map_err(transport)?;
        decode(&ensure_success(response)?, "updated user")
    }

    async fn delete_user(&self, login: &str) -> ApiResult<()> {
        let url = self.user_url(login)?;
        debug!("DELETE {url}");

        let response = self.client.delete(&url).send().await.map_err(transport)?;
        ensure_success(response)?;
        Ok(())
    }
}
