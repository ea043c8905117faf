//! User-management view model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ustr::Ustr;

/// A role identifier such as `ROLE_ADMIN`.
///
/// Interned: role names are few and cloned into every user they are attached to.
pub type Authority = Ustr;

/// A user resource as returned by the admin API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub login: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub activated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang_key: Option<String>,
    #[serde(default)]
    pub authorities: Vec<Authority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<DateTime<Utc>>,
}

impl User {
    /// A fresh, not-yet-persisted user with only a login.
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            ..Self::default()
        }
    }

    /// True for the placeholder user held when nothing is loaded.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn display_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(name), None) | (None, Some(name)) => name.to_owned(),
            (None, None) => self.login.clone(),
        }
    }
}

/// State backing the user-management screen.
///
/// Only the reducer produces new values of this type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Current page of users.
    pub users: Vec<User>,

    /// Every role a user can be granted.
    pub authorities: Vec<Authority>,

    /// The user being viewed or edited. Empty when none is loaded.
    pub user: User,

    /// Size of the whole remote collection, for pagination.
    pub total_items: u64,

    /// A read (list users, fetch user, list roles) is in flight.
    pub loading: bool,

    /// A mutation (create, update, delete) is in flight.
    pub updating: bool,

    /// The last mutation succeeded. Cleared by the next pending or rejected event.
    pub update_success: bool,

    /// Message of the last failure, if it has not been superseded yet.
    pub error_message: Option<String>,
}

impl ViewState {
    pub fn is_busy(&self) -> bool {
        self.loading || self.updating
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Number of pages needed to show `total_items` at `page_size` per page.
    pub fn page_count(&self, page_size: u32) -> u64 {
        if page_size == 0 {
            return 0;
        }
        self.total_items.div_ceil(u64::from(page_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_user_is_empty() {
        assert!(User::default().is_empty());
        assert!(!User::new("admin").is_empty());
    }

    #[test]
    fn user_json_uses_camel_case() {
        let user = User {
            first_name: Some("Ada".to_owned()),
            lang_key: Some("en".to_owned()),
            activated: true,
            authorities: vec![Ustr::from("ROLE_ADMIN")],
            ..User::new("ada")
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["login"], "ada");
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["langKey"], "en");
        assert_eq!(json["authorities"][0], "ROLE_ADMIN");
        assert!(json.get("id").is_none());
        assert!(json.get("lastName").is_none());
    }

    #[test]
    fn user_tolerates_sparse_json() {
        let user: User = serde_json::from_str(
            r#"{"id": 3, "login": "system", "createdDate": "2024-01-02T03:04:05Z"}"#,
        )
        .unwrap();

        assert_eq!(user.id, Some(3));
        assert_eq!(user.login, "system");
        assert!(!user.activated);
        assert!(user.authorities.is_empty());
        assert!(user.created_date.is_some());
    }

    #[test]
    fn display_name_falls_back_to_login() {
        let mut user = User::new("jdoe");
        assert_eq!(user.display_name(), "jdoe");

        user.first_name = Some("John".to_owned());
        assert_eq!(user.display_name(), "John");

        user.last_name = Some("Doe".to_owned());
        assert_eq!(user.display_name(), "John Doe");
    }

    #[test]
    fn page_count_rounds_up() {
        let state = ViewState {
            total_items: 42,
            ..ViewState::default()
        };

        assert_eq!(state.page_count(20), 3);
        assert_eq!(state.page_count(42), 1);
        assert_eq!(state.page_count(0), 0);
    }
}
