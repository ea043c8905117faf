//! User-management client: lifecycle events, the reducer that folds them into a
//! [`ViewState`], the dispatcher that emits them, and an owned [`AdminSession`].

mod api;
mod config;
mod dispatcher;
mod event;
pub mod http;
mod model;
mod reducer;
mod session;

#[cfg(test)]
mod test_utils;

pub use api::{
    ApiError, ApiResult, HttpUserAdminApi, ListQuery, TOTAL_COUNT_HEADER, UserAdminApi, UsersPage,
};
pub use config::{AdminConfig, ConfigError};
pub use dispatcher::{Settlement, UserManagementDispatcher};
pub use event::{ACTION_PREFIX, FollowUp, Fulfilled, LifecycleEvent, OperationKind, Phase};
pub use model::{Authority, User, ViewState};
pub use reducer::UserManagementReducer;
pub use session::{AdminSession, Intent};
