//! Command implementations for the user-admin CLI.

pub mod roles;
pub mod users;

pub use roles::run_roles;
pub use users::{run_create, run_delete, run_get, run_list, run_update};
