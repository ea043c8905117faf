//! User commands: list, get, create, update, delete.

use anyhow::{Result, bail};
use serde_json::json;
use tabled::Tabled;
use tracing::instrument;
use user_admin_business::{AdminSession, Intent, ListQuery, Settlement, User};

use crate::cli::UserFields;
use crate::context::dispatch;
use crate::output::Output;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Login")]
    login: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Active")]
    activated: String,
    #[tabled(rename = "Roles")]
    roles: String,
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{truncated}...")
    } else {
        s.to_owned()
    }
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.map(|id| id.to_string()).unwrap_or_default(),
            login: truncate_str(&user.login, 24),
            name: truncate_str(&user.display_name(), 24),
            email: user.email.clone().unwrap_or_default(),
            activated: if user.activated { "yes" } else { "no" }.to_owned(),
            roles: user
                .authorities
                .iter()
                .map(|a| a.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Turn a rejected settlement into an error.
pub fn ensure_fulfilled(settlement: &Settlement) -> Result<()> {
    match settlement {
        Settlement::Fulfilled(_) => Ok(()),
        Settlement::Rejected { kind, message } => bail!("{kind} failed: {message}"),
    }
}

fn print_user(out: &Output, user: &User) -> Result<()> {
    if out.is_json() {
        out.json(user)?;
        return Ok(());
    }
    out.header(&user.login);
    if let Some(id) = user.id {
        out.labeled("ID", id);
    }
    out.labeled("Name", user.display_name());
    out.labeled("Email", user.email.as_deref().unwrap_or("-"));
    out.labeled("Activated", user.activated);
    out.labeled("Language", user.lang_key.as_deref().unwrap_or("-"));
    out.labeled(
        "Roles",
        user.authorities
            .iter()
            .map(|a| a.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    );
    if let Some(created) = user.created_date {
        out.labeled(
            "Created",
            format!("{} by {}", created, user.created_by.as_deref().unwrap_or("?")),
        );
    }
    if let Some(modified) = user.last_modified_date {
        out.labeled(
            "Modified",
            format!(
                "{} by {}",
                modified,
                user.last_modified_by.as_deref().unwrap_or("?")
            ),
        );
    }
    Ok(())
}

/// Print the page of users currently held by the session.
fn print_users(out: &Output, session: &AdminSession) -> Result<()> {
    let state = session.state();
    if out.is_json() {
        out.json(&json!({
            "users": state.users,
            "totalItems": state.total_items,
        }))?;
        return Ok(());
    }

    if state.users.is_empty() {
        out.dim("No users found.");
        return Ok(());
    }

    let rows: Vec<UserRow> = state.users.iter().map(UserRow::from).collect();
    out.newline();
    out.table(&rows);
    out.total("Total", state.total_items, "user");
    Ok(())
}

#[instrument(skip_all, name = "list", fields(page = ?query.page, size = ?query.size, sort = query.sort.as_deref().unwrap_or("default")))]
pub async fn run_list(session: &mut AdminSession, out: &Output, query: ListQuery) -> Result<()> {
    let settlement = dispatch(session, Intent::FetchUsers(query)).await;
    ensure_fulfilled(&settlement)?;
    print_users(out, session)
}

#[instrument(skip_all, name = "get", fields(login = %login))]
pub async fn run_get(session: &mut AdminSession, out: &Output, login: String) -> Result<()> {
    let settlement = dispatch(session, Intent::FetchUser(login)).await;
    ensure_fulfilled(&settlement)?;
    print_user(out, &session.state().user)
}

#[instrument(skip_all, name = "create", fields(login = %login))]
pub async fn run_create(
    session: &mut AdminSession,
    out: &Output,
    login: String,
    fields: UserFields,
) -> Result<()> {
    let user = fields.into_new_user(login);
    let settlement = dispatch(session, Intent::CreateUser(user)).await;
    ensure_fulfilled(&settlement)?;

    let created = &session.state().user;
    out.success(format!("Created user {}", created.login));
    print_user(out, created)?;
    out.newline();
    print_users(out, session)
}

/// Load the user, apply `fields`, then send the whole record back.
#[instrument(skip_all, name = "update", fields(login = %login))]
pub async fn run_update(
    session: &mut AdminSession,
    out: &Output,
    login: String,
    fields: UserFields,
) -> Result<()> {
    let settlement = dispatch(session, Intent::FetchUser(login)).await;
    ensure_fulfilled(&settlement)?;

    let mut user = session.state().user.clone();
    fields.apply_to(&mut user);
    let settlement = dispatch(session, Intent::UpdateUser(user)).await;
    ensure_fulfilled(&settlement)?;

    let updated = &session.state().user;
    out.success(format!("Updated user {}", updated.login));
    print_user(out, updated)
}

#[instrument(skip_all, name = "delete", fields(login = %login))]
pub async fn run_delete(session: &mut AdminSession, out: &Output, login: String) -> Result<()> {
    let settlement = dispatch(session, Intent::DeleteUser(login.clone())).await;
    ensure_fulfilled(&settlement)?;

    out.success(format!("Deleted user {login}"));
    print_users(out, session)
}
