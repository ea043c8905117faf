//! List roles command.

use anyhow::Result;
use tracing::instrument;
use user_admin_business::{AdminSession, Intent};

use crate::commands::users::ensure_fulfilled;
use crate::context::dispatch;
use crate::output::Output;

#[instrument(skip_all, name = "roles")]
pub async fn run_roles(session: &mut AdminSession, out: &Output) -> Result<()> {
    let settlement = dispatch(session, Intent::FetchRoles).await;
    ensure_fulfilled(&settlement)?;

    let roles = &session.state().authorities;
    if out.is_json() {
        out.json(roles)?;
        return Ok(());
    }
    if roles.is_empty() {
        out.dim("No roles defined.");
        return Ok(());
    }
    for role in roles {
        out.print(format!("  {role}"));
    }
    out.total("Total", roles.len() as u64, "role");
    Ok(())
}
