//! Owned user-management session.
//!
//! An [`AdminSession`] ties a [`Store`] to a dispatcher and tracks the tasks spawned for
//! submitted intents. Events produced by those tasks are only visible in
//! [`AdminSession::state`] after a [`sync`](AdminSession::sync) or
//! [`flush_and_wait`](AdminSession::flush_and_wait).

use std::sync::Arc;

use log::{debug, error, info};
use tokio::task::JoinSet;
use user_admin_states::{StalePolicy, Store};

use crate::api::{ApiResult, HttpUserAdminApi, ListQuery, UserAdminApi};
use crate::config::AdminConfig;
use crate::dispatcher::{Settlement, UserManagementDispatcher};
use crate::event::OperationKind;
use crate::model::{User, ViewState};
use crate::reducer::UserManagementReducer;

/// Something the user asked the admin screen to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    FetchUsers(ListQuery),
    FetchUser(String),
    FetchRoles,
    CreateUser(User),
    UpdateUser(User),
    DeleteUser(String),
    Reset,
}

impl Intent {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::FetchUsers(_) => OperationKind::FetchUsers,
            Self::FetchUser(_) => OperationKind::FetchUser,
            Self::FetchRoles => OperationKind::FetchRoles,
            Self::CreateUser(_) => OperationKind::CreateUser,
            Self::UpdateUser(_) => OperationKind::UpdateUser,
            Self::DeleteUser(_) => OperationKind::DeleteUser,
            Self::Reset => OperationKind::Reset,
        }
    }
}

async fn run_intent(dispatcher: &UserManagementDispatcher, intent: Intent) -> Settlement {
    match intent {
        Intent::FetchUsers(query) => dispatcher.fetch_users(query).await,
        Intent::FetchUser(login) => dispatcher.fetch_user(&login).await,
        Intent::FetchRoles => dispatcher.fetch_roles().await,
        Intent::CreateUser(user) => dispatcher.create_user(&user).await,
        Intent::UpdateUser(user) => dispatcher.update_user(&user).await,
        Intent::DeleteUser(login) => dispatcher.delete_user(&login).await,
        Intent::Reset => {
            dispatcher.reset();
            Settlement::Fulfilled(OperationKind::Reset)
        }
    }
}

#[derive(Debug)]
pub struct AdminSession {
    store: Store<UserManagementReducer>,
    dispatcher: UserManagementDispatcher,
    tasks: JoinSet<Settlement>,
}

impl AdminSession {
    pub fn new(api: Arc<dyn UserAdminApi>, policy: StalePolicy) -> Self {
        let store = Store::new(policy);
        let dispatcher = UserManagementDispatcher::new(api, store.sender());
        Self {
            store,
            dispatcher,
            tasks: JoinSet::new(),
        }
    }

    /// Build a session talking HTTP to the configured backend.
    pub fn from_config(config: &AdminConfig) -> ApiResult<Self> {
        let api = HttpUserAdminApi::from_config(config)?;
        info!(
            "Admin session for {} ({:?})",
            api.api_url(),
            config.stale_policy()
        );
        Ok(Self::new(Arc::new(api), config.stale_policy()))
    }

    /// Start handling `intent` in the background.
    ///
    /// RESET is emitted right away; every other intent is spawned onto the current
    /// tokio runtime. Must be called from within a runtime.
    pub fn submit(&mut self, intent: Intent) {
        debug!("submit {}", intent.kind());
        if intent == Intent::Reset {
            self.dispatcher.reset();
            return;
        }
        let dispatcher = self.dispatcher.clone();
        self.tasks
            .spawn(async move { run_intent(&dispatcher, intent).await });
    }

    /// Handle `intent` to completion and apply its events.
    pub async fn run(&mut self, intent: Intent) -> Settlement {
        let settlement = run_intent(&self.dispatcher, intent).await;
        self.sync();
        settlement
    }

    /// Number of spawned intents not yet awaited.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Apply queued events to the view state.
    pub fn sync(&mut self) -> usize {
        self.store.sync()
    }

    /// Await every spawned intent, syncing after each one completes.
    ///
    /// Returns settlements in completion order. Tasks that panicked are logged and
    /// left out.
    pub async fn flush_and_wait(&mut self) -> Vec<Settlement> {
        self.sync();

        let mut settlements = Vec::with_capacity(self.tasks.len());
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(settlement) => settlements.push(settlement),
                Err(e) => error!("Dispatch task failed: {e}"),
            }
            self.sync();
        }

        self.sync();
        settlements
    }

    pub fn state(&self) -> &ViewState {
        self.store.state()
    }

    pub fn store(&self) -> &Store<UserManagementReducer> {
        &self.store
    }

    pub fn dispatcher(&self) -> &UserManagementDispatcher {
        &self.dispatcher
    }

    /// Wait for outstanding work and return the final view state.
    pub async fn shutdown(mut self) -> ViewState {
        let pending = self.tasks.len();
        if pending > 0 {
            debug!("Shutting down, waiting for {pending} task(s)");
        }
        self.flush_and_wait().await;
        self.store.into_state()
    }
}
