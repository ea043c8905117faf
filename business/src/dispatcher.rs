//! Action dispatcher.
//!
//! Each operation emits one PENDING event, performs its API call, then emits exactly one
//! terminal event. The terminal event is stamped with the epoch that was current when
//! the PENDING event went out, so a store running [`StalePolicy::DiscardStale`] can drop
//! results that straddle a RESET.
//!
//! [`StalePolicy::DiscardStale`]: user_admin_states::StalePolicy::DiscardStale

use std::future::Future;
use std::sync::Arc;

use log::{debug, error, warn};
use user_admin_states::{Epoch, EventSender};

use crate::api::{ApiResult, ListQuery, UserAdminApi, UsersPage};
use crate::event::{FollowUp, Fulfilled, LifecycleEvent, OperationKind};
use crate::model::User;

/// How a dispatched operation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    Fulfilled(OperationKind),
    Rejected { kind: OperationKind, message: String },
}

impl Settlement {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Fulfilled(kind) | Self::Rejected { kind, .. } => *kind,
        }
    }

    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Self::Fulfilled(_))
    }

    /// The failure message, if the operation was rejected.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Fulfilled(_) => None,
            Self::Rejected { message, .. } => Some(message),
        }
    }
}

/// Turns user-management intents into lifecycle events.
///
/// Cheap to clone; clones share the API client and the event queue.
#[derive(Debug, Clone)]
pub struct UserManagementDispatcher {
    api: Arc<dyn UserAdminApi>,
    events: EventSender<LifecycleEvent>,
}

impl UserManagementDispatcher {
    pub fn new(api: Arc<dyn UserAdminApi>, events: EventSender<LifecycleEvent>) -> Self {
        Self { api, events }
    }

    pub fn api(&self) -> &Arc<dyn UserAdminApi> {
        &self.api
    }

    /// List one page of users. Absent query options are left out of the request.
    pub async fn fetch_users(&self, query: ListQuery) -> Settlement {
        self.list_users(query, None).await.0
    }

    pub async fn fetch_roles(&self) -> Settlement {
        self.track(
            OperationKind::FetchRoles,
            None,
            self.api.list_authorities(),
            Fulfilled::FetchRoles,
        )
        .await
        .0
    }

    pub async fn fetch_user(&self, login: &str) -> Settlement {
        self.track(
            OperationKind::FetchUser,
            None,
            self.api.get_user(login),
            Fulfilled::FetchUser,
        )
        .await
        .0
    }

    /// Create a user, then refresh the user list if that succeeded.
    pub async fn create_user(&self, user: &User) -> Settlement {
        let (settlement, epoch) = self
            .track(
                OperationKind::CreateUser,
                None,
                self.api.create_user(user),
                Fulfilled::CreateUser,
            )
            .await;
        self.chain(settlement, epoch).await
    }

    /// Update a user, then refresh the user list if that succeeded.
    pub async fn update_user(&self, user: &User) -> Settlement {
        let (settlement, epoch) = self
            .track(
                OperationKind::UpdateUser,
                None,
                self.api.update_user(user),
                Fulfilled::UpdateUser,
            )
            .await;
        self.chain(settlement, epoch).await
    }

    /// Delete a user, then refresh the user list if that succeeded.
    pub async fn delete_user(&self, login: &str) -> Settlement {
        let (settlement, epoch) = self
            .track(
                OperationKind::DeleteUser,
                None,
                self.api.delete_user(login),
                |()| Fulfilled::DeleteUser,
            )
            .await;
        self.chain(settlement, epoch).await
    }

    /// Emit RESET. Outstanding calls keep running.
    pub fn reset(&self) {
        let event = LifecycleEvent::Reset;
        debug!("{event}");
        match self.events.emit(event) {
            Ok(epoch) => debug!("reset: now in {epoch}"),
            Err(e) => error!("reset: {e}"),
        }
    }

    async fn list_users(&self, query: ListQuery, epoch: Option<Epoch>) -> (Settlement, Epoch) {
        self.track(
            OperationKind::FetchUsers,
            epoch,
            self.api.list_users(&query),
            |page: UsersPage| Fulfilled::FetchUsers {
                users: page.users,
                total_items: page.total_items,
            },
        )
        .await
    }

    /// Run `call` between its PENDING and terminal events.
    ///
    /// With `epoch` unset the PENDING event goes out in the current epoch. Both events
    /// share one epoch, which is returned alongside the settlement.
    async fn track<T, F>(
        &self,
        kind: OperationKind,
        epoch: Option<Epoch>,
        call: F,
        fulfil: impl FnOnce(T) -> Fulfilled,
    ) -> (Settlement, Epoch)
    where
        F: Future<Output = ApiResult<T>>,
    {
        let epoch = self.emit_pending(kind, epoch);

        let (event, settlement) = match call.await {
            Ok(value) => (
                LifecycleEvent::Fulfilled(fulfil(value)),
                Settlement::Fulfilled(kind),
            ),
            Err(e) => {
                let message = e.to_string();
                warn!("{kind} failed: {message}");
                (
                    LifecycleEvent::rejected(kind, message.clone()),
                    Settlement::Rejected { kind, message },
                )
            }
        };

        debug!("{event} ({epoch})");
        if let Err(e) = self.events.emit_in(epoch, event) {
            error!("{kind}: {e}");
        }
        (settlement, epoch)
    }

    fn emit_pending(&self, kind: OperationKind, epoch: Option<Epoch>) -> Epoch {
        let event = LifecycleEvent::Pending(kind);
        debug!("{event}");
        if let Some(epoch) = epoch {
            if let Err(e) = self.events.emit_in(epoch, event) {
                error!("{kind}: {e}");
            }
            return epoch;
        }
        match self.events.emit(event) {
            Ok(epoch) => epoch,
            Err(e) => {
                error!("{kind}: {e}");
                self.events.current_epoch()
            }
        }
    }

    /// Follow up a fulfilled mutation. The refresh stays in the mutation's epoch, so a
    /// RESET issued meanwhile makes it stale too.
    async fn chain(&self, settlement: Settlement, epoch: Epoch) -> Settlement {
        if let Settlement::Fulfilled(kind) = &settlement
            && let Some(FollowUp::RefreshUsers) = kind.follow_up()
        {
            debug!("{kind} fulfilled, refreshing users in {epoch}");
            self.list_users(ListQuery::default(), Some(epoch)).await;
        }
        settlement
    }
}
