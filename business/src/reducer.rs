use user_admin_states::Reducer;

use crate::event::{Fulfilled, LifecycleEvent};
use crate::model::{User, ViewState};

/// Folds lifecycle events into the user-management [`ViewState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UserManagementReducer;

impl Reducer for UserManagementReducer {
    type State = ViewState;
    type Event = LifecycleEvent;

    fn reduce(state: ViewState, event: LifecycleEvent) -> ViewState {
        match event {
            LifecycleEvent::Pending(kind) if kind.is_read() => ViewState {
                loading: true,
                error_message: None,
                update_success: false,
                ..state
            },
            LifecycleEvent::Pending(kind) if kind.is_mutation() => ViewState {
                updating: true,
                error_message: None,
                update_success: false,
                ..state
            },
            LifecycleEvent::Rejected { message, .. } => ViewState {
                loading: false,
                updating: false,
                update_success: false,
                error_message: Some(message),
                ..state
            },
            LifecycleEvent::Fulfilled(Fulfilled::FetchUsers { users, total_items }) => ViewState {
                loading: false,
                users,
                total_items,
                ..state
            },
            LifecycleEvent::Fulfilled(Fulfilled::FetchUser(user)) => ViewState {
                loading: false,
                user,
                ..state
            },
            LifecycleEvent::Fulfilled(Fulfilled::FetchRoles(authorities)) => ViewState {
                loading: false,
                authorities,
                ..state
            },
            LifecycleEvent::Fulfilled(Fulfilled::CreateUser(user) | Fulfilled::UpdateUser(user)) => {
                ViewState {
                    updating: false,
                    update_success: true,
                    user,
                    ..state
                }
            }
            LifecycleEvent::Fulfilled(Fulfilled::DeleteUser) => ViewState {
                updating: false,
                update_success: true,
                user: User::default(),
                ..state
            },
            LifecycleEvent::Reset => ViewState::default(),
            // Pending(Reset) and anything else without a transition.
            _ => state,
        }
    }

    fn starts_epoch(event: &LifecycleEvent) -> bool {
        matches!(event, LifecycleEvent::Reset)
    }
}
