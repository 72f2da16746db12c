use tokio::sync::{broadcast, Mutex};
use tracing::debug;

use crate::{
    action::{Action, ActionKind},
    reducer::reduce,
    state::{AppState, ChangedFields},
};

const UPDATE_CHANNEL_CAPACITY: usize = 256;

/// Published once per dispatch, in dispatch order.
#[derive(Debug, Clone)]
pub struct StateUpdate {
    pub action: ActionKind,
    pub changed: ChangedFields,
    pub state: AppState,
}

/// Owns the canonical [`AppState`]. Writes only happen through [`GithubStore::dispatch`].
pub struct GithubStore {
    state: Mutex<AppState>,
    updates: broadcast::Sender<StateUpdate>,
}

impl Default for GithubStore {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

impl GithubStore {
    pub fn new(initial: AppState) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            state: Mutex::new(initial),
            updates,
        }
    }

    /// Runs the reducer under the lock and notifies subscribers before releasing it,
    /// so notifications arrive in the same order the actions were applied.
    pub async fn dispatch(&self, action: Action) -> AppState {
        let kind = action.kind();
        let mut guard = self.state.lock().await;
        let before = std::mem::take(&mut *guard);
        let after = reduce(before.clone(), action);
        let changed = ChangedFields::between(&before, &after);
        *guard = after.clone();

        debug!(action = kind.name(), ?changed, loading = after.loading, "dispatched");
        let _ = self.updates.send(StateUpdate {
            action: kind,
            changed,
            state: after.clone(),
        });
        after
    }

    pub async fn snapshot(&self) -> AppState {
        self.state.lock().await.clone()
    }

    pub async fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&*self.state.lock().await)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateUpdate> {
        self.updates.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
