use std::sync::Arc;

use async_trait::async_trait;
use shared::domain::{Repo, User};
use tokio::sync::broadcast;
use tracing::{info, warn};

pub mod action;
pub mod config;
pub mod error;
pub mod gateway;
pub mod reducer;
pub mod state;
pub mod store;

pub use action::{Action, ActionKind};
pub use config::{load_settings, GatewaySettings};
pub use error::GatewayError;
pub use gateway::{GithubGateway, HttpGateway, UserLookup, NOT_FOUND_ROUTE};
pub use state::{AppState, ChangedFields, Field};
pub use store::{GithubStore, StateUpdate};

/// What consumers get: the four state slots plus the operations that drive them.
///
/// Handles are cheap to clone and every clone sees the same store.
#[async_trait]
pub trait GithubHandle: Send + Sync {
    async fn users(&self) -> Vec<User>;
    async fn user(&self) -> Option<User>;
    async fn repos(&self) -> Vec<Repo>;
    async fn loading(&self) -> bool;
    async fn error(&self) -> Option<String>;
    async fn snapshot(&self) -> AppState;
    async fn search_users(&self, query: &str) -> Result<Vec<User>, GatewayError>;
    async fn list_users(&self) -> Result<Vec<User>, GatewayError>;
    async fn get_user(&self, login: &str) -> Result<UserLookup, GatewayError>;
    async fn get_user_repos(&self, login: &str) -> Result<Vec<Repo>, GatewayError>;
    async fn clear_users(&self);
    fn subscribe(&self) -> broadcast::Receiver<StateUpdate>;
}

/// Pairs one store with one gateway and sequences every fetch as
/// `SetLoading` -> gateway call -> result action.
///
/// Overlapping calls are not serialized: whichever response arrives last wins.
pub struct GithubClient {
    gateway: Arc<dyn GithubGateway>,
    store: Arc<GithubStore>,
}

impl GithubClient {
    pub fn new(gateway: Arc<dyn GithubGateway>) -> Arc<Self> {
        Self::new_with_store(gateway, Arc::new(GithubStore::default()))
    }

    pub fn new_with_store(gateway: Arc<dyn GithubGateway>, store: Arc<GithubStore>) -> Arc<Self> {
        Arc::new(Self { gateway, store })
    }

    pub fn from_settings(settings: &GatewaySettings) -> Result<Arc<Self>, GatewayError> {
        let gateway = HttpGateway::new(settings)?;
        Ok(Self::new(Arc::new(gateway)))
    }

    pub fn store(&self) -> &Arc<GithubStore> {
        &self.store
    }

    /// Releases `loading` and records the failure before handing the error back.
    async fn fail<T>(&self, operation: &str, err: GatewayError) -> Result<T, GatewayError> {
        warn!(operation, error = %err, "github operation failed");
        self.store
            .dispatch(Action::RequestFailed(err.to_string()))
            .await;
        Err(err)
    }
}

#[async_trait]
impl GithubHandle for Arc<GithubClient> {
    async fn users(&self) -> Vec<User> {
        self.store.read(|state| state.users.clone()).await
    }

    async fn user(&self) -> Option<User> {
        self.store.read(|state| state.user.clone()).await
    }

    async fn repos(&self) -> Vec<Repo> {
        self.store.read(|state| state.repos.clone()).await
    }

    async fn loading(&self) -> bool {
        self.store.read(|state| state.loading).await
    }

    async fn error(&self) -> Option<String> {
        self.store.read(|state| state.error.clone()).await
    }

    async fn snapshot(&self) -> AppState {
        self.store.snapshot().await
    }

    async fn search_users(&self, query: &str) -> Result<Vec<User>, GatewayError> {
        self.store.dispatch(Action::SetLoading).await;
        info!(query, "searching users");

        let users = match self.gateway.search_users(query).await {
            Ok(users) => users,
            Err(err) => return self.fail("search_users", err).await,
        };

        info!(query, count = users.len(), "search finished");
        self.store.dispatch(Action::GetUsers(users.clone())).await;
        Ok(users)
    }

    async fn list_users(&self) -> Result<Vec<User>, GatewayError> {
        self.store.dispatch(Action::SetLoading).await;
        info!("listing users");

        let users = match self.gateway.list_users().await {
            Ok(users) => users,
            Err(err) => return self.fail("list_users", err).await,
        };

        self.store.dispatch(Action::GetUsers(users.clone())).await;
        Ok(users)
    }

    async fn get_user(&self, login: &str) -> Result<UserLookup, GatewayError> {
        self.store.dispatch(Action::SetLoading).await;
        info!(login, "fetching user");

        let lookup = match self.gateway.get_user(login).await {
            Ok(lookup) => lookup,
            Err(err) => return self.fail("get_user", err).await,
        };

        match &lookup {
            UserLookup::Found(user) => {
                self.store.dispatch(Action::GetUser(user.clone())).await;
            }
            // No result action: the caller navigates away and `loading` stays set.
            UserLookup::NotFound => info!(login, route = NOT_FOUND_ROUTE, "user not found"),
        }
        Ok(lookup)
    }

    async fn get_user_repos(&self, login: &str) -> Result<Vec<Repo>, GatewayError> {
        self.store.dispatch(Action::SetLoading).await;
        info!(login, "fetching repos");

        let repos = match self.gateway.get_user_repos(login).await {
            Ok(repos) => repos,
            Err(err) => return self.fail("get_user_repos", err).await,
        };

        self.store.dispatch(Action::GetRepos(repos.clone())).await;
        Ok(repos)
    }

    async fn clear_users(&self) {
        self.store.dispatch(Action::ClearUsers).await;
    }

    fn subscribe(&self) -> broadcast::Receiver<StateUpdate> {
        self.store.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
