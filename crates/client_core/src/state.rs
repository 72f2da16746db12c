use serde::Serialize;
use shared::domain::{Repo, User};

/// Everything the view layer renders from. Only the reducer produces new values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppState {
    pub users: Vec<User>,
    pub user: Option<User>,
    pub repos: Vec<Repo>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Users,
    User,
    Repos,
    Loading,
    Error,
}

/// Which slots differ between two consecutive states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangedFields {
    pub users: bool,
    pub user: bool,
    pub repos: bool,
    pub loading: bool,
    pub error: bool,
}

impl ChangedFields {
    pub fn between(before: &AppState, after: &AppState) -> Self {
        Self {
            users: before.users != after.users,
            user: before.user != after.user,
            repos: before.repos != after.repos,
            loading: before.loading != after.loading,
            error: before.error != after.error,
        }
    }

    pub fn all() -> Self {
        Self {
            users: true,
            user: true,
            repos: true,
            loading: true,
            error: true,
        }
    }

    pub fn merge(&mut self, other: ChangedFields) {
        self.users |= other.users;
        self.user |= other.user;
        self.repos |= other.repos;
        self.loading |= other.loading;
        self.error |= other.error;
    }

    pub fn contains(&self, field: Field) -> bool {
        match field {
            Field::Users => self.users,
            Field::User => self.user,
            Field::Repos => self.repos,
            Field::Loading => self.loading,
            Field::Error => self.error,
        }
    }

    pub fn touches_any(&self, fields: &[Field]) -> bool {
        fields.iter().any(|field| self.contains(*field))
    }

    pub fn is_empty(&self) -> bool {
        !(self.users || self.user || self.repos || self.loading || self.error)
    }
}
