//! The single place state transitions happen.

use crate::{action::Action, state::AppState};

/// Applies one action. Pure: no I/O, no clock, same input always gives the same output.
pub fn reduce(state: AppState, action: Action) -> AppState {
    match action {
        Action::SetLoading => AppState {
            loading: true,
            ..state
        },
        Action::GetUsers(users) => AppState {
            users,
            loading: false,
            error: None,
            ..state
        },
        Action::GetUser(user) => AppState {
            user: Some(user),
            loading: false,
            error: None,
            ..state
        },
        Action::GetRepos(repos) => AppState {
            repos,
            loading: false,
            error: None,
            ..state
        },
        Action::ClearUsers => AppState {
            users: Vec::new(),
            loading: false,
            ..state
        },
        // Data slots keep whatever was last loaded.
        Action::RequestFailed(message) => AppState {
            loading: false,
            error: Some(message),
            ..state
        },
    }
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
