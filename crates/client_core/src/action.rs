use shared::domain::{Repo, User};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetLoading,
    GetUsers(Vec<User>),
    GetUser(User),
    GetRepos(Vec<Repo>),
    ClearUsers,
    RequestFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    SetLoading,
    GetUsers,
    GetUser,
    GetRepos,
    ClearUsers,
    RequestFailed,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::SetLoading => ActionKind::SetLoading,
            Self::GetUsers(_) => ActionKind::GetUsers,
            Self::GetUser(_) => ActionKind::GetUser,
            Self::GetRepos(_) => ActionKind::GetRepos,
            Self::ClearUsers => ActionKind::ClearUsers,
            Self::RequestFailed(_) => ActionKind::RequestFailed,
        }
    }
}

impl ActionKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::SetLoading => "SET_LOADING",
            Self::GetUsers => "GET_USERS",
            Self::GetUser => "GET_USER",
            Self::GetRepos => "GET_REPOS",
            Self::ClearUsers => "CLEAR_USERS",
            Self::RequestFailed => "REQUEST_FAILED",
        }
    }

    /// Whether this action ends an operation that began with `SetLoading`.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::SetLoading)
    }
}
