use super::*;
use crate::state::{ChangedFields, Field};
use shared::domain::{Repo, User};

fn octocat() -> User {
    User::new(1, "octocat")
}

fn loaded_state() -> AppState {
    AppState {
        users: vec![User::new(10, "alice")],
        user: Some(User::new(11, "bob")),
        repos: vec![Repo::new(20, "dotfiles")],
        loading: false,
        error: None,
    }
}

fn replay(initial: AppState, actions: &[Action]) -> AppState {
    actions
        .iter()
        .cloned()
        .fold(initial, |state, action| reduce(state, action))
}

#[test]
fn initial_state_is_idle_and_empty() {
    let state = AppState::default();
    assert!(state.users.is_empty());
    assert!(state.user.is_none());
    assert!(state.repos.is_empty());
    assert!(!state.loading);
    assert!(state.error.is_none());
}

#[test]
fn set_loading_only_touches_loading() {
    let before = loaded_state();
    let after = reduce(before.clone(), Action::SetLoading);
    assert_eq!(
        after,
        AppState {
            loading: true,
            ..before
        }
    );
}

#[test]
fn every_result_action_releases_loading() {
    let results = [
        Action::GetUsers(vec![octocat()]),
        Action::GetUser(octocat()),
        Action::GetRepos(vec![Repo::new(1, "hello-world")]),
        Action::ClearUsers,
        Action::RequestFailed("boom".to_string()),
    ];

    for action in results {
        let loading = reduce(loaded_state(), Action::SetLoading);
        assert!(loading.loading);
        let kind = action.kind();
        let done = reduce(loading, action);
        assert!(!done.loading, "{} left loading set", kind.name());
    }
}

#[test]
fn clear_users_empties_users_regardless_of_prior_state() {
    let priors = [
        AppState::default(),
        loaded_state(),
        reduce(loaded_state(), Action::SetLoading),
    ];
    for prior in priors {
        let cleared = reduce(prior.clone(), Action::ClearUsers);
        assert!(cleared.users.is_empty());
        assert_eq!(cleared.user, prior.user);
        assert_eq!(cleared.repos, prior.repos);
    }
}

#[test]
fn get_users_replaces_wholesale() {
    let state = AppState {
        users: vec![User::new(1, "a")],
        ..AppState::default()
    };
    let next = reduce(
        state,
        Action::GetUsers(vec![User::new(2, "b"), User::new(3, "c")]),
    );
    let logins: Vec<_> = next.users.iter().map(|u| u.login.as_str()).collect();
    assert_eq!(logins, ["b", "c"]);
}

#[test]
fn user_and_repos_slots_are_independent() {
    let state = reduce(loaded_state(), Action::GetUser(octocat()));
    assert_eq!(state.repos, loaded_state().repos);

    let state = reduce(state, Action::GetRepos(Vec::new()));
    assert_eq!(state.user, Some(octocat()));
    assert!(state.repos.is_empty());
}

#[test]
fn failure_keeps_previous_data_and_success_clears_error() {
    let failed = reduce(
        reduce(loaded_state(), Action::SetLoading),
        Action::RequestFailed("network down".to_string()),
    );
    assert_eq!(failed.error.as_deref(), Some("network down"));
    assert_eq!(failed.users, loaded_state().users);
    assert_eq!(failed.repos, loaded_state().repos);

    let recovered = reduce(failed, Action::GetUsers(vec![octocat()]));
    assert_eq!(recovered.error, None);
}

#[test]
fn search_scenario_from_idle_state() {
    let initial = AppState::default();

    let loading = reduce(initial.clone(), Action::SetLoading);
    assert_eq!(
        loading,
        AppState {
            loading: true,
            ..initial.clone()
        }
    );

    let done = reduce(loading, Action::GetUsers(vec![octocat()]));
    assert_eq!(
        done,
        AppState {
            users: vec![octocat()],
            user: None,
            repos: Vec::new(),
            loading: false,
            error: None,
        }
    );
}

#[test]
fn replay_is_deterministic() {
    let actions = vec![
        Action::SetLoading,
        Action::GetUsers(vec![octocat(), User::new(2, "hubot")]),
        Action::SetLoading,
        Action::GetUser(octocat()),
        Action::SetLoading,
        Action::RequestFailed("timeout".to_string()),
        Action::ClearUsers,
        Action::SetLoading,
        Action::GetRepos(vec![Repo::new(5, "linguist")]),
    ];

    let first = replay(AppState::default(), &actions);
    let second = replay(AppState::default(), &actions);
    assert_eq!(first, second);
    assert!(first.users.is_empty());
    assert_eq!(first.user, Some(octocat()));
    assert!(!first.loading);
}

#[test]
fn changed_fields_track_exactly_the_touched_slots() {
    let before = loaded_state();
    let after = reduce(before.clone(), Action::SetLoading);
    let changed = ChangedFields::between(&before, &after);
    assert!(changed.contains(Field::Loading));
    assert!(!changed.touches_any(&[Field::Users, Field::User, Field::Repos, Field::Error]));

    let unchanged = ChangedFields::between(&after, &reduce(after.clone(), Action::SetLoading));
    assert!(unchanged.is_empty());

    let mut merged = ChangedFields::default();
    merged.merge(changed);
    merged.merge(unchanged);
    assert_eq!(merged, changed);
    assert!(ChangedFields::all().touches_any(&[Field::Error]));
}
