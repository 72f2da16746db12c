//! Text and JSON rendering of store snapshots.

use std::fmt::Write as _;

use client_core::{AppState, ChangedFields, Field};
use serde::Serialize;
use shared::domain::{Repo, User};

#[derive(Debug, Clone, Copy, Default)]
pub struct View {
    pub json: bool,
}

impl View {
    pub fn users(&self, users: &[User]) -> String {
        if self.json {
            return to_json(&users);
        }
        if users.is_empty() {
            return "no users".to_string();
        }
        let mut out = String::new();
        for user in users {
            let _ = writeln!(out, "{:<24} {}", user.login, user.html_url);
        }
        out.trim_end().to_string()
    }

    pub fn user(&self, user: &User) -> String {
        if self.json {
            return to_json(user);
        }
        let mut out = format!("{} (@{})\n", user.display_name(), user.login);
        if let Some(location) = &user.location {
            let _ = writeln!(out, "  location: {location}");
        }
        if let Some(bio) = &user.bio {
            let _ = writeln!(out, "  bio: {}", bio.trim());
        }
        let _ = writeln!(
            out,
            "  followers: {}  following: {}  public repos: {}",
            user.followers, user.following, user.public_repos
        );
        let _ = write!(out, "  profile: {}", user.html_url);
        out
    }

    pub fn repos(&self, repos: &[Repo]) -> String {
        if self.json {
            return to_json(&repos);
        }
        if repos.is_empty() {
            return "no repositories".to_string();
        }
        let mut out = String::from("Latest repos\n");
        for repo in repos {
            let _ = write!(
                out,
                "  {:<32} stars: {:<6} forks: {:<6}",
                repo.name, repo.stargazers_count, repo.forks_count
            );
            if let Some(description) = repo.description.as_deref().filter(|d| !d.is_empty()) {
                let _ = write!(out, " {description}");
            }
            out.push('\n');
        }
        out.trim_end().to_string()
    }

    pub fn state(&self, state: &AppState) -> String {
        if self.json {
            return to_json(state);
        }
        let mut out = format!(
            "loading: {}  users: {}  user: {}  repos: {}",
            state.loading,
            state.users.len(),
            state.user.as_ref().map_or("-", |u| u.login.as_str()),
            state.repos.len()
        );
        if let Some(error) = &state.error {
            let _ = write!(out, "\nerror: {error}");
        }
        out
    }

    pub fn not_found(&self, login: &str, route: &str) -> String {
        if self.json {
            return to_json(&serde_json::json!({ "login": login, "redirect": route }));
        }
        format!("user '{login}' not found -> {route}")
    }

    /// Renders only the slots whose content changed since the last render.
    pub fn changes(&self, state: &AppState, changed: ChangedFields) -> Vec<String> {
        let mut sections = Vec::new();
        if changed.contains(Field::Users) {
            sections.push(self.users(&state.users));
        }
        if changed.contains(Field::User) {
            if let Some(user) = &state.user {
                sections.push(self.user(user));
            }
        }
        if changed.contains(Field::Repos) {
            sections.push(self.repos(&state.repos));
        }
        if changed.contains(Field::Error) {
            if let Some(error) = &state.error {
                sections.push(format!("error: {error}"));
            }
        }
        sections
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\":\"failed to encode output: {e}\"}}"))
}
