use serde::{Deserialize, Serialize};

use crate::domain::User;

/// Page size used for the repository listing.
pub const REPOS_PER_PAGE: u32 = 10;

/// Envelope returned by `GET /search/users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchUsersResponse {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    pub items: Vec<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchUsersQuery {
    pub q: String,
}

/// Query for `GET /users/{login}/repos`: newest first, one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListReposQuery {
    pub sort: &'static str,
    pub per_page: u32,
}

impl Default for ListReposQuery {
    fn default() -> Self {
        Self {
            sort: "created",
            per_page: REPOS_PER_PAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_listing_asks_for_newest_ten() {
        let encoded = serde_json::to_value(ListReposQuery::default()).expect("encode");
        assert_eq!(encoded, serde_json::json!({ "sort": "created", "per_page": 10 }));
    }

    #[test]
    fn search_envelope_tolerates_missing_counters() {
        let response: SearchUsersResponse =
            serde_json::from_str(r#"{"items":[{"id":1,"login":"octocat"}]}"#).expect("decode");
        assert_eq!(response.total_count, 0);
        assert_eq!(response.items[0].login, "octocat");
    }
}
