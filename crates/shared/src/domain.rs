use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);
    };
}

id_newtype!(UserId);
id_newtype!(RepoId);

/// Reads an explicit `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A GitHub account as returned by the users and search endpoints.
///
/// Search results only carry the summary fields, so the counters default to zero.
/// Anything the API sends beyond the named fields is kept in `extra` and written
/// back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub login: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub avatar_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub html_url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub followers: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub following: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub public_repos: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn new(id: u64, login: impl Into<String>) -> Self {
        Self {
            id: UserId(id),
            login: login.into(),
            avatar_url: String::new(),
            html_url: String::new(),
            name: None,
            location: None,
            bio: None,
            followers: 0,
            following: 0,
            public_repos: 0,
            extra: Map::new(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.login)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repo {
    pub id: RepoId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub html_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stargazers_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub forks_count: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Repo {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: RepoId(id),
            name: name.into(),
            description: None,
            html_url: String::new(),
            stargazers_count: 0,
            forks_count: 0,
            extra: Map::new(),
        }
    }
}
