use std::{collections::HashMap, fmt, fs, path::Path};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const SETTINGS_FILE: &str = "github_finder.toml";

/// Connection settings for [`crate::gateway::HttpGateway`], resolved once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct GatewaySettings {
    pub api_url: String,
    pub token: Option<String>,
    pub user_agent: String,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            token: None,
            user_agent: concat!("github-finder/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl fmt::Debug for GatewaySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewaySettings")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl GatewaySettings {
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        if let Some(v) = non_empty(api_url.into()) {
            self.api_url = v;
        }
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        if let Some(v) = non_empty(token.into()) {
            self.token = Some(v);
        }
        self
    }
}

pub fn load_settings() -> GatewaySettings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file, then the environment. Later layers win and
/// blank values never override.
pub fn load_settings_from(
    file: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> GatewaySettings {
    let mut settings = GatewaySettings::default();

    if let Ok(raw) = fs::read_to_string(file) {
        match toml::from_str::<HashMap<String, String>>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("api_url").cloned().and_then(non_empty) {
                    settings.api_url = v;
                }
                if let Some(v) = file_cfg.get("token").cloned().and_then(non_empty) {
                    settings.token = Some(v);
                }
                if let Some(v) = file_cfg.get("user_agent").cloned().and_then(non_empty) {
                    settings.user_agent = v;
                }
            }
            Err(err) => {
                tracing::warn!(file = %file.display(), error = %err, "ignoring unreadable settings file");
            }
        }
    }

    for key in ["GITHUB_URL", "APP__GITHUB_URL"] {
        if let Some(v) = env(key).and_then(non_empty) {
            settings.api_url = v;
        }
    }

    for key in ["GITHUB_TOKEN", "APP__GITHUB_TOKEN"] {
        if let Some(v) = env(key).and_then(non_empty) {
            settings.token = Some(v);
        }
    }

    if let Some(v) = env("APP__USER_AGENT").and_then(non_empty) {
        settings.user_agent = v;
    }

    settings
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
