use super::*;

use std::{
    env,
    sync::atomic::{AtomicUsize, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

static NEXT_FILE: AtomicUsize = AtomicUsize::new(0);

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

fn temp_settings_file(contents: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let n = NEXT_FILE.fetch_add(1, Ordering::Relaxed);
    let path = env::temp_dir().join(format!("github_finder_settings_{suffix}_{n}.toml"));
    fs::write(&path, contents).expect("write settings");
    path
}

#[test]
fn defaults_apply_without_file_or_env() {
    let settings = load_settings_from(Path::new("/nonexistent/github_finder.toml"), env_from(&[]));
    assert_eq!(settings.api_url, DEFAULT_API_URL);
    assert_eq!(settings.token, None);
    assert!(settings.user_agent.starts_with("github-finder/"));
}

#[test]
fn environment_overrides_settings_file() {
    let path = temp_settings_file("api_url = \"http://file.example\"\ntoken = \"file-token\"\n");

    let settings = load_settings_from(
        &path,
        env_from(&[("GITHUB_TOKEN", "env-token"), ("APP__GITHUB_URL", "http://env.example")]),
    );

    assert_eq!(settings.api_url, "http://env.example");
    assert_eq!(settings.token.as_deref(), Some("env-token"));

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn blank_values_do_not_override() {
    let path = temp_settings_file("token = \"file-token\"\n");

    let settings = load_settings_from(&path, env_from(&[("GITHUB_TOKEN", "   "), ("GITHUB_URL", "")]));

    assert_eq!(settings.api_url, DEFAULT_API_URL);
    assert_eq!(settings.token.as_deref(), Some("file-token"));

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn malformed_settings_file_falls_back_to_defaults() {
    let path = temp_settings_file("this is = = not toml");

    let settings = load_settings_from(&path, env_from(&[]));
    assert_eq!(settings, GatewaySettings::default());

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn debug_output_redacts_token() {
    let settings = GatewaySettings::default().with_token("ghp_secret");
    let rendered = format!("{settings:?}");
    assert!(!rendered.contains("ghp_secret"), "token leaked: {rendered}");
    assert!(rendered.contains("<redacted>"));
}

#[test]
fn cli_overrides_ignore_blank_input() {
    let settings = GatewaySettings::default()
        .with_api_url(" ")
        .with_token("");
    assert_eq!(settings, GatewaySettings::default());
}
