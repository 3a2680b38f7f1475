// Configuration loading tests.

use anyhow::Result;
use interview_rooms::Config;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_config_from_toml() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("interview-rooms.toml");

    fs::write(
        &path,
        r#"
[service]
name = "interview-rooms"

[service.http]
bind = "127.0.0.1"
port = 8087

[rooms]
default_countdown_secs = 2700
connect_timeout_secs = 10
token_base_url = "https://rooms.example.daily.co"
token_latency_ms = 300

[directory]
lookup_latency_ms = 300
"#,
    )?;

    let base = dir.path().join("interview-rooms");
    let cfg = Config::load(base.to_str().unwrap())?;

    assert_eq!(cfg.service.name, "interview-rooms");
    assert_eq!(cfg.service.http.bind, "127.0.0.1");
    assert_eq!(cfg.service.http.port, 8087);
    assert_eq!(cfg.rooms.default_countdown_secs, 2700);
    assert_eq!(cfg.rooms.connect_timeout_secs, 10);
    assert_eq!(cfg.rooms.token_base_url, "https://rooms.example.daily.co");
    assert_eq!(cfg.directory.lookup_latency_ms, 300);

    Ok(())
}

#[test]
fn test_missing_config_file_is_an_error() {
    let result = Config::load("config/does-not-exist");
    assert!(result.is_err());
}
