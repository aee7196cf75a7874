use qcdt_monitor::config::Config;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn config_file_resolves_into_runtime_settings() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("config.toml");
    fs::write(
        &path,
        r#"
[telegram]
bot_token = "123:ABC"
chat_id = -100

[schedule]
timezone = "Asia/Dubai"
nag_window = { start = "18:00", end = "20:30" }
nag_interval_secs = 600
nag_kickoff = "0 18 * * Mon-Fri"

[messages]
product = "QCDT-B"

[holidays]
countries = [{ label = "Singapore", code = "SG" }]
"#,
    )
    .unwrap();

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.config_path, path);

    let monitor = config.monitor_settings().unwrap();
    assert_eq!(monitor.nag_window.end.to_string(), "20:30:00");
    assert_eq!(monitor.messages.product, "QCDT-B");
    assert_eq!(monitor.holiday_countries.len(), 1);

    let schedule = config.schedule_settings().unwrap();
    assert_eq!(schedule.nag_every, Duration::from_secs(600));
    assert_eq!(schedule.check_every, Duration::from_secs(120));
}
