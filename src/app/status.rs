use qcdt_monitor::config::Config;

pub fn render_status(config: &Config) -> String {
    let s = &config.schedule;
    let mut lines = vec![
        "◆ qcdt-monitor status".to_string(),
        String::new(),
        format!("Version     {}", env!("CARGO_PKG_VERSION")),
        format!("Config      {}", config.config_path.display()),
        String::new(),
        format!("Endpoint    {} (timeout {}s)", config.endpoint.url, config.endpoint.timeout_secs),
        format!("Chat        {}", config.telegram.chat_id),
        format!(
            "Bot token   {}",
            if config.require_bot_token().is_ok() {
                "set"
            } else {
                "missing"
            }
        ),
        format!("Timezone    {}", s.timezone),
        format!(
            "Checks      {}-{} every {}s",
            s.check_window.start, s.check_window.end, s.check_interval_secs
        ),
        format!(
            "Nags        {}-{} every {}s (kickoff \"{}\")",
            s.nag_window.start, s.nag_window.end, s.nag_interval_secs, s.nag_kickoff
        ),
        format!("Reset       \"{}\"", s.daily_reset),
    ];

    if config.holidays.enabled {
        let codes: Vec<&str> = config
            .holidays
            .countries
            .iter()
            .map(|c| c.code.as_str())
            .collect();
        lines.push(format!(
            "Holidays    {} at \"{}\"",
            codes.join(", "),
            s.holiday_summary
        ));
    } else {
        lines.push("Holidays    disabled".to_string());
    }

    lines.push(String::new());
    match config.validate() {
        Ok(()) => lines.push("Config check: ok".to_string()),
        Err(e) => lines.push(format!("Config check: {e}")),
    }

    lines.join("\n")
}
