use super::*;

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn defaults_point_at_local_sqlite_file() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.database.url, DEFAULT_DATABASE_URL);
    assert_eq!(
        settings.database.max_connections.get(),
        DEFAULT_DB_MAX_CONNECTIONS
    );
    assert_eq!(settings.server.addr.port(), DEFAULT_PORT);
    assert_eq!(settings.site.timezone, Tz::UTC);
    assert!(settings.site.secret_key.is_none());
}

#[test]
fn blank_secret_key_is_treated_as_missing() {
    let mut raw = RawSettings::default();
    raw.site.secret_key = Some("   ".to_string());

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.site.secret_key.is_none());
}

#[test]
fn secret_key_is_redacted_in_debug_output() {
    let mut raw = RawSettings::default();
    raw.site.secret_key = Some("hunter2".to_string());

    let settings = Settings::from_raw(raw).expect("valid settings");
    let rendered = format!("{:?}", settings.site);

    assert!(!rendered.contains("hunter2"));
    assert!(rendered.contains("<redacted>"));
}

#[test]
fn unknown_timezone_is_rejected() {
    let mut raw = RawSettings::default();
    raw.site.timezone = Some("Mars/Olympus".to_string());

    let err = Settings::from_raw(raw).expect_err("invalid timezone");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "site.timezone",
            ..
        }
    ));
}

#[test]
fn cli_timezone_override_is_parsed() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        site_timezone: Some("Europe/Berlin".to_string()),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.site.timezone, Tz::Europe__Berlin);
}

#[test]
fn non_sqlite_database_url_is_rejected() {
    let mut raw = RawSettings::default();
    raw.database.url = Some("postgres://example".to_string());

    let err = Settings::from_raw(raw).expect_err("postgres url is not supported");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "database.url",
            ..
        }
    ));
}

#[test]
fn zero_port_is_rejected() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(0);

    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn zero_pool_size_is_rejected() {
    let mut raw = RawSettings::default();
    raw.database.max_connections = Some(0);

    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["inkpost"]);
    let command = args
        .command
        .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn parse_serve_overrides() {
    let args = CliArgs::parse_from([
        "inkpost",
        "serve",
        "--server-host",
        "0.0.0.0",
        "--database-url",
        "sqlite:///var/lib/inkpost/posts.db",
        "--log-json",
        "yes",
    ]);

    match args.command.expect("serve command") {
        Command::Serve(serve) => {
            assert_eq!(serve.overrides.server_host.as_deref(), Some("0.0.0.0"));
            assert_eq!(
                serve.overrides.database_url.as_deref(),
                Some("sqlite:///var/lib/inkpost/posts.db")
            );
            assert_eq!(serve.overrides.log_json, Some(true));
        }
    }
}
