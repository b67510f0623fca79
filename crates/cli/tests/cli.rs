use assert_cmd::Command;

#[test]
fn settings_command_prints_defaults_as_json() {
    let output = Command::cargo_bin("libris")
        .unwrap()
        .arg("settings")
        .env("LIBRIS_CONFIG_DIR", "/nonexistent/libris-config")
        .env("LIBRIS_ENV", "staging")
        .env_remove("LIBRIS_SERVER__PORT")
        .output()
        .unwrap();

    assert!(output.status.success());
    let settings: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(settings["environment"], "staging");
    assert_eq!(settings["server"]["port"], 8080);
    assert_eq!(settings["catalog"]["loan_period_days"], 14);
    assert_eq!(settings["catalog"]["error_mapping"], "legacy");
}

#[test]
fn env_vars_override_nested_settings() {
    let output = Command::cargo_bin("libris")
        .unwrap()
        .arg("settings")
        .env("LIBRIS_CONFIG_DIR", "/nonexistent/libris-config")
        .env("LIBRIS_SERVER__PORT", "9090")
        .env("LIBRIS_CATALOG__ERROR_MAPPING", "strict")
        .output()
        .unwrap();

    assert!(output.status.success());
    let settings: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(settings["server"]["port"], 9090);
    assert_eq!(settings["catalog"]["error_mapping"], "strict");
}

#[test]
fn unknown_environment_fails() {
    Command::cargo_bin("libris")
        .unwrap()
        .arg("settings")
        .env("LIBRIS_CONFIG_DIR", "/nonexistent/libris-config")
        .env("LIBRIS_ENV", "qa")
        .assert()
        .failure();
}
