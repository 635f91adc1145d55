use std::{env, time::Duration};

use clickup_proxy::{AppConfig, StartupError};
use serial_test::serial;

const KEYS: [&str; 3] = ["PORT", "HOST", "UPSTREAM_TIMEOUT_SECS"];

fn clear_env() {
    for key in KEYS {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn from_env_uses_defaults() {
    clear_env();
    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.port, 3000);
    assert_eq!(config.upstream_base, "https://api.clickup.com/api/v2");
}

#[test]
#[serial]
fn from_env_reads_port_and_timeout() {
    clear_env();
    env::set_var("PORT", "4321");
    env::set_var("UPSTREAM_TIMEOUT_SECS", "5");

    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.port, 4321);
    assert_eq!(config.upstream_timeout, Duration::from_secs(5));

    clear_env();
}

#[test]
#[serial]
fn from_env_rejects_bad_port() {
    clear_env();
    env::set_var("PORT", "99999");

    let err = AppConfig::from_env().unwrap_err();
    assert!(matches!(err, StartupError::InvalidValue { key: "PORT", .. }));
    assert!(err.to_string().contains("99999"));

    clear_env();
}

#[test]
#[serial]
fn from_env_reads_only_the_process_environment() {
    let dotenv_path = std::path::Path::new(".env");
    if dotenv_path.exists() {
        // a developer .env is present; leave it alone
        return;
    }
    clear_env();
    std::fs::write(dotenv_path, "PORT=5555\n").unwrap();

    let result = AppConfig::from_env();
    std::fs::remove_file(dotenv_path).unwrap();

    assert_eq!(result.unwrap().port, 3000);
    assert!(env::var("PORT").is_err());
}
