// SPDX-License-Identifier: MIT OR Apache-2.0

//! The process environment is layered over whichever source was selected.

mod common;

use common::{env, write_env_file, RecordingSecretManager};
use envsettings::adapters::{EnvVarAdapter, PayloadAdapter};
use envsettings::domain::{ConfigError, ConfigKey, ConfigurationService};
use envsettings::service::{DefaultConfigService, SettingsLoader};
use tempfile::TempDir;

#[test]
fn test_environment_overrides_local_file() {
    let dir = TempDir::new().unwrap();
    write_env_file(
        dir.path(),
        "SECRET_KEY=file-key\nDEBUG=true\nTIME_ZONE=UTC\n",
    );

    let settings = SettingsLoader::new(dir.path())
        .with_environment(env(&[("DEBUG", "no"), ("TIME_ZONE", "Europe/Madrid")]))
        .load()
        .unwrap();

    assert_eq!(settings.secret_key, "file-key");
    assert!(!settings.debug);
    assert_eq!(settings.time_zone, "Europe/Madrid");
}

#[test]
fn test_environment_overrides_secret_payload() {
    let dir = TempDir::new().unwrap();
    let secrets = RecordingSecretManager::returning(
        "SECRET_KEY=remote\nDATABASE_URL=postgres://u:p@db:5432/remote\n",
    );

    let settings = SettingsLoader::new(dir.path())
        .with_environment(env(&[
            ("GOOGLE_CLOUD_PROJECT", "proj"),
            ("DATABASE_URL", "mysql://u:p@localhost:3306/local"),
        ]))
        .with_secret_manager(Box::new(secrets))
        .load()
        .unwrap();

    assert_eq!(settings.secret_key, "remote");
    assert_eq!(settings.database.name, "local");
    assert_eq!(settings.database.engine.backend(), "django.db.backends.mysql");
}

#[test]
fn test_blank_environment_value_does_not_fall_through() {
    // A blank exported value shadows the file and then reads as unset.
    let dir = TempDir::new().unwrap();
    write_env_file(dir.path(), "SECRET_KEY=k\nLANGUAGE_CODE=en-us\n");

    let settings = SettingsLoader::new(dir.path())
        .with_environment(env(&[("LANGUAGE_CODE", "")]))
        .load()
        .unwrap();

    assert_eq!(settings.language_code, "es-es");
}

#[test]
fn test_proxy_flag_from_environment() {
    let dir = TempDir::new().unwrap();
    write_env_file(
        dir.path(),
        "SECRET_KEY=k\nDATABASE_URL=postgres://u:p@%2Fcloudsql%2Fproj:r:i/app\n",
    );

    let settings = SettingsLoader::new(dir.path())
        .with_environment(env(&[("USE_CLOUD_SQL_AUTH_PROXY", "true")]))
        .load()
        .unwrap();

    assert_eq!(settings.database.host, "127.0.0.1");
    assert_eq!(settings.database.port, "5432");
}

#[test]
fn test_service_lookup_order() {
    let service = DefaultConfigService::builder()
        .with_source(Box::new(
            PayloadAdapter::parse("env-file", "A=file\nB=file\n").unwrap(),
        ))
        .with_source(Box::new(EnvVarAdapter::with_values(env(&[("A", "env")]))))
        .build()
        .unwrap();

    assert_eq!(service.source_names(), vec!["env", "env-file"]);
    assert_eq!(service.get(&ConfigKey::from("A")).unwrap().as_str(), "env");
    assert_eq!(service.get(&ConfigKey::from("B")).unwrap().as_str(), "file");
    assert!(matches!(
        service.get(&ConfigKey::from("C")),
        Err(ConfigError::ConfigKeyNotFound { .. })
    ));
}
