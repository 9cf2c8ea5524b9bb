// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property-based tests using proptest.
//!
//! These cover value coercion, connection URL parsing and host policy over
//! arbitrary inputs.

use envsettings::domain::{ConfigKey, ConfigValue, SecretVersionName};
use envsettings::settings::{DatabaseConfig, DatabaseEngine, HostPolicy};
use proptest::prelude::*;
use url::Url;

// Keys keep their text exactly
proptest! {
    #[test]
    fn test_config_key_from_any_string(s in "\\PC*") {
        let key = ConfigKey::from(s.clone());
        prop_assert_eq!(key.as_str(), s.as_str());
    }
}

// Recognized boolean literals parse regardless of case and padding
proptest! {
    #[test]
    fn test_bool_literals(
        literal in prop::sample::select(vec![
            "true", "yes", "y", "on", "ok", "1", "false", "no", "n", "off", "0",
        ]),
        upper in prop::bool::ANY,
        pad in "[ \t]{0,3}",
    ) {
        let expected = matches!(literal, "true" | "yes" | "y" | "on" | "ok" | "1");
        let text = if upper { literal.to_uppercase() } else { literal.to_string() };
        let value = ConfigValue::from(format!("{pad}{text}{pad}"));
        prop_assert_eq!(value.as_bool("DEBUG").unwrap(), expected);
    }
}

// Anything outside the literal sets is rejected
proptest! {
    #[test]
    fn test_bool_rejects_other_words(s in "[a-z]{3,12}") {
        prop_assume!(!["true", "yes", "false", "off"].contains(&s.as_str()));
        prop_assert!(ConfigValue::from(s).as_bool("DEBUG").is_err());
    }
}

// Whitespace lists never contain empty or padded entries
proptest! {
    #[test]
    fn test_list_entries_are_clean(
        items in prop::collection::vec("[a-z0-9.*-]{1,20}", 0..8),
        sep in "[ \t\n]{1,4}",
    ) {
        let value = ConfigValue::from(items.join(&sep));
        prop_assert_eq!(value.as_list(), items);
    }
}

// Integer values survive surrounding whitespace
proptest! {
    #[test]
    fn test_port_parsing(port in prop::num::u16::ANY, pad in " {0,3}") {
        let value = ConfigValue::from(format!("{pad}{port}{pad}"));
        prop_assert_eq!(value.parse::<u16>("DB_PORT").unwrap(), port);
    }
}

// Credentials with reserved characters decode back to the original text
proptest! {
    #[test]
    fn test_database_url_decodes_credentials(
        user in "[a-zA-Z0-9_]{1,12}",
        password in "[a-zA-Z0-9@:/?#%+ ]{1,16}",
        host in "[a-z][a-z0-9-]{0,15}",
        port in 1u16..,
        name in "[a-z_]{1,12}",
    ) {
        let encoded: String = password
            .bytes()
            .map(|b| {
                if b.is_ascii_alphanumeric() {
                    (b as char).to_string()
                } else {
                    format!("%{:02X}", b)
                }
            })
            .collect();
        let url = format!("postgresql://{user}:{encoded}@{host}:{port}/{name}");

        let db = DatabaseConfig::from_url(&url).unwrap();
        prop_assert_eq!(db.engine, DatabaseEngine::Postgresql);
        prop_assert_eq!(db.user, user);
        prop_assert_eq!(db.password, password);
        prop_assert_eq!(db.host, host);
        prop_assert_eq!(db.port, port.to_string());
        prop_assert_eq!(db.name, name);
    }
}

// SQLite URLs keep the whole path, spaces included
proptest! {
    #[test]
    fn test_sqlite_path_kept_whole(
        segments in prop::collection::vec("[a-zA-Z0-9 _.-]{1,10}", 1..5),
    ) {
        let path = format!("/{}", segments.join("/"));
        let db = DatabaseConfig::from_url(&format!("sqlite://{path}")).unwrap();
        prop_assert_eq!(db.engine, DatabaseEngine::Sqlite);
        prop_assert_eq!(db.name, path);
    }
}

// Unsupported schemes are always rejected
proptest! {
    #[test]
    fn test_unknown_scheme_rejected(scheme in "[a-z]{2,10}") {
        prop_assume!(DatabaseEngine::from_scheme(&scheme).is_none());
        let url = format!("{scheme}://user:pw@host/db");
        prop_assert!(DatabaseConfig::from_url(&url).is_err());
    }
}

// A service URL always yields exactly one allowed host
proptest! {
    #[test]
    fn test_service_url_single_host(
        host in "[a-z][a-z0-9-]{0,20}(\\.[a-z]{2,6}){1,3}",
        port in prop::option::of(1024u16..),
        path in "(/[a-z]{1,8}){0,3}",
    ) {
        let raw = match port {
            Some(p) => format!("https://{host}:{p}{path}"),
            None => format!("https://{host}{path}"),
        };
        let url = Url::parse(&raw).unwrap();
        let policy = HostPolicy::for_service_url(&url, &raw);

        prop_assert_eq!(policy.allowed_hosts.len(), 1);
        let expected = match port {
            Some(p) => format!("{host}:{p}"),
            None => host.clone(),
        };
        prop_assert!(policy.allowed_hosts.contains(&expected));
        prop_assert_eq!(policy.csrf_trusted_origins, vec![raw]);
    }
}

// Secret names follow the fixed layout
proptest! {
    #[test]
    fn test_secret_version_name_layout(
        project in "[a-z][a-z0-9-]{4,28}",
        secret in "[A-Za-z0-9_-]{1,40}",
    ) {
        let name = SecretVersionName::latest(&project, &secret).unwrap();
        prop_assert_eq!(
            name.to_string(),
            format!("projects/{project}/secrets/{secret}/versions/latest")
        );
    }
}
