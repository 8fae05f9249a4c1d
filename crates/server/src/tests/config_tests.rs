use super::{load_settings_from, normalize_database_url, Settings};

use std::collections::HashMap;

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

#[test]
fn defaults_apply_without_file_or_env() {
    let settings = load_settings_from(None, env_of(&[]));
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.database_url, storage::DEFAULT_DATABASE_URL);
    assert_eq!(settings.roster().expect("roster").size(), 31);
}

#[test]
fn file_values_override_defaults() {
    let file = r#"
bind_addr = "0.0.0.0:9000"
database_url = "sqlite://./var/bracket.db"
roster_size = 41
"#;
    let settings = load_settings_from(Some(file), env_of(&[]));
    assert_eq!(settings.server_bind, "0.0.0.0:9000");
    assert_eq!(settings.database_url, "sqlite://./var/bracket.db");
    assert_eq!(settings.roster().expect("roster").max_rounds(), 6);
}

#[test]
fn env_overrides_file_and_prefixed_names_win() {
    let file = "bind_addr = \"0.0.0.0:9000\"\nroster_size = 41\n";
    let settings = load_settings_from(
        Some(file),
        env_of(&[
            ("SERVER_BIND", "127.0.0.1:1111"),
            ("APP__BIND_ADDR", "127.0.0.1:2222"),
            ("APP__ROSTER_SIZE", "16"),
        ]),
    );
    assert_eq!(settings.server_bind, "127.0.0.1:2222");
    assert_eq!(settings.roster_size, 16);
}

#[test]
fn unparsable_roster_size_is_ignored() {
    let settings = load_settings_from(None, env_of(&[("APP__ROSTER_SIZE", "lots")]));
    assert_eq!(settings.roster_size, 31);
}

#[test]
fn degenerate_roster_size_is_reported() {
    for size in ["1", "1025", "4294967295"] {
        let settings = load_settings_from(None, env_of(&[("APP__ROSTER_SIZE", size)]));
        assert!(settings.roster().is_err(), "size {size} should be rejected");
    }
}

#[test]
fn normalizes_plain_file_path_to_sqlite_url() {
    assert_eq!(
        normalize_database_url("./data/test.db"),
        "sqlite://./data/test.db"
    );
    assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
    assert_eq!(
        normalize_database_url("  "),
        Settings::default().database_url
    );
}

#[test]
fn keeps_windows_absolute_path_with_single_sqlite_colon() {
    assert_eq!(
        normalize_database_url("sqlite:C:\\Users\\alice\\test.db"),
        "sqlite:C:/Users/alice/test.db"
    );
    assert_eq!(
        normalize_database_url("sqlite://C:/Users/alice/test.db"),
        "sqlite:C:/Users/alice/test.db"
    );
}

#[tokio::test]
async fn normalized_plain_path_opens_sqlite_file_in_new_directory() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("nested").join("server.db");

    let database_url = normalize_database_url(db_path.to_string_lossy().as_ref());
    let storage = storage::Storage::new(&database_url).await.expect("open sqlite");
    storage.close().await;

    assert!(
        db_path.exists(),
        "database file should be created: {}",
        db_path.display()
    );
}
