//! Integration tests for the Nao admin commands.
//!
//! Runs the command layer against throwaway database files.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use clap::Parser;
use nao::cli::{
    open_store, run_create, run_delete, run_get, run_list, run_reset, run_status, run_update,
};
use nao::{Cli, CliError, Commands, Config, execute};
use nao_core::{EntityKind, NaoError, Store};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::{TempDir, tempdir};

/// Serializes tests that go through `execute`, which reads NAO_DATABASE.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn fresh_store() -> (TempDir, Store) {
    let temp = tempdir().unwrap();
    let config = Config {
        database: temp.path().join("nao.redb"),
        create_buckets: true,
    };
    let store = open_store(&config).unwrap();
    (temp, store)
}

fn write_json(dir: &Path, name: &str, value: &serde_json::Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_vec(value).unwrap()).unwrap();
    path
}

// =============================================================================
// ARGUMENT PARSING
// =============================================================================

#[test]
fn test_parse_kind_and_id() {
    let cli = Cli::try_parse_from(["nao", "get", "media-producer", "3"]).unwrap();
    match cli.command {
        Some(Commands::Get { kind, id }) => {
            assert_eq!(kind, EntityKind::MediaProducer);
            assert_eq!(id, 3);
        }
        other => panic!("unexpected command {:?}", other),
    }
}

#[test]
fn test_parse_rejects_unknown_kind() {
    assert!(Cli::try_parse_from(["nao", "list", "jwt"]).is_err());
}

#[test]
fn test_parse_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "nao",
        "update",
        "media",
        "-f",
        "m.json",
        "--checked",
        "--json-mode",
        "-D",
        "x.redb",
    ])
    .unwrap();
    assert!(cli.json_mode);
    assert_eq!(cli.database, Some(PathBuf::from("x.redb")));
    assert!(matches!(
        cli.command,
        Some(Commands::Update { checked: true, .. })
    ));
}

// =============================================================================
// RECORD COMMANDS
// =============================================================================

#[test]
fn test_create_get_list_delete() {
    let (temp, store) = fresh_store();
    let file = write_json(
        temp.path(),
        "media.json",
        &json!([
            { "Titles": { "en": "Cowboy Bebop" }, "Type": "TV" },
            { "Titles": { "en": "Trigun" } }
        ]),
    );

    let created = run_create(&store, EntityKind::Media, &file).unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(created[0]["ID"], 1);
    assert_eq!(created[1]["ID"], 2);
    assert_eq!(created[0]["Version"], 0);

    let fetched = run_get(&store, EntityKind::Media, 1).unwrap();
    assert_eq!(fetched["Titles"]["en"], "Cowboy Bebop");

    run_delete(&store, EntityKind::Media, 1).unwrap();
    run_delete(&store, EntityKind::Media, 1).unwrap();

    let listed = run_list(&store, EntityKind::Media).unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["ID"], 2);
}

#[test]
fn test_create_reports_missing_reference() {
    let (temp, store) = fresh_store();
    let file = write_json(
        temp.path(),
        "credit.json",
        &json!({ "MediaID": 1, "ProducerID": 99 }),
    );

    let err = run_create(&store, EntityKind::MediaProducer, &file).unwrap_err();
    assert!(matches!(
        err,
        CliError::Nao(NaoError::MissingReference {
            field: "MediaID",
            ..
        })
    ));
    assert_eq!(
        run_list(&store, EntityKind::MediaProducer).unwrap(),
        json!([])
    );
}

#[test]
fn test_checked_update_conflict() {
    let (temp, store) = fresh_store();
    let genre = write_json(
        temp.path(),
        "genre.json",
        &json!({ "Names": [{ "Data": "Action", "Language": "en" }] }),
    );
    run_create(&store, EntityKind::Genre, &genre).unwrap();

    let edit = write_json(
        temp.path(),
        "edit.json",
        &json!({ "ID": 1, "Version": 0, "Names": [{ "Data": "Drama", "Language": "en" }] }),
    );
    let updated = run_update(&store, EntityKind::Genre, &edit, true).unwrap();
    assert_eq!(updated[0]["Version"], 1);

    let err = run_update(&store, EntityKind::Genre, &edit, true).unwrap_err();
    assert!(matches!(
        err,
        CliError::Nao(NaoError::VersionConflict { .. })
    ));

    let blind = run_update(&store, EntityKind::Genre, &edit, false).unwrap();
    assert_eq!(blind[0]["Version"], 2);
}

#[test]
fn test_bad_input_names_the_file() {
    let (temp, store) = fresh_store();
    let path = temp.path().join("broken.json");
    std::fs::write(&path, b"{ not json").unwrap();

    let err = run_create(&store, EntityKind::Media, &path).unwrap_err();
    assert!(matches!(err, CliError::Input { .. }));
    assert!(err.to_string().contains("broken.json"));

    let missing = run_create(&store, EntityKind::Media, &temp.path().join("nope.json"));
    assert!(matches!(missing, Err(CliError::Io { .. })));
}

#[test]
fn test_get_missing_is_not_found() {
    let (_temp, store) = fresh_store();
    let err = run_get(&store, EntityKind::Episode, 4).unwrap_err();
    assert!(matches!(err, CliError::Nao(ref e) if e.is_not_found()));
}

// =============================================================================
// STATUS AND RESET
// =============================================================================

#[test]
fn test_status_counts_every_bucket() {
    let (temp, store) = fresh_store();
    let file = write_json(temp.path(), "person.json", &json!([{}, {}, {}]));
    run_create(&store, EntityKind::Person, &file).unwrap();
    run_delete(&store, EntityKind::Person, 2).unwrap();

    let rows = run_status(&store).unwrap();
    assert_eq!(rows.len(), EntityKind::ALL.len());
    let person = rows
        .iter()
        .find(|(kind, _, _)| *kind == EntityKind::Person)
        .unwrap();
    assert_eq!((person.1, person.2), (2, 3));
}

#[test]
fn test_reset_requires_force() {
    let (temp, store) = fresh_store();
    let file = write_json(temp.path(), "genre.json", &json!({}));
    run_create(&store, EntityKind::Genre, &file).unwrap();

    assert!(matches!(
        run_reset(&store, false),
        Err(CliError::Refused(_))
    ));
    assert_eq!(
        run_list(&store, EntityKind::Genre).unwrap(),
        json!([{ "ID": 1, "Names": [], "Descriptions": [], "Version": 0 }])
    );

    run_reset(&store, true).unwrap();
    assert_eq!(run_list(&store, EntityKind::Genre).unwrap(), json!([]));
}

// =============================================================================
// EXECUTE
// =============================================================================

#[test]
fn test_init_refuses_existing_database() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let temp = tempdir().unwrap();
    let db = temp.path().join("nao.redb");
    let db_arg = db.to_string_lossy().into_owned();

    execute(Cli::try_parse_from(["nao", "-q", "-D", db_arg.as_str(), "init"]).unwrap()).unwrap();
    assert!(db.exists());

    let again = execute(Cli::try_parse_from(["nao", "-q", "-D", db_arg.as_str(), "init"]).unwrap());
    assert!(matches!(again, Err(CliError::Refused(_))));

    execute(Cli::try_parse_from(["nao", "-q", "-D", db_arg.as_str(), "init", "--force"]).unwrap())
        .unwrap();
}

#[test]
fn test_config_file_supplies_database() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let temp = tempdir().unwrap();
    let db = temp.path().join("from-config.redb");
    let config_path = temp.path().join("nao.toml");
    std::fs::write(
        &config_path,
        format!("database = {:?}\ncreate_buckets = true\n", db.to_string_lossy()),
    )
    .unwrap();
    let config_arg = config_path.to_string_lossy().into_owned();

    // SAFETY: env access is serialized by ENV_MUTEX.
    unsafe { std::env::remove_var("NAO_DATABASE") };
    execute(Cli::try_parse_from(["nao", "-q", "-c", config_arg.as_str(), "status"]).unwrap())
        .unwrap();
    assert!(db.exists());
}
