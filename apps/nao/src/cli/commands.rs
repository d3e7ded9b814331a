//! # CLI Command Implementations
//!
//! Each `cmd_*` prints its result; the `run_*` helpers underneath return it
//! so they can be tested without capturing stdout.
//!
//! Commands that take an entity kind resolve it at runtime and reach the
//! typed service through [`EntityKind::dispatch`].

use super::CliError;
use crate::config::Config;
use nao_core::{Entity, EntityKind, Id, KindVisitor, Service, Store};
use serde_json::Value;
use std::path::{Path, PathBuf};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum size of a record input file (16 MB).
const MAX_INPUT_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Resolve `path` to an existing regular file no larger than the limit.
fn validate_input_file(path: &Path) -> Result<PathBuf, CliError> {
    let io = |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    };
    let canonical = path.canonicalize().map_err(io)?;
    let metadata = std::fs::metadata(&canonical).map_err(io)?;

    if !metadata.is_file() {
        return Err(CliError::Refused(format!(
            "'{}' is not a regular file",
            path.display()
        )));
    }
    if metadata.len() > MAX_INPUT_FILE_SIZE {
        return Err(CliError::Refused(format!(
            "'{}' is {} bytes, maximum is {}",
            path.display(),
            metadata.len(),
            MAX_INPUT_FILE_SIZE
        )));
    }
    Ok(canonical)
}

/// Read `path` as one JSON object or an array of them.
fn read_records(path: &Path) -> Result<Vec<Value>, CliError> {
    let path = validate_input_file(path)?;
    let bytes = std::fs::read(&path).map_err(|source| CliError::Io {
        path: path.clone(),
        source,
    })?;
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Array(records)) => Ok(records),
        Ok(record) => Ok(vec![record]),
        Err(source) => Err(CliError::Input { path, source }),
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value).map_err(CliError::Render)?;
    println!("{}", text);
    Ok(())
}

// =============================================================================
// KIND VISITORS
// =============================================================================

struct GetRecord<'a> {
    store: &'a Store,
    id: Id,
}

impl KindVisitor for GetRecord<'_> {
    type Output = Result<Value, CliError>;

    fn visit<E: Entity>(self) -> Self::Output {
        let record = Service::<E>::new(self.store.clone()).get_by_id(self.id)?;
        serde_json::to_value(record).map_err(CliError::Render)
    }
}

struct ListRecords<'a> {
    store: &'a Store,
}

impl KindVisitor for ListRecords<'_> {
    type Output = Result<Value, CliError>;

    fn visit<E: Entity>(self) -> Self::Output {
        let records = Service::<E>::new(self.store.clone()).get_all()?;
        serde_json::to_value(records).map_err(CliError::Render)
    }
}

/// How `WriteRecords` applies each input record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteMode {
    Create,
    Update,
    UpdateChecked,
}

/// Applies records one by one; stops at the first failure, keeping earlier
/// writes.
struct WriteRecords<'a> {
    store: &'a Store,
    path: &'a Path,
    records: Vec<Value>,
    mode: WriteMode,
}

impl KindVisitor for WriteRecords<'_> {
    type Output = Result<Vec<Value>, CliError>;

    fn visit<E: Entity>(self) -> Self::Output {
        let service = Service::<E>::new(self.store.clone());
        let mut written = Vec::with_capacity(self.records.len());
        for record in self.records {
            let entity: E = serde_json::from_value(record).map_err(|source| CliError::Input {
                path: self.path.to_path_buf(),
                source,
            })?;
            let stored = match self.mode {
                WriteMode::Create => service.create(entity)?,
                WriteMode::Update => service.update(entity)?,
                WriteMode::UpdateChecked => service.update_checked(entity)?,
            };
            written.push(serde_json::to_value(stored).map_err(CliError::Render)?);
        }
        Ok(written)
    }
}

struct DeleteRecord<'a> {
    store: &'a Store,
    id: Id,
}

impl KindVisitor for DeleteRecord<'_> {
    type Output = Result<(), CliError>;

    fn visit<E: Entity>(self) -> Self::Output {
        Service::<E>::new(self.store.clone()).delete(self.id)?;
        Ok(())
    }
}

// =============================================================================
// RUNNERS
// =============================================================================

/// Open the configured store.
pub fn open_store(config: &Config) -> Result<Store, CliError> {
    Ok(Store::open(&config.database, config.create_buckets)?)
}

/// The record of `kind` with `id`, as stored.
pub fn run_get(store: &Store, kind: EntityKind, id: u64) -> Result<Value, CliError> {
    kind.dispatch(GetRecord { store, id: Id(id) })
}

/// Every record of `kind`, as a JSON array in identifier order.
pub fn run_list(store: &Store, kind: EntityKind) -> Result<Value, CliError> {
    kind.dispatch(ListRecords { store })
}

/// Create every record in `file`; returns them with assigned identity.
pub fn run_create(store: &Store, kind: EntityKind, file: &Path) -> Result<Vec<Value>, CliError> {
    let records = read_records(file)?;
    kind.dispatch(WriteRecords {
        store,
        path: file,
        records,
        mode: WriteMode::Create,
    })
}

/// Update every record in `file`; returns them with their new versions.
pub fn run_update(
    store: &Store,
    kind: EntityKind,
    file: &Path,
    checked: bool,
) -> Result<Vec<Value>, CliError> {
    let records = read_records(file)?;
    let mode = if checked {
        WriteMode::UpdateChecked
    } else {
        WriteMode::Update
    };
    kind.dispatch(WriteRecords {
        store,
        path: file,
        records,
        mode,
    })
}

/// Delete the record of `kind` with `id`. Succeeds if it was already gone.
pub fn run_delete(store: &Store, kind: EntityKind, id: u64) -> Result<(), CliError> {
    kind.dispatch(DeleteRecord { store, id: Id(id) })
}

/// Per-bucket record count and last identifier handed out.
pub fn run_status(store: &Store) -> Result<Vec<(EntityKind, u64, u64)>, CliError> {
    store
        .counts()?
        .into_iter()
        .map(|(kind, count)| Ok((kind, count, store.sequence(kind)?)))
        .collect()
}

/// Drop every bucket. Refuses unless `force`.
pub fn run_reset(store: &Store, force: bool) -> Result<(), CliError> {
    if !force {
        return Err(CliError::Refused(
            "reset destroys every record. Use --force to confirm.".to_string(),
        ));
    }
    store.reset()?;
    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Initialize a new database with every bucket.
pub fn cmd_init(config: &Config, force: bool) -> Result<(), CliError> {
    let path = &config.database;
    if path.exists() {
        if !force {
            return Err(CliError::Refused(format!(
                "database {:?} already exists. Use --force to overwrite.",
                path
            )));
        }
        std::fs::remove_file(path).map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::warn!(path = %path.display(), "existing database removed");
    }

    Store::open(path, true)?;
    println!(
        "Initialized new database at {:?} ({} buckets)",
        path,
        Store::buckets().count()
    );
    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show record counts per bucket.
pub fn cmd_status(config: &Config, json_mode: bool) -> Result<(), CliError> {
    let store = open_store(config)?;
    let rows = run_status(&store)?;

    if json_mode {
        let buckets: serde_json::Map<String, Value> = rows
            .iter()
            .map(|(kind, count, sequence)| {
                (
                    kind.bucket().to_string(),
                    serde_json::json!({ "count": count, "sequence": sequence }),
                )
            })
            .collect();
        let output = serde_json::json!({
            "database": config.database.to_string_lossy(),
            "buckets": buckets,
        });
        return print_json(&output);
    }

    println!("Nao Database Status");
    println!("===================");
    println!("Database: {:?}", config.database);
    println!();
    println!("{:<16} {:>10} {:>10}", "Bucket", "Records", "Last ID");
    for (kind, count, sequence) in rows {
        println!("{:<16} {:>10} {:>10}", kind.bucket(), count, sequence);
    }

    Ok(())
}

// =============================================================================
// RECORD COMMANDS
// =============================================================================

/// Print one record.
pub fn cmd_get(config: &Config, kind: EntityKind, id: u64) -> Result<(), CliError> {
    let store = open_store(config)?;
    print_json(&run_get(&store, kind, id)?)
}

/// Print every record of a bucket.
pub fn cmd_list(config: &Config, kind: EntityKind) -> Result<(), CliError> {
    let store = open_store(config)?;
    print_json(&run_list(&store, kind)?)
}

/// Create records from a JSON file.
pub fn cmd_create(
    config: &Config,
    kind: EntityKind,
    file: &Path,
    json_mode: bool,
) -> Result<(), CliError> {
    tracing::info!(bucket = %kind, file = %file.display(), "creating records");
    let store = open_store(config)?;
    let created = run_create(&store, kind, file)?;
    report_written("Created", kind, created, json_mode)
}

/// Replace records from a JSON file.
pub fn cmd_update(
    config: &Config,
    kind: EntityKind,
    file: &Path,
    checked: bool,
    json_mode: bool,
) -> Result<(), CliError> {
    tracing::info!(bucket = %kind, file = %file.display(), checked, "updating records");
    let store = open_store(config)?;
    let updated = run_update(&store, kind, file, checked)?;
    report_written("Updated", kind, updated, json_mode)
}

fn report_written(
    verb: &str,
    kind: EntityKind,
    records: Vec<Value>,
    json_mode: bool,
) -> Result<(), CliError> {
    if json_mode {
        return print_json(&Value::Array(records));
    }
    for record in &records {
        println!(
            "{} {} {} (version {})",
            verb, kind, record["ID"], record["Version"]
        );
    }
    Ok(())
}

/// Delete one record.
pub fn cmd_delete(
    config: &Config,
    kind: EntityKind,
    id: u64,
    json_mode: bool,
) -> Result<(), CliError> {
    let store = open_store(config)?;
    run_delete(&store, kind, id)?;
    if json_mode {
        let output = serde_json::json!({ "deleted": { "kind": kind.bucket(), "id": id } });
        return print_json(&output);
    }
    println!("Deleted {} {}", kind, id);
    Ok(())
}

// =============================================================================
// RESET COMMAND
// =============================================================================

/// Drop and recreate every bucket.
pub fn cmd_reset(config: &Config, force: bool) -> Result<(), CliError> {
    let store = open_store(config)?;
    run_reset(&store, force)?;
    println!("Reset every bucket in {:?}", config.database);
    Ok(())
}
