//! Whole-document read-modify-write of the persisted JSON stores.
//!
//! Three stores share this engine: the detailed store and the summary store
//! hold one slot per `(os, runMode)` key in a nested object, the run index
//! holds a flat key-deduplicated entry list. Each invocation owns its files
//! exclusively; a merge only ever touches its own slot.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use crate::error::{ReportError, Result};
use crate::{OsName, RunMode};

/// Fresh nested-store document: one entry per known OS, both run-mode slots
/// empty.
pub fn run_store_skeleton() -> Value {
    let mut doc = serde_json::Map::new();
    for os in OsName::ALL {
        doc.insert(os.as_str().to_string(), json!({"quick": null, "full": null}));
    }
    Value::Object(doc)
}

/// Fresh run-index document.
pub fn index_skeleton() -> Value {
    json!({"schemaVersion": 1, "entries": []})
}

/// Reads a store document, tolerating a byte-order mark. `Ok(None)` when the
/// file does not exist yet.
pub fn read_json_file(path: &Path) -> Result<Option<Value>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ReportError::io(path, e)),
    };
    let text = raw.strip_prefix('\u{feff}').unwrap_or(&raw);
    serde_json::from_str(text)
        .map(Some)
        .map_err(|e| ReportError::json(path, e))
}

/// Serializes and overwrites a store document, creating parent directories.
pub fn write_json_file(path: &Path, doc: &Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| ReportError::io(parent, e))?;
        }
    }
    let text = serde_json::to_string_pretty(doc)?;
    fs::write(path, text).map_err(|e| ReportError::io(path, e))
}

/// Versioned-shape check, run once per load before any merge.
///
/// A missing or null OS entry becomes a fresh `{quick, full}` pair. An entry
/// that is not an object with a `quick` field is the legacy single-run shape
/// from before the run-mode dimension existed; the legacy payload was a
/// publish-quality run, so it is preserved under `full` with `quick` left
/// empty.
pub fn normalize_os_slots(doc: &mut Value) {
    if !doc.is_object() {
        *doc = run_store_skeleton();
        return;
    }
    for os in OsName::ALL {
        let key = os.as_str();
        if matches!(doc.get(key), None | Some(Value::Null)) {
            doc[key] = json!({"quick": null, "full": null});
            continue;
        }
        let is_current_shape = doc[key]
            .as_object()
            .map_or(false, |obj| obj.contains_key("quick"));
        if !is_current_shape {
            let legacy = doc[key].take();
            doc[key] = json!({"quick": null, "full": legacy});
        }
    }
}

/// Replaces the `(os, runMode)` slot with the new payload. Full replacement,
/// no field-level merging; other slots are untouched.
pub fn merge_run(doc: &mut Value, os: OsName, run_mode: RunMode, payload: Value) {
    doc[os.as_str()][run_mode.as_str()] = payload;
}

/// Replaces any index entry with the same `(os, runMode)` key and appends the
/// new entry last. Order among the other entries is preserved.
pub fn merge_index_entry(doc: &mut Value, os: OsName, run_mode: RunMode, entry: Value) {
    if !doc.is_object() {
        *doc = index_skeleton();
    }
    let entries = doc
        .as_object_mut()
        .and_then(|obj| {
            if !matches!(obj.get("entries"), Some(Value::Array(_))) {
                obj.insert("entries".to_string(), Value::Array(Vec::new()));
            }
            obj.get_mut("entries")
        })
        .and_then(Value::as_array_mut);
    if let Some(entries) = entries {
        entries.retain(|e| {
            !(e.get("os").and_then(Value::as_str) == Some(os.as_str())
                && e.get("runMode").and_then(Value::as_str) == Some(run_mode.as_str()))
        });
        entries.push(entry);
    }
}

/// Read-modify-write of one nested store file.
pub fn update_run_store(path: &Path, os: OsName, run_mode: RunMode, payload: Value) -> Result<()> {
    let mut doc = read_json_file(path)?.unwrap_or_else(run_store_skeleton);
    normalize_os_slots(&mut doc);
    merge_run(&mut doc, os, run_mode, payload);
    write_json_file(path, &doc)
}

/// Read-modify-write of the run-index file.
pub fn update_index_store(path: &Path, os: OsName, run_mode: RunMode, entry: Value) -> Result<()> {
    let mut doc = read_json_file(path)?.unwrap_or_else(index_skeleton);
    merge_index_entry(&mut doc, os, run_mode, entry);
    write_json_file(path, &doc)
}
