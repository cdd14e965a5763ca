use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tauri::{AppHandle, Manager};
use thiserror::Error;

const SIGNATURES_FILE: &str = "signatures.json";

const SAMPLE_SIGNATURES: &str = r#"{
  "Work": "<p>--<br/>Best regards,<br/>The Team</p>",
  "Short": "<p>Thanks!</p>"
}
"#;

#[derive(Debug, Error, Serialize)]
pub enum BackendError {
    #[error("I/O error: {0}")]
    Io(String),
    #[error("invalid signatures file: {0}")]
    Parse(String),
    #[error("path error: {0}")]
    Path(String),
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Parse(err.to_string())
    }
}

fn signatures_path(config_dir: &Path) -> PathBuf {
    config_dir.join(SIGNATURES_FILE)
}

/// Seed a sample file the first time the app runs.
fn ensure_signatures_file(config_dir: &Path) -> Result<PathBuf, BackendError> {
    let path = signatures_path(config_dir);
    if !path.exists() {
        fs::create_dir_all(config_dir)?;
        fs::write(&path, SAMPLE_SIGNATURES)?;
    }
    Ok(path)
}

/// Wrap whatever the file holds in the `{ data: { signatures } }` envelope.
/// The shape of `signatures` is checked by the front end, not here.
fn envelope(signatures: Value) -> Value {
    json!({ "data": { "signatures": signatures } })
}

fn read_signatures(path: &Path) -> Result<Value, BackendError> {
    let raw = fs::read_to_string(path)?;
    if raw.trim().is_empty() {
        return Ok(envelope(Value::Object(Map::new())));
    }
    let parsed: Value = serde_json::from_str(&raw)?;
    Ok(envelope(parsed))
}

#[tauri::command]
fn get_user_signatures(app_handle: AppHandle) -> Result<Value, BackendError> {
    let config_dir = app_handle
        .path()
        .app_config_dir()
        .map_err(|e| BackendError::Path(e.to_string()))?;
    let path = ensure_signatures_file(&config_dir)?;
    read_signatures(&path)
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .invoke_handler(tauri::generate_handler![get_user_signatures])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
