mod config;
pub mod database;

pub use config::Config;
pub use database::Database;

use std::path::PathBuf;
use std::sync::Mutex;

/// Key-value persistence contract.
///
/// The reminder scheduler treats this store as the source of truth for
/// what should be scheduled but does not own habit persistence itself.
/// Failures inside an implementation surface as `None`/no-op -- the store
/// is a collaborator, not a place for the scheduler to fail from.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

// `Connection` is Send but not Sync, so shared kv access goes through a
// mutex-wrapped database handle.
impl KvStore for Mutex<Database> {
    fn get(&self, key: &str) -> Option<String> {
        let db = self.lock().unwrap_or_else(|e| e.into_inner());
        match db.kv_get(key) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(key, error = %e, "kv read failed");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        let db = self.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = db.kv_set(key, value) {
            tracing::warn!(key, error = %e, "kv write failed");
        }
    }

    fn remove(&self, key: &str) {
        let db = self.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = db.kv_remove(key) {
            tracing::warn!(key, error = %e, "kv remove failed");
        }
    }
}

/// Returns `~/.config/habitflow[-dev]/` based on HABITFLOW_ENV.
///
/// Set HABITFLOW_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("HABITFLOW_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("habitflow-dev")
    } else {
        base_dir.join("habitflow")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
