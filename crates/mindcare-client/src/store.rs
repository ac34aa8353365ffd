use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ClientError;
use crate::session::Session;

/// Current store version. Bump this when changing the on-disk shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

const FILE_NAME: &str = "session.json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    store_version: u32,
    session: Session,
}

/// Persists one [`Session`] as a JSON file so it survives between runs.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/mindcare/session.json`.
    pub fn default_location() -> Result<Self, ClientError> {
        let base = dirs::data_dir()
            .ok_or_else(|| ClientError::Store("no data directory found".to_string()))?;
        Ok(Self::new(base.join("mindcare").join(FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the stored session, or `None` if nothing has been saved.
    pub fn load(&self) -> Result<Option<Session>, ClientError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            ClientError::Store(format!("failed to read {}: {e}", self.path.display()))
        })?;

        // Parse as raw JSON so we can run migrations before deserializing.
        let json: serde_json::Value = serde_json::from_str(&contents)?;
        let on_disk_version = json
            .get("store_version")
            .and_then(|v| v.as_u64())
            .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
            .unwrap_or(0);

        let migrated = migrate(json, on_disk_version)?;
        let stored: StoredSession = serde_json::from_value(migrated)?;
        Ok(Some(stored.session))
    }

    /// Load the stored session or start a new one.
    pub fn load_or_new(&self) -> Result<Session, ClientError> {
        Ok(self.load()?.unwrap_or_default())
    }

    pub fn save(&self, session: &Session) -> Result<(), ClientError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;

        let stored = StoredSession {
            store_version: CURRENT_VERSION,
            session: session.clone(),
        };
        let json = serde_json::to_string_pretty(&stored)?;

        // Write to a temp file then rename for atomicity
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json.as_bytes())?;

        // The file holds personal details; keep it private on Unix.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
        }

        std::fs::rename(&tmp_path, &self.path)?;

        info!(path = %self.path.display(), session_id = %session.id, "session saved");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), ClientError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            info!(path = %self.path.display(), "session cleared");
        }
        Ok(())
    }
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(json: serde_json::Value, from_version: u32) -> Result<serde_json::Value, ClientError> {
    if from_version > CURRENT_VERSION {
        return Err(ClientError::Store(format!(
            "store_version {from_version} is newer than this build supports ({CURRENT_VERSION})"
        )));
    }

    let mut json = json;

    // v0 → v1: the session object was stored bare, without a version envelope.
    if from_version < 1 {
        if !json.is_object() {
            return Err(ClientError::Store("session file is not a JSON object".to_string()));
        }
        json = serde_json::json!({
            "store_version": 1,
            "session": json,
        });
        info!("migrated session store v0 → v1 (added version envelope)");
    }

    Ok(json)
}
