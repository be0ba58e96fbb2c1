use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::utils::app_data_dir;

use super::{DocumentKind, DocumentStore, Result};

const DATA_DIR: &str = "data";
const STATE_FILE: &str = "state.json";
const TMP_SUFFIX: &str = "tmp";

/// File-backed document store keeping each collection in its own JSON file
/// under `<base>/data/`. Writes go through a temp file and a rename so a
/// crash never leaves a half-written document behind.
#[derive(Clone)]
pub struct JsonStorage {
    data_dir: PathBuf,
    state_file: PathBuf,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let base = root.unwrap_or_else(app_data_dir);
        ensure_dir(&base)?;
        let data_dir = base.join(DATA_DIR);
        ensure_dir(&data_dir)?;
        Ok(Self {
            data_dir,
            state_file: base.join(STATE_FILE),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn document_path(&self, kind: DocumentKind) -> PathBuf {
        self.data_dir.join(kind.file_name())
    }

    /// When the last successful write happened, if ever.
    pub fn last_sync(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.read_state()?.last_sync)
    }

    fn record_sync(&self) -> Result<()> {
        let mut state = self.read_state()?;
        state.last_sync = Some(Utc::now());
        let data = serde_json::to_string_pretty(&state)?;
        write_atomic(&self.state_file, &data)?;
        Ok(())
    }

    fn read_state(&self) -> Result<StoreState> {
        if self.state_file.exists() {
            let data = fs::read_to_string(&self.state_file)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(StoreState::default())
        }
    }
}

impl DocumentStore for JsonStorage {
    fn load(&self, kind: DocumentKind) -> Result<Option<serde_json::Value>> {
        let path = self.document_path(kind);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    fn save(&self, kind: DocumentKind, value: &serde_json::Value, message: &str) -> Result<()> {
        tracing::debug!(document = kind.name(), message, "saving document");
        let json = serde_json::to_string_pretty(value)?;
        let path = self.document_path(kind);
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        self.record_sync()?;
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    last_sync: Option<DateTime<Utc>>,
}

fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
