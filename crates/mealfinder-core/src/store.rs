use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::models::IngredientRecord;
use crate::{Error, Result};

/// Name of the slot the browser app used; kept so pantries can be copied over
pub const DEFAULT_SLOT: &str = "mf_ingredients";

/// Persistence for the whole pantry as a single blob
///
/// `load` never fails: anything unreadable comes back as an empty pantry.
/// `save` always replaces the previous contents.
pub trait IngredientStore: Send + Sync {
    fn load(&self) -> Vec<IngredientRecord>;
    fn save(&self, records: &[IngredientRecord]) -> Result<()>;
}

/// Decode a slot, skipping entries that don't look like a record
fn decode_slot(raw: &str) -> Result<Vec<IngredientRecord>> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| Error::StorageCorrupted(e.to_string()))?;

    let serde_json::Value::Array(entries) = value else {
        return Err(Error::StorageCorrupted("expected a JSON array".into()));
    };

    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<IngredientRecord>(entry) {
            Ok(record) => records.push(record),
            Err(e) => warn!("Skipping malformed ingredient #{}: {}", index, e),
        }
    }
    Ok(records)
}

fn encode_slot(records: &[IngredientRecord]) -> Result<String> {
    Ok(serde_json::to_string(records)?)
}

/// Pantry kept as `<dir>/<slot>.json`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl AsRef<Path>, slot: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", slot)),
        }
    }

    /// `<data_dir>/mealfinder`, XDG on Linux and AppData on Windows
    pub fn default_dir() -> Result<PathBuf> {
        Ok(dirs::data_dir()
            .ok_or_else(|| Error::Config("Could not find data directory".into()))?
            .join("mealfinder"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Strict read; `load` is the forgiving wrapper around this
    pub fn read_slot(&self) -> Result<Vec<IngredientRecord>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No pantry at {} yet", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(Error::StorageCorrupted(e.to_string())),
        };
        decode_slot(&raw)
    }
}

impl IngredientStore for JsonFileStore {
    fn load(&self) -> Vec<IngredientRecord> {
        self.read_slot().unwrap_or_else(|e| {
            warn!("Ignoring pantry at {}: {}", self.path.display(), e);
            Vec::new()
        })
    }

    fn save(&self, records: &[IngredientRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Write aside then rename so a crash never leaves half a pantry
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, encode_slot(records)?)?;
        std::fs::rename(&tmp, &self.path)?;

        debug!("Saved {} ingredients to {}", records.len(), self.path.display());
        Ok(())
    }
}

/// In-process slot, same encoding as the file store
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an arbitrary blob, corrupt or not
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl IngredientStore for MemoryStore {
    fn load(&self) -> Vec<IngredientRecord> {
        let Some(raw) = self.raw() else {
            return Vec::new();
        };
        decode_slot(&raw).unwrap_or_else(|e| {
            warn!("Ignoring in-memory pantry: {}", e);
            Vec::new()
        })
    }

    fn save(&self, records: &[IngredientRecord]) -> Result<()> {
        let encoded = encode_slot(records)?;
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(encoded);
        Ok(())
    }
}
