use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::store::schema::PreferencesData;

const PREFERENCES_FILE: &str = "preferences.json";

/// Durable string key-value storage.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Preferences kept in a JSON file under the data directory.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)
            .with_context(|| format!("creating {}", base_dir.display()))?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// A missing file is an empty store; an unreadable or unparsable one is
    /// an error so callers can report it.
    fn load(&self) -> Result<PreferencesData> {
        let path = self.file_path(PREFERENCES_FILE);
        if !path.exists() {
            return Ok(PreferencesData::default());
        }
        let content =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let data: PreferencesData = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        if data.needs_reset() {
            tracing::warn!(
                found = data.schema_version,
                "preferences schema changed, starting fresh"
            );
            return Ok(PreferencesData::default());
        }
        Ok(data)
    }

    /// Write to a temp file and rename over the original.
    fn save(&self, data: &PreferencesData) -> Result<()> {
        let path = self.file_path(PREFERENCES_FILE);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Start from an empty map when the existing file cannot be read, so a
    /// corrupt file is replaced rather than blocking every write.
    fn load_for_update(&self) -> PreferencesData {
        self.load().unwrap_or_else(|err| {
            tracing::warn!("discarding unreadable preferences: {err:#}");
            PreferencesData::default()
        })
    }
}

impl PreferenceStore for JsonStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut data = self.load_for_update();
        data.values.insert(key.to_string(), value.to_string());
        self.save(&data)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut data = self.load_for_update();
        if data.values.remove(key).is_some() {
            self.save(&data)?;
        }
        Ok(())
    }
}

/// In-process store, used when no data directory is available.
#[derive(Default)]
pub struct MemoryStore {
    values: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}
