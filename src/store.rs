use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};

use crate::models::ImportantDate;
use crate::settings::Settings;

/// Cache key for the important-dates page.
pub const DATES_CACHE_KEY: &str = "important_dates";
pub const SETTINGS_KEY: &str = "settings";

/// JSON files under one directory, one file per key.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    // Ok(None) when nothing has been written under `key` yet
    fn load<T: DeserializeOwned>(&self, key: &str) -> io::Result<Option<T>> {
        let text = match fs::read_to_string(self.path_for(key)) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        let value =
            serde_json::from_str(&text).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(Some(value))
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> io::Result<()> {
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        fs::create_dir_all(&self.dir)?;
        fs::write(&tmp_path, text)?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn load_important_dates(&self) -> io::Result<Vec<ImportantDate>> {
        Ok(self.load(DATES_CACHE_KEY)?.unwrap_or_default())
    }

    pub fn save_important_dates(&self, dates: &[ImportantDate]) -> io::Result<()> {
        self.save(DATES_CACHE_KEY, &dates)
    }

    pub fn load_settings(&self) -> io::Result<Option<Settings>> {
        self.load(SETTINGS_KEY)
    }

    pub fn save_settings(&self, settings: &Settings) -> io::Result<()> {
        self.save(SETTINGS_KEY, settings)
    }
}
