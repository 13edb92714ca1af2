//! Named, reusable sets of run options.

use crate::config::ProfileValues;
use crate::error::Result;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the profile store in the home directory.
pub const PROFILE_FILENAME: &str = "doorplate_profiles.json";

/// Profile the most recent run is recorded under.
pub const LATEST_PROFILE: &str = "latest";

/// Profile written by `profile init`.
pub const DEFAULT_PROFILE: &str = "default";

/// Storage for named option sets.
pub trait ProfileStore {
    /// Load a profile. `Ok(None)` if it does not exist.
    fn load(&self, name: &str) -> Result<Option<ProfileValues>>;

    /// Create or replace a profile.
    fn save(&mut self, name: &str, values: &ProfileValues) -> Result<()>;

    /// Names of all stored profiles, sorted.
    fn names(&self) -> Result<Vec<String>>;
}

/// Profiles kept in one JSON object, keyed by profile name.
#[derive(Debug, Clone)]
pub struct JsonProfileStore {
    path: PathBuf,
}

impl JsonProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the user's home directory, if one can be determined.
    pub fn in_home_dir() -> Option<Self> {
        std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .filter(|home| !home.is_empty())
            .map(|home| Self::new(Path::new(&home).join(PROFILE_FILENAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, ProfileValues>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl ProfileStore for JsonProfileStore {
    fn load(&self, name: &str) -> Result<Option<ProfileValues>> {
        Ok(self.read_all()?.remove(name))
    }

    fn save(&mut self, name: &str, values: &ProfileValues) -> Result<()> {
        let mut profiles = self.read_all()?;
        profiles.insert(name.to_string(), values.clone());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&profiles)?)?;

        log::info!("Stored profile '{}' under '{}'", name, self.path.display());
        Ok(())
    }

    fn names(&self) -> Result<Vec<String>> {
        Ok(self.read_all()?.into_keys().collect())
    }
}

/// Profiles held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryProfileStore {
    profiles: BTreeMap<String, ProfileValues>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for MemoryProfileStore {
    fn load(&self, name: &str) -> Result<Option<ProfileValues>> {
        Ok(self.profiles.get(name).cloned())
    }

    fn save(&mut self, name: &str, values: &ProfileValues) -> Result<()> {
        self.profiles.insert(name.to_string(), values.clone());
        Ok(())
    }

    fn names(&self) -> Result<Vec<String>> {
        Ok(self.profiles.keys().cloned().collect())
    }
}
