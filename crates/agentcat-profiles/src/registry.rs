//! Profile registry over a directory of YAML definitions

use agentcat_types::{is_plain_name, CatalogError, Profile, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Profiles directory name under the catalog root
pub const PROFILES_DIR: &str = "profiles";

const EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// Registry of profile definitions
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    /// Directory holding one definition per file
    directory: PathBuf,
}

impl ProfileRegistry {
    /// Registry over an explicit directory
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Registry over `<catalog_root>/profiles`
    pub fn for_catalog(catalog_root: &Path) -> Self {
        Self::new(catalog_root.join(PROFILES_DIR))
    }

    /// Directory being scanned
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Load every parseable profile, keyed (and ordered) by name
    pub fn load_all(&self) -> Result<BTreeMap<String, Profile>> {
        let mut profiles = BTreeMap::new();

        if !self.directory.is_dir() {
            debug!("Profiles directory does not exist: {:?}", self.directory);
            return Ok(profiles);
        }

        for path in self.definition_files()? {
            let profile = match read_profile(&path) {
                Ok(profile) => profile,
                Err(e) => {
                    warn!("Skipping profile {:?}: {}", path, e);
                    continue;
                }
            };

            if profiles.contains_key(&profile.name) {
                warn!(
                    "Duplicate profile name '{}' in {:?}, keeping the first definition",
                    profile.name, path
                );
                continue;
            }

            debug!("Loaded profile: {} from {:?}", profile.name, path);
            profiles.insert(profile.name.clone(), profile);
        }

        info!("Loaded {} profiles", profiles.len());
        Ok(profiles)
    }

    /// Load one profile by name
    ///
    /// Looks for `<name>.yaml` first, then for any definition whose `name`
    /// field matches.
    pub fn load_one(&self, name: &str) -> Result<Profile> {
        if !is_plain_name(name) {
            warn!("Refusing profile name with path components: {:?}", name);
            return Err(CatalogError::ProfileNotFound(name.to_string()));
        }

        for ext in EXTENSIONS {
            let path = self.directory.join(format!("{name}.{ext}"));
            if path.is_file() {
                let profile = read_profile(&path)?;
                if profile.name == name {
                    return Ok(profile);
                }
                debug!(
                    "{:?} declares name '{}', searching other definitions",
                    path, profile.name
                );
            }
        }

        self.load_all()?
            .remove(name)
            .ok_or_else(|| CatalogError::ProfileNotFound(name.to_string()))
    }

    /// Definition files sorted by file name
    fn definition_files(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.directory).map_err(CatalogError::fs(&self.directory))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_definition = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| EXTENSIONS.contains(&e));
            if path.is_file() && is_definition {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }
}

fn read_profile(path: &Path) -> Result<Profile> {
    let content = fs::read_to_string(path).map_err(CatalogError::fs(path))?;
    parse_profile(&content).map_err(|e| match e {
        CatalogError::InvalidProfile { reason, .. } => CatalogError::InvalidProfile {
            path: path.to_path_buf(),
            reason,
        },
        other => other,
    })
}

/// Parse and validate one YAML profile definition
pub fn parse_profile(content: &str) -> Result<Profile> {
    let profile: Profile = serde_yaml::from_str(content)?;

    if profile.name.trim().is_empty() {
        return Err(CatalogError::InvalidProfile {
            path: PathBuf::new(),
            reason: "profile name cannot be empty".into(),
        });
    }

    Ok(profile)
}
