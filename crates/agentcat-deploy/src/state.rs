//! Load and save the project-state record

use agentcat_types::{CatalogError, ProjectState, Result, CONFIG_DIR};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Record file name under the project config root
pub const STATE_FILE: &str = "project-profile.yaml";

/// The `project-profile.yaml` of one project
#[derive(Debug, Clone)]
pub struct ProjectStateStore {
    path: PathBuf,
}

impl ProjectStateStore {
    pub fn for_project(project_root: &Path) -> Self {
        Self {
            path: project_root.join(CONFIG_DIR).join(STATE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when the project was never deployed
    pub fn load(&self) -> Result<Option<ProjectState>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CatalogError::fs(&self.path)(e)),
        };

        Ok(Some(serde_yaml::from_str(&content)?))
    }

    /// Replace the record as a whole
    ///
    /// Written to a sibling file first and renamed over the old record.
    pub fn save(&self, state: &ProjectState) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(CatalogError::fs(dir))?;
        }

        let yaml = serde_yaml::to_string(state)?;
        let staging = self.path.with_extension("yaml.tmp");
        fs::write(&staging, yaml).map_err(CatalogError::fs(&staging))?;
        fs::rename(&staging, &self.path).map_err(CatalogError::fs(&self.path))?;

        debug!("Saved project state to {:?}", self.path);
        Ok(())
    }
}
