//! Discovery of YAML migration files in a directory.

use super::file::MigrationFile;
use super::MigrationSource;
use crate::error::{CoreError, CoreResult};
use crate::migration::Migration;
use crate::migration_name::MigrationName;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Migration files (`*.yml` / `*.yaml`) in a single, non-recursive directory.
///
/// The identifier of a migration is its file stem, so
/// `20240101120000_create_users.yml` is recorded as
/// `20240101120000_create_users`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `name`.
    pub fn path_of(&self, name: &MigrationName) -> CoreResult<PathBuf> {
        self.scan()?
            .remove(name)
            .ok_or_else(|| CoreError::MigrationNotFound {
                name: name.to_string(),
            })
    }

    fn scan(&self) -> CoreResult<BTreeMap<MigrationName, PathBuf>> {
        if !self.dir.is_dir() {
            return Err(CoreError::MigrationsDirNotFound {
                path: self.dir.display().to_string(),
            });
        }

        let io_err = |e| CoreError::IoWithPath {
            path: self.dir.display().to_string(),
            source: e,
        };

        let mut found: BTreeMap<MigrationName, PathBuf> = BTreeMap::new();
        for entry in std::fs::read_dir(&self.dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.is_dir() || !path.extension().is_some_and(|e| e == "yml" || e == "yaml") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                log::warn!("Skipping migration file with non UTF-8 name: {}", path.display());
                continue;
            };
            if stem.starts_with('.') {
                continue;
            }
            let Some(name) = MigrationName::try_new(stem) else {
                continue;
            };
            if let Some(existing) = found.get(&name) {
                return Err(CoreError::DuplicateMigration {
                    name: name.into_inner(),
                    path1: existing.display().to_string(),
                    path2: path.display().to_string(),
                });
            }
            found.insert(name, path);
        }
        Ok(found)
    }
}

impl MigrationSource for DirectorySource {
    fn list_available(&self) -> CoreResult<Vec<MigrationName>> {
        Ok(self.scan()?.into_keys().collect())
    }

    fn load(&self, name: &MigrationName) -> CoreResult<Arc<dyn Migration>> {
        let path = self.path_of(name)?;
        log::debug!("Loading migration {} from {}", name, path.display());
        Ok(Arc::new(MigrationFile::load(&path)?))
    }
}
