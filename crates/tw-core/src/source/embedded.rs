//! Migrations registered in code.

use super::MigrationSource;
use crate::error::{CoreError, CoreResult};
use crate::migration::Migration;
use crate::migration_name::MigrationName;
use std::collections::BTreeMap;
use std::sync::Arc;

/// In-process registry of [`Migration`] implementations.
///
/// Registration order does not matter; identifiers are always listed in
/// lexicographic order.
#[derive(Default, Clone)]
pub struct EmbeddedSource {
    migrations: BTreeMap<MigrationName, Arc<dyn Migration>>,
}

impl EmbeddedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `migration` under `name`.
    pub fn register<M>(&mut self, name: MigrationName, migration: M) -> CoreResult<&mut Self>
    where
        M: Migration + 'static,
    {
        if self.migrations.contains_key(&name) {
            return Err(CoreError::DuplicateMigration {
                name: name.into_inner(),
                path1: "<embedded>".to_string(),
                path2: "<embedded>".to_string(),
            });
        }
        self.migrations.insert(name, Arc::new(migration));
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }
}

impl MigrationSource for EmbeddedSource {
    fn list_available(&self) -> CoreResult<Vec<MigrationName>> {
        Ok(self.migrations.keys().cloned().collect())
    }

    fn load(&self, name: &MigrationName) -> CoreResult<Arc<dyn Migration>> {
        self.migrations
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::MigrationNotFound {
                name: name.to_string(),
            })
    }
}

impl std::fmt::Debug for EmbeddedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddedSource")
            .field("migrations", &self.migrations.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::FnMigration;

    fn noop() -> FnMigration {
        FnMigration::new(|_| {})
    }

    #[test]
    fn test_registration_order_does_not_matter() {
        let mut source = EmbeddedSource::new();
        source
            .register(MigrationName::new("A_001"), noop())
            .unwrap()
            .register(MigrationName::new("A_003"), noop())
            .unwrap()
            .register(MigrationName::new("A_002"), noop())
            .unwrap();
        assert_eq!(source.len(), 3);
        assert_eq!(
            source.list_available().unwrap(),
            vec!["A_001", "A_002", "A_003"]
        );
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut source = EmbeddedSource::new();
        source.register(MigrationName::new("m"), noop()).unwrap();
        assert!(source.register(MigrationName::new("m"), noop()).is_err());
    }

    #[test]
    fn test_load_unknown() {
        let source = EmbeddedSource::new();
        assert!(source.is_empty());
        assert!(matches!(
            source.load(&MigrationName::new("missing")),
            Err(CoreError::MigrationNotFound { .. })
        ));
    }
}
