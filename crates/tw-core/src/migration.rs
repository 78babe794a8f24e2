//! The migration definition contract.

use crate::schema::Schema;

/// A migration body.
///
/// `up` describes the change through the table builder DSL. `down` is only
/// consulted by an explicit rollback and defaults to doing nothing.
pub trait Migration: Send + Sync {
    fn up(&self, schema: &mut Schema);

    fn down(&self, schema: &mut Schema) {
        let _ = schema;
    }
}

type Body = Box<dyn Fn(&mut Schema) + Send + Sync>;

/// A migration assembled from closures.
///
/// ```
/// use tw_core::migration::{FnMigration, Migration};
/// use tw_core::schema::Schema;
///
/// let m = FnMigration::new(|s| {
///     s.create_table("users", |t| {
///         t.id("id");
///     });
/// })
/// .with_down(|s| {
///     s.drop_table_if_exists("users");
/// });
///
/// let mut schema = Schema::new();
/// m.up(&mut schema);
/// assert_eq!(schema.ops().len(), 1);
/// ```
pub struct FnMigration {
    up: Body,
    down: Option<Body>,
}

impl FnMigration {
    pub fn new<F>(up: F) -> Self
    where
        F: Fn(&mut Schema) + Send + Sync + 'static,
    {
        Self {
            up: Box::new(up),
            down: None,
        }
    }

    pub fn with_down<F>(mut self, down: F) -> Self
    where
        F: Fn(&mut Schema) + Send + Sync + 'static,
    {
        self.down = Some(Box::new(down));
        self
    }
}

impl Migration for FnMigration {
    fn up(&self, schema: &mut Schema) {
        (self.up)(schema)
    }

    fn down(&self, schema: &mut Schema) {
        if let Some(down) = &self.down {
            down(schema)
        }
    }
}

impl std::fmt::Debug for FnMigration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnMigration")
            .field("has_down", &self.down.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_down_is_empty() {
        let m = FnMigration::new(|s| {
            s.raw("SELECT 1");
        });
        let mut schema = Schema::new();
        m.down(&mut schema);
        assert!(schema.is_empty());
    }

    #[test]
    fn test_each_invocation_gets_a_fresh_schema() {
        let m = FnMigration::new(|s| {
            s.create_table("t", |t| {
                t.text("a");
            });
        });
        let mut first = Schema::new();
        let mut second = Schema::new();
        m.up(&mut first);
        m.up(&mut second);
        assert_eq!(first.ops(), second.ops());
        assert_eq!(first.ops().len(), 1);
    }
}
