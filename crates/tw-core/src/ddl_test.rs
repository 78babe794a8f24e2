use super::*;
use crate::schema::{OnDelete, TableBuilder};

fn table(name: &str, f: impl FnOnce(&mut TableBuilder)) -> TableDefinition {
    let mut builder = TableBuilder::new(name);
    f(&mut builder);
    builder.into_definition()
}

#[test]
fn test_not_null_default_attaches_to_first_column_only() {
    let def = table("widgets", |t| {
        t.string("label", None).not_nullable().default_to("x");
        t.integer("count");
    });
    assert_eq!(
        compile_table(&def).unwrap(),
        "CREATE TABLE IF NOT EXISTS widgets (label VARCHAR NOT NULL DEFAULT 'x', count INTEGER)"
    );
}

#[test]
fn test_foreign_key_rendering() {
    let def = table("posts", |t| {
        t.id("id");
        t.uuid("user_id")
            .references("id")
            .in_table("users")
            .on_delete(OnDelete::Cascade);
        t.text("body");
    });
    let sql = compile_table(&def).unwrap();
    assert!(sql.contains("user_id UUID REFERENCES users(id) ON DELETE CASCADE"));
    assert!(sql.contains(", body TEXT)"));
    assert_eq!(sql.matches("REFERENCES").count(), 1);
}

#[test]
fn test_foreign_key_without_action() {
    let def = table("posts", |t| {
        t.integer("user_id").references("id").in_table("users");
    });
    assert_eq!(
        compile_table(&def).unwrap(),
        "CREATE TABLE IF NOT EXISTS posts (user_id INTEGER REFERENCES users(id))"
    );
}

#[test]
fn test_identifier_column_rendering() {
    let def = table("users", |t| {
        t.id("id");
    });
    assert_eq!(
        compile_table(&def).unwrap(),
        "CREATE TABLE IF NOT EXISTS users (id UUID DEFAULT gen_random_uuid() PRIMARY KEY)"
    );
}

#[test]
fn test_all_column_types() {
    let def = table("everything", |t| {
        t.string("s", Some(40));
        t.string("s2", None);
        t.text("t");
        t.integer("i");
        t.big_integer("bi");
        t.decimal("price", 10, 2);
        t.boolean("flag");
        t.json("payload");
        t.uuid("u");
        t.date("d");
        t.timestamp("ts");
    });
    let sql = compile_table(&def).unwrap();
    assert_eq!(
        sql,
        "CREATE TABLE IF NOT EXISTS everything (s VARCHAR(40), s2 VARCHAR, t TEXT, i INTEGER, \
         bi BIGINT, price DECIMAL(10, 2), flag BOOLEAN, payload JSON, u UUID, d DATE, ts TIMESTAMP)"
    );
}

#[test]
fn test_default_value_rendering() {
    let def = table("defaults", |t| {
        t.text("quoted").default_to("it's");
        t.integer("n").default_to(0);
        t.decimal("ratio", 4, 2).default_to(0.5);
        t.boolean("on").default_to(false);
        t.timestamp("seen_at").default_to(DefaultValue::expression("current_timestamp"));
    });
    let sql = compile_table(&def).unwrap();
    assert!(sql.contains("quoted TEXT DEFAULT 'it''s'"));
    assert!(sql.contains("n INTEGER DEFAULT 0"));
    assert!(sql.contains("ratio DECIMAL(4, 2) DEFAULT 0.5"));
    assert!(sql.contains("on BOOLEAN DEFAULT false"));
    assert!(sql.contains("seen_at TIMESTAMP DEFAULT current_timestamp"));
}

#[test]
fn test_modifiers_render_in_call_order() {
    let def = table("t", |t| {
        t.string("code", Some(8)).default_to("A").unique().not_nullable();
    });
    assert_eq!(
        compile_table(&def).unwrap(),
        "CREATE TABLE IF NOT EXISTS t (code VARCHAR(8) DEFAULT 'A' UNIQUE NOT NULL)"
    );
}

#[test]
fn test_timestamps_rendering() {
    let def = table("t", |t| {
        t.timestamps();
    });
    assert_eq!(
        compile_table(&def).unwrap(),
        "CREATE TABLE IF NOT EXISTS t (created_at TIMESTAMP NOT NULL DEFAULT current_timestamp, \
         updated_at TIMESTAMP NOT NULL DEFAULT current_timestamp)"
    );
}

#[test]
fn test_empty_table_rejected() {
    let def = table("empty", |_| {});
    let err = compile_table(&def).unwrap_err();
    assert!(matches!(err, CoreError::InvalidTable { ref table, .. } if table == "empty"));
}

#[test]
fn test_duplicate_column_rejected() {
    let def = table("dupes", |t| {
        t.text("a");
        t.integer("a");
    });
    let err = compile_table(&def).unwrap_err();
    assert!(err.to_string().contains("duplicate column 'a'"));
}

#[test]
fn test_invalid_identifiers_rejected() {
    let bad_table = table("drop me", |t| {
        t.text("a");
    });
    assert!(matches!(
        compile_table(&bad_table),
        Err(CoreError::InvalidIdentifier { .. })
    ));

    let bad_column = table("t", |t| {
        t.text("a-b");
    });
    assert!(matches!(
        compile_table(&bad_column),
        Err(CoreError::InvalidIdentifier { .. })
    ));

    let bad_reference = table("t", |t| {
        t.integer("x").references("id").in_table("users; --");
    });
    assert!(matches!(
        compile_table(&bad_reference),
        Err(CoreError::InvalidIdentifier { .. })
    ));
}

#[test]
fn test_non_finite_default_rejected() {
    let def = table("t", |t| {
        t.decimal("x", 4, 2).default_to(f64::NAN);
    });
    assert!(matches!(
        compile_table(&def),
        Err(CoreError::InvalidTable { .. })
    ));
}

#[test]
fn test_schema_qualified_table() {
    let def = table("audit.events", |t| {
        t.text("kind");
    });
    assert_eq!(
        compile_table(&def).unwrap(),
        "CREATE TABLE IF NOT EXISTS audit.events (kind TEXT)"
    );
}

#[test]
fn test_compile_schema_emits_sequence_before_table() {
    let mut schema = Schema::new();
    schema.create_table("orders", |t| {
        t.increments("id");
        t.decimal("total", 12, 2).not_nullable();
    });
    let statements = compile_schema(&schema).unwrap();
    assert_eq!(
        statements,
        vec![
            "CREATE SEQUENCE IF NOT EXISTS orders_id_seq".to_string(),
            "CREATE TABLE IF NOT EXISTS orders (id INTEGER DEFAULT nextval('orders_id_seq') \
             PRIMARY KEY, total DECIMAL(12, 2) NOT NULL)"
                .to_string(),
        ]
    );
}

#[test]
fn test_compile_schema_drop_and_raw() {
    let mut schema = Schema::new();
    schema
        .raw("CREATE INDEX idx_users_email ON users (email)")
        .raw("   ")
        .drop_table_if_exists("users");
    let statements = compile_schema(&schema).unwrap();
    assert_eq!(
        statements,
        vec![
            "CREATE INDEX idx_users_email ON users (email)".to_string(),
            "DROP TABLE IF EXISTS users".to_string(),
        ]
    );
}

#[test]
fn test_compile_schema_rejects_bad_drop_target() {
    let mut schema = Schema::new();
    schema.drop_table_if_exists("users; DROP TABLE ledger");
    assert!(compile_schema(&schema).is_err());
}

#[test]
fn test_compile_schema_stops_at_first_invalid_table() {
    let mut schema = Schema::new();
    schema.create_table("ok", |t| {
        t.text("a");
    });
    schema.create_table("empty", |_| {});
    assert!(matches!(
        compile_schema(&schema),
        Err(CoreError::InvalidTable { .. })
    ));
}
