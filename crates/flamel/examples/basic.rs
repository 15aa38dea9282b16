//! Basic usage example for flamel
//!
//! Run with: cargo run --example basic -p flamel [-- path/to/company.db]
//!
//! Without a path an in-memory database is used. Set `RUST_LOG=flamel=debug`
//! to see every statement.

use flamel::{Database, Filters, Model, OrmError, SqliteExecutor};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Model)]
#[allow(dead_code)]
struct Worker {
    #[orm(id, autoincrement)]
    id: Option<i64>,
    #[orm(unique)]
    name: String,
    #[orm(column = "mail", unique)]
    email: String,
}

fn main() -> Result<(), OrmError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut db = Database::with_declared_models()?;
    match std::env::args().nth(1) {
        Some(path) => db.connect(path)?,
        None => db.set_engine(SqliteExecutor::open_in_memory()?),
    }
    db.create_tables()?;

    for (name, email) in [
        ("John Doe", "john.doe@example.com"),
        ("Jane Smith", "jane.smith@example.com"),
        ("Mike Johnson", "mike.johnson@example.com"),
    ] {
        let outcome = db.save(&Worker {
            id: None,
            name: name.to_string(),
            email: email.to_string(),
        })?;
        println!("{name}: {outcome:?}");
    }

    let mut query = db.query_for::<Worker>();
    query
        .select(&[])
        .filter(&Filters::new().and_eq("name", "John Doe"))?;
    println!("{query}");

    for row in query.execute()? {
        println!("{row:?}");
    }

    db.close_engine()
}
