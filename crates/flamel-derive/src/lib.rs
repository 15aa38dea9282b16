//! Derive macros for flamel
//!
//! Provides `#[derive(Model)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod common;
mod model;
mod sql_ident;

/// Derive `flamel::Model` for a struct with named fields.
///
/// # Example
///
/// ```ignore
/// use flamel::Model;
///
/// #[derive(Model)]
/// #[orm(table = "Worker")]
/// struct Worker {
///     #[orm(id, autoincrement)]
///     id: Option<i64>,
///     #[orm(unique)]
///     name: String,
///     #[orm(column = "mail", unique)]
///     email: String,
///     #[orm(check = "age >= 0", default = 18)]
///     age: Option<i64>,
///     #[orm(foreign_key(table = "Team", column = "id"))]
///     team_id: Option<i64>,
/// }
/// ```
///
/// # Generated
///
/// - `impl flamel::Model` with `MODEL_NAME`, `declare()` and `values()`
/// - a `flamel::ModelRegistration` in the declared-model catalogue, picked
///   up by `Registry::with_declared_models()`
///
/// # Column types
///
/// Inferred from the field type: integers up to `i64`/`u32` map to
/// `Integer`, floats to `Real`, `String` to `String`, `bool` to `Boolean`,
/// `Vec<u8>` to `Blob`, chrono `NaiveDateTime`/`DateTime` to `DateTime`.
/// `Option<T>` makes the column nullable; any other field is `NOT NULL`
/// unless it is the primary key.
///
/// # Attributes
///
/// - `#[orm(table = "name")]` - Table name (defaults to the struct name)
/// - `#[orm(id)]` / `#[orm(primary_key)]` - Primary key
/// - `#[orm(autoincrement)]`, `#[orm(unique)]`
/// - `#[orm(column = "name")]` - Map field to a different column name
/// - `#[orm(check = "expr")]` - CHECK constraint
/// - `#[orm(default = <literal>)]` / `#[orm(default_now)]` - Column default
/// - `#[orm(sql_type = "TEXT")]` - Explicit column type
/// - `#[orm(foreign_key(table = "t", column = "c"))]` - Foreign key
#[proc_macro_derive(Model, attributes(orm))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    model::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
