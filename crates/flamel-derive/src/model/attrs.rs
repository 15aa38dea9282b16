//! Attribute parsing for the Model derive macro.
//!
//! Handles struct-level `#[orm(table = "...")]` and field-level `#[orm(...)]`.

use crate::sql_ident::parse_sql_ident;
use syn::{DeriveInput, Error, LitStr, Result, Token};

/// Struct-level attributes.
#[derive(Default)]
pub(super) struct StructAttr {
    pub table: Option<String>,
}

impl syn::parse::Parse for StructAttr {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attr = StructAttr::default();
        while !input.is_empty() {
            let ident: syn::Ident = input.parse()?;
            if ident != "table" {
                return Err(Error::new(
                    ident.span(),
                    format!("unknown struct attribute `{ident}` (expected `table`)"),
                ));
            }
            let _: Token![=] = input.parse()?;
            let value: LitStr = input.parse()?;
            attr.table = Some(parse_sql_ident(&value, "table")?);

            if input.peek(Token![,]) {
                let _: Token![,] = input.parse()?;
            } else {
                break;
            }
        }
        Ok(attr)
    }
}

/// `foreign_key(table = "...", column = "...")`
pub(super) struct ForeignKeyAttr {
    pub table: String,
    pub column: String,
}

/// Field-level attributes.
#[derive(Default)]
pub(super) struct FieldAttr {
    pub primary_key: bool,
    pub autoincrement: bool,
    pub unique: bool,
    pub default_now: bool,
    pub column: Option<String>,
    pub check: Option<LitStr>,
    pub sql_type: Option<LitStr>,
    pub default: Option<syn::Expr>,
    pub foreign_key: Option<ForeignKeyAttr>,
}

impl FieldAttr {
    fn merge(&mut self, other: FieldAttr) {
        self.primary_key |= other.primary_key;
        self.autoincrement |= other.autoincrement;
        self.unique |= other.unique;
        self.default_now |= other.default_now;
        if other.column.is_some() {
            self.column = other.column;
        }
        if other.check.is_some() {
            self.check = other.check;
        }
        if other.sql_type.is_some() {
            self.sql_type = other.sql_type;
        }
        if other.default.is_some() {
            self.default = other.default;
        }
        if other.foreign_key.is_some() {
            self.foreign_key = other.foreign_key;
        }
    }
}

fn parse_foreign_key(input: syn::parse::ParseStream) -> Result<ForeignKeyAttr> {
    let content;
    let paren = syn::parenthesized!(content in input);

    let mut table = None;
    let mut column = None;
    while !content.is_empty() {
        let key: syn::Ident = content.parse()?;
        let _: Token![=] = content.parse()?;
        let value: LitStr = content.parse()?;
        if key == "table" {
            table = Some(parse_sql_ident(&value, "foreign_key table")?);
        } else if key == "column" {
            column = Some(parse_sql_ident(&value, "foreign_key column")?);
        } else {
            return Err(Error::new(
                key.span(),
                format!("unknown foreign_key key `{key}` (expected `table` or `column`)"),
            ));
        }

        if content.peek(Token![,]) {
            let _: Token![,] = content.parse()?;
        } else {
            break;
        }
    }

    match (table, column) {
        (Some(table), Some(column)) => Ok(ForeignKeyAttr { table, column }),
        _ => Err(Error::new(
            paren.span.join(),
            "foreign_key requires both `table` and `column`",
        )),
    }
}

impl syn::parse::Parse for FieldAttr {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();

        while !input.is_empty() {
            let ident: syn::Ident = input.parse()?;
            match ident.to_string().as_str() {
                "id" | "primary_key" => attr.primary_key = true,
                "autoincrement" => attr.autoincrement = true,
                "unique" => attr.unique = true,
                "default_now" => attr.default_now = true,
                "column" => {
                    let _: Token![=] = input.parse()?;
                    let value: LitStr = input.parse()?;
                    attr.column = Some(parse_sql_ident(&value, "column")?);
                }
                "check" => {
                    let _: Token![=] = input.parse()?;
                    attr.check = Some(input.parse()?);
                }
                "sql_type" => {
                    let _: Token![=] = input.parse()?;
                    attr.sql_type = Some(input.parse()?);
                }
                "default" => {
                    let _: Token![=] = input.parse()?;
                    attr.default = Some(input.parse()?);
                }
                "foreign_key" => attr.foreign_key = Some(parse_foreign_key(input)?),
                other => {
                    return Err(Error::new(
                        ident.span(),
                        format!("unknown field attribute `{other}`"),
                    ));
                }
            }

            if input.peek(Token![,]) {
                let _: Token![,] = input.parse()?;
            } else {
                break;
            }
        }

        if attr.default.is_some() && attr.default_now {
            return Err(input.error("`default` and `default_now` are mutually exclusive"));
        }
        Ok(attr)
    }
}

/// Table name from `#[orm(table = "...")]`, falling back to the struct name.
pub(super) fn get_table_name(input: &DeriveInput) -> Result<String> {
    let mut table = None;
    for attr in &input.attrs {
        if attr.path().is_ident("orm") {
            let parsed: StructAttr = attr.parse_args()?;
            if parsed.table.is_some() {
                table = parsed.table;
            }
        }
    }
    Ok(table.unwrap_or_else(|| input.ident.to_string()))
}

/// All `#[orm(...)]` attributes on a field, merged in order.
pub(super) fn get_field_attr(field: &syn::Field) -> Result<FieldAttr> {
    let mut merged = FieldAttr::default();
    for attr in &field.attrs {
        if attr.path().is_ident("orm") {
            merged.merge(attr.parse_args()?);
        }
    }
    Ok(merged)
}
