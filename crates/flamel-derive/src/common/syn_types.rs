//! Type helper utilities for syn type analysis.

/// Extract `T` from `Option<T>` (any path ending in `Option`).
pub fn option_inner(ty: &syn::Type) -> Option<&syn::Type> {
    single_generic_arg(ty, "Option")
}

/// Extract `T` from `Vec<T>` (any path ending in `Vec`).
pub fn vec_inner(ty: &syn::Type) -> Option<&syn::Type> {
    single_generic_arg(ty, "Vec")
}

fn single_generic_arg<'a>(ty: &'a syn::Type, wrapper: &str) -> Option<&'a syn::Type> {
    let syn::Type::Path(type_path) = ty else {
        return None;
    };
    let seg = type_path.path.segments.last()?;
    if seg.ident != wrapper {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &seg.arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    let syn::GenericArgument::Type(inner) = args.args.first()? else {
        return None;
    };
    Some(inner)
}

fn last_ident(ty: &syn::Type) -> Option<String> {
    match ty {
        syn::Type::Path(type_path) => Some(type_path.path.segments.last()?.ident.to_string()),
        syn::Type::Reference(reference) => last_ident(&reference.elem),
        _ => None,
    }
}

/// Name of the `flamel::ColumnType` variant a Rust field type maps to.
///
/// `ty` must already have any `Option` wrapper removed.
pub fn infer_column_type(ty: &syn::Type) -> Option<&'static str> {
    if let Some(inner) = vec_inner(ty) {
        return (last_ident(inner)? == "u8").then_some("Blob");
    }
    let kind = match last_ident(ty)?.as_str() {
        "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" => "Integer",
        "f32" | "f64" => "Real",
        "String" | "str" => "String",
        "bool" => "Boolean",
        "NaiveDateTime" | "DateTime" => "DateTime",
        _ => return None,
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_option_inner() {
        let ty: syn::Type = parse_quote!(Option<String>);
        assert!(option_inner(&ty).is_some());

        let ty: syn::Type = parse_quote!(std::option::Option<i32>);
        assert!(option_inner(&ty).is_some());

        let ty: syn::Type = parse_quote!(Vec<String>);
        assert!(option_inner(&ty).is_none());
    }

    #[test]
    fn test_infer_column_type() {
        let cases: [(syn::Type, Option<&str>); 9] = [
            (parse_quote!(i64), Some("Integer")),
            (parse_quote!(u16), Some("Integer")),
            (parse_quote!(f32), Some("Real")),
            (parse_quote!(String), Some("String")),
            (parse_quote!(bool), Some("Boolean")),
            (parse_quote!(Vec<u8>), Some("Blob")),
            (parse_quote!(chrono::DateTime<chrono::Utc>), Some("DateTime")),
            (parse_quote!(Vec<String>), None),
            (parse_quote!(u64), None),
        ];
        for (ty, expected) in cases {
            assert_eq!(infer_column_type(&ty), expected);
        }
    }
}
