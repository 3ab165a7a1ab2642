//! Scalar type mapping and identifier re-casing for the IR builder.
//!
//! Mirrors `ident.rs`'s role in this codebase: a small set of free functions
//! wrapping `heck`, plus (here) the fixed protobuf-scalar-to-Rust-type table.

use heck::ToUpperCamelCase;

/// Converts a `snake_case` or `SCREAMING_SNAKE_CASE` protobuf identifier to
/// `UpperCamel` case for use as a Rust type or variant name.
pub fn to_upper_camel(s: &str) -> String {
    s.to_upper_camel_case()
}

pub const TIMESTAMP_IMPORT: &str = "time";
const TIMESTAMP_TYPE: &str = "time::OffsetDateTime";

/// Result of resolving a protobuf type literal to a target-language type.
pub struct ResolvedType {
    pub expression: String,
    /// Set when resolving this type has a side effect on the Template's
    /// Imports list (currently only `google.protobuf.Timestamp` → `time`).
    pub import: Option<&'static str>,
}

/// Resolves a single protobuf scalar (or passthrough) type literal.
///
/// `google.protobuf.Empty` is handled by the caller (it never appears as a
/// field or map-value type in the schemas this generator targets, only as an
/// RPC response), not here.
pub fn resolve_scalar(type_literal: &str) -> ResolvedType {
    let expression = match type_literal {
        "double" => "f64",
        "float" => "f32",
        "int32" | "sint32" | "sfixed32" => "i32",
        "int64" | "sint64" | "sfixed64" => "i64",
        "uint32" | "fixed32" => "u32",
        "uint64" | "fixed64" => "u64",
        "bool" => "bool",
        "string" => "String",
        "bytes" => "Vec<u8>",
        "google.protobuf.Timestamp" => {
            return ResolvedType {
                expression: TIMESTAMP_TYPE.to_owned(),
                import: Some(TIMESTAMP_IMPORT),
            }
        }
        other => other,
    };

    ResolvedType {
        expression: expression.to_owned(),
        import: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_scalar_in_the_fixed_table() {
        let cases = [
            ("double", "f64"),
            ("float", "f32"),
            ("int32", "i32"),
            ("sint32", "i32"),
            ("sfixed32", "i32"),
            ("int64", "i64"),
            ("sint64", "i64"),
            ("sfixed64", "i64"),
            ("uint32", "u32"),
            ("fixed32", "u32"),
            ("uint64", "u64"),
            ("fixed64", "u64"),
            ("bool", "bool"),
            ("string", "String"),
            ("bytes", "Vec<u8>"),
        ];
        for (literal, expected) in cases {
            assert_eq!(resolve_scalar(literal).expression, expected, "literal={literal}");
        }
    }

    #[test]
    fn timestamp_resolves_with_an_import_side_effect() {
        let resolved = resolve_scalar("google.protobuf.Timestamp");
        assert_eq!(resolved.expression, "time::OffsetDateTime");
        assert_eq!(resolved.import, Some("time"));
    }

    #[test]
    fn unknown_types_pass_through_verbatim() {
        assert_eq!(resolve_scalar("google.protobuf.Any").expression, "google.protobuf.Any");
        assert_eq!(resolve_scalar("MyMessage").expression, "MyMessage");
    }

    #[test]
    fn upper_camel_matches_expected_casing() {
        assert_eq!(to_upper_camel("type_request"), "TypeRequest");
        assert_eq!(to_upper_camel("HelloType"), "HelloType");
        assert_eq!(to_upper_camel("p1"), "P1");
    }
}
