//! Naming convention utilities for code generation.
//!
//! # Supported Conversions
//!
//! | Input | Function | Output |
//! |-------|----------|--------|
//! | `snake_case` / `camelCase` | [`to_pascal_case`] | `PascalCase` |
//! | `PascalCase` | [`to_snake_case`] | `snake_case` |
//! | `in_progress` | [`to_identifier`] | `InProgress` |
//! | `["status", "operatorStates"]` | [`path_type_name`] | `StatusOperatorStates` |

/// Convert a string to PascalCase.
///
/// Handles snake_case, kebab-case, camelCase and already-capitalized input.
///
/// # Examples
///
/// ```
/// use kindgen_core::naming::to_pascal_case;
///
/// assert_eq!(to_pascal_case("hello_world"), "HelloWorld");
/// assert_eq!(to_pascal_case("operatorStates"), "OperatorStates");
/// assert_eq!(to_pascal_case("uid"), "Uid");
/// ```
pub fn to_pascal_case(s: &str) -> String {
    s.split(['-', '_', '.', ' '])
        .map(capitalize)
        .collect()
}

/// Capitalize the first letter of a string.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Convert PascalCase or camelCase to snake_case.
///
/// # Examples
///
/// ```
/// use kindgen_core::naming::to_snake_case;
///
/// assert_eq!(to_snake_case("Folder"), "folder");
/// assert_eq!(to_snake_case("PlaylistItem"), "playlist_item");
/// ```
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    let mut prev_lower = false;

    for c in s.chars() {
        if c == '-' || c == ' ' {
            result.push('_');
            prev_lower = false;
        } else if c.is_uppercase() {
            if prev_lower {
                result.push('_');
            }
            result.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            result.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }

    result
}

/// Turn an arbitrary literal into a PascalCase identifier.
///
/// Returns `None` when the literal has no alphanumeric content or would
/// start with a digit.
pub fn to_identifier(literal: &str) -> Option<String> {
    let ident: String = literal
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect();

    match ident.chars().next() {
        Some(first) if first.is_alphabetic() => Some(ident),
        _ => None,
    }
}

/// True for `Folder`, `PlaylistItem2`; false for `folder` or `My Folder`.
pub fn is_pascal_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

/// True when `s` is usable as one lowercase path segment and package name.
pub fn is_machine_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => {
            chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        }
        _ => false,
    }
}

/// Type name for a field path: the PascalCase join of its segments.
pub fn path_type_name(path: &[String]) -> String {
    path.iter().map(|segment| to_pascal_case(segment)).collect()
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use test_case::test_case;

    #[test_case("hello_world", "HelloWorld")]
    #[test_case("hello-world", "HelloWorld")]
    #[test_case("operatorStates", "OperatorStates")]
    #[test_case("HelloWorld", "HelloWorld")]
    #[test_case("", "")]
    fn to_pascal_case___input___converts(input: &str, expected: &str) {
        assert_eq!(to_pascal_case(input), expected);
    }

    #[test_case("Folder", "folder")]
    #[test_case("PlaylistItem", "playlist_item")]
    #[test_case("already_snake", "already_snake")]
    #[test_case("v2Thing", "v2_thing")]
    fn to_snake_case___input___converts(input: &str, expected: &str) {
        assert_eq!(to_snake_case(input), expected);
    }

    #[test]
    fn capitalize___preserves_rest_of_string() {
        assert_eq!(capitalize("helloWorld"), "HelloWorld");
        assert_eq!(capitalize(""), "");
    }

    #[test_case("in_progress", Some("InProgress"))]
    #[test_case("success", Some("Success"))]
    #[test_case("kebab-case value", Some("KebabCaseValue"))]
    #[test_case("", None)]
    #[test_case("-", None)]
    #[test_case("9lives", None)]
    fn to_identifier___literal___maps(literal: &str, expected: Option<&str>) {
        assert_eq!(to_identifier(literal).as_deref(), expected);
    }

    #[test_case("Folder", true)]
    #[test_case("PlaylistItem2", true)]
    #[test_case("folder", false)]
    #[test_case("My Folder", false)]
    #[test_case("Folder-v2", false)]
    #[test_case("", false)]
    fn is_pascal_identifier___input___classifies(input: &str, expected: bool) {
        assert_eq!(is_pascal_identifier(input), expected);
    }

    #[test_case("folder", true)]
    #[test_case("playlist_item2", true)]
    #[test_case("../../escape", false)]
    #[test_case("a/b", false)]
    #[test_case("Folder", false)]
    #[test_case("_folder", false)]
    #[test_case("", false)]
    fn is_machine_name___input___classifies(input: &str, expected: bool) {
        assert_eq!(is_machine_name(input), expected);
    }

    #[test]
    fn path_type_name___joins_segments() {
        let path = vec!["status".to_string(), "operatorStates".to_string()];

        assert_eq!(path_type_name(&path), "StatusOperatorStates");
    }
}
