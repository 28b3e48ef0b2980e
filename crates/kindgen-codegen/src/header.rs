//! "Generated, do not edit" headers.

use std::path::Path;

/// Comment leader for a generated file, or `None` where comments are invalid.
pub fn comment_leader(path: &Path) -> Option<&'static str> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") | Some("md") => None,
        Some("yml") | Some("yaml") => Some("#"),
        _ => Some("//"),
    }
}

/// Prepend a header naming the main generator and the generator that
/// produced the file. Files that cannot carry comments are returned as is.
pub fn with_header(path: &Path, main_generator: &str, generator: &str, content: &str) -> String {
    let Some(leader) = comment_leader(path) else {
        return content.to_string();
    };

    let main_generator = main_generator.replace('\\', "/");
    let mut out = String::new();
    out.push_str(&format!("{leader} Code generated - EDITING IS FUTILE. DO NOT EDIT.\n"));
    out.push_str(&format!("{leader}\n"));
    out.push_str(&format!("{leader} Generated by:\n"));
    out.push_str(&format!("{leader}     {main_generator}\n"));
    out.push_str(&format!("{leader} Using generator:\n"));
    out.push_str(&format!("{leader}     {generator}\n"));
    out.push('\n');
    out.push_str(content);
    out
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use test_case::test_case;

    #[test_case("folder/folder_types.gen.ts", Some("//"))]
    #[test_case("folder/folder_types_gen.go", Some("//"))]
    #[test_case("deploy/folder.yaml", Some("#"))]
    #[test_case("deploy/folder.yml", Some("#"))]
    #[test_case("folder/folder_types_gen.json", None)]
    #[test_case("README.md", None)]
    fn comment_leader___by_extension(path: &str, expected: Option<&str>) {
        assert_eq!(comment_leader(Path::new(path)), expected);
    }

    #[test]
    fn with_header___typescript___prepends_slash_block() {
        let out = with_header(
            Path::new("folder/folder_types.gen.ts"),
            "kindgen.toml",
            "ts-types",
            "export interface spec {}\n",
        );

        assert_eq!(
            out,
            "// Code generated - EDITING IS FUTILE. DO NOT EDIT.\n\
             //\n\
             // Generated by:\n\
             //     kindgen.toml\n\
             // Using generator:\n\
             //     ts-types\n\
             \n\
             export interface spec {}\n"
        );
    }

    #[test]
    fn with_header___json___unchanged() {
        let out = with_header(Path::new("a/b.json"), "kindgen.toml", "json-schema", "{}\n");

        assert_eq!(out, "{}\n");
    }

    #[test]
    fn with_header___windows_path___uses_forward_slashes() {
        let out = with_header(Path::new("a.go"), "tools\\gen.toml", "go-types", "");

        assert!(out.contains("//     tools/gen.toml\n"));
    }
}
