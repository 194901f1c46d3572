//! Declaration list → source text.

use crate::definition::{Definition, DefinitionKind};

/// Tool name written into generated headers.
pub const GENERATOR: &str = "typecodec";

/// Render declarations separated by blank lines, each preceded by its
/// documentation.
pub fn render(definitions: &[Definition]) -> String {
    let mut out = String::new();
    for (i, def) in definitions.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let marker = match def.kind {
            DefinitionKind::Import => "//",
            _ => "///",
        };
        for line in def.document.lines() {
            if line.trim().is_empty() {
                out.push_str(marker);
            } else {
                out.push_str(marker);
                out.push(' ');
                out.push_str(line.trim_end());
            }
            out.push('\n');
        }
        out.push_str(&def.code);
        out.push('\n');
    }
    out
}

/// The comment block opening every generated Rust file.
pub fn render_header(version: &str, fingerprint: &str) -> String {
    format!(
        "// Code generated by {GENERATOR} {version}. DO NOT EDIT.\n\
         // schema fingerprint: {fingerprint}\n\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_docs_and_spacing() {
        let defs = vec![
            Definition::new("imports", "Kernel.", DefinitionKind::Import, "use a::b;"),
            Definition::new(
                "User",
                "A user.\n\nSecond paragraph.",
                DefinitionKind::Type,
                "pub struct User;",
            ),
        ];
        assert_eq!(
            render(&defs),
            "// Kernel.\nuse a::b;\n\n/// A user.\n///\n/// Second paragraph.\npub struct User;\n"
        );
    }

    #[test]
    fn test_header_mentions_fingerprint() {
        let header = render_header("0.1.0", "abc123");
        assert!(header.starts_with("// Code generated by typecodec 0.1.0. DO NOT EDIT.\n"));
        assert!(header.contains("// schema fingerprint: abc123\n"));
    }
}
