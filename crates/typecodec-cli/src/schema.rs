//! Shared input handling: schema files, type expressions, value streams.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use typecodec_compiler::{check, CompileError};
use typecodec_types::{CustomTypeDefinition, Type};

/// Read and validate a schema file.
pub fn load_schema(path: &Path) -> Result<Vec<CustomTypeDefinition>> {
    let json = read_text(path).with_context(|| format!("failed to read schema {}", path.display()))?;
    check(&json).map_err(|err| describe(err, path))
}

/// Attach the schema path to a compile error.
pub fn describe(err: CompileError, path: &Path) -> anyhow::Error {
    anyhow::Error::new(err).context(format!("schema {} rejected", path.display()))
}

/// Parse a `--type` argument.
///
/// Accepts a type JSON document (`{"List":"Int32"}`), a bare primitive name
/// (`Int32`), or the name of a non-generic custom type (`User`).
pub fn parse_type(text: &str, definitions: &[CustomTypeDefinition]) -> Result<Type> {
    let text = text.trim();
    let ty = if text.starts_with('{') || text.starts_with('"') {
        serde_json::from_str(text).with_context(|| format!("invalid type expression {text}"))?
    } else if let Ok(primitive) = serde_json::from_value::<Type>(serde_json::Value::String(text.to_string())) {
        primitive
    } else {
        Type::named(text)
    };

    let mut problem = None;
    ty.walk(&mut |t| match t {
        Type::Custom { name, arguments } if problem.is_none() => {
            match definitions.iter().find(|d| &d.name == name) {
                None => problem = Some(format!("unknown type '{name}'")),
                Some(def) if def.type_parameter_list.len() != arguments.len() => {
                    problem = Some(format!(
                        "'{name}' expects {} type arguments, found {}",
                        def.type_parameter_list.len(),
                        arguments.len()
                    ))
                }
                Some(_) => {}
            }
        }
        Type::Parameter(name) if problem.is_none() => {
            problem = Some(format!("type parameter '{name}' has no argument"))
        }
        _ => {}
    });
    if let Some(problem) = problem {
        bail!("invalid --type {text}: {problem}");
    }
    Ok(ty)
}

/// Read a file, or stdin for `-` / no path.
pub fn read_input(path: Option<&PathBuf>) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    match path {
        Some(path) if path.as_os_str() != "-" => {
            bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        }
        _ => {
            std::io::stdin()
                .read_to_end(&mut bytes)
                .context("failed to read stdin")?;
        }
    }
    Ok(bytes)
}

/// Write to a file, or stdout for `-` / no path.
pub fn write_output(path: Option<&PathBuf>, bytes: &[u8]) -> Result<()> {
    match path {
        Some(path) if path.as_os_str() != "-" => {
            std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote output");
        }
        _ => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes).context("failed to write stdout")?;
            stdout.flush().context("failed to flush stdout")?;
        }
    }
    Ok(())
}

fn read_text(path: &Path) -> Result<String> {
    Ok(std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use typecodec_types::{CustomTypeDefinitionBody, Member};

    fn defs() -> Vec<CustomTypeDefinition> {
        vec![
            CustomTypeDefinition::new(
                "Point",
                "",
                CustomTypeDefinitionBody::Product(vec![Member::new("x", "", Type::Int32)]),
            ),
            CustomTypeDefinition::new(
                "Boxed",
                "",
                CustomTypeDefinitionBody::Product(vec![Member::new("v", "", Type::parameter("a"))]),
            )
            .with_parameters(["a"]),
        ]
    }

    #[test]
    fn parse_type_forms() {
        let defs = defs();
        assert_eq!(parse_type("Int32", &defs).unwrap(), Type::Int32);
        assert_eq!(parse_type("Point", &defs).unwrap(), Type::named("Point"));
        assert_eq!(
            parse_type(r#"{"List":"Bool"}"#, &defs).unwrap(),
            Type::list(Type::Bool)
        );
        assert_eq!(
            parse_type(r#"{"Custom":{"name":"Boxed","arguments":["String"]}}"#, &defs).unwrap(),
            Type::custom("Boxed", vec![Type::String])
        );
    }

    #[test]
    fn parse_type_rejects_bad_references() {
        let defs = defs();
        let err = parse_type("Missing", &defs).unwrap_err();
        assert!(err.to_string().contains("unknown type 'Missing'"));
        let err = parse_type("Boxed", &defs).unwrap_err();
        assert!(err.to_string().contains("expects 1 type arguments, found 0"));
    }

    #[test]
    fn load_schema_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"[{"name":"lower","body":{"product":[{"name":"x","type":"Int32"}]}}]"#).unwrap();
        let err = load_schema(&path).unwrap_err();
        let text = format!("{err:#}");
        assert!(text.contains("bad.json"));
        assert!(text.contains("E100"));
    }
}
