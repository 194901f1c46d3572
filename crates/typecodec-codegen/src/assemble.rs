//! Module assembler.
//!
//! Emission order:
//! 1. Imports of the kernel symbols (from the runtime crate or the inline
//!    `kernel` module)
//! 2. The inline `kernel` module (`KernelMode::Inline` only)
//! 3. The `Maybe`/`Result` wrapper codecs
//! 4. One group per Id/Token name, in first-seen order
//! 5. Custom types in schema order

use std::collections::HashMap;

use typecodec_runtime::{KERNEL_SOURCE, WRAPPER_SOURCE};
use typecodec_types::CustomTypeDefinition;

use crate::context::GenerationContext;
use crate::custom;
use crate::definition::{Definition, DefinitionKind};
use crate::error::{CodegenError, CodegenResult};
use crate::hex::generate_hex_group;
use crate::naming::{codec_name, reserved_reason, KERNEL_IMPORTS, WRAPPER_IMPORTS};
use crate::options::{GenerateOptions, KernelMode};
use crate::writer::SourceWriter;

// ══════════════════════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════════════════════

/// Build the full, ordered declaration list for a validated schema.
pub fn assemble(
    definitions: &[CustomTypeDefinition],
    options: &GenerateOptions,
) -> CodegenResult<Vec<Definition>> {
    check_symbols(definitions)?;
    let context = GenerationContext::new(definitions, options.clone());

    let mut out = import_group(&options.kernel);
    if let KernelMode::Inline = options.kernel {
        out.push(kernel_module());
    }
    out.extend(wrapper_group(&options.kernel));

    for hex in context.hex_names() {
        out.extend(generate_hex_group(hex));
    }
    for def in definitions {
        out.extend(custom::generate(def, &context)?.into_definitions());
    }

    tracing::debug!(
        definitions = out.len(),
        hex_names = context.hex_names().len(),
        custom_types = definitions.len(),
        "assembled module"
    );
    Ok(out)
}

// ══════════════════════════════════════════════════════════════════════════════
// Symbol checks
// ══════════════════════════════════════════════════════════════════════════════

/// Reject schema names that would shadow a kernel or prelude symbol, and
/// pairs of names whose generated symbols coincide (`Foo` + `FooCodec`
/// both declared, for example).
fn check_symbols(definitions: &[CustomTypeDefinition]) -> CodegenResult<()> {
    let mut owners: HashMap<String, String> = HashMap::new();
    let mut claim = |symbol: String, owner: String| -> CodegenResult<()> {
        if let Some(reason) = reserved_reason(&symbol) {
            return Err(CodegenError::ReservedName {
                name: symbol,
                reason,
            });
        }
        if let Some(first) = owners.get(&symbol) {
            if *first == owner {
                return Ok(());
            }
            return Err(CodegenError::NameCollision {
                symbol,
                first: first.clone(),
                second: owner,
            });
        }
        owners.insert(symbol, owner);
        Ok(())
    };

    for def in definitions {
        let owner = format!("type {}", def.name);
        claim(def.name.clone(), owner.clone())?;
        claim(codec_name(&def.name), owner)?;
        for pattern_name in pattern_names(def) {
            if pattern_name == "Self" {
                return Err(CodegenError::ReservedName {
                    name: format!("{}::Self", def.name),
                    reason: "Rust keyword",
                });
            }
        }
    }
    for hex in typecodec_types::collect_hex_names(definitions) {
        let owner = format!("{} {}", hex.kind.label(), hex.name);
        claim(hex.name.clone(), owner.clone())?;
        claim(codec_name(&hex.name), owner)?;
    }
    Ok(())
}

fn pattern_names(def: &CustomTypeDefinition) -> Vec<&str> {
    match &def.body {
        typecodec_types::CustomTypeDefinitionBody::Sum(patterns) => {
            patterns.iter().map(|p| p.name.as_str()).collect()
        }
        typecodec_types::CustomTypeDefinitionBody::Product(_) => Vec::new(),
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Fixed groups
// ══════════════════════════════════════════════════════════════════════════════

fn import_group(kernel: &KernelMode) -> Vec<Definition> {
    let source = match kernel {
        KernelMode::Inline => "self::kernel".to_string(),
        KernelMode::Import { crate_path } => crate_path.clone(),
    };
    let code = format!(
        "#[allow(unused_imports)]\nuse {source}::{{{}}};",
        KERNEL_IMPORTS.join(", ")
    );
    vec![Definition::new(
        "imports",
        "Primitive codecs.",
        DefinitionKind::Import,
        code,
    )]
}

fn kernel_module() -> Definition {
    Definition::new(
        "kernel",
        "Primitive codecs and the `Codec` trait.",
        DefinitionKind::Module,
        inline_module("kernel", KERNEL_SOURCE),
    )
}

fn wrapper_group(kernel: &KernelMode) -> Vec<Definition> {
    let symbols = WRAPPER_IMPORTS.join(", ");
    match kernel {
        KernelMode::Inline => vec![
            Definition::new(
                "wrapper",
                "Codecs for `Maybe` (as `Option`) and `Result`.",
                DefinitionKind::Module,
                inline_module("wrapper", WRAPPER_SOURCE),
            ),
            Definition::new(
                "wrapper_imports",
                "",
                DefinitionKind::Import,
                format!("#[allow(unused_imports)]\npub use self::wrapper::{{{symbols}}};"),
            ),
        ],
        KernelMode::Import { crate_path } => vec![Definition::new(
            "wrapper_imports",
            "Codecs for `Maybe` (as `Option`) and `Result`.",
            DefinitionKind::Import,
            format!("#[allow(unused_imports)]\npub use {crate_path}::{{{symbols}}};"),
        )],
    }
}

fn inline_module(name: &str, source: &str) -> String {
    let mut w = SourceWriter::new();
    w.line("#[allow(dead_code)]");
    w.open(&format!("pub mod {name} {{"));
    w.block(source);
    w.close("}");
    w.finish()
}
