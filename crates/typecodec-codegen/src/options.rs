//! Generation options.

use serde::{Deserialize, Serialize};

/// Crate path used by [`KernelMode::Import`] when none is given.
pub const DEFAULT_RUNTIME_CRATE: &str = "typecodec_runtime";

/// Where generated code gets its primitive codecs from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum KernelMode {
    /// Emit the kernel and wrapper codecs into the generated module, making
    /// it self-contained.
    Inline,
    /// `use` the runtime crate at `crate_path`.
    Import { crate_path: String },
}

impl Default for KernelMode {
    fn default() -> Self {
        KernelMode::Import {
            crate_path: DEFAULT_RUNTIME_CRATE.to_string(),
        }
    }
}

/// Output language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "language", rename_all = "snake_case")]
pub enum Target {
    /// Rust types with binary codecs.
    #[default]
    Rust,
    /// An Elm module with JSON encoders and decoders.
    Elm { module_name: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateOptions {
    #[serde(default)]
    pub kernel: KernelMode,
    #[serde(default)]
    pub target: Target,
}

impl GenerateOptions {
    /// Self-contained Rust output.
    pub fn inline() -> Self {
        Self {
            kernel: KernelMode::Inline,
            target: Target::Rust,
        }
    }

    /// Rust output importing the runtime from `crate_path`.
    pub fn import(crate_path: impl Into<String>) -> Self {
        Self {
            kernel: KernelMode::Import {
                crate_path: crate_path.into(),
            },
            target: Target::Rust,
        }
    }

    /// Elm output.
    pub fn elm(module_name: impl Into<String>) -> Self {
        Self {
            kernel: KernelMode::default(),
            target: Target::Elm {
                module_name: module_name.into(),
            },
        }
    }

    pub fn with_kernel(&self) -> bool {
        matches!(self.kernel, KernelMode::Inline)
    }
}
