use serde::{Deserialize, Serialize};

use crate::core::options::CompilerOptions;

/// How component styles are scoped to the component's view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewEncapsulation {
    #[default]
    Emulated,
    Native,
    None,
}

/// Compiler settings shared by the collaborators of an extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    pub gen_debug_info: bool,
    pub default_encapsulation: ViewEncapsulation,
    pub log_binding_update: bool,
    pub use_jit: bool,
}

impl CompilerConfig {
    /// Offline configuration: emulated encapsulation, no JIT.
    pub fn offline(options: &CompilerOptions) -> Self {
        Self {
            gen_debug_info: options.debug,
            default_encapsulation: ViewEncapsulation::Emulated,
            log_binding_update: false,
            use_jit: false,
        }
    }
}
