use crate::stage::ShaderStage;
use prism_spirv::SpirvError;

/// Errors surfaced by shader construction and static-variable binding.
///
/// Every construction-time variant (`Configuration`, `Compilation`,
/// `Reflection`) is fatal to that construction call: the shader object is
/// never created and all partial allocations are released before the error
/// reaches the caller. `NotFound` is a runtime binding error and leaves the
/// shader fully usable.
///
/// Programmer misuse (out-of-range cache slots) panics instead of returning
/// a variant; see [`crate::ResourceCache::bind`].
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    /// The creation arguments are invalid or contradictory.
    #[error("invalid shader create info: {0}")]
    Configuration(String),

    /// The translator produced no bytecode.
    #[error("{stage} shader compilation produced no bytecode for entry point `{entry_point}`")]
    Compilation {
        /// Stage the shader was being compiled for.
        stage: ShaderStage,
        /// Entry point passed to the translator.
        entry_point: String,
    },

    /// The bytecode's resource declarations are malformed or inconsistent.
    #[error("failed to reflect shader resources: {0}")]
    Reflection(#[from] SpirvError),

    /// No static variable with the given name exists on this shader.
    #[error("shader has no static variable named `{0}`")]
    NotFound(String),
}
