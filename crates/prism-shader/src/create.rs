use crate::error::ShaderError;
use crate::stage::{ShaderStage, SourceLanguage};
use crate::translate::{DiagnosticSink, TranslateRequest, Translator};
use std::path::Path;

/// Description of a shader to construct.
///
/// Exactly one of [`source`](Self::source), [`file_path`](Self::file_path),
/// or [`bytecode`](Self::bytecode) must be supplied; any other combination
/// fails with [`ShaderError::Configuration`] before any translation work
/// begins.
#[derive(Debug, Clone, Copy)]
pub struct ShaderCreateInfo<'a> {
    /// Debug label for the shader.
    pub name: &'a str,
    /// Shader source text, translated via the injected [`Translator`].
    pub source: Option<&'a str>,
    /// Path to a file containing shader source text.
    pub file_path: Option<&'a Path>,
    /// Precompiled little-endian SPIR-V bytecode. The byte length must be a
    /// multiple of the 4-byte word size.
    pub bytecode: Option<&'a [u8]>,
    /// Language of `source`/`file_path`; ignored for `bytecode`.
    pub language: SourceLanguage,
    /// Entry point function name.
    pub entry_point: &'a str,
    /// Pipeline stage the shader is created for.
    pub stage: ShaderStage,
    /// Preprocessor definitions forwarded to the translator.
    pub defines: &'a [(&'a str, &'a str)],
    /// Merge separate samplers named `<texture><suffix>` with their matching
    /// texture into one combined manifest entry.
    pub use_combined_samplers: bool,
    /// Suffix for the combined-sampler naming convention.
    pub combined_sampler_suffix: &'a str,
}

impl Default for ShaderCreateInfo<'_> {
    fn default() -> Self {
        ShaderCreateInfo {
            name: "",
            source: None,
            file_path: None,
            bytecode: None,
            language: SourceLanguage::Glsl,
            entry_point: "main",
            stage: ShaderStage::Vertex,
            defines: &[],
            use_combined_samplers: false,
            combined_sampler_suffix: "_sampler",
        }
    }
}

/// Validates `info` and produces the shader-owned word storage.
///
/// Runs the full ingestion contract: exactly-one-source validation, file
/// loading, source translation (empty result fails with `Compilation`), and
/// bytecode alignment checks. The returned vector is a copy owned by the
/// caller; no reference to the create info survives.
pub(crate) fn ingest(
    info: &ShaderCreateInfo<'_>,
    translator: &dyn Translator,
    sink: Option<&mut dyn DiagnosticSink>,
) -> Result<Vec<u32>, ShaderError> {
    let supplied = [
        info.source.is_some(),
        info.file_path.is_some(),
        info.bytecode.is_some(),
    ]
    .iter()
    .filter(|&&s| s)
    .count();
    if supplied != 1 {
        return Err(ShaderError::Configuration(format!(
            "exactly one of `source`, `file_path`, or `bytecode` must be supplied, got {supplied}"
        )));
    }

    if info.use_combined_samplers && info.combined_sampler_suffix.is_empty() {
        return Err(ShaderError::Configuration(
            "`combined_sampler_suffix` must not be empty when combined samplers are enabled"
                .to_owned(),
        ));
    }

    if info.entry_point.is_empty() {
        return Err(ShaderError::Configuration(
            "`entry_point` must not be empty".to_owned(),
        ));
    }

    if let Some(bytecode) = info.bytecode {
        if bytecode.is_empty() {
            return Err(ShaderError::Configuration(
                "`bytecode` must not be empty".to_owned(),
            ));
        }
        if bytecode.len() % 4 != 0 {
            return Err(ShaderError::Configuration(format!(
                "bytecode size {} is not a multiple of the 4-byte word size",
                bytecode.len()
            )));
        }
        return Ok(bytecode
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect());
    }

    let loaded;
    let source = match (info.source, info.file_path) {
        (Some(source), _) => source,
        (None, Some(path)) => {
            loaded = std::fs::read_to_string(path).map_err(|e| {
                ShaderError::Configuration(format!(
                    "failed to read shader source from {}: {e}",
                    path.display()
                ))
            })?;
            &loaded
        }
        (None, None) => unreachable!("validated above"),
    };

    let request = TranslateRequest {
        source,
        language: info.language,
        stage: info.stage,
        entry_point: info.entry_point,
        defines: info.defines,
    };
    let words = translator.translate(&request, sink);
    if words.is_empty() {
        return Err(ShaderError::Compilation {
            stage: info.stage,
            entry_point: info.entry_point.to_owned(),
        });
    }
    Ok(words)
}
