use crate::stage::{ShaderStage, SourceLanguage};

/// Collector for human-readable compiler output (warnings, errors, listings).
///
/// Translators may write diagnostics here regardless of whether translation
/// succeeds; the sink is purely informational.
pub trait DiagnosticSink {
    /// Records one diagnostic message.
    fn message(&mut self, text: &str);
}

impl DiagnosticSink for String {
    fn message(&mut self, text: &str) {
        self.push_str(text);
        self.push('\n');
    }
}

/// A single source-to-bytecode translation request.
#[derive(Debug, Clone, Copy)]
pub struct TranslateRequest<'a> {
    /// Shader source text.
    pub source: &'a str,
    /// Language the source is written in.
    pub language: SourceLanguage,
    /// Stage the shader is compiled for.
    pub stage: ShaderStage,
    /// Entry point function name.
    pub entry_point: &'a str,
    /// Preprocessor definitions, as `(name, value)` pairs.
    pub defines: &'a [(&'a str, &'a str)],
}

/// External service converting shader source text into SPIR-V words.
///
/// The call is synchronous and blocking; there are no cancellation or
/// timeout semantics. A translation either returns bytecode or an **empty
/// vector**, which is the failure signal; shader construction maps it to
/// [`crate::ShaderError::Compilation`]. Diagnostics, if any, go to `sink`.
pub trait Translator {
    /// Translates `req.source` into SPIR-V words; empty means failure.
    fn translate(&self, req: &TranslateRequest<'_>, sink: Option<&mut dyn DiagnosticSink>)
        -> Vec<u32>;
}
