//! A safe, zero-copy parser and resource reflector for SPIR-V shader modules.
//!
//! This crate is intended for parsing **untrusted** shader bytecode (e.g.
//! precompiled blobs handed to the graphics layer by an application) without
//! panicking or reading out of bounds.
//!
//! In addition to word-stream validation, this crate provides:
//!
//! - An instruction iterator over the module's global section.
//! - A resource reflector that extracts the descriptor bindings (uniform
//!   buffers, storage buffers, images, samplers) a module declares, as an
//!   ordered [`ResourceManifest`].
//! - An optional combined-sampler naming convention that merges a separate
//!   sampler with its matching texture into a single manifest entry.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod module;
/// Raw SPIR-V opcode, storage-class, decoration, and execution-model constants.
pub mod op;
/// Resource reflection: extracting the binding manifest from a module.
pub mod reflect;

/// Helpers for assembling synthetic SPIR-V modules in tests.
///
/// This module is only available when compiling this crate's own tests, or
/// when the `test-utils` feature is enabled. It is **not** considered part of
/// the stable parsing API.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

#[cfg(test)]
mod tests_module;
#[cfg(test)]
mod tests_reflect;

pub use crate::error::{SpirvError, SpirvErrorKind};
pub use crate::module::{words_from_bytes, Instruction, SpirvHeader, SpirvModule};
pub use crate::reflect::{
    reflect_resources, ResourceKind, ResourceManifest, ShaderResource, StageMask,
};
