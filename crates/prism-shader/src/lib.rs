//! Shader object construction and static resource binding.
//!
//! This crate turns shader source or precompiled SPIR-V bytecode into a
//! validated [`Shader`] object: the bytecode is ingested into shader-owned
//! storage, reflected into an immutable resource manifest, and the
//! static-classified subset of that manifest is given a fixed-slot resource
//! cache that callers bind once through [`StaticBindings`] and share across
//! every pipeline using the shader.
//!
//! Construction is all-or-nothing: on any failure no shader object exists
//! and nothing partially built is observable. Source-to-bytecode translation
//! and the static/mutable/dynamic classification policy are injected by the
//! caller (see [`Translator`] and [`ResourceClassifier`]); this crate never
//! touches native graphics-API objects.

mod cache;
mod create;
mod error;
mod layout;
mod shader;
mod stage;
mod translate;

pub use crate::cache::{DeviceResource, ResourceCache, ResourceHandle};
pub use crate::create::ShaderCreateInfo;
pub use crate::error::ShaderError;
pub use crate::layout::{ResourceClass, ResourceClassifier, StaticLayout, StaticLayoutEntry};
pub use crate::shader::{BoundResource, Shader, ShaderModule, StaticBindings};
pub use crate::stage::{ShaderStage, ShaderStageFlags, SourceLanguage};
pub use crate::translate::{DiagnosticSink, TranslateRequest, Translator};

pub use prism_spirv::{ResourceKind, ResourceManifest, ShaderResource};
