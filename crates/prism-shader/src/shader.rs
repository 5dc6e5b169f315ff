use crate::cache::{ResourceCache, ResourceHandle};
use crate::create::{ingest, ShaderCreateInfo};
use crate::error::ShaderError;
use crate::layout::{ResourceClassifier, StaticLayout};
use crate::stage::ShaderStage;
use crate::translate::{DiagnosticSink, Translator};
use prism_spirv::{reflect_resources, ResourceKind, ResourceManifest, SpirvModule};
use tracing::debug;

/// Read-only view of a shader for downstream pipeline assembly.
///
/// Backends and pipeline builders depend on this interface rather than on
/// the concrete [`Shader`] type; it covers exactly the frozen results of
/// ingestion, reflection, and static layout.
pub trait ShaderModule {
    /// The stage the shader was created for.
    fn stage(&self) -> ShaderStage;
    /// The entry point name.
    fn entry_point(&self) -> &str;
    /// The shader's bytecode words.
    fn bytecode(&self) -> &[u32];
    /// The reflected resource manifest.
    fn manifest(&self) -> &ResourceManifest;
    /// The number of static resource slots.
    fn static_slot_count(&self) -> usize;
}

/// One static resource as seen by [`StaticBindings::iter`].
#[derive(Clone, Copy)]
pub struct BoundResource<'a> {
    /// Cache slot index.
    pub slot: usize,
    /// Resource name.
    pub name: &'a str,
    /// Resource kind.
    pub kind: ResourceKind,
    /// Currently bound handle, if any.
    pub handle: Option<&'a ResourceHandle>,
}

/// The binding surface for a shader's static resources.
///
/// This is the only way callers bind resources before pipeline assembly.
/// Writes require `&mut` access and are not internally synchronized; callers
/// must serialize concurrent writers for a given shader instance.
pub struct StaticBindings {
    layout: StaticLayout,
    cache: ResourceCache,
}

impl StaticBindings {
    fn build(manifest: &ResourceManifest, classifier: &dyn ResourceClassifier) -> Self {
        let layout = StaticLayout::build(manifest, classifier);
        let cache = ResourceCache::new(layout.entries().iter().map(|e| e.kind));
        StaticBindings { layout, cache }
    }

    /// Returns the number of static slots.
    pub fn count(&self) -> usize {
        self.layout.slot_count()
    }

    /// Returns the cache generation; see [`ResourceCache::generation`].
    pub fn generation(&self) -> u64 {
        self.cache.generation()
    }

    /// Binds `handle` to the static resource named `name`.
    ///
    /// Unknown names fail with [`ShaderError::NotFound`] and leave the cache
    /// untouched. Binding the identical handle again is a no-op that leaves
    /// the generation unchanged; a different handle replaces the previous
    /// reference (releasing it immediately) and bumps the generation.
    pub fn set(&mut self, name: &str, handle: ResourceHandle) -> Result<(), ShaderError> {
        let slot = self
            .layout
            .slot_of(name)
            .ok_or_else(|| ShaderError::NotFound(name.to_owned()))?;
        self.cache.bind(slot, handle);
        Ok(())
    }

    /// Returns the handle bound to `name`, or `None` if the slot is unbound.
    ///
    /// Unknown names fail with [`ShaderError::NotFound`].
    pub fn get(&self, name: &str) -> Result<Option<ResourceHandle>, ShaderError> {
        let slot = self
            .layout
            .slot_of(name)
            .ok_or_else(|| ShaderError::NotFound(name.to_owned()))?;
        Ok(self.cache.handle(slot).cloned())
    }

    /// Returns the frozen static layout.
    pub fn layout(&self) -> &StaticLayout {
        &self.layout
    }

    /// Returns the underlying resource cache.
    pub fn cache(&self) -> &ResourceCache {
        &self.cache
    }

    /// Iterates over all static slots in slot order, bound or not.
    ///
    /// Pipeline assembly uses this to copy bound static resources into a
    /// pipeline-wide binding set.
    pub fn iter(&self) -> impl Iterator<Item = BoundResource<'_>> {
        self.layout
            .entries()
            .iter()
            .enumerate()
            .map(|(slot, entry)| BoundResource {
                slot,
                name: &entry.name,
                kind: entry.kind,
                handle: self.cache.handle(slot),
            })
    }

    /// Returns the names of all static resources whose slot is unbound.
    ///
    /// Read-only and advisory: calling this never changes cache state, and
    /// an unbound slot is not an error here.
    #[cfg(feature = "diagnostics")]
    pub fn unbound_resources(&self) -> Vec<&str> {
        self.iter()
            .filter(|r| r.handle.is_none())
            .map(|r| r.name)
            .collect()
    }

    /// Returns the first static resource whose slot is unbound, if any.
    #[cfg(feature = "diagnostics")]
    pub fn first_unbound(&self) -> Option<&str> {
        self.iter().find(|r| r.handle.is_none()).map(|r| r.name)
    }
}

/// A constructed shader: bytecode, reflected manifest, and static bindings.
///
/// `Shader::new` either returns a fully constructed object or an error;
/// there is no intermediate observable state. After construction the
/// bytecode, manifest, and layout are immutable and safe for concurrent
/// reads; only the static binding contents change, through
/// [`Shader::static_bindings_mut`].
pub struct Shader {
    name: String,
    stage: ShaderStage,
    entry_point: String,
    words: Vec<u32>,
    manifest: ResourceManifest,
    statics: StaticBindings,
}

impl Shader {
    /// Constructs a shader from `info`.
    ///
    /// Runs the full construction protocol: ingestion (validation, optional
    /// translation via `translator`), reflection, and static layout/cache
    /// construction using `classifier`. Construction is single-threaded and
    /// atomic: every failure releases all partially built state before the
    /// error surfaces.
    pub fn new(
        info: &ShaderCreateInfo<'_>,
        translator: &dyn Translator,
        classifier: &dyn ResourceClassifier,
        sink: Option<&mut dyn DiagnosticSink>,
    ) -> Result<Shader, ShaderError> {
        let words = ingest(info, translator, sink)?;
        debug!(shader = info.name, words = words.len(), "ingested shader bytecode");

        let module = SpirvModule::parse_words(&words).map_err(ShaderError::Reflection)?;
        let suffix = info
            .use_combined_samplers
            .then_some(info.combined_sampler_suffix);
        let manifest = reflect_resources(&module, suffix)?;
        debug!(
            shader = info.name,
            resources = manifest.len(),
            "reflected resource manifest"
        );

        let statics = StaticBindings::build(&manifest, classifier);
        debug!(
            shader = info.name,
            static_slots = statics.count(),
            "built static resource layout"
        );

        Ok(Shader {
            name: info.name.to_owned(),
            stage: info.stage,
            entry_point: info.entry_point.to_owned(),
            words,
            manifest,
            statics,
        })
    }

    /// Returns the shader's debug label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the stored bytecode as little-endian bytes.
    ///
    /// For a shader created from precompiled bytecode this is byte-identical
    /// to the creation input.
    pub fn bytecode_bytes(&self) -> Vec<u8> {
        self.words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    /// Returns the static binding surface.
    pub fn static_bindings(&self) -> &StaticBindings {
        &self.statics
    }

    /// Returns the static binding surface for mutation.
    pub fn static_bindings_mut(&mut self) -> &mut StaticBindings {
        &mut self.statics
    }
}

impl ShaderModule for Shader {
    fn stage(&self) -> ShaderStage {
        self.stage
    }

    fn entry_point(&self) -> &str {
        &self.entry_point
    }

    fn bytecode(&self) -> &[u32] {
        &self.words
    }

    fn manifest(&self) -> &ResourceManifest {
        &self.manifest
    }

    fn static_slot_count(&self) -> usize {
        self.statics.count()
    }
}
