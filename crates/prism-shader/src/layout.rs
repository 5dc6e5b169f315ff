use prism_spirv::{ResourceKind, ResourceManifest, ShaderResource};
use std::collections::HashMap;

/// How a resource is bound over the shader's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceClass {
    /// Bound once on the shader and shared by every pipeline using it.
    Static,
    /// Bound per pipeline instance.
    Mutable,
    /// Bound per draw/dispatch.
    Dynamic,
}

/// Decides, per resource, whether it is static, mutable, or dynamic.
///
/// The policy is injected by the caller; this crate consumes it only while
/// building the static layout and keeps no reference to it afterwards.
pub trait ResourceClassifier {
    /// Classifies a single manifest entry.
    fn classify(&self, resource: &ShaderResource) -> ResourceClass;
}

impl<F> ResourceClassifier for F
where
    F: Fn(&ShaderResource) -> ResourceClass,
{
    fn classify(&self, resource: &ShaderResource) -> ResourceClass {
        self(resource)
    }
}

/// One static resource's place in the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticLayoutEntry {
    /// The resource's name, the key used by the binding surface.
    pub name: String,
    /// The resource's descriptor kind.
    pub kind: ResourceKind,
    /// Index of the resource in the shader's manifest.
    pub manifest_index: usize,
}

/// The static-classified subset of a shader's manifest, with assigned cache
/// slots.
///
/// Slots are assigned in manifest order, starting at zero, and the layout is
/// frozen once built. Name lookup is backed by a hash table, so `slot_of` is
/// average O(1) after construction.
pub struct StaticLayout {
    entries: Vec<StaticLayoutEntry>,
    by_name: HashMap<String, usize>,
}

impl StaticLayout {
    pub(crate) fn build(manifest: &ResourceManifest, classifier: &dyn ResourceClassifier) -> Self {
        let mut entries = Vec::new();
        let mut by_name = HashMap::new();
        for (manifest_index, resource) in manifest.iter().enumerate() {
            if classifier.classify(resource) != ResourceClass::Static {
                continue;
            }
            // Reflection guarantees unique names, so this insert cannot clash.
            by_name.insert(resource.name.clone(), entries.len());
            entries.push(StaticLayoutEntry {
                name: resource.name.clone(),
                kind: resource.kind,
                manifest_index,
            });
        }
        StaticLayout { entries, by_name }
    }

    /// Returns the number of static slots.
    pub fn slot_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns the cache slot assigned to `name`, if `name` is a static
    /// resource of this shader.
    pub fn slot_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Returns all entries in slot order.
    pub fn entries(&self) -> &[StaticLayoutEntry] {
        &self.entries
    }
}
