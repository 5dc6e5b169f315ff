use prism_spirv::ResourceKind;
use std::sync::Arc;

/// Marker for externally owned graphics resources (buffers, textures,
/// samplers) that can occupy a cache slot.
///
/// The cache never owns the underlying resource; it holds shared,
/// reference-counted handles and releases them when a slot is overwritten or
/// the owning shader is dropped. Dropping a reference never destroys a
/// resource that is still referenced elsewhere.
pub trait DeviceResource: Send + Sync + 'static {}

/// A shared handle to a [`DeviceResource`].
///
/// Handle identity is pointer identity: two handles refer to the same
/// underlying resource exactly when [`Arc::ptr_eq`] holds.
pub type ResourceHandle = Arc<dyn DeviceResource>;

#[derive(Clone)]
struct Slot {
    kind: ResourceKind,
    handle: Option<ResourceHandle>,
}

/// Fixed-slot storage for bound static resources.
///
/// The slot array is sized exactly to the static layout's slot count when
/// the shader is constructed and is never resized. Slot *structure* (count
/// and kind) is immutable; slot *contents* change through
/// [`ResourceCache::bind`]. No internal locking is performed; callers
/// serialize writers.
pub struct ResourceCache {
    slots: Box<[Slot]>,
    generation: u64,
}

impl ResourceCache {
    pub(crate) fn new(kinds: impl IntoIterator<Item = ResourceKind>) -> Self {
        let slots: Vec<Slot> = kinds
            .into_iter()
            .map(|kind| Slot { kind, handle: None })
            .collect();
        ResourceCache {
            slots: slots.into_boxed_slice(),
            generation: 0,
        }
    }

    /// Returns the number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the cache has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the resource kind recorded for `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of range.
    pub fn kind(&self, slot: usize) -> ResourceKind {
        self.slots[slot].kind
    }

    /// Returns the handle bound at `slot`, or `None` if the slot is unbound.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of range.
    pub fn handle(&self, slot: usize) -> Option<&ResourceHandle> {
        self.slots[slot].handle.as_ref()
    }

    /// Returns the cache generation.
    ///
    /// The generation increases monotonically, exactly when a slot's bound
    /// handle changes identity; downstream consumers compare generations to
    /// detect stale copies of the bound set.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Binds `handle` at `slot`, replacing and immediately releasing any
    /// previously bound reference.
    ///
    /// Rebinding the identical handle is a no-op and leaves the generation
    /// unchanged; otherwise the generation is bumped. Returns `true` if the
    /// bound identity changed.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of range. An out-of-range slot index is
    /// programmer misuse, not a recoverable runtime condition.
    pub fn bind(&mut self, slot: usize, handle: ResourceHandle) -> bool {
        assert!(
            slot < self.slots.len(),
            "resource cache slot {slot} out of range (cache has {} slots)",
            self.slots.len()
        );
        if let Some(existing) = &self.slots[slot].handle {
            if Arc::ptr_eq(existing, &handle) {
                return false;
            }
        }
        // The previous Arc, if any, is dropped here.
        self.slots[slot].handle = Some(handle);
        self.generation += 1;
        true
    }

    /// Iterates over `(kind, handle)` per slot, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, Option<&ResourceHandle>)> {
        self.slots.iter().map(|s| (s.kind, s.handle.as_ref()))
    }
}
