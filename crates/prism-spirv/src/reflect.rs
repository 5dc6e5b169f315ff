//! Extracts the descriptor-binding manifest from a parsed SPIR-V module.
//!
//! Reflection walks the module's global section once, collecting names,
//! decorations, types, constants, and variables, then resolves every
//! interface variable into a [`ShaderResource`]. The walk is order-tolerant:
//! SPIR-V places debug names and decorations before types and variables, but
//! nothing here depends on that.

use crate::error::SpirvError;
use crate::module::{Instruction, SpirvModule};
use crate::op::{
    DEC_BINDING, DEC_BLOCK, DEC_BUFFER_BLOCK, DEC_DESCRIPTOR_SET, OP_CONSTANT, OP_DECORATE,
    OP_ENTRY_POINT, OP_FUNCTION, OP_NAME, OP_TYPE_ARRAY, OP_TYPE_IMAGE, OP_TYPE_POINTER,
    OP_TYPE_RUNTIME_ARRAY, OP_TYPE_SAMPLED_IMAGE, OP_TYPE_SAMPLER, OP_TYPE_STRUCT,
    SC_STORAGE_BUFFER, SC_UNIFORM, SC_UNIFORM_CONSTANT,
};
use core::fmt;
use std::collections::{HashMap, HashSet};

/// The kind of descriptor binding a [`ShaderResource`] occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A uniform buffer (`Uniform` storage class, `Block` struct).
    UniformBuffer,
    /// A storage buffer (`BufferBlock` struct or `StorageBuffer` class).
    StorageBuffer,
    /// A sampled image (texture) without an attached sampler.
    SampledImage,
    /// A storage image (read/write image access from the shader).
    StorageImage,
    /// A separate sampler.
    Sampler,
    /// An image and sampler bound as one logical unit.
    ///
    /// Either declared directly as a SPIR-V sampled-image variable, or
    /// produced by merging a texture with a suffix-matched separate sampler
    /// (see [`reflect_resources`]); merged entries record the sampler's
    /// descriptor binding in [`ShaderResource::paired_sampler`].
    CombinedImageSampler,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::UniformBuffer => "uniform buffer",
            ResourceKind::StorageBuffer => "storage buffer",
            ResourceKind::SampledImage => "sampled image",
            ResourceKind::StorageImage => "storage image",
            ResourceKind::Sampler => "sampler",
            ResourceKind::CombinedImageSampler => "combined image sampler",
        };
        f.write_str(name)
    }
}

/// Bit mask of SPIR-V execution models declared by a module's entry points.
///
/// Bit `n` corresponds to execution model `n` (`Vertex` = bit 0, `Fragment` =
/// bit 4, `GLCompute` = bit 5, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StageMask(u32);

impl StageMask {
    /// Returns the raw bit mask.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if no execution model is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the given execution model is set.
    pub const fn contains_model(self, execution_model: u32) -> bool {
        execution_model < 32 && (self.0 & (1 << execution_model)) != 0
    }

    fn insert_model(&mut self, execution_model: u32) {
        self.0 |= 1 << execution_model;
    }
}

/// A single resource binding declared by a shader module.
///
/// Immutable once created; manifest entries are never modified after
/// reflection completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderResource {
    /// The resource's debug name, used for binding lookups.
    pub name: String,
    /// What kind of descriptor this resource occupies.
    pub kind: ResourceKind,
    /// Descriptor-set index.
    pub set: u32,
    /// Binding index within the descriptor set.
    pub binding: u32,
    /// Array length; `1` for non-arrayed resources, `0` for unbounded
    /// runtime arrays.
    pub array_size: u32,
    /// Execution models (shader stages) whose entry points this module
    /// declares.
    pub stages: StageMask,
    /// For merged combined-sampler entries, the `(set, binding)` of the
    /// separate sampler that backs the second descriptor.
    pub paired_sampler: Option<(u32, u32)>,
}

/// The ordered list of resources a shader module declares.
///
/// Entries appear in module declaration order. Element count and order are
/// fixed once reflection completes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourceManifest {
    resources: Vec<ShaderResource>,
}

impl ResourceManifest {
    /// Returns the number of resources in the manifest.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns `true` if the module declares no resources.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Returns the resource at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&ShaderResource> {
        self.resources.get(index)
    }

    /// Iterates over all resources in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ShaderResource> {
        self.resources.iter()
    }

    /// Returns the resource with the given name, if any.
    pub fn find(&self, name: &str) -> Option<&ShaderResource> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Returns a human-readable summary of the manifest.
    pub fn debug_summary(&self) -> String {
        let mut out = String::new();
        use core::fmt::Write as _;

        let _ = write!(&mut out, "{} resources", self.resources.len());
        for (idx, r) in self.resources.iter().enumerate() {
            let _ = write!(
                &mut out,
                "\n  [{idx:02}] {} `{}` set={} binding={} array_size={}",
                r.kind, r.name, r.set, r.binding, r.array_size
            );
            if let Some((set, binding)) = r.paired_sampler {
                let _ = write!(&mut out, " sampler=(set={set}, binding={binding})");
            }
        }
        out
    }
}

/// A resource-relevant type declaration, keyed by result id.
#[derive(Debug, Clone, Copy)]
enum TypeDef {
    Struct,
    Image { sampled: u32 },
    Sampler,
    SampledImage,
    Array { element: u32, length_id: u32 },
    RuntimeArray { element: u32 },
    Pointer { pointee: u32 },
}

#[derive(Default)]
struct Collected {
    names: HashMap<u32, String>,
    sets: HashMap<u32, u32>,
    bindings: HashMap<u32, u32>,
    block_structs: HashSet<u32>,
    buffer_block_structs: HashSet<u32>,
    types: HashMap<u32, TypeDef>,
    constants: HashMap<u32, u32>,
    /// `(result_id, pointer_type_id, storage_class)` in declaration order.
    variables: Vec<(u32, u32, u32)>,
    stages: StageMask,
    saw_entry_point: bool,
}

/// Reflects the resource bindings declared by `module` into a manifest.
///
/// When `combined_sampler_suffix` is supplied, a separate sampler named
/// `<textureName><suffix>` is merged with its matching texture into a single
/// [`ResourceKind::CombinedImageSampler`] entry that keeps the texture's name
/// and manifest position and records the sampler's descriptor binding in
/// [`ShaderResource::paired_sampler`]. Samplers without a matching texture
/// are left as separate entries.
///
/// Malformed or self-inconsistent binding data (a resource without a name or
/// `DescriptorSet`/`Binding` decoration, duplicate `(set, binding)` pairs,
/// duplicate names, unsupported resource types) fails with an error; no
/// partial manifest is ever returned.
pub fn reflect_resources(
    module: &SpirvModule<'_>,
    combined_sampler_suffix: Option<&str>,
) -> Result<ResourceManifest, SpirvError> {
    let collected = collect_global_section(module)?;

    if !collected.saw_entry_point {
        return Err(SpirvError::invalid_resource(
            "module declares no entry points",
        ));
    }

    let mut resources = resolve_variables(&collected)?;

    if let Some(suffix) = combined_sampler_suffix.filter(|s| !s.is_empty()) {
        merge_combined_samplers(&mut resources, suffix);
    }

    Ok(ResourceManifest { resources })
}

fn collect_global_section(module: &SpirvModule<'_>) -> Result<Collected, SpirvError> {
    let mut c = Collected::default();

    for inst in module.instructions() {
        match inst.opcode {
            // Function bodies only contain Function-class variables; nothing
            // past the first OpFunction can declare a descriptor binding.
            OP_FUNCTION => break,
            OP_NAME => {
                if let Some((&target, string_words)) = inst.operands.split_first() {
                    let name = decode_literal_string(string_words, "OpName")?;
                    c.names.insert(target, name);
                }
            }
            OP_ENTRY_POINT => {
                let model = *inst.operands.first().ok_or_else(|| {
                    SpirvError::malformed_instruction("OpEntryPoint has no execution model operand")
                })?;
                if model >= 32 {
                    return Err(SpirvError::invalid_resource(format!(
                        "unsupported execution model {model}"
                    )));
                }
                c.stages.insert_model(model);
                c.saw_entry_point = true;
            }
            OP_DECORATE => {
                let [target, decoration, extra @ ..] = inst.operands else {
                    continue;
                };
                match *decoration {
                    DEC_DESCRIPTOR_SET => {
                        if let Some(&set) = extra.first() {
                            c.sets.insert(*target, set);
                        }
                    }
                    DEC_BINDING => {
                        if let Some(&binding) = extra.first() {
                            c.bindings.insert(*target, binding);
                        }
                    }
                    DEC_BLOCK => {
                        c.block_structs.insert(*target);
                    }
                    DEC_BUFFER_BLOCK => {
                        c.buffer_block_structs.insert(*target);
                    }
                    _ => {}
                }
            }
            OP_TYPE_STRUCT => {
                if let Some(&id) = inst.operands.first() {
                    c.types.insert(id, TypeDef::Struct);
                }
            }
            OP_TYPE_IMAGE => {
                // result, sampled type, dim, depth, arrayed, ms, sampled, format
                if let (Some(&id), Some(&sampled)) = (inst.operands.first(), inst.operands.get(6)) {
                    c.types.insert(id, TypeDef::Image { sampled });
                }
            }
            OP_TYPE_SAMPLER => {
                if let Some(&id) = inst.operands.first() {
                    c.types.insert(id, TypeDef::Sampler);
                }
            }
            OP_TYPE_SAMPLED_IMAGE => {
                if let Some(&id) = inst.operands.first() {
                    c.types.insert(id, TypeDef::SampledImage);
                }
            }
            OP_TYPE_ARRAY => {
                if let [id, element, length_id] = *inst.operands {
                    c.types.insert(id, TypeDef::Array { element, length_id });
                }
            }
            OP_TYPE_RUNTIME_ARRAY => {
                if let [id, element] = *inst.operands {
                    c.types.insert(id, TypeDef::RuntimeArray { element });
                }
            }
            OP_TYPE_POINTER => {
                if let [id, _storage_class, pointee] = *inst.operands {
                    c.types.insert(id, TypeDef::Pointer { pointee });
                }
            }
            OP_CONSTANT => {
                // result type, result id, value words; only the low word is
                // needed (array lengths fit in 32 bits).
                if let (Some(&id), Some(&value)) = (inst.operands.get(1), inst.operands.get(2)) {
                    c.constants.insert(id, value);
                }
            }
            OP_VARIABLE => {
                if let [pointer_type, result, storage_class, ..] = *inst.operands {
                    c.variables.push((result, pointer_type, storage_class));
                }
            }
            _ => {}
        }
    }

    Ok(c)
}

fn resolve_variables(c: &Collected) -> Result<Vec<ShaderResource>, SpirvError> {
    let mut resources = Vec::new();
    let mut seen_bindings: HashMap<(u32, u32), String> = HashMap::new();
    let mut seen_names: HashSet<String> = HashSet::new();

    for &(var_id, pointer_type, storage_class) in &c.variables {
        // Stage inputs/outputs, push constants, and private globals are not
        // descriptor bindings.
        if !matches!(
            storage_class,
            SC_UNIFORM_CONSTANT | SC_UNIFORM | SC_STORAGE_BUFFER
        ) {
            continue;
        }

        let describe = |c: &Collected| -> String {
            match c.names.get(&var_id) {
                Some(name) if !name.is_empty() => format!("`{name}`"),
                _ => format!("%{var_id}"),
            }
        };

        let Some(&TypeDef::Pointer { pointee }) = c.types.get(&pointer_type) else {
            return Err(SpirvError::invalid_resource(format!(
                "resource variable {} has a non-pointer result type",
                describe(c)
            )));
        };

        // Unwrap (possibly nested) arrays down to the element type.
        let mut array_size: u32 = 1;
        let mut element = pointee;
        loop {
            match c.types.get(&element) {
                Some(&TypeDef::Array { element: inner, length_id }) => {
                    array_size = *c.constants.get(&length_id).ok_or_else(|| {
                        SpirvError::invalid_resource(format!(
                            "array length of resource {} is not a plain constant",
                            describe(c)
                        ))
                    })?;
                    element = inner;
                }
                Some(&TypeDef::RuntimeArray { element: inner }) => {
                    array_size = 0;
                    element = inner;
                }
                _ => break,
            }
        }

        let kind = match (storage_class, c.types.get(&element)) {
            (SC_UNIFORM, Some(TypeDef::Struct)) => {
                if c.buffer_block_structs.contains(&element) {
                    ResourceKind::StorageBuffer
                } else if c.block_structs.contains(&element) {
                    ResourceKind::UniformBuffer
                } else {
                    return Err(SpirvError::invalid_resource(format!(
                        "uniform-class struct of resource {} is decorated neither Block nor \
                         BufferBlock",
                        describe(c)
                    )));
                }
            }
            (SC_STORAGE_BUFFER, Some(TypeDef::Struct)) => ResourceKind::StorageBuffer,
            (SC_UNIFORM_CONSTANT, Some(&TypeDef::Image { sampled })) => match sampled {
                1 => ResourceKind::SampledImage,
                2 => ResourceKind::StorageImage,
                other => {
                    return Err(SpirvError::invalid_resource(format!(
                        "image resource {} has unsupported `sampled` operand {other}",
                        describe(c)
                    )))
                }
            },
            (SC_UNIFORM_CONSTANT, Some(TypeDef::Sampler)) => ResourceKind::Sampler,
            (SC_UNIFORM_CONSTANT, Some(TypeDef::SampledImage)) => {
                ResourceKind::CombinedImageSampler
            }
            _ => {
                return Err(SpirvError::invalid_resource(format!(
                    "resource {} has an unsupported type for storage class {storage_class}",
                    describe(c)
                )))
            }
        };

        let set = *c.sets.get(&var_id).ok_or_else(|| {
            SpirvError::invalid_resource(format!(
                "resource {} is missing a DescriptorSet decoration",
                describe(c)
            ))
        })?;
        let binding = *c.bindings.get(&var_id).ok_or_else(|| {
            SpirvError::invalid_resource(format!(
                "resource {} is missing a Binding decoration",
                describe(c)
            ))
        })?;

        let name = match c.names.get(&var_id) {
            Some(name) if !name.is_empty() => name.clone(),
            _ => {
                return Err(SpirvError::invalid_resource(format!(
                    "resource at set={set} binding={binding} has no debug name; name-stripped \
                     modules cannot be bound by name"
                )))
            }
        };

        if let Some(previous) = seen_bindings.insert((set, binding), name.clone()) {
            return Err(SpirvError::invalid_resource(format!(
                "duplicate descriptor binding (set={set}, binding={binding}) shared by \
                 `{previous}` and `{name}`"
            )));
        }
        if !seen_names.insert(name.clone()) {
            return Err(SpirvError::invalid_resource(format!(
                "duplicate resource name `{name}`"
            )));
        }

        resources.push(ShaderResource {
            name,
            kind,
            set,
            binding,
            array_size,
            stages: c.stages,
            paired_sampler: None,
        });
    }

    Ok(resources)
}

fn merge_combined_samplers(resources: &mut Vec<ShaderResource>, suffix: &str) {
    let texture_index: HashMap<String, usize> = resources
        .iter()
        .enumerate()
        .filter(|(_, r)| r.kind == ResourceKind::SampledImage)
        .map(|(i, r)| (r.name.clone(), i))
        .collect();

    // (sampler index, texture index, sampler set, sampler binding)
    let mut merges: Vec<(usize, usize, u32, u32)> = Vec::new();
    for (i, r) in resources.iter().enumerate() {
        if r.kind != ResourceKind::Sampler {
            continue;
        }
        let Some(base) = r.name.strip_suffix(suffix) else {
            continue;
        };
        if let Some(&texture) = texture_index.get(base) {
            merges.push((i, texture, r.set, r.binding));
        }
    }

    let mut removed: HashSet<usize> = HashSet::new();
    for &(sampler, texture, set, binding) in &merges {
        resources[texture].kind = ResourceKind::CombinedImageSampler;
        resources[texture].paired_sampler = Some((set, binding));
        removed.insert(sampler);
    }

    if !removed.is_empty() {
        let mut index = 0;
        resources.retain(|_| {
            let keep = !removed.contains(&index);
            index += 1;
            keep
        });
    }
}

/// Decodes a null-terminated, word-padded SPIR-V literal string.
fn decode_literal_string(words: &[u32], what: &str) -> Result<String, SpirvError> {
    let mut bytes = Vec::with_capacity(words.len() * 4);
    for word in words {
        for byte in word.to_le_bytes() {
            if byte == 0 {
                return String::from_utf8(bytes).map_err(|_| {
                    SpirvError::malformed_instruction(format!(
                        "{what} literal string is not valid UTF-8"
                    ))
                });
            }
            bytes.push(byte);
        }
    }
    Err(SpirvError::malformed_instruction(format!(
        "{what} literal string is missing a null terminator"
    )))
}
