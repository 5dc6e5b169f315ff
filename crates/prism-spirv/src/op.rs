//! The subset of SPIR-V binary constants this crate understands.
//!
//! Values are from the SPIR-V specification (unified1). Only the opcodes and
//! enums needed to validate a module and reflect its descriptor bindings are
//! listed; everything else is skipped by the parser without being decoded.

/// Magic number in word 0 of every little-endian SPIR-V module.
pub const SPIRV_MAGIC: u32 = 0x0723_0203;
/// [`SPIRV_MAGIC`] as it appears when a module was serialized big-endian.
pub const SPIRV_MAGIC_REVERSED: u32 = 0x0302_2307;
/// Fixed header length in words (magic, version, generator, bound, schema).
pub const HEADER_WORDS: usize = 5;

/// `OpName`: attaches a debug name to a result id.
pub const OP_NAME: u16 = 5;
/// `OpEntryPoint`: declares an entry point and its execution model.
pub const OP_ENTRY_POINT: u16 = 15;
/// `OpTypeInt`.
pub const OP_TYPE_INT: u16 = 21;
/// `OpTypeImage`.
pub const OP_TYPE_IMAGE: u16 = 25;
/// `OpTypeSampler`.
pub const OP_TYPE_SAMPLER: u16 = 26;
/// `OpTypeSampledImage`: a combined image+sampler type.
pub const OP_TYPE_SAMPLED_IMAGE: u16 = 27;
/// `OpTypeArray`: fixed-length array, length given by a constant id.
pub const OP_TYPE_ARRAY: u16 = 28;
/// `OpTypeRuntimeArray`: unbounded array.
pub const OP_TYPE_RUNTIME_ARRAY: u16 = 29;
/// `OpTypeStruct`.
pub const OP_TYPE_STRUCT: u16 = 30;
/// `OpTypePointer`.
pub const OP_TYPE_POINTER: u16 = 32;
/// `OpConstant`: scalar constant (array lengths).
pub const OP_CONSTANT: u16 = 43;
/// `OpFunction`: first instruction past the module's global section.
pub const OP_FUNCTION: u16 = 54;
/// `OpVariable`: a global or local variable declaration.
pub const OP_VARIABLE: u16 = 59;
/// `OpDecorate`: attaches a decoration to a result id.
pub const OP_DECORATE: u16 = 71;

/// `UniformConstant` storage class: opaque resources (images, samplers).
pub const SC_UNIFORM_CONSTANT: u32 = 0;
/// `Uniform` storage class: buffer-backed resources.
pub const SC_UNIFORM: u32 = 2;
/// `PushConstant` storage class: not a descriptor binding; skipped.
pub const SC_PUSH_CONSTANT: u32 = 9;
/// `StorageBuffer` storage class (SPIR-V 1.3+ storage buffers).
pub const SC_STORAGE_BUFFER: u32 = 12;

/// `Block` decoration on a struct type.
pub const DEC_BLOCK: u32 = 2;
/// `BufferBlock` decoration on a struct type (pre-1.3 storage buffers).
pub const DEC_BUFFER_BLOCK: u32 = 3;
/// `Binding` decoration on a resource variable.
pub const DEC_BINDING: u32 = 33;
/// `DescriptorSet` decoration on a resource variable.
pub const DEC_DESCRIPTOR_SET: u32 = 34;

/// `Vertex` execution model.
pub const EXEC_MODEL_VERTEX: u32 = 0;
/// `TessellationControl` execution model.
pub const EXEC_MODEL_TESSELLATION_CONTROL: u32 = 1;
/// `TessellationEvaluation` execution model.
pub const EXEC_MODEL_TESSELLATION_EVALUATION: u32 = 2;
/// `Geometry` execution model.
pub const EXEC_MODEL_GEOMETRY: u32 = 3;
/// `Fragment` execution model.
pub const EXEC_MODEL_FRAGMENT: u32 = 4;
/// `GLCompute` execution model.
pub const EXEC_MODEL_GL_COMPUTE: u32 = 5;
