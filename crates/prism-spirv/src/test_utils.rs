use crate::op::{
    DEC_BINDING, DEC_BLOCK, DEC_BUFFER_BLOCK, DEC_DESCRIPTOR_SET, OP_CONSTANT, OP_DECORATE,
    OP_ENTRY_POINT, OP_NAME, OP_TYPE_ARRAY, OP_TYPE_IMAGE, OP_TYPE_INT, OP_TYPE_POINTER,
    OP_TYPE_SAMPLED_IMAGE, OP_TYPE_SAMPLER, OP_TYPE_STRUCT, OP_VARIABLE, SC_UNIFORM,
    SC_UNIFORM_CONSTANT, SPIRV_MAGIC,
};

/// Assembles a minimal, structurally valid SPIR-V module for tests.
///
/// The builder emits real instruction encodings (names, decorations, types,
/// variables) so the resulting word stream exercises the same code paths as
/// compiler output, without requiring a shader compiler at test time. It
/// makes no attempt to produce a module a GPU driver would accept: there are
/// no function bodies, and entry points reference a fresh id.
pub struct ModuleBuilder {
    instructions: Vec<u32>,
    next_id: u32,
    int_type: Option<u32>,
}

impl ModuleBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        ModuleBuilder {
            instructions: Vec::new(),
            next_id: 1,
            int_type: None,
        }
    }

    pub(crate) fn alloc_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Appends a raw instruction; useful for crafting malformed streams.
    pub fn raw_instruction(&mut self, opcode: u16, operands: &[u32]) {
        let word_count = (operands.len() + 1) as u32;
        self.instructions.push((word_count << 16) | opcode as u32);
        self.instructions.extend_from_slice(operands);
    }

    pub(crate) fn op_name(&mut self, target: u32, name: &str) {
        let mut operands = vec![target];
        operands.extend(encode_string(name));
        self.raw_instruction(OP_NAME, &operands);
    }

    pub(crate) fn decorate(&mut self, target: u32, decoration: u32, extra: &[u32]) {
        let mut operands = vec![target, decoration];
        operands.extend_from_slice(extra);
        self.raw_instruction(OP_DECORATE, &operands);
    }

    pub(crate) fn int_type(&mut self) -> u32 {
        if let Some(id) = self.int_type {
            return id;
        }
        let id = self.alloc_id();
        self.raw_instruction(OP_TYPE_INT, &[id, 32, 0]);
        self.int_type = Some(id);
        id
    }

    fn image_type(&mut self, sampled: u32) -> u32 {
        let component = self.int_type();
        let id = self.alloc_id();
        // result, sampled type, dim (2D), depth, arrayed, ms, sampled, format
        self.raw_instruction(OP_TYPE_IMAGE, &[id, component, 1, 0, 0, 0, sampled, 0]);
        id
    }

    fn pointer_variable(&mut self, pointee: u32, storage_class: u32) -> u32 {
        let pointer = self.alloc_id();
        self.raw_instruction(OP_TYPE_POINTER, &[pointer, storage_class, pointee]);
        let var = self.alloc_id();
        self.raw_instruction(OP_VARIABLE, &[pointer, var, storage_class]);
        var
    }

    fn named_resource(&mut self, var: u32, name: &str, set: u32, binding: u32) -> u32 {
        self.op_name(var, name);
        self.decorate(var, DEC_DESCRIPTOR_SET, &[set]);
        self.decorate(var, DEC_BINDING, &[binding]);
        var
    }

    /// Declares an entry point with the given execution model.
    pub fn entry_point(&mut self, execution_model: u32, name: &str) -> &mut Self {
        let function = self.alloc_id();
        let mut operands = vec![execution_model, function];
        operands.extend(encode_string(name));
        self.raw_instruction(OP_ENTRY_POINT, &operands);
        self
    }

    /// Declares a named uniform buffer (`Block` struct in `Uniform` class).
    pub fn uniform_buffer(&mut self, name: &str, set: u32, binding: u32) -> &mut Self {
        let member = self.int_type();
        let st = self.alloc_id();
        self.raw_instruction(OP_TYPE_STRUCT, &[st, member]);
        self.decorate(st, DEC_BLOCK, &[]);
        let var = self.pointer_variable(st, SC_UNIFORM);
        self.named_resource(var, name, set, binding);
        self
    }

    /// Declares a named storage buffer (`BufferBlock` struct).
    pub fn storage_buffer(&mut self, name: &str, set: u32, binding: u32) -> &mut Self {
        let member = self.int_type();
        let st = self.alloc_id();
        self.raw_instruction(OP_TYPE_STRUCT, &[st, member]);
        self.decorate(st, DEC_BUFFER_BLOCK, &[]);
        let var = self.pointer_variable(st, SC_UNIFORM);
        self.named_resource(var, name, set, binding);
        self
    }

    /// Declares a named sampled image (texture).
    pub fn sampled_image(&mut self, name: &str, set: u32, binding: u32) -> &mut Self {
        let image = self.image_type(1);
        let var = self.pointer_variable(image, SC_UNIFORM_CONSTANT);
        self.named_resource(var, name, set, binding);
        self
    }

    /// Declares a named array of sampled images with a constant length.
    pub fn sampled_image_array(
        &mut self,
        name: &str,
        set: u32,
        binding: u32,
        length: u32,
    ) -> &mut Self {
        let int = self.int_type();
        let length_id = self.alloc_id();
        self.raw_instruction(OP_CONSTANT, &[int, length_id, length]);
        let image = self.image_type(1);
        let array = self.alloc_id();
        self.raw_instruction(OP_TYPE_ARRAY, &[array, image, length_id]);
        let var = self.pointer_variable(array, SC_UNIFORM_CONSTANT);
        self.named_resource(var, name, set, binding);
        self
    }

    /// Declares a named storage image.
    pub fn storage_image(&mut self, name: &str, set: u32, binding: u32) -> &mut Self {
        let image = self.image_type(2);
        let var = self.pointer_variable(image, SC_UNIFORM_CONSTANT);
        self.named_resource(var, name, set, binding);
        self
    }

    /// Declares a named separate sampler.
    pub fn sampler(&mut self, name: &str, set: u32, binding: u32) -> &mut Self {
        let ty = self.alloc_id();
        self.raw_instruction(OP_TYPE_SAMPLER, &[ty]);
        let var = self.pointer_variable(ty, SC_UNIFORM_CONSTANT);
        self.named_resource(var, name, set, binding);
        self
    }

    /// Declares a named combined image sampler (SPIR-V sampled-image type).
    pub fn combined_image_sampler(&mut self, name: &str, set: u32, binding: u32) -> &mut Self {
        let image = self.image_type(1);
        let combined = self.alloc_id();
        self.raw_instruction(OP_TYPE_SAMPLED_IMAGE, &[combined, image]);
        let var = self.pointer_variable(combined, SC_UNIFORM_CONSTANT);
        self.named_resource(var, name, set, binding);
        self
    }

    /// Finishes the module, producing a word stream with a valid header.
    pub fn finish(&self) -> Vec<u32> {
        let mut out = Vec::with_capacity(5 + self.instructions.len());
        out.push(SPIRV_MAGIC);
        out.push(0x0001_0300); // SPIR-V 1.3
        out.push(0); // generator
        out.push(self.next_id); // bound
        out.push(0); // schema
        out.extend_from_slice(&self.instructions);
        out
    }

    /// Finishes the module as little-endian bytes.
    pub fn finish_bytes(&self) -> Vec<u8> {
        self.finish()
            .iter()
            .flat_map(|w| w.to_le_bytes())
            .collect()
    }
}

impl Default for ModuleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Encodes a null-terminated, word-padded SPIR-V literal string.
fn encode_string(s: &str) -> Vec<u32> {
    let mut bytes = s.as_bytes().to_vec();
    bytes.push(0);
    while bytes.len() % 4 != 0 {
        bytes.push(0);
    }
    bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}
