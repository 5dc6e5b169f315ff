use crate::error::SpirvError;
use crate::op::{HEADER_WORDS, SPIRV_MAGIC, SPIRV_MAGIC_REVERSED};
use core::fmt;

/// The fixed 5-word header of a SPIR-V module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpirvHeader {
    /// Encoded version (`0x00MMmm00` for version `MM.mm`).
    pub version: u32,
    /// Tool id of the generator that produced the module.
    pub generator: u32,
    /// Upper bound on the result ids used by the module.
    pub bound: u32,
    /// Reserved schema word; zero in every published SPIR-V version.
    pub schema: u32,
}

impl SpirvHeader {
    /// Returns the `(major, minor)` SPIR-V version this module declares.
    pub fn version_parts(&self) -> (u8, u8) {
        (((self.version >> 16) & 0xFF) as u8, ((self.version >> 8) & 0xFF) as u8)
    }
}

/// A single SPIR-V instruction: opcode plus operand words.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Instruction<'a> {
    /// The instruction's opcode (low 16 bits of its first word).
    pub opcode: u16,
    /// Operand words following the opcode word.
    pub operands: &'a [u32],
}

impl fmt::Debug for Instruction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instruction")
            .field("opcode", &self.opcode)
            .field("operand_count", &self.operands.len())
            .finish()
    }
}

/// A validated, zero-copy view over a SPIR-V word stream.
///
/// Parsing is strict about bounds: every instruction's declared word count is
/// checked against the stream length up front, so iteration never reads out
/// of bounds and never panics on hostile input.
#[derive(Debug, Clone)]
pub struct SpirvModule<'a> {
    words: &'a [u32],
    header: SpirvHeader,
}

impl<'a> SpirvModule<'a> {
    /// Parses a SPIR-V module from a little-endian word stream.
    ///
    /// The input is treated as **untrusted**: the header and the word count
    /// of every instruction are validated before a module is returned.
    pub fn parse_words(words: &'a [u32]) -> Result<SpirvModule<'a>, SpirvError> {
        if words.len() < HEADER_WORDS {
            return Err(SpirvError::malformed_header(format!(
                "need at least {HEADER_WORDS} words, got {}",
                words.len()
            )));
        }

        let magic = words[0];
        if magic == SPIRV_MAGIC_REVERSED {
            return Err(SpirvError::malformed_header(
                "module is byte-swapped (big-endian); callers must supply little-endian words",
            ));
        }
        if magic != SPIRV_MAGIC {
            return Err(SpirvError::malformed_header(format!(
                "bad magic 0x{magic:08x}, expected 0x{SPIRV_MAGIC:08x}"
            )));
        }

        let header = SpirvHeader {
            version: words[1],
            generator: words[2],
            bound: words[3],
            schema: words[4],
        };

        let mut offset = HEADER_WORDS;
        while offset < words.len() {
            let first = words[offset];
            let opcode = (first & 0xFFFF) as u16;
            let word_count = (first >> 16) as usize;
            if word_count == 0 {
                return Err(SpirvError::malformed_instruction(format!(
                    "instruction at word {offset} (opcode {opcode}) declares a zero word count"
                )));
            }
            let end = offset.checked_add(word_count).ok_or_else(|| {
                SpirvError::malformed_instruction(format!(
                    "instruction at word {offset} (opcode {opcode}) overflows the stream offset"
                ))
            })?;
            if end > words.len() {
                return Err(SpirvError::malformed_instruction(format!(
                    "instruction at word {offset} (opcode {opcode}) declares {word_count} words, \
                     but only {} remain",
                    words.len() - offset
                )));
            }
            offset = end;
        }

        Ok(SpirvModule { words, header })
    }

    /// Returns the parsed module header.
    pub fn header(&self) -> &SpirvHeader {
        &self.header
    }

    /// Returns the full word stream, header included.
    pub fn words(&self) -> &'a [u32] {
        self.words
    }

    /// Iterates over all instructions in stream order.
    pub fn instructions(&self) -> impl Iterator<Item = Instruction<'a>> + '_ {
        InstructionIter {
            words: self.words,
            offset: HEADER_WORDS,
        }
    }

    /// Returns a human-readable one-line summary of the module.
    pub fn debug_summary(&self) -> String {
        let (major, minor) = self.header.version_parts();
        format!(
            "SPIR-V {major}.{minor} bound={} words={} instructions={}",
            self.header.bound,
            self.words.len(),
            self.instructions().count()
        )
    }
}

struct InstructionIter<'a> {
    words: &'a [u32],
    offset: usize,
}

impl<'a> Iterator for InstructionIter<'a> {
    type Item = Instruction<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = *self.words.get(self.offset)?;
        let opcode = (first & 0xFFFF) as u16;
        let word_count = (first >> 16) as usize;

        // parse_words already validated every word count; the gets below are
        // the non-panicking restatement of that invariant.
        let end = self.offset.checked_add(word_count)?;
        let operands = self.words.get(self.offset + 1..end)?;
        self.offset = end;
        Some(Instruction { opcode, operands })
    }
}

/// Decodes a little-endian byte buffer into SPIR-V words.
///
/// The byte length must be a multiple of the 4-byte word size.
pub fn words_from_bytes(bytes: &[u8]) -> Result<Vec<u32>, SpirvError> {
    if bytes.len() % 4 != 0 {
        return Err(SpirvError::malformed_header(format!(
            "byte length {} is not a multiple of the 4-byte word size",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}
