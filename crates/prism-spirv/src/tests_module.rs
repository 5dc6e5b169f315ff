use crate::op::{EXEC_MODEL_FRAGMENT, OP_NAME, SPIRV_MAGIC};
use crate::test_utils::ModuleBuilder;
use crate::{words_from_bytes, SpirvError, SpirvErrorKind, SpirvModule};

fn fragment_module() -> Vec<u32> {
    let mut builder = ModuleBuilder::new();
    builder
        .entry_point(EXEC_MODEL_FRAGMENT, "main")
        .uniform_buffer("Constants", 0, 0)
        .sampled_image("Tex", 0, 1);
    builder.finish()
}

#[test]
fn parses_well_formed_module() {
    let words = fragment_module();
    let module = SpirvModule::parse_words(&words).expect("module should parse");

    assert_eq!(module.header().version_parts(), (1, 3));
    assert_eq!(module.words().len(), words.len());
    assert!(module.instructions().count() > 0);
}

#[test]
fn rejects_truncated_header() {
    let err = SpirvModule::parse_words(&[SPIRV_MAGIC, 0x0001_0300]).unwrap_err();
    assert_eq!(err.kind(), SpirvErrorKind::MalformedHeader);
}

#[test]
fn rejects_bad_magic() {
    let err = SpirvModule::parse_words(&[0xdead_beef, 0, 0, 8, 0]).unwrap_err();
    assert_eq!(err.kind(), SpirvErrorKind::MalformedHeader);
    assert!(err.context().contains("magic"), "context: {}", err.context());
}

#[test]
fn rejects_byte_swapped_module_distinctly() {
    let mut words = fragment_module();
    for word in &mut words {
        *word = word.swap_bytes();
    }
    let err = SpirvModule::parse_words(&words).unwrap_err();
    assert_eq!(err.kind(), SpirvErrorKind::MalformedHeader);
    assert!(
        err.context().contains("byte-swapped"),
        "context: {}",
        err.context()
    );
}

#[test]
fn rejects_zero_word_count_instruction() {
    let mut words = fragment_module();
    // A word count of zero would make the stream offset stop advancing.
    words.push(OP_NAME as u32);
    let err = SpirvModule::parse_words(&words).unwrap_err();
    assert_eq!(err.kind(), SpirvErrorKind::MalformedInstruction);
}

#[test]
fn rejects_instruction_overrunning_stream() {
    let mut words = fragment_module();
    // Declares 200 words but the stream ends immediately after.
    words.push((200u32 << 16) | OP_NAME as u32);
    let err = SpirvModule::parse_words(&words).unwrap_err();
    assert_eq!(err.kind(), SpirvErrorKind::MalformedInstruction);
    assert!(
        err.context().contains("declares 200 words"),
        "context: {}",
        err.context()
    );
}

#[test]
fn instruction_iterator_covers_stream_in_order() {
    let words = fragment_module();
    let module = SpirvModule::parse_words(&words).expect("module should parse");

    let mut covered = crate::op::HEADER_WORDS;
    for inst in module.instructions() {
        covered += 1 + inst.operands.len();
    }
    assert_eq!(covered, words.len());
}

#[test]
fn words_from_bytes_decodes_little_endian() {
    let words = fragment_module();
    let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
    assert_eq!(words_from_bytes(&bytes).expect("aligned bytes"), words);
}

#[test]
fn words_from_bytes_rejects_unaligned_length() {
    let err: SpirvError = words_from_bytes(&[1, 2, 3]).unwrap_err();
    assert_eq!(err.kind(), SpirvErrorKind::MalformedHeader);
    assert!(
        err.context().contains("multiple of the 4-byte word size"),
        "context: {}",
        err.context()
    );
}

#[test]
fn debug_summary_mentions_version_and_counts() {
    let words = fragment_module();
    let module = SpirvModule::parse_words(&words).expect("module should parse");
    let summary = module.debug_summary();
    assert!(summary.starts_with("SPIR-V 1.3"), "summary: {summary}");
    assert!(summary.contains("instructions="), "summary: {summary}");
}
