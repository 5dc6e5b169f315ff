use crate::op::{
    DEC_BINDING, DEC_DESCRIPTOR_SET, EXEC_MODEL_FRAGMENT, EXEC_MODEL_VERTEX, OP_DECORATE,
    OP_TYPE_POINTER, OP_TYPE_STRUCT, OP_VARIABLE, SC_UNIFORM,
};
use crate::test_utils::ModuleBuilder;
use crate::{reflect_resources, ResourceKind, SpirvErrorKind, SpirvModule};

fn reflect(words: &[u32], suffix: Option<&str>) -> Result<crate::ResourceManifest, crate::SpirvError> {
    let module = SpirvModule::parse_words(words).expect("module should parse");
    reflect_resources(&module, suffix)
}

#[test]
fn reflects_resources_in_declaration_order() {
    let mut builder = ModuleBuilder::new();
    builder
        .entry_point(EXEC_MODEL_FRAGMENT, "main")
        .uniform_buffer("Constants", 0, 0)
        .storage_buffer("Particles", 0, 1)
        .sampled_image("Albedo", 1, 0)
        .storage_image("Output", 1, 1)
        .sampler("LinearClamp", 1, 2)
        .combined_image_sampler("Environment", 1, 3);

    let manifest = reflect(&builder.finish(), None).expect("reflection should succeed");

    let kinds: Vec<_> = manifest.iter().map(|r| (r.name.as_str(), r.kind)).collect();
    assert_eq!(
        kinds,
        [
            ("Constants", ResourceKind::UniformBuffer),
            ("Particles", ResourceKind::StorageBuffer),
            ("Albedo", ResourceKind::SampledImage),
            ("Output", ResourceKind::StorageImage),
            ("LinearClamp", ResourceKind::Sampler),
            ("Environment", ResourceKind::CombinedImageSampler),
        ]
    );

    let albedo = manifest.find("Albedo").expect("Albedo should be present");
    assert_eq!((albedo.set, albedo.binding, albedo.array_size), (1, 0, 1));
    assert!(albedo.stages.contains_model(EXEC_MODEL_FRAGMENT));
    assert!(!albedo.stages.contains_model(EXEC_MODEL_VERTEX));
    assert_eq!(albedo.paired_sampler, None);
}

#[test]
fn reflects_constant_array_length() {
    let mut builder = ModuleBuilder::new();
    builder
        .entry_point(EXEC_MODEL_FRAGMENT, "main")
        .sampled_image_array("Cascades", 0, 0, 4);

    let manifest = reflect(&builder.finish(), None).expect("reflection should succeed");
    assert_eq!(manifest.len(), 1);
    assert_eq!(manifest.get(0).unwrap().array_size, 4);
}

#[test]
fn merges_suffix_matched_sampler_into_texture() {
    let mut builder = ModuleBuilder::new();
    builder
        .entry_point(EXEC_MODEL_FRAGMENT, "main")
        .sampled_image("Tex", 0, 0)
        .sampler("Tex_sampler", 0, 1);

    let manifest = reflect(&builder.finish(), Some("_sampler")).expect("reflection should succeed");

    // Exactly one entry, the texture's name and position, combined kind.
    assert_eq!(manifest.len(), 1);
    let merged = manifest.get(0).unwrap();
    assert_eq!(merged.name, "Tex");
    assert_eq!(merged.kind, ResourceKind::CombinedImageSampler);
    assert_eq!((merged.set, merged.binding), (0, 0));
    assert_eq!(merged.paired_sampler, Some((0, 1)));
}

#[test]
fn unmatched_sampler_stays_separate() {
    let mut builder = ModuleBuilder::new();
    builder
        .entry_point(EXEC_MODEL_FRAGMENT, "main")
        .sampled_image("Tex", 0, 0)
        .sampler("Other_sampler", 0, 1)
        .sampler("Shared", 0, 2);

    let manifest = reflect(&builder.finish(), Some("_sampler")).expect("reflection should succeed");

    assert_eq!(manifest.len(), 3);
    assert_eq!(manifest.find("Tex").unwrap().kind, ResourceKind::SampledImage);
    assert_eq!(
        manifest.find("Other_sampler").unwrap().kind,
        ResourceKind::Sampler
    );
    assert_eq!(manifest.find("Shared").unwrap().kind, ResourceKind::Sampler);
}

#[test]
fn suffix_is_ignored_when_disabled() {
    let mut builder = ModuleBuilder::new();
    builder
        .entry_point(EXEC_MODEL_FRAGMENT, "main")
        .sampled_image("Tex", 0, 0)
        .sampler("Tex_sampler", 0, 1);

    let manifest = reflect(&builder.finish(), None).expect("reflection should succeed");
    assert_eq!(manifest.len(), 2);
}

#[test]
fn rejects_duplicate_set_binding_pair() {
    let mut builder = ModuleBuilder::new();
    builder
        .entry_point(EXEC_MODEL_FRAGMENT, "main")
        .uniform_buffer("A", 0, 3)
        .sampled_image("B", 0, 3);

    let err = reflect(&builder.finish(), None).unwrap_err();
    assert_eq!(err.kind(), SpirvErrorKind::InvalidResource);
    assert!(
        err.context().contains("duplicate descriptor binding"),
        "context: {}",
        err.context()
    );
    assert!(err.context().contains("`A`") && err.context().contains("`B`"));
}

#[test]
fn rejects_duplicate_resource_name() {
    let mut builder = ModuleBuilder::new();
    builder
        .entry_point(EXEC_MODEL_FRAGMENT, "main")
        .uniform_buffer("Same", 0, 0)
        .sampled_image("Same", 0, 1);

    let err = reflect(&builder.finish(), None).unwrap_err();
    assert_eq!(err.kind(), SpirvErrorKind::InvalidResource);
    assert!(
        err.context().contains("duplicate resource name"),
        "context: {}",
        err.context()
    );
}

#[test]
fn rejects_resource_missing_descriptor_set() {
    let mut builder = ModuleBuilder::new();
    builder.entry_point(EXEC_MODEL_FRAGMENT, "main");
    // A Block struct variable in Uniform class with a Binding decoration but
    // no DescriptorSet.
    let member = builder.int_type();
    let st = builder.alloc_id();
    builder.raw_instruction(OP_TYPE_STRUCT, &[st, member]);
    builder.decorate(st, crate::op::DEC_BLOCK, &[]);
    let ptr = builder.alloc_id();
    builder.raw_instruction(OP_TYPE_POINTER, &[ptr, SC_UNIFORM, st]);
    let var = builder.alloc_id();
    builder.raw_instruction(OP_VARIABLE, &[ptr, var, SC_UNIFORM]);
    builder.op_name(var, "Orphan");
    builder.raw_instruction(OP_DECORATE, &[var, DEC_BINDING, 0]);

    let err = reflect(&builder.finish(), None).unwrap_err();
    assert_eq!(err.kind(), SpirvErrorKind::InvalidResource);
    assert!(
        err.context().contains("DescriptorSet"),
        "context: {}",
        err.context()
    );
}

#[test]
fn rejects_nameless_resource() {
    let mut builder = ModuleBuilder::new();
    builder.entry_point(EXEC_MODEL_FRAGMENT, "main");
    let member = builder.int_type();
    let st = builder.alloc_id();
    builder.raw_instruction(OP_TYPE_STRUCT, &[st, member]);
    builder.decorate(st, crate::op::DEC_BLOCK, &[]);
    let ptr = builder.alloc_id();
    builder.raw_instruction(OP_TYPE_POINTER, &[ptr, SC_UNIFORM, st]);
    let var = builder.alloc_id();
    builder.raw_instruction(OP_VARIABLE, &[ptr, var, SC_UNIFORM]);
    builder.raw_instruction(OP_DECORATE, &[var, DEC_DESCRIPTOR_SET, 0]);
    builder.raw_instruction(OP_DECORATE, &[var, DEC_BINDING, 0]);

    let err = reflect(&builder.finish(), None).unwrap_err();
    assert_eq!(err.kind(), SpirvErrorKind::InvalidResource);
    assert!(
        err.context().contains("no debug name"),
        "context: {}",
        err.context()
    );
}

#[test]
fn rejects_undecorated_uniform_struct() {
    let mut builder = ModuleBuilder::new();
    builder.entry_point(EXEC_MODEL_FRAGMENT, "main");
    // A struct without Block/BufferBlock cannot be classified.
    let member = builder.int_type();
    let st = builder.alloc_id();
    builder.raw_instruction(OP_TYPE_STRUCT, &[st, member]);
    let ptr = builder.alloc_id();
    builder.raw_instruction(OP_TYPE_POINTER, &[ptr, SC_UNIFORM, st]);
    let var = builder.alloc_id();
    builder.raw_instruction(OP_VARIABLE, &[ptr, var, SC_UNIFORM]);
    builder.op_name(var, "Untagged");
    builder.raw_instruction(OP_DECORATE, &[var, DEC_DESCRIPTOR_SET, 0]);
    builder.raw_instruction(OP_DECORATE, &[var, DEC_BINDING, 0]);

    let err = reflect(&builder.finish(), None).unwrap_err();
    assert_eq!(err.kind(), SpirvErrorKind::InvalidResource);
}

#[test]
fn rejects_module_without_entry_point() {
    let mut builder = ModuleBuilder::new();
    builder.uniform_buffer("Constants", 0, 0);

    let err = reflect(&builder.finish(), None).unwrap_err();
    assert_eq!(err.kind(), SpirvErrorKind::InvalidResource);
    assert!(
        err.context().contains("no entry points"),
        "context: {}",
        err.context()
    );
}

#[test]
fn skips_non_descriptor_storage_classes() {
    let mut builder = ModuleBuilder::new();
    builder
        .entry_point(EXEC_MODEL_VERTEX, "main")
        .uniform_buffer("Constants", 0, 0);
    // An Input-class variable (storage class 1) with no decorations must be
    // skipped, not rejected.
    let int = builder.int_type();
    let ptr = builder.alloc_id();
    builder.raw_instruction(OP_TYPE_POINTER, &[ptr, 1, int]);
    let var = builder.alloc_id();
    builder.raw_instruction(OP_VARIABLE, &[ptr, var, 1]);

    let manifest = reflect(&builder.finish(), None).expect("reflection should succeed");
    assert_eq!(manifest.len(), 1);
}

#[test]
fn entry_point_stages_accumulate() {
    let mut builder = ModuleBuilder::new();
    builder
        .entry_point(EXEC_MODEL_VERTEX, "vs_main")
        .entry_point(EXEC_MODEL_FRAGMENT, "fs_main")
        .uniform_buffer("Constants", 0, 0);

    let manifest = reflect(&builder.finish(), None).expect("reflection should succeed");
    let stages = manifest.get(0).unwrap().stages;
    assert!(stages.contains_model(EXEC_MODEL_VERTEX));
    assert!(stages.contains_model(EXEC_MODEL_FRAGMENT));
}

#[test]
fn debug_summary_lists_merged_sampler_binding() {
    let mut builder = ModuleBuilder::new();
    builder
        .entry_point(EXEC_MODEL_FRAGMENT, "main")
        .sampled_image("Tex", 0, 0)
        .sampler("Tex_sampler", 0, 1);

    let manifest = reflect(&builder.finish(), Some("_sampler")).expect("reflection should succeed");
    let summary = manifest.debug_summary();
    assert!(summary.contains("combined image sampler"), "summary: {summary}");
    assert!(summary.contains("sampler=(set=0, binding=1)"), "summary: {summary}");
}
