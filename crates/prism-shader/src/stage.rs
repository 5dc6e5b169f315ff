use core::fmt;
use prism_spirv::op::{
    EXEC_MODEL_FRAGMENT, EXEC_MODEL_GEOMETRY, EXEC_MODEL_GL_COMPUTE,
    EXEC_MODEL_TESSELLATION_CONTROL, EXEC_MODEL_TESSELLATION_EVALUATION, EXEC_MODEL_VERTEX,
};
use prism_spirv::StageMask;

/// Pipeline stages a shader can be created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    TessellationControl,
    TessellationEvaluation,
    Geometry,
    Fragment,
    Compute,
}

impl ShaderStage {
    /// Converts a SPIR-V execution model into a stage.
    pub const fn from_execution_model(model: u32) -> Option<Self> {
        match model {
            EXEC_MODEL_VERTEX => Some(Self::Vertex),
            EXEC_MODEL_TESSELLATION_CONTROL => Some(Self::TessellationControl),
            EXEC_MODEL_TESSELLATION_EVALUATION => Some(Self::TessellationEvaluation),
            EXEC_MODEL_GEOMETRY => Some(Self::Geometry),
            EXEC_MODEL_FRAGMENT => Some(Self::Fragment),
            EXEC_MODEL_GL_COMPUTE => Some(Self::Compute),
            _ => None,
        }
    }

    /// Returns this stage's SPIR-V execution model.
    pub const fn execution_model(self) -> u32 {
        match self {
            Self::Vertex => EXEC_MODEL_VERTEX,
            Self::TessellationControl => EXEC_MODEL_TESSELLATION_CONTROL,
            Self::TessellationEvaluation => EXEC_MODEL_TESSELLATION_EVALUATION,
            Self::Geometry => EXEC_MODEL_GEOMETRY,
            Self::Fragment => EXEC_MODEL_FRAGMENT,
            Self::Compute => EXEC_MODEL_GL_COMPUTE,
        }
    }

    /// Returns this stage as a single-bit flag set.
    pub const fn flag(self) -> ShaderStageFlags {
        ShaderStageFlags::from_bits_truncate(1 << self.execution_model())
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::TessellationControl => "tessellation control",
            ShaderStage::TessellationEvaluation => "tessellation evaluation",
            ShaderStage::Geometry => "geometry",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Compute => "compute",
        };
        f.write_str(name)
    }
}

bitflags::bitflags! {
    /// Bit mask of pipeline stages.
    ///
    /// Bit positions follow the SPIR-V execution-model numbering, so the
    /// reflection crate's [`StageMask`] converts losslessly.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShaderStageFlags: u32 {
        const VERTEX = 1 << EXEC_MODEL_VERTEX;
        const TESSELLATION_CONTROL = 1 << EXEC_MODEL_TESSELLATION_CONTROL;
        const TESSELLATION_EVALUATION = 1 << EXEC_MODEL_TESSELLATION_EVALUATION;
        const GEOMETRY = 1 << EXEC_MODEL_GEOMETRY;
        const FRAGMENT = 1 << EXEC_MODEL_FRAGMENT;
        const COMPUTE = 1 << EXEC_MODEL_GL_COMPUTE;
    }
}

impl From<StageMask> for ShaderStageFlags {
    fn from(mask: StageMask) -> Self {
        ShaderStageFlags::from_bits_truncate(mask.bits())
    }
}

/// Source languages the external translator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    Hlsl,
    Glsl,
}

impl fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLanguage::Hlsl => f.write_str("HLSL"),
            SourceLanguage::Glsl => f.write_str("GLSL"),
        }
    }
}
