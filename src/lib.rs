//! Umbrella crate for the prism workspace.
//!
//! Re-exports the workspace members so integration tests and downstream
//! consumers can depend on a single crate.

pub use prism_shader as shader;
pub use prism_spirv as spirv;
