pub mod buffers;
pub mod gl;
pub mod pipeline;
pub(crate) mod validation;
