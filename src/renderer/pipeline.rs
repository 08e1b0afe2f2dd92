//! Tools for setting up the shader program.

use std::fmt;

use thiserror::Error;
use tracing::debug;

use super::gl::Gl;

/// GLSL source of the vertex stage. Passes attribute 0 straight through.
pub const VERTEX_SHADER_SOURCE: &str = include_str!("../../shaders/shader.vert");

/// GLSL source of the fragment stage. Paints everything a flat orange.
pub const FRAGMENT_SHADER_SOURCE: &str = include_str!("../../shaders/shader.frag");

/// The two programmable stages we compile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// The GL enum used to create a shader object for this stage.
    pub const fn gl_type(self) -> u32 {
        match self {
            Self::Vertex => glow::VERTEX_SHADER,
            Self::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("{stage} shader failed to compile:\n{log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("shader program failed to link:\n{log}")]
    Link { log: String },

    #[error("could not allocate {what}: {reason}")]
    Allocation { what: &'static str, reason: String },
}

/// What to do when the shader program can't be built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShaderFailurePolicy {
    /// Treat it as a startup failure.
    #[default]
    Abort,
    /// Log it and keep rendering with no program bound.
    Continue,
}

/// Compile the vertex and fragment stages and link them into one program.
///
/// The intermediate shader objects are deleted on every path out of this
/// function. If linking fails the program is deleted too, so an `Err` never
/// leaves anything allocated behind.
///
/// # Safety
///
/// Issues raw GL calls; `gl`'s context must be current.
#[tracing::instrument(level = "DEBUG", skip_all)]
pub unsafe fn compile_and_link<G: Gl>(
    gl: &G,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<G::Program, ShaderError> {
    let vert = compile_stage(gl, ShaderStage::Vertex, vertex_source)?;
    let frag = match compile_stage(gl, ShaderStage::Fragment, fragment_source) {
        Ok(frag) => frag,
        Err(e) => {
            gl.delete_shader(vert);
            return Err(e);
        }
    };

    let result = link_program(gl, vert, frag);

    gl.delete_shader(vert);
    gl.delete_shader(frag);

    result
}

/// Build the program from the sources baked into the binary.
///
/// # Safety
///
/// See [`compile_and_link()`].
pub unsafe fn create_program<G: Gl>(gl: &G) -> Result<G::Program, ShaderError> {
    compile_and_link(gl, VERTEX_SHADER_SOURCE, FRAGMENT_SHADER_SOURCE)
}

/// Create a shader object for a single stage and compile `source` into it.
unsafe fn compile_stage<G: Gl>(
    gl: &G,
    stage: ShaderStage,
    source: &str,
) -> Result<G::Shader, ShaderError> {
    let shader = gl
        .create_shader(stage.gl_type())
        .map_err(|reason| ShaderError::Allocation {
            what: "shader object",
            reason,
        })?;

    gl.shader_source(shader, source);
    gl.compile_shader(shader);

    if !gl.get_shader_compile_status(shader) {
        let log = gl.get_shader_info_log(shader);
        gl.delete_shader(shader);
        return Err(ShaderError::Compile { stage, log });
    }

    debug!(%stage, "Compiled shader stage");

    Ok(shader)
}

unsafe fn link_program<G: Gl>(
    gl: &G,
    vert: G::Shader,
    frag: G::Shader,
) -> Result<G::Program, ShaderError> {
    let program = gl
        .create_program()
        .map_err(|reason| ShaderError::Allocation {
            what: "program object",
            reason,
        })?;

    gl.attach_shader(program, vert);
    gl.attach_shader(program, frag);
    gl.link_program(program);

    // The stages are no longer needed once the program is linked (or not).
    gl.detach_shader(program, vert);
    gl.detach_shader(program, frag);

    if !gl.get_program_link_status(program) {
        let log = gl.get_program_info_log(program);
        gl.delete_program(program);
        return Err(ShaderError::Link { log });
    }

    debug!(?program, "Linked shader program");

    Ok(program)
}
