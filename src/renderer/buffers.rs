//! Functions for dealing with vertex buffers and vertex array objects.

use thiserror::Error;
use tracing::debug;

use super::gl::Gl;
use crate::vertex::{vertex_count, POSITION_ATTRIBUTE};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("could not allocate {what}: {reason}")]
    Allocation { what: &'static str, reason: String },

    #[error("vertex list has {len} floats, which is not a multiple of 3")]
    MalformedVertices { len: usize },

    #[error("model holds {0} vertices, more than a single draw call can address")]
    TooManyVertices(usize),
}

/// GPU-side objects describing one model's vertices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexObjects<A, B> {
    pub vertex_array: A,
    pub vertex_buffer: B,
    /// Number of vertices uploaded to `vertex_buffer`.
    pub vertex_count: i32,
}

/// [`VertexObjects`] using the handle types of a particular [`Gl`].
pub type GlVertexObjects<G> = VertexObjects<<G as Gl>::VertexArray, <G as Gl>::Buffer>;

/// Upload `vertices` into a fresh vertex buffer and describe it with a fresh
/// vertex array object. Both are unbound again before returning.
///
/// # Safety
///
/// Issues raw GL calls; `gl`'s context must be current.
#[tracing::instrument(level = "DEBUG", skip_all, fields(floats = vertices.len()))]
pub unsafe fn create_vertex_objects<G: Gl>(
    gl: &G,
    vertices: &[f32],
) -> Result<GlVertexObjects<G>, ModelError> {
    let count = vertex_count(vertices).ok_or(ModelError::MalformedVertices {
        len: vertices.len(),
    })?;
    let count = i32::try_from(count).map_err(|_| ModelError::TooManyVertices(count))?;

    let vertex_array = gl
        .create_vertex_array()
        .map_err(|reason| ModelError::Allocation {
            what: "vertex array",
            reason,
        })?;
    let vertex_buffer = match gl.create_buffer() {
        Ok(buffer) => buffer,
        Err(reason) => {
            gl.delete_vertex_array(vertex_array);
            return Err(ModelError::Allocation {
                what: "vertex buffer",
                reason,
            });
        }
    };

    gl.bind_vertex_array(Some(vertex_array));

    // Copy the vertices into GPU memory. They never change after this.
    gl.bind_buffer(glow::ARRAY_BUFFER, Some(vertex_buffer));
    gl.buffer_data_u8_slice(
        glow::ARRAY_BUFFER,
        bytemuck::cast_slice(vertices),
        glow::STATIC_DRAW,
    );

    // Tell the vertex array where the positions live inside the buffer.
    let attr = POSITION_ATTRIBUTE;
    gl.vertex_attrib_pointer_f32(
        attr.location,
        attr.components,
        attr.data_type,
        false,
        attr.stride,
        attr.offset,
    );
    gl.enable_vertex_attrib_array(attr.location);

    // Don't leave anything bound for the next caller to trip over.
    gl.bind_buffer(glow::ARRAY_BUFFER, None);
    gl.bind_vertex_array(None);

    debug!(vertex_count = count, ?vertex_array, ?vertex_buffer, "Uploaded vertices");

    Ok(VertexObjects {
        vertex_array,
        vertex_buffer,
        vertex_count: count,
    })
}

/// Destroy the objects created by [`create_vertex_objects()`].
///
/// # Safety
///
/// Issues raw GL calls; `gl`'s context must be current and `objects` must not
/// have been destroyed already.
pub unsafe fn destroy_vertex_objects<G: Gl>(gl: &G, objects: &GlVertexObjects<G>) {
    gl.delete_vertex_array(objects.vertex_array);
    gl.delete_buffer(objects.vertex_buffer);
}
