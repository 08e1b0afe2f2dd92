//! Vertex data and the layout used to pass it on to the GPU.

/// Number of floats making up one vertex position (X, Y, Z).
pub const FLOATS_PER_VERTEX: usize = 3;

/// Describes how one vertex attribute is laid out inside a vertex buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader input location, i.e. `layout (location = N)`.
    pub location: u32,
    /// Components per vertex.
    pub components: i32,
    pub data_type: u32,
    /// Bytes between consecutive vertices. Zero means tightly packed.
    pub stride: i32,
    /// Byte offset of the first component.
    pub offset: i32,
}

/// Positions are the only attribute we feed the vertex shader: three
/// tightly-packed floats at location 0.
pub const POSITION_ATTRIBUTE: VertexAttribute = VertexAttribute {
    location: 0,
    components: FLOATS_PER_VERTEX as i32,
    data_type: glow::FLOAT,
    stride: 0,
    offset: 0,
};

/// The triangle drawn on the left half of the window.
#[rustfmt::skip]
pub const LEFT_TRIANGLE: [f32; 9] = [
    -0.7, -0.5, 0.0,
    -0.3, -0.5, 0.0,
    -0.5,  0.5, 0.0,
];

/// The triangle drawn on the right half of the window.
#[rustfmt::skip]
pub const RIGHT_TRIANGLE: [f32; 9] = [
    0.3, -0.5, 0.0,
    0.7, -0.5, 0.0,
    0.5,  0.5, 0.0,
];

/// Number of whole vertices in a flat position list, or `None` if the list
/// doesn't divide evenly into X/Y/Z triples.
pub fn vertex_count(positions: &[f32]) -> Option<usize> {
    (positions.len() % FLOATS_PER_VERTEX == 0).then(|| positions.len() / FLOATS_PER_VERTEX)
}
