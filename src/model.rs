//! Models: a list of vertex positions plus the GPU objects they live in.

use std::fmt;

use tracing::debug;

use crate::renderer::{
    buffers::{create_vertex_objects, destroy_vertex_objects, GlVertexObjects, ModelError},
    gl::Gl,
};
use crate::vertex::{LEFT_TRIANGLE, RIGHT_TRIANGLE};

/// A set of independent triangles, three X/Y/Z positions per triangle.
pub struct Model<G: Gl> {
    vertices: Vec<f32>,

    /// Present once [`Model::init()`] has uploaded `vertices` to the GPU.
    objects: Option<GlVertexObjects<G>>,
}

impl<G: Gl> Model<G> {
    /// Create a model with no vertices and no GPU objects.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            objects: None,
        }
    }

    /// Create a model holding a copy of `vertices`.
    pub fn with_vertices(vertices: &[f32]) -> Self {
        let mut model = Self::new();
        model.set_vertices(vertices);
        model
    }

    /// Replace the model's vertex positions. Only affects the GPU after the
    /// next call to [`Model::init()`].
    pub fn set_vertices(&mut self, vertices: &[f32]) {
        self.vertices.clear();
        self.vertices.extend_from_slice(vertices);
    }

    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub fn objects(&self) -> Option<&GlVertexObjects<G>> {
        self.objects.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.objects.is_some()
    }

    /// Upload the model's vertices into a new vertex buffer and vertex array.
    ///
    /// Calling this again releases the objects from the previous call first.
    ///
    /// # Safety
    ///
    /// Issues raw GL calls; `gl`'s context must be current, and must be the
    /// same context any earlier `init` used.
    pub unsafe fn init(&mut self, gl: &G) -> Result<(), ModelError> {
        if self.objects.is_some() {
            debug!("Model already initialized, releasing old GPU objects");
            self.destroy(gl);
        }

        self.objects = Some(create_vertex_objects(gl, &self.vertices)?);

        Ok(())
    }

    /// Release the model's GPU objects. Does nothing if there are none.
    ///
    /// # Safety
    ///
    /// Issues raw GL calls; `gl`'s context must be current.
    pub unsafe fn destroy(&mut self, gl: &G) {
        if let Some(objects) = self.objects.take() {
            destroy_vertex_objects(gl, &objects);
        }
    }
}

impl<G: Gl> Default for Model<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Gl> fmt::Debug for Model<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("vertices", &self.vertices)
            .field("objects", &self.objects)
            .finish()
    }
}

/// The two triangles the app draws, side by side.
#[tracing::instrument(level = "DEBUG")]
pub fn load_models<G: Gl>() -> Vec<Model<G>> {
    let models = vec![
        Model::with_vertices(&LEFT_TRIANGLE),
        Model::with_vertices(&RIGHT_TRIANGLE),
    ];

    debug!(model_count = models.len(), "Loaded models");

    models
}
