use thiserror::Error;
use tracing::{debug, error, info, trace, warn};
use winit::event::VirtualKeyCode;

use crate::{
    config::Config,
    model::Model,
    platform::{InitError, PlatformEvent, Window},
    renderer::{
        buffers::ModelError,
        gl::Gl,
        pipeline::{create_program, ShaderError, ShaderFailurePolicy},
    },
};

/// Anything that can stop the app from starting up.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Init(#[from] InitError),

    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Where the frame loop is in its life.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameState {
    Running,
    /// The exit key was pressed and the window has been asked to close. The
    /// loop stops the next time it checks.
    ClosePending,
    Closed,
}

/// Our OpenGL app. Owns every GL object it draws with.
pub struct App<G: Gl> {
    gl: G,

    /// `None` only if the program failed to build under
    /// [`ShaderFailurePolicy::Continue`]; frames are then drawn with no
    /// program bound.
    program: Option<G::Program>,

    models: Vec<Model<G>>,

    clear_color: [f32; 4],
    exit_key: VirtualKeyCode,

    state: FrameState,

    /// Frames rendered so far.
    frame: u64,
}

impl<G: Gl> App<G> {
    /// Creates the app: builds the shader program and uploads every model.
    ///
    /// If a model fails to upload, everything created up to that point is
    /// released again before the error is returned.
    ///
    /// # Safety
    ///
    /// Makes raw GL calls. `gl`'s context must be current on this thread for
    /// as long as the app lives.
    #[tracing::instrument(level = "DEBUG", name = "App::create", skip_all)]
    pub unsafe fn create(gl: G, models: Vec<Model<G>>, config: &Config) -> Result<Self, AppError> {
        debug!("Creating shader program");
        let program = match create_program(&gl) {
            Ok(program) => Some(program),
            Err(e) => match config.shader_failure {
                ShaderFailurePolicy::Abort => return Err(e.into()),
                ShaderFailurePolicy::Continue => {
                    error!(error = %e, "Shader program unusable, continuing without it");
                    None
                }
            },
        };

        let mut app = Self {
            gl,
            program,
            models,
            clear_color: config.clear_color,
            exit_key: config.exit_key,
            state: FrameState::Running,
            frame: 0,
        };

        debug!(model_count = app.models.len(), "Uploading models");
        if let Err(e) = app
            .models
            .iter_mut()
            .try_for_each(|model| model.init(&app.gl))
        {
            app.destroy();
            return Err(e.into());
        }

        Ok(app)
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn models(&self) -> &[Model<G>] {
        &self.models
    }

    /// Run frames until the window reports that it should close.
    ///
    /// # Safety
    ///
    /// Makes raw GL calls every frame.
    #[tracing::instrument(level = "DEBUG", name = "App::run", skip_all)]
    pub unsafe fn run<W: Window>(&mut self, window: &mut W) {
        while !window.should_close() {
            self.tick(window);
        }

        self.state = FrameState::Closed;
        info!(frames = self.frame, "Frame loop finished");
    }

    /// One iteration of the frame loop: handle input, render, present, then
    /// process window events.
    ///
    /// # Safety
    ///
    /// Makes raw GL calls.
    pub unsafe fn tick<W: Window>(&mut self, window: &mut W) {
        self.process_input(window);

        self.render();

        // Presentation problems aren't fatal; the next frame gets another go.
        if let Err(e) = window.swap_buffers() {
            warn!(error = %e, frame = self.frame, "Failed to present frame");
        }

        for event in window.poll_events() {
            self.handle_event(event);
        }
    }

    fn process_input<W: Window>(&mut self, window: &mut W) {
        if self.state == FrameState::Running && window.key_pressed(self.exit_key) {
            debug!(key = ?self.exit_key, "Exit key pressed");
            window.set_should_close(true);
            self.state = FrameState::ClosePending;
        }
    }

    /// Draw every model into the back buffer.
    ///
    /// # Safety
    ///
    /// Makes raw GL calls.
    pub unsafe fn render(&mut self) {
        let [r, g, b, a] = self.clear_color;
        self.gl.clear_color(r, g, b, a);
        self.gl.clear(glow::COLOR_BUFFER_BIT);

        self.gl.use_program(self.program);

        for objects in self.models.iter().filter_map(Model::objects) {
            self.gl.bind_vertex_array(Some(objects.vertex_array));
            self.gl.draw_arrays(glow::TRIANGLES, 0, objects.vertex_count);
        }

        self.frame += 1;
    }

    /// React to something the window system told us about.
    ///
    /// # Safety
    ///
    /// Makes raw GL calls.
    pub unsafe fn handle_event(&mut self, event: PlatformEvent) {
        match event {
            PlatformEvent::FramebufferResized { width, height } => {
                trace!(width, height, "Framebuffer resized");
                self.gl.viewport(
                    0,
                    0,
                    i32::try_from(width).unwrap_or(i32::MAX),
                    i32::try_from(height).unwrap_or(i32::MAX),
                );
            }
        }
    }

    /// Destroys the app's GL objects, in the reverse order they were created.
    /// Hands back the GL context wrapper.
    ///
    /// # Safety
    ///
    /// Makes raw GL calls; the context must still be current.
    #[tracing::instrument(level = "DEBUG", name = "App::destroy", skip_all)]
    pub unsafe fn destroy(mut self) -> G {
        for model in &mut self.models {
            model.destroy(&self.gl);
        }

        if let Some(program) = self.program.take() {
            self.gl.delete_program(program);
        }

        self.gl
    }
}
