//! The windowing layer: creating a window with a GL context, reading input,
//! presenting frames.
//!
//! The rest of the app only sees the [`WindowSystem`] and [`Window`] traits.
//! [`desktop`] implements them on top of winit and glutin.

pub mod desktop;

use thiserror::Error;
use winit::event::VirtualKeyCode;

use crate::{config::WindowConfig, renderer::gl::Gl};

/// Failures that stop the app before it can draw anything.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("window system init error: {0}")]
    WindowSystem(String),

    #[error("window creation error: {0}")]
    WindowCreation(String),

    #[error("could not make the GL context current: {0}")]
    MakeCurrent(String),

    #[error("GL loader error: entry point `{0}` could not be resolved")]
    MissingEntryPoint(&'static str),
}

/// Presenting a frame failed. The frame loop logs these and carries on.
#[derive(Debug, Error)]
#[error("could not present frame: {0}")]
pub struct PresentError(pub String);

/// Things that happened to the window since the last poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlatformEvent {
    /// The drawable area changed size, in physical pixels.
    FramebufferResized { width: u32, height: u32 },
}

/// Entry points that must resolve before the GL context is considered usable.
///
/// The check is best-effort: some loaders (GLX in particular) hand back a
/// non-null pointer for any name.
pub const REQUIRED_ENTRY_POINTS: &[&str] = &[
    "glGetString",
    "glCreateShader",
    "glCreateProgram",
    "glLinkProgram",
    "glGenVertexArrays",
    "glGenBuffers",
    "glBufferData",
    "glVertexAttribPointer",
    "glDrawArrays",
    "glClear",
    "glViewport",
];

/// A windowing library, before any window exists.
pub trait WindowSystem {
    type Window: Window;

    /// Bring up the windowing library itself.
    fn init(&mut self) -> Result<(), InitError>;

    /// Open a window and make its GL context current on this thread.
    fn create_window(&mut self, config: &WindowConfig) -> Result<Self::Window, InitError>;
}

/// An open window with a current GL context.
pub trait Window {
    type Gl: Gl;

    /// Resolve the GL entry points through the window's context.
    fn load_gl(&mut self) -> Result<Self::Gl, InitError>;

    /// Whether `key` is currently held down.
    fn key_pressed(&self, key: VirtualKeyCode) -> bool;

    fn should_close(&self) -> bool;

    fn set_should_close(&mut self, value: bool);

    /// Present the frame that was just drawn.
    fn swap_buffers(&mut self) -> Result<(), PresentError>;

    /// Process pending window-system events without blocking, returning the
    /// ones the renderer has to react to.
    fn poll_events(&mut self) -> Vec<PlatformEvent>;

    /// Close the window and release the windowing library's resources.
    fn terminate(self);
}
