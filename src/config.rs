//! App configuration.
//!
//! The app takes no command-line arguments. Everything here is a fixed
//! default, with a few switches that can be flipped through environment
//! variables.

use winit::event::VirtualKeyCode;

use crate::renderer::{pipeline::ShaderFailurePolicy, validation::should_enable_debug_output};

/// Keep running after shader compile or link failures instead of bailing out.
pub const PERMISSIVE_SHADERS_VAR: &str = "GL_TUT_PERMISSIVE_SHADERS";

/// Turn off vsync and render as fast as possible.
pub const NO_VSYNC_VAR: &str = "GL_TUT_NO_VSYNC";

/// Settings for the window and its GL context.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub vsync: bool,
    /// Ask for a debug context and forward `GL_KHR_debug` output to tracing.
    pub debug_output: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "OpenGL Test".to_owned(),
            vsync: true,
            debug_output: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub window: WindowConfig,
    /// RGBA color the framebuffer is cleared to each frame.
    pub clear_color: [f32; 4],
    /// Pressing this key closes the window.
    pub exit_key: VirtualKeyCode,
    pub shader_failure: ShaderFailurePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            clear_color: [0.2, 0.3, 0.3, 1.0],
            exit_key: VirtualKeyCode::Escape,
            shader_failure: ShaderFailurePolicy::Abort,
        }
    }
}

impl Config {
    /// The default config, adjusted by whatever switches are set in the
    /// process environment.
    pub fn from_env() -> Self {
        let mut config = Self::from_switches(|name| std::env::var_os(name).is_some());
        config.window.debug_output = should_enable_debug_output();
        config
    }

    /// The default config, adjusted by the switches for which `is_set`
    /// returns true.
    pub fn from_switches(is_set: impl Fn(&str) -> bool) -> Self {
        let mut config = Self::default();

        if is_set(PERMISSIVE_SHADERS_VAR) {
            config.shader_failure = ShaderFailurePolicy::Continue;
        }
        if is_set(NO_VSYNC_VAR) {
            config.window.vsync = false;
        }

        config
    }
}
