//! Hooks connecting OpenGL's debug output to [`tracing`]

use glow::HasContext;
use tracing::{debug, error, trace, warn, Level};

/// Returns true if GL debug output should be enabled.
///
/// Will always return true in builds where `debug_assertions` is enabled.
/// Otherwise, will only return true if the environment variable
/// `ENABLE_GL_DEBUG_OUTPUT` is set.
#[inline]
pub(crate) fn should_enable_debug_output() -> bool {
    cfg!(debug_assertions) || std::env::var("ENABLE_GL_DEBUG_OUTPUT").is_ok()
}

/// The extension that provides `glDebugMessageCallback` on a 3.3 context.
pub(crate) const DEBUG_EXTENSION: &str = "GL_KHR_debug";

/// Route the driver's debug messages into [`gl_debug_callback()`].
///
/// Returns false (and does nothing) if the context doesn't support
/// [`DEBUG_EXTENSION`].
///
/// # Safety
///
/// `gl`'s context must be current.
pub(crate) unsafe fn install_debug_callback(gl: &mut glow::Context) -> bool {
    if !gl.supported_extensions().contains(DEBUG_EXTENSION) {
        return false;
    }

    gl.enable(glow::DEBUG_OUTPUT);
    gl.enable(glow::DEBUG_OUTPUT_SYNCHRONOUS);
    gl.debug_message_callback(gl_debug_callback);

    true
}

/// Called by the driver whenever it has a debug message to output.
pub(crate) fn gl_debug_callback(source: u32, typ: u32, id: u32, severity: u32, message: &str) {
    let source = source_name(source);
    let typ = type_name(typ);

    match severity_level(severity) {
        Level::ERROR => error!(source, "type" = typ, id, "{}", message),
        Level::WARN => warn!(source, "type" = typ, id, "{}", message),
        Level::DEBUG => debug!(source, "type" = typ, id, "{}", message),
        _ => trace!(source, "type" = typ, id, "{}", message),
    }
}

/// The log level a GL debug message of the given severity is emitted at.
fn severity_level(severity: u32) -> Level {
    match severity {
        glow::DEBUG_SEVERITY_HIGH => Level::ERROR,
        glow::DEBUG_SEVERITY_MEDIUM => Level::WARN,
        glow::DEBUG_SEVERITY_LOW => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn source_name(source: u32) -> &'static str {
    match source {
        glow::DEBUG_SOURCE_API => "api",
        glow::DEBUG_SOURCE_WINDOW_SYSTEM => "window system",
        glow::DEBUG_SOURCE_SHADER_COMPILER => "shader compiler",
        glow::DEBUG_SOURCE_THIRD_PARTY => "third party",
        glow::DEBUG_SOURCE_APPLICATION => "application",
        _ => "other",
    }
}

fn type_name(typ: u32) -> &'static str {
    match typ {
        glow::DEBUG_TYPE_ERROR => "error",
        glow::DEBUG_TYPE_DEPRECATED_BEHAVIOR => "deprecated behavior",
        glow::DEBUG_TYPE_UNDEFINED_BEHAVIOR => "undefined behavior",
        glow::DEBUG_TYPE_PORTABILITY => "portability",
        glow::DEBUG_TYPE_PERFORMANCE => "performance",
        glow::DEBUG_TYPE_MARKER => "marker",
        _ => "other",
    }
}
