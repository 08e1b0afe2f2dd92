//! Drives the app from start to finish.

use tracing::{debug, info};

use crate::{
    app::{App, AppError},
    config::Config,
    model::load_models,
    platform::{Window, WindowSystem},
};

/// Start the window system, open a window, set up the GL objects, run frames
/// until the window closes, then tear everything down again.
///
/// No GL call is made unless the window system, the window and the GL entry
/// points all came up.
#[tracing::instrument(level = "DEBUG", name = "lifecycle::run", skip_all)]
pub fn run<S: WindowSystem>(mut system: S, config: &Config) -> Result<(), AppError> {
    let models = load_models();

    debug!("Initializing window system");
    system.init()?;

    let mut window = system.create_window(&config.window)?;

    debug!("Loading GL entry points");
    let gl = window.load_gl()?;

    info!("Initializing app");
    // SAFETY: `window` made its context current on this thread when it was
    // created, and keeps it alive until `terminate` below.
    let mut app = unsafe { App::create(gl, models, config)? };

    info!("Running frame loop");
    unsafe { app.run(&mut window) };

    info!("Destroying app");
    unsafe { app.destroy() };

    window.terminate();

    Ok(())
}
