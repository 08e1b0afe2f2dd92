//! Desktop windowing through winit, with the GL context provided by glutin.

use std::any::Any;
use std::panic;

use ahash::AHashSet;
use glutin::{Api, ContextBuilder, GlProfile, GlRequest, PossiblyCurrent, WindowedContext};
use tracing::{debug, info, warn};
use winit::{
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    platform::run_return::EventLoopExtRunReturn,
    window::WindowBuilder,
};

use super::{
    InitError, PlatformEvent, PresentError, Window, WindowSystem, REQUIRED_ENTRY_POINTS,
};
use crate::{config::WindowConfig, renderer::validation::install_debug_callback};

/// OpenGL version requested from the driver. Matches `#version 330 core` in
/// the shaders.
const GL_VERSION: (u8, u8) = (3, 3);

/// winit + glutin, before a window has been opened.
#[derive(Default)]
pub struct DesktopSystem {
    event_loop: Option<EventLoop<()>>,
}

impl WindowSystem for DesktopSystem {
    type Window = DesktopWindow;

    #[tracing::instrument(level = "DEBUG", name = "DesktopSystem::init", skip_all)]
    fn init(&mut self) -> Result<(), InitError> {
        // winit panics rather than erroring when no display backend is
        // available. Turn that into an InitError, and keep the panic hook
        // quiet while doing so.
        let hook = panic::take_hook();
        panic::set_hook(Box::new(|_| {}));
        let result = panic::catch_unwind(EventLoop::<()>::new);
        panic::set_hook(hook);

        let event_loop = result.map_err(|payload| InitError::WindowSystem(panic_message(&*payload)))?;
        self.event_loop = Some(event_loop);

        Ok(())
    }

    #[tracing::instrument(level = "DEBUG", name = "DesktopSystem::create_window", skip_all)]
    fn create_window(&mut self, config: &WindowConfig) -> Result<DesktopWindow, InitError> {
        let event_loop = self
            .event_loop
            .take()
            .ok_or_else(|| InitError::WindowSystem("window system not initialized".to_owned()))?;

        debug!(
            width = config.width,
            height = config.height,
            title = %config.title,
            "Creating window and GL context"
        );

        let window_builder = WindowBuilder::new()
            .with_title(&config.title)
            .with_inner_size(LogicalSize::new(config.width, config.height));

        let context = ContextBuilder::new()
            .with_gl(GlRequest::Specific(Api::OpenGl, GL_VERSION))
            .with_gl_profile(GlProfile::Core)
            .with_gl_debug_flag(config.debug_output)
            .with_vsync(config.vsync)
            .build_windowed(window_builder, &event_loop)
            .map_err(|e| InitError::WindowCreation(e.to_string()))?;

        let context = unsafe { context.make_current() }
            .map_err(|(_, e)| InitError::MakeCurrent(e.to_string()))?;

        debug!(window_id = ?context.window().id(), "Window creation successful");

        Ok(DesktopWindow {
            event_loop,
            context,
            pressed_keys: AHashSet::new(),
            should_close: false,
            debug_output: config.debug_output,
        })
    }
}

/// A winit window with a current glutin GL context.
pub struct DesktopWindow {
    event_loop: EventLoop<()>,
    context: WindowedContext<PossiblyCurrent>,

    /// Keys that have been pressed and not yet released.
    pressed_keys: AHashSet<VirtualKeyCode>,

    /// Set by the close button or by [`Window::set_should_close()`].
    should_close: bool,

    debug_output: bool,
}

impl Window for DesktopWindow {
    type Gl = glow::Context;

    #[tracing::instrument(level = "DEBUG", name = "DesktopWindow::load_gl", skip_all)]
    fn load_gl(&mut self) -> Result<glow::Context, InitError> {
        if let Some(missing) = REQUIRED_ENTRY_POINTS
            .iter()
            .copied()
            .find(|name| self.context.get_proc_address(name).is_null())
        {
            return Err(InitError::MissingEntryPoint(missing));
        }

        let mut gl =
            unsafe { glow::Context::from_loader_function(|name| self.context.get_proc_address(name)) };

        if self.debug_output {
            if unsafe { install_debug_callback(&mut gl) } {
                debug!("Forwarding GL debug output to tracing");
            } else {
                warn!("GL debug output requested, but the context doesn't support it");
            }
        }

        Ok(gl)
    }

    fn key_pressed(&self, key: VirtualKeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    fn should_close(&self) -> bool {
        self.should_close
    }

    fn set_should_close(&mut self, value: bool) {
        self.should_close = value;
    }

    fn swap_buffers(&mut self) -> Result<(), PresentError> {
        self.context
            .swap_buffers()
            .map_err(|e| PresentError(e.to_string()))
    }

    fn poll_events(&mut self) -> Vec<PlatformEvent> {
        let mut events = Vec::new();
        let context = &self.context;
        let pressed_keys = &mut self.pressed_keys;
        let should_close = &mut self.should_close;

        // Drain whatever is queued, then hand control straight back.
        self.event_loop.run_return(|event, _, control_flow| {
            *control_flow = ControlFlow::Poll;

            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        debug!("Window close requested");
                        *should_close = true;
                    }

                    WindowEvent::Resized(size) => {
                        context.resize(size);
                        events.push(framebuffer_resized(size));
                    }

                    // Moving to a monitor with another scale factor changes
                    // the framebuffer size, and not every backend follows up
                    // with a `Resized`.
                    WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                        context.resize(*new_inner_size);
                        events.push(framebuffer_resized(*new_inner_size));
                    }

                    WindowEvent::KeyboardInput {
                        input:
                            KeyboardInput {
                                state,
                                virtual_keycode: Some(key),
                                ..
                            },
                        ..
                    } => match state {
                        ElementState::Pressed => {
                            pressed_keys.insert(key);
                        }
                        ElementState::Released => {
                            pressed_keys.remove(&key);
                        }
                    },

                    _ => {}
                },

                Event::MainEventsCleared => *control_flow = ControlFlow::Exit,

                _ => {}
            }
        });

        events
    }

    #[tracing::instrument(level = "DEBUG", name = "DesktopWindow::terminate", skip_all)]
    fn terminate(self) {
        info!(window_id = ?self.context.window().id(), "Closing window");
        drop(self);
    }
}

fn framebuffer_resized(size: PhysicalSize<u32>) -> PlatformEvent {
    PlatformEvent::FramebufferResized {
        width: size.width,
        height: size.height,
    }
}

/// Pull a readable message out of a caught panic.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown error".to_owned()
    }
}
