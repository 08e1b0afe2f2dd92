//! Fakes for the GL and windowing layers, for use in unit tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::ops::Deref;
use std::rc::Rc;

use ahash::AHashSet;
use winit::event::VirtualKeyCode;

use crate::{
    config::WindowConfig,
    platform::{InitError, PlatformEvent, PresentError, Window, WindowSystem},
    renderer::gl::Gl,
};

/// One recorded GL call. Object-creating calls record the handle they
/// returned.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum GlCall {
    CreateShader { id: u32, shader_type: u32 },
    ShaderSource(u32, String),
    CompileShader(u32),
    DeleteShader(u32),
    CreateProgram(u32),
    AttachShader(u32, u32),
    DetachShader(u32, u32),
    LinkProgram(u32),
    UseProgram(Option<u32>),
    DeleteProgram(u32),
    CreateVertexArray(u32),
    BindVertexArray(Option<u32>),
    DeleteVertexArray(u32),
    CreateBuffer(u32),
    BindBuffer(u32, Option<u32>),
    BufferData {
        target: u32,
        data: Vec<f32>,
        usage: u32,
    },
    DeleteBuffer(u32),
    VertexAttribPointer {
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    },
    EnableVertexAttribArray(u32),
    ClearColor([f32; 4]),
    Clear(u32),
    DrawArrays {
        mode: u32,
        first: i32,
        count: i32,
    },
    Viewport {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
}

/// Shared record of every call made through a [`FakeGl`] and its clones.
#[derive(Clone, Debug, Default)]
pub(crate) struct GlLog {
    calls: Rc<RefCell<Vec<GlCall>>>,
    last_id: Rc<Cell<u32>>,
}

impl GlLog {
    pub(crate) fn calls(&self) -> Vec<GlCall> {
        self.calls.borrow().clone()
    }

    pub(crate) fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    pub(crate) fn count(&self, pred: impl Fn(&GlCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    pub(crate) fn live_shaders(&self) -> Vec<u32> {
        self.live(
            |c| match c {
                GlCall::CreateShader { id, .. } => Some(*id),
                _ => None,
            },
            |c| match c {
                GlCall::DeleteShader(id) => Some(*id),
                _ => None,
            },
        )
    }

    pub(crate) fn live_programs(&self) -> Vec<u32> {
        self.live(
            |c| match c {
                GlCall::CreateProgram(id) => Some(*id),
                _ => None,
            },
            |c| match c {
                GlCall::DeleteProgram(id) => Some(*id),
                _ => None,
            },
        )
    }

    pub(crate) fn live_buffers(&self) -> Vec<u32> {
        self.live(
            |c| match c {
                GlCall::CreateBuffer(id) => Some(*id),
                _ => None,
            },
            |c| match c {
                GlCall::DeleteBuffer(id) => Some(*id),
                _ => None,
            },
        )
    }

    pub(crate) fn live_vertex_arrays(&self) -> Vec<u32> {
        self.live(
            |c| match c {
                GlCall::CreateVertexArray(id) => Some(*id),
                _ => None,
            },
            |c| match c {
                GlCall::DeleteVertexArray(id) => Some(*id),
                _ => None,
            },
        )
    }

    /// Handles that were created and not yet deleted, in creation order.
    fn live(
        &self,
        created: impl Fn(&GlCall) -> Option<u32>,
        deleted: impl Fn(&GlCall) -> Option<u32>,
    ) -> Vec<u32> {
        let calls = self.calls.borrow();
        let deleted: AHashSet<u32> = calls.iter().filter_map(&deleted).collect();
        calls
            .iter()
            .filter_map(&created)
            .filter(|id| !deleted.contains(id))
            .collect()
    }

    fn push(&self, call: GlCall) {
        self.calls.borrow_mut().push(call);
    }

    fn next_id(&self) -> u32 {
        let id = self.last_id.get() + 1;
        self.last_id.set(id);
        id
    }

    fn shader_type(&self, shader: u32) -> Option<u32> {
        self.calls.borrow().iter().find_map(|c| match c {
            GlCall::CreateShader { id, shader_type } if *id == shader => Some(*shader_type),
            _ => None,
        })
    }
}

/// A [`Gl`] that records calls instead of making them. Handles are plain
/// increasing integers starting at 1.
#[derive(Clone, Debug, Default)]
pub(crate) struct FakeGl {
    /// Shader type (e.g. `glow::VERTEX_SHADER`) whose compilation fails.
    pub fail_compile: Option<u32>,
    pub fail_link: bool,
    /// Object kind whose creation fails: `"shader"`, `"program"`,
    /// `"vertex array"` or `"buffer"`.
    pub fail_alloc: Option<&'static str>,
    pub log: GlLog,
}

impl FakeGl {
    pub(crate) fn log(&self) -> GlLog {
        self.log.clone()
    }

    fn alloc(&self, kind: &'static str) -> Result<u32, String> {
        if self.fail_alloc == Some(kind) {
            Err(format!("out of {kind} names"))
        } else {
            Ok(self.log.next_id())
        }
    }
}

impl Deref for FakeGl {
    type Target = GlLog;

    fn deref(&self) -> &GlLog {
        &self.log
    }
}

impl Gl for FakeGl {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type VertexArray = u32;

    unsafe fn create_shader(&self, shader_type: u32) -> Result<u32, String> {
        let id = self.alloc("shader")?;
        self.log.push(GlCall::CreateShader { id, shader_type });
        Ok(id)
    }

    unsafe fn shader_source(&self, shader: u32, source: &str) {
        self.log.push(GlCall::ShaderSource(shader, source.to_owned()));
    }

    unsafe fn compile_shader(&self, shader: u32) {
        self.log.push(GlCall::CompileShader(shader));
    }

    unsafe fn get_shader_compile_status(&self, shader: u32) -> bool {
        self.fail_compile.is_none() || self.fail_compile != self.log.shader_type(shader)
    }

    unsafe fn get_shader_info_log(&self, _shader: u32) -> String {
        "0:1(1): error: syntax error, unexpected end of file".to_owned()
    }

    unsafe fn delete_shader(&self, shader: u32) {
        self.log.push(GlCall::DeleteShader(shader));
    }

    unsafe fn create_program(&self) -> Result<u32, String> {
        let id = self.alloc("program")?;
        self.log.push(GlCall::CreateProgram(id));
        Ok(id)
    }

    unsafe fn attach_shader(&self, program: u32, shader: u32) {
        self.log.push(GlCall::AttachShader(program, shader));
    }

    unsafe fn detach_shader(&self, program: u32, shader: u32) {
        self.log.push(GlCall::DetachShader(program, shader));
    }

    unsafe fn link_program(&self, program: u32) {
        self.log.push(GlCall::LinkProgram(program));
    }

    unsafe fn get_program_link_status(&self, _program: u32) -> bool {
        !self.fail_link
    }

    unsafe fn get_program_info_log(&self, _program: u32) -> String {
        "error: vertex shader output not consumed".to_owned()
    }

    unsafe fn use_program(&self, program: Option<u32>) {
        self.log.push(GlCall::UseProgram(program));
    }

    unsafe fn delete_program(&self, program: u32) {
        self.log.push(GlCall::DeleteProgram(program));
    }

    unsafe fn create_vertex_array(&self) -> Result<u32, String> {
        let id = self.alloc("vertex array")?;
        self.log.push(GlCall::CreateVertexArray(id));
        Ok(id)
    }

    unsafe fn bind_vertex_array(&self, vertex_array: Option<u32>) {
        self.log.push(GlCall::BindVertexArray(vertex_array));
    }

    unsafe fn delete_vertex_array(&self, vertex_array: u32) {
        self.log.push(GlCall::DeleteVertexArray(vertex_array));
    }

    unsafe fn create_buffer(&self) -> Result<u32, String> {
        let id = self.alloc("buffer")?;
        self.log.push(GlCall::CreateBuffer(id));
        Ok(id)
    }

    unsafe fn bind_buffer(&self, target: u32, buffer: Option<u32>) {
        self.log.push(GlCall::BindBuffer(target, buffer));
    }

    unsafe fn buffer_data_u8_slice(&self, target: u32, data: &[u8], usage: u32) {
        let data = data
            .chunks_exact(4)
            .map(|b| f32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        self.log.push(GlCall::BufferData {
            target,
            data,
            usage,
        });
    }

    unsafe fn delete_buffer(&self, buffer: u32) {
        self.log.push(GlCall::DeleteBuffer(buffer));
    }

    unsafe fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        self.log.push(GlCall::VertexAttribPointer {
            index,
            size,
            data_type,
            normalized,
            stride,
            offset,
        });
    }

    unsafe fn enable_vertex_attrib_array(&self, index: u32) {
        self.log.push(GlCall::EnableVertexAttribArray(index));
    }

    unsafe fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.log.push(GlCall::ClearColor([red, green, blue, alpha]));
    }

    unsafe fn clear(&self, mask: u32) {
        self.log.push(GlCall::Clear(mask));
    }

    unsafe fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        self.log.push(GlCall::DrawArrays { mode, first, count });
    }

    unsafe fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.log.push(GlCall::Viewport {
            x,
            y,
            width,
            height,
        });
    }
}

/// Scripted input delivered by one [`FakeWindow::poll_events()`] call.
#[derive(Clone, Copy, Debug)]
pub(crate) enum FakeInput {
    Press(VirtualKeyCode),
    Release(VirtualKeyCode),
    Resize(u32, u32),
    /// The close button was clicked.
    Close,
}

/// A window that replays a script, one entry per poll. Once the last entry
/// has been delivered the window asks to close, so loops always end, unless
/// `auto_close` is turned off.
#[derive(Debug)]
pub(crate) struct FakeWindow {
    gl: Option<FakeGl>,
    script: VecDeque<Vec<FakeInput>>,
    pressed: AHashSet<VirtualKeyCode>,
    should_close: bool,
    pub fail_load: bool,
    pub fail_swap: bool,
    pub auto_close: bool,
    pub swaps: usize,
    pub terminated: Rc<Cell<bool>>,
}

impl FakeWindow {
    pub(crate) fn new(gl: FakeGl) -> Self {
        Self {
            gl: Some(gl),
            script: VecDeque::new(),
            pressed: AHashSet::new(),
            should_close: false,
            fail_load: false,
            fail_swap: false,
            auto_close: true,
            swaps: 0,
            terminated: Rc::default(),
        }
    }

    /// Append the input delivered by the next poll.
    pub(crate) fn then(mut self, inputs: Vec<FakeInput>) -> Self {
        self.script.push_back(inputs);
        self
    }
}

impl Window for FakeWindow {
    type Gl = FakeGl;

    fn load_gl(&mut self) -> Result<FakeGl, InitError> {
        if self.fail_load {
            return Err(InitError::MissingEntryPoint("glCreateShader"));
        }
        self.gl
            .take()
            .ok_or(InitError::MissingEntryPoint("glCreateProgram"))
    }

    fn key_pressed(&self, key: VirtualKeyCode) -> bool {
        self.pressed.contains(&key)
    }

    fn should_close(&self) -> bool {
        self.should_close
    }

    fn set_should_close(&mut self, value: bool) {
        self.should_close = value;
    }

    fn swap_buffers(&mut self) -> Result<(), PresentError> {
        if self.fail_swap {
            return Err(PresentError("surface lost".to_owned()));
        }
        self.swaps += 1;
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<PlatformEvent> {
        let mut events = Vec::new();

        for input in self.script.pop_front().unwrap_or_default() {
            match input {
                FakeInput::Press(key) => {
                    self.pressed.insert(key);
                }
                FakeInput::Release(key) => {
                    self.pressed.remove(&key);
                }
                FakeInput::Resize(width, height) => {
                    events.push(PlatformEvent::FramebufferResized { width, height })
                }
                FakeInput::Close => self.should_close = true,
            }
        }

        if self.auto_close && self.script.is_empty() {
            self.should_close = true;
        }

        events
    }

    fn terminate(self) {
        self.terminated.set(true);
    }
}

/// A window system handing out a single pre-built [`FakeWindow`].
#[derive(Debug)]
pub(crate) struct FakeSystem {
    window: Option<FakeWindow>,
    pub fail_init: bool,
    pub fail_create: bool,
    pub created_with: Option<WindowConfig>,
}

impl FakeSystem {
    pub(crate) fn new(window: FakeWindow) -> Self {
        Self {
            window: Some(window),
            fail_init: false,
            fail_create: false,
            created_with: None,
        }
    }
}

impl WindowSystem for FakeSystem {
    type Window = FakeWindow;

    fn init(&mut self) -> Result<(), InitError> {
        if self.fail_init {
            return Err(InitError::WindowSystem("no display".to_owned()));
        }
        Ok(())
    }

    fn create_window(&mut self, config: &WindowConfig) -> Result<FakeWindow, InitError> {
        if self.fail_create {
            return Err(InitError::WindowCreation("no suitable pixel format".to_owned()));
        }
        self.created_with = Some(config.clone());
        self.window
            .take()
            .ok_or_else(|| InitError::WindowCreation("window already created".to_owned()))
    }
}
