//! The slice of the OpenGL API that the renderer actually talks to.
//!
//! [`glow`] already hides the raw function pointers behind
//! [`glow::HasContext`], but that trait is enormous. [`Gl`] narrows it down to
//! the handful of calls this app makes so that everything above it can be
//! driven by a recording fake in tests.

use std::fmt::Debug;

use glow::HasContext;

/// The OpenGL calls the app makes. Signatures mirror [`glow::HasContext`],
/// including its `u32` enum constants (`glow::TRIANGLES` and friends).
///
/// # Safety
///
/// Every method issues a raw GL call. The context that produced `self` must
/// be current on the calling thread, and every handle passed in must have
/// been created by that same context and not yet deleted.
pub trait Gl {
    type Shader: Copy + Debug + PartialEq;
    type Program: Copy + Debug + PartialEq;
    type Buffer: Copy + Debug + PartialEq;
    type VertexArray: Copy + Debug + PartialEq;

    unsafe fn create_shader(&self, shader_type: u32) -> Result<Self::Shader, String>;
    unsafe fn shader_source(&self, shader: Self::Shader, source: &str);
    unsafe fn compile_shader(&self, shader: Self::Shader);
    unsafe fn get_shader_compile_status(&self, shader: Self::Shader) -> bool;
    unsafe fn get_shader_info_log(&self, shader: Self::Shader) -> String;
    unsafe fn delete_shader(&self, shader: Self::Shader);

    unsafe fn create_program(&self) -> Result<Self::Program, String>;
    unsafe fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    unsafe fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    unsafe fn link_program(&self, program: Self::Program);
    unsafe fn get_program_link_status(&self, program: Self::Program) -> bool;
    unsafe fn get_program_info_log(&self, program: Self::Program) -> String;
    unsafe fn use_program(&self, program: Option<Self::Program>);
    unsafe fn delete_program(&self, program: Self::Program);

    unsafe fn create_vertex_array(&self) -> Result<Self::VertexArray, String>;
    unsafe fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>);
    unsafe fn delete_vertex_array(&self, vertex_array: Self::VertexArray);

    unsafe fn create_buffer(&self) -> Result<Self::Buffer, String>;
    unsafe fn bind_buffer(&self, target: u32, buffer: Option<Self::Buffer>);
    unsafe fn buffer_data_u8_slice(&self, target: u32, data: &[u8], usage: u32);
    unsafe fn delete_buffer(&self, buffer: Self::Buffer);

    unsafe fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    );
    unsafe fn enable_vertex_attrib_array(&self, index: u32);

    unsafe fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32);
    unsafe fn clear(&self, mask: u32);
    unsafe fn draw_arrays(&self, mode: u32, first: i32, count: i32);
    unsafe fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
}

impl Gl for glow::Context {
    type Shader = <glow::Context as HasContext>::Shader;
    type Program = <glow::Context as HasContext>::Program;
    type Buffer = <glow::Context as HasContext>::Buffer;
    type VertexArray = <glow::Context as HasContext>::VertexArray;

    unsafe fn create_shader(&self, shader_type: u32) -> Result<Self::Shader, String> {
        HasContext::create_shader(self, shader_type)
    }

    unsafe fn shader_source(&self, shader: Self::Shader, source: &str) {
        HasContext::shader_source(self, shader, source)
    }

    unsafe fn compile_shader(&self, shader: Self::Shader) {
        HasContext::compile_shader(self, shader)
    }

    unsafe fn get_shader_compile_status(&self, shader: Self::Shader) -> bool {
        HasContext::get_shader_compile_status(self, shader)
    }

    unsafe fn get_shader_info_log(&self, shader: Self::Shader) -> String {
        HasContext::get_shader_info_log(self, shader)
    }

    unsafe fn delete_shader(&self, shader: Self::Shader) {
        HasContext::delete_shader(self, shader)
    }

    unsafe fn create_program(&self) -> Result<Self::Program, String> {
        HasContext::create_program(self)
    }

    unsafe fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        HasContext::attach_shader(self, program, shader)
    }

    unsafe fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        HasContext::detach_shader(self, program, shader)
    }

    unsafe fn link_program(&self, program: Self::Program) {
        HasContext::link_program(self, program)
    }

    unsafe fn get_program_link_status(&self, program: Self::Program) -> bool {
        HasContext::get_program_link_status(self, program)
    }

    unsafe fn get_program_info_log(&self, program: Self::Program) -> String {
        HasContext::get_program_info_log(self, program)
    }

    unsafe fn use_program(&self, program: Option<Self::Program>) {
        HasContext::use_program(self, program)
    }

    unsafe fn delete_program(&self, program: Self::Program) {
        HasContext::delete_program(self, program)
    }

    unsafe fn create_vertex_array(&self) -> Result<Self::VertexArray, String> {
        HasContext::create_vertex_array(self)
    }

    unsafe fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>) {
        HasContext::bind_vertex_array(self, vertex_array)
    }

    unsafe fn delete_vertex_array(&self, vertex_array: Self::VertexArray) {
        HasContext::delete_vertex_array(self, vertex_array)
    }

    unsafe fn create_buffer(&self) -> Result<Self::Buffer, String> {
        HasContext::create_buffer(self)
    }

    unsafe fn bind_buffer(&self, target: u32, buffer: Option<Self::Buffer>) {
        HasContext::bind_buffer(self, target, buffer)
    }

    unsafe fn buffer_data_u8_slice(&self, target: u32, data: &[u8], usage: u32) {
        HasContext::buffer_data_u8_slice(self, target, data, usage)
    }

    unsafe fn delete_buffer(&self, buffer: Self::Buffer) {
        HasContext::delete_buffer(self, buffer)
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
        HasContext::vertex_attrib_pointer_f32(
            self, index, size, data_type, normalized, stride, offset,
        )
    }

    unsafe fn enable_vertex_attrib_array(&self, index: u32) {
        HasContext::enable_vertex_attrib_array(self, index)
    }

    unsafe fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        HasContext::clear_color(self, red, green, blue, alpha)
    }

    unsafe fn clear(&self, mask: u32) {
        HasContext::clear(self, mask)
    }

    unsafe fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        HasContext::draw_arrays(self, mode, first, count)
    }

    unsafe fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        HasContext::viewport(self, x, y, width, height)
    }
}
