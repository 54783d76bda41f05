// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A [`GraphicsContext`] backed by a glow OpenGL context.

use super::conversions::{to_i32, wait_timeout, GlVersion, IntoGlName, IntoGlow};
use anyhow::{anyhow, Result};
use glow::HasContext;
use glrenderer_core::gl::enums::GLenum;
use glrenderer_core::gl::{
    ClearBufferValue, GlFeature, GlImageRegion, GlName, GlSync, GraphicsContext, ProgramResource,
};
use glrenderer_core::ContextError;
use std::collections::HashMap;

/// The oldest desktop OpenGL version the backend replays against.
const MIN_DESKTOP_VERSION: (u32, u32) = (3, 3);

fn creation_error(kind: &'static str) -> impl FnOnce(String) -> ContextError {
    move |details| ContextError::ObjectCreation { kind, details }
}

/// Holds a glow context and the window hook that presents its back buffer.
///
/// The context must stay current on the thread that owns this value. Every
/// OpenGL call below relies on it.
pub struct GlowContext {
    gl: glow::Context,
    swap: Box<dyn FnMut()>,
    version: GlVersion,
    syncs: HashMap<u64, glow::NativeFence>,
    next_sync: u64,
}

impl std::fmt::Debug for GlowContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlowContext")
            .field("version", &self.version)
            .field("live_syncs", &self.syncs.len())
            .finish_non_exhaustive()
    }
}

impl GlowContext {
    /// Wraps a current context. `swap` presents the window's back buffer.
    ///
    /// ## Returns
    /// * `Result<Self>` - An error when the context is older than OpenGL 3.3.
    pub fn new(gl: glow::Context, swap: impl FnMut() + 'static) -> Result<Self> {
        let reported = gl.version();
        let version = GlVersion {
            major: reported.major,
            minor: reported.minor,
            embedded: reported.is_embedded,
        };
        log::info!(
            "GlowContext: OpenGL {}{}.{} ({})",
            if version.embedded { "ES " } else { "" },
            version.major,
            version.minor,
            reported.vendor_info
        );
        if !version.embedded && (version.major, version.minor) < MIN_DESKTOP_VERSION {
            return Err(anyhow!(
                "OpenGL {}.{} is too old, {}.{} is required",
                version.major,
                version.minor,
                MIN_DESKTOP_VERSION.0,
                MIN_DESKTOP_VERSION.1
            ));
        }
        Ok(Self {
            gl,
            swap: Box::new(swap),
            version,
            syncs: HashMap::new(),
            next_sync: 1,
        })
    }

    /// Loads the OpenGL entry points through `loader`, then wraps the context.
    ///
    /// # Safety
    ///
    /// The context the loader belongs to must be current on the calling thread.
    pub unsafe fn from_loader<F>(loader: F, swap: impl FnMut() + 'static) -> Result<Self>
    where
        F: FnMut(&str) -> *const std::os::raw::c_void,
    {
        let gl = unsafe { glow::Context::from_loader_function(loader) };
        Self::new(gl, swap)
    }

    /// The version reported by the driver.
    pub fn version(&self) -> GlVersion {
        self.version
    }

    /// The wrapped glow context.
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }
}

impl GraphicsContext for GlowContext {
    fn supports(&self, feature: GlFeature) -> bool {
        self.version.supports(feature)
    }

    // --- Buffers ---

    fn create_buffer(&mut self) -> Result<GlName, ContextError> {
        let buffer = unsafe { self.gl.create_buffer() }.map_err(creation_error("buffer"))?;
        Ok(buffer.into_gl_name())
    }

    fn delete_buffer(&mut self, buffer: GlName) {
        if let Some(buffer) = buffer.into_glow() {
            unsafe { self.gl.delete_buffer(buffer) };
        }
    }

    fn bind_buffer(&mut self, target: GLenum, buffer: Option<GlName>) {
        unsafe { self.gl.bind_buffer(target, buffer.and_then(IntoGlow::into_glow)) };
    }

    fn bind_buffer_range(&mut self, target: GLenum, index: u32, buffer: GlName, offset: u64, size: u64) {
        unsafe {
            self.gl
                .bind_buffer_range(target, index, buffer.into_glow(), to_i32(offset), to_i32(size))
        };
    }

    fn buffer_data(&mut self, target: GLenum, size: u64, usage: GLenum) {
        unsafe { self.gl.buffer_data_size(target, to_i32(size), usage) };
    }

    fn buffer_sub_data(&mut self, target: GLenum, offset: u64, data: &[u8]) {
        unsafe { self.gl.buffer_sub_data_u8_slice(target, to_i32(offset), data) };
    }

    fn get_buffer_sub_data(&mut self, target: GLenum, offset: u64, data: &mut [u8]) {
        unsafe { self.gl.get_buffer_sub_data(target, to_i32(offset), data) };
    }

    fn copy_buffer_sub_data(
        &mut self,
        read_target: GLenum,
        write_target: GLenum,
        read_offset: u64,
        write_offset: u64,
        size: u64,
    ) {
        unsafe {
            self.gl.copy_buffer_sub_data(
                read_target,
                write_target,
                to_i32(read_offset),
                to_i32(write_offset),
                to_i32(size),
            )
        };
    }

    // --- Vertex arrays ---

    fn create_vertex_array(&mut self) -> Result<GlName, ContextError> {
        let vao = unsafe { self.gl.create_vertex_array() }.map_err(creation_error("vertex array"))?;
        Ok(vao.into_gl_name())
    }

    fn delete_vertex_array(&mut self, vao: GlName) {
        if let Some(vao) = vao.into_glow() {
            unsafe { self.gl.delete_vertex_array(vao) };
        }
    }

    fn bind_vertex_array(&mut self, vao: Option<GlName>) {
        unsafe { self.gl.bind_vertex_array(vao.and_then(IntoGlow::into_glow)) };
    }

    fn enable_vertex_attrib_array(&mut self, location: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(location) };
    }

    fn vertex_attrib_pointer(
        &mut self,
        location: u32,
        size: i32,
        ty: GLenum,
        normalized: bool,
        stride: i32,
        offset: u64,
    ) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(location, size, ty, normalized, stride, to_i32(offset))
        };
    }

    fn vertex_attrib_i_pointer(&mut self, location: u32, size: i32, ty: GLenum, stride: i32, offset: u64) {
        unsafe { self.gl.vertex_attrib_pointer_i32(location, size, ty, stride, to_i32(offset)) };
    }

    fn vertex_attrib_divisor(&mut self, location: u32, divisor: u32) {
        unsafe { self.gl.vertex_attrib_divisor(location, divisor) };
    }

    // --- Textures ---

    fn create_texture(&mut self) -> Result<GlName, ContextError> {
        let texture = unsafe { self.gl.create_texture() }.map_err(creation_error("texture"))?;
        Ok(texture.into_gl_name())
    }

    fn delete_texture(&mut self, texture: GlName) {
        if let Some(texture) = texture.into_glow() {
            unsafe { self.gl.delete_texture(texture) };
        }
    }

    fn active_texture(&mut self, unit: u32) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) };
    }

    fn bind_texture(&mut self, target: GLenum, texture: Option<GlName>) {
        unsafe { self.gl.bind_texture(target, texture.and_then(IntoGlow::into_glow)) };
    }

    fn tex_storage_1d(&mut self, target: GLenum, levels: i32, internal_format: GLenum, width: i32) {
        unsafe { self.gl.tex_storage_1d(target, levels, internal_format, width) };
    }

    fn tex_storage_2d(&mut self, target: GLenum, levels: i32, internal_format: GLenum, width: i32, height: i32) {
        unsafe { self.gl.tex_storage_2d(target, levels, internal_format, width, height) };
    }

    fn tex_storage_3d(
        &mut self,
        target: GLenum,
        levels: i32,
        internal_format: GLenum,
        width: i32,
        height: i32,
        depth: i32,
    ) {
        unsafe {
            self.gl
                .tex_storage_3d(target, levels, internal_format, width, height, depth)
        };
    }

    fn tex_storage_2d_multisample(
        &mut self,
        target: GLenum,
        samples: i32,
        internal_format: GLenum,
        width: i32,
        height: i32,
    ) {
        unsafe {
            self.gl
                .tex_storage_2d_multisample(target, samples, internal_format, width, height, true)
        };
    }

    fn tex_parameter_i32(&mut self, target: GLenum, parameter: GLenum, value: i32) {
        unsafe { self.gl.tex_parameter_i32(target, parameter, value) };
    }

    fn pixel_store_i32(&mut self, parameter: GLenum, value: i32) {
        unsafe { self.gl.pixel_store_i32(parameter, value) };
    }

    fn tex_sub_image_1d(
        &mut self,
        _target: GLenum,
        _level: i32,
        _x: i32,
        _width: i32,
        _format: GLenum,
        _ty: GLenum,
        _offset: u64,
    ) {
        log::error!("GlowContext: glTexSubImage1D is not loaded, upload skipped");
    }

    fn tex_sub_image_2d(
        &mut self,
        target: GLenum,
        level: i32,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        format: GLenum,
        ty: GLenum,
        offset: u64,
    ) {
        unsafe {
            self.gl.tex_sub_image_2d(
                target,
                level,
                x,
                y,
                width,
                height,
                format,
                ty,
                glow::PixelUnpackData::BufferOffset(to_i32(offset) as u32),
            )
        };
    }

    fn tex_sub_image_3d(
        &mut self,
        target: GLenum,
        level: i32,
        origin: [i32; 3],
        size: [i32; 3],
        format: GLenum,
        ty: GLenum,
        offset: u64,
    ) {
        let [x, y, z] = origin;
        let [width, height, depth] = size;
        unsafe {
            self.gl.tex_sub_image_3d(
                target,
                level,
                x,
                y,
                z,
                width,
                height,
                depth,
                format,
                ty,
                glow::PixelUnpackData::BufferOffset(to_i32(offset) as u32),
            )
        };
    }

    fn get_tex_image(&mut self, target: GLenum, level: i32, format: GLenum, ty: GLenum, offset: u64) {
        unsafe {
            self.gl.get_tex_image(
                target,
                level,
                format,
                ty,
                glow::PixelPackData::BufferOffset(to_i32(offset) as u32),
            )
        };
    }

    fn generate_mipmap(&mut self, target: GLenum) {
        unsafe { self.gl.generate_mipmap(target) };
    }

    fn clear_tex_image(&mut self, _texture: GlName, _level: i32, _format: GLenum, _ty: GLenum, _data: &[u8]) {
        log::error!("GlowContext: glClearTexImage is not loaded, clear skipped");
    }

    fn copy_image_sub_data(&mut self, src: GlImageRegion, dst: GlImageRegion, size: [i32; 3]) {
        let (Some(src_name), Some(dst_name)) = (src.name.into_glow(), dst.name.into_glow()) else {
            return;
        };
        unsafe {
            self.gl.copy_image_sub_data(
                src_name,
                src.target,
                src.level,
                src.offset[0],
                src.offset[1],
                src.offset[2],
                dst_name,
                dst.target,
                dst.level,
                dst.offset[0],
                dst.offset[1],
                dst.offset[2],
                size[0],
                size[1],
                size[2],
            )
        };
    }

    fn bind_image_texture(
        &mut self,
        unit: u32,
        texture: GlName,
        level: i32,
        layered: bool,
        layer: i32,
        access: GLenum,
        format: GLenum,
    ) {
        unsafe {
            self.gl
                .bind_image_texture(unit, texture.into_glow(), level, layered, layer, access, format)
        };
    }

    // --- Samplers ---

    fn create_sampler(&mut self) -> Result<GlName, ContextError> {
        let sampler = unsafe { self.gl.create_sampler() }.map_err(creation_error("sampler"))?;
        Ok(sampler.into_gl_name())
    }

    fn delete_sampler(&mut self, sampler: GlName) {
        if let Some(sampler) = sampler.into_glow() {
            unsafe { self.gl.delete_sampler(sampler) };
        }
    }

    fn bind_sampler(&mut self, unit: u32, sampler: Option<GlName>) {
        unsafe { self.gl.bind_sampler(unit, sampler.and_then(IntoGlow::into_glow)) };
    }

    fn sampler_parameter_i32(&mut self, sampler: GlName, parameter: GLenum, value: i32) {
        if let Some(sampler) = sampler.into_glow() {
            unsafe { self.gl.sampler_parameter_i32(sampler, parameter, value) };
        }
    }

    fn sampler_parameter_f32(&mut self, sampler: GlName, parameter: GLenum, value: f32) {
        if let Some(sampler) = sampler.into_glow() {
            unsafe { self.gl.sampler_parameter_f32(sampler, parameter, value) };
        }
    }

    fn sampler_parameter_f32_slice(&mut self, sampler: GlName, parameter: GLenum, values: &[f32]) {
        if let Some(sampler) = sampler.into_glow() {
            unsafe { self.gl.sampler_parameter_f32_slice(sampler, parameter, values) };
        }
    }

    // --- Framebuffers ---

    fn create_framebuffer(&mut self) -> Result<GlName, ContextError> {
        let framebuffer = unsafe { self.gl.create_framebuffer() }.map_err(creation_error("framebuffer"))?;
        Ok(framebuffer.into_gl_name())
    }

    fn delete_framebuffer(&mut self, framebuffer: GlName) {
        if let Some(framebuffer) = framebuffer.into_glow() {
            unsafe { self.gl.delete_framebuffer(framebuffer) };
        }
    }

    fn bind_framebuffer(&mut self, target: GLenum, framebuffer: Option<GlName>) {
        unsafe {
            self.gl
                .bind_framebuffer(target, framebuffer.and_then(IntoGlow::into_glow))
        };
    }

    fn framebuffer_texture_2d(
        &mut self,
        target: GLenum,
        attachment: GLenum,
        texture_target: GLenum,
        texture: Option<GlName>,
        level: i32,
    ) {
        unsafe {
            self.gl.framebuffer_texture_2d(
                target,
                attachment,
                texture_target,
                texture.and_then(IntoGlow::into_glow),
                level,
            )
        };
    }

    fn framebuffer_texture_layer(
        &mut self,
        target: GLenum,
        attachment: GLenum,
        texture: Option<GlName>,
        level: i32,
        layer: i32,
    ) {
        unsafe {
            self.gl.framebuffer_texture_layer(
                target,
                attachment,
                texture.and_then(IntoGlow::into_glow),
                level,
                layer,
            )
        };
    }

    fn check_framebuffer_status(&mut self, target: GLenum) -> GLenum {
        unsafe { self.gl.check_framebuffer_status(target) }
    }

    fn draw_buffers(&mut self, buffers: &[GLenum]) {
        unsafe { self.gl.draw_buffers(buffers) };
    }

    fn read_buffer(&mut self, buffer: GLenum) {
        unsafe { self.gl.read_buffer(buffer) };
    }

    fn blit_framebuffer(&mut self, src: [i32; 4], dst: [i32; 4], mask: GLenum, filter: GLenum) {
        unsafe {
            self.gl.blit_framebuffer(
                src[0], src[1], src[2], src[3], dst[0], dst[1], dst[2], dst[3], mask, filter,
            )
        };
    }

    fn clear_buffer(&mut self, buffer: GLenum, draw_buffer: i32, value: ClearBufferValue) {
        let draw_buffer = draw_buffer.max(0) as u32;
        unsafe {
            match value {
                ClearBufferValue::Float(color) => self.gl.clear_buffer_f32_slice(buffer, draw_buffer, &color),
                ClearBufferValue::Int(color) => self.gl.clear_buffer_i32_slice(buffer, draw_buffer, &color),
                ClearBufferValue::Uint(color) => self.gl.clear_buffer_u32_slice(buffer, draw_buffer, &color),
                ClearBufferValue::Depth(depth) => self.gl.clear_buffer_f32_slice(glow::DEPTH, 0, &[depth]),
                ClearBufferValue::Stencil(stencil) => self.gl.clear_buffer_i32_slice(glow::STENCIL, 0, &[stencil]),
                ClearBufferValue::DepthStencil(depth, stencil) => {
                    self.gl
                        .clear_buffer_depth_stencil(glow::DEPTH_STENCIL, 0, depth, stencil)
                }
            }
        }
    }

    // --- Shaders and programs ---

    fn create_shader(&mut self, stage: GLenum) -> Result<GlName, ContextError> {
        let shader = unsafe { self.gl.create_shader(stage) }.map_err(creation_error("shader"))?;
        Ok(shader.into_gl_name())
    }

    fn delete_shader(&mut self, shader: GlName) {
        if let Some(shader) = shader.into_glow() {
            unsafe { self.gl.delete_shader(shader) };
        }
    }

    fn compile_shader(&mut self, shader: GlName, source: &str) -> Result<(), String> {
        let shader: Option<glow::NativeShader> = shader.into_glow();
        let shader = shader.ok_or_else(|| "shader object 0".to_string())?;
        unsafe {
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            if self.gl.get_shader_compile_status(shader) {
                Ok(())
            } else {
                Err(self.gl.get_shader_info_log(shader))
            }
        }
    }

    fn create_program(&mut self) -> Result<GlName, ContextError> {
        let program = unsafe { self.gl.create_program() }.map_err(creation_error("program"))?;
        Ok(program.into_gl_name())
    }

    fn delete_program(&mut self, program: GlName) {
        if let Some(program) = program.into_glow() {
            unsafe { self.gl.delete_program(program) };
        }
    }

    fn attach_shader(&mut self, program: GlName, shader: GlName) {
        if let (Some(program), Some(shader)) = (program.into_glow(), shader.into_glow()) {
            unsafe { self.gl.attach_shader(program, shader) };
        }
    }

    fn detach_shader(&mut self, program: GlName, shader: GlName) {
        if let (Some(program), Some(shader)) = (program.into_glow(), shader.into_glow()) {
            unsafe { self.gl.detach_shader(program, shader) };
        }
    }

    fn link_program(&mut self, program: GlName) -> Result<(), String> {
        let program: Option<glow::NativeProgram> = program.into_glow();
        let program = program.ok_or_else(|| "program object 0".to_string())?;
        unsafe {
            self.gl.link_program(program);
            if self.gl.get_program_link_status(program) {
                Ok(())
            } else {
                Err(self.gl.get_program_info_log(program))
            }
        }
    }

    fn use_program(&mut self, program: Option<GlName>) {
        unsafe { self.gl.use_program(program.and_then(IntoGlow::into_glow)) };
    }

    fn program_inputs(&mut self, program: GlName) -> Option<Vec<ProgramResource>> {
        let program: Option<glow::NativeProgram> = program.into_glow();
        let program = program?;
        let inputs = unsafe {
            (0..self.gl.get_active_attributes(program))
                .filter_map(|index| self.gl.get_active_attribute(program, index))
                .map(|attribute| ProgramResource {
                    location: self
                        .gl
                        .get_attrib_location(program, &attribute.name)
                        .map_or(-1, |location| location as i32),
                    gl_type: attribute.atype,
                    name: attribute.name,
                })
                .collect()
        };
        Some(inputs)
    }

    fn program_outputs(&mut self, program: GlName) -> Option<Vec<ProgramResource>> {
        if !self.supports(GlFeature::ProgramInterfaceQuery) {
            return None;
        }
        let program: Option<glow::NativeProgram> = program.into_glow();
        let program = program?;
        // glow has no glGetProgramInterfaceiv, so walk the dense resource
        // indices until one reports no properties. Names are not reflected.
        let limit = unsafe { self.gl.get_parameter_i32(glow::MAX_DRAW_BUFFERS) }.max(1) as u32;
        let mut outputs = Vec::new();
        for index in 0..limit {
            let properties = unsafe {
                self.gl
                    .get_program_resource_i32(program, glow::PROGRAM_OUTPUT, index, &[glow::TYPE, glow::LOCATION])
            };
            let &[gl_type, location] = properties.as_slice() else {
                // Drops the GL_INVALID_VALUE raised by the index past the end.
                unsafe { self.gl.get_error() };
                break;
            };
            // Built-ins such as gl_FragDepth have no location.
            if location < 0 {
                continue;
            }
            outputs.push(ProgramResource {
                name: format!("output #{index}"),
                gl_type: gl_type as GLenum,
                location,
            });
        }
        Some(outputs)
    }

    fn uniform_f32(&mut self, location: i32, components: u32, values: &[f32]) {
        if location < 0 {
            return;
        }
        let location = glow::NativeUniformLocation(location as u32);
        let location = Some(&location);
        unsafe {
            match components {
                1 => self.gl.uniform_1_f32_slice(location, values),
                2 => self.gl.uniform_2_f32_slice(location, values),
                3 => self.gl.uniform_3_f32_slice(location, values),
                _ => self.gl.uniform_4_f32_slice(location, values),
            }
        }
    }

    fn uniform_i32(&mut self, location: i32, components: u32, values: &[i32]) {
        if location < 0 {
            return;
        }
        let location = glow::NativeUniformLocation(location as u32);
        let location = Some(&location);
        unsafe {
            match components {
                1 => self.gl.uniform_1_i32_slice(location, values),
                2 => self.gl.uniform_2_i32_slice(location, values),
                3 => self.gl.uniform_3_i32_slice(location, values),
                _ => self.gl.uniform_4_i32_slice(location, values),
            }
        }
    }

    fn uniform_u32(&mut self, location: i32, components: u32, values: &[u32]) {
        if location < 0 {
            return;
        }
        let location = glow::NativeUniformLocation(location as u32);
        let location = Some(&location);
        unsafe {
            match components {
                1 => self.gl.uniform_1_u32_slice(location, values),
                2 => self.gl.uniform_2_u32_slice(location, values),
                3 => self.gl.uniform_3_u32_slice(location, values),
                _ => self.gl.uniform_4_u32_slice(location, values),
            }
        }
    }

    fn uniform_matrix_f32(&mut self, location: i32, dimension: u32, values: &[f32]) {
        if location < 0 {
            return;
        }
        let location = glow::NativeUniformLocation(location as u32);
        let location = Some(&location);
        unsafe {
            match dimension {
                2 => self.gl.uniform_matrix_2_f32_slice(location, false, values),
                3 => self.gl.uniform_matrix_3_f32_slice(location, false, values),
                _ => self.gl.uniform_matrix_4_f32_slice(location, false, values),
            }
        }
    }

    // --- Fixed-function state ---

    fn enable(&mut self, capability: GLenum) {
        unsafe { self.gl.enable(capability) };
    }

    fn disable(&mut self, capability: GLenum) {
        unsafe { self.gl.disable(capability) };
    }

    fn enable_i(&mut self, capability: GLenum, index: u32) {
        unsafe { self.gl.enable_draw_buffer(capability, index) };
    }

    fn disable_i(&mut self, capability: GLenum, index: u32) {
        unsafe { self.gl.disable_draw_buffer(capability, index) };
    }

    fn cull_face(&mut self, mode: GLenum) {
        unsafe { self.gl.cull_face(mode) };
    }

    fn front_face(&mut self, mode: GLenum) {
        unsafe { self.gl.front_face(mode) };
    }

    fn polygon_mode(&mut self, face: GLenum, mode: GLenum) {
        unsafe { self.gl.polygon_mode(face, mode) };
    }

    fn polygon_offset(&mut self, factor: f32, units: f32) {
        unsafe { self.gl.polygon_offset(factor, units) };
    }

    fn line_width(&mut self, width: f32) {
        unsafe { self.gl.line_width(width) };
    }

    fn depth_func(&mut self, func: GLenum) {
        unsafe { self.gl.depth_func(func) };
    }

    fn depth_mask(&mut self, write: bool) {
        unsafe { self.gl.depth_mask(write) };
    }

    fn depth_range(&mut self, near: f32, far: f32) {
        unsafe { self.gl.depth_range_f32(near, far) };
    }

    fn stencil_func_separate(&mut self, face: GLenum, func: GLenum, reference: i32, mask: u32) {
        unsafe { self.gl.stencil_func_separate(face, func, reference, mask) };
    }

    fn stencil_mask_separate(&mut self, face: GLenum, mask: u32) {
        unsafe { self.gl.stencil_mask_separate(face, mask) };
    }

    fn stencil_op_separate(&mut self, face: GLenum, fail: GLenum, depth_fail: GLenum, pass: GLenum) {
        unsafe { self.gl.stencil_op_separate(face, fail, depth_fail, pass) };
    }

    fn blend_color(&mut self, color: [f32; 4]) {
        let [r, g, b, a] = color;
        unsafe { self.gl.blend_color(r, g, b, a) };
    }

    fn blend_equation_separate_i(&mut self, buffer: u32, mode_rgb: GLenum, mode_alpha: GLenum) {
        unsafe {
            self.gl
                .blend_equation_separate_draw_buffer(buffer, mode_rgb, mode_alpha)
        };
    }

    fn blend_func_separate_i(
        &mut self,
        buffer: u32,
        src_rgb: GLenum,
        dst_rgb: GLenum,
        src_alpha: GLenum,
        dst_alpha: GLenum,
    ) {
        unsafe {
            self.gl
                .blend_func_separate_draw_buffer(buffer, src_rgb, dst_rgb, src_alpha, dst_alpha)
        };
    }

    fn color_mask_i(&mut self, buffer: u32, mask: [bool; 4]) {
        let [r, g, b, a] = mask;
        unsafe { self.gl.color_mask_draw_buffer(buffer, r, g, b, a) };
    }

    fn logic_op(&mut self, _op: GLenum) {
        log::warn!("GlowContext: glLogicOp is not loaded, logic op ignored");
    }

    fn min_sample_shading(&mut self, _value: f32) {
        log::warn!("GlowContext: glMinSampleShading is not loaded, sample shading ignored");
    }

    fn patch_parameter_i32(&mut self, parameter: GLenum, value: i32) {
        unsafe { self.gl.patch_parameter_i32(parameter, value) };
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) };
    }

    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.scissor(x, y, width, height) };
    }

    // --- Drawing and compute ---

    fn draw_arrays_instanced_base_instance(
        &mut self,
        mode: GLenum,
        first: i32,
        count: i32,
        instance_count: i32,
        base_instance: u32,
    ) {
        unsafe {
            self.gl
                .draw_arrays_instanced_base_instance(mode, first, count, instance_count, base_instance)
        };
    }

    fn draw_elements_instanced_base_vertex_base_instance(
        &mut self,
        mode: GLenum,
        count: i32,
        ty: GLenum,
        offset: u64,
        instance_count: i32,
        base_vertex: i32,
        base_instance: u32,
    ) {
        unsafe {
            self.gl.draw_elements_instanced_base_vertex_base_instance(
                mode,
                count,
                ty,
                to_i32(offset),
                instance_count,
                base_vertex,
                base_instance,
            )
        };
    }

    fn draw_arrays_indirect(&mut self, mode: GLenum, offset: u64) {
        unsafe { self.gl.draw_arrays_indirect_offset(mode, to_i32(offset)) };
    }

    fn draw_elements_indirect(&mut self, mode: GLenum, ty: GLenum, offset: u64) {
        unsafe { self.gl.draw_elements_indirect_offset(mode, ty, to_i32(offset)) };
    }

    fn dispatch_compute(&mut self, x: u32, y: u32, z: u32) {
        unsafe { self.gl.dispatch_compute(x, y, z) };
    }

    fn dispatch_compute_indirect(&mut self, offset: u64) {
        unsafe { self.gl.dispatch_compute_indirect(to_i32(offset)) };
    }

    // --- Synchronization and queries ---

    fn fence_sync(&mut self) -> Result<GlSync, ContextError> {
        let fence = unsafe { self.gl.fence_sync(glow::SYNC_GPU_COMMANDS_COMPLETE, 0) }
            .map_err(creation_error("sync"))?;
        let handle = self.next_sync;
        self.next_sync += 1;
        self.syncs.insert(handle, fence);
        Ok(GlSync(handle))
    }

    fn client_wait_sync(&mut self, sync: GlSync, flags: GLenum, timeout_ns: u64) -> GLenum {
        match self.syncs.get(&sync.0) {
            Some(fence) => unsafe { self.gl.client_wait_sync(*fence, flags, wait_timeout(timeout_ns)) },
            None => {
                log::error!("GlowContext: {sync:?} is not a live sync object");
                glow::WAIT_FAILED
            }
        }
    }

    fn delete_sync(&mut self, sync: GlSync) {
        if let Some(fence) = self.syncs.remove(&sync.0) {
            unsafe { self.gl.delete_sync(fence) };
        }
    }

    fn create_query(&mut self) -> Result<GlName, ContextError> {
        let query = unsafe { self.gl.create_query() }.map_err(creation_error("query"))?;
        Ok(query.into_gl_name())
    }

    fn delete_query(&mut self, query: GlName) {
        if let Some(query) = query.into_glow() {
            unsafe { self.gl.delete_query(query) };
        }
    }

    fn begin_query(&mut self, target: GLenum, query: GlName) {
        if let Some(query) = query.into_glow() {
            unsafe { self.gl.begin_query(target, query) };
        }
    }

    fn end_query(&mut self, target: GLenum) {
        unsafe { self.gl.end_query(target) };
    }

    fn query_counter(&mut self, query: GlName, target: GLenum) {
        if let Some(query) = query.into_glow() {
            unsafe { self.gl.query_counter(query, target) };
        }
    }

    fn query_result(&mut self, query: GlName) -> Option<u64> {
        let query: Option<glow::NativeQuery> = query.into_glow();
        let query = query?;
        unsafe {
            let available = self.gl.get_query_parameter_u32(query, glow::QUERY_RESULT_AVAILABLE);
            (available != 0).then(|| u64::from(self.gl.get_query_parameter_u32(query, glow::QUERY_RESULT)))
        }
    }

    fn flush(&mut self) {
        unsafe { self.gl.flush() };
    }

    fn finish(&mut self) {
        unsafe { self.gl.finish() };
    }

    fn swap_buffers(&mut self) {
        (self.swap)();
    }
}

impl Drop for GlowContext {
    fn drop(&mut self) {
        for (_, fence) in self.syncs.drain() {
            unsafe { self.gl.delete_sync(fence) };
        }
    }
}
