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

//! The OpenGL capability object every replayed command is applied to.

use super::enums::GLenum;
use crate::error::ContextError;

/// The name of an OpenGL object (buffer, texture, program, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlName(pub u32);

/// A handle to an OpenGL sync object, owned by the context that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlSync(pub u64);

/// Optional entry points, checked before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlFeature {
    /// `glClearTexImage` (OpenGL 4.4).
    ClearTexImage,
    /// `glCopyImageSubData` (OpenGL 4.3).
    CopyImageSubData,
    /// `glTexSubImage1D`.
    TexSubImage1D,
    /// `glLogicOp`.
    LogicOp,
    /// `glMinSampleShading` (OpenGL 4.0).
    SampleShading,
    /// `glBindImageTexture` (OpenGL 4.2).
    ImageLoadStore,
    /// `glQueryCounter` with `GL_TIMESTAMP`.
    TimestampQuery,
    /// `glGetProgramResourceiv` (OpenGL 4.3).
    ProgramInterfaceQuery,
}

/// A reflected active input or output of a linked program.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProgramResource {
    /// Variable name.
    pub name: String,
    /// GLSL type, e.g. `GL_FLOAT_VEC3`.
    pub gl_type: GLenum,
    /// Declared location, `-1` when none.
    pub location: i32,
}

/// The value given to a `glClearBuffer*` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClearBufferValue {
    /// `glClearBufferfv`
    Float([f32; 4]),
    /// `glClearBufferiv`
    Int([i32; 4]),
    /// `glClearBufferuiv`
    Uint([u32; 4]),
    /// `glClearBufferfv(GL_DEPTH, ...)`
    Depth(f32),
    /// `glClearBufferiv(GL_STENCIL, ...)`
    Stencil(i32),
    /// `glClearBufferfi(GL_DEPTH_STENCIL, ...)`
    DepthStencil(f32, i32),
}

/// A texel position in one mip level of a texture, for `glCopyImageSubData`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlImageRegion {
    /// The texture.
    pub name: GlName,
    /// Its target.
    pub target: GLenum,
    /// The mip level.
    pub level: i32,
    /// Texel offset `[x, y, z]`.
    pub offset: [i32; 3],
}

/// Explicit access to a single current OpenGL context.
///
/// Every command applies itself through this trait instead of an implicit
/// current context. It mirrors the OpenGL entry points used by the backend at
/// the `GLenum` level. Implementations are not expected to validate arguments.
///
/// Object creation can fail; state setting cannot. Optional entry points are
/// guarded by [`GraphicsContext::supports`].
pub trait GraphicsContext {
    /// Returns `true` when the optional entry point is available.
    fn supports(&self, feature: GlFeature) -> bool;

    // --- Buffers ---

    /// `glGenBuffers`
    fn create_buffer(&mut self) -> Result<GlName, ContextError>;
    /// `glDeleteBuffers`
    fn delete_buffer(&mut self, buffer: GlName);
    /// `glBindBuffer`
    fn bind_buffer(&mut self, target: GLenum, buffer: Option<GlName>);
    /// `glBindBufferRange`
    fn bind_buffer_range(&mut self, target: GLenum, index: u32, buffer: GlName, offset: u64, size: u64);
    /// `glBufferData` without initial data.
    fn buffer_data(&mut self, target: GLenum, size: u64, usage: GLenum);
    /// `glBufferSubData`
    fn buffer_sub_data(&mut self, target: GLenum, offset: u64, data: &[u8]);
    /// `glGetBufferSubData`
    fn get_buffer_sub_data(&mut self, target: GLenum, offset: u64, data: &mut [u8]);
    /// `glCopyBufferSubData`
    fn copy_buffer_sub_data(
        &mut self,
        read_target: GLenum,
        write_target: GLenum,
        read_offset: u64,
        write_offset: u64,
        size: u64,
    );

    // --- Vertex arrays ---

    /// `glGenVertexArrays`
    fn create_vertex_array(&mut self) -> Result<GlName, ContextError>;
    /// `glDeleteVertexArrays`
    fn delete_vertex_array(&mut self, vao: GlName);
    /// `glBindVertexArray`
    fn bind_vertex_array(&mut self, vao: Option<GlName>);
    /// `glEnableVertexAttribArray`
    fn enable_vertex_attrib_array(&mut self, location: u32);
    /// `glVertexAttribPointer`
    fn vertex_attrib_pointer(
        &mut self,
        location: u32,
        size: i32,
        ty: GLenum,
        normalized: bool,
        stride: i32,
        offset: u64,
    );
    /// `glVertexAttribIPointer`
    fn vertex_attrib_i_pointer(&mut self, location: u32, size: i32, ty: GLenum, stride: i32, offset: u64);
    /// `glVertexAttribDivisor`
    fn vertex_attrib_divisor(&mut self, location: u32, divisor: u32);

    // --- Textures ---

    /// `glGenTextures`
    fn create_texture(&mut self) -> Result<GlName, ContextError>;
    /// `glDeleteTextures`
    fn delete_texture(&mut self, texture: GlName);
    /// `glActiveTexture(GL_TEXTURE0 + unit)`
    fn active_texture(&mut self, unit: u32);
    /// `glBindTexture`
    fn bind_texture(&mut self, target: GLenum, texture: Option<GlName>);
    /// `glTexStorage1D`
    fn tex_storage_1d(&mut self, target: GLenum, levels: i32, internal_format: GLenum, width: i32);
    /// `glTexStorage2D`
    fn tex_storage_2d(&mut self, target: GLenum, levels: i32, internal_format: GLenum, width: i32, height: i32);
    /// `glTexStorage3D`
    fn tex_storage_3d(
        &mut self,
        target: GLenum,
        levels: i32,
        internal_format: GLenum,
        width: i32,
        height: i32,
        depth: i32,
    );
    /// `glTexStorage2DMultisample` with fixed sample locations.
    fn tex_storage_2d_multisample(
        &mut self,
        target: GLenum,
        samples: i32,
        internal_format: GLenum,
        width: i32,
        height: i32,
    );
    /// `glTexParameteri`
    fn tex_parameter_i32(&mut self, target: GLenum, parameter: GLenum, value: i32);
    /// `glPixelStorei`
    fn pixel_store_i32(&mut self, parameter: GLenum, value: i32);
    /// `glTexSubImage1D` from the bound pixel unpack buffer at `offset`.
    #[allow(clippy::too_many_arguments)]
    fn tex_sub_image_1d(
        &mut self,
        target: GLenum,
        level: i32,
        x: i32,
        width: i32,
        format: GLenum,
        ty: GLenum,
        offset: u64,
    );
    /// `glTexSubImage2D` from the bound pixel unpack buffer at `offset`.
    #[allow(clippy::too_many_arguments)]
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
    );
    /// `glTexSubImage3D` from the bound pixel unpack buffer at `offset`.
    #[allow(clippy::too_many_arguments)]
    fn tex_sub_image_3d(
        &mut self,
        target: GLenum,
        level: i32,
        origin: [i32; 3],
        size: [i32; 3],
        format: GLenum,
        ty: GLenum,
        offset: u64,
    );
    /// `glGetTexImage` into the bound pixel pack buffer at `offset`.
    fn get_tex_image(&mut self, target: GLenum, level: i32, format: GLenum, ty: GLenum, offset: u64);
    /// `glGenerateMipmap`
    fn generate_mipmap(&mut self, target: GLenum);
    /// `glClearTexImage`, guarded by [`GlFeature::ClearTexImage`].
    fn clear_tex_image(&mut self, texture: GlName, level: i32, format: GLenum, ty: GLenum, data: &[u8]);
    /// `glCopyImageSubData`, guarded by [`GlFeature::CopyImageSubData`].
    fn copy_image_sub_data(&mut self, src: GlImageRegion, dst: GlImageRegion, size: [i32; 3]);
    /// `glBindImageTexture`, guarded by [`GlFeature::ImageLoadStore`].
    #[allow(clippy::too_many_arguments)]
    fn bind_image_texture(
        &mut self,
        unit: u32,
        texture: GlName,
        level: i32,
        layered: bool,
        layer: i32,
        access: GLenum,
        format: GLenum,
    );

    // --- Samplers ---

    /// `glGenSamplers`
    fn create_sampler(&mut self) -> Result<GlName, ContextError>;
    /// `glDeleteSamplers`
    fn delete_sampler(&mut self, sampler: GlName);
    /// `glBindSampler`
    fn bind_sampler(&mut self, unit: u32, sampler: Option<GlName>);
    /// `glSamplerParameteri`
    fn sampler_parameter_i32(&mut self, sampler: GlName, parameter: GLenum, value: i32);
    /// `glSamplerParameterf`
    fn sampler_parameter_f32(&mut self, sampler: GlName, parameter: GLenum, value: f32);
    /// `glSamplerParameterfv`
    fn sampler_parameter_f32_slice(&mut self, sampler: GlName, parameter: GLenum, values: &[f32]);

    // --- Framebuffers ---

    /// `glGenFramebuffers`
    fn create_framebuffer(&mut self) -> Result<GlName, ContextError>;
    /// `glDeleteFramebuffers`
    fn delete_framebuffer(&mut self, framebuffer: GlName);
    /// `glBindFramebuffer`; `None` is the default framebuffer.
    fn bind_framebuffer(&mut self, target: GLenum, framebuffer: Option<GlName>);
    /// `glFramebufferTexture2D`
    fn framebuffer_texture_2d(
        &mut self,
        target: GLenum,
        attachment: GLenum,
        texture_target: GLenum,
        texture: Option<GlName>,
        level: i32,
    );
    /// `glFramebufferTextureLayer`
    fn framebuffer_texture_layer(
        &mut self,
        target: GLenum,
        attachment: GLenum,
        texture: Option<GlName>,
        level: i32,
        layer: i32,
    );
    /// `glCheckFramebufferStatus`
    fn check_framebuffer_status(&mut self, target: GLenum) -> GLenum;
    /// `glDrawBuffers`
    fn draw_buffers(&mut self, buffers: &[GLenum]);
    /// `glReadBuffer`
    fn read_buffer(&mut self, buffer: GLenum);
    /// `glBlitFramebuffer`; rectangles are `[x0, y0, x1, y1]`.
    fn blit_framebuffer(&mut self, src: [i32; 4], dst: [i32; 4], mask: GLenum, filter: GLenum);
    /// `glClearBuffer*`
    fn clear_buffer(&mut self, buffer: GLenum, draw_buffer: i32, value: ClearBufferValue);

    // --- Shaders and programs ---

    /// `glCreateShader`
    fn create_shader(&mut self, stage: GLenum) -> Result<GlName, ContextError>;
    /// `glDeleteShader`
    fn delete_shader(&mut self, shader: GlName);
    /// `glShaderSource` then `glCompileShader`; the error holds the info log.
    fn compile_shader(&mut self, shader: GlName, source: &str) -> Result<(), String>;
    /// `glCreateProgram`
    fn create_program(&mut self) -> Result<GlName, ContextError>;
    /// `glDeleteProgram`
    fn delete_program(&mut self, program: GlName);
    /// `glAttachShader`
    fn attach_shader(&mut self, program: GlName, shader: GlName);
    /// `glDetachShader`
    fn detach_shader(&mut self, program: GlName, shader: GlName);
    /// `glLinkProgram`; the error holds the info log.
    fn link_program(&mut self, program: GlName) -> Result<(), String>;
    /// `glUseProgram`
    fn use_program(&mut self, program: Option<GlName>);
    /// Active program inputs, `None` when the context cannot reflect them.
    fn program_inputs(&mut self, program: GlName) -> Option<Vec<ProgramResource>>;
    /// Active program outputs, `None` when the context cannot reflect them.
    fn program_outputs(&mut self, program: GlName) -> Option<Vec<ProgramResource>>;
    /// `glUniform{1,2,3,4}fv`
    fn uniform_f32(&mut self, location: i32, components: u32, values: &[f32]);
    /// `glUniform{1,2,3,4}iv`
    fn uniform_i32(&mut self, location: i32, components: u32, values: &[i32]);
    /// `glUniform{1,2,3,4}uiv`
    fn uniform_u32(&mut self, location: i32, components: u32, values: &[u32]);
    /// `glUniformMatrix{2,3,4}fv`, column major.
    fn uniform_matrix_f32(&mut self, location: i32, dimension: u32, values: &[f32]);

    // --- Fixed-function state ---

    /// `glEnable`
    fn enable(&mut self, capability: GLenum);
    /// `glDisable`
    fn disable(&mut self, capability: GLenum);
    /// `glEnablei`
    fn enable_i(&mut self, capability: GLenum, index: u32);
    /// `glDisablei`
    fn disable_i(&mut self, capability: GLenum, index: u32);
    /// `glCullFace`
    fn cull_face(&mut self, mode: GLenum);
    /// `glFrontFace`
    fn front_face(&mut self, mode: GLenum);
    /// `glPolygonMode`
    fn polygon_mode(&mut self, face: GLenum, mode: GLenum);
    /// `glPolygonOffset`
    fn polygon_offset(&mut self, factor: f32, units: f32);
    /// `glLineWidth`
    fn line_width(&mut self, width: f32);
    /// `glDepthFunc`
    fn depth_func(&mut self, func: GLenum);
    /// `glDepthMask`
    fn depth_mask(&mut self, write: bool);
    /// `glDepthRangef`
    fn depth_range(&mut self, near: f32, far: f32);
    /// `glStencilFuncSeparate`
    fn stencil_func_separate(&mut self, face: GLenum, func: GLenum, reference: i32, mask: u32);
    /// `glStencilMaskSeparate`
    fn stencil_mask_separate(&mut self, face: GLenum, mask: u32);
    /// `glStencilOpSeparate`
    fn stencil_op_separate(&mut self, face: GLenum, fail: GLenum, depth_fail: GLenum, pass: GLenum);
    /// `glBlendColor`
    fn blend_color(&mut self, color: [f32; 4]);
    /// `glBlendEquationSeparatei`
    fn blend_equation_separate_i(&mut self, buffer: u32, mode_rgb: GLenum, mode_alpha: GLenum);
    /// `glBlendFuncSeparatei`
    fn blend_func_separate_i(
        &mut self,
        buffer: u32,
        src_rgb: GLenum,
        dst_rgb: GLenum,
        src_alpha: GLenum,
        dst_alpha: GLenum,
    );
    /// `glColorMaski`
    fn color_mask_i(&mut self, buffer: u32, mask: [bool; 4]);
    /// `glLogicOp`, guarded by [`GlFeature::LogicOp`].
    fn logic_op(&mut self, op: GLenum);
    /// `glMinSampleShading`, guarded by [`GlFeature::SampleShading`].
    fn min_sample_shading(&mut self, value: f32);
    /// `glPatchParameteri`
    fn patch_parameter_i32(&mut self, parameter: GLenum, value: i32);
    /// `glViewport`
    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32);
    /// `glScissor`
    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32);

    // --- Drawing and compute ---

    /// `glDrawArraysInstancedBaseInstance`
    fn draw_arrays_instanced_base_instance(
        &mut self,
        mode: GLenum,
        first: i32,
        count: i32,
        instance_count: i32,
        base_instance: u32,
    );
    /// `glDrawElementsInstancedBaseVertexBaseInstance`
    #[allow(clippy::too_many_arguments)]
    fn draw_elements_instanced_base_vertex_base_instance(
        &mut self,
        mode: GLenum,
        count: i32,
        ty: GLenum,
        offset: u64,
        instance_count: i32,
        base_vertex: i32,
        base_instance: u32,
    );
    /// `glDrawArraysIndirect` from the bound draw indirect buffer.
    fn draw_arrays_indirect(&mut self, mode: GLenum, offset: u64);
    /// `glDrawElementsIndirect` from the bound draw indirect buffer.
    fn draw_elements_indirect(&mut self, mode: GLenum, ty: GLenum, offset: u64);
    /// `glDispatchCompute`
    fn dispatch_compute(&mut self, x: u32, y: u32, z: u32);
    /// `glDispatchComputeIndirect` from the bound dispatch indirect buffer.
    fn dispatch_compute_indirect(&mut self, offset: u64);

    // --- Synchronization and queries ---

    /// `glFenceSync(GL_SYNC_GPU_COMMANDS_COMPLETE, 0)`
    fn fence_sync(&mut self) -> Result<GlSync, ContextError>;
    /// `glClientWaitSync`
    fn client_wait_sync(&mut self, sync: GlSync, flags: GLenum, timeout_ns: u64) -> GLenum;
    /// `glDeleteSync`
    fn delete_sync(&mut self, sync: GlSync);
    /// `glGenQueries`
    fn create_query(&mut self) -> Result<GlName, ContextError>;
    /// `glDeleteQueries`
    fn delete_query(&mut self, query: GlName);
    /// `glBeginQuery`
    fn begin_query(&mut self, target: GLenum, query: GlName);
    /// `glEndQuery`
    fn end_query(&mut self, target: GLenum);
    /// `glQueryCounter`, guarded by [`GlFeature::TimestampQuery`].
    fn query_counter(&mut self, query: GlName, target: GLenum);
    /// `glGetQueryObjectui64v(GL_QUERY_RESULT)` once `GL_QUERY_RESULT_AVAILABLE` is set.
    fn query_result(&mut self, query: GlName) -> Option<u64>;
    /// `glFlush`
    fn flush(&mut self);
    /// `glFinish`
    fn finish(&mut self);
    /// Presents the back buffer of the window the context renders to.
    fn swap_buffers(&mut self);
}
