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

//! A [`GraphicsContext`] that records calls instead of issuing them.
//!
//! `TraceContext` is the headless context used by the tests of this crate and
//! by tools that inspect what a submission would send to the driver. Handles
//! are cloneable and share one trace, so a clone kept by the caller observes
//! every call made through the clone given to a [`Device`](crate::Device).

use super::context::{
    ClearBufferValue, GlFeature, GlImageRegion, GlName, GlSync, GraphicsContext, ProgramResource,
};
use super::enums::{self as gl, GLenum};
use crate::error::ContextError;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// The kind of an object created or deleted through the context.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Buffer,
    VertexArray,
    Texture,
    Sampler,
    Framebuffer,
    Shader,
    Program,
    Query,
}

/// One recorded OpenGL call.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    Create {
        kind: ObjectKind,
        name: GlName,
    },
    Delete {
        kind: ObjectKind,
        name: GlName,
    },
    BindBuffer {
        target: GLenum,
        buffer: Option<GlName>,
    },
    BindBufferRange {
        target: GLenum,
        index: u32,
        buffer: GlName,
        offset: u64,
        size: u64,
    },
    BufferData {
        target: GLenum,
        size: u64,
        usage: GLenum,
    },
    BufferSubData {
        target: GLenum,
        offset: u64,
        data: Vec<u8>,
    },
    GetBufferSubData {
        target: GLenum,
        offset: u64,
        size: usize,
    },
    CopyBufferSubData {
        read_target: GLenum,
        write_target: GLenum,
        read_offset: u64,
        write_offset: u64,
        size: u64,
    },
    BindVertexArray(Option<GlName>),
    EnableVertexAttribArray(u32),
    VertexAttribPointer {
        location: u32,
        size: i32,
        ty: GLenum,
        normalized: bool,
        stride: i32,
        offset: u64,
    },
    VertexAttribIPointer {
        location: u32,
        size: i32,
        ty: GLenum,
        stride: i32,
        offset: u64,
    },
    VertexAttribDivisor {
        location: u32,
        divisor: u32,
    },
    ActiveTexture(u32),
    BindTexture {
        target: GLenum,
        texture: Option<GlName>,
    },
    TexStorage {
        target: GLenum,
        levels: i32,
        internal_format: GLenum,
        size: [i32; 3],
        samples: i32,
    },
    TexParameter {
        target: GLenum,
        parameter: GLenum,
        value: i32,
    },
    PixelStore {
        parameter: GLenum,
        value: i32,
    },
    TexSubImage {
        target: GLenum,
        level: i32,
        origin: [i32; 3],
        size: [i32; 3],
        format: GLenum,
        ty: GLenum,
        offset: u64,
    },
    GetTexImage {
        target: GLenum,
        level: i32,
        format: GLenum,
        ty: GLenum,
        offset: u64,
    },
    GenerateMipmap(GLenum),
    ClearTexImage {
        texture: GlName,
        level: i32,
        format: GLenum,
        ty: GLenum,
        data: Vec<u8>,
    },
    CopyImageSubData {
        src: GlImageRegion,
        dst: GlImageRegion,
        size: [i32; 3],
    },
    BindImageTexture {
        unit: u32,
        texture: GlName,
        level: i32,
        layered: bool,
        layer: i32,
        access: GLenum,
        format: GLenum,
    },
    BindSampler {
        unit: u32,
        sampler: Option<GlName>,
    },
    SamplerParameterI {
        sampler: GlName,
        parameter: GLenum,
        value: i32,
    },
    SamplerParameterF {
        sampler: GlName,
        parameter: GLenum,
        value: f32,
    },
    SamplerParameterFv {
        sampler: GlName,
        parameter: GLenum,
        values: Vec<f32>,
    },
    BindFramebuffer {
        target: GLenum,
        framebuffer: Option<GlName>,
    },
    FramebufferTexture2D {
        target: GLenum,
        attachment: GLenum,
        texture_target: GLenum,
        texture: Option<GlName>,
        level: i32,
    },
    FramebufferTextureLayer {
        target: GLenum,
        attachment: GLenum,
        texture: Option<GlName>,
        level: i32,
        layer: i32,
    },
    CheckFramebufferStatus(GLenum),
    DrawBuffers(Vec<GLenum>),
    ReadBuffer(GLenum),
    BlitFramebuffer {
        src: [i32; 4],
        dst: [i32; 4],
        mask: GLenum,
        filter: GLenum,
    },
    ClearBuffer {
        buffer: GLenum,
        draw_buffer: i32,
        value: ClearBufferValue,
    },
    CompileShader {
        shader: GlName,
        source: String,
    },
    AttachShader {
        program: GlName,
        shader: GlName,
    },
    DetachShader {
        program: GlName,
        shader: GlName,
    },
    LinkProgram(GlName),
    UseProgram(Option<GlName>),
    UniformF32 {
        location: i32,
        components: u32,
        values: Vec<f32>,
    },
    UniformI32 {
        location: i32,
        components: u32,
        values: Vec<i32>,
    },
    UniformU32 {
        location: i32,
        components: u32,
        values: Vec<u32>,
    },
    UniformMatrixF32 {
        location: i32,
        dimension: u32,
        values: Vec<f32>,
    },
    Enable(GLenum),
    Disable(GLenum),
    EnableI {
        capability: GLenum,
        index: u32,
    },
    DisableI {
        capability: GLenum,
        index: u32,
    },
    CullFace(GLenum),
    FrontFace(GLenum),
    PolygonMode {
        face: GLenum,
        mode: GLenum,
    },
    PolygonOffset {
        factor: f32,
        units: f32,
    },
    LineWidth(f32),
    DepthFunc(GLenum),
    DepthMask(bool),
    DepthRange {
        near: f32,
        far: f32,
    },
    StencilFuncSeparate {
        face: GLenum,
        func: GLenum,
        reference: i32,
        mask: u32,
    },
    StencilMaskSeparate {
        face: GLenum,
        mask: u32,
    },
    StencilOpSeparate {
        face: GLenum,
        fail: GLenum,
        depth_fail: GLenum,
        pass: GLenum,
    },
    BlendColor([f32; 4]),
    BlendEquationSeparateI {
        buffer: u32,
        mode_rgb: GLenum,
        mode_alpha: GLenum,
    },
    BlendFuncSeparateI {
        buffer: u32,
        src_rgb: GLenum,
        dst_rgb: GLenum,
        src_alpha: GLenum,
        dst_alpha: GLenum,
    },
    ColorMaskI {
        buffer: u32,
        mask: [bool; 4],
    },
    LogicOp(GLenum),
    MinSampleShading(f32),
    PatchParameter {
        parameter: GLenum,
        value: i32,
    },
    Viewport([i32; 4]),
    Scissor([i32; 4]),
    DrawArrays {
        mode: GLenum,
        first: i32,
        count: i32,
        instance_count: i32,
        base_instance: u32,
    },
    DrawElements {
        mode: GLenum,
        count: i32,
        ty: GLenum,
        offset: u64,
        instance_count: i32,
        base_vertex: i32,
        base_instance: u32,
    },
    DrawArraysIndirect {
        mode: GLenum,
        offset: u64,
    },
    DrawElementsIndirect {
        mode: GLenum,
        ty: GLenum,
        offset: u64,
    },
    DispatchCompute([u32; 3]),
    DispatchComputeIndirect(u64),
    FenceSync(GlSync),
    ClientWaitSync {
        sync: GlSync,
        flags: GLenum,
        timeout_ns: u64,
    },
    DeleteSync(GlSync),
    BeginQuery {
        target: GLenum,
        query: GlName,
    },
    EndQuery(GLenum),
    QueryCounter {
        query: GlName,
        target: GLenum,
    },
    Flush,
    Finish,
    SwapBuffers,
}

impl GlCall {
    /// `true` for the draw calls.
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            GlCall::DrawArrays { .. }
                | GlCall::DrawElements { .. }
                | GlCall::DrawArraysIndirect { .. }
                | GlCall::DrawElementsIndirect { .. }
        )
    }
}

#[derive(Debug)]
struct TraceState {
    calls: Vec<GlCall>,
    next_name: u32,
    unsupported: HashSet<GlFeature>,
    framebuffer_status: GLenum,
    compile_failure_marker: Option<String>,
    link_failure: Option<String>,
    program_inputs: Option<Vec<ProgramResource>>,
    program_outputs: Option<Vec<ProgramResource>>,
    wait_status: GLenum,
    query_result: Option<u64>,
    bound_buffers: HashMap<GLenum, GlName>,
    buffers: HashMap<GlName, Vec<u8>>,
}

impl Default for TraceState {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            next_name: 1,
            unsupported: HashSet::new(),
            framebuffer_status: gl::FRAMEBUFFER_COMPLETE,
            compile_failure_marker: None,
            link_failure: None,
            program_inputs: None,
            program_outputs: None,
            wait_status: gl::ALREADY_SIGNALED,
            query_result: Some(0),
            bound_buffers: HashMap::new(),
            buffers: HashMap::new(),
        }
    }
}

impl TraceState {
    fn next_name(&mut self) -> GlName {
        let name = GlName(self.next_name);
        self.next_name += 1;
        name
    }

    fn create(&mut self, kind: ObjectKind) -> GlName {
        let name = self.next_name();
        self.calls.push(GlCall::Create { kind, name });
        name
    }

    fn bound_storage(&mut self, target: GLenum) -> Option<&mut Vec<u8>> {
        let name = self.bound_buffers.get(&target).copied()?;
        self.buffers.get_mut(&name)
    }
}

/// A recording [`GraphicsContext`] with scriptable driver responses.
///
/// Object names are handed out sequentially starting at 1. Buffer contents
/// are kept in memory so uploads, copies and read-backs round-trip.
#[derive(Debug, Clone, Default)]
pub struct TraceContext {
    state: Rc<RefCell<TraceState>>,
}

impl TraceContext {
    /// A context supporting every optional feature.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports `feature` as unavailable.
    pub fn without_feature(self, feature: GlFeature) -> Self {
        self.state.borrow_mut().unsupported.insert(feature);
        self
    }

    /// A copy of every call recorded so far.
    pub fn calls(&self) -> Vec<GlCall> {
        self.state.borrow().calls.clone()
    }

    /// Returns the recorded calls and starts a new trace.
    pub fn take_calls(&self) -> Vec<GlCall> {
        std::mem::take(&mut self.state.borrow_mut().calls)
    }

    /// Discards the recorded calls.
    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Counts the recorded calls matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&GlCall) -> bool) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|call| predicate(call))
            .count()
    }

    /// The status returned by `glCheckFramebufferStatus`.
    pub fn set_framebuffer_status(&self, status: GLenum) {
        self.state.borrow_mut().framebuffer_status = status;
    }

    /// Fails the compilation of every shader whose source contains `marker`.
    pub fn fail_compile_on(&self, marker: &str) {
        self.state.borrow_mut().compile_failure_marker = Some(marker.to_string());
    }

    /// Fails every link with `log`.
    pub fn fail_link(&self, log: &str) {
        self.state.borrow_mut().link_failure = Some(log.to_string());
    }

    /// The interface reported for every linked program.
    ///
    /// Until this is called, programs cannot be reflected.
    pub fn set_program_interface(&self, inputs: Vec<ProgramResource>, outputs: Vec<ProgramResource>) {
        let mut state = self.state.borrow_mut();
        state.program_inputs = Some(inputs);
        state.program_outputs = Some(outputs);
    }

    /// The status returned by `glClientWaitSync`.
    pub fn set_wait_status(&self, status: GLenum) {
        self.state.borrow_mut().wait_status = status;
    }

    /// The value returned for every query, `None` while results are pending.
    pub fn set_query_result(&self, result: Option<u64>) {
        self.state.borrow_mut().query_result = result;
    }

    /// The contents of a buffer object.
    pub fn buffer_contents(&self, buffer: GlName) -> Option<Vec<u8>> {
        self.state.borrow().buffers.get(&buffer).cloned()
    }

    fn record(&self, call: GlCall) {
        log::trace!("{call:?}");
        self.state.borrow_mut().calls.push(call);
    }
}

impl GraphicsContext for TraceContext {
    fn supports(&self, feature: GlFeature) -> bool {
        !self.state.borrow().unsupported.contains(&feature)
    }

    fn create_buffer(&mut self) -> Result<GlName, ContextError> {
        let mut state = self.state.borrow_mut();
        let name = state.create(ObjectKind::Buffer);
        state.buffers.insert(name, Vec::new());
        Ok(name)
    }

    fn delete_buffer(&mut self, buffer: GlName) {
        let mut state = self.state.borrow_mut();
        state.buffers.remove(&buffer);
        state.bound_buffers.retain(|_, bound| *bound != buffer);
        state.calls.push(GlCall::Delete {
            kind: ObjectKind::Buffer,
            name: buffer,
        });
    }

    fn bind_buffer(&mut self, target: GLenum, buffer: Option<GlName>) {
        {
            let mut state = self.state.borrow_mut();
            match buffer {
                Some(name) => state.bound_buffers.insert(target, name),
                None => state.bound_buffers.remove(&target),
            };
        }
        self.record(GlCall::BindBuffer { target, buffer });
    }

    fn bind_buffer_range(&mut self, target: GLenum, index: u32, buffer: GlName, offset: u64, size: u64) {
        self.record(GlCall::BindBufferRange {
            target,
            index,
            buffer,
            offset,
            size,
        });
    }

    fn buffer_data(&mut self, target: GLenum, size: u64, usage: GLenum) {
        if let Some(storage) = self.state.borrow_mut().bound_storage(target) {
            *storage = vec![0; size as usize];
        }
        self.record(GlCall::BufferData {
            target,
            size,
            usage,
        });
    }

    fn buffer_sub_data(&mut self, target: GLenum, offset: u64, data: &[u8]) {
        if let Some(storage) = self.state.borrow_mut().bound_storage(target) {
            let start = offset as usize;
            if let Some(dst) = storage.get_mut(start..start + data.len()) {
                dst.copy_from_slice(data);
            }
        }
        self.record(GlCall::BufferSubData {
            target,
            offset,
            data: data.to_vec(),
        });
    }

    fn get_buffer_sub_data(&mut self, target: GLenum, offset: u64, data: &mut [u8]) {
        if let Some(storage) = self.state.borrow_mut().bound_storage(target) {
            let start = offset as usize;
            if let Some(src) = storage.get(start..start + data.len()) {
                data.copy_from_slice(src);
            }
        }
        self.record(GlCall::GetBufferSubData {
            target,
            offset,
            size: data.len(),
        });
    }

    fn copy_buffer_sub_data(
        &mut self,
        read_target: GLenum,
        write_target: GLenum,
        read_offset: u64,
        write_offset: u64,
        size: u64,
    ) {
        {
            let mut state = self.state.borrow_mut();
            let (read, write) = (read_offset as usize, write_offset as usize);
            let bytes = state
                .bound_storage(read_target)
                .and_then(|src| src.get(read..read + size as usize).map(<[u8]>::to_vec));
            if let (Some(bytes), Some(dst)) = (bytes, state.bound_storage(write_target)) {
                if let Some(dst) = dst.get_mut(write..write + bytes.len()) {
                    dst.copy_from_slice(&bytes);
                }
            }
        }
        self.record(GlCall::CopyBufferSubData {
            read_target,
            write_target,
            read_offset,
            write_offset,
            size,
        });
    }

    fn create_vertex_array(&mut self) -> Result<GlName, ContextError> {
        Ok(self.state.borrow_mut().create(ObjectKind::VertexArray))
    }

    fn delete_vertex_array(&mut self, vao: GlName) {
        self.record(GlCall::Delete {
            kind: ObjectKind::VertexArray,
            name: vao,
        });
    }

    fn bind_vertex_array(&mut self, vao: Option<GlName>) {
        self.record(GlCall::BindVertexArray(vao));
    }

    fn enable_vertex_attrib_array(&mut self, location: u32) {
        self.record(GlCall::EnableVertexAttribArray(location));
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
        self.record(GlCall::VertexAttribPointer {
            location,
            size,
            ty,
            normalized,
            stride,
            offset,
        });
    }

    fn vertex_attrib_i_pointer(&mut self, location: u32, size: i32, ty: GLenum, stride: i32, offset: u64) {
        self.record(GlCall::VertexAttribIPointer {
            location,
            size,
            ty,
            stride,
            offset,
        });
    }

    fn vertex_attrib_divisor(&mut self, location: u32, divisor: u32) {
        self.record(GlCall::VertexAttribDivisor { location, divisor });
    }

    fn create_texture(&mut self) -> Result<GlName, ContextError> {
        Ok(self.state.borrow_mut().create(ObjectKind::Texture))
    }

    fn delete_texture(&mut self, texture: GlName) {
        self.record(GlCall::Delete {
            kind: ObjectKind::Texture,
            name: texture,
        });
    }

    fn active_texture(&mut self, unit: u32) {
        self.record(GlCall::ActiveTexture(unit));
    }

    fn bind_texture(&mut self, target: GLenum, texture: Option<GlName>) {
        self.record(GlCall::BindTexture { target, texture });
    }

    fn tex_storage_1d(&mut self, target: GLenum, levels: i32, internal_format: GLenum, width: i32) {
        self.record(GlCall::TexStorage {
            target,
            levels,
            internal_format,
            size: [width, 1, 1],
            samples: 1,
        });
    }

    fn tex_storage_2d(&mut self, target: GLenum, levels: i32, internal_format: GLenum, width: i32, height: i32) {
        self.record(GlCall::TexStorage {
            target,
            levels,
            internal_format,
            size: [width, height, 1],
            samples: 1,
        });
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
        self.record(GlCall::TexStorage {
            target,
            levels,
            internal_format,
            size: [width, height, depth],
            samples: 1,
        });
    }

    fn tex_storage_2d_multisample(
        &mut self,
        target: GLenum,
        samples: i32,
        internal_format: GLenum,
        width: i32,
        height: i32,
    ) {
        self.record(GlCall::TexStorage {
            target,
            levels: 1,
            internal_format,
            size: [width, height, 1],
            samples,
        });
    }

    fn tex_parameter_i32(&mut self, target: GLenum, parameter: GLenum, value: i32) {
        self.record(GlCall::TexParameter {
            target,
            parameter,
            value,
        });
    }

    fn pixel_store_i32(&mut self, parameter: GLenum, value: i32) {
        self.record(GlCall::PixelStore { parameter, value });
    }

    fn tex_sub_image_1d(
        &mut self,
        target: GLenum,
        level: i32,
        x: i32,
        width: i32,
        format: GLenum,
        ty: GLenum,
        offset: u64,
    ) {
        self.record(GlCall::TexSubImage {
            target,
            level,
            origin: [x, 0, 0],
            size: [width, 1, 1],
            format,
            ty,
            offset,
        });
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
        self.record(GlCall::TexSubImage {
            target,
            level,
            origin: [x, y, 0],
            size: [width, height, 1],
            format,
            ty,
            offset,
        });
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
        self.record(GlCall::TexSubImage {
            target,
            level,
            origin,
            size,
            format,
            ty,
            offset,
        });
    }

    fn get_tex_image(&mut self, target: GLenum, level: i32, format: GLenum, ty: GLenum, offset: u64) {
        self.record(GlCall::GetTexImage {
            target,
            level,
            format,
            ty,
            offset,
        });
    }

    fn generate_mipmap(&mut self, target: GLenum) {
        self.record(GlCall::GenerateMipmap(target));
    }

    fn clear_tex_image(&mut self, texture: GlName, level: i32, format: GLenum, ty: GLenum, data: &[u8]) {
        self.record(GlCall::ClearTexImage {
            texture,
            level,
            format,
            ty,
            data: data.to_vec(),
        });
    }

    fn copy_image_sub_data(&mut self, src: GlImageRegion, dst: GlImageRegion, size: [i32; 3]) {
        self.record(GlCall::CopyImageSubData { src, dst, size });
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
        self.record(GlCall::BindImageTexture {
            unit,
            texture,
            level,
            layered,
            layer,
            access,
            format,
        });
    }

    fn create_sampler(&mut self) -> Result<GlName, ContextError> {
        Ok(self.state.borrow_mut().create(ObjectKind::Sampler))
    }

    fn delete_sampler(&mut self, sampler: GlName) {
        self.record(GlCall::Delete {
            kind: ObjectKind::Sampler,
            name: sampler,
        });
    }

    fn bind_sampler(&mut self, unit: u32, sampler: Option<GlName>) {
        self.record(GlCall::BindSampler { unit, sampler });
    }

    fn sampler_parameter_i32(&mut self, sampler: GlName, parameter: GLenum, value: i32) {
        self.record(GlCall::SamplerParameterI {
            sampler,
            parameter,
            value,
        });
    }

    fn sampler_parameter_f32(&mut self, sampler: GlName, parameter: GLenum, value: f32) {
        self.record(GlCall::SamplerParameterF {
            sampler,
            parameter,
            value,
        });
    }

    fn sampler_parameter_f32_slice(&mut self, sampler: GlName, parameter: GLenum, values: &[f32]) {
        self.record(GlCall::SamplerParameterFv {
            sampler,
            parameter,
            values: values.to_vec(),
        });
    }

    fn create_framebuffer(&mut self) -> Result<GlName, ContextError> {
        Ok(self.state.borrow_mut().create(ObjectKind::Framebuffer))
    }

    fn delete_framebuffer(&mut self, framebuffer: GlName) {
        self.record(GlCall::Delete {
            kind: ObjectKind::Framebuffer,
            name: framebuffer,
        });
    }

    fn bind_framebuffer(&mut self, target: GLenum, framebuffer: Option<GlName>) {
        self.record(GlCall::BindFramebuffer {
            target,
            framebuffer,
        });
    }

    fn framebuffer_texture_2d(
        &mut self,
        target: GLenum,
        attachment: GLenum,
        texture_target: GLenum,
        texture: Option<GlName>,
        level: i32,
    ) {
        self.record(GlCall::FramebufferTexture2D {
            target,
            attachment,
            texture_target,
            texture,
            level,
        });
    }

    fn framebuffer_texture_layer(
        &mut self,
        target: GLenum,
        attachment: GLenum,
        texture: Option<GlName>,
        level: i32,
        layer: i32,
    ) {
        self.record(GlCall::FramebufferTextureLayer {
            target,
            attachment,
            texture,
            level,
            layer,
        });
    }

    fn check_framebuffer_status(&mut self, target: GLenum) -> GLenum {
        self.record(GlCall::CheckFramebufferStatus(target));
        self.state.borrow().framebuffer_status
    }

    fn draw_buffers(&mut self, buffers: &[GLenum]) {
        self.record(GlCall::DrawBuffers(buffers.to_vec()));
    }

    fn read_buffer(&mut self, buffer: GLenum) {
        self.record(GlCall::ReadBuffer(buffer));
    }

    fn blit_framebuffer(&mut self, src: [i32; 4], dst: [i32; 4], mask: GLenum, filter: GLenum) {
        self.record(GlCall::BlitFramebuffer {
            src,
            dst,
            mask,
            filter,
        });
    }

    fn clear_buffer(&mut self, buffer: GLenum, draw_buffer: i32, value: ClearBufferValue) {
        self.record(GlCall::ClearBuffer {
            buffer,
            draw_buffer,
            value,
        });
    }

    fn create_shader(&mut self, _stage: GLenum) -> Result<GlName, ContextError> {
        Ok(self.state.borrow_mut().create(ObjectKind::Shader))
    }

    fn delete_shader(&mut self, shader: GlName) {
        self.record(GlCall::Delete {
            kind: ObjectKind::Shader,
            name: shader,
        });
    }

    fn compile_shader(&mut self, shader: GlName, source: &str) -> Result<(), String> {
        self.record(GlCall::CompileShader {
            shader,
            source: source.to_string(),
        });
        match &self.state.borrow().compile_failure_marker {
            Some(marker) if source.contains(marker.as_str()) => {
                Err(format!("0:1(1): error: unexpected '{marker}'"))
            }
            _ => Ok(()),
        }
    }

    fn create_program(&mut self) -> Result<GlName, ContextError> {
        Ok(self.state.borrow_mut().create(ObjectKind::Program))
    }

    fn delete_program(&mut self, program: GlName) {
        self.record(GlCall::Delete {
            kind: ObjectKind::Program,
            name: program,
        });
    }

    fn attach_shader(&mut self, program: GlName, shader: GlName) {
        self.record(GlCall::AttachShader { program, shader });
    }

    fn detach_shader(&mut self, program: GlName, shader: GlName) {
        self.record(GlCall::DetachShader { program, shader });
    }

    fn link_program(&mut self, program: GlName) -> Result<(), String> {
        self.record(GlCall::LinkProgram(program));
        match &self.state.borrow().link_failure {
            Some(log) => Err(log.clone()),
            None => Ok(()),
        }
    }

    fn use_program(&mut self, program: Option<GlName>) {
        self.record(GlCall::UseProgram(program));
    }

    fn program_inputs(&mut self, _program: GlName) -> Option<Vec<ProgramResource>> {
        self.state.borrow().program_inputs.clone()
    }

    fn program_outputs(&mut self, _program: GlName) -> Option<Vec<ProgramResource>> {
        self.state.borrow().program_outputs.clone()
    }

    fn uniform_f32(&mut self, location: i32, components: u32, values: &[f32]) {
        self.record(GlCall::UniformF32 {
            location,
            components,
            values: values.to_vec(),
        });
    }

    fn uniform_i32(&mut self, location: i32, components: u32, values: &[i32]) {
        self.record(GlCall::UniformI32 {
            location,
            components,
            values: values.to_vec(),
        });
    }

    fn uniform_u32(&mut self, location: i32, components: u32, values: &[u32]) {
        self.record(GlCall::UniformU32 {
            location,
            components,
            values: values.to_vec(),
        });
    }

    fn uniform_matrix_f32(&mut self, location: i32, dimension: u32, values: &[f32]) {
        self.record(GlCall::UniformMatrixF32 {
            location,
            dimension,
            values: values.to_vec(),
        });
    }

    fn enable(&mut self, capability: GLenum) {
        self.record(GlCall::Enable(capability));
    }

    fn disable(&mut self, capability: GLenum) {
        self.record(GlCall::Disable(capability));
    }

    fn enable_i(&mut self, capability: GLenum, index: u32) {
        self.record(GlCall::EnableI { capability, index });
    }

    fn disable_i(&mut self, capability: GLenum, index: u32) {
        self.record(GlCall::DisableI { capability, index });
    }

    fn cull_face(&mut self, mode: GLenum) {
        self.record(GlCall::CullFace(mode));
    }

    fn front_face(&mut self, mode: GLenum) {
        self.record(GlCall::FrontFace(mode));
    }

    fn polygon_mode(&mut self, face: GLenum, mode: GLenum) {
        self.record(GlCall::PolygonMode { face, mode });
    }

    fn polygon_offset(&mut self, factor: f32, units: f32) {
        self.record(GlCall::PolygonOffset { factor, units });
    }

    fn line_width(&mut self, width: f32) {
        self.record(GlCall::LineWidth(width));
    }

    fn depth_func(&mut self, func: GLenum) {
        self.record(GlCall::DepthFunc(func));
    }

    fn depth_mask(&mut self, write: bool) {
        self.record(GlCall::DepthMask(write));
    }

    fn depth_range(&mut self, near: f32, far: f32) {
        self.record(GlCall::DepthRange { near, far });
    }

    fn stencil_func_separate(&mut self, face: GLenum, func: GLenum, reference: i32, mask: u32) {
        self.record(GlCall::StencilFuncSeparate {
            face,
            func,
            reference,
            mask,
        });
    }

    fn stencil_mask_separate(&mut self, face: GLenum, mask: u32) {
        self.record(GlCall::StencilMaskSeparate { face, mask });
    }

    fn stencil_op_separate(&mut self, face: GLenum, fail: GLenum, depth_fail: GLenum, pass: GLenum) {
        self.record(GlCall::StencilOpSeparate {
            face,
            fail,
            depth_fail,
            pass,
        });
    }

    fn blend_color(&mut self, color: [f32; 4]) {
        self.record(GlCall::BlendColor(color));
    }

    fn blend_equation_separate_i(&mut self, buffer: u32, mode_rgb: GLenum, mode_alpha: GLenum) {
        self.record(GlCall::BlendEquationSeparateI {
            buffer,
            mode_rgb,
            mode_alpha,
        });
    }

    fn blend_func_separate_i(
        &mut self,
        buffer: u32,
        src_rgb: GLenum,
        dst_rgb: GLenum,
        src_alpha: GLenum,
        dst_alpha: GLenum,
    ) {
        self.record(GlCall::BlendFuncSeparateI {
            buffer,
            src_rgb,
            dst_rgb,
            src_alpha,
            dst_alpha,
        });
    }

    fn color_mask_i(&mut self, buffer: u32, mask: [bool; 4]) {
        self.record(GlCall::ColorMaskI { buffer, mask });
    }

    fn logic_op(&mut self, op: GLenum) {
        self.record(GlCall::LogicOp(op));
    }

    fn min_sample_shading(&mut self, value: f32) {
        self.record(GlCall::MinSampleShading(value));
    }

    fn patch_parameter_i32(&mut self, parameter: GLenum, value: i32) {
        self.record(GlCall::PatchParameter { parameter, value });
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.record(GlCall::Viewport([x, y, width, height]));
    }

    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.record(GlCall::Scissor([x, y, width, height]));
    }

    fn draw_arrays_instanced_base_instance(
        &mut self,
        mode: GLenum,
        first: i32,
        count: i32,
        instance_count: i32,
        base_instance: u32,
    ) {
        self.record(GlCall::DrawArrays {
            mode,
            first,
            count,
            instance_count,
            base_instance,
        });
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
        self.record(GlCall::DrawElements {
            mode,
            count,
            ty,
            offset,
            instance_count,
            base_vertex,
            base_instance,
        });
    }

    fn draw_arrays_indirect(&mut self, mode: GLenum, offset: u64) {
        self.record(GlCall::DrawArraysIndirect { mode, offset });
    }

    fn draw_elements_indirect(&mut self, mode: GLenum, ty: GLenum, offset: u64) {
        self.record(GlCall::DrawElementsIndirect { mode, ty, offset });
    }

    fn dispatch_compute(&mut self, x: u32, y: u32, z: u32) {
        self.record(GlCall::DispatchCompute([x, y, z]));
    }

    fn dispatch_compute_indirect(&mut self, offset: u64) {
        self.record(GlCall::DispatchComputeIndirect(offset));
    }

    fn fence_sync(&mut self) -> Result<GlSync, ContextError> {
        let sync = {
            let mut state = self.state.borrow_mut();
            let name = state.next_name();
            GlSync(u64::from(name.0))
        };
        self.record(GlCall::FenceSync(sync));
        Ok(sync)
    }

    fn client_wait_sync(&mut self, sync: GlSync, flags: GLenum, timeout_ns: u64) -> GLenum {
        self.record(GlCall::ClientWaitSync {
            sync,
            flags,
            timeout_ns,
        });
        self.state.borrow().wait_status
    }

    fn delete_sync(&mut self, sync: GlSync) {
        self.record(GlCall::DeleteSync(sync));
    }

    fn create_query(&mut self) -> Result<GlName, ContextError> {
        Ok(self.state.borrow_mut().create(ObjectKind::Query))
    }

    fn delete_query(&mut self, query: GlName) {
        self.record(GlCall::Delete {
            kind: ObjectKind::Query,
            name: query,
        });
    }

    fn begin_query(&mut self, target: GLenum, query: GlName) {
        self.record(GlCall::BeginQuery { target, query });
    }

    fn end_query(&mut self, target: GLenum) {
        self.record(GlCall::EndQuery(target));
    }

    fn query_counter(&mut self, query: GlName, target: GLenum) {
        self.record(GlCall::QueryCounter { query, target });
    }

    fn query_result(&mut self, _query: GlName) -> Option<u64> {
        self.state.borrow().query_result
    }

    fn flush(&mut self) {
        self.record(GlCall::Flush);
    }

    fn finish(&mut self) {
        self.record(GlCall::Finish);
    }

    fn swap_buffers(&mut self) {
        self.record(GlCall::SwapBuffers);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_one_trace() {
        let observer = TraceContext::new();
        let mut context = observer.clone();
        context.flush();
        assert_eq!(observer.calls(), vec![GlCall::Flush]);
    }

    #[test]
    fn names_are_sequential() {
        let mut context = TraceContext::new();
        assert_eq!(context.create_buffer(), Ok(GlName(1)));
        assert_eq!(context.create_texture(), Ok(GlName(2)));
    }

    #[test]
    fn buffer_contents_round_trip() {
        let mut context = TraceContext::new();
        let src = context.create_buffer().expect("buffer");
        let dst = context.create_buffer().expect("buffer");
        context.bind_buffer(gl::COPY_READ_BUFFER, Some(src));
        context.buffer_data(gl::COPY_READ_BUFFER, 8, gl::STATIC_DRAW);
        context.buffer_sub_data(gl::COPY_READ_BUFFER, 2, &[1, 2, 3]);
        context.bind_buffer(gl::COPY_WRITE_BUFFER, Some(dst));
        context.buffer_data(gl::COPY_WRITE_BUFFER, 8, gl::STATIC_DRAW);
        context.copy_buffer_sub_data(gl::COPY_READ_BUFFER, gl::COPY_WRITE_BUFFER, 2, 4, 3);

        let mut read_back = [0u8; 4];
        context.get_buffer_sub_data(gl::COPY_WRITE_BUFFER, 4, &mut read_back);
        assert_eq!(read_back, [1, 2, 3, 0]);
        assert_eq!(context.buffer_contents(src), Some(vec![0, 0, 1, 2, 3, 0, 0, 0]));
    }

    #[test]
    fn scripted_failures() {
        let mut context = TraceContext::new().without_feature(GlFeature::ClearTexImage);
        assert!(!context.supports(GlFeature::ClearTexImage));
        assert!(context.supports(GlFeature::CopyImageSubData));

        context.fail_compile_on("#error");
        let shader = context.create_shader(gl::VERTEX_SHADER).expect("shader");
        assert!(context.compile_shader(shader, "void main() {}").is_ok());
        assert!(context.compile_shader(shader, "#error\n").is_err());

        context.set_framebuffer_status(gl::FRAMEBUFFER_INCOMPLETE_ATTACHMENT);
        assert_eq!(
            context.check_framebuffer_status(gl::FRAMEBUFFER),
            gl::FRAMEBUFFER_INCOMPLETE_ATTACHMENT
        );
    }

    #[test]
    fn programs_are_not_reflected_by_default() {
        let mut context = TraceContext::new();
        let program = context.create_program().expect("program");
        assert_eq!(context.program_inputs(program), None);
        context.set_program_interface(Vec::new(), Vec::new());
        assert_eq!(context.program_inputs(program), Some(Vec::new()));
    }
}
