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


//! Dynamic state and push constants.

use crate::api::{ConstantFormat, PushConstant, PushConstantsBuffer, Rect2D, Viewport};
use crate::gl::enums::GLenum;
use crate::gl::GraphicsContext;

/// Stencil reference of one face, with the compare function and mask of the bound pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct StencilReference {
    pub face: GLenum,
    pub func: GLenum,
    pub reference: i32,
    pub mask: u32,
}

impl StencilReference {
    pub(crate) fn apply(&self, ctx: &mut dyn GraphicsContext) {
        ctx.stencil_func_separate(self.face, self.func, self.reference, self.mask);
    }
}

pub(super) fn set_viewport(ctx: &mut dyn GraphicsContext, viewport: &Viewport) {
    ctx.viewport(
        viewport.x as i32,
        viewport.y as i32,
        viewport.width as i32,
        viewport.height as i32,
    );
    ctx.depth_range(viewport.min_depth, viewport.max_depth);
}

pub(super) fn set_scissor(ctx: &mut dyn GraphicsContext, scissor: &Rect2D) {
    ctx.scissor(
        scissor.offset.x,
        scissor.offset.y,
        scissor.extent.width as i32,
        scissor.extent.height as i32,
    );
}

/// Uploads every constant of `buffer` as a uniform at its declared location.
pub(crate) fn push_constants(ctx: &mut dyn GraphicsContext, buffer: &PushConstantsBuffer) {
    for constant in &buffer.constants {
        let start = constant.offset as usize;
        let end = start + (constant.format.size() * constant.array_size.max(1)) as usize;
        match buffer.data.get(start..end) {
            Some(bytes) => upload_constant(ctx, constant, bytes),
            None => log::warn!(
                "PushConstants: constant at location {} reads bytes {start}..{end} of a {} byte buffer, skipped",
                constant.location,
                buffer.data.len()
            ),
        }
    }
}

fn upload_constant(ctx: &mut dyn GraphicsContext, constant: &PushConstant, bytes: &[u8]) {
    let location = constant.location as i32;
    match constant.format {
        ConstantFormat::Float => ctx.uniform_f32(location, 1, &floats(bytes)),
        ConstantFormat::Vec2f => ctx.uniform_f32(location, 2, &floats(bytes)),
        ConstantFormat::Vec3f => ctx.uniform_f32(location, 3, &floats(bytes)),
        ConstantFormat::Vec4f | ConstantFormat::Color => ctx.uniform_f32(location, 4, &floats(bytes)),
        ConstantFormat::Int => ctx.uniform_i32(location, 1, &ints(bytes)),
        ConstantFormat::Vec2i => ctx.uniform_i32(location, 2, &ints(bytes)),
        ConstantFormat::Vec3i => ctx.uniform_i32(location, 3, &ints(bytes)),
        ConstantFormat::Vec4i => ctx.uniform_i32(location, 4, &ints(bytes)),
        ConstantFormat::UInt => ctx.uniform_u32(location, 1, &uints(bytes)),
        ConstantFormat::Vec2ui => ctx.uniform_u32(location, 2, &uints(bytes)),
        ConstantFormat::Vec3ui => ctx.uniform_u32(location, 3, &uints(bytes)),
        ConstantFormat::Vec4ui => ctx.uniform_u32(location, 4, &uints(bytes)),
        ConstantFormat::Mat2f => ctx.uniform_matrix_f32(location, 2, &floats(bytes)),
        ConstantFormat::Mat3f => ctx.uniform_matrix_f32(location, 3, &floats(bytes)),
        ConstantFormat::Mat4f => ctx.uniform_matrix_f32(location, 4, &floats(bytes)),
    }
}

// The constant bytes carry no alignment guarantee.
fn floats(bytes: &[u8]) -> Vec<f32> {
    bytemuck::pod_collect_to_vec(bytes)
}

fn ints(bytes: &[u8]) -> Vec<i32> {
    bytemuck::pod_collect_to_vec(bytes)
}

fn uints(bytes: &[u8]) -> Vec<u32> {
    bytemuck::pod_collect_to_vec(bytes)
}
