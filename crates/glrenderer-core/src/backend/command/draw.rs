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


//! Draw and dispatch commands.

use crate::backend::resources::BufferObject;
use crate::gl::enums::{self as gl, GLenum};
use crate::gl::GraphicsContext;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Draw {
    pub mode: GLenum,
    pub vertex_count: u32,
    pub instance_count: u32,
    pub first_vertex: u32,
    pub first_instance: u32,
}

impl Draw {
    pub(crate) fn apply(&self, ctx: &mut dyn GraphicsContext) {
        debug_assert!(self.instance_count >= 1, "Draw: instance count must be at least 1");
        ctx.draw_arrays_instanced_base_instance(
            self.mode,
            self.first_vertex as i32,
            self.vertex_count as i32,
            self.instance_count as i32,
            self.first_instance,
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DrawIndexed {
    pub mode: GLenum,
    pub index_type: GLenum,
    pub index_size: u64,
    /// Byte offset of the bound index buffer.
    pub index_offset: u64,
    pub index_count: u32,
    pub instance_count: u32,
    pub first_index: u32,
    pub vertex_offset: i32,
    pub first_instance: u32,
}

impl DrawIndexed {
    pub(crate) fn apply(&self, ctx: &mut dyn GraphicsContext) {
        debug_assert!(self.instance_count >= 1, "DrawIndexed: instance count must be at least 1");
        ctx.draw_elements_instanced_base_vertex_base_instance(
            self.mode,
            self.index_count as i32,
            self.index_type,
            self.index_offset + u64::from(self.first_index) * self.index_size,
            self.instance_count as i32,
            self.vertex_offset,
            self.first_instance,
        );
    }
}

/// `draw_indirect` and `draw_indexed_indirect`; `index_type` is set for the latter.
#[derive(Debug, Clone)]
pub(crate) struct DrawIndirect {
    pub mode: GLenum,
    pub buffer: Arc<BufferObject>,
    pub offset: u64,
    pub draw_count: u32,
    pub stride: u32,
    pub index_type: Option<GLenum>,
}

impl DrawIndirect {
    pub(crate) fn apply(&self, ctx: &mut dyn GraphicsContext) {
        let Some(name) = self.buffer.name() else {
            log::error!("DrawIndirect: buffer '{}' has no memory bound", self.buffer.label());
            return;
        };
        ctx.bind_buffer(gl::DRAW_INDIRECT_BUFFER, Some(name));
        for draw in 0..u64::from(self.draw_count) {
            let offset = self.offset + draw * u64::from(self.stride);
            match self.index_type {
                Some(ty) => ctx.draw_elements_indirect(self.mode, ty, offset),
                None => ctx.draw_arrays_indirect(self.mode, offset),
            }
        }
        ctx.bind_buffer(gl::DRAW_INDIRECT_BUFFER, None);
    }
}

pub(super) fn dispatch_indirect(ctx: &mut dyn GraphicsContext, buffer: &BufferObject, offset: u64) {
    let Some(name) = buffer.name() else {
        log::error!("DispatchIndirect: buffer '{}' has no memory bound", buffer.label());
        return;
    };
    ctx.bind_buffer(gl::DISPATCH_INDIRECT_BUFFER, Some(name));
    ctx.dispatch_compute_indirect(offset);
    ctx.bind_buffer(gl::DISPATCH_INDIRECT_BUFFER, None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::{GlCall, TraceContext};

    #[test]
    fn indexed_draws_offset_into_the_index_buffer() {
        let mut context = TraceContext::new();
        let draw = DrawIndexed {
            mode: gl::TRIANGLES,
            index_type: gl::UNSIGNED_SHORT,
            index_size: 2,
            index_offset: 64,
            index_count: 6,
            instance_count: 2,
            first_index: 3,
            vertex_offset: -1,
            first_instance: 4,
        };

        draw.apply(&mut context);

        assert_eq!(
            context.calls(),
            vec![GlCall::DrawElements {
                mode: gl::TRIANGLES,
                count: 6,
                ty: gl::UNSIGNED_SHORT,
                offset: 70,
                instance_count: 2,
                base_vertex: -1,
                base_instance: 4,
            }]
        );
    }

    #[test]
    fn draws_keep_their_parameter_order() {
        let mut context = TraceContext::new();

        Draw {
            mode: gl::POINTS,
            vertex_count: 3,
            instance_count: 1,
            first_vertex: 5,
            first_instance: 2,
        }
        .apply(&mut context);

        assert_eq!(
            context.calls(),
            vec![GlCall::DrawArrays {
                mode: gl::POINTS,
                first: 5,
                count: 3,
                instance_count: 1,
                base_instance: 2,
            }]
        );
    }
}
