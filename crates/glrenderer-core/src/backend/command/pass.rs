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


//! Render pass and subpass boundaries.
//!
//! OpenGL has no render pass object: beginning a pass binds the framebuffer
//! and performs the load-op clears, subpasses only change the draw buffers,
//! and multisample resolves are blits between two scratch framebuffers.

use crate::api::{
    AttachmentDescription, ClearAttachment, ClearColorValue, ClearRect, ClearValue, Format,
    ImageAspectFlags, LoadOp, Rect2D,
};
use crate::backend::framebuffer::{attach_texture, detach, FrameBufferObject};
use crate::backend::render_pass::RenderPassObject;
use crate::gl::enums::{self as gl, GLenum};
use crate::gl::{ClearBufferValue, GlName, GraphicsContext};
use std::sync::Arc;

/// The device's read and draw framebuffers used by resolves and blits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScratchFramebuffers {
    pub read: GlName,
    pub draw: GlName,
}

/// Write masks of the pipeline bound when a clear was recorded.
///
/// Clears open every mask they touch; these are issued again afterwards so
/// later draws keep the pipeline's masks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WriteMasks {
    pub color: Vec<[bool; 4]>,
    /// `None` when the pipeline has no depth-stencil state.
    pub depth: Option<bool>,
    /// Front and back stencil write masks.
    pub stencil: Option<[u32; 2]>,
}

impl WriteMasks {
    pub(crate) fn restore(&self, ctx: &mut dyn GraphicsContext) {
        for (index, mask) in self.color.iter().enumerate() {
            ctx.color_mask_i(index as u32, *mask);
        }
        if let Some(depth) = self.depth {
            ctx.depth_mask(depth);
        }
        if let Some([front, back]) = self.stencil {
            ctx.stencil_mask_separate(gl::FRONT, front);
            ctx.stencil_mask_separate(gl::BACK, back);
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct BeginRenderPass {
    pub render_pass: Arc<RenderPassObject>,
    pub framebuffer: Arc<FrameBufferObject>,
    pub render_area: Rect2D,
    pub clear_values: Vec<ClearValue>,
    /// Masks of the pipeline bound at record time, if any.
    pub restore: Option<WriteMasks>,
}

impl BeginRenderPass {
    pub(crate) fn apply(&self, ctx: &mut dyn GraphicsContext) {
        let framebuffer = &self.framebuffer;
        ctx.bind_framebuffer(gl::FRAMEBUFFER, framebuffer.name);
        if framebuffer.name.is_some() {
            ctx.draw_buffers(&framebuffer.color_points());
        }
        ctx.enable(gl::SCISSOR_TEST);
        scissor(ctx, &self.render_area);

        let descriptions = self.render_pass.attachments();
        let mut cleared = false;
        for (index, (attachment, description)) in framebuffer.attachments.iter().zip(descriptions).enumerate() {
            if attachment.point.is_none() || !needs_clear(description) {
                continue;
            }
            let Some(value) = self.clear_values.get(index) else {
                log::warn!("BeginRenderPass: no clear value for attachment {index}, clear skipped");
                continue;
            };
            let draw_buffer = match framebuffer.name {
                Some(_) => attachment.draw_buffer().unwrap_or(0),
                None => 0,
            };
            clear_attachment(ctx, description, draw_buffer, value, index);
            cleared = true;
        }
        if let (true, Some(masks)) = (cleared, &self.restore) {
            masks.restore(ctx);
        }

        ctx.draw_buffers(&subpass_draw_buffers(&self.render_pass, framebuffer, 0));
    }
}

fn needs_clear(description: &AttachmentDescription) -> bool {
    let format = description.format;
    if format.is_depth_or_stencil() {
        (format.has_depth() && description.load_op == LoadOp::Clear)
            || (format.has_stencil() && description.stencil_load_op == LoadOp::Clear)
    } else {
        description.load_op == LoadOp::Clear
    }
}

fn clear_attachment(
    ctx: &mut dyn GraphicsContext,
    description: &AttachmentDescription,
    draw_buffer: i32,
    value: &ClearValue,
    index: usize,
) {
    let format = description.format;
    match value {
        ClearValue::Color(color) if !format.is_depth_or_stencil() => {
            ctx.color_mask_i(draw_buffer as u32, [true; 4]);
            ctx.clear_buffer(gl::COLOR, draw_buffer, color_clear_value(format, color));
        }
        ClearValue::DepthStencil(depth_stencil) if format.is_depth_or_stencil() => {
            let depth = format.has_depth() && description.load_op == LoadOp::Clear;
            let stencil = format.has_stencil() && description.stencil_load_op == LoadOp::Clear;
            clear_depth_stencil(ctx, depth, stencil, depth_stencil.depth, depth_stencil.stencil);
        }
        _ => log::warn!("BeginRenderPass: clear value {value:?} does not fit attachment {index} ({format:?})"),
    }
}

fn clear_depth_stencil(ctx: &mut dyn GraphicsContext, depth: bool, stencil: bool, depth_value: f32, stencil_value: u32) {
    if depth {
        ctx.depth_mask(true);
    }
    if stencil {
        ctx.stencil_mask_separate(gl::FRONT_AND_BACK, u32::MAX);
    }
    match (depth, stencil) {
        (true, true) => ctx.clear_buffer(
            gl::DEPTH_STENCIL,
            0,
            ClearBufferValue::DepthStencil(depth_value, stencil_value as i32),
        ),
        (true, false) => ctx.clear_buffer(gl::DEPTH, 0, ClearBufferValue::Depth(depth_value)),
        (false, true) => ctx.clear_buffer(gl::STENCIL, 0, ClearBufferValue::Stencil(stencil_value as i32)),
        (false, false) => {}
    }
}

/// Converts a colour clear value to the `glClearBuffer` variant matching `format`.
pub(crate) fn color_clear_value(format: Format, value: &ClearColorValue) -> ClearBufferValue {
    let float = match *value {
        ClearColorValue::Float(float) => float,
        ClearColorValue::Int(int) => int.map(|c| c as f32),
        ClearColorValue::Uint(uint) => uint.map(|c| c as f32),
    };
    if format.is_signed_integer() {
        match *value {
            ClearColorValue::Int(int) => ClearBufferValue::Int(int),
            ClearColorValue::Uint(uint) => ClearBufferValue::Int(uint.map(|c| c as i32)),
            ClearColorValue::Float(_) => ClearBufferValue::Int(float.map(|c| c as i32)),
        }
    } else if format.is_unsigned_integer() {
        match *value {
            ClearColorValue::Uint(uint) => ClearBufferValue::Uint(uint),
            ClearColorValue::Int(int) => ClearBufferValue::Uint(int.map(|c| c as u32)),
            ClearColorValue::Float(_) => ClearBufferValue::Uint(float.map(|c| c as u32)),
        }
    } else {
        ClearBufferValue::Float(float)
    }
}

/// The draw buffers a subpass writes, `NONE` for unused colour slots.
fn subpass_draw_buffers(render_pass: &RenderPassObject, framebuffer: &FrameBufferObject, subpass: u32) -> Vec<GLenum> {
    let Some(description) = render_pass.subpass(subpass) else {
        return Vec::new();
    };
    if framebuffer.name.is_none() {
        let writes_color = description.color_attachments.iter().any(|reference| reference.is_used());
        return vec![if writes_color { gl::BACK_LEFT } else { gl::NONE }];
    }
    description
        .color_attachments
        .iter()
        .map(|reference| {
            framebuffer
                .attachments
                .get(reference.attachment as usize)
                .filter(|_| reference.is_used())
                .and_then(|attachment| attachment.point)
                .unwrap_or(gl::NONE)
        })
        .collect()
}

fn scissor(ctx: &mut dyn GraphicsContext, area: &Rect2D) {
    ctx.scissor(area.offset.x, area.offset.y, area.extent.width as i32, area.extent.height as i32);
}

fn corners(area: &Rect2D) -> [i32; 4] {
    [
        area.offset.x,
        area.offset.y,
        area.offset.x + area.extent.width as i32,
        area.offset.y + area.extent.height as i32,
    ]
}

/// A subpass boundary: draw buffer selection on entry, resolves on exit.
#[derive(Debug, Clone)]
pub(crate) struct SubpassTransition {
    pub render_pass: Arc<RenderPassObject>,
    pub framebuffer: Arc<FrameBufferObject>,
    pub subpass: u32,
    pub render_area: Rect2D,
    pub scratch: ScratchFramebuffers,
}

impl SubpassTransition {
    pub(crate) fn begin(&self, ctx: &mut dyn GraphicsContext) {
        if self.framebuffer.name.is_some() {
            ctx.draw_buffers(&subpass_draw_buffers(&self.render_pass, &self.framebuffer, self.subpass));
        }
    }

    /// Blits every colour attachment of the subpass into its resolve attachment.
    pub(crate) fn end(&self, ctx: &mut dyn GraphicsContext) {
        let Some(description) = self.render_pass.subpass(self.subpass) else {
            return;
        };
        let pairs: Vec<(usize, usize)> = description
            .color_attachments
            .iter()
            .zip(&description.resolve_attachments)
            .filter(|(color, resolve)| color.is_used() && resolve.is_used())
            .map(|(color, resolve)| (color.attachment as usize, resolve.attachment as usize))
            .collect();
        if pairs.is_empty() {
            return;
        }

        let attachments = &self.framebuffer.attachments;
        let area = corners(&self.render_area);
        ctx.disable(gl::SCISSOR_TEST);
        for (source, destination) in pairs {
            let (Some(source), Some(destination)) = (attachments.get(source), attachments.get(destination)) else {
                continue;
            };
            ctx.bind_framebuffer(gl::READ_FRAMEBUFFER, Some(self.scratch.read));
            let view = &source.view;
            attach_texture(ctx, gl::READ_FRAMEBUFFER, gl::COLOR_ATTACHMENT0, &view.texture, view.base_level(), view.base_layer());
            ctx.read_buffer(gl::COLOR_ATTACHMENT0);

            let into_back_buffer = destination.view.name().is_none();
            if into_back_buffer {
                ctx.bind_framebuffer(gl::DRAW_FRAMEBUFFER, None);
                ctx.draw_buffers(&[gl::BACK_LEFT]);
            } else {
                ctx.bind_framebuffer(gl::DRAW_FRAMEBUFFER, Some(self.scratch.draw));
                let view = &destination.view;
                attach_texture(ctx, gl::DRAW_FRAMEBUFFER, gl::COLOR_ATTACHMENT0, &view.texture, view.base_level(), view.base_layer());
                ctx.draw_buffers(&[gl::COLOR_ATTACHMENT0]);
            }

            ctx.blit_framebuffer(area, area, gl::COLOR_BUFFER_BIT, gl::NEAREST);

            detach(ctx, gl::READ_FRAMEBUFFER, gl::COLOR_ATTACHMENT0);
            if !into_back_buffer {
                detach(ctx, gl::DRAW_FRAMEBUFFER, gl::COLOR_ATTACHMENT0);
            }
        }
        ctx.bind_framebuffer(gl::FRAMEBUFFER, self.framebuffer.name);
        ctx.enable(gl::SCISSOR_TEST);
    }
}

pub(super) fn end_render_pass(ctx: &mut dyn GraphicsContext) {
    ctx.bind_framebuffer(gl::FRAMEBUFFER, None);
    ctx.disable(gl::SCISSOR_TEST);
}

/// `clear_attachments` inside a subpass.
#[derive(Debug, Clone)]
pub(crate) struct ClearAttachments {
    pub render_pass: Arc<RenderPassObject>,
    pub subpass: u32,
    /// Unknown in secondary buffers that inherit no framebuffer.
    pub render_area: Option<Rect2D>,
    pub attachments: Vec<ClearAttachment>,
    pub rects: Vec<ClearRect>,
    /// Masks of the pipeline bound at record time, if any.
    pub restore: Option<WriteMasks>,
}

impl ClearAttachments {
    pub(crate) fn apply(&self, ctx: &mut dyn GraphicsContext) {
        let Some(description) = self.render_pass.subpass(self.subpass) else {
            return;
        };
        for rect in &self.rects {
            if rect.base_array_layer != 0 || rect.layer_count > 1 {
                log::warn!("ClearAttachments: layered clears only touch the bound layer");
            }
            scissor(ctx, &rect.rect);
            for attachment in &self.attachments {
                if attachment.aspect.contains(ImageAspectFlags::COLOR) {
                    let index = attachment.color_attachment;
                    let format = description
                        .color_attachments
                        .get(index as usize)
                        .and_then(|reference| self.render_pass.attachment_format(reference));
                    match (format, &attachment.value) {
                        (Some(format), ClearValue::Color(color)) => {
                            ctx.color_mask_i(index, [true; 4]);
                            ctx.clear_buffer(gl::COLOR, index as i32, color_clear_value(format, color));
                        }
                        _ => log::warn!("ClearAttachments: colour attachment {index} cannot be cleared with {:?}", attachment.value),
                    }
                    continue;
                }
                match &attachment.value {
                    ClearValue::DepthStencil(value) => clear_depth_stencil(
                        ctx,
                        attachment.aspect.contains(ImageAspectFlags::DEPTH),
                        attachment.aspect.contains(ImageAspectFlags::STENCIL),
                        value.depth,
                        value.stencil,
                    ),
                    ClearValue::Color(_) => {
                        log::warn!("ClearAttachments: a colour value cannot clear {:?}", attachment.aspect)
                    }
                }
            }
        }
        if let Some(masks) = &self.restore {
            masks.restore(ctx);
        }
        if let Some(area) = &self.render_area {
            scissor(ctx, area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_formats_take_integer_clears() {
        let value = ClearColorValue::Float([1.0, 2.0, 3.0, 4.0]);

        assert_eq!(
            color_clear_value(Format::Rgba8Unorm, &value),
            ClearBufferValue::Float([1.0, 2.0, 3.0, 4.0])
        );
        assert_eq!(color_clear_value(Format::Rgba32Sint, &value), ClearBufferValue::Int([1, 2, 3, 4]));
        assert_eq!(color_clear_value(Format::Rgba32Uint, &value), ClearBufferValue::Uint([1, 2, 3, 4]));
    }
}
