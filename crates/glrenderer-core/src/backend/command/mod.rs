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


//! The recorded command model.
//!
//! A command buffer is a list of [`Command`] values. Each one owns `Arc`
//! snapshots of the objects it touches and replays itself against a
//! [`GraphicsContext`], assuming the commands before it already ran.

mod draw;
mod pass;
mod state;
mod sync;
mod transfer;

pub(crate) use draw::{Draw, DrawIndexed, DrawIndirect};
pub(crate) use pass::{BeginRenderPass, ClearAttachments, ScratchFramebuffers, SubpassTransition, WriteMasks};
pub(crate) use state::StencilReference;
pub(crate) use transfer::{
    pack_level, unpack_region, BlitImage, BufferImageTransfer, ClearColorImage, ClearDepthStencilImage, CopyBuffer, CopyImage,
};

use super::geometry::GeometryBinding;
use super::descriptor::DescriptorBinding;
use super::pipeline::{ComputePipelineObject, GraphicsPipelineObject};
use super::resources::{BufferObject, TextureObject};
use crate::api::{PushConstantsBuffer, Rect2D, Viewport};
use crate::gl::enums::GLenum;
use crate::gl::{GlName, GraphicsContext};
use std::sync::Arc;

/// One recorded operation.
#[derive(Debug, Clone)]
pub(crate) enum Command {
    BindPipeline(Arc<GraphicsPipelineObject>),
    BindComputePipeline(Arc<ComputePipelineObject>),
    BindGeometryBuffers(GeometryBinding),
    BindDescriptorSet(Vec<DescriptorBinding>),
    PushConstants(PushConstantsBuffer),
    SetViewport(Viewport),
    SetScissor(Rect2D),
    SetLineWidth(f32),
    SetDepthBias { constant: f32, clamp: f32, slope: f32 },
    SetBlendConstants([f32; 4]),
    SetStencilReference(Vec<StencilReference>),
    BeginRenderPass(BeginRenderPass),
    BeginSubpass(SubpassTransition),
    EndSubpass(SubpassTransition),
    EndRenderPass,
    ClearAttachments(ClearAttachments),
    ClearColorImage(ClearColorImage),
    ClearDepthStencilImage(ClearDepthStencilImage),
    Draw(Draw),
    DrawIndexed(DrawIndexed),
    DrawIndirect(DrawIndirect),
    DrawIndexedIndirect(DrawIndirect),
    Dispatch([u32; 3]),
    DispatchIndirect { buffer: Arc<BufferObject>, offset: u64 },
    CopyBuffer(CopyBuffer),
    CopyBufferToImage(BufferImageTransfer),
    CopyImageToBuffer(BufferImageTransfer),
    CopyImage(CopyImage),
    BlitImage(BlitImage),
    GenerateMipmaps(Arc<TextureObject>),
    /// Buffer, image and global barriers alike: the driver keeps memory coherent.
    MemoryBarrier,
    ResetQueryPool,
    BeginQuery { target: GLenum, query: GlName },
    EndQuery { target: GLenum },
    WriteTimestamp { query: GlName },
}

impl Command {
    pub(crate) fn apply(&self, ctx: &mut dyn GraphicsContext) {
        match self {
            Command::BindPipeline(pipeline) => pipeline.bind(ctx),
            Command::BindComputePipeline(pipeline) => pipeline.bind(ctx),
            Command::BindGeometryBuffers(geometry) => geometry.apply(ctx),
            Command::BindDescriptorSet(bindings) => bindings.iter().for_each(|binding| binding.apply(ctx)),
            Command::PushConstants(buffer) => state::push_constants(ctx, buffer),
            Command::SetViewport(viewport) => state::set_viewport(ctx, viewport),
            Command::SetScissor(scissor) => state::set_scissor(ctx, scissor),
            Command::SetLineWidth(width) => ctx.line_width(*width),
            Command::SetDepthBias { constant, clamp, slope } => {
                if *clamp != 0.0 {
                    log::warn!("SetDepthBias: depth bias clamp {clamp} is not supported and is ignored");
                }
                ctx.polygon_offset(*slope, *constant);
            }
            Command::SetBlendConstants(constants) => ctx.blend_color(*constants),
            Command::SetStencilReference(references) => references.iter().for_each(|reference| reference.apply(ctx)),
            Command::BeginRenderPass(begin) => begin.apply(ctx),
            Command::BeginSubpass(transition) => transition.begin(ctx),
            Command::EndSubpass(transition) => transition.end(ctx),
            Command::EndRenderPass => pass::end_render_pass(ctx),
            Command::ClearAttachments(clear) => clear.apply(ctx),
            Command::ClearColorImage(clear) => clear.apply(ctx),
            Command::ClearDepthStencilImage(clear) => clear.apply(ctx),
            Command::Draw(draw) => draw.apply(ctx),
            Command::DrawIndexed(draw) => draw.apply(ctx),
            Command::DrawIndirect(draw) | Command::DrawIndexedIndirect(draw) => draw.apply(ctx),
            Command::Dispatch([x, y, z]) => ctx.dispatch_compute(*x, *y, *z),
            Command::DispatchIndirect { buffer, offset } => draw::dispatch_indirect(ctx, buffer, *offset),
            Command::CopyBuffer(copy) => copy.apply(ctx),
            Command::CopyBufferToImage(copy) => copy.upload(ctx),
            Command::CopyImageToBuffer(copy) => copy.read_back(ctx),
            Command::CopyImage(copy) => copy.apply(ctx),
            Command::BlitImage(blit) => blit.apply(ctx),
            Command::GenerateMipmaps(texture) => transfer::generate_mipmaps(ctx, texture),
            Command::MemoryBarrier | Command::ResetQueryPool => {}
            Command::BeginQuery { target, query } => ctx.begin_query(*target, *query),
            Command::EndQuery { target } => ctx.end_query(*target),
            Command::WriteTimestamp { query } => sync::write_timestamp(ctx, *query),
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Command::BindPipeline(_) => "BindPipeline",
            Command::BindComputePipeline(_) => "BindComputePipeline",
            Command::BindGeometryBuffers(_) => "BindGeometryBuffers",
            Command::BindDescriptorSet(_) => "BindDescriptorSet",
            Command::PushConstants(_) => "PushConstants",
            Command::SetViewport(_) => "SetViewport",
            Command::SetScissor(_) => "SetScissor",
            Command::SetLineWidth(_) => "SetLineWidth",
            Command::SetDepthBias { .. } => "SetDepthBias",
            Command::SetBlendConstants(_) => "SetBlendConstants",
            Command::SetStencilReference(_) => "SetStencilReference",
            Command::BeginRenderPass(_) => "BeginRenderPass",
            Command::BeginSubpass(_) => "BeginSubpass",
            Command::EndSubpass(_) => "EndSubpass",
            Command::EndRenderPass => "EndRenderPass",
            Command::ClearAttachments(_) => "ClearAttachments",
            Command::ClearColorImage(_) => "ClearColorImage",
            Command::ClearDepthStencilImage(_) => "ClearDepthStencilImage",
            Command::Draw(_) => "Draw",
            Command::DrawIndexed(_) => "DrawIndexed",
            Command::DrawIndirect(_) => "DrawIndirect",
            Command::DrawIndexedIndirect(_) => "DrawIndexedIndirect",
            Command::Dispatch(_) => "Dispatch",
            Command::DispatchIndirect { .. } => "DispatchIndirect",
            Command::CopyBuffer(_) => "CopyBuffer",
            Command::CopyBufferToImage(_) => "CopyBufferToImage",
            Command::CopyImageToBuffer(_) => "CopyImageToBuffer",
            Command::CopyImage(_) => "CopyImage",
            Command::BlitImage(_) => "BlitImage",
            Command::GenerateMipmaps(_) => "GenerateMipmaps",
            Command::MemoryBarrier => "MemoryBarrier",
            Command::ResetQueryPool => "ResetQueryPool",
            Command::BeginQuery { .. } => "BeginQuery",
            Command::EndQuery { .. } => "EndQuery",
            Command::WriteTimestamp { .. } => "WriteTimestamp",
        }
    }

    pub(crate) fn is_draw(&self) -> bool {
        matches!(
            self,
            Command::Draw(_) | Command::DrawIndexed(_) | Command::DrawIndirect(_) | Command::DrawIndexedIndirect(_)
        )
    }

    pub(crate) fn is_dispatch(&self) -> bool {
        matches!(self, Command::Dispatch(_) | Command::DispatchIndirect { .. })
    }
}
