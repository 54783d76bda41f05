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

//! Render pass, subpass and framebuffer descriptors.

use super::dimension::{Extent2D, Rect2D};
use super::flags::{AccessFlags, DependencyFlags, PipelineStageFlags};
use super::format::Format;
use super::texture::{ImageLayout, TextureViewId};

/// An opaque handle to a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderPassId(pub usize);

/// An opaque handle to a framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FramebufferId(pub usize);

/// What happens to an attachment's content when the render pass begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadOp {
    /// The previous content is kept.
    Load,
    /// The attachment is cleared with its clear value.
    Clear,
    /// The previous content is undefined.
    DontCare,
}

/// What happens to an attachment's content when the render pass ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    /// The content is written to memory.
    Store,
    /// The content may be discarded.
    DontCare,
}

/// Describes one attachment of a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttachmentDescription {
    /// Pixel format.
    pub format: Format,
    /// Samples per pixel.
    pub samples: u32,
    /// Load operation of the colour or depth aspect.
    pub load_op: LoadOp,
    /// Store operation of the colour or depth aspect.
    pub store_op: StoreOp,
    /// Load operation of the stencil aspect.
    pub stencil_load_op: LoadOp,
    /// Store operation of the stencil aspect.
    pub stencil_store_op: StoreOp,
    /// Layout when the pass begins.
    pub initial_layout: ImageLayout,
    /// Layout when the pass ends.
    pub final_layout: ImageLayout,
}

impl AttachmentDescription {
    /// A single-sample attachment cleared on load and stored.
    pub fn cleared(format: Format, final_layout: ImageLayout) -> Self {
        Self {
            format,
            samples: 1,
            load_op: LoadOp::Clear,
            store_op: StoreOp::Store,
            stencil_load_op: if format.has_stencil() {
                LoadOp::Clear
            } else {
                LoadOp::DontCare
            },
            stencil_store_op: StoreOp::DontCare,
            initial_layout: ImageLayout::Undefined,
            final_layout,
        }
    }
}

/// A reference from a subpass to an attachment of its render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttachmentReference {
    /// Index in the render pass attachments, or [`ATTACHMENT_UNUSED`].
    pub attachment: u32,
    /// Layout during the subpass.
    pub layout: ImageLayout,
}

/// Marks an unused attachment reference, e.g. a colour attachment without resolve target.
pub const ATTACHMENT_UNUSED: u32 = u32::MAX;

impl AttachmentReference {
    /// A reference to `attachment` in `layout`.
    pub const fn new(attachment: u32, layout: ImageLayout) -> Self {
        Self { attachment, layout }
    }

    /// `true` unless the reference is [`ATTACHMENT_UNUSED`].
    pub fn is_used(&self) -> bool {
        self.attachment != ATTACHMENT_UNUSED
    }
}

/// Describes one subpass of a render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SubpassDescription {
    /// Attachments read as input attachments.
    pub input_attachments: Vec<AttachmentReference>,
    /// Colour attachments, in draw buffer order.
    pub color_attachments: Vec<AttachmentReference>,
    /// Multisample resolve targets; empty or one per colour attachment.
    pub resolve_attachments: Vec<AttachmentReference>,
    /// Depth/stencil attachment.
    pub depth_stencil_attachment: Option<AttachmentReference>,
    /// Attachments whose content is preserved through the subpass.
    pub preserve_attachments: Vec<u32>,
}

/// A dependency between two subpasses, or a subpass and the outside of the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubpassDependency {
    /// Source subpass, `None` for work before the pass.
    pub src_subpass: Option<u32>,
    /// Destination subpass, `None` for work after the pass.
    pub dst_subpass: Option<u32>,
    /// Source stages.
    pub src_stage_mask: PipelineStageFlags,
    /// Destination stages.
    pub dst_stage_mask: PipelineStageFlags,
    /// Source accesses.
    pub src_access_mask: AccessFlags,
    /// Destination accesses.
    pub dst_access_mask: AccessFlags,
    /// Dependency modifiers.
    pub flags: DependencyFlags,
}

/// Describes a render pass.
#[derive(Debug, Clone, Default)]
pub struct RenderPassDescriptor {
    /// A debug label.
    pub label: Option<String>,
    /// Attachments shared by all subpasses.
    pub attachments: Vec<AttachmentDescription>,
    /// Subpasses, executed in order.
    pub subpasses: Vec<SubpassDescription>,
    /// Dependencies between subpasses.
    pub dependencies: Vec<SubpassDependency>,
}

/// Describes a framebuffer: one view per attachment of the render pass.
#[derive(Debug, Clone)]
pub struct FramebufferDescriptor {
    /// The render pass the framebuffer is compatible with.
    pub render_pass: RenderPassId,
    /// Views, in render pass attachment order.
    pub attachments: Vec<TextureViewId>,
    /// Size of the framebuffer.
    pub extent: Extent2D,
    /// Number of layers.
    pub layers: u32,
}

/// The clear value of a colour attachment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClearColorValue {
    /// For float and normalized formats.
    Float([f32; 4]),
    /// For signed integer formats.
    Int([i32; 4]),
    /// For unsigned integer formats.
    Uint([u32; 4]),
}

/// The clear value of a depth/stencil attachment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearDepthStencilValue {
    /// Depth value.
    pub depth: f32,
    /// Stencil value.
    pub stencil: u32,
}

/// A clear value, matched to attachments by index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClearValue {
    /// Colour attachments.
    Color(ClearColorValue),
    /// Depth/stencil attachments.
    DepthStencil(ClearDepthStencilValue),
}

/// Arguments of `CommandBuffer::begin_render_pass`.
#[derive(Debug, Clone)]
pub struct RenderPassBeginInfo {
    /// The render pass.
    pub render_pass: RenderPassId,
    /// The framebuffer holding the attachments.
    pub framebuffer: FramebufferId,
    /// The area affected by the pass.
    pub render_area: Rect2D,
    /// Clear values, indexed like the render pass attachments.
    pub clear_values: Vec<ClearValue>,
}

/// How the commands of a subpass are provided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubpassContents {
    /// Recorded in the primary buffer.
    Inline,
    /// Spliced from secondary buffers.
    SecondaryCommandBuffers,
}
