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

//! Parameters of the command buffer recording calls.

use super::buffer::BufferId;
use super::dimension::{Extent3D, Offset3D, Rect2D};
use super::flags::{AccessFlags, ImageAspectFlags};
use super::render_pass::{ClearValue, FramebufferId, RenderPassId};
use super::texture::{ImageLayout, ImageSubresourceLayers, ImageSubresourceRange, TextureId};

/// An opaque handle to a command pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandPoolId(pub usize);

/// The three logical queues of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueKind {
    /// Graphics queue.
    Graphics,
    /// Compute queue.
    Compute,
    /// Presentation queue.
    Present,
}

/// The level of a command buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandBufferLevel {
    /// Submitted to a queue.
    Primary,
    /// Spliced into a primary buffer.
    Secondary,
}

/// The pipeline type a binding call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineBindPoint {
    /// Graphics pipelines.
    Graphics,
    /// Compute pipelines.
    Compute,
}

/// The render pass state a secondary buffer is recorded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InheritanceInfo {
    /// The render pass the buffer executes in.
    pub render_pass: Option<RenderPassId>,
    /// The subpass the buffer executes in.
    pub subpass: u32,
    /// The framebuffer, when known.
    pub framebuffer: Option<FramebufferId>,
    /// The buffer may run inside an occlusion query.
    pub occlusion_query_enable: bool,
}

/// A buffer-to-buffer copy region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferCopy {
    /// Byte offset in the source.
    pub src_offset: u64,
    /// Byte offset in the destination.
    pub dst_offset: u64,
    /// Number of bytes.
    pub size: u64,
}

/// A buffer/image copy region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferImageCopy {
    /// Byte offset in the buffer.
    pub buffer_offset: u64,
    /// Row length in texels; zero means tightly packed.
    pub buffer_row_length: u32,
    /// Image height in texels; zero means tightly packed.
    pub buffer_image_height: u32,
    /// The image subresource.
    pub image_subresource: ImageSubresourceLayers,
    /// Offset in the image.
    pub image_offset: Offset3D,
    /// Size of the region.
    pub image_extent: Extent3D,
}

/// An image-to-image copy region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageCopy {
    /// Source subresource.
    pub src_subresource: ImageSubresourceLayers,
    /// Source offset.
    pub src_offset: Offset3D,
    /// Destination subresource.
    pub dst_subresource: ImageSubresourceLayers,
    /// Destination offset.
    pub dst_offset: Offset3D,
    /// Size of the region.
    pub extent: Extent3D,
}

/// A scaled image-to-image blit region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageBlit {
    /// Source subresource.
    pub src_subresource: ImageSubresourceLayers,
    /// Corners of the source region.
    pub src_offsets: [Offset3D; 2],
    /// Destination subresource.
    pub dst_subresource: ImageSubresourceLayers,
    /// Corners of the destination region.
    pub dst_offsets: [Offset3D; 2],
}

/// A global memory barrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryBarrier {
    /// Accesses made available.
    pub src_access_mask: AccessFlags,
    /// Accesses made visible.
    pub dst_access_mask: AccessFlags,
}

/// A buffer memory barrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferMemoryBarrier {
    /// Accesses made available.
    pub src_access_mask: AccessFlags,
    /// Accesses made visible.
    pub dst_access_mask: AccessFlags,
    /// Releasing queue family.
    pub src_queue_family: Option<u32>,
    /// Acquiring queue family.
    pub dst_queue_family: Option<u32>,
    /// The buffer.
    pub buffer: BufferId,
    /// Byte offset.
    pub offset: u64,
    /// Byte size; `None` covers the rest of the buffer.
    pub size: Option<u64>,
}

/// An image memory barrier, with its layout transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageMemoryBarrier {
    /// Accesses made available.
    pub src_access_mask: AccessFlags,
    /// Accesses made visible.
    pub dst_access_mask: AccessFlags,
    /// Layout before the barrier.
    pub old_layout: ImageLayout,
    /// Layout after the barrier.
    pub new_layout: ImageLayout,
    /// Releasing queue family.
    pub src_queue_family: Option<u32>,
    /// Acquiring queue family.
    pub dst_queue_family: Option<u32>,
    /// The image.
    pub image: TextureId,
    /// Affected subresources.
    pub subresource_range: ImageSubresourceRange,
}

/// One attachment cleared by `CommandBuffer::clear_attachments`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearAttachment {
    /// Aspects cleared.
    pub aspect: ImageAspectFlags,
    /// Index in the current subpass's colour attachments, for colour clears.
    pub color_attachment: u32,
    /// The clear value.
    pub value: ClearValue,
}

/// A region cleared by `CommandBuffer::clear_attachments`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClearRect {
    /// The area.
    pub rect: Rect2D,
    /// First layer.
    pub base_array_layer: u32,
    /// Number of layers.
    pub layer_count: u32,
}
