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


//! Transfer commands: buffer and image copies, blits, image clears and mipmap generation.
//!
//! Buffer/image copies go through the pixel unpack and pack bindings so the
//! driver reads or writes the buffer object at a byte offset.

use super::pass::ScratchFramebuffers;
use crate::api::{
    BufferCopy, BufferImageCopy, ClearColorValue, ClearDepthStencilValue, ImageBlit, ImageCopy,
    ImageSubresourceLayers, ImageSubresourceRange, Offset3D,
};
use crate::backend::framebuffer::{attach_texture, detach};
use crate::backend::resources::{BufferObject, TextureObject};
use crate::gl::enums::{self as gl, GLenum};
use crate::gl::{attachment_point, blit_mask, GlFeature, GlImageRegion, GlName, GraphicsContext};
use bytemuck::{Pod, Zeroable};
use std::sync::Arc;

/// Texel layout of a packed `FLOAT_32_UNSIGNED_INT_24_8_REV` depth-stencil value.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct PackedDepthStencil {
    depth: f32,
    stencil: u32,
}

fn buffer_name(buffer: &BufferObject, command: &str) -> Option<GlName> {
    let name = buffer.name();
    if name.is_none() {
        log::error!("{command}: buffer '{}' has no memory bound", buffer.label());
    }
    name
}

fn texture_name(texture: &TextureObject, command: &str) -> Option<GlName> {
    let name = texture.name();
    if name.is_none() {
        log::error!("{command}: texture {:?} has no storage", texture.id);
    }
    name
}

#[derive(Debug, Clone)]
pub(crate) struct CopyBuffer {
    pub src: Arc<BufferObject>,
    pub dst: Arc<BufferObject>,
    pub regions: Vec<BufferCopy>,
}

impl CopyBuffer {
    pub(crate) fn apply(&self, ctx: &mut dyn GraphicsContext) {
        let (Some(src), Some(dst)) = (buffer_name(&self.src, "CopyBuffer"), buffer_name(&self.dst, "CopyBuffer")) else {
            return;
        };
        ctx.bind_buffer(gl::COPY_READ_BUFFER, Some(src));
        ctx.bind_buffer(gl::COPY_WRITE_BUFFER, Some(dst));
        for region in &self.regions {
            ctx.copy_buffer_sub_data(
                gl::COPY_READ_BUFFER,
                gl::COPY_WRITE_BUFFER,
                region.src_offset,
                region.dst_offset,
                region.size,
            );
        }
        ctx.bind_buffer(gl::COPY_WRITE_BUFFER, None);
        ctx.bind_buffer(gl::COPY_READ_BUFFER, None);
    }
}

/// `copy_buffer_to_image` and `copy_image_to_buffer`.
#[derive(Debug, Clone)]
pub(crate) struct BufferImageTransfer {
    pub buffer: Arc<BufferObject>,
    pub texture: Arc<TextureObject>,
    pub regions: Vec<BufferImageCopy>,
}

/// Bytes between two consecutive layers of `region` in the source buffer.
fn layer_stride(texture: &TextureObject, region: &BufferImageCopy) -> u64 {
    let width = if region.buffer_row_length == 0 {
        region.image_extent.width
    } else {
        region.buffer_row_length
    };
    let height = if region.buffer_image_height == 0 {
        region.image_extent.height
    } else {
        region.buffer_image_height
    };
    u64::from(width) * u64::from(height) * u64::from(texture.descriptor.format.texel_size())
}

/// Uploads one region from the bound `PIXEL_UNPACK_BUFFER` into the bound texture.
pub(crate) fn unpack_region(ctx: &mut dyn GraphicsContext, texture: &TextureObject, region: &BufferImageCopy) {
    let target = texture.target;
    let pixel = texture.pixel;
    ctx.pixel_store_i32(gl::UNPACK_ROW_LENGTH, region.buffer_row_length as i32);
    ctx.pixel_store_i32(gl::UNPACK_IMAGE_HEIGHT, region.buffer_image_height as i32);
    let level = region.image_subresource.mip_level as i32;
    let Offset3D { x, y, z } = region.image_offset;
    let (width, height, depth) = (
        region.image_extent.width as i32,
        region.image_extent.height as i32,
        region.image_extent.depth as i32,
    );
    let base_layer = region.image_subresource.base_array_layer as i32;
    let layers = region.image_subresource.layer_count.max(1) as i32;
    let offset = region.buffer_offset;
    match target {
        gl::TEXTURE_1D if ctx.supports(GlFeature::TexSubImage1D) => {
            ctx.tex_sub_image_1d(target, level, x, width, pixel.format, pixel.ty, offset)
        }
        gl::TEXTURE_1D => log::error!("CopyBufferToImage: 1D texture uploads are not supported, skipped"),
        gl::TEXTURE_1D_ARRAY => {
            ctx.tex_sub_image_2d(target, level, x, base_layer, width, layers, pixel.format, pixel.ty, offset)
        }
        gl::TEXTURE_2D => ctx.tex_sub_image_2d(target, level, x, y, width, height, pixel.format, pixel.ty, offset),
        gl::TEXTURE_CUBE_MAP => {
            let stride = layer_stride(texture, region);
            for layer in 0..layers {
                ctx.tex_sub_image_2d(
                    gl::TEXTURE_CUBE_MAP_POSITIVE_X + (base_layer + layer) as GLenum,
                    level,
                    x,
                    y,
                    width,
                    height,
                    pixel.format,
                    pixel.ty,
                    offset + layer as u64 * stride,
                );
            }
        }
        gl::TEXTURE_3D => ctx.tex_sub_image_3d(
            target,
            level,
            [x, y, z],
            [width, height, depth],
            pixel.format,
            pixel.ty,
            offset,
        ),
        gl::TEXTURE_2D_ARRAY | gl::TEXTURE_CUBE_MAP_ARRAY => ctx.tex_sub_image_3d(
            target,
            level,
            [x, y, base_layer],
            [width, height, layers],
            pixel.format,
            pixel.ty,
            offset,
        ),
        other => log::error!("CopyBufferToImage: cannot upload to texture target 0x{other:04X}"),
    }
}

/// Reads a whole mip level of the bound texture into the bound `PIXEL_PACK_BUFFER`.
pub(crate) fn pack_level(
    ctx: &mut dyn GraphicsContext,
    texture: &TextureObject,
    level: u32,
    faces: std::ops::Range<u32>,
    buffer_offset: u64,
) {
    let pixel = texture.pixel;
    if texture.target == gl::TEXTURE_CUBE_MAP {
        let extent = texture.descriptor.extent.mip_level(level);
        let face = u64::from(extent.width) * u64::from(extent.height) * u64::from(texture.descriptor.format.texel_size());
        for (index, layer) in faces.enumerate() {
            ctx.get_tex_image(
                gl::TEXTURE_CUBE_MAP_POSITIVE_X + layer,
                level as i32,
                pixel.format,
                pixel.ty,
                buffer_offset + index as u64 * face,
            );
        }
    } else {
        ctx.get_tex_image(texture.target, level as i32, pixel.format, pixel.ty, buffer_offset);
    }
}

impl BufferImageTransfer {
    pub(crate) fn upload(&self, ctx: &mut dyn GraphicsContext) {
        let (Some(buffer), Some(texture)) = (
            buffer_name(&self.buffer, "CopyBufferToImage"),
            texture_name(&self.texture, "CopyBufferToImage"),
        ) else {
            return;
        };
        let target = self.texture.target;
        ctx.bind_buffer(gl::PIXEL_UNPACK_BUFFER, Some(buffer));
        ctx.bind_texture(target, Some(texture));
        ctx.pixel_store_i32(gl::UNPACK_ALIGNMENT, 1);
        for region in &self.regions {
            unpack_region(ctx, &self.texture, region);
        }
        ctx.pixel_store_i32(gl::UNPACK_ROW_LENGTH, 0);
        ctx.pixel_store_i32(gl::UNPACK_IMAGE_HEIGHT, 0);
        ctx.bind_texture(target, None);
        ctx.bind_buffer(gl::PIXEL_UNPACK_BUFFER, None);
    }

    /// Reads whole mip levels back into the buffer.
    pub(crate) fn read_back(&self, ctx: &mut dyn GraphicsContext) {
        let (Some(buffer), Some(texture)) = (
            buffer_name(&self.buffer, "CopyImageToBuffer"),
            texture_name(&self.texture, "CopyImageToBuffer"),
        ) else {
            return;
        };
        let target = self.texture.target;
        ctx.bind_buffer(gl::PIXEL_PACK_BUFFER, Some(buffer));
        ctx.bind_texture(target, Some(texture));
        ctx.pixel_store_i32(gl::PACK_ALIGNMENT, 1);
        for region in &self.regions {
            if region.image_offset != Offset3D::default() {
                log::warn!(
                    "CopyImageToBuffer: offset {:?} ignored, the whole level is read",
                    region.image_offset
                );
            }
            let subresource = region.image_subresource;
            let faces = subresource.base_array_layer..subresource.base_array_layer + subresource.layer_count.max(1);
            pack_level(ctx, &self.texture, subresource.mip_level, faces, region.buffer_offset);
        }
        ctx.bind_texture(target, None);
        ctx.bind_buffer(gl::PIXEL_PACK_BUFFER, None);
    }
}

fn region(texture: &TextureObject, name: GlName, subresource: &ImageSubresourceLayers, offset: Offset3D) -> GlImageRegion {
    let z = if texture.target == gl::TEXTURE_3D {
        offset.z
    } else {
        subresource.base_array_layer as i32
    };
    GlImageRegion {
        name,
        target: texture.target,
        level: subresource.mip_level as i32,
        offset: [offset.x, offset.y, z],
    }
}

/// Attaches `src` and `dst` to the scratch framebuffers, blits, and detaches them.
#[allow(clippy::too_many_arguments)]
fn blit_layer(
    ctx: &mut dyn GraphicsContext,
    scratch: ScratchFramebuffers,
    src: &TextureObject,
    src_level: i32,
    src_layer: i32,
    dst: &TextureObject,
    dst_level: i32,
    dst_layer: i32,
    rects: ([i32; 4], [i32; 4]),
    filter: GLenum,
) {
    let format = src.descriptor.format;
    let src_point = attachment_point(format, 0);
    let dst_point = attachment_point(dst.descriptor.format, 0);
    ctx.bind_framebuffer(gl::READ_FRAMEBUFFER, Some(scratch.read));
    attach_texture(ctx, gl::READ_FRAMEBUFFER, src_point, src, src_level, src_layer);
    ctx.bind_framebuffer(gl::DRAW_FRAMEBUFFER, Some(scratch.draw));
    attach_texture(ctx, gl::DRAW_FRAMEBUFFER, dst_point, dst, dst_level, dst_layer);
    if !format.is_depth_or_stencil() {
        ctx.read_buffer(src_point);
        ctx.draw_buffers(&[dst_point]);
    }
    // Depth and stencil can only be blitted with nearest filtering.
    let filter = if format.is_depth_or_stencil() { gl::NEAREST } else { filter };
    ctx.blit_framebuffer(rects.0, rects.1, blit_mask(format), filter);
    detach(ctx, gl::DRAW_FRAMEBUFFER, dst_point);
    detach(ctx, gl::READ_FRAMEBUFFER, src_point);
    ctx.bind_framebuffer(gl::DRAW_FRAMEBUFFER, None);
    ctx.bind_framebuffer(gl::READ_FRAMEBUFFER, None);
}

#[derive(Debug, Clone)]
pub(crate) struct CopyImage {
    pub src: Arc<TextureObject>,
    pub dst: Arc<TextureObject>,
    pub regions: Vec<ImageCopy>,
    pub scratch: ScratchFramebuffers,
}

impl CopyImage {
    pub(crate) fn apply(&self, ctx: &mut dyn GraphicsContext) {
        let (Some(src), Some(dst)) = (texture_name(&self.src, "CopyImage"), texture_name(&self.dst, "CopyImage")) else {
            return;
        };
        let native = ctx.supports(GlFeature::CopyImageSubData);
        for copy in &self.regions {
            let layers = copy.src_subresource.layer_count.max(1);
            if native {
                let depth = if self.src.target == gl::TEXTURE_3D {
                    copy.extent.depth
                } else {
                    layers
                };
                ctx.copy_image_sub_data(
                    region(&self.src, src, &copy.src_subresource, copy.src_offset),
                    region(&self.dst, dst, &copy.dst_subresource, copy.dst_offset),
                    [copy.extent.width as i32, copy.extent.height as i32, depth as i32],
                );
                continue;
            }
            let (width, height) = (copy.extent.width as i32, copy.extent.height as i32);
            let src_rect = [copy.src_offset.x, copy.src_offset.y, copy.src_offset.x + width, copy.src_offset.y + height];
            let dst_rect = [copy.dst_offset.x, copy.dst_offset.y, copy.dst_offset.x + width, copy.dst_offset.y + height];
            for layer in 0..layers {
                blit_layer(
                    ctx,
                    self.scratch,
                    &self.src,
                    copy.src_subresource.mip_level as i32,
                    (copy.src_subresource.base_array_layer + layer) as i32,
                    &self.dst,
                    copy.dst_subresource.mip_level as i32,
                    (copy.dst_subresource.base_array_layer + layer) as i32,
                    (src_rect, dst_rect),
                    gl::NEAREST,
                );
            }
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct BlitImage {
    pub src: Arc<TextureObject>,
    pub dst: Arc<TextureObject>,
    pub regions: Vec<ImageBlit>,
    pub filter: GLenum,
    pub scratch: ScratchFramebuffers,
}

impl BlitImage {
    pub(crate) fn apply(&self, ctx: &mut dyn GraphicsContext) {
        if texture_name(&self.src, "BlitImage").is_none() || texture_name(&self.dst, "BlitImage").is_none() {
            return;
        }
        for blit in &self.regions {
            let rect = |offsets: &[Offset3D; 2]| [offsets[0].x, offsets[0].y, offsets[1].x, offsets[1].y];
            for layer in 0..blit.src_subresource.layer_count.max(1) {
                blit_layer(
                    ctx,
                    self.scratch,
                    &self.src,
                    blit.src_subresource.mip_level as i32,
                    (blit.src_subresource.base_array_layer + layer) as i32,
                    &self.dst,
                    blit.dst_subresource.mip_level as i32,
                    (blit.dst_subresource.base_array_layer + layer) as i32,
                    (rect(&blit.src_offsets), rect(&blit.dst_offsets)),
                    self.filter,
                );
            }
        }
    }
}

pub(super) fn generate_mipmaps(ctx: &mut dyn GraphicsContext, texture: &TextureObject) {
    let Some(name) = texture_name(texture, "GenerateMipmaps") else {
        return;
    };
    ctx.bind_texture(texture.target, Some(name));
    ctx.generate_mipmap(texture.target);
    ctx.bind_texture(texture.target, None);
}

/// Levels of `range` that exist in `texture`.
fn levels(texture: &TextureObject, range: &ImageSubresourceRange) -> std::ops::Range<u32> {
    let end = (range.base_mip_level + range.level_count).min(texture.descriptor.mip_levels.max(1));
    range.base_mip_level..end
}

#[derive(Debug, Clone)]
pub(crate) struct ClearColorImage {
    pub texture: Arc<TextureObject>,
    pub value: ClearColorValue,
    pub ranges: Vec<ImageSubresourceRange>,
}

impl ClearColorImage {
    pub(crate) fn apply(&self, ctx: &mut dyn GraphicsContext) {
        if !ctx.supports(GlFeature::ClearTexImage) {
            log::error!("ClearColorImage: glClearTexImage is not available, clear skipped");
            return;
        }
        let Some(name) = texture_name(&self.texture, "ClearColorImage") else {
            return;
        };
        let (format, ty, data) = match self.value {
            ClearColorValue::Float(value) => (gl::RGBA, gl::FLOAT, bytemuck::cast_slice::<_, u8>(&value[..]).to_vec()),
            ClearColorValue::Int(value) => (gl::RGBA_INTEGER, gl::INT, bytemuck::cast_slice::<_, u8>(&value[..]).to_vec()),
            ClearColorValue::Uint(value) => (gl::RGBA_INTEGER, gl::UNSIGNED_INT, bytemuck::cast_slice::<_, u8>(&value[..]).to_vec()),
        };
        for range in &self.ranges {
            for level in levels(&self.texture, range) {
                ctx.clear_tex_image(name, level as i32, format, ty, &data);
            }
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ClearDepthStencilImage {
    pub texture: Arc<TextureObject>,
    pub value: ClearDepthStencilValue,
    pub ranges: Vec<ImageSubresourceRange>,
}

impl ClearDepthStencilImage {
    pub(crate) fn apply(&self, ctx: &mut dyn GraphicsContext) {
        if !ctx.supports(GlFeature::ClearTexImage) {
            log::error!("ClearDepthStencilImage: glClearTexImage is not available, clear skipped");
            return;
        }
        let Some(name) = texture_name(&self.texture, "ClearDepthStencilImage") else {
            return;
        };
        let format = self.texture.descriptor.format;
        let (gl_format, ty, data) = if format.is_depth_stencil() {
            let packed = PackedDepthStencil {
                depth: self.value.depth,
                stencil: self.value.stencil,
            };
            (gl::DEPTH_STENCIL, gl::FLOAT_32_UNSIGNED_INT_24_8_REV, bytemuck::bytes_of(&packed).to_vec())
        } else if format.is_depth() {
            (gl::DEPTH_COMPONENT, gl::FLOAT, bytemuck::bytes_of(&self.value.depth).to_vec())
        } else if format.is_stencil() {
            (gl::STENCIL_INDEX, gl::UNSIGNED_BYTE, vec![self.value.stencil as u8])
        } else {
            log::error!("ClearDepthStencilImage: {format:?} has no depth or stencil aspect");
            return;
        };
        for range in &self.ranges {
            for level in levels(&self.texture, range) {
                ctx.clear_tex_image(name, level as i32, gl_format, ty, &data);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{
        DeviceMemoryId, Format, ImageAspectFlags, TextureDescriptor, TextureId, TextureUsage,
    };
    use crate::gl::{GlCall, TraceContext};

    fn texture(context: &mut TraceContext, format: Format) -> Arc<TextureObject> {
        let texture = TextureObject::new(
            TextureId(1),
            TextureDescriptor::new_2d(format, 4, 4, TextureUsage::SAMPLED),
            false,
        );
        texture
            .realize(context, DeviceMemoryId(1), 0)
            .expect("texture storage should be created");
        context.clear_calls();
        Arc::new(texture)
    }

    #[test]
    fn packed_depth_stencil_is_eight_bytes() {
        assert_eq!(std::mem::size_of::<PackedDepthStencil>(), 8);
    }

    #[test]
    fn depth_stencil_clears_pack_both_values() {
        // --- Arrange ---
        let mut context = TraceContext::new();
        let clear = ClearDepthStencilImage {
            texture: texture(&mut context, Format::D32FloatS8Uint),
            value: ClearDepthStencilValue {
                depth: 1.0,
                stencil: 3,
            },
            ranges: vec![ImageSubresourceRange::single(ImageAspectFlags::DEPTH | ImageAspectFlags::STENCIL)],
        };

        // --- Act ---
        clear.apply(&mut context);

        // --- Assert ---
        let mut expected = 1.0f32.to_ne_bytes().to_vec();
        expected.extend_from_slice(&3u32.to_ne_bytes());
        assert_eq!(
            context.calls(),
            vec![GlCall::ClearTexImage {
                texture: GlName(1),
                level: 0,
                format: gl::DEPTH_STENCIL,
                ty: gl::FLOAT_32_UNSIGNED_INT_24_8_REV,
                data: expected,
            }]
        );
    }

    #[test]
    fn colour_clears_are_skipped_without_clear_tex_image() {
        let mut context = TraceContext::new().without_feature(GlFeature::ClearTexImage);
        let clear = ClearColorImage {
            texture: texture(&mut context, Format::Rgba8Unorm),
            value: ClearColorValue::Float([0.0; 4]),
            ranges: vec![ImageSubresourceRange::single(ImageAspectFlags::COLOR)],
        };

        clear.apply(&mut context);

        assert!(context.calls().is_empty());
    }
}
