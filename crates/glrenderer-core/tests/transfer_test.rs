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


//! Integration tests for transfer commands: buffer-to-image uploads and blits.

mod common;

use common::{bind_new_memory_to_texture, Fixture};
use glrenderer_core::api::*;
use glrenderer_core::gl::enums as gl;
use glrenderer_core::gl::GlCall;

fn texture(fixture: &Fixture, descriptor: TextureDescriptor) -> TextureId {
    let texture = fixture.device.create_texture(&descriptor).expect("texture");
    bind_new_memory_to_texture(&fixture.device, texture, MemoryPropertyFlags::DEVICE_LOCAL);
    texture
}

fn image(dimension: TextureDimension, extent: Extent3D, array_layers: u32, cube_compatible: bool) -> TextureDescriptor {
    TextureDescriptor {
        dimension,
        extent,
        array_layers,
        cube_compatible,
        ..TextureDescriptor::new_2d(Format::Rgba8Unorm, 1, 1, TextureUsage::SAMPLED | TextureUsage::TRANSFER_DST)
    }
}

fn region(base_array_layer: u32, layer_count: u32, image_offset: Offset3D, image_extent: Extent3D) -> BufferImageCopy {
    BufferImageCopy {
        buffer_offset: 0,
        buffer_row_length: 0,
        buffer_image_height: 0,
        image_subresource: ImageSubresourceLayers {
            aspect: ImageAspectFlags::COLOR,
            mip_level: 0,
            base_array_layer,
            layer_count,
        },
        image_offset,
        image_extent,
    }
}

/// Replays a single `copy_buffer_to_image` and returns its `TexSubImage` calls as `(target, origin, size, offset)`.
fn upload(fixture: &Fixture, dst: TextureId, copy: BufferImageCopy) -> Vec<(u32, [i32; 3], [i32; 3], u64)> {
    let (staging, _) = fixture.buffer(4096, BufferUsage::TRANSFER_SRC);
    let mut cb = fixture
        .device
        .create_command_pool(QueueKind::Graphics)
        .allocate(CommandBufferLevel::Primary);
    assert!(cb.begin(CommandBufferUsageFlags::empty()));
    cb.copy_buffer_to_image(staging, dst, &[copy]);
    assert!(cb.end());

    let (_, calls) = fixture.replay(&[&cb]);
    calls
        .into_iter()
        .filter_map(|call| match call {
            GlCall::TexSubImage {
                target,
                origin,
                size,
                offset,
                ..
            } => Some((target, origin, size, offset)),
            _ => None,
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Buffer to image
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_array_layers_of_a_1d_image_upload_as_rows() {
    let fixture = Fixture::new();
    let dst = texture(&fixture, image(TextureDimension::D1, Extent3D::new(8, 1, 1), 4, false));
    let uploads = upload(
        &fixture,
        dst,
        region(1, 2, Offset3D::default(), Extent3D::new(8, 1, 1)),
    );
    assert_eq!(uploads, vec![(gl::TEXTURE_1D_ARRAY, [0, 1, 0], [8, 2, 1], 0)]);
}

#[test]
fn test_cube_faces_upload_one_by_one() {
    let fixture = Fixture::new();
    let dst = texture(&fixture, image(TextureDimension::D2, Extent3D::new(4, 4, 1), 6, true));
    let uploads = upload(
        &fixture,
        dst,
        region(2, 3, Offset3D::default(), Extent3D::new(4, 4, 1)),
    );
    let face = 4 * 4 * 4;
    assert_eq!(
        uploads,
        vec![
            (gl::TEXTURE_CUBE_MAP_POSITIVE_X + 2, [0, 0, 0], [4, 4, 1], 0),
            (gl::TEXTURE_CUBE_MAP_POSITIVE_X + 3, [0, 0, 0], [4, 4, 1], face),
            (gl::TEXTURE_CUBE_MAP_POSITIVE_X + 4, [0, 0, 0], [4, 4, 1], 2 * face),
        ],
        "Each face reads the next tightly packed layer of the buffer"
    );
}

#[test]
fn test_3d_uploads_use_the_depth_offset() {
    let fixture = Fixture::new();
    let dst = texture(&fixture, image(TextureDimension::D3, Extent3D::new(4, 4, 4), 1, false));
    let uploads = upload(
        &fixture,
        dst,
        region(0, 1, Offset3D { x: 1, y: 0, z: 2 }, Extent3D::new(2, 4, 2)),
    );
    assert_eq!(uploads, vec![(gl::TEXTURE_3D, [1, 0, 2], [2, 4, 2], 0)]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Blits
// ─────────────────────────────────────────────────────────────────────────────

fn blit_calls(fixture: &Fixture, format: Format, usage: TextureUsage, aspect: ImageAspectFlags) -> Vec<(u32, u32)> {
    let descriptor = TextureDescriptor::new_2d(format, 16, 16, usage | TextureUsage::TRANSFER_SRC | TextureUsage::TRANSFER_DST);
    let src = texture(fixture, descriptor.clone());
    let dst = texture(fixture, descriptor);
    let corners = [Offset3D::default(), Offset3D { x: 16, y: 16, z: 1 }];
    let mut cb = fixture
        .device
        .create_command_pool(QueueKind::Graphics)
        .allocate(CommandBufferLevel::Primary);
    assert!(cb.begin(CommandBufferUsageFlags::empty()));
    cb.blit_image(
        src,
        dst,
        &[ImageBlit {
            src_subresource: ImageSubresourceLayers::base(aspect),
            src_offsets: corners,
            dst_subresource: ImageSubresourceLayers::base(aspect),
            dst_offsets: corners,
        }],
        Filter::Linear,
    );
    assert!(cb.end());

    let (_, calls) = fixture.replay(&[&cb]);
    calls
        .into_iter()
        .filter_map(|call| match call {
            GlCall::BlitFramebuffer { mask, filter, .. } => Some((mask, filter)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_blit_mask_follows_the_image_format() {
    let fixture = Fixture::new();
    assert_eq!(
        blit_calls(&fixture, Format::Rgba8Unorm, TextureUsage::COLOR_ATTACHMENT, ImageAspectFlags::COLOR),
        vec![(gl::COLOR_BUFFER_BIT, gl::LINEAR)]
    );
    assert_eq!(
        blit_calls(&fixture, Format::D32Float, TextureUsage::DEPTH_STENCIL_ATTACHMENT, ImageAspectFlags::DEPTH),
        vec![(gl::DEPTH_BUFFER_BIT, gl::NEAREST)],
        "Depth blits fall back to nearest filtering"
    );
    assert_eq!(
        blit_calls(
            &fixture,
            Format::D24UnormS8Uint,
            TextureUsage::DEPTH_STENCIL_ATTACHMENT,
            ImageAspectFlags::DEPTH | ImageAspectFlags::STENCIL
        ),
        vec![(gl::DEPTH_BUFFER_BIT | gl::STENCIL_BUFFER_BIT, gl::NEAREST)]
    );
}
