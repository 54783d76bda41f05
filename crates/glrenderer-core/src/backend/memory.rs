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

//! Device memory allocations.
//!
//! OpenGL has no separate memory objects: an allocation is a host-side shadow
//! of its bytes plus the single buffer or image bound to it. Host writes land
//! in the shadow and reach the buffer object when the range is flushed.
//!
//! An image bound to host-visible memory is laid out level by level, each
//! level holding all of its layers tightly packed. Its texels travel through
//! a staging pixel buffer.

use super::command::{pack_level, unpack_region};
use super::registry::lock;
use super::resources::{BufferObject, TextureObject};
use crate::api::{
    BufferImageCopy, DeviceMemoryId, ImageAspectFlags, ImageSubresourceLayers, MemoryAllocateInfo,
    MemoryPropertyFlags, Offset3D,
};
use crate::error::ResourceError;
use crate::gl::enums as gl;
use crate::gl::{GlName, GraphicsContext};
use std::ops::Range;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub(crate) enum BoundResource {
    Buffer(Arc<BufferObject>),
    Texture(Arc<TextureObject>),
}

#[derive(Debug)]
struct MemoryState {
    bound: Option<BoundResource>,
    shadow: Vec<u8>,
    locked: Option<Range<u64>>,
}

#[derive(Debug)]
pub(crate) struct DeviceMemoryObject {
    pub id: DeviceMemoryId,
    pub info: MemoryAllocateInfo,
    state: Mutex<MemoryState>,
}

impl DeviceMemoryObject {
    pub(crate) fn new(id: DeviceMemoryId, info: MemoryAllocateInfo) -> Self {
        let shadow = if info.properties.contains(MemoryPropertyFlags::HOST_VISIBLE) {
            vec![0; info.size as usize]
        } else {
            Vec::new()
        };
        Self {
            id,
            info,
            state: Mutex::new(MemoryState {
                bound: None,
                shadow,
                locked: None,
            }),
        }
    }

    pub(crate) fn is_host_visible(&self) -> bool {
        self.info.properties.contains(MemoryPropertyFlags::HOST_VISIBLE)
    }

    pub(crate) fn is_coherent(&self) -> bool {
        self.info.properties.contains(MemoryPropertyFlags::HOST_COHERENT)
    }

    fn check_bind(&self, state: &MemoryState, offset: u64, required: u64) -> Result<(), ResourceError> {
        if state.bound.is_some() {
            return Err(ResourceError::MemoryAlreadyBound { memory: self.id });
        }
        let available = self.info.size.saturating_sub(offset);
        if required > available {
            return Err(ResourceError::MemoryTooSmall {
                required,
                available,
            });
        }
        Ok(())
    }

    /// Binds `buffer` at `offset` and allocates its storage.
    pub(crate) fn bind_buffer(
        &self,
        ctx: &mut dyn GraphicsContext,
        buffer: Arc<BufferObject>,
        offset: u64,
    ) -> Result<GlName, ResourceError> {
        let mut state = lock(&self.state);
        self.check_bind(&state, offset, buffer.size())?;
        let name = buffer.realize(ctx, self.id, offset, self.is_host_visible())?;
        state.bound = Some(BoundResource::Buffer(buffer));
        Ok(name)
    }

    /// Binds `texture` at `offset` and allocates its storage.
    pub(crate) fn bind_texture(
        &self,
        ctx: &mut dyn GraphicsContext,
        texture: Arc<TextureObject>,
        offset: u64,
    ) -> Result<GlName, ResourceError> {
        let mut state = lock(&self.state);
        self.check_bind(&state, offset, texture.memory_requirements().size)?;
        let name = texture.realize(ctx, self.id, offset)?;
        state.bound = Some(BoundResource::Texture(texture));
        Ok(name)
    }

    pub(crate) fn bound(&self) -> Option<BoundResource> {
        lock(&self.state).bound.clone()
    }

    fn resolve_range(&self, offset: u64, size: Option<u64>) -> Result<Range<u64>, ResourceError> {
        let size = size.unwrap_or_else(|| self.info.size.saturating_sub(offset));
        let end = offset.checked_add(size).ok_or(ResourceError::OutOfBounds)?;
        if end > self.info.size {
            return Err(ResourceError::OutOfBounds);
        }
        Ok(offset..end)
    }

    /// Locks a range for host access. Coherent memory is read back first.
    pub(crate) fn lock(
        &self,
        ctx: &mut dyn GraphicsContext,
        offset: u64,
        size: Option<u64>,
    ) -> Result<Range<u64>, ResourceError> {
        if !self.is_host_visible() {
            return Err(ResourceError::NotHostVisible);
        }
        let range = self.resolve_range(offset, size)?;
        let mut state = lock(&self.state);
        if self.is_coherent() {
            Self::download(ctx, &mut state, range.clone())?;
        }
        state.locked = Some(range.clone());
        Ok(range)
    }

    /// Ends host access. Coherent memory is written back.
    pub(crate) fn unlock(&self, ctx: &mut dyn GraphicsContext) -> Result<(), ResourceError> {
        let mut state = lock(&self.state);
        let range = state.locked.take().ok_or(ResourceError::NotMapped)?;
        if self.is_coherent() {
            Self::upload(ctx, &state, range)?;
        }
        Ok(())
    }

    /// Copies host writes in the range to the bound buffer or image.
    pub(crate) fn flush(
        &self,
        ctx: &mut dyn GraphicsContext,
        offset: u64,
        size: Option<u64>,
    ) -> Result<(), ResourceError> {
        let range = self.resolve_range(offset, size)?;
        let state = lock(&self.state);
        if state.locked.is_none() {
            return Err(ResourceError::NotMapped);
        }
        Self::upload(ctx, &state, range)
    }

    /// Makes device writes in the range visible to the host.
    pub(crate) fn invalidate(
        &self,
        ctx: &mut dyn GraphicsContext,
        offset: u64,
        size: Option<u64>,
    ) -> Result<(), ResourceError> {
        let range = self.resolve_range(offset, size)?;
        let mut state = lock(&self.state);
        if state.locked.is_none() {
            return Err(ResourceError::NotMapped);
        }
        Self::download(ctx, &mut state, range)
    }

    /// The part of `range` covered by the bound buffer, in memory and buffer offsets.
    fn buffer_window(state: &MemoryState, range: Range<u64>) -> Option<(GlName, Range<u64>, u64)> {
        let Some(BoundResource::Buffer(buffer)) = &state.bound else {
            return None;
        };
        let binding = buffer.binding.get()?;
        let start = range.start.max(binding.offset);
        let end = range.end.min(binding.offset + buffer.size());
        (start < end).then(|| (binding.name, start..end, start - binding.offset))
    }

    /// The bytes of the bound image when `range` touches them. The image always moves whole.
    fn texture_window(
        state: &MemoryState,
        range: Range<u64>,
    ) -> Result<Option<(Arc<TextureObject>, GlName, Range<u64>)>, ResourceError> {
        let Some(BoundResource::Texture(texture)) = &state.bound else {
            return Ok(None);
        };
        let Some(binding) = texture.binding.get() else {
            return Ok(None);
        };
        let end = binding.offset + texture.memory_requirements().size;
        if range.end <= binding.offset || range.start >= end {
            return Ok(None);
        }
        if texture.descriptor.samples > 1 {
            return Err(ResourceError::UnsupportedHostAccess(
                "multisampled images have no host layout",
            ));
        }
        Ok(Some((texture.clone(), binding.name, binding.offset..end)))
    }

    fn upload(ctx: &mut dyn GraphicsContext, state: &MemoryState, range: Range<u64>) -> Result<(), ResourceError> {
        if let Some((texture, name, window)) = Self::texture_window(state, range.clone())? {
            return upload_texture(ctx, &texture, name, &state.shadow[window.start as usize..window.end as usize]);
        }
        match Self::buffer_window(state, range) {
            Some((name, window, buffer_offset)) => {
                ctx.bind_buffer(gl::COPY_WRITE_BUFFER, Some(name));
                ctx.buffer_sub_data(
                    gl::COPY_WRITE_BUFFER,
                    buffer_offset,
                    &state.shadow[window.start as usize..window.end as usize],
                );
                ctx.bind_buffer(gl::COPY_WRITE_BUFFER, None);
            }
            None => log::debug!("DeviceMemory: flushed range does not cover a bound resource"),
        }
        Ok(())
    }

    fn download(ctx: &mut dyn GraphicsContext, state: &mut MemoryState, range: Range<u64>) -> Result<(), ResourceError> {
        if let Some((texture, name, window)) = Self::texture_window(state, range.clone())? {
            return download_texture(ctx, &texture, name, &mut state.shadow[window.start as usize..window.end as usize]);
        }
        if let Some((name, window, buffer_offset)) = Self::buffer_window(state, range) {
            ctx.bind_buffer(gl::COPY_WRITE_BUFFER, Some(name));
            ctx.get_buffer_sub_data(
                gl::COPY_WRITE_BUFFER,
                buffer_offset,
                &mut state.shadow[window.start as usize..window.end as usize],
            );
            ctx.bind_buffer(gl::COPY_WRITE_BUFFER, None);
        }
        Ok(())
    }

    fn with_locked<R>(
        &self,
        offset: u64,
        len: u64,
        f: impl FnOnce(&mut [u8]) -> R,
    ) -> Result<R, ResourceError> {
        let mut state = lock(&self.state);
        let locked = state.locked.clone().ok_or(ResourceError::NotMapped)?;
        let start = locked.start.checked_add(offset).ok_or(ResourceError::OutOfBounds)?;
        let end = start.checked_add(len).ok_or(ResourceError::OutOfBounds)?;
        if end > locked.end {
            return Err(ResourceError::OutOfBounds);
        }
        Ok(f(&mut state.shadow[start as usize..end as usize]))
    }
}

/// Mip levels of `texture` with their byte offsets in the host layout.
fn level_offsets(texture: &TextureObject) -> impl Iterator<Item = (u32, u64)> + '_ {
    let descriptor = &texture.descriptor;
    let layers = u64::from(descriptor.array_layers.max(1));
    let texel = u64::from(descriptor.format.texel_size());
    (0..descriptor.mip_levels.max(1)).scan(0u64, move |offset, level| {
        let extent = descriptor.extent.mip_level(level);
        let start = *offset;
        *offset += u64::from(extent.width) * u64::from(extent.height) * u64::from(extent.depth) * layers * texel;
        Some((level, start))
    })
}

fn upload_texture(
    ctx: &mut dyn GraphicsContext,
    texture: &TextureObject,
    name: GlName,
    bytes: &[u8],
) -> Result<(), ResourceError> {
    let descriptor = &texture.descriptor;
    let aspect = if descriptor.format.is_depth_or_stencil() {
        ImageAspectFlags::DEPTH
    } else {
        ImageAspectFlags::COLOR
    };
    let staging = ctx.create_buffer()?;
    ctx.bind_buffer(gl::PIXEL_UNPACK_BUFFER, Some(staging));
    ctx.buffer_data(gl::PIXEL_UNPACK_BUFFER, bytes.len() as u64, gl::DYNAMIC_DRAW);
    ctx.buffer_sub_data(gl::PIXEL_UNPACK_BUFFER, 0, bytes);
    ctx.bind_texture(texture.target, Some(name));
    ctx.pixel_store_i32(gl::UNPACK_ALIGNMENT, 1);
    for (level, offset) in level_offsets(texture) {
        let region = BufferImageCopy {
            buffer_offset: offset,
            buffer_row_length: 0,
            buffer_image_height: 0,
            image_subresource: ImageSubresourceLayers {
                aspect,
                mip_level: level,
                base_array_layer: 0,
                layer_count: descriptor.array_layers.max(1),
            },
            image_offset: Offset3D::default(),
            image_extent: descriptor.extent.mip_level(level),
        };
        unpack_region(ctx, texture, &region);
    }
    ctx.bind_texture(texture.target, None);
    ctx.bind_buffer(gl::PIXEL_UNPACK_BUFFER, None);
    ctx.delete_buffer(staging);
    Ok(())
}

fn download_texture(
    ctx: &mut dyn GraphicsContext,
    texture: &TextureObject,
    name: GlName,
    bytes: &mut [u8],
) -> Result<(), ResourceError> {
    let staging = ctx.create_buffer()?;
    ctx.bind_buffer(gl::PIXEL_PACK_BUFFER, Some(staging));
    ctx.buffer_data(gl::PIXEL_PACK_BUFFER, bytes.len() as u64, gl::DYNAMIC_READ);
    ctx.bind_texture(texture.target, Some(name));
    ctx.pixel_store_i32(gl::PACK_ALIGNMENT, 1);
    for (level, offset) in level_offsets(texture) {
        pack_level(ctx, texture, level, 0..texture.descriptor.array_layers.max(1), offset);
    }
    ctx.bind_texture(texture.target, None);
    ctx.get_buffer_sub_data(gl::PIXEL_PACK_BUFFER, 0, bytes);
    ctx.bind_buffer(gl::PIXEL_PACK_BUFFER, None);
    ctx.delete_buffer(staging);
    Ok(())
}

/// Host access to a locked range of device memory.
///
/// Offsets are relative to the start of the locked range. The map becomes
/// unusable once the memory is unlocked.
#[derive(Debug, Clone)]
pub struct MemoryMap {
    memory: Arc<DeviceMemoryObject>,
    offset: u64,
    size: u64,
}

impl MemoryMap {
    pub(crate) fn new(memory: Arc<DeviceMemoryObject>, range: Range<u64>) -> Self {
        Self {
            memory,
            offset: range.start,
            size: range.end - range.start,
        }
    }

    /// The allocation this map points into.
    pub fn memory(&self) -> DeviceMemoryId {
        self.memory.id
    }

    /// Offset of the locked range in the allocation.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Size of the locked range.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Copies `data` into the locked range at `offset`.
    pub fn write(&self, offset: u64, data: &[u8]) -> Result<(), ResourceError> {
        self.memory
            .with_locked(offset, data.len() as u64, |bytes| bytes.copy_from_slice(data))
    }

    /// Copies bytes of the locked range at `offset` into `out`.
    pub fn read(&self, offset: u64, out: &mut [u8]) -> Result<(), ResourceError> {
        self.memory
            .with_locked(offset, out.len() as u64, |bytes| out.copy_from_slice(bytes))
    }

    /// Runs `f` over the whole locked range.
    pub fn with_bytes<R>(&self, f: impl FnOnce(&mut [u8]) -> R) -> Result<R, ResourceError> {
        self.memory.with_locked(0, self.size, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{BufferDescriptor, BufferId, BufferUsage};
    use crate::gl::TraceContext;

    fn host_memory(size: u64, coherent: bool) -> Arc<DeviceMemoryObject> {
        let mut properties = MemoryPropertyFlags::HOST_VISIBLE;
        if coherent {
            properties |= MemoryPropertyFlags::HOST_COHERENT;
        }
        Arc::new(DeviceMemoryObject::new(
            DeviceMemoryId(0),
            MemoryAllocateInfo { size, properties },
        ))
    }

    fn buffer(size: u64) -> Arc<BufferObject> {
        Arc::new(BufferObject::new(
            BufferId(0),
            BufferDescriptor {
                label: Some("staging".to_string()),
                size,
                usage: BufferUsage::TRANSFER_SRC,
            },
        ))
    }

    #[test]
    fn memory_binds_only_once() {
        let mut context = TraceContext::new();
        let memory = host_memory(64, false);
        memory
            .bind_buffer(&mut context, buffer(32), 0)
            .expect("first bind");
        let second = memory.bind_buffer(&mut context, buffer(16), 32);
        assert!(matches!(
            second,
            Err(ResourceError::MemoryAlreadyBound { .. })
        ));
    }

    #[test]
    fn bind_checks_the_remaining_size() {
        let mut context = TraceContext::new();
        let memory = host_memory(64, false);
        let result = memory.bind_buffer(&mut context, buffer(64), 16);
        assert!(matches!(
            result,
            Err(ResourceError::MemoryTooSmall {
                required: 64,
                available: 48
            })
        ));
    }

    #[test]
    fn flushed_bytes_reach_the_buffer() {
        let mut context = TraceContext::new();
        let memory = host_memory(16, false);
        let name = memory
            .bind_buffer(&mut context, buffer(16), 0)
            .expect("bind");

        let range = memory.lock(&mut context, 0, None).expect("lock");
        let map = MemoryMap::new(memory.clone(), range);
        map.write(4, &[1, 2, 3, 4]).expect("write");
        memory.flush(&mut context, 0, None).expect("flush");
        memory.unlock(&mut context).expect("unlock");

        let contents = context.buffer_contents(name).expect("buffer storage");
        assert_eq!(&contents[4..8], &[1, 2, 3, 4]);
        assert!(matches!(map.write(0, &[0]), Err(ResourceError::NotMapped)));
    }

    #[test]
    fn device_local_memory_cannot_be_locked() {
        let mut context = TraceContext::new();
        let memory = DeviceMemoryObject::new(
            DeviceMemoryId(1),
            MemoryAllocateInfo {
                size: 16,
                properties: MemoryPropertyFlags::DEVICE_LOCAL,
            },
        );
        assert!(matches!(
            memory.lock(&mut context, 0, None),
            Err(ResourceError::NotHostVisible)
        ));
    }

    #[test]
    fn map_accesses_are_bounded_by_the_locked_range() {
        let mut context = TraceContext::new();
        let memory = host_memory(32, true);
        let range = memory.lock(&mut context, 8, Some(8)).expect("lock");
        let map = MemoryMap::new(memory.clone(), range);
        assert_eq!(map.size(), 8);
        assert!(matches!(map.write(4, &[0; 8]), Err(ResourceError::OutOfBounds)));
        assert!(matches!(
            memory.lock(&mut context, 30, Some(8)),
            Err(ResourceError::OutOfBounds)
        ));
    }
}
