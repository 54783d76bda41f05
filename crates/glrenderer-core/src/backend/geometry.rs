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

//! Vertex array objects, cached by binding combination.
//!
//! Recording only produces a [`GeometryKey`] and looks it up in the cache.
//! The vertex array itself is created by [`GeometryBuffers::initialise`],
//! right before the first replay that draws with it.

use super::registry::lock;
use super::resources::BufferObject;
use crate::api::{BufferId, IndexType, VertexInputState, VertexStepMode};
use crate::error::{ContextError, ResourceError};
use crate::gl::enums as gl;
use crate::gl::{GlName, GraphicsContext, IntoGl};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

/// The content address of a vertex array.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct GeometryKey {
    pub vertex: Vec<(u32, BufferId, u64)>,
    pub index: Option<(BufferId, u64, IndexType)>,
    pub layout_hash: u64,
}

/// The buffers a draw reads from, as recorded.
#[derive(Debug, Clone)]
pub(crate) struct GeometryIntent {
    pub vertex: Vec<(u32, Arc<BufferObject>, u64)>,
    pub index: Option<(Arc<BufferObject>, u64, IndexType)>,
    pub layout: VertexInputState,
    pub layout_hash: u64,
}

impl GeometryIntent {
    pub(crate) fn key(&self) -> GeometryKey {
        GeometryKey {
            vertex: self
                .vertex
                .iter()
                .map(|(binding, buffer, offset)| (*binding, buffer.id, *offset))
                .collect(),
            index: self
                .index
                .as_ref()
                .map(|(buffer, offset, ty)| (buffer.id, *offset, *ty)),
            layout_hash: self.layout_hash,
        }
    }
}

#[derive(Debug)]
pub(crate) struct GeometryBuffers {
    pub key: GeometryKey,
    intent: GeometryIntent,
    vao: OnceLock<GlName>,
}

impl GeometryBuffers {
    fn new(intent: GeometryIntent) -> Self {
        Self {
            key: intent.key(),
            intent,
            vao: OnceLock::new(),
        }
    }

    pub(crate) fn vao(&self) -> Option<GlName> {
        self.vao.get().copied()
    }

    pub(crate) fn uses_buffer(&self, buffer: BufferId) -> bool {
        self.key.vertex.iter().any(|(_, id, _)| *id == buffer)
            || self.key.index.is_some_and(|(id, _, _)| id == buffer)
    }

    /// Creates the vertex array. Returns `false` when it already exists.
    pub(crate) fn initialise(&self, ctx: &mut dyn GraphicsContext) -> Result<bool, ResourceError> {
        if self.vao.get().is_some() {
            return Ok(false);
        }
        let vao = ctx.create_vertex_array()?;
        ctx.bind_vertex_array(Some(vao));
        let result = self.describe(ctx);
        ctx.bind_vertex_array(None);
        if let Err(err) = result {
            ctx.delete_vertex_array(vao);
            return Err(err);
        }
        let _ = self.vao.set(vao);
        log::debug!("GeometryBuffers: Created vertex array {:?} for {:?}", vao, self.key);
        Ok(true)
    }

    fn describe(&self, ctx: &mut dyn GraphicsContext) -> Result<(), ResourceError> {
        let layout = &self.intent.layout;
        for attribute in &layout.attributes {
            let (Some(binding), Some((_, buffer, offset))) = (
                layout.binding(attribute.binding),
                self.intent
                    .vertex
                    .iter()
                    .find(|(binding, _, _)| *binding == attribute.binding),
            ) else {
                log::warn!(
                    "GeometryBuffers: no vertex buffer bound for attribute at location {}",
                    attribute.location
                );
                continue;
            };
            let name = buffer
                .name()
                .ok_or(ContextError::MissingObject("vertex buffer"))?;
            ctx.bind_buffer(gl::ARRAY_BUFFER, Some(name));
            ctx.enable_vertex_attrib_array(attribute.location);
            let format = attribute.format;
            let pointer = offset + u64::from(attribute.offset);
            let components = format.component_count() as i32;
            let stride = binding.stride as i32;
            if format.is_integer() {
                ctx.vertex_attrib_i_pointer(attribute.location, components, format.into_gl(), stride, pointer);
            } else {
                ctx.vertex_attrib_pointer(
                    attribute.location,
                    components,
                    format.into_gl(),
                    format.is_normalized(),
                    stride,
                    pointer,
                );
            }
            if binding.step_mode == VertexStepMode::Instance {
                ctx.vertex_attrib_divisor(attribute.location, 1);
            }
        }
        if let Some((buffer, _, _)) = &self.intent.index {
            let name = buffer
                .name()
                .ok_or(ContextError::MissingObject("index buffer"))?;
            ctx.bind_buffer(gl::ELEMENT_ARRAY_BUFFER, Some(name));
        }
        Ok(())
    }
}

/// The device-wide cache of vertex arrays.
#[derive(Debug, Default)]
pub(crate) struct GeometryCache {
    entries: Mutex<HashMap<GeometryKey, Arc<GeometryBuffers>>>,
}

impl GeometryCache {
    pub(crate) fn find(&self, key: &GeometryKey) -> Option<Arc<GeometryBuffers>> {
        lock(&self.entries).get(key).cloned()
    }

    /// Finds the entry for `intent`, or creates it. The flag is `true` for a new entry.
    pub(crate) fn resolve(&self, intent: GeometryIntent) -> (Arc<GeometryBuffers>, bool) {
        let key = intent.key();
        let mut entries = lock(&self.entries);
        if let Some(existing) = entries.get(&key) {
            return (existing.clone(), false);
        }
        let created = Arc::new(GeometryBuffers::new(intent));
        entries.insert(key, created.clone());
        (created, true)
    }

    pub(crate) fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    /// Removes every entry reading from `buffer`.
    pub(crate) fn evict_buffer(&self, buffer: BufferId) -> Vec<Arc<GeometryBuffers>> {
        let mut entries = lock(&self.entries);
        let keys: Vec<GeometryKey> = entries
            .iter()
            .filter(|(_, geometry)| geometry.uses_buffer(buffer))
            .map(|(key, _)| key.clone())
            .collect();
        keys.iter().filter_map(|key| entries.remove(key)).collect()
    }

    pub(crate) fn drain(&self) -> Vec<Arc<GeometryBuffers>> {
        lock(&self.entries).drain().map(|(_, geometry)| geometry).collect()
    }
}

/// The vertex array a draw binds.
#[derive(Debug, Clone)]
pub(crate) enum GeometryBinding {
    Cached(Arc<GeometryBuffers>),
    /// The device's attribute-less vertex array with its dummy index buffer.
    Empty(GlName),
}

impl GeometryBinding {
    pub(crate) fn apply(&self, ctx: &mut dyn GraphicsContext) {
        match self {
            GeometryBinding::Cached(geometry) => match geometry.vao() {
                Some(vao) => ctx.bind_vertex_array(Some(vao)),
                None => log::error!("BindGeometryBuffers: vertex array for {:?} was never initialised", geometry.key),
            },
            GeometryBinding::Empty(vao) => ctx.bind_vertex_array(Some(*vao)),
        }
    }
}

/// The vertex array bound when a draw reads no vertex attributes.
///
/// OpenGL refuses to draw without a vertex array, and indexed draws also need
/// an element buffer, so it owns a buffer of zeroed 32-bit indices.
#[derive(Debug)]
pub(crate) struct EmptyGeometry {
    pub vao: GlName,
    pub index_buffer: GlName,
    pub index_type: IndexType,
    pub index_count: u32,
}

impl EmptyGeometry {
    pub(crate) fn create(ctx: &mut dyn GraphicsContext, index_count: u32) -> Result<Self, ContextError> {
        let vao = ctx.create_vertex_array()?;
        let index_buffer = match ctx.create_buffer() {
            Ok(buffer) => buffer,
            Err(err) => {
                ctx.delete_vertex_array(vao);
                return Err(err);
            }
        };
        let index_type = IndexType::Uint32;
        let zeros = vec![0u8; index_count as usize * index_type.size() as usize];
        ctx.bind_vertex_array(Some(vao));
        ctx.bind_buffer(gl::ELEMENT_ARRAY_BUFFER, Some(index_buffer));
        ctx.buffer_data(gl::ELEMENT_ARRAY_BUFFER, zeros.len() as u64, gl::STATIC_DRAW);
        ctx.buffer_sub_data(gl::ELEMENT_ARRAY_BUFFER, 0, &zeros);
        ctx.bind_vertex_array(None);
        log::debug!("GeometryBuffers: Created the empty vertex array {vao:?} with {index_count} dummy indices");
        Ok(Self {
            vao,
            index_buffer,
            index_type,
            index_count,
        })
    }

    pub(crate) fn destroy(&self, ctx: &mut dyn GraphicsContext) {
        ctx.delete_vertex_array(self.vao);
        ctx.delete_buffer(self.index_buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{
        BufferDescriptor, BufferUsage, DeviceMemoryId, VertexAttributeDescription,
        VertexBindingDescription, VertexFormat,
    };
    use crate::gl::{GlCall, TraceContext};

    fn vertex_buffer(context: &mut TraceContext, id: usize) -> Arc<BufferObject> {
        let buffer = Arc::new(BufferObject::new(
            BufferId(id),
            BufferDescriptor {
                label: None,
                size: 256,
                usage: BufferUsage::VERTEX,
            },
        ));
        buffer
            .realize(context, DeviceMemoryId(id), 0, false)
            .expect("storage");
        buffer
    }

    fn instanced_layout() -> VertexInputState {
        VertexInputState {
            bindings: vec![
                VertexBindingDescription {
                    binding: 0,
                    stride: 12,
                    step_mode: VertexStepMode::Vertex,
                },
                VertexBindingDescription {
                    binding: 1,
                    stride: 4,
                    step_mode: VertexStepMode::Instance,
                },
            ],
            attributes: vec![
                VertexAttributeDescription {
                    location: 0,
                    binding: 0,
                    format: VertexFormat::Float32x3,
                    offset: 0,
                },
                VertexAttributeDescription {
                    location: 1,
                    binding: 1,
                    format: VertexFormat::Uint32,
                    offset: 0,
                },
            ],
        }
    }

    fn intent(buffers: &[Arc<BufferObject>], offset: u64) -> GeometryIntent {
        let layout = instanced_layout();
        GeometryIntent {
            vertex: buffers
                .iter()
                .enumerate()
                .map(|(binding, buffer)| (binding as u32, buffer.clone(), offset))
                .collect(),
            index: None,
            layout_hash: layout.hash_value(),
            layout,
        }
    }

    #[test]
    fn identical_bindings_share_one_entry() {
        let mut context = TraceContext::new();
        let buffers = [vertex_buffer(&mut context, 0), vertex_buffer(&mut context, 1)];
        let cache = GeometryCache::default();

        let (first, created) = cache.resolve(intent(&buffers, 0));
        assert!(created);
        let (second, created) = cache.resolve(intent(&buffers, 0));
        assert!(!created);
        assert!(Arc::ptr_eq(&first, &second));

        let (_, created) = cache.resolve(intent(&buffers, 16));
        assert!(created);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn initialise_is_idempotent_and_describes_attributes() {
        let mut context = TraceContext::new();
        let buffers = [vertex_buffer(&mut context, 0), vertex_buffer(&mut context, 1)];
        let cache = GeometryCache::default();
        let (geometry, _) = cache.resolve(intent(&buffers, 8));
        context.clear_calls();

        assert!(geometry.initialise(&mut context).expect("vertex array"));
        assert!(!geometry.initialise(&mut context).expect("vertex array"));

        let calls = context.calls();
        assert_eq!(
            calls
                .iter()
                .filter(|call| matches!(call, GlCall::Create { .. }))
                .count(),
            1
        );
        assert!(calls.contains(&GlCall::VertexAttribDivisor {
            location: 1,
            divisor: 1
        }));
        assert!(calls
            .iter()
            .any(|call| matches!(call, GlCall::VertexAttribIPointer { location: 1, .. })));
        assert!(calls
            .iter()
            .any(|call| matches!(call, GlCall::VertexAttribPointer { location: 0, offset: 8, .. })));
    }

    #[test]
    fn destroying_a_buffer_evicts_its_entries() {
        let mut context = TraceContext::new();
        let buffers = [vertex_buffer(&mut context, 0), vertex_buffer(&mut context, 1)];
        let cache = GeometryCache::default();
        cache.resolve(intent(&buffers, 0));
        cache.resolve(intent(&buffers[..1], 0));

        let evicted = cache.evict_buffer(BufferId(1));
        assert_eq!(evicted.len(), 1);
        assert_eq!(cache.len(), 1);
    }
}
