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

//! Descriptor set layouts, pools and sets.
//!
//! A set stores the objects written to it. Binding the set resolves them to
//! OpenGL binding points: binding `b`, element `e` of set `s` uses point
//! `s * BINDINGS_PER_SET + b + e`.

use super::registry::lock;
use super::resources::{BufferObject, SamplerObject, TextureViewObject};
use crate::api::{
    DescriptorPoolId, DescriptorSetId, DescriptorSetLayoutBinding, DescriptorSetLayoutId,
    DescriptorType, BINDINGS_PER_SET,
};
use crate::error::ResourceError;
use crate::gl::enums::{self as gl, GLenum};
use crate::gl::{GlName, GraphicsContext};
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

#[derive(Debug)]
pub(crate) struct DescriptorSetLayoutObject {
    pub id: DescriptorSetLayoutId,
    pub bindings: Vec<DescriptorSetLayoutBinding>,
}

impl DescriptorSetLayoutObject {
    pub(crate) fn binding(&self, binding: u32) -> Option<&DescriptorSetLayoutBinding> {
        self.bindings.iter().find(|desc| desc.binding == binding)
    }
}

#[derive(Debug)]
pub(crate) struct DescriptorPoolObject {
    pub id: DescriptorPoolId,
    pub max_sets: u32,
    sets: Mutex<HashSet<DescriptorSetId>>,
}

impl DescriptorPoolObject {
    pub(crate) fn new(id: DescriptorPoolId, max_sets: u32) -> Self {
        Self {
            id,
            max_sets,
            sets: Mutex::new(HashSet::new()),
        }
    }

    /// Reserves room for `count` more sets.
    pub(crate) fn reserve(&self, count: usize) -> Result<(), ResourceError> {
        let sets = lock(&self.sets);
        if sets.len() + count > self.max_sets as usize {
            return Err(ResourceError::PoolExhausted);
        }
        Ok(())
    }

    pub(crate) fn track(&self, set: DescriptorSetId) {
        lock(&self.sets).insert(set);
    }

    pub(crate) fn release(&self, set: DescriptorSetId) -> bool {
        lock(&self.sets).remove(&set)
    }

    /// Forgets every set, returning their ids.
    pub(crate) fn reset(&self) -> Vec<DescriptorSetId> {
        lock(&self.sets).drain().collect()
    }
}

/// One resource written to a descriptor.
#[derive(Debug, Clone)]
pub(crate) enum DescriptorEntry {
    Sampler(Arc<SamplerObject>),
    /// Sampled images, combined image samplers and input attachments.
    Texture {
        view: Arc<TextureViewObject>,
        sampler: Option<Arc<SamplerObject>>,
    },
    StorageImage(Arc<TextureViewObject>),
    Buffer {
        ty: DescriptorType,
        buffer: Arc<BufferObject>,
        offset: u64,
        range: Option<u64>,
    },
}

#[derive(Debug)]
pub(crate) struct DescriptorSetObject {
    pub id: DescriptorSetId,
    pub pool: DescriptorPoolId,
    pub layout: Arc<DescriptorSetLayoutObject>,
    entries: Mutex<BTreeMap<(u32, u32), DescriptorEntry>>,
}

impl DescriptorSetObject {
    pub(crate) fn new(id: DescriptorSetId, pool: DescriptorPoolId, layout: Arc<DescriptorSetLayoutObject>) -> Self {
        Self {
            id,
            pool,
            layout,
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    pub(crate) fn write(&self, binding: u32, element: u32, entry: DescriptorEntry) {
        lock(&self.entries).insert((binding, element), entry);
    }

    pub(crate) fn entry_count(&self) -> usize {
        lock(&self.entries).len()
    }

    /// Resolves the set to binding points. Dynamic buffers consume `dynamic_offsets` in binding order.
    pub(crate) fn resolve(
        &self,
        set_index: u32,
        dynamic_offsets: &mut impl Iterator<Item = u32>,
        out: &mut Vec<DescriptorBinding>,
    ) {
        let entries = lock(&self.entries);
        for (&(binding, element), entry) in entries.iter() {
            let unit = set_index * BINDINGS_PER_SET + binding + element;
            match entry {
                DescriptorEntry::Sampler(sampler) => out.push(DescriptorBinding::Sampler {
                    unit,
                    sampler: sampler.name,
                }),
                DescriptorEntry::Texture { view, sampler } => out.push(DescriptorBinding::Texture {
                    unit,
                    target: view.target,
                    texture: view.name(),
                    sampler: sampler.as_ref().map(|sampler| sampler.name),
                }),
                DescriptorEntry::StorageImage(view) => match view.name() {
                    Some(texture) => out.push(DescriptorBinding::Image {
                        unit,
                        texture,
                        level: view.base_level(),
                        layered: view.texture.is_layered(),
                        layer: view.base_layer(),
                        format: view.texture.pixel.internal_format,
                    }),
                    None => log::warn!("DescriptorSet: storage image {:?} has no storage", view.id),
                },
                DescriptorEntry::Buffer {
                    ty,
                    buffer,
                    offset,
                    range,
                } => {
                    let dynamic = if ty.is_dynamic() {
                        u64::from(dynamic_offsets.next().unwrap_or_else(|| {
                            log::warn!("DescriptorSet: missing dynamic offset for binding {binding}");
                            0
                        }))
                    } else {
                        0
                    };
                    let Some(name) = buffer.name() else {
                        log::warn!("DescriptorSet: buffer {:?} has no storage", buffer.id);
                        continue;
                    };
                    let offset = offset + dynamic;
                    let size = range.unwrap_or_else(|| buffer.size().saturating_sub(offset));
                    let target = match ty {
                        DescriptorType::StorageBuffer | DescriptorType::StorageBufferDynamic => {
                            gl::SHADER_STORAGE_BUFFER
                        }
                        _ => gl::UNIFORM_BUFFER,
                    };
                    out.push(DescriptorBinding::Buffer {
                        target,
                        index: unit,
                        buffer: name,
                        offset,
                        size,
                    });
                }
            }
        }
    }
}

/// A resolved descriptor, ready to be bound at replay.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DescriptorBinding {
    Sampler {
        unit: u32,
        sampler: GlName,
    },
    Texture {
        unit: u32,
        target: GLenum,
        texture: Option<GlName>,
        sampler: Option<GlName>,
    },
    Image {
        unit: u32,
        texture: GlName,
        level: i32,
        layered: bool,
        layer: i32,
        format: GLenum,
    },
    Buffer {
        target: GLenum,
        index: u32,
        buffer: GlName,
        offset: u64,
        size: u64,
    },
}

impl DescriptorBinding {
    pub(crate) fn apply(&self, ctx: &mut dyn GraphicsContext) {
        match *self {
            DescriptorBinding::Sampler { unit, sampler } => ctx.bind_sampler(unit, Some(sampler)),
            DescriptorBinding::Texture {
                unit,
                target,
                texture,
                sampler,
            } => {
                ctx.active_texture(unit);
                ctx.bind_texture(target, texture);
                ctx.bind_sampler(unit, sampler);
            }
            DescriptorBinding::Image {
                unit,
                texture,
                level,
                layered,
                layer,
                format,
            } => {
                if ctx.supports(crate::gl::GlFeature::ImageLoadStore) {
                    ctx.bind_image_texture(unit, texture, level, layered, layer, gl::READ_WRITE, format);
                } else {
                    log::error!("BindDescriptorSet: image load/store is not supported, image unit {unit} left unbound");
                }
            }
            DescriptorBinding::Buffer {
                target,
                index,
                buffer,
                offset,
                size,
            } => ctx.bind_buffer_range(target, index, buffer, offset, size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{BufferDescriptor, BufferId, BufferUsage, DeviceMemoryId, ShaderStageFlags};
    use crate::gl::TraceContext;

    fn layout() -> Arc<DescriptorSetLayoutObject> {
        Arc::new(DescriptorSetLayoutObject {
            id: DescriptorSetLayoutId(0),
            bindings: vec![DescriptorSetLayoutBinding {
                binding: 1,
                descriptor_type: DescriptorType::UniformBufferDynamic,
                count: 1,
                stages: ShaderStageFlags::VERTEX,
            }],
        })
    }

    #[test]
    fn pool_refuses_more_than_max_sets() {
        let pool = DescriptorPoolObject::new(DescriptorPoolId(0), 2);
        assert!(pool.reserve(2).is_ok());
        pool.track(DescriptorSetId(0));
        pool.track(DescriptorSetId(1));
        assert!(matches!(pool.reserve(1), Err(ResourceError::PoolExhausted)));
        assert!(pool.release(DescriptorSetId(1)));
        assert!(pool.reserve(1).is_ok());
        assert_eq!(pool.reset().len(), 1);
    }

    #[test]
    fn dynamic_buffers_consume_offsets_and_use_set_binding_points() {
        let mut context = TraceContext::new();
        let buffer = Arc::new(BufferObject::new(
            BufferId(0),
            BufferDescriptor {
                label: None,
                size: 1024,
                usage: BufferUsage::UNIFORM,
            },
        ));
        buffer
            .realize(&mut context, DeviceMemoryId(0), 0, true)
            .expect("storage");
        let set = DescriptorSetObject::new(DescriptorSetId(0), DescriptorPoolId(0), layout());
        set.write(
            1,
            0,
            DescriptorEntry::Buffer {
                ty: DescriptorType::UniformBufferDynamic,
                buffer: buffer.clone(),
                offset: 0,
                range: Some(64),
            },
        );

        let mut bindings = Vec::new();
        set.resolve(2, &mut [256u32].into_iter(), &mut bindings);

        assert_eq!(
            bindings,
            vec![DescriptorBinding::Buffer {
                target: gl::UNIFORM_BUFFER,
                index: 2 * BINDINGS_PER_SET + 1,
                buffer: buffer.name().expect("name"),
                offset: 256,
                size: 64,
            }]
        );
    }
}
