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


//! The device: factory and owner of every object, and of the OpenGL context.

use super::command::ScratchFramebuffers;
use super::command_pool::CommandPool;
use super::descriptor::{
    DescriptorEntry, DescriptorPoolObject, DescriptorSetLayoutObject, DescriptorSetObject,
};
use super::framebuffer::FrameBufferObject;
use super::geometry::{EmptyGeometry, GeometryCache};
use super::memory::{DeviceMemoryObject, MemoryMap};
use super::pipeline::{ComputePipelineObject, GraphicsPipelineObject, PipelineLayoutObject};
use super::query::QueryPoolObject;
use super::queue::Queue;
use super::registry::{lock, Registry};
use super::render_pass::RenderPassObject;
use super::resources::{
    BufferObject, SamplerObject, ShaderModuleObject, TextureObject, TextureViewObject,
};
use super::swapchain::SwapChainObject;
use super::sync::{FenceObject, SemaphoreObject};
use crate::api::{
    BufferDescriptor, BufferId, CommandPoolId, ComputePipelineDescriptor, ComputePipelineId,
    DescriptorImageInfo, DescriptorPoolDescriptor, DescriptorPoolId, DescriptorResources,
    DescriptorSetId, DescriptorSetLayoutDescriptor, DescriptorSetLayoutId, DescriptorType,
    DeviceMemoryId, DeviceSettings, FenceId, FramebufferDescriptor, FramebufferId,
    GraphicsPipelineDescriptor, MappedMemoryRange, MemoryAllocateInfo, MemoryRequirements,
    PipelineId, PipelineLayoutDescriptor, PipelineLayoutId, QueryPoolDescriptor, QueryPoolId,
    QueryResultFlags, QueueKind, RenderPassDescriptor, RenderPassId, SamplerDescriptor, SamplerId,
    SemaphoreId, ShaderModuleDescriptor, ShaderModuleId, SwapChainDescriptor, SwapChainId,
    TextureDescriptor, TextureId, TextureUsage, TextureViewDescriptor, TextureViewId, WaitResult,
    WriteDescriptorSet,
};
use crate::error::{PipelineError, RenderError, ResourceError, ShaderError};
use crate::gl::{GlFeature, GraphicsContext};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// The state shared by a device, its queues, pools and command buffers.
pub(crate) struct DeviceShared {
    pub settings: DeviceSettings,
    context: Mutex<Box<dyn GraphicsContext>>,

    pub buffers: Registry<BufferObject>,
    pub textures: Registry<TextureObject>,
    pub texture_views: Registry<TextureViewObject>,
    pub samplers: Registry<SamplerObject>,
    pub shader_modules: Registry<ShaderModuleObject>,
    pub render_passes: Registry<RenderPassObject>,
    pub framebuffers: Registry<FrameBufferObject>,
    pub set_layouts: Registry<DescriptorSetLayoutObject>,
    pub descriptor_pools: Registry<DescriptorPoolObject>,
    pub descriptor_sets: Registry<DescriptorSetObject>,
    pub pipeline_layouts: Registry<PipelineLayoutObject>,
    pub pipelines: Registry<GraphicsPipelineObject>,
    pub compute_pipelines: Registry<ComputePipelineObject>,
    pub memories: Registry<DeviceMemoryObject>,
    pub fences: Registry<FenceObject>,
    pub semaphores: Registry<SemaphoreObject>,
    pub query_pools: Registry<QueryPoolObject>,
    pub swapchains: Registry<SwapChainObject>,

    pub geometry: GeometryCache,
    pub empty_geometry: EmptyGeometry,
    pub scratch: ScratchFramebuffers,
    next_command_pool: AtomicUsize,
}

impl std::fmt::Debug for DeviceShared {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceShared")
            .field("settings", &self.settings)
            .field("buffers", &self.buffers.len())
            .field("textures", &self.textures.len())
            .field("pipelines", &self.pipelines.len())
            .field("geometry", &self.geometry.len())
            .finish_non_exhaustive()
    }
}

impl DeviceShared {
    /// Runs `operation` with the OpenGL context.
    pub(crate) fn with_context<R>(&self, operation: impl FnOnce(&mut dyn GraphicsContext) -> R) -> R {
        let mut context = lock(&self.context);
        operation(context.as_mut())
    }
}

impl Drop for DeviceShared {
    fn drop(&mut self) {
        let ctx = self.context.get_mut().unwrap_or_else(PoisonError::into_inner).as_mut();
        for geometry in self.geometry.drain() {
            if let Some(vao) = geometry.vao() {
                ctx.delete_vertex_array(vao);
            }
        }
        self.pipelines.drain().iter().for_each(|pipeline| pipeline.program.destroy(ctx));
        self.compute_pipelines.drain().iter().for_each(|pipeline| pipeline.program.destroy(ctx));
        self.shader_modules.drain().iter().for_each(|module| ctx.delete_shader(module.shader));
        self.framebuffers.drain().iter().for_each(|framebuffer| framebuffer.destroy(ctx));
        self.samplers.drain().iter().for_each(|sampler| ctx.delete_sampler(sampler.name));
        self.query_pools.drain().iter().for_each(|pool| pool.destroy(ctx));
        self.fences.drain().iter().for_each(|fence| fence.reset(ctx));
        for texture in self.textures.drain() {
            if let Some(name) = texture.name() {
                ctx.delete_texture(name);
            }
        }
        for buffer in self.buffers.drain() {
            if let Some(name) = buffer.name() {
                ctx.delete_buffer(name);
            }
        }
        self.empty_geometry.destroy(ctx);
        ctx.delete_framebuffer(self.scratch.read);
        ctx.delete_framebuffer(self.scratch.draw);
        log::debug!("Device: Released every OpenGL object");
    }
}

/// A clonable handle to a device.
///
/// The device owns the only [`GraphicsContext`]. Every call that talks to
/// OpenGL locks it for its duration, so calls from several threads are
/// serialised; recording command buffers never does.
#[derive(Clone, Debug)]
pub struct Device {
    shared: Arc<DeviceShared>,
}

impl Device {
    /// Creates a device over `context`, which must be current on the calling thread.
    pub fn new(mut context: Box<dyn GraphicsContext>, settings: DeviceSettings) -> Result<Self, RenderError> {
        let ctx = context.as_mut();
        let empty_geometry = EmptyGeometry::create(ctx, settings.dummy_index_count)
            .map_err(|err| RenderError::InitializationFailed(err.to_string()))?;
        let scratch = match (ctx.create_framebuffer(), ctx.create_framebuffer()) {
            (Ok(read), Ok(draw)) => ScratchFramebuffers { read, draw },
            (read, draw) => {
                let failure = [read, draw]
                    .into_iter()
                    .filter_map(|result| match result {
                        Ok(name) => {
                            ctx.delete_framebuffer(name);
                            None
                        }
                        Err(err) => Some(err.to_string()),
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                empty_geometry.destroy(ctx);
                return Err(RenderError::InitializationFailed(failure));
            }
        };
        log::info!("Device: Created with settings {settings:?}");

        Ok(Self {
            shared: Arc::new(DeviceShared {
                settings,
                context: Mutex::new(context),
                buffers: Registry::new("buffer"),
                textures: Registry::new("texture"),
                texture_views: Registry::new("texture view"),
                samplers: Registry::new("sampler"),
                shader_modules: Registry::new("shader module"),
                render_passes: Registry::new("render pass"),
                framebuffers: Registry::new("framebuffer"),
                set_layouts: Registry::new("descriptor set layout"),
                descriptor_pools: Registry::new("descriptor pool"),
                descriptor_sets: Registry::new("descriptor set"),
                pipeline_layouts: Registry::new("pipeline layout"),
                pipelines: Registry::new("pipeline"),
                compute_pipelines: Registry::new("compute pipeline"),
                memories: Registry::new("device memory"),
                fences: Registry::new("fence"),
                semaphores: Registry::new("semaphore"),
                query_pools: Registry::new("query pool"),
                swapchains: Registry::new("swap chain"),
                geometry: GeometryCache::default(),
                empty_geometry,
                scratch,
                next_command_pool: AtomicUsize::new(0),
            }),
        })
    }

    /// The settings the device was created with.
    pub fn settings(&self) -> &DeviceSettings {
        &self.shared.settings
    }

    /// Whether the context provides an optional entry point.
    pub fn supports(&self, feature: GlFeature) -> bool {
        self.shared.with_context(|ctx| ctx.supports(feature))
    }

    /// Number of vertex arrays in the geometry cache.
    pub fn geometry_cache_len(&self) -> usize {
        self.shared.geometry.len()
    }

    /// Returns one of the device queues. All kinds replay on the same context.
    pub fn queue(&self, kind: QueueKind) -> Queue {
        Queue::new(kind, self.shared.clone())
    }

    /// Blocks until every submitted command has completed.
    pub fn wait_idle(&self) {
        self.shared.with_context(|ctx| ctx.finish());
    }

    // --- Buffers and images ---

    /// Creates a buffer. It gets storage when memory is bound to it.
    pub fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<BufferId, ResourceError> {
        let id = BufferId(self.shared.buffers.next_id());
        let buffer = BufferObject::new(id, descriptor.clone());
        log::info!(
            "Device: Created buffer '{}' with ID: {:?}, size: {} bytes",
            buffer.label(),
            id,
            descriptor.size
        );
        self.shared.buffers.insert(id.0, Arc::new(buffer));
        Ok(id)
    }

    /// Destroys a buffer and the cached vertex arrays reading from it.
    pub fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError> {
        let buffer = self.shared.buffers.remove(id.0)?;
        let evicted = self.shared.geometry.evict_buffer(id);
        self.shared.with_context(|ctx| {
            for geometry in &evicted {
                if let Some(vao) = geometry.vao() {
                    ctx.delete_vertex_array(vao);
                }
            }
            if let Some(name) = buffer.name() {
                ctx.delete_buffer(name);
            }
        });
        log::debug!("Device: Destroyed buffer with ID: {id:?} ({} vertex arrays evicted)", evicted.len());
        Ok(())
    }

    /// Size and alignment the buffer needs from its memory.
    pub fn buffer_memory_requirements(&self, id: BufferId) -> Result<MemoryRequirements, ResourceError> {
        Ok(self.shared.buffers.fetch(id.0)?.memory_requirements())
    }

    /// Creates an image. It gets storage when memory is bound to it.
    pub fn create_texture(&self, descriptor: &TextureDescriptor) -> Result<TextureId, ResourceError> {
        let id = TextureId(self.shared.textures.next_id());
        let texture = TextureObject::new(id, descriptor.clone(), false);
        log::info!(
            "Device: Created texture '{}' with ID: {:?}, {:?} {}x{}x{}",
            descriptor.label.as_deref().unwrap_or_default(),
            id,
            descriptor.format,
            descriptor.extent.width,
            descriptor.extent.height,
            descriptor.extent.depth
        );
        self.shared.textures.insert(id.0, Arc::new(texture));
        Ok(id)
    }

    /// Destroys a texture.
    pub fn destroy_texture(&self, id: TextureId) -> Result<(), ResourceError> {
        let texture = self.shared.textures.remove(id.0)?;
        if let Some(name) = texture.name() {
            self.shared.with_context(|ctx| ctx.delete_texture(name));
        }
        log::debug!("Device: Destroyed texture with ID: {id:?}");
        Ok(())
    }

    /// Size and alignment the texture needs from its memory.
    pub fn texture_memory_requirements(&self, id: TextureId) -> Result<MemoryRequirements, ResourceError> {
        Ok(self.shared.textures.fetch(id.0)?.memory_requirements())
    }

    /// Creates a view on a level and layer range of a texture.
    pub fn create_texture_view(&self, descriptor: &TextureViewDescriptor) -> Result<TextureViewId, ResourceError> {
        let texture = self.shared.textures.fetch(descriptor.texture.0)?;
        let id = TextureViewId(self.shared.texture_views.next_id());
        let view = TextureViewObject::new(id, descriptor.clone(), texture);
        log::info!("Device: Created texture view with ID: {id:?} of {:?}", descriptor.texture);
        self.shared.texture_views.insert(id.0, Arc::new(view));
        Ok(id)
    }

    /// Destroys a texture view.
    pub fn destroy_texture_view(&self, id: TextureViewId) -> Result<(), ResourceError> {
        self.shared.texture_views.remove(id.0)?;
        log::debug!("Device: Destroyed texture view with ID: {id:?}");
        Ok(())
    }

    /// Creates a sampler object from `descriptor`.
    pub fn create_sampler(&self, descriptor: &SamplerDescriptor) -> Result<SamplerId, ResourceError> {
        let id = SamplerId(self.shared.samplers.next_id());
        let sampler = self
            .shared
            .with_context(|ctx| SamplerObject::create(ctx, id, descriptor))?;
        log::info!("Device: Created sampler with ID: {id:?}");
        self.shared.samplers.insert(id.0, Arc::new(sampler));
        Ok(id)
    }

    /// Destroys a sampler.
    pub fn destroy_sampler(&self, id: SamplerId) -> Result<(), ResourceError> {
        let sampler = self.shared.samplers.remove(id.0)?;
        self.shared.with_context(|ctx| ctx.delete_sampler(sampler.name));
        log::debug!("Device: Destroyed sampler with ID: {id:?}");
        Ok(())
    }

    // --- Device memory ---

    /// Allocates device memory. Host-visible memory keeps a host shadow copy.
    pub fn allocate_memory(&self, info: MemoryAllocateInfo) -> Result<DeviceMemoryId, ResourceError> {
        let id = DeviceMemoryId(self.shared.memories.next_id());
        self.shared
            .memories
            .insert(id.0, Arc::new(DeviceMemoryObject::new(id, info)));
        log::info!(
            "Device: Allocated memory with ID: {id:?}, size: {} bytes, {:?}",
            info.size,
            info.properties
        );
        Ok(id)
    }

    /// Frees an allocation. The resource bound to it keeps its storage until destroyed.
    pub fn free_memory(&self, id: DeviceMemoryId) -> Result<(), ResourceError> {
        self.shared.memories.remove(id.0)?;
        log::debug!("Device: Freed memory with ID: {id:?}");
        Ok(())
    }

    /// Binds `memory` to `buffer` and allocates the buffer's storage.
    pub fn bind_buffer_memory(&self, buffer: BufferId, memory: DeviceMemoryId, offset: u64) -> Result<(), ResourceError> {
        let buffer = self.shared.buffers.fetch(buffer.0)?;
        let memory = self.shared.memories.fetch(memory.0)?;
        let name = self
            .shared
            .with_context(|ctx| memory.bind_buffer(ctx, buffer.clone(), offset))?;
        log::debug!("Device: Bound {:?} to {:?} at offset {offset}, object {name:?}", buffer.id, memory.id);
        Ok(())
    }

    /// Binds `memory` to `texture` and allocates the texture's storage.
    pub fn bind_texture_memory(&self, texture: TextureId, memory: DeviceMemoryId, offset: u64) -> Result<(), ResourceError> {
        let texture = self.shared.textures.fetch(texture.0)?;
        let memory = self.shared.memories.fetch(memory.0)?;
        let name = self
            .shared
            .with_context(|ctx| memory.bind_texture(ctx, texture.clone(), offset))?;
        log::debug!("Device: Bound {:?} to {:?} at offset {offset}, object {name:?}", texture.id, memory.id);
        Ok(())
    }

    /// Locks a range of host-visible memory. `None` locks up to the end of the allocation.
    pub fn lock_memory(&self, memory: DeviceMemoryId, offset: u64, size: Option<u64>) -> Result<MemoryMap, ResourceError> {
        let memory = self.shared.memories.fetch(memory.0)?;
        let range = self.shared.with_context(|ctx| memory.lock(ctx, offset, size))?;
        Ok(MemoryMap::new(memory, range))
    }

    /// Ends a lock. Coherent memory uploads the locked range first.
    pub fn unlock_memory(&self, memory: DeviceMemoryId) -> Result<(), ResourceError> {
        let memory = self.shared.memories.fetch(memory.0)?;
        self.shared.with_context(|ctx| memory.unlock(ctx))
    }

    /// Makes host writes to the ranges visible to the device.
    pub fn flush_mapped_memory_ranges(&self, ranges: &[MappedMemoryRange]) -> Result<(), ResourceError> {
        for range in ranges {
            let memory = self.shared.memories.fetch(range.memory.0)?;
            self.shared
                .with_context(|ctx| memory.flush(ctx, range.offset, range.size))?;
        }
        Ok(())
    }

    /// Makes device writes to the ranges visible to the host.
    pub fn invalidate_mapped_memory_ranges(&self, ranges: &[MappedMemoryRange]) -> Result<(), ResourceError> {
        for range in ranges {
            let memory = self.shared.memories.fetch(range.memory.0)?;
            self.shared
                .with_context(|ctx| memory.invalidate(ctx, range.offset, range.size))?;
        }
        Ok(())
    }

    // --- Shaders and pipelines ---

    /// Creates and compiles a shader module.
    pub fn create_shader_module(&self, descriptor: &ShaderModuleDescriptor) -> Result<ShaderModuleId, ResourceError> {
        let id = ShaderModuleId(self.shared.shader_modules.next_id());
        let label = descriptor
            .label
            .clone()
            .unwrap_or_else(|| format!("shader module #{}", id.0));
        let module = self.shared.with_context(|ctx| {
            ShaderModuleObject::compile(ctx, id, label, descriptor.stage, &descriptor.source)
        })?;
        log::info!("Device: Created shader module '{}' with ID: {:?}", module.label, id);
        self.shared.shader_modules.insert(id.0, Arc::new(module));
        Ok(id)
    }

    /// Destroys a shader module.
    pub fn destroy_shader_module(&self, id: ShaderModuleId) -> Result<(), ResourceError> {
        let module = self
            .shared
            .shader_modules
            .remove(id.0)
            .map_err(|_| ShaderError::NotFound { id })?;
        self.shared.with_context(|ctx| ctx.delete_shader(module.shader));
        log::debug!("Device: Destroyed shader module with ID: {id:?}");
        Ok(())
    }

    /// Creates a pipeline layout from set layouts and push-constant ranges.
    pub fn create_pipeline_layout(&self, descriptor: &PipelineLayoutDescriptor) -> Result<PipelineLayoutId, ResourceError> {
        let set_layouts = descriptor
            .set_layouts
            .iter()
            .map(|id| self.shared.set_layouts.fetch(id.0))
            .collect::<Result<Vec<_>, _>>()?;
        let id = PipelineLayoutId(self.shared.pipeline_layouts.next_id());
        log::debug!(
            "Device: Created pipeline layout '{}' with ID: {:?}, {} set layouts",
            descriptor.label.as_deref().unwrap_or_default(),
            id,
            set_layouts.len()
        );
        self.shared.pipeline_layouts.insert(
            id.0,
            Arc::new(PipelineLayoutObject {
                id,
                set_layouts,
                push_constant_ranges: descriptor.push_constant_ranges.clone(),
            }),
        );
        Ok(id)
    }

    /// Destroys a pipeline layout.
    pub fn destroy_pipeline_layout(&self, id: PipelineLayoutId) -> Result<(), ResourceError> {
        self.shared
            .pipeline_layouts
            .remove(id.0)
            .map_err(|_| PipelineError::InvalidLayout { id })?;
        log::debug!("Device: Destroyed pipeline layout with ID: {id:?}");
        Ok(())
    }

    /// Links the program of a graphics pipeline and, when the settings ask for
    /// it, validates it against the vertex layout and the render pass.
    pub fn create_graphics_pipeline(&self, descriptor: GraphicsPipelineDescriptor) -> Result<PipelineId, ResourceError> {
        let layout = self
            .shared
            .pipeline_layouts
            .get(descriptor.layout.0)
            .ok_or(PipelineError::InvalidLayout { id: descriptor.layout })?;
        let render_pass = self
            .shared
            .render_passes
            .get(descriptor.render_pass.0)
            .ok_or(PipelineError::InvalidRenderPass {
                id: descriptor.render_pass,
            })?;
        let modules = descriptor
            .stages
            .iter()
            .map(|stage| {
                self.shared
                    .shader_modules
                    .get(stage.module.0)
                    .ok_or(ShaderError::NotFound { id: stage.module })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let id = PipelineId(self.shared.pipelines.next_id());
        let label = descriptor.label.clone().unwrap_or_default();
        let validate = self.shared.settings.validate_pipelines;
        let pipeline = self.shared.with_context(|ctx| {
            GraphicsPipelineObject::create(ctx, id, descriptor, layout, &render_pass, &modules, validate)
        })?;
        log::info!("Device: Created graphics pipeline '{label}' with ID: {id:?}");
        self.shared.pipelines.insert(id.0, Arc::new(pipeline));
        Ok(id)
    }

    /// Destroys a pipeline.
    pub fn destroy_pipeline(&self, id: PipelineId) -> Result<(), ResourceError> {
        let pipeline = self.shared.pipelines.remove(id.0)?;
        self.shared.with_context(|ctx| pipeline.program.destroy(ctx));
        log::debug!("Device: Destroyed graphics pipeline with ID: {id:?}");
        Ok(())
    }

    /// Links a compute program and bakes its specialization constants.
    pub fn create_compute_pipeline(&self, descriptor: &ComputePipelineDescriptor) -> Result<ComputePipelineId, ResourceError> {
        let layout = self
            .shared
            .pipeline_layouts
            .get(descriptor.layout.0)
            .ok_or(PipelineError::InvalidLayout { id: descriptor.layout })?;
        let module = self
            .shared
            .shader_modules
            .get(descriptor.stage.module.0)
            .ok_or(ShaderError::NotFound {
                id: descriptor.stage.module,
            })?;
        let id = ComputePipelineId(self.shared.compute_pipelines.next_id());
        let pipeline = self
            .shared
            .with_context(|ctx| ComputePipelineObject::create(ctx, id, descriptor, layout, &module))?;
        log::info!(
            "Device: Created compute pipeline '{}' with ID: {:?}",
            descriptor.label.as_deref().unwrap_or_default(),
            id
        );
        self.shared.compute_pipelines.insert(id.0, Arc::new(pipeline));
        Ok(id)
    }

    /// Destroys a compute pipeline.
    pub fn destroy_compute_pipeline(&self, id: ComputePipelineId) -> Result<(), ResourceError> {
        let pipeline = self.shared.compute_pipelines.remove(id.0)?;
        self.shared.with_context(|ctx| pipeline.program.destroy(ctx));
        log::debug!("Device: Destroyed compute pipeline with ID: {id:?}");
        Ok(())
    }

    // --- Render passes and framebuffers ---

    /// Creates a render pass after checking its attachment references.
    pub fn create_render_pass(&self, descriptor: RenderPassDescriptor) -> Result<RenderPassId, ResourceError> {
        let id = RenderPassId(self.shared.render_passes.next_id());
        let label = descriptor.label.clone().unwrap_or_default();
        let render_pass = RenderPassObject::new(id, descriptor)?;
        log::info!(
            "Device: Created render pass '{label}' with ID: {id:?}, {} attachments, {} subpasses",
            render_pass.attachments().len(),
            render_pass.subpass_count()
        );
        self.shared.render_passes.insert(id.0, Arc::new(render_pass));
        Ok(id)
    }

    /// Destroys a render pass.
    pub fn destroy_render_pass(&self, id: RenderPassId) -> Result<(), ResourceError> {
        self.shared.render_passes.remove(id.0)?;
        log::debug!("Device: Destroyed render pass with ID: {id:?}");
        Ok(())
    }

    /// Creates a framebuffer. Fails when the views do not match the render
    /// pass, or when the driver reports the framebuffer incomplete.
    pub fn create_framebuffer(&self, descriptor: &FramebufferDescriptor) -> Result<FramebufferId, ResourceError> {
        let render_pass = self.shared.render_passes.fetch(descriptor.render_pass.0)?;
        let views = descriptor
            .attachments
            .iter()
            .map(|id| self.shared.texture_views.fetch(id.0))
            .collect::<Result<Vec<_>, _>>()?;
        let id = FramebufferId(self.shared.framebuffers.next_id());
        let framebuffer = self.shared.with_context(|ctx| {
            FrameBufferObject::create(ctx, id, &render_pass, views, descriptor.extent)
        })?;
        log::info!(
            "Device: Created framebuffer with ID: {:?}, {}",
            id,
            if framebuffer.name.is_some() { "offscreen" } else { "back buffer" }
        );
        self.shared.framebuffers.insert(id.0, Arc::new(framebuffer));
        Ok(id)
    }

    /// Destroys a framebuffer.
    pub fn destroy_framebuffer(&self, id: FramebufferId) -> Result<(), ResourceError> {
        let framebuffer = self.shared.framebuffers.remove(id.0)?;
        self.shared.with_context(|ctx| framebuffer.destroy(ctx));
        log::debug!("Device: Destroyed framebuffer with ID: {id:?}");
        Ok(())
    }

    // --- Descriptors ---

    /// Creates a descriptor set layout.
    pub fn create_descriptor_set_layout(
        &self,
        descriptor: &DescriptorSetLayoutDescriptor,
    ) -> Result<DescriptorSetLayoutId, ResourceError> {
        let id = DescriptorSetLayoutId(self.shared.set_layouts.next_id());
        self.shared.set_layouts.insert(
            id.0,
            Arc::new(DescriptorSetLayoutObject {
                id,
                bindings: descriptor.bindings.clone(),
            }),
        );
        log::debug!("Device: Created descriptor set layout with ID: {id:?}");
        Ok(id)
    }

    /// Destroys a descriptor set layout.
    pub fn destroy_descriptor_set_layout(&self, id: DescriptorSetLayoutId) -> Result<(), ResourceError> {
        self.shared.set_layouts.remove(id.0)?;
        log::debug!("Device: Destroyed descriptor set layout with ID: {id:?}");
        Ok(())
    }

    /// Creates a pool holding at most `max_sets` sets.
    pub fn create_descriptor_pool(&self, descriptor: &DescriptorPoolDescriptor) -> Result<DescriptorPoolId, ResourceError> {
        let id = DescriptorPoolId(self.shared.descriptor_pools.next_id());
        self.shared
            .descriptor_pools
            .insert(id.0, Arc::new(DescriptorPoolObject::new(id, descriptor.max_sets)));
        log::debug!("Device: Created descriptor pool with ID: {id:?}, {} sets", descriptor.max_sets);
        Ok(id)
    }

    /// Destroys a pool and every set allocated from it.
    pub fn destroy_descriptor_pool(&self, id: DescriptorPoolId) -> Result<(), ResourceError> {
        self.reset_descriptor_pool(id)?;
        self.shared.descriptor_pools.remove(id.0)?;
        log::debug!("Device: Destroyed descriptor pool with ID: {id:?}");
        Ok(())
    }

    /// Frees every set allocated from a pool.
    pub fn reset_descriptor_pool(&self, id: DescriptorPoolId) -> Result<(), ResourceError> {
        let pool = self.shared.descriptor_pools.fetch(id.0)?;
        for set in pool.reset() {
            // Sets already freed individually are gone from the registry.
            let _ = self.shared.descriptor_sets.remove(set.0);
        }
        Ok(())
    }

    /// Allocates one set per layout from `pool`.
    pub fn allocate_descriptor_sets(
        &self,
        pool: DescriptorPoolId,
        layouts: &[DescriptorSetLayoutId],
    ) -> Result<Vec<DescriptorSetId>, ResourceError> {
        let pool = self.shared.descriptor_pools.fetch(pool.0)?;
        let layouts = layouts
            .iter()
            .map(|id| self.shared.set_layouts.fetch(id.0))
            .collect::<Result<Vec<_>, _>>()?;
        pool.reserve(layouts.len())?;
        let ids = layouts
            .into_iter()
            .map(|layout| {
                let id = DescriptorSetId(self.shared.descriptor_sets.next_id());
                self.shared
                    .descriptor_sets
                    .insert(id.0, Arc::new(DescriptorSetObject::new(id, pool.id, layout)));
                pool.track(id);
                id
            })
            .collect();
        Ok(ids)
    }

    /// Returns sets to their pool.
    pub fn free_descriptor_sets(&self, pool: DescriptorPoolId, sets: &[DescriptorSetId]) -> Result<(), ResourceError> {
        let pool = self.shared.descriptor_pools.fetch(pool.0)?;
        for set in sets {
            if !pool.release(*set) {
                log::warn!("Device: descriptor set {set:?} does not belong to {:?}, not freed", pool.id);
                continue;
            }
            self.shared.descriptor_sets.remove(set.0)?;
        }
        Ok(())
    }

    /// Writes resources to descriptor sets.
    ///
    /// Writes of a type the set layout does not declare at the binding are
    /// skipped with a warning.
    pub fn update_descriptor_sets(&self, writes: &[WriteDescriptorSet]) -> Result<(), ResourceError> {
        for write in writes {
            let set = self.shared.descriptor_sets.fetch(write.set.0)?;
            match set.layout.binding(write.binding) {
                Some(binding) if binding.descriptor_type != write.descriptor_type => {
                    log::warn!(
                        "Device: binding {} of {:?} holds {:?}, a {:?} write was skipped",
                        write.binding,
                        set.id,
                        binding.descriptor_type,
                        write.descriptor_type
                    );
                    continue;
                }
                None => {
                    log::warn!("Device: {:?} has no binding {}, write skipped", set.id, write.binding);
                    continue;
                }
                Some(_) => {}
            }

            match &write.resources {
                DescriptorResources::Images(images) => {
                    for (element, info) in (write.array_element..).zip(images) {
                        if let Some(entry) = self.image_entry(write.descriptor_type, info)? {
                            set.write(write.binding, element, entry);
                        }
                    }
                }
                DescriptorResources::Buffers(buffers) => {
                    if !write.descriptor_type.is_buffer() {
                        log::warn!("Device: buffers written to {:?} descriptor, skipped", write.descriptor_type);
                        continue;
                    }
                    for (element, info) in (write.array_element..).zip(buffers) {
                        let buffer = self.shared.buffers.fetch(info.buffer.0)?;
                        set.write(
                            write.binding,
                            element,
                            DescriptorEntry::Buffer {
                                ty: write.descriptor_type,
                                buffer,
                                offset: info.offset,
                                range: info.range,
                            },
                        );
                    }
                }
            }
        }
        Ok(())
    }

    fn image_entry(&self, ty: DescriptorType, info: &DescriptorImageInfo) -> Result<Option<DescriptorEntry>, ResourceError> {
        let sampler = info
            .sampler
            .map(|id| self.shared.samplers.fetch(id.0))
            .transpose()?;
        let view = info
            .view
            .map(|id| self.shared.texture_views.fetch(id.0))
            .transpose()?;
        let entry = match (ty, sampler, view) {
            (DescriptorType::Sampler, Some(sampler), _) => DescriptorEntry::Sampler(sampler),
            (DescriptorType::StorageImage, _, Some(view)) => DescriptorEntry::StorageImage(view),
            (
                DescriptorType::CombinedImageSampler | DescriptorType::SampledImage | DescriptorType::InputAttachment,
                sampler,
                Some(view),
            ) => DescriptorEntry::Texture { view, sampler },
            (ty, _, _) => {
                log::warn!("Device: incomplete image info for a {ty:?} descriptor, skipped");
                return Ok(None);
            }
        };
        Ok(Some(entry))
    }

    // --- Synchronisation ---

    /// Creates a fence, optionally already signaled.
    pub fn create_fence(&self, signaled: bool) -> Result<FenceId, ResourceError> {
        let id = FenceId(self.shared.fences.next_id());
        self.shared.fences.insert(id.0, Arc::new(FenceObject::new(id, signaled)));
        Ok(id)
    }

    /// Destroys a fence.
    pub fn destroy_fence(&self, id: FenceId) -> Result<(), ResourceError> {
        let fence = self.shared.fences.remove(id.0)?;
        self.shared.with_context(|ctx| fence.reset(ctx));
        Ok(())
    }

    /// Waits for all, or any, of `fences`. `None` uses the default timeout of the settings.
    pub fn wait_for_fences(&self, fences: &[FenceId], wait_all: bool, timeout_ns: Option<u64>) -> Result<WaitResult, ResourceError> {
        let fences = fences
            .iter()
            .map(|id| self.shared.fences.fetch(id.0))
            .collect::<Result<Vec<_>, _>>()?;
        if !wait_all && fences.iter().any(|fence| fence.is_signaled()) {
            return Ok(WaitResult::Success);
        }
        let timeout = timeout_ns.unwrap_or(self.shared.settings.default_fence_timeout_ns);
        let result = self.shared.with_context(|ctx| {
            if wait_all {
                for fence in &fences {
                    match fence.wait(ctx, timeout) {
                        WaitResult::Success => {}
                        other => return other,
                    }
                }
                return WaitResult::Success;
            }
            // Any fence will do: poll them all, then split the budget so the
            // whole wait stays within `timeout`.
            let share = timeout / fences.len().max(1) as u64;
            for budget in [0, share] {
                for fence in &fences {
                    match fence.wait(ctx, budget) {
                        WaitResult::Timeout => {}
                        other => return other,
                    }
                }
            }
            WaitResult::Timeout
        });
        Ok(result)
    }

    /// Puts fences back in the unsignaled state.
    pub fn reset_fences(&self, fences: &[FenceId]) -> Result<(), ResourceError> {
        for id in fences {
            let fence = self.shared.fences.fetch(id.0)?;
            self.shared.with_context(|ctx| fence.reset(ctx));
        }
        Ok(())
    }

    /// Polls a fence without blocking.
    pub fn fence_status(&self, id: FenceId) -> Result<bool, ResourceError> {
        let fence = self.shared.fences.fetch(id.0)?;
        Ok(fence.is_signaled() || self.shared.with_context(|ctx| fence.wait(ctx, 0)) == WaitResult::Success)
    }

    /// Creates a semaphore.
    pub fn create_semaphore(&self) -> Result<SemaphoreId, ResourceError> {
        let id = SemaphoreId(self.shared.semaphores.next_id());
        self.shared.semaphores.insert(id.0, Arc::new(SemaphoreObject { id }));
        Ok(id)
    }

    /// Destroys a semaphore.
    pub fn destroy_semaphore(&self, id: SemaphoreId) -> Result<(), ResourceError> {
        self.shared.semaphores.remove(id.0)?;
        Ok(())
    }

    // --- Queries ---

    /// Creates a pool of occlusion or timestamp queries.
    pub fn create_query_pool(&self, descriptor: &QueryPoolDescriptor) -> Result<QueryPoolId, ResourceError> {
        let id = QueryPoolId(self.shared.query_pools.next_id());
        let pool = self
            .shared
            .with_context(|ctx| QueryPoolObject::create(ctx, id, descriptor))?;
        log::debug!("Device: Created {:?} query pool with ID: {id:?}, {} queries", descriptor.query_type, descriptor.count);
        self.shared.query_pools.insert(id.0, Arc::new(pool));
        Ok(id)
    }

    /// Destroys a query pool.
    pub fn destroy_query_pool(&self, id: QueryPoolId) -> Result<(), ResourceError> {
        let pool = self.shared.query_pools.remove(id.0)?;
        self.shared.with_context(|ctx| pool.destroy(ctx));
        log::debug!("Device: Destroyed query pool with ID: {id:?}");
        Ok(())
    }

    /// Reads query results. Results not available yet are `None`.
    pub fn get_query_results(
        &self,
        pool: QueryPoolId,
        first_query: u32,
        query_count: u32,
        flags: QueryResultFlags,
    ) -> Result<Vec<Option<u64>>, ResourceError> {
        let pool = self.shared.query_pools.fetch(pool.0)?;
        self.shared
            .with_context(|ctx| pool.results(ctx, first_query, query_count, flags))
    }

    // --- Swap chains ---

    /// Creates a swap chain whose images all stand for the back buffer.
    pub fn create_swap_chain(&self, descriptor: &SwapChainDescriptor) -> Result<SwapChainId, ResourceError> {
        let id = SwapChainId(self.shared.swapchains.next_id());
        let images = (0..descriptor.image_count.max(1))
            .map(|index| {
                let image = TextureId(self.shared.textures.next_id());
                let texture = TextureDescriptor {
                    label: Some(format!("swap chain image {index}")),
                    ..TextureDescriptor::new_2d(
                        descriptor.format,
                        descriptor.extent.width,
                        descriptor.extent.height,
                        TextureUsage::COLOR_ATTACHMENT | TextureUsage::TRANSFER_DST,
                    )
                };
                self.shared
                    .textures
                    .insert(image.0, Arc::new(TextureObject::new(image, texture, true)));
                image
            })
            .collect();
        log::info!(
            "Device: Created swap chain with ID: {id:?}, {}x{} {:?}",
            descriptor.extent.width,
            descriptor.extent.height,
            descriptor.format
        );
        self.shared
            .swapchains
            .insert(id.0, Arc::new(SwapChainObject::new(id, descriptor.clone(), images)));
        Ok(id)
    }

    /// Destroys a swap chain.
    pub fn destroy_swap_chain(&self, id: SwapChainId) -> Result<(), ResourceError> {
        let swapchain = self.shared.swapchains.remove(id.0)?;
        for image in &swapchain.images {
            let _ = self.shared.textures.remove(image.0);
        }
        log::debug!("Device: Destroyed swap chain with ID: {id:?}");
        Ok(())
    }

    /// The presentable images of a swap chain.
    pub fn swap_chain_images(&self, id: SwapChainId) -> Result<Vec<TextureId>, ResourceError> {
        Ok(self.shared.swapchains.fetch(id.0)?.images.clone())
    }

    /// Returns the index of the next image to render to.
    pub fn acquire_next_image(&self, id: SwapChainId) -> Result<u32, ResourceError> {
        Ok(self.shared.swapchains.fetch(id.0)?.acquire_next_image())
    }

    // --- Command pools ---

    /// Creates a command pool for buffers submitted to `queue`.
    pub fn create_command_pool(&self, queue: QueueKind) -> CommandPool {
        let id = CommandPoolId(self.shared.next_command_pool.fetch_add(1, Ordering::Relaxed));
        log::debug!("Device: Created command pool with ID: {id:?} for {queue:?}");
        CommandPool::new(id, queue, self.shared.clone())
    }
}
