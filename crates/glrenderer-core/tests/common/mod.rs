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

//! Shared fixture for the device integration tests.
//!
//! Every test drives a [`Device`] built over a [`TraceContext`], then inspects
//! the OpenGL calls the trace recorded.

#![allow(dead_code)]

use glrenderer_core::api::*;
use glrenderer_core::gl::{GlCall, GlName, ObjectKind};
use glrenderer_core::{CommandBuffer, Device, TraceContext};

pub const WIDTH: u32 = 64;
pub const HEIGHT: u32 = 64;

/// Installs a test logger once per binary.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A device with one cleared colour render pass and a matching framebuffer.
pub struct Fixture {
    pub trace: TraceContext,
    pub device: Device,
    pub layout: PipelineLayoutId,
    pub render_pass: RenderPassId,
    pub framebuffer: FramebufferId,
    pub vertex_shader: ShaderModuleId,
    pub fragment_shader: ShaderModuleId,
    /// The vertex array the device draws with when no geometry is bound.
    pub empty_vao: GlName,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_context(TraceContext::new(), DeviceSettings::default())
    }

    pub fn with_context(trace: TraceContext, settings: DeviceSettings) -> Self {
        init_logging();
        let device = Device::new(Box::new(trace.clone()), settings).expect("device over a trace context");
        let empty_vao = trace
            .calls()
            .into_iter()
            .find_map(|call| match call {
                GlCall::Create {
                    kind: ObjectKind::VertexArray,
                    name,
                } => Some(name),
                _ => None,
            })
            .expect("the device creates its empty vertex array");

        let layout = device
            .create_pipeline_layout(&PipelineLayoutDescriptor::default())
            .expect("pipeline layout");
        let render_pass = device
            .create_render_pass(RenderPassDescriptor {
                label: Some("fixture".to_string()),
                attachments: vec![AttachmentDescription::cleared(
                    Format::Rgba8Unorm,
                    ImageLayout::ColorAttachmentOptimal,
                )],
                subpasses: vec![SubpassDescription {
                    color_attachments: vec![AttachmentReference {
                        attachment: 0,
                        layout: ImageLayout::ColorAttachmentOptimal,
                    }],
                    ..Default::default()
                }],
                ..Default::default()
            })
            .expect("render pass");

        let texture = device
            .create_texture(&TextureDescriptor::new_2d(
                Format::Rgba8Unorm,
                WIDTH,
                HEIGHT,
                TextureUsage::COLOR_ATTACHMENT | TextureUsage::TRANSFER_DST,
            ))
            .expect("colour texture");
        bind_new_memory_to_texture(&device, texture, MemoryPropertyFlags::DEVICE_LOCAL);
        let view = device
            .create_texture_view(&TextureViewDescriptor {
                texture,
                dimension: TextureViewDimension::D2,
                format: Format::Rgba8Unorm,
                subresource_range: ImageSubresourceRange::single(ImageAspectFlags::COLOR),
            })
            .expect("colour view");
        let framebuffer = device
            .create_framebuffer(&FramebufferDescriptor {
                render_pass,
                attachments: vec![view],
                extent: Extent2D::new(WIDTH, HEIGHT),
                layers: 1,
            })
            .expect("framebuffer");

        let vertex_shader = shader(&device, ShaderStage::Vertex);
        let fragment_shader = shader(&device, ShaderStage::Fragment);

        Self {
            trace,
            device,
            layout,
            render_pass,
            framebuffer,
            vertex_shader,
            fragment_shader,
            empty_vao,
        }
    }

    /// A graphics pipeline over the fixture shaders, tweaked by `configure`.
    pub fn pipeline_with(
        &self,
        vertex_input: VertexInputState,
        configure: impl FnOnce(&mut GraphicsPipelineDescriptor),
    ) -> PipelineId {
        let mut descriptor = GraphicsPipelineDescriptor::new(
            self.layout,
            vec![
                ShaderStageDescriptor::new(self.vertex_shader),
                ShaderStageDescriptor::new(self.fragment_shader),
            ],
            vertex_input,
            self.render_pass,
        );
        configure(&mut descriptor);
        self.device
            .create_graphics_pipeline(descriptor)
            .expect("graphics pipeline")
    }

    pub fn pipeline(&self, vertex_input: VertexInputState) -> PipelineId {
        self.pipeline_with(vertex_input, |_| {})
    }

    /// A buffer of `size` bytes backed by its own host-visible memory.
    pub fn buffer(&self, size: u64, usage: BufferUsage) -> (BufferId, DeviceMemoryId) {
        let buffer = self
            .device
            .create_buffer(&BufferDescriptor {
                label: None,
                size,
                usage,
            })
            .expect("buffer");
        let memory = self
            .device
            .allocate_memory(MemoryAllocateInfo {
                size,
                properties: MemoryPropertyFlags::HOST_VISIBLE | MemoryPropertyFlags::HOST_COHERENT,
            })
            .expect("memory");
        self.device
            .bind_buffer_memory(buffer, memory, 0)
            .expect("bind buffer memory");
        (buffer, memory)
    }

    pub fn vertex_buffer(&self) -> BufferId {
        self.buffer(1024, BufferUsage::VERTEX).0
    }

    pub fn render_pass_begin(&self, clear: [f32; 4]) -> RenderPassBeginInfo {
        RenderPassBeginInfo {
            render_pass: self.render_pass,
            framebuffer: self.framebuffer,
            render_area: Rect2D::from_extent(Extent2D::new(WIDTH, HEIGHT)),
            clear_values: vec![ClearValue::Color(ClearColorValue::Float(clear))],
        }
    }

    /// Submits `buffers` on the graphics queue and returns the OpenGL calls of the replay.
    pub fn replay(&self, buffers: &[&CommandBuffer]) -> (ReplayStats, Vec<GlCall>) {
        self.trace.clear_calls();
        let stats = self
            .device
            .queue(QueueKind::Graphics)
            .submit(buffers, &[], &[], None)
            .expect("submission");
        (stats, self.trace.take_calls())
    }
}

/// One tightly packed `vec3` attribute at location 0, read from binding 0.
pub fn position_layout(stride: u32) -> VertexInputState {
    VertexInputState {
        bindings: vec![VertexBindingDescription {
            binding: 0,
            stride,
            step_mode: VertexStepMode::Vertex,
        }],
        attributes: vec![VertexAttributeDescription {
            location: 0,
            binding: 0,
            format: VertexFormat::Float32x3,
            offset: 0,
        }],
    }
}

pub fn shader(device: &Device, stage: ShaderStage) -> ShaderModuleId {
    device
        .create_shader_module(&ShaderModuleDescriptor {
            label: Some(format!("{stage:?}")),
            stage,
            source: "#version 450\nvoid main() {}\n".to_string(),
        })
        .expect("shader module")
}

pub fn bind_new_memory_to_texture(device: &Device, texture: TextureId, properties: MemoryPropertyFlags) {
    let requirements = device
        .texture_memory_requirements(texture)
        .expect("texture requirements");
    let memory = device
        .allocate_memory(MemoryAllocateInfo {
            size: requirements.size,
            properties,
        })
        .expect("texture memory");
    device
        .bind_texture_memory(texture, memory, 0)
        .expect("bind texture memory");
}

/// Index of the first call matching `predicate`.
pub fn position_of(calls: &[GlCall], predicate: impl Fn(&GlCall) -> bool) -> Option<usize> {
    calls.iter().position(predicate)
}
