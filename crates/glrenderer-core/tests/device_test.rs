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

//! Integration tests for the device: memory, pipelines, framebuffers,
//! synchronisation, queries and presentation.

mod common;

use common::{position_layout, Fixture, HEIGHT, WIDTH};
use glrenderer_core::api::*;
use glrenderer_core::gl::enums as gl;
use glrenderer_core::gl::{GlCall, GlFeature, GlName, ObjectKind, ProgramResource};
use glrenderer_core::{PipelineError, ResourceError, TraceContext};

/// Name of the last OpenGL buffer the trace created.
fn last_buffer_name(trace: &TraceContext) -> GlName {
    trace
        .calls()
        .into_iter()
        .rev()
        .find_map(|call| match call {
            GlCall::Create {
                kind: ObjectKind::Buffer,
                name,
            } => Some(name),
            _ => None,
        })
        .expect("a buffer was created")
}

fn allocate(fixture: &Fixture, size: u64, properties: MemoryPropertyFlags) -> DeviceMemoryId {
    fixture
        .device
        .allocate_memory(MemoryAllocateInfo { size, properties })
        .expect("memory")
}

fn buffer(fixture: &Fixture, size: u64) -> BufferId {
    fixture
        .device
        .create_buffer(&BufferDescriptor {
            label: None,
            size,
            usage: BufferUsage::VERTEX | BufferUsage::TRANSFER_DST,
        })
        .expect("buffer")
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_memory_binds_a_single_resource() {
    let fixture = Fixture::new();
    let memory = allocate(&fixture, 256, MemoryPropertyFlags::DEVICE_LOCAL);
    let first = buffer(&fixture, 64);
    let second = buffer(&fixture, 64);

    fixture
        .device
        .bind_buffer_memory(first, memory, 0)
        .expect("first bind");
    let result = fixture.device.bind_buffer_memory(second, memory, 128);
    assert!(
        matches!(result, Err(ResourceError::MemoryAlreadyBound { memory: bound }) if bound == memory),
        "A second bind on the same memory must fail, got {result:?}"
    );
}

#[test]
fn test_memory_too_small_is_rejected() {
    let fixture = Fixture::new();
    let memory = allocate(&fixture, 64, MemoryPropertyFlags::DEVICE_LOCAL);
    let large = buffer(&fixture, 128);

    let result = fixture.device.bind_buffer_memory(large, memory, 0);
    assert!(
        matches!(result, Err(ResourceError::MemoryTooSmall { required: 128, available: 64 })),
        "got {result:?}"
    );
}

#[test]
fn test_locked_writes_reach_the_buffer_after_a_flush() -> anyhow::Result<()> {
    let fixture = Fixture::new();
    let memory = allocate(&fixture, 64, MemoryPropertyFlags::HOST_VISIBLE);
    let target = buffer(&fixture, 64);
    fixture.device.bind_buffer_memory(target, memory, 0)?;
    let name = last_buffer_name(&fixture.trace);

    let map = fixture.device.lock_memory(memory, 0, None)?;
    assert_eq!(map.size(), 64);
    map.write(4, &[1, 2, 3, 4])?;
    assert_eq!(
        fixture.trace.buffer_contents(name).map(|bytes| bytes[4..8].to_vec()),
        Some(vec![0, 0, 0, 0]),
        "Non-coherent writes stay on the host until flushed"
    );

    fixture.device.flush_mapped_memory_ranges(&[MappedMemoryRange {
        memory,
        offset: 0,
        size: None,
    }])?;
    assert_eq!(
        fixture.trace.buffer_contents(name).map(|bytes| bytes[4..8].to_vec()),
        Some(vec![1, 2, 3, 4])
    );

    fixture.device.unlock_memory(memory)?;
    assert!(
        matches!(map.write(0, &[9]), Err(ResourceError::NotMapped)),
        "A map is unusable once the memory is unlocked"
    );
    Ok(())
}

#[test]
fn test_device_local_memory_cannot_be_locked() {
    let fixture = Fixture::new();
    let memory = allocate(&fixture, 64, MemoryPropertyFlags::DEVICE_LOCAL);
    let result = fixture.device.lock_memory(memory, 0, None);
    assert!(matches!(result, Err(ResourceError::NotHostVisible)), "got {result:?}");
}

fn host_texture(fixture: &Fixture, properties: MemoryPropertyFlags) -> DeviceMemoryId {
    let texture = fixture
        .device
        .create_texture(&TextureDescriptor::new_2d(
            Format::Rgba8Unorm,
            4,
            4,
            TextureUsage::SAMPLED | TextureUsage::TRANSFER_DST,
        ))
        .expect("texture");
    let memory = allocate(fixture, 64, properties);
    fixture
        .device
        .bind_texture_memory(texture, memory, 0)
        .expect("bind texture memory");
    memory
}

#[test]
fn test_coherent_texture_memory_uploads_on_unlock() -> anyhow::Result<()> {
    let fixture = Fixture::new();
    let memory = host_texture(
        &fixture,
        MemoryPropertyFlags::HOST_VISIBLE | MemoryPropertyFlags::HOST_COHERENT,
    );

    let map = fixture.device.lock_memory(memory, 0, None)?;
    assert!(
        fixture.trace.calls().iter().any(|call| matches!(
            call,
            GlCall::GetTexImage { target: gl::TEXTURE_2D, level: 0, .. }
        )),
        "Locking coherent memory reads the image back"
    );
    map.write(0, &[0xFF; 64])?;
    fixture.trace.clear_calls();
    fixture.device.unlock_memory(memory)?;

    let calls = fixture.trace.calls();
    assert!(calls.iter().any(|call| matches!(
        call,
        GlCall::BufferSubData { target: gl::PIXEL_UNPACK_BUFFER, offset: 0, data } if data.len() == 64
    )));
    assert!(calls.iter().any(|call| matches!(
        call,
        GlCall::TexSubImage {
            target: gl::TEXTURE_2D,
            level: 0,
            origin: [0, 0, 0],
            size: [4, 4, 1],
            offset: 0,
            ..
        }
    )));
    Ok(())
}

#[test]
fn test_texture_memory_moves_only_on_flush_and_invalidate() -> anyhow::Result<()> {
    let fixture = Fixture::new();
    let memory = host_texture(&fixture, MemoryPropertyFlags::HOST_VISIBLE);
    let range = MappedMemoryRange {
        memory,
        offset: 0,
        size: None,
    };

    fixture.trace.clear_calls();
    let map = fixture.device.lock_memory(memory, 0, None)?;
    map.write(0, &[0x80; 64])?;
    assert_eq!(
        fixture.trace.count(|call| matches!(call, GlCall::TexSubImage { .. } | GlCall::GetTexImage { .. })),
        0,
        "Non-coherent memory waits for an explicit flush"
    );

    fixture.device.flush_mapped_memory_ranges(&[range])?;
    assert_eq!(fixture.trace.count(|call| matches!(call, GlCall::TexSubImage { .. })), 1);

    fixture.device.invalidate_mapped_memory_ranges(&[range])?;
    assert_eq!(fixture.trace.count(|call| matches!(call, GlCall::GetTexImage { .. })), 1);
    fixture.device.unlock_memory(memory)?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Pipelines and framebuffers
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_pipeline_validation_reports_unlisted_attributes() {
    let trace = TraceContext::new();
    let fixture = Fixture::with_context(
        trace.clone(),
        DeviceSettings {
            validate_pipelines: true,
            ..Default::default()
        },
    );
    trace.set_program_interface(
        vec![ProgramResource {
            name: "normal".to_string(),
            gl_type: gl::FLOAT_VEC3,
            location: 1,
        }],
        Vec::new(),
    );

    let descriptor = GraphicsPipelineDescriptor::new(
        fixture.layout,
        vec![
            ShaderStageDescriptor::new(fixture.vertex_shader),
            ShaderStageDescriptor::new(fixture.fragment_shader),
        ],
        position_layout(12),
        fixture.render_pass,
    );
    match fixture.device.create_graphics_pipeline(descriptor) {
        Err(ResourceError::Pipeline(PipelineError::Validation(message))) => {
            assert!(message.contains("normal"), "The message names the attribute: {message}");
            assert!(message.contains("location: 1"), "The message names the location: {message}");
        }
        other => panic!("Expected a validation error, got {other:?}"),
    }
}

#[test]
fn test_pipeline_validation_feeds_matrix_columns_from_consecutive_locations() {
    let trace = TraceContext::new();
    let fixture = Fixture::with_context(
        trace.clone(),
        DeviceSettings {
            validate_pipelines: true,
            ..Default::default()
        },
    );
    trace.set_program_interface(
        vec![ProgramResource {
            name: "model".to_string(),
            gl_type: gl::FLOAT_MAT4,
            location: 0,
        }],
        vec![ProgramResource {
            name: "color".to_string(),
            gl_type: gl::FLOAT_VEC4,
            location: 0,
        }],
    );
    let instanced = VertexInputState {
        bindings: vec![VertexBindingDescription {
            binding: 0,
            stride: 64,
            step_mode: VertexStepMode::Instance,
        }],
        attributes: (0..4)
            .map(|column| VertexAttributeDescription {
                location: column,
                binding: 0,
                format: VertexFormat::Float32x4,
                offset: column * 16,
            })
            .collect(),
    };

    let descriptor = GraphicsPipelineDescriptor::new(
        fixture.layout,
        vec![
            ShaderStageDescriptor::new(fixture.vertex_shader),
            ShaderStageDescriptor::new(fixture.fragment_shader),
        ],
        instanced,
        fixture.render_pass,
    );
    let result = fixture.device.create_graphics_pipeline(descriptor);
    assert!(result.is_ok(), "A mat4 input reads four vec4 columns, got {result:?}");
}

#[test]
fn test_pipeline_with_unknown_layout_is_rejected() {
    let fixture = Fixture::new();
    let descriptor = GraphicsPipelineDescriptor::new(
        PipelineLayoutId(404),
        vec![ShaderStageDescriptor::new(fixture.vertex_shader)],
        VertexInputState::default(),
        fixture.render_pass,
    );
    let result = fixture.device.create_graphics_pipeline(descriptor);
    assert!(
        matches!(result, Err(ResourceError::Pipeline(PipelineError::InvalidLayout { .. }))),
        "got {result:?}"
    );
}

#[test]
fn test_incomplete_framebuffer_is_rejected() {
    let fixture = Fixture::new();
    let texture = fixture
        .device
        .create_texture(&TextureDescriptor::new_2d(
            Format::Rgba8Unorm,
            WIDTH,
            HEIGHT,
            TextureUsage::COLOR_ATTACHMENT,
        ))
        .expect("texture");
    common::bind_new_memory_to_texture(&fixture.device, texture, MemoryPropertyFlags::DEVICE_LOCAL);
    let view = fixture
        .device
        .create_texture_view(&TextureViewDescriptor {
            texture,
            dimension: TextureViewDimension::D2,
            format: Format::Rgba8Unorm,
            subresource_range: ImageSubresourceRange::single(ImageAspectFlags::COLOR),
        })
        .expect("view");

    fixture
        .trace
        .set_framebuffer_status(gl::FRAMEBUFFER_INCOMPLETE_ATTACHMENT);
    let result = fixture.device.create_framebuffer(&FramebufferDescriptor {
        render_pass: fixture.render_pass,
        attachments: vec![view],
        extent: Extent2D::new(WIDTH, HEIGHT),
        layers: 1,
    });
    assert!(
        matches!(
            result,
            Err(ResourceError::IncompleteFramebuffer { status }) if status == gl::FRAMEBUFFER_INCOMPLETE_ATTACHMENT
        ),
        "got {result:?}"
    );
}

#[test]
fn test_framebuffer_view_count_must_match_the_render_pass() {
    let fixture = Fixture::new();
    let result = fixture.device.create_framebuffer(&FramebufferDescriptor {
        render_pass: fixture.render_pass,
        attachments: Vec::new(),
        extent: Extent2D::new(WIDTH, HEIGHT),
        layers: 1,
    });
    assert!(matches!(result, Err(ResourceError::FramebufferMismatch(_))), "got {result:?}");
}

#[test]
fn test_destroying_a_buffer_evicts_its_geometry() {
    let fixture = Fixture::new();
    let pipeline = fixture.pipeline(position_layout(12));
    let vertices = fixture.vertex_buffer();

    let mut cb = fixture
        .device
        .create_command_pool(QueueKind::Graphics)
        .allocate(CommandBufferLevel::Primary);
    assert!(cb.begin(CommandBufferUsageFlags::empty()));
    cb.bind_pipeline(pipeline);
    cb.bind_vertex_buffers(0, &[(vertices, 0)]);
    cb.draw(3, 1, 0, 0);
    assert!(cb.end());
    fixture.replay(&[&cb]);
    assert_eq!(fixture.device.geometry_cache_len(), 1);

    fixture.trace.clear_calls();
    fixture.device.destroy_buffer(vertices).expect("destroy");
    assert_eq!(fixture.device.geometry_cache_len(), 0, "The cached vertex array used the buffer");
    assert_eq!(
        fixture.trace.count(|call| matches!(
            call,
            GlCall::Delete {
                kind: ObjectKind::VertexArray,
                ..
            }
        )),
        1
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Transfers
// ─────────────────────────────────────────────────────────────────────────────

fn clear_red(fixture: &Fixture) -> glrenderer_core::CommandBuffer {
    let texture = fixture
        .device
        .create_texture(&TextureDescriptor::new_2d(
            Format::Rgba8Unorm,
            8,
            8,
            TextureUsage::TRANSFER_DST,
        ))
        .expect("texture");
    common::bind_new_memory_to_texture(&fixture.device, texture, MemoryPropertyFlags::DEVICE_LOCAL);

    let mut cb = fixture
        .device
        .create_command_pool(QueueKind::Graphics)
        .allocate(CommandBufferLevel::Primary);
    assert!(cb.begin(CommandBufferUsageFlags::ONE_TIME_SUBMIT));
    cb.clear_color_image(
        texture,
        ClearColorValue::Float([1.0, 0.0, 0.0, 1.0]),
        &[ImageSubresourceRange::single(ImageAspectFlags::COLOR)],
    );
    assert!(cb.end());
    cb
}

#[test]
fn test_clear_color_image_uses_clear_tex_image() {
    let fixture = Fixture::new();
    let cb = clear_red(&fixture);

    let (stats, calls) = fixture.replay(&[&cb]);
    assert_eq!(stats.commands, 1);
    let clears: Vec<&GlCall> = calls
        .iter()
        .filter(|call| matches!(call, GlCall::ClearTexImage { .. }))
        .collect();
    assert_eq!(clears.len(), 1);
    assert!(matches!(
        clears[0],
        GlCall::ClearTexImage { level: 0, format: gl::RGBA, ty: gl::FLOAT, .. }
    ));
}

#[test]
fn test_clear_color_image_is_skipped_without_clear_tex_image() {
    let fixture = Fixture::with_context(
        TraceContext::new().without_feature(GlFeature::ClearTexImage),
        DeviceSettings::default(),
    );
    assert!(!fixture.device.supports(GlFeature::ClearTexImage));
    let cb = clear_red(&fixture);

    let (stats, calls) = fixture.replay(&[&cb]);
    assert_eq!(stats.commands, 1, "The command still replays");
    assert!(
        !calls.iter().any(|call| matches!(call, GlCall::ClearTexImage { .. })),
        "No clear is issued when the context cannot clear textures"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Synchronisation and queries
// ─────────────────────────────────────────────────────────────────────────────

fn empty_buffer(fixture: &Fixture) -> glrenderer_core::CommandBuffer {
    let mut cb = fixture
        .device
        .create_command_pool(QueueKind::Graphics)
        .allocate(CommandBufferLevel::Primary);
    assert!(cb.begin(CommandBufferUsageFlags::empty()));
    assert!(cb.end());
    cb
}

#[test]
fn test_fence_is_signaled_after_a_submission() {
    let fixture = Fixture::new();
    let cb = empty_buffer(&fixture);
    let fence = fixture.device.create_fence(false).expect("fence");
    let semaphore = fixture.device.create_semaphore().expect("semaphore");

    fixture.trace.clear_calls();
    fixture
        .device
        .queue(QueueKind::Graphics)
        .submit(&[&cb], &[], &[semaphore], Some(fence))
        .expect("submit");
    assert_eq!(fixture.trace.count(|call| matches!(call, GlCall::FenceSync(_))), 1);
    assert!(!fixture.trace.calls().contains(&GlCall::Flush), "The fence replaces the flush");

    let result = fixture
        .device
        .wait_for_fences(&[fence], true, None)
        .expect("wait");
    assert_eq!(result, WaitResult::Success);
    assert_eq!(fixture.device.fence_status(fence).ok(), Some(true));

    fixture.device.reset_fences(&[fence]).expect("reset");
    assert_eq!(fixture.device.fence_status(fence).ok(), Some(false));
}

#[test]
fn test_fence_wait_times_out() {
    let fixture = Fixture::new();
    let cb = empty_buffer(&fixture);
    let fence = fixture.device.create_fence(false).expect("fence");
    fixture
        .device
        .queue(QueueKind::Graphics)
        .submit(&[&cb], &[], &[], Some(fence))
        .expect("submit");

    fixture.trace.set_wait_status(gl::TIMEOUT_EXPIRED);
    fixture.trace.clear_calls();
    let result = fixture
        .device
        .wait_for_fences(&[fence], true, Some(10))
        .expect("wait");
    assert_eq!(result, WaitResult::Timeout);
    assert!(fixture.trace.calls().iter().any(|call| matches!(
        call,
        GlCall::ClientWaitSync { timeout_ns: 10, .. }
    )));
    assert_eq!(fixture.device.fence_status(fence).ok(), Some(false));
}

#[test]
fn test_any_wait_stays_within_the_timeout() {
    let fixture = Fixture::new();
    let first = fixture.device.create_fence(false).expect("fence");
    let second = fixture.device.create_fence(false).expect("fence");

    fixture.trace.set_wait_status(gl::TIMEOUT_EXPIRED);
    fixture.trace.clear_calls();
    let result = fixture
        .device
        .wait_for_fences(&[first, second], false, Some(100))
        .expect("wait");
    assert_eq!(result, WaitResult::Timeout);

    let timeouts: Vec<u64> = fixture
        .trace
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            GlCall::ClientWaitSync { timeout_ns, .. } => Some(timeout_ns),
            _ => None,
        })
        .collect();
    assert_eq!(timeouts, vec![0, 0, 50, 50], "Every fence is polled before the budget is split");
    assert!(timeouts.iter().sum::<u64>() <= 100);
}

#[test]
fn test_signaled_fence_satisfies_any_wait_without_blocking() {
    let fixture = Fixture::new();
    let signaled = fixture.device.create_fence(true).expect("fence");
    let unsignaled = fixture.device.create_fence(false).expect("fence");

    fixture.trace.clear_calls();
    let result = fixture
        .device
        .wait_for_fences(&[unsignaled, signaled], false, None)
        .expect("wait");
    assert_eq!(result, WaitResult::Success);
    assert!(fixture.trace.calls().is_empty(), "No OpenGL wait is needed");
}

#[test]
fn test_timestamp_queries_read_back_results() {
    let fixture = Fixture::new();
    let pool = fixture
        .device
        .create_query_pool(&QueryPoolDescriptor {
            query_type: QueryType::Timestamp,
            count: 2,
        })
        .expect("query pool");

    let mut cb = fixture
        .device
        .create_command_pool(QueueKind::Graphics)
        .allocate(CommandBufferLevel::Primary);
    assert!(cb.begin(CommandBufferUsageFlags::empty()));
    cb.write_timestamp(PipelineStageFlags::TOP_OF_PIPE, pool, 0);
    cb.write_timestamp(PipelineStageFlags::BOTTOM_OF_PIPE, pool, 1);
    assert!(cb.end());

    let (_, calls) = fixture.replay(&[&cb]);
    assert_eq!(
        calls
            .iter()
            .filter(|call| matches!(call, GlCall::QueryCounter { target: gl::TIMESTAMP, .. }))
            .count(),
        2
    );

    fixture.trace.set_query_result(Some(42));
    let results = fixture
        .device
        .get_query_results(pool, 0, 2, QueryResultFlags::RESULT_64 | QueryResultFlags::WAIT)
        .expect("results");
    assert_eq!(results, vec![Some(42), Some(42)]);

    let out_of_range = fixture
        .device
        .get_query_results(pool, 1, 2, QueryResultFlags::empty());
    assert!(matches!(out_of_range, Err(ResourceError::OutOfBounds)));
}

#[test]
fn test_query_reset_range_saturates() {
    let fixture = Fixture::new();
    let pool = fixture
        .device
        .create_query_pool(&QueryPoolDescriptor {
            query_type: QueryType::Timestamp,
            count: 2,
        })
        .expect("query pool");

    let mut cb = fixture
        .device
        .create_command_pool(QueueKind::Graphics)
        .allocate(CommandBufferLevel::Primary);
    assert!(cb.begin(CommandBufferUsageFlags::empty()));
    cb.reset_query_pool(pool, u32::MAX, 2);
    assert!(cb.end());
    let (stats, _) = fixture.replay(&[&cb]);
    assert_eq!(stats.command_buffers, 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Descriptors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_descriptor_pool_is_bounded_by_max_sets() {
    let fixture = Fixture::new();
    let layout = fixture
        .device
        .create_descriptor_set_layout(&DescriptorSetLayoutDescriptor {
            bindings: vec![DescriptorSetLayoutBinding {
                binding: 0,
                descriptor_type: DescriptorType::UniformBuffer,
                count: 1,
                stages: ShaderStageFlags::VERTEX,
            }],
        })
        .expect("set layout");
    let pool = fixture
        .device
        .create_descriptor_pool(&DescriptorPoolDescriptor { max_sets: 2 })
        .expect("pool");

    let sets = fixture
        .device
        .allocate_descriptor_sets(pool, &[layout, layout])
        .expect("two sets fit");
    assert_eq!(sets.len(), 2);
    assert!(matches!(
        fixture.device.allocate_descriptor_sets(pool, &[layout]),
        Err(ResourceError::PoolExhausted)
    ));

    fixture
        .device
        .free_descriptor_sets(pool, &sets[..1])
        .expect("free");
    assert!(fixture.device.allocate_descriptor_sets(pool, &[layout]).is_ok());

    fixture.device.reset_descriptor_pool(pool).expect("reset");
    assert_eq!(
        fixture
            .device
            .allocate_descriptor_sets(pool, &[layout, layout])
            .map(|sets| sets.len())
            .ok(),
        Some(2)
    );
}

#[test]
fn test_descriptor_writes_are_checked_against_the_layout() {
    let fixture = Fixture::new();
    let layout = fixture
        .device
        .create_descriptor_set_layout(&DescriptorSetLayoutDescriptor {
            bindings: vec![DescriptorSetLayoutBinding {
                binding: 0,
                descriptor_type: DescriptorType::UniformBuffer,
                count: 1,
                stages: ShaderStageFlags::VERTEX,
            }],
        })
        .expect("set layout");
    let pool = fixture
        .device
        .create_descriptor_pool(&DescriptorPoolDescriptor { max_sets: 1 })
        .expect("pool");
    let set = fixture
        .device
        .allocate_descriptor_sets(pool, &[layout])
        .expect("set")[0];
    let (uniforms, _) = fixture.buffer(256, BufferUsage::UNIFORM);

    let good = WriteDescriptorSet {
        set,
        binding: 0,
        array_element: 0,
        descriptor_type: DescriptorType::UniformBuffer,
        resources: DescriptorResources::Buffers(vec![DescriptorBufferInfo {
            buffer: uniforms,
            offset: 0,
            range: None,
        }]),
    };
    fixture
        .device
        .update_descriptor_sets(&[good.clone()])
        .expect("matching write");

    let mismatched = WriteDescriptorSet {
        descriptor_type: DescriptorType::StorageBuffer,
        ..good.clone()
    };
    assert!(
        fixture.device.update_descriptor_sets(&[mismatched]).is_ok(),
        "A write of another descriptor type is skipped"
    );

    let dangling = WriteDescriptorSet {
        resources: DescriptorResources::Buffers(vec![DescriptorBufferInfo {
            buffer: BufferId(404),
            offset: 0,
            range: None,
        }]),
        ..good
    };
    assert!(matches!(
        fixture.device.update_descriptor_sets(&[dangling]),
        Err(ResourceError::NotFound { kind: "buffer", id: 404 })
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Presentation and teardown
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_present_swaps_the_back_buffer_once() {
    let fixture = Fixture::new();
    let descriptor = SwapChainDescriptor {
        label: Some("main".to_string()),
        extent: Extent2D::new(WIDTH, HEIGHT),
        format: Format::Bgra8Srgb,
        image_count: 3,
    };
    let first = fixture.device.create_swap_chain(&descriptor).expect("swap chain");
    let second = fixture.device.create_swap_chain(&descriptor).expect("swap chain");
    assert_eq!(fixture.device.swap_chain_images(first).map(|images| images.len()).ok(), Some(3));

    let index = fixture.device.acquire_next_image(first).expect("acquire");
    fixture.trace.clear_calls();
    fixture
        .device
        .queue(QueueKind::Present)
        .present(&[first, second], &[index, 0], &[])
        .expect("present");
    assert_eq!(fixture.trace.count(|call| *call == GlCall::SwapBuffers), 1);
}

#[test]
fn test_dropping_the_device_releases_its_objects() {
    let fixture = Fixture::new();
    let _pipeline = fixture.pipeline(VertexInputState::default());
    let trace = fixture.trace.clone();
    let created = trace.count(|call| matches!(call, GlCall::Create { .. }));

    drop(fixture);
    let deleted = trace.count(|call| matches!(call, GlCall::Delete { .. }));
    assert!(deleted > 0, "Dropping the device deletes OpenGL objects");
    assert!(deleted <= created, "Only created objects are deleted");
}
