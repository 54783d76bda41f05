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

//! Integration tests for command recording and its replay.
//!
//! These tests record command buffers against a device built over a
//! [`TraceContext`](glrenderer_core::TraceContext), submit them, and check the
//! OpenGL calls issued by the replay.

mod common;

use common::{position_layout, position_of, Fixture};
use glrenderer_core::api::*;
use glrenderer_core::gl::enums as gl;
use glrenderer_core::gl::{ClearBufferValue, GlCall};
use glrenderer_core::RecordingState;

/// A primary command buffer from a fresh graphics pool.
fn primary(fixture: &Fixture) -> glrenderer_core::CommandBuffer {
    fixture
        .device
        .create_command_pool(QueueKind::Graphics)
        .allocate(CommandBufferLevel::Primary)
}

fn count_named(names: &[&str], name: &str) -> usize {
    names.iter().filter(|candidate| **candidate == name).count()
}

fn uniform_values(calls: &[GlCall]) -> Vec<(i32, Vec<f32>)> {
    calls
        .iter()
        .filter_map(|call| match call {
            GlCall::UniformF32 { location, values, .. } => Some((*location, values.clone())),
            _ => None,
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Lifecycle
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_empty_recording_replays_no_draw() {
    let fixture = Fixture::new();
    let mut cb = primary(&fixture);
    assert_eq!(cb.state(), RecordingState::Initial);

    assert!(cb.begin(CommandBufferUsageFlags::ONE_TIME_SUBMIT), "begin from Initial should succeed");
    assert_eq!(cb.state(), RecordingState::Recording);
    assert!(cb.end(), "end from Recording should succeed");
    assert_eq!(cb.state(), RecordingState::Executable);
    assert_eq!(cb.command_count(), 0, "Nothing was recorded");

    let (stats, calls) = fixture.replay(&[&cb]);
    assert_eq!(stats.command_buffers, 1);
    assert_eq!(stats.commands, 0);
    assert_eq!(stats.draw_calls, 0);
    assert!(!calls.iter().any(GlCall::is_draw), "An empty buffer must not draw");
    assert_eq!(calls, vec![GlCall::Flush], "Only the end-of-submit flush is expected");
}

#[test]
fn test_begin_discards_the_previous_recording() {
    let fixture = Fixture::new();
    let mut cb = primary(&fixture);

    assert!(cb.begin(CommandBufferUsageFlags::empty()));
    cb.set_line_width(2.0);
    cb.set_blend_constants([1.0; 4]);
    assert!(cb.end());
    assert_eq!(cb.command_count(), 2);

    assert!(cb.begin(CommandBufferUsageFlags::SIMULTANEOUS_USE), "begin always succeeds");
    assert_eq!(cb.command_count(), 0, "begin starts from an empty command list");
    assert_eq!(cb.usage(), CommandBufferUsageFlags::SIMULTANEOUS_USE);
    assert!(cb.end());
    assert_eq!(cb.state(), RecordingState::Executable);
}

#[test]
fn test_reset_and_rerecord_replays_identically() {
    let fixture = Fixture::new();
    let pipeline = fixture.pipeline(position_layout(12));
    let vertices = fixture.vertex_buffer();

    let record = |cb: &mut glrenderer_core::CommandBuffer| {
        assert!(cb.begin(CommandBufferUsageFlags::empty()));
        cb.bind_pipeline(pipeline);
        cb.bind_vertex_buffers(0, &[(vertices, 0)]);
        cb.draw(3, 1, 0, 0);
        cb.draw(6, 2, 3, 0);
        assert!(cb.end());
    };

    let mut cb = primary(&fixture);
    record(&mut cb);
    let (first_stats, _) = fixture.replay(&[&cb]);
    assert_eq!(first_stats.realized_geometry, 1, "The first submit creates the vertex array");
    let (_, before) = fixture.replay(&[&cb]);

    assert!(cb.reset(CommandBufferResetFlags::RELEASE_RESOURCES));
    assert_eq!(cb.state(), RecordingState::Initial);
    assert_eq!(cb.command_count(), 0, "reset drops the recorded commands");
    assert_eq!(cb.pending_geometry_count(), 0, "reset drops the pending geometry");

    record(&mut cb);
    let (stats, after) = fixture.replay(&[&cb]);
    assert_eq!(stats.draw_calls, 2);
    assert_eq!(stats.realized_geometry, 0, "The cached vertex array is reused");
    assert_eq!(before, after, "A re-recorded buffer must replay the same calls");
}

#[test]
fn test_pool_reset_returns_buffers_to_initial() {
    let fixture = Fixture::new();
    let pool = fixture.device.create_command_pool(QueueKind::Graphics);
    let mut first = pool.allocate(CommandBufferLevel::Primary);
    let mut second = pool.allocate(CommandBufferLevel::Secondary);
    assert_eq!(pool.live_buffers(), 2);

    for cb in [&mut first, &mut second] {
        assert!(cb.begin(CommandBufferUsageFlags::empty()));
        cb.set_line_width(2.0);
        assert!(cb.end());
    }
    pool.reset(CommandBufferResetFlags::empty());

    for cb in [&first, &second] {
        assert_eq!(cb.state(), RecordingState::Initial);
        assert_eq!(cb.command_count(), 0);
    }
    drop(second);
    assert_eq!(pool.live_buffers(), 1, "Dropped buffers are no longer tracked");
}

// ─────────────────────────────────────────────────────────────────────────────
// Geometry resolution
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_one_cache_entry_per_distinct_binding_combination() {
    let fixture = Fixture::new();
    let pipeline = fixture.pipeline(position_layout(12));
    let a = fixture.vertex_buffer();
    let b = fixture.vertex_buffer();

    let mut cb = primary(&fixture);
    assert!(cb.begin(CommandBufferUsageFlags::empty()));
    cb.bind_pipeline(pipeline);
    for (buffer, offset) in [(a, 0), (a, 0), (b, 0), (a, 0), (a, 48)] {
        cb.bind_vertex_buffers(0, &[(buffer, offset)]);
        cb.draw(3, 1, 0, 0);
    }
    assert!(cb.end());

    assert_eq!(
        fixture.device.geometry_cache_len(),
        3,
        "(a, 0), (b, 0) and (a, 48) are the only distinct combinations"
    );
    assert_eq!(cb.pending_geometry_count(), 3, "Each new entry waits for the first submit");

    let (stats, calls) = fixture.replay(&[&cb]);
    assert_eq!(stats.realized_geometry, 3);
    assert_eq!(stats.draw_calls, 5);
    assert_eq!(calls.iter().filter(|call| call.is_draw()).count(), 5);
}

#[test]
fn test_new_vertex_layout_invalidates_bound_geometry() {
    let fixture = Fixture::new();
    let narrow = fixture.pipeline(position_layout(12));
    let wide = fixture.pipeline(position_layout(24));
    let vertices = fixture.vertex_buffer();
    let (indices, _) = fixture.buffer(256, BufferUsage::INDEX);

    let mut cb = primary(&fixture);
    assert!(cb.begin(CommandBufferUsageFlags::empty()));
    cb.bind_pipeline(narrow);
    cb.bind_vertex_buffers(0, &[(vertices, 0)]);
    cb.bind_index_buffer(indices, 0, IndexType::Uint16);
    cb.draw(3, 1, 0, 0);
    cb.bind_pipeline(wide);
    cb.draw(3, 1, 0, 0);
    cb.draw_indexed(3, 1, 0, 0, 0);
    assert_eq!(
        cb.command_names(),
        vec!["BindPipeline", "BindGeometryBuffers", "Draw", "BindPipeline"],
        "Draws after a layout change read nothing until buffers are bound again"
    );

    cb.bind_vertex_buffers(0, &[(vertices, 0)]);
    cb.draw(3, 1, 0, 0);
    assert!(cb.end());

    let names = cb.command_names();
    assert_eq!(count_named(&names, "BindGeometryBuffers"), 2);
    assert_eq!(count_named(&names, "Draw"), 2);
    assert_eq!(
        fixture.device.geometry_cache_len(),
        2,
        "The re-bound buffer is read through a vertex array for the new layout"
    );
}

#[test]
fn test_indexed_draw_with_vertex_layout_needs_an_index_buffer() {
    let fixture = Fixture::new();
    let pipeline = fixture.pipeline(position_layout(12));
    let vertices = fixture.vertex_buffer();

    let mut cb = primary(&fixture);
    assert!(cb.begin(CommandBufferUsageFlags::empty()));
    cb.bind_pipeline(pipeline);
    cb.bind_vertex_buffers(0, &[(vertices, 0)]);
    cb.draw_indexed(6, 1, 0, 0, 0);
    assert!(cb.end());

    assert_eq!(cb.command_names(), vec!["BindPipeline"]);
    let (stats, calls) = fixture.replay(&[&cb]);
    assert_eq!(stats.draw_calls, 0);
    assert!(
        !calls.contains(&GlCall::BindVertexArray(Some(fixture.empty_vao))),
        "The dummy indices only serve pipelines without vertex input"
    );
}

#[test]
fn test_same_vertex_layout_keeps_bound_geometry() {
    let fixture = Fixture::new();
    let culled = fixture.pipeline_with(position_layout(12), |descriptor| {
        descriptor.rasterization.cull_mode = CullMode::Back;
    });
    let unculled = fixture.pipeline(position_layout(12));
    let vertices = fixture.vertex_buffer();

    let mut cb = primary(&fixture);
    assert!(cb.begin(CommandBufferUsageFlags::empty()));
    cb.bind_pipeline(culled);
    cb.bind_vertex_buffers(0, &[(vertices, 0)]);
    cb.draw(3, 1, 0, 0);
    cb.bind_pipeline(unculled);
    cb.draw(3, 1, 0, 0);
    assert!(cb.end());

    let names = cb.command_names();
    assert_eq!(
        count_named(&names, "BindGeometryBuffers"),
        1,
        "Pipelines sharing a vertex layout keep the bound vertex array"
    );
    assert_eq!(count_named(&names, "Draw"), 2);
    assert_eq!(fixture.device.geometry_cache_len(), 1);
}

#[test]
fn test_pipeline_without_vertex_input_draws_from_the_empty_vertex_array() {
    let fixture = Fixture::new();
    let pipeline = fixture.pipeline(VertexInputState::default());

    let mut cb = primary(&fixture);
    assert!(cb.begin(CommandBufferUsageFlags::empty()));
    cb.bind_pipeline(pipeline);
    cb.draw(3, 1, 0, 0);
    cb.draw_indexed(6, 1, 0, 0, 0);
    assert!(cb.end());

    assert_eq!(fixture.device.geometry_cache_len(), 0, "No geometry is cached for procedural draws");
    let (stats, calls) = fixture.replay(&[&cb]);
    assert_eq!(stats.draw_calls, 2);
    assert_eq!(
        calls
            .iter()
            .filter(|call| **call == GlCall::BindVertexArray(Some(fixture.empty_vao)))
            .count(),
        1,
        "The empty vertex array is bound once for both draws"
    );
    assert!(
        calls.iter().any(|call| matches!(
            call,
            GlCall::DrawElements { ty: gl::UNSIGNED_INT, count: 6, .. }
        )),
        "An indexed draw without index buffer reads the dummy indices"
    );
}

#[test]
fn test_indexed_draw_with_vertex_layout_uses_cached_geometry() {
    let fixture = Fixture::new();
    let pipeline = fixture.pipeline(position_layout(12));
    let vertices = fixture.vertex_buffer();
    let (indices, _) = fixture.buffer(256, BufferUsage::INDEX);

    let mut cb = primary(&fixture);
    assert!(cb.begin(CommandBufferUsageFlags::empty()));
    cb.bind_pipeline(pipeline);
    cb.bind_vertex_buffers(0, &[(vertices, 0)]);
    cb.bind_index_buffer(indices, 0, IndexType::Uint16);
    cb.draw_indexed(6, 1, 0, 0, 0);
    assert!(cb.end());

    let (stats, calls) = fixture.replay(&[&cb]);
    assert_eq!(stats.realized_geometry, 1);
    assert!(
        !calls.contains(&GlCall::BindVertexArray(Some(fixture.empty_vao))),
        "The empty vertex array must not be used when a layout and an index buffer are bound"
    );
    assert!(calls.iter().any(|call| matches!(
        call,
        GlCall::DrawElements { ty: gl::UNSIGNED_SHORT, count: 6, .. }
    )));
}

// ─────────────────────────────────────────────────────────────────────────────
// Push constants
// ─────────────────────────────────────────────────────────────────────────────

fn float_constants(location: u32, value: f32) -> PushConstantsBuffer {
    let mut buffer = PushConstantsBuffer::new(
        ShaderStageFlags::VERTEX,
        0,
        vec![PushConstant {
            location,
            offset: 0,
            format: ConstantFormat::Float,
            array_size: 1,
        }],
    );
    buffer.write(0, &value);
    buffer
}

#[test]
fn test_push_constants_before_a_pipeline_are_replayed_in_order() {
    let fixture = Fixture::new();
    let pipeline = fixture.pipeline_with(VertexInputState::default(), |descriptor| {
        descriptor.stages[1].specialization = Some(SpecializationInfo {
            entries: vec![SpecializationMapEntry {
                constant_id: 7,
                offset: 0,
                format: ConstantFormat::Float,
            }],
            data: bytemuck::bytes_of(&3.0f32).to_vec(),
        });
    });

    let mut cb = primary(&fixture);
    assert!(cb.begin(CommandBufferUsageFlags::empty()));
    cb.push_constants(fixture.layout, &float_constants(0, 1.0));
    cb.push_constants(fixture.layout, &float_constants(1, 2.0));
    assert_eq!(cb.command_count(), 0, "Push constants wait for the first pipeline");
    cb.bind_pipeline(pipeline);
    cb.push_constants(fixture.layout, &float_constants(2, 4.0));
    assert!(cb.end());

    assert_eq!(
        cb.command_names(),
        vec!["BindPipeline", "PushConstants", "PushConstants", "PushConstants", "PushConstants"]
    );
    let (_, calls) = fixture.replay(&[&cb]);
    assert_eq!(
        uniform_values(&calls),
        vec![(0, vec![1.0]), (1, vec![2.0]), (7, vec![3.0]), (2, vec![4.0])],
        "Deferred constants come first, then the baked ones, then the later pushes"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Render passes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_render_pass_clear_precedes_the_draws() {
    let fixture = Fixture::new();
    let pipeline = fixture.pipeline(VertexInputState::default());

    let mut cb = primary(&fixture);
    assert!(cb.begin(CommandBufferUsageFlags::empty()));
    cb.begin_render_pass(&fixture.render_pass_begin([0.0, 0.0, 0.0, 1.0]), SubpassContents::Inline);
    cb.bind_pipeline(pipeline);
    cb.draw(3, 1, 0, 0);
    cb.draw(3, 1, 3, 0);
    cb.end_render_pass();
    assert!(cb.end());

    let (stats, calls) = fixture.replay(&[&cb]);
    assert_eq!(stats.draw_calls, 2);

    let clears: Vec<&GlCall> = calls
        .iter()
        .filter(|call| matches!(call, GlCall::ClearBuffer { .. }))
        .collect();
    assert_eq!(clears.len(), 1, "Exactly one clear for the single cleared attachment");
    assert_eq!(
        clears[0],
        &GlCall::ClearBuffer {
            buffer: gl::COLOR,
            draw_buffer: 0,
            value: ClearBufferValue::Float([0.0, 0.0, 0.0, 1.0]),
        }
    );
    let clear_at = position_of(&calls, |call| matches!(call, GlCall::ClearBuffer { .. }));
    let draw_at = position_of(&calls, GlCall::is_draw);
    assert!(clear_at < draw_at, "The clear must happen before the first draw");
}

/// The last `glDepthMask` and `glColorMaski(0)` values set before the first draw.
fn masks_at_first_draw(calls: &[GlCall]) -> (Option<bool>, Option<[bool; 4]>) {
    let draw_at = position_of(calls, GlCall::is_draw).expect("a draw was replayed");
    let before = &calls[..draw_at];
    let depth = before.iter().rev().find_map(|call| match call {
        GlCall::DepthMask(write) => Some(*write),
        _ => None,
    });
    let color = before.iter().rev().find_map(|call| match call {
        GlCall::ColorMaskI { buffer: 0, mask } => Some(*mask),
        _ => None,
    });
    (depth, color)
}

#[test]
fn test_clear_attachments_restores_the_pipeline_write_masks() {
    let fixture = Fixture::new();
    let pipeline = fixture.pipeline_with(VertexInputState::default(), |descriptor| {
        descriptor.depth_stencil = Some(DepthStencilState {
            depth_test: true,
            depth_write: false,
            ..DepthStencilState::default()
        });
        descriptor.color_blend.attachments[0].write_mask = ColorComponentFlags::R;
    });
    let rect = ClearRect {
        rect: Rect2D::from_extent(Extent2D::new(16, 16)),
        base_array_layer: 0,
        layer_count: 1,
    };

    let mut cb = primary(&fixture);
    assert!(cb.begin(CommandBufferUsageFlags::empty()));
    cb.begin_render_pass(&fixture.render_pass_begin([0.0; 4]), SubpassContents::Inline);
    cb.bind_pipeline(pipeline);
    cb.clear_attachments(
        &[
            ClearAttachment {
                aspect: ImageAspectFlags::DEPTH,
                color_attachment: 0,
                value: ClearValue::DepthStencil(ClearDepthStencilValue { depth: 1.0, stencil: 0 }),
            },
            ClearAttachment {
                aspect: ImageAspectFlags::COLOR,
                color_attachment: 0,
                value: ClearValue::Color(ClearColorValue::Float([1.0; 4])),
            },
        ],
        &[rect],
    );
    cb.draw(3, 1, 0, 0);
    cb.end_render_pass();
    assert!(cb.end());

    let (_, calls) = fixture.replay(&[&cb]);
    assert!(calls.contains(&GlCall::DepthMask(true)), "The depth clear opens the depth mask");
    assert_eq!(
        masks_at_first_draw(&calls),
        (Some(false), Some([true, false, false, false])),
        "The draw must run with the pipeline's masks, not the clear's"
    );
}

#[test]
fn test_render_pass_clear_restores_the_bound_pipeline_masks() {
    let fixture = Fixture::new();
    let pipeline = fixture.pipeline_with(VertexInputState::default(), |descriptor| {
        descriptor.color_blend.attachments[0].write_mask = ColorComponentFlags::G | ColorComponentFlags::A;
    });

    let mut cb = primary(&fixture);
    assert!(cb.begin(CommandBufferUsageFlags::empty()));
    cb.bind_pipeline(pipeline);
    cb.begin_render_pass(&fixture.render_pass_begin([0.0; 4]), SubpassContents::Inline);
    cb.draw(3, 1, 0, 0);
    cb.end_render_pass();
    assert!(cb.end());

    let (_, calls) = fixture.replay(&[&cb]);
    let clear_at = position_of(&calls, |call| matches!(call, GlCall::ClearBuffer { .. })).expect("a clear");
    assert_eq!(
        calls[..clear_at]
            .iter()
            .rev()
            .find(|call| matches!(call, GlCall::ColorMaskI { buffer: 0, .. })),
        Some(&GlCall::ColorMaskI {
            buffer: 0,
            mask: [true; 4]
        }),
        "Load-op clears write every channel"
    );
    assert_eq!(masks_at_first_draw(&calls).1, Some([false, true, false, true]));
}

#[test]
fn test_secondary_buffers_splice_like_direct_recording() {
    let fixture = Fixture::new();
    let pipeline = fixture.pipeline(position_layout(12));
    let vertices = fixture.vertex_buffer();
    let pool = fixture.device.create_command_pool(QueueKind::Graphics);

    let mut secondary = pool.allocate(CommandBufferLevel::Secondary);
    assert!(secondary.begin_with_inheritance(
        CommandBufferUsageFlags::RENDER_PASS_CONTINUE,
        &InheritanceInfo {
            render_pass: Some(fixture.render_pass),
            subpass: 0,
            framebuffer: Some(fixture.framebuffer),
            occlusion_query_enable: false,
        },
    ));
    secondary.bind_pipeline(pipeline);
    secondary.bind_vertex_buffers(0, &[(vertices, 0)]);
    for first in 0..3 {
        secondary.draw(3, 1, first * 3, 0);
    }
    assert!(secondary.end());

    let begin = fixture.render_pass_begin([0.2, 0.3, 0.4, 1.0]);
    let mut spliced = pool.allocate(CommandBufferLevel::Primary);
    assert!(spliced.begin(CommandBufferUsageFlags::empty()));
    spliced.begin_render_pass(&begin, SubpassContents::SecondaryCommandBuffers);
    spliced.execute_commands(&[&secondary]);
    spliced.end_render_pass();
    assert!(spliced.end());
    assert_eq!(spliced.pending_geometry_count(), 1, "The secondary's pending geometry is merged");

    let mut direct = pool.allocate(CommandBufferLevel::Primary);
    assert!(direct.begin(CommandBufferUsageFlags::empty()));
    direct.begin_render_pass(&begin, SubpassContents::Inline);
    direct.bind_pipeline(pipeline);
    direct.bind_vertex_buffers(0, &[(vertices, 0)]);
    for first in 0..3 {
        direct.draw(3, 1, first * 3, 0);
    }
    direct.end_render_pass();
    assert!(direct.end());

    let (first, _) = fixture.replay(&[&spliced]);
    assert_eq!(first.realized_geometry, 1);
    let (spliced_stats, spliced_calls) = fixture.replay(&[&spliced]);
    let (direct_stats, direct_calls) = fixture.replay(&[&direct]);
    assert_eq!(spliced_stats, direct_stats);
    assert_eq!(spliced_calls, direct_calls, "Splicing must replay exactly like direct recording");
}

#[test]
fn test_secondary_buffers_cannot_be_submitted() {
    let fixture = Fixture::new();
    let pool = fixture.device.create_command_pool(QueueKind::Graphics);
    let mut secondary = pool.allocate(CommandBufferLevel::Secondary);
    assert!(secondary.begin(CommandBufferUsageFlags::empty()));
    secondary.set_line_width(3.0);
    assert!(secondary.end());

    let (stats, calls) = fixture.replay(&[&secondary]);
    assert_eq!(stats.command_buffers, 0, "The secondary buffer is skipped");
    assert!(!calls.contains(&GlCall::LineWidth(3.0)));
}

#[test]
fn test_dynamic_state_reaches_the_context() {
    let fixture = Fixture::new();
    let mut cb = primary(&fixture);
    assert!(cb.begin(CommandBufferUsageFlags::empty()));
    cb.set_viewport(Viewport {
        x: 0.0,
        y: 0.0,
        width: 32.0,
        height: 16.0,
        min_depth: 0.25,
        max_depth: 0.75,
    });
    cb.set_depth_bias(1.5, 0.0, 0.5);
    assert!(cb.end());

    let (_, calls) = fixture.replay(&[&cb]);
    assert!(calls.contains(&GlCall::Viewport([0, 0, 32, 16])));
    let (near, far) = calls
        .iter()
        .find_map(|call| match call {
            GlCall::DepthRange { near, far } => Some((*near, *far)),
            _ => None,
        })
        .expect("the viewport sets the depth range");
    approx::assert_relative_eq!(near, 0.25);
    approx::assert_relative_eq!(far, 0.75);
    let (factor, units) = calls
        .iter()
        .find_map(|call| match call {
            GlCall::PolygonOffset { factor, units } => Some((*factor, *units)),
            _ => None,
        })
        .expect("the depth bias sets the polygon offset");
    approx::assert_relative_eq!(factor, 0.5); // the slope drives the factor
    approx::assert_relative_eq!(units, 1.5); // the constant drives the units
}

// ─────────────────────────────────────────────────────────────────────────────
// Robustness
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_unknown_handles_are_skipped() {
    let fixture = Fixture::new();
    let mut cb = primary(&fixture);
    assert!(cb.begin(CommandBufferUsageFlags::empty()));
    cb.bind_pipeline(PipelineId(999));
    cb.bind_vertex_buffers(0, &[(BufferId(999), 0)]);
    cb.copy_buffer(BufferId(998), BufferId(999), &[]);
    cb.draw(3, 1, 0, 0);
    assert!(cb.end());

    assert_eq!(cb.command_count(), 0, "Calls referencing unknown handles record nothing");
}

#[test]
fn test_unrealizable_geometry_fails_the_submission() {
    let fixture = Fixture::new();
    let pipeline = fixture.pipeline(position_layout(12));
    let unbacked = fixture
        .device
        .create_buffer(&BufferDescriptor {
            label: Some("no memory".to_string()),
            size: 256,
            usage: BufferUsage::VERTEX,
        })
        .expect("buffer");

    let mut cb = primary(&fixture);
    assert!(cb.begin(CommandBufferUsageFlags::empty()));
    cb.bind_pipeline(pipeline);
    cb.bind_vertex_buffers(0, &[(unbacked, 0)]);
    cb.draw(3, 1, 0, 0);
    assert!(cb.end());

    let fence = fixture.device.create_fence(false).expect("fence");
    fixture.trace.clear_calls();
    let result = fixture
        .device
        .queue(QueueKind::Graphics)
        .submit(&[&cb], &[], &[], Some(fence));
    assert!(
        matches!(result, Err(glrenderer_core::RenderError::SubmitFailed { index: 0, .. })),
        "A buffer without storage cannot feed a vertex array, got {result:?}"
    );
    assert!(!fixture.trace.calls().iter().any(GlCall::is_draw), "Nothing is drawn");
    assert_eq!(fixture.device.fence_status(fence).ok(), Some(false), "The fence stays unsignaled");
}
