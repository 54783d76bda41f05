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


//! Command buffers.
//!
//! Recording never touches OpenGL. Every recording call resolves its handles
//! against the device registries and appends [`Command`] values; the only
//! deferred work is the creation of the vertex arrays new draws need, which
//! the queue performs right before replay.

use super::command::{
    BeginRenderPass, BlitImage, BufferImageTransfer, ClearAttachments, ClearColorImage,
    ClearDepthStencilImage, Command, CopyBuffer, CopyImage, Draw, DrawIndexed, DrawIndirect,
    StencilReference, SubpassTransition,
};
use super::descriptor::DescriptorBinding;
use super::device::DeviceShared;
use super::framebuffer::FrameBufferObject;
use super::geometry::{GeometryBinding, GeometryBuffers, GeometryIntent, GeometryKey};
use super::pipeline::{ComputePipelineObject, GraphicsPipelineObject};
use super::registry::{lock, Registry};
use super::render_pass::RenderPassObject;
use super::resources::BufferObject;
use crate::api::{
    BufferCopy, BufferId, BufferImageCopy, BufferMemoryBarrier, ClearAttachment, ClearColorValue,
    ClearDepthStencilValue, ClearRect, CommandBufferLevel, CommandBufferResetFlags,
    CommandBufferUsageFlags, ComputePipelineId, DependencyFlags, DescriptorSetId, Filter, ImageBlit,
    ImageCopy, ImageMemoryBarrier, ImageSubresourceRange, IndexType, InheritanceInfo, MemoryBarrier,
    PipelineBindPoint, PipelineId, PipelineLayoutId, PipelineStageFlags, PushConstantsBuffer,
    QueryPoolId, Rect2D, RenderPassBeginInfo, StencilFaceFlags, SubpassContents, TextureId, Viewport,
};
use crate::gl::enums as gl;
use crate::gl::IntoGl;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

/// Where a command buffer is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    /// Never begun, or reset.
    Initial,
    /// Between `begin` and `end`.
    Recording,
    /// Ended; ready for submission or `execute_commands`.
    Executable,
}

/// Push constants recorded before any pipeline is bound are held back until the next bind.
#[derive(Debug)]
enum PushConstantState {
    Unbound(VecDeque<PushConstantsBuffer>),
    Bound,
}

impl Default for PushConstantState {
    fn default() -> Self {
        PushConstantState::Unbound(VecDeque::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum BoundGeometry {
    None,
    Empty,
    Cached(GeometryKey),
}

#[derive(Debug, Clone)]
struct PassState {
    render_pass: Arc<RenderPassObject>,
    framebuffer: Option<Arc<FrameBufferObject>>,
    subpass: u32,
    render_area: Option<Rect2D>,
}

#[derive(Debug)]
struct BindingState {
    pipeline: Option<Arc<GraphicsPipelineObject>>,
    compute_pipeline: Option<Arc<ComputePipelineObject>>,
    push_constants: PushConstantState,
    vertex_buffers: BTreeMap<u32, (Arc<BufferObject>, u64)>,
    index_buffer: Option<(Arc<BufferObject>, u64, IndexType)>,
    geometry: BoundGeometry,
    pass: Option<PassState>,
}

impl Default for BindingState {
    fn default() -> Self {
        Self {
            pipeline: None,
            compute_pipeline: None,
            push_constants: PushConstantState::default(),
            vertex_buffers: BTreeMap::new(),
            index_buffer: None,
            geometry: BoundGeometry::None,
            pass: None,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Recording {
    pub state: RecordingState,
    pub usage: CommandBufferUsageFlags,
    pub commands: Vec<Command>,
    /// Vertex arrays to create before the commands are replayed.
    pub pending_geometry: Vec<Arc<GeometryBuffers>>,
    bindings: BindingState,
}

impl Default for Recording {
    fn default() -> Self {
        Self {
            state: RecordingState::Initial,
            usage: CommandBufferUsageFlags::empty(),
            commands: Vec::new(),
            pending_geometry: Vec::new(),
            bindings: BindingState::default(),
        }
    }
}

impl Recording {
    pub(crate) fn clear(&mut self, release: bool) {
        self.commands.clear();
        self.pending_geometry.clear();
        self.bindings = BindingState::default();
        if release {
            self.commands.shrink_to_fit();
            self.pending_geometry.shrink_to_fit();
        }
    }

    fn add_pending(&mut self, geometry: Arc<GeometryBuffers>) {
        if !self.pending_geometry.iter().any(|pending| Arc::ptr_eq(pending, &geometry)) {
            self.pending_geometry.push(geometry);
        }
    }
}

/// Looks up `id`, warning when it is unknown.
fn lookup<T>(registry: &Registry<T>, id: usize, call: &str) -> Option<Arc<T>> {
    let found = registry.get(id);
    if found.is_none() {
        log::warn!("CommandBuffer: {call} references unknown {} {id}, call skipped.", registry.kind());
    }
    found
}

/// A list of recorded commands, replayed by [`Queue::submit`](super::Queue::submit).
///
/// Primary buffers are submitted; secondary buffers are spliced into primary
/// ones with [`CommandBuffer::execute_commands`].
pub struct CommandBuffer {
    level: CommandBufferLevel,
    device: Arc<DeviceShared>,
    recording: Arc<Mutex<Recording>>,
}

impl std::fmt::Debug for CommandBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandBuffer")
            .field("level", &self.level)
            .field("state", &self.state())
            .field("commands", &self.command_count())
            .finish()
    }
}

impl CommandBuffer {
    pub(crate) fn new(level: CommandBufferLevel, device: Arc<DeviceShared>, recording: Arc<Mutex<Recording>>) -> Self {
        Self {
            level,
            device,
            recording,
        }
    }

    pub(crate) fn recording(&self) -> MutexGuard<'_, Recording> {
        lock(&self.recording)
    }

    /// The level the buffer was allocated with.
    pub fn level(&self) -> CommandBufferLevel {
        self.level
    }

    /// The lifecycle state of the buffer.
    pub fn state(&self) -> RecordingState {
        self.recording().state
    }

    /// The usage flags given to the last `begin`.
    pub fn usage(&self) -> CommandBufferUsageFlags {
        self.recording().usage
    }

    /// Number of recorded commands.
    pub fn command_count(&self) -> usize {
        self.recording().commands.len()
    }

    /// Names of the recorded commands, in replay order.
    pub fn command_names(&self) -> Vec<&'static str> {
        self.recording().commands.iter().map(Command::name).collect()
    }

    /// Number of vertex arrays waiting to be created before the next replay.
    pub fn pending_geometry_count(&self) -> usize {
        self.recording().pending_geometry.len()
    }

    fn push(&mut self, command: Command) {
        let mut recording = self.recording();
        if recording.state != RecordingState::Recording {
            log::warn!("CommandBuffer: {} recorded outside begin/end.", command.name());
        }
        recording.commands.push(command);
    }

    // --- Lifecycle ---

    /// Starts recording, discarding the previous recording.
    pub fn begin(&mut self, usage: CommandBufferUsageFlags) -> bool {
        let mut recording = self.recording();
        recording.clear(false);
        recording.usage = usage;
        recording.state = RecordingState::Recording;
        true
    }

    /// Starts recording a secondary buffer that continues a render pass.
    pub fn begin_with_inheritance(&mut self, usage: CommandBufferUsageFlags, inheritance: &InheritanceInfo) -> bool {
        self.begin(usage);
        let render_pass = inheritance
            .render_pass
            .and_then(|id| lookup(&self.device.render_passes, id.0, "begin_with_inheritance"));
        let framebuffer = inheritance
            .framebuffer
            .and_then(|id| lookup(&self.device.framebuffers, id.0, "begin_with_inheritance"));
        if let Some(render_pass) = render_pass {
            let render_area = framebuffer
                .as_ref()
                .map(|framebuffer| Rect2D::from_extent(framebuffer.extent));
            self.recording().bindings.pass = Some(PassState {
                render_pass,
                framebuffer,
                subpass: inheritance.subpass,
                render_area,
            });
        }
        true
    }

    /// Stops recording. Push constants still waiting for a pipeline are dropped.
    pub fn end(&mut self) -> bool {
        let mut recording = self.recording();
        if recording.state != RecordingState::Recording {
            log::warn!("CommandBuffer: end called on a buffer that is not recording.");
        }
        if let PushConstantState::Unbound(pending) = &recording.bindings.push_constants {
            if !pending.is_empty() {
                log::debug!("CommandBuffer: {} push constant blocks never met a pipeline.", pending.len());
            }
        }
        recording.bindings.push_constants = PushConstantState::default();
        recording.state = RecordingState::Executable;
        true
    }

    /// Discards the recorded commands.
    pub fn reset(&mut self, flags: CommandBufferResetFlags) -> bool {
        let mut recording = self.recording();
        recording.clear(flags.contains(CommandBufferResetFlags::RELEASE_RESOURCES));
        recording.state = RecordingState::Initial;
        true
    }

    // --- Pipelines and bindings ---

    /// Binds a graphics pipeline.
    ///
    /// A pipeline whose vertex layout differs from the previous one drops the
    /// bound vertex and index buffers: they have to be bound again before the
    /// next draw.
    pub fn bind_pipeline(&mut self, pipeline: PipelineId) {
        let Some(pipeline) = lookup(&self.device.pipelines, pipeline.0, "bind_pipeline") else {
            return;
        };
        let mut recording = self.recording();
        let layout_changed = recording
            .bindings
            .pipeline
            .as_ref()
            .is_some_and(|previous| previous.vertex_hash != pipeline.vertex_hash);
        if layout_changed {
            let bindings = &mut recording.bindings;
            bindings.vertex_buffers.clear();
            bindings.index_buffer = None;
            bindings.geometry = BoundGeometry::None;
        }
        recording.commands.push(Command::BindPipeline(pipeline.clone()));
        Self::flush_push_constants(&mut recording, &pipeline.constants);
        recording.bindings.pipeline = Some(pipeline);
    }

    /// Binds a compute pipeline.
    pub fn bind_compute_pipeline(&mut self, pipeline: ComputePipelineId) {
        let Some(pipeline) = lookup(&self.device.compute_pipelines, pipeline.0, "bind_compute_pipeline") else {
            return;
        };
        let mut recording = self.recording();
        recording.commands.push(Command::BindComputePipeline(pipeline.clone()));
        Self::flush_push_constants(&mut recording, &pipeline.constants);
        recording.bindings.compute_pipeline = Some(pipeline);
    }

    /// Emits the push constants held back so far, then the pipeline's own constants.
    fn flush_push_constants(recording: &mut Recording, baked: &[PushConstantsBuffer]) {
        let state = std::mem::replace(&mut recording.bindings.push_constants, PushConstantState::Bound);
        if let PushConstantState::Unbound(pending) = state {
            recording.commands.extend(pending.into_iter().map(Command::PushConstants));
        }
        recording
            .commands
            .extend(baked.iter().cloned().map(Command::PushConstants));
    }

    /// Records push constants. Before the first pipeline bind they are deferred.
    pub fn push_constants(&mut self, layout: PipelineLayoutId, constants: &PushConstantsBuffer) {
        if lookup(&self.device.pipeline_layouts, layout.0, "push_constants").is_none() {
            return;
        }
        let mut recording = self.recording();
        match &mut recording.bindings.push_constants {
            PushConstantState::Unbound(pending) => pending.push_back(constants.clone()),
            PushConstantState::Bound => recording.commands.push(Command::PushConstants(constants.clone())),
        }
    }

    /// Binds vertex buffers to consecutive binding points starting at `first_binding`.
    pub fn bind_vertex_buffers(&mut self, first_binding: u32, buffers: &[(BufferId, u64)]) {
        let resolved: Option<Vec<_>> = buffers
            .iter()
            .map(|(id, offset)| lookup(&self.device.buffers, id.0, "bind_vertex_buffers").map(|buffer| (buffer, *offset)))
            .collect();
        let Some(resolved) = resolved else {
            return;
        };
        let mut recording = self.recording();
        for (binding, entry) in (first_binding..).zip(resolved) {
            recording.bindings.vertex_buffers.insert(binding, entry);
        }
        recording.bindings.geometry = BoundGeometry::None;
    }

    /// Binds the index buffer used by indexed draws.
    pub fn bind_index_buffer(&mut self, buffer: BufferId, offset: u64, index_type: IndexType) {
        let Some(buffer) = lookup(&self.device.buffers, buffer.0, "bind_index_buffer") else {
            return;
        };
        let mut recording = self.recording();
        recording.bindings.index_buffer = Some((buffer, offset, index_type));
        recording.bindings.geometry = BoundGeometry::None;
    }

    /// Binds descriptor sets `first_set..` of `layout`.
    ///
    /// Dynamic buffer descriptors consume `dynamic_offsets` in set then binding order.
    pub fn bind_descriptor_sets(
        &mut self,
        bind_point: PipelineBindPoint,
        layout: PipelineLayoutId,
        first_set: u32,
        sets: &[DescriptorSetId],
        dynamic_offsets: &[u32],
    ) {
        if lookup(&self.device.pipeline_layouts, layout.0, "bind_descriptor_sets").is_none() {
            return;
        }
        log::trace!("CommandBuffer: binding {} descriptor sets for {bind_point:?}", sets.len());
        let mut offsets = dynamic_offsets.iter().copied();
        let mut bindings: Vec<DescriptorBinding> = Vec::new();
        for (index, id) in (first_set..).zip(sets) {
            match lookup(&self.device.descriptor_sets, id.0, "bind_descriptor_sets") {
                Some(set) => set.resolve(index, &mut offsets, &mut bindings),
                None => return,
            }
        }
        if offsets.next().is_some() {
            log::warn!("CommandBuffer: bind_descriptor_sets was given more dynamic offsets than dynamic descriptors.");
        }
        self.push(Command::BindDescriptorSet(bindings));
    }

    // --- Dynamic state ---

    /// Sets the viewport and its depth range.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.push(Command::SetViewport(viewport));
    }

    /// Sets the scissor.
    pub fn set_scissor(&mut self, scissor: Rect2D) {
        self.push(Command::SetScissor(scissor));
    }

    /// Sets the line width.
    pub fn set_line_width(&mut self, width: f32) {
        self.push(Command::SetLineWidth(width));
    }

    /// Sets the polygon offset. A non-zero `clamp` is ignored.
    pub fn set_depth_bias(&mut self, constant: f32, clamp: f32, slope: f32) {
        self.push(Command::SetDepthBias { constant, clamp, slope });
    }

    /// Sets the blend constants.
    pub fn set_blend_constants(&mut self, constants: [f32; 4]) {
        self.push(Command::SetBlendConstants(constants));
    }

    /// Sets the stencil reference, keeping the compare function and mask of the bound pipeline.
    pub fn set_stencil_reference(&mut self, faces: StencilFaceFlags, reference: u32) {
        let Some(pipeline) = self.recording().bindings.pipeline.clone() else {
            log::warn!("CommandBuffer: set_stencil_reference without a bound pipeline, call skipped.");
            return;
        };
        let references = [(StencilFaceFlags::FRONT, gl::FRONT, false), (StencilFaceFlags::BACK, gl::BACK, true)]
            .into_iter()
            .filter(|(flag, _, _)| faces.contains(*flag))
            .map(|(_, face, back)| {
                let state = pipeline.stencil_state(back);
                StencilReference {
                    face,
                    func: state.compare_op.into_gl(),
                    reference: reference as i32,
                    mask: state.compare_mask,
                }
            })
            .collect();
        self.push(Command::SetStencilReference(references));
    }

    // --- Render passes ---

    /// Begins `info.render_pass` on `info.framebuffer` and enters its first subpass.
    pub fn begin_render_pass(&mut self, info: &RenderPassBeginInfo, contents: SubpassContents) {
        let Some(render_pass) = lookup(&self.device.render_passes, info.render_pass.0, "begin_render_pass") else {
            return;
        };
        let Some(framebuffer) = lookup(&self.device.framebuffers, info.framebuffer.0, "begin_render_pass") else {
            return;
        };
        log::trace!("CommandBuffer: render pass {:?} begins with {contents:?} contents", render_pass.id);
        let mut recording = self.recording();
        let restore = recording.bindings.pipeline.as_ref().map(|pipeline| pipeline.write_masks());
        recording.commands.push(Command::BeginRenderPass(BeginRenderPass {
            render_pass: render_pass.clone(),
            framebuffer: framebuffer.clone(),
            render_area: info.render_area,
            clear_values: info.clear_values.clone(),
            restore,
        }));
        recording.bindings.pass = Some(PassState {
            render_pass,
            framebuffer: Some(framebuffer),
            subpass: 0,
            render_area: Some(info.render_area),
        });
    }

    fn transition(&self, pass: &PassState) -> Option<SubpassTransition> {
        let framebuffer = pass.framebuffer.clone()?;
        Some(SubpassTransition {
            render_pass: pass.render_pass.clone(),
            render_area: pass.render_area.unwrap_or_else(|| Rect2D::from_extent(framebuffer.extent)),
            framebuffer,
            subpass: pass.subpass,
            scratch: self.device.scratch,
        })
    }

    /// Ends the current subpass, resolving its multisample attachments, and starts the next one.
    pub fn next_subpass(&mut self, contents: SubpassContents) {
        let Some(mut pass) = self.recording().bindings.pass.clone() else {
            log::warn!("CommandBuffer: next_subpass outside a render pass, call skipped.");
            return;
        };
        let Some(end) = self.transition(&pass) else {
            log::warn!("CommandBuffer: next_subpass needs a framebuffer, call skipped.");
            return;
        };
        pass.subpass += 1;
        if pass.subpass as usize >= pass.render_pass.subpass_count() {
            log::warn!("CommandBuffer: render pass {:?} has no subpass {}.", pass.render_pass.id, pass.subpass);
            return;
        }
        log::trace!("CommandBuffer: subpass {} begins with {contents:?} contents", pass.subpass);
        let begin = SubpassTransition {
            subpass: pass.subpass,
            ..end.clone()
        };
        let mut recording = self.recording();
        recording.commands.push(Command::EndSubpass(end));
        recording.commands.push(Command::BeginSubpass(begin));
        recording.bindings.pass = Some(pass);
    }

    /// Ends the last subpass and the render pass.
    pub fn end_render_pass(&mut self) {
        let Some(pass) = self.recording().bindings.pass.take() else {
            log::warn!("CommandBuffer: end_render_pass outside a render pass, call skipped.");
            return;
        };
        if let Some(end) = self.transition(&pass) {
            self.push(Command::EndSubpass(end));
        }
        self.push(Command::EndRenderPass);
    }

    /// Clears regions of attachments of the current subpass.
    pub fn clear_attachments(&mut self, attachments: &[ClearAttachment], rects: &[ClearRect]) {
        let (pass, restore) = {
            let recording = self.recording();
            let restore = recording.bindings.pipeline.as_ref().map(|pipeline| pipeline.write_masks());
            (recording.bindings.pass.clone(), restore)
        };
        let Some(pass) = pass else {
            log::warn!("CommandBuffer: clear_attachments outside a render pass, call skipped.");
            return;
        };
        self.push(Command::ClearAttachments(ClearAttachments {
            render_pass: pass.render_pass,
            subpass: pass.subpass,
            render_area: pass.render_area,
            attachments: attachments.to_vec(),
            rects: rects.to_vec(),
            restore,
        }));
    }

    // --- Draws ---

    /// Resolves the vertex array the next draw reads from and records its binding when it changed.
    fn prepare_draw(&mut self, indexed: bool, call: &str) -> Option<Arc<GraphicsPipelineObject>> {
        let mut recording = self.recording();
        let Some(pipeline) = recording.bindings.pipeline.clone() else {
            log::warn!("CommandBuffer: {call} without a bound pipeline, call skipped.");
            return None;
        };

        if !pipeline.has_vertex_input() {
            if recording.bindings.geometry != BoundGeometry::Empty {
                let empty = GeometryBinding::Empty(self.device.empty_geometry.vao);
                recording.commands.push(Command::BindGeometryBuffers(empty));
                recording.bindings.geometry = BoundGeometry::Empty;
            }
            return Some(pipeline);
        }
        if indexed && recording.bindings.index_buffer.is_none() {
            log::warn!("CommandBuffer: {call} without a bound index buffer, call skipped.");
            return None;
        }

        let layout = &pipeline.descriptor.vertex_input;
        let mut vertex = Vec::with_capacity(layout.bindings.len());
        for binding in &layout.bindings {
            match recording.bindings.vertex_buffers.get(&binding.binding) {
                Some((buffer, offset)) => vertex.push((binding.binding, buffer.clone(), *offset)),
                None => {
                    log::warn!("CommandBuffer: {call} reads vertex binding {} but no buffer is bound, call skipped.", binding.binding);
                    return None;
                }
            }
        }
        let intent = GeometryIntent {
            vertex,
            index: recording.bindings.index_buffer.clone(),
            layout: layout.clone(),
            layout_hash: pipeline.vertex_hash,
        };
        let key = intent.key();
        if recording.bindings.geometry == BoundGeometry::Cached(key.clone()) {
            return Some(pipeline);
        }
        let (geometry, created) = self.device.geometry.resolve(intent);
        if created {
            log::debug!("CommandBuffer: new geometry buffers for {key:?}");
        }
        if geometry.vao().is_none() {
            recording.add_pending(geometry.clone());
        }
        recording.commands.push(Command::BindGeometryBuffers(GeometryBinding::Cached(geometry)));
        recording.bindings.geometry = BoundGeometry::Cached(key);
        Some(pipeline)
    }

    /// Records a non-indexed draw with the bound pipeline and geometry.
    pub fn draw(&mut self, vertex_count: u32, instance_count: u32, first_vertex: u32, first_instance: u32) {
        debug_assert!(instance_count >= 1, "draw: instance count must be at least 1");
        let Some(pipeline) = self.prepare_draw(false, "draw") else {
            return;
        };
        self.push(Command::Draw(Draw {
            mode: pipeline.topology(),
            vertex_count,
            instance_count,
            first_vertex,
            first_instance,
        }));
    }

    /// Records an indexed draw with the bound pipeline and geometry.
    pub fn draw_indexed(
        &mut self,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        vertex_offset: i32,
        first_instance: u32,
    ) {
        debug_assert!(instance_count >= 1, "draw_indexed: instance count must be at least 1");
        let Some(pipeline) = self.prepare_draw(true, "draw_indexed") else {
            return;
        };
        let (index_type, index_offset) = match &self.recording().bindings.index_buffer {
            Some((_, offset, ty)) => (*ty, *offset),
            None => {
                let empty = &self.device.empty_geometry;
                if index_count > empty.index_count {
                    log::warn!(
                        "CommandBuffer: draw_indexed reads {index_count} indices, the dummy index buffer holds {}.",
                        empty.index_count
                    );
                }
                (empty.index_type, 0)
            }
        };
        self.push(Command::DrawIndexed(DrawIndexed {
            mode: pipeline.topology(),
            index_type: index_type.into_gl(),
            index_size: index_type.size(),
            index_offset,
            index_count,
            instance_count,
            first_index,
            vertex_offset,
            first_instance,
        }));
    }

    fn draw_indirect_command(
        &mut self,
        buffer: BufferId,
        offset: u64,
        draw_count: u32,
        stride: u32,
        indexed: bool,
    ) -> Option<DrawIndirect> {
        let call = if indexed { "draw_indexed_indirect" } else { "draw_indirect" };
        let buffer = lookup(&self.device.buffers, buffer.0, call)?;
        let pipeline = self.prepare_draw(indexed, call)?;
        let index_type = if indexed {
            let ty = self
                .recording()
                .bindings
                .index_buffer
                .as_ref()
                .map(|(_, _, ty)| *ty)
                .unwrap_or(self.device.empty_geometry.index_type);
            Some(ty.into_gl())
        } else {
            None
        };
        Some(DrawIndirect {
            mode: pipeline.topology(),
            buffer,
            offset,
            draw_count,
            stride,
            index_type,
        })
    }

    /// Records `draw_count` draws read from `buffer`.
    pub fn draw_indirect(&mut self, buffer: BufferId, offset: u64, draw_count: u32, stride: u32) {
        if let Some(draw) = self.draw_indirect_command(buffer, offset, draw_count, stride, false) {
            self.push(Command::DrawIndirect(draw));
        }
    }

    /// Records `draw_count` indexed draws read from `buffer`.
    pub fn draw_indexed_indirect(&mut self, buffer: BufferId, offset: u64, draw_count: u32, stride: u32) {
        if let Some(draw) = self.draw_indirect_command(buffer, offset, draw_count, stride, true) {
            self.push(Command::DrawIndexedIndirect(draw));
        }
    }

    /// Records a compute dispatch with the bound compute pipeline.
    pub fn dispatch(&mut self, x: u32, y: u32, z: u32) {
        self.push(Command::Dispatch([x, y, z]));
    }

    /// Records a compute dispatch reading its group counts from `buffer`.
    pub fn dispatch_indirect(&mut self, buffer: BufferId, offset: u64) {
        if let Some(buffer) = lookup(&self.device.buffers, buffer.0, "dispatch_indirect") {
            self.push(Command::DispatchIndirect { buffer, offset });
        }
    }

    // --- Transfers ---

    /// Copies byte ranges between two buffers.
    pub fn copy_buffer(&mut self, src: BufferId, dst: BufferId, regions: &[BufferCopy]) {
        let (Some(src), Some(dst)) = (
            lookup(&self.device.buffers, src.0, "copy_buffer"),
            lookup(&self.device.buffers, dst.0, "copy_buffer"),
        ) else {
            return;
        };
        self.push(Command::CopyBuffer(CopyBuffer {
            src,
            dst,
            regions: regions.to_vec(),
        }));
    }

    fn buffer_image(&self, buffer: BufferId, texture: TextureId, regions: &[BufferImageCopy], call: &str) -> Option<BufferImageTransfer> {
        Some(BufferImageTransfer {
            buffer: lookup(&self.device.buffers, buffer.0, call)?,
            texture: lookup(&self.device.textures, texture.0, call)?,
            regions: regions.to_vec(),
        })
    }

    /// Uploads buffer contents to texture regions.
    pub fn copy_buffer_to_image(&mut self, src: BufferId, dst: TextureId, regions: &[BufferImageCopy]) {
        if let Some(copy) = self.buffer_image(src, dst, regions, "copy_buffer_to_image") {
            self.push(Command::CopyBufferToImage(copy));
        }
    }

    /// Reads whole texture levels back into a buffer.
    pub fn copy_image_to_buffer(&mut self, src: TextureId, dst: BufferId, regions: &[BufferImageCopy]) {
        if let Some(copy) = self.buffer_image(dst, src, regions, "copy_image_to_buffer") {
            self.push(Command::CopyImageToBuffer(copy));
        }
    }

    /// Copies regions between two textures.
    pub fn copy_image(&mut self, src: TextureId, dst: TextureId, regions: &[ImageCopy]) {
        let (Some(src), Some(dst)) = (
            lookup(&self.device.textures, src.0, "copy_image"),
            lookup(&self.device.textures, dst.0, "copy_image"),
        ) else {
            return;
        };
        self.push(Command::CopyImage(CopyImage {
            src,
            dst,
            regions: regions.to_vec(),
            scratch: self.device.scratch,
        }));
    }

    /// Scales regions between textures through the scratch framebuffers.
    pub fn blit_image(&mut self, src: TextureId, dst: TextureId, regions: &[ImageBlit], filter: Filter) {
        let (Some(src), Some(dst)) = (
            lookup(&self.device.textures, src.0, "blit_image"),
            lookup(&self.device.textures, dst.0, "blit_image"),
        ) else {
            return;
        };
        self.push(Command::BlitImage(BlitImage {
            src,
            dst,
            regions: regions.to_vec(),
            filter: filter.into_gl(),
            scratch: self.device.scratch,
        }));
    }

    /// Clears ranges of a color texture.
    pub fn clear_color_image(&mut self, texture: TextureId, value: ClearColorValue, ranges: &[ImageSubresourceRange]) {
        if let Some(texture) = lookup(&self.device.textures, texture.0, "clear_color_image") {
            self.push(Command::ClearColorImage(ClearColorImage {
                texture,
                value,
                ranges: ranges.to_vec(),
            }));
        }
    }

    /// Clears ranges of a depth stencil texture.
    pub fn clear_depth_stencil_image(
        &mut self,
        texture: TextureId,
        value: ClearDepthStencilValue,
        ranges: &[ImageSubresourceRange],
    ) {
        if let Some(texture) = lookup(&self.device.textures, texture.0, "clear_depth_stencil_image") {
            self.push(Command::ClearDepthStencilImage(ClearDepthStencilImage {
                texture,
                value,
                ranges: ranges.to_vec(),
            }));
        }
    }

    /// Fills every mip level of `texture` from level zero.
    pub fn generate_mipmaps(&mut self, texture: TextureId) {
        if let Some(texture) = lookup(&self.device.textures, texture.0, "generate_mipmaps") {
            self.push(Command::GenerateMipmaps(texture));
        }
    }

    // --- Synchronization ---
    //
    // The driver keeps memory coherent between commands of one context, so
    // barriers record a command that does nothing.

    /// Records barriers. OpenGL orders commands itself, so they apply nothing.
    pub fn pipeline_barrier(
        &mut self,
        src_stages: PipelineStageFlags,
        dst_stages: PipelineStageFlags,
        dependency: DependencyFlags,
        memory_barriers: &[MemoryBarrier],
        buffer_barriers: &[BufferMemoryBarrier],
        image_barriers: &[ImageMemoryBarrier],
    ) {
        log::trace!(
            "CommandBuffer: barrier {src_stages:?} -> {dst_stages:?} ({dependency:?}), {} memory, {} buffer, {} image",
            memory_barriers.len(),
            buffer_barriers.len(),
            image_barriers.len()
        );
        self.push(Command::MemoryBarrier);
    }

    /// Records a global memory barrier.
    pub fn memory_barrier(&mut self, src_stages: PipelineStageFlags, dst_stages: PipelineStageFlags, barrier: &MemoryBarrier) {
        self.pipeline_barrier(src_stages, dst_stages, DependencyFlags::empty(), &[*barrier], &[], &[]);
    }

    /// Records a buffer memory barrier.
    pub fn buffer_memory_barrier(
        &mut self,
        src_stages: PipelineStageFlags,
        dst_stages: PipelineStageFlags,
        barrier: &BufferMemoryBarrier,
    ) {
        self.pipeline_barrier(src_stages, dst_stages, DependencyFlags::empty(), &[], &[*barrier], &[]);
    }

    /// Records an image memory barrier.
    pub fn image_memory_barrier(
        &mut self,
        src_stages: PipelineStageFlags,
        dst_stages: PipelineStageFlags,
        barrier: &ImageMemoryBarrier,
    ) {
        self.pipeline_barrier(src_stages, dst_stages, DependencyFlags::empty(), &[], &[], &[*barrier]);
    }

    // --- Queries ---

    /// Resets a range of a query pool.
    pub fn reset_query_pool(&mut self, pool: QueryPoolId, first_query: u32, query_count: u32) {
        if lookup(&self.device.query_pools, pool.0, "reset_query_pool").is_some() {
            log::trace!("CommandBuffer: resetting queries {first_query}..{}", first_query.saturating_add(query_count));
            self.push(Command::ResetQueryPool);
        }
    }

    /// Starts an occlusion query.
    pub fn begin_query(&mut self, pool: QueryPoolId, query: u32) {
        let Some(pool) = lookup(&self.device.query_pools, pool.0, "begin_query") else {
            return;
        };
        match pool.name(query) {
            Some(name) => self.push(Command::BeginQuery {
                target: pool.query_type.into_gl(),
                query: name,
            }),
            None => log::warn!("CommandBuffer: query pool {:?} has no query {query}.", pool.id),
        }
    }

    /// Ends a query.
    pub fn end_query(&mut self, pool: QueryPoolId, query: u32) {
        let Some(pool) = lookup(&self.device.query_pools, pool.0, "end_query") else {
            return;
        };
        if pool.name(query).is_none() {
            log::warn!("CommandBuffer: query pool {:?} has no query {query}.", pool.id);
            return;
        }
        self.push(Command::EndQuery {
            target: pool.query_type.into_gl(),
        });
    }

    /// Writes a GPU timestamp into `pool` at `query`.
    pub fn write_timestamp(&mut self, stage: PipelineStageFlags, pool: QueryPoolId, query: u32) {
        let Some(pool) = lookup(&self.device.query_pools, pool.0, "write_timestamp") else {
            return;
        };
        log::trace!("CommandBuffer: timestamp after {stage:?}");
        match pool.name(query) {
            Some(name) => self.push(Command::WriteTimestamp { query: name }),
            None => log::warn!("CommandBuffer: query pool {:?} has no query {query}.", pool.id),
        }
    }

    // --- Secondary buffers ---

    /// Splices the commands of secondary buffers into this one.
    ///
    /// The vertex arrays the secondaries still need are created before this
    /// buffer replays.
    pub fn execute_commands(&mut self, secondaries: &[&CommandBuffer]) {
        let mut recording = self.recording();
        for secondary in secondaries {
            if Arc::ptr_eq(&secondary.recording, &self.recording) {
                log::warn!("CommandBuffer: a command buffer cannot execute itself, skipped.");
                continue;
            }
            if secondary.level != CommandBufferLevel::Secondary {
                log::warn!("CommandBuffer: execute_commands given a primary command buffer, skipped.");
                continue;
            }
            let source = secondary.recording();
            if source.state != RecordingState::Executable {
                log::warn!("CommandBuffer: execute_commands given a secondary buffer that was not ended.");
            }
            recording.commands.extend(source.commands.iter().cloned());
            for geometry in &source.pending_geometry {
                recording.add_pending(geometry.clone());
            }
        }
        // The secondaries left unknown bindings behind.
        recording.bindings.geometry = BoundGeometry::None;
    }
}
