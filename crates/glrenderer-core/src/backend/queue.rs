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


//! Queues.
//!
//! Every queue replays on the device's only context, synchronously, on the
//! calling thread. Semaphores are accepted and ignored.

use super::command_buffer::{CommandBuffer, RecordingState};
use super::device::DeviceShared;
use crate::api::{CommandBufferLevel, FenceId, QueueKind, ReplayStats, SemaphoreId, SwapChainId};
use crate::error::RenderError;
use std::sync::Arc;

/// A device queue.
#[derive(Debug, Clone)]
pub struct Queue {
    kind: QueueKind,
    device: Arc<DeviceShared>,
}

impl Queue {
    pub(crate) fn new(kind: QueueKind, device: Arc<DeviceShared>) -> Self {
        Self { kind, device }
    }

    /// The queue family this queue submits to.
    pub fn kind(&self) -> QueueKind {
        self.kind
    }

    /// Replays `command_buffers` in order, then signals `fence`.
    ///
    /// The vertex arrays a buffer needs are created right before its replay.
    /// A failure there stops the submission: the buffers replayed so far keep
    /// their effects, the rest are not replayed and the fence is not signaled.
    pub fn submit(
        &self,
        command_buffers: &[&CommandBuffer],
        wait_semaphores: &[SemaphoreId],
        signal_semaphores: &[SemaphoreId],
        fence: Option<FenceId>,
    ) -> Result<ReplayStats, RenderError> {
        let fence = fence.map(|id| self.device.fences.fetch(id.0)).transpose()?;
        for semaphore in wait_semaphores.iter().chain(signal_semaphores) {
            self.device.semaphores.fetch(semaphore.0)?;
        }

        let trace = self.device.settings.trace_commands;
        let kind = self.kind;
        self.device.with_context(|ctx| {
            let mut stats = ReplayStats::default();
            for (index, command_buffer) in command_buffers.iter().enumerate() {
                if command_buffer.level() == CommandBufferLevel::Secondary {
                    log::warn!("Queue: command buffer #{index} is secondary and cannot be submitted, skipped");
                    continue;
                }
                let recording = command_buffer.recording();
                if recording.state != RecordingState::Executable {
                    log::warn!("Queue: command buffer #{index} is submitted in the {:?} state", recording.state);
                }

                for geometry in &recording.pending_geometry {
                    match geometry.initialise(ctx) {
                        Ok(true) => stats.realized_geometry += 1,
                        Ok(false) => {}
                        Err(source) => {
                            log::error!("Queue: command buffer #{index} could not be prepared: {source}");
                            return Err(RenderError::SubmitFailed { index, source });
                        }
                    }
                }

                for command in &recording.commands {
                    if trace {
                        log::trace!("Queue[{kind:?}]: #{index} {}", command.name());
                    }
                    command.apply(ctx);
                    stats.commands += 1;
                    if command.is_draw() {
                        stats.draw_calls += 1;
                    } else if command.is_dispatch() {
                        stats.dispatches += 1;
                    }
                }
                stats.command_buffers += 1;
            }

            match &fence {
                Some(fence) => fence.signal_after_submit(ctx),
                None => ctx.flush(),
            }
            log::trace!("Queue[{kind:?}]: submitted {stats:?}");
            Ok(stats)
        })
    }

    /// Presents the back buffer. Every swap chain aliases it, so it is swapped once.
    pub fn present(
        &self,
        swapchains: &[SwapChainId],
        image_indices: &[u32],
        wait_semaphores: &[SemaphoreId],
    ) -> Result<(), RenderError> {
        for semaphore in wait_semaphores {
            self.device.semaphores.fetch(semaphore.0)?;
        }
        for (id, index) in swapchains.iter().zip(image_indices) {
            let swapchain = self.device.swapchains.fetch(id.0)?;
            if *index as usize >= swapchain.images.len() {
                log::warn!("Queue: {id:?} has no image {index}");
            }
        }
        if swapchains.is_empty() {
            return Ok(());
        }
        self.device.with_context(|ctx| ctx.swap_buffers());
        Ok(())
    }

    /// Blocks until every submitted command has completed.
    pub fn wait_idle(&self) {
        self.device.with_context(|ctx| ctx.finish());
    }
}
