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


//! Command pools.

use super::command_buffer::{CommandBuffer, Recording, RecordingState};
use super::device::DeviceShared;
use super::registry::lock;
use crate::api::{CommandBufferLevel, CommandBufferResetFlags, CommandPoolId, QueueKind};
use std::sync::{Arc, Mutex, Weak};

/// Allocates command buffers and resets them as a group.
///
/// The pool only tracks its buffers; dropping a buffer releases it.
#[derive(Debug)]
pub struct CommandPool {
    id: CommandPoolId,
    queue: QueueKind,
    device: Arc<DeviceShared>,
    recordings: Mutex<Vec<Weak<Mutex<Recording>>>>,
}

impl CommandPool {
    pub(crate) fn new(id: CommandPoolId, queue: QueueKind, device: Arc<DeviceShared>) -> Self {
        Self {
            id,
            queue,
            device,
            recordings: Mutex::new(Vec::new()),
        }
    }

    /// The pool handle.
    pub fn id(&self) -> CommandPoolId {
        self.id
    }

    /// The queue the buffers of this pool are submitted to.
    pub fn queue(&self) -> QueueKind {
        self.queue
    }

    /// Allocates a command buffer in the initial state.
    pub fn allocate(&self, level: CommandBufferLevel) -> CommandBuffer {
        let recording = Arc::new(Mutex::new(Recording::default()));
        let mut recordings = lock(&self.recordings);
        recordings.retain(|weak| weak.strong_count() > 0);
        recordings.push(Arc::downgrade(&recording));
        CommandBuffer::new(level, self.device.clone(), recording)
    }

    /// Returns every live buffer of the pool to the initial state.
    pub fn reset(&self, flags: CommandBufferResetFlags) {
        let release = flags.contains(CommandBufferResetFlags::RELEASE_RESOURCES);
        let mut recordings = lock(&self.recordings);
        recordings.retain(|weak| weak.strong_count() > 0);
        for recording in recordings.iter().filter_map(Weak::upgrade) {
            let mut recording = lock(&recording);
            recording.clear(release);
            recording.state = RecordingState::Initial;
        }
        log::debug!("CommandPool: {:?} reset {} command buffers", self.id, recordings.len());
    }

    /// Number of buffers allocated from the pool that are still alive.
    pub fn live_buffers(&self) -> usize {
        lock(&self.recordings)
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}
