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

//! Replay statistics.

use std::ops::AddAssign;

/// Counters gathered while a queue replays a submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Command buffers replayed.
    pub command_buffers: u32,
    /// Commands applied.
    pub commands: u32,
    /// Draw commands applied, indirect ones included.
    pub draw_calls: u32,
    /// Dispatch commands applied.
    pub dispatches: u32,
    /// Geometry buffers realized before replay.
    pub realized_geometry: u32,
}

impl AddAssign for ReplayStats {
    fn add_assign(&mut self, other: Self) {
        self.command_buffers += other.command_buffers;
        self.commands += other.commands;
        self.draw_calls += other.draw_calls;
        self.dispatches += other.dispatches;
        self.realized_geometry += other.realized_geometry;
    }
}
