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


//! The OpenGL implementation of the explicit rendering contract.
//!
//! Objects live in id-keyed registries owned by the [`Device`]. Recorded
//! commands hold shared references to the objects they use, so destroying a
//! handle never invalidates an already recorded command list.

mod command;
mod command_buffer;
mod command_pool;
mod descriptor;
mod device;
mod framebuffer;
mod geometry;
mod memory;
mod pipeline;
mod program;
mod query;
mod queue;
mod registry;
mod render_pass;
mod resources;
mod swapchain;
mod sync;
mod validator;

pub use command_buffer::{CommandBuffer, RecordingState};
pub use command_pool::CommandPool;
pub use device::Device;
pub use memory::MemoryMap;
pub use queue::Queue;
