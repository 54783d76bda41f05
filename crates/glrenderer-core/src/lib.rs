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

//! # GlRenderer Core
//!
//! Vulkan-style explicit rendering contract emulated on top of OpenGL.
//!
//! Client code records immutable command buffers against handles created by a
//! [`Device`](backend::Device); recording is pure data. A [`Queue`](backend::Queue)
//! replays the recorded commands against a single [`GraphicsContext`](gl::GraphicsContext)
//! when they are submitted.

#![warn(missing_docs)]

pub mod api;
pub mod backend;
pub mod error;
pub mod gl;

pub use backend::{CommandBuffer, CommandPool, Device, MemoryMap, Queue, RecordingState};
pub use error::{ContextError, PipelineError, RenderError, ResourceError, ShaderError};
pub use gl::{GraphicsContext, TraceContext};
