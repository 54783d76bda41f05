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

//! Plain-data types of the explicit rendering contract.
//!
//! Nothing in this module touches OpenGL: handles, descriptors, flags and the
//! parameter structs taken by the recording methods of a command buffer.

pub mod buffer;
pub mod command;
pub mod descriptor;
pub mod dimension;
pub mod flags;
pub mod format;
pub mod pipeline;
pub mod render_pass;
pub mod settings;
pub mod shader;
pub mod stats;
pub mod swapchain;
pub mod sync;
pub mod texture;

pub use buffer::*;
pub use command::*;
pub use descriptor::*;
pub use dimension::*;
pub use flags::*;
pub use format::*;
pub use pipeline::*;
pub use render_pass::*;
pub use settings::*;
pub use shader::*;
pub use stats::*;
pub use swapchain::*;
pub use sync::*;
pub use texture::*;
