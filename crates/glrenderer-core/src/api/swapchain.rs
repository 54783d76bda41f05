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

//! Swap chain descriptors.

use super::dimension::Extent2D;
use super::format::Format;

/// An opaque handle to a swap chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SwapChainId(pub usize);

/// Describes a swap chain.
///
/// The images of an OpenGL swap chain all alias the default framebuffer.
#[derive(Debug, Clone)]
pub struct SwapChainDescriptor {
    /// A debug label.
    pub label: Option<String>,
    /// Size of the back buffer.
    pub extent: Extent2D,
    /// Format of the back buffer.
    pub format: Format,
    /// Number of presentable images.
    pub image_count: u32,
}
