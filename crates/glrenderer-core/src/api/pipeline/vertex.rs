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

//! Vertex input layouts.

use super::enums::{VertexFormat, VertexStepMode};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Describes one vertex buffer binding point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexBindingDescription {
    /// The binding point.
    pub binding: u32,
    /// The byte distance between consecutive elements in the buffer.
    pub stride: u32,
    /// How often the vertex buffer is advanced.
    pub step_mode: VertexStepMode,
}

/// Describes a single vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttributeDescription {
    /// The input location in the vertex shader (`layout(location = N)`).
    pub location: u32,
    /// The binding point the attribute is read from.
    pub binding: u32,
    /// The format of the attribute's data.
    pub format: VertexFormat,
    /// The byte offset of this attribute from the start of the element.
    pub offset: u32,
}

/// The complete vertex input layout of a pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct VertexInputState {
    /// Binding points.
    pub bindings: Vec<VertexBindingDescription>,
    /// Attributes read from those bindings.
    pub attributes: Vec<VertexAttributeDescription>,
}

impl VertexInputState {
    /// A stable hash of the layout. Two pipelines with equal layouts share geometry buffers.
    pub fn hash_value(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }

    /// `true` when the layout declares no attribute at all.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Looks up a binding point.
    pub fn binding(&self, binding: u32) -> Option<&VertexBindingDescription> {
        self.bindings.iter().find(|desc| desc.binding == binding)
    }
}
