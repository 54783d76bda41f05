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

//! Buffer and device memory descriptors.

use super::flags::{BufferUsage, MemoryPropertyFlags};

/// An opaque handle to a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub usize);

/// An opaque handle to a device memory allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceMemoryId(pub usize);

/// Describes a buffer to create. The buffer has no storage until memory is bound to it.
#[derive(Debug, Clone)]
pub struct BufferDescriptor {
    /// A debug label.
    pub label: Option<String>,
    /// Size in bytes.
    pub size: u64,
    /// Intended usage.
    pub usage: BufferUsage,
}

/// Describes a device memory allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryAllocateInfo {
    /// Size in bytes.
    pub size: u64,
    /// Required memory properties.
    pub properties: MemoryPropertyFlags,
}

/// The memory a resource needs once bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryRequirements {
    /// Size in bytes.
    pub size: u64,
    /// Required alignment of the bind offset.
    pub alignment: u64,
}

/// A range of a device memory allocation, for flushes and invalidations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappedMemoryRange {
    /// The allocation.
    pub memory: DeviceMemoryId,
    /// Start of the range, in bytes.
    pub offset: u64,
    /// Length of the range, `None` for the rest of the allocation.
    pub size: Option<u64>,
}

/// The type of the indices in an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexType {
    /// 16-bit indices.
    Uint16,
    /// 32-bit indices.
    Uint32,
}

impl IndexType {
    /// Size of one index in bytes.
    pub fn size(&self) -> u64 {
        match self {
            IndexType::Uint16 => 2,
            IndexType::Uint32 => 4,
        }
    }
}
