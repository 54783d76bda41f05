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

//! Descriptor set layouts, pools and writes.
//!
//! OpenGL has no descriptor sets. Bindings of set `s` are mapped to the OpenGL
//! binding point `s * BINDINGS_PER_SET + binding`, and GLSL sources written for
//! this backend use those binding points.

use super::buffer::BufferId;
use super::flags::ShaderStageFlags;
use super::texture::{ImageLayout, SamplerId, TextureViewId};

/// Number of OpenGL binding points reserved for each descriptor set.
pub const BINDINGS_PER_SET: u32 = 16;

/// An opaque handle to a descriptor set layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DescriptorSetLayoutId(pub usize);

/// An opaque handle to a descriptor pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DescriptorPoolId(pub usize);

/// An opaque handle to a descriptor set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DescriptorSetId(pub usize);

/// The type of resource bound to a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorType {
    /// A sampler alone.
    Sampler,
    /// A texture and its sampler.
    CombinedImageSampler,
    /// A texture without sampler.
    SampledImage,
    /// An image used with load/store.
    StorageImage,
    /// A uniform texel buffer.
    UniformTexelBuffer,
    /// A storage texel buffer.
    StorageTexelBuffer,
    /// A uniform block.
    UniformBuffer,
    /// A shader storage block.
    StorageBuffer,
    /// A uniform block with an offset given at bind time.
    UniformBufferDynamic,
    /// A shader storage block with an offset given at bind time.
    StorageBufferDynamic,
    /// A subpass input.
    InputAttachment,
}

impl DescriptorType {
    /// `true` for the descriptor types consuming a dynamic offset at bind time.
    pub fn is_dynamic(&self) -> bool {
        matches!(
            self,
            DescriptorType::UniformBufferDynamic | DescriptorType::StorageBufferDynamic
        )
    }

    /// `true` for the descriptor types written with buffer infos.
    pub fn is_buffer(&self) -> bool {
        matches!(
            self,
            DescriptorType::UniformBuffer
                | DescriptorType::StorageBuffer
                | DescriptorType::UniformBufferDynamic
                | DescriptorType::StorageBufferDynamic
                | DescriptorType::UniformTexelBuffer
                | DescriptorType::StorageTexelBuffer
        )
    }
}

/// One binding of a descriptor set layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DescriptorSetLayoutBinding {
    /// Binding number inside the set.
    pub binding: u32,
    /// Resource type.
    pub descriptor_type: DescriptorType,
    /// Array size.
    pub count: u32,
    /// Stages accessing the binding.
    pub stages: ShaderStageFlags,
}

/// Describes a descriptor set layout.
#[derive(Debug, Clone, Default)]
pub struct DescriptorSetLayoutDescriptor {
    /// Bindings of the set.
    pub bindings: Vec<DescriptorSetLayoutBinding>,
}

/// Describes a descriptor pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorPoolDescriptor {
    /// Maximum number of sets allocated at once.
    pub max_sets: u32,
}

/// An image descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DescriptorImageInfo {
    /// Sampler, for sampler and combined descriptors.
    pub sampler: Option<SamplerId>,
    /// View, for image descriptors.
    pub view: Option<TextureViewId>,
    /// Layout of the image when accessed.
    pub layout: ImageLayout,
}

/// A buffer descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DescriptorBufferInfo {
    /// The buffer.
    pub buffer: BufferId,
    /// Byte offset.
    pub offset: u64,
    /// Byte size; `None` covers the rest of the buffer.
    pub range: Option<u64>,
}

/// The resources written to a descriptor binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorResources {
    /// Image, sampler or combined descriptors.
    Images(Vec<DescriptorImageInfo>),
    /// Buffer descriptors.
    Buffers(Vec<DescriptorBufferInfo>),
}

/// Updates the descriptors of one binding of a set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteDescriptorSet {
    /// The updated set.
    pub set: DescriptorSetId,
    /// The updated binding.
    pub binding: u32,
    /// First array element updated.
    pub array_element: u32,
    /// Type of the descriptors.
    pub descriptor_type: DescriptorType,
    /// The new resources.
    pub resources: DescriptorResources,
}
