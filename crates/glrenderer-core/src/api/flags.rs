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

//! Bit flags shared by the descriptors and the recording calls.

use bitflags::bitflags;

bitflags! {
    /// The shader stages a resource or push constant range is visible to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShaderStageFlags: u32 {
        /// Vertex stage.
        const VERTEX = 1 << 0;
        /// Tessellation control stage.
        const TESSELLATION_CONTROL = 1 << 1;
        /// Tessellation evaluation stage.
        const TESSELLATION_EVALUATION = 1 << 2;
        /// Geometry stage.
        const GEOMETRY = 1 << 3;
        /// Fragment stage.
        const FRAGMENT = 1 << 4;
        /// Compute stage.
        const COMPUTE = 1 << 5;
        /// Every graphics stage.
        const ALL_GRAPHICS = Self::VERTEX.bits()
            | Self::TESSELLATION_CONTROL.bits()
            | Self::TESSELLATION_EVALUATION.bits()
            | Self::GEOMETRY.bits()
            | Self::FRAGMENT.bits();
    }
}

bitflags! {
    /// How a buffer will be used.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferUsage: u32 {
        /// Source of transfer commands.
        const TRANSFER_SRC = 1 << 0;
        /// Destination of transfer commands.
        const TRANSFER_DST = 1 << 1;
        /// Uniform texel buffer.
        const UNIFORM_TEXEL = 1 << 2;
        /// Storage texel buffer.
        const STORAGE_TEXEL = 1 << 3;
        /// Uniform buffer.
        const UNIFORM = 1 << 4;
        /// Shader storage buffer.
        const STORAGE = 1 << 5;
        /// Index buffer.
        const INDEX = 1 << 6;
        /// Vertex buffer.
        const VERTEX = 1 << 7;
        /// Indirect draw/dispatch parameters.
        const INDIRECT = 1 << 8;
    }
}

bitflags! {
    /// How an image will be used.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TextureUsage: u32 {
        /// Source of transfer commands.
        const TRANSFER_SRC = 1 << 0;
        /// Destination of transfer commands.
        const TRANSFER_DST = 1 << 1;
        /// Sampled by shaders.
        const SAMPLED = 1 << 2;
        /// Storage image.
        const STORAGE = 1 << 3;
        /// Colour attachment.
        const COLOR_ATTACHMENT = 1 << 4;
        /// Depth and/or stencil attachment.
        const DEPTH_STENCIL_ATTACHMENT = 1 << 5;
        /// Input attachment.
        const INPUT_ATTACHMENT = 1 << 6;
    }
}

bitflags! {
    /// Properties of a device memory allocation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MemoryPropertyFlags: u32 {
        /// Device local memory.
        const DEVICE_LOCAL = 1 << 0;
        /// The host can lock the memory.
        const HOST_VISIBLE = 1 << 1;
        /// Host writes do not need an explicit flush.
        const HOST_COHERENT = 1 << 2;
        /// Host reads are cached.
        const HOST_CACHED = 1 << 3;
    }
}

bitflags! {
    /// Pipeline stages, used by barriers, timestamps and submission.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PipelineStageFlags: u32 {
        /// Start of the pipeline.
        const TOP_OF_PIPE = 1 << 0;
        /// Indirect parameters are read.
        const DRAW_INDIRECT = 1 << 1;
        /// Vertex and index buffers are read.
        const VERTEX_INPUT = 1 << 2;
        /// Vertex shader.
        const VERTEX_SHADER = 1 << 3;
        /// Tessellation control shader.
        const TESSELLATION_CONTROL_SHADER = 1 << 4;
        /// Tessellation evaluation shader.
        const TESSELLATION_EVALUATION_SHADER = 1 << 5;
        /// Geometry shader.
        const GEOMETRY_SHADER = 1 << 6;
        /// Fragment shader.
        const FRAGMENT_SHADER = 1 << 7;
        /// Early depth and stencil tests.
        const EARLY_FRAGMENT_TESTS = 1 << 8;
        /// Late depth and stencil tests.
        const LATE_FRAGMENT_TESTS = 1 << 9;
        /// Colour attachment writes.
        const COLOR_ATTACHMENT_OUTPUT = 1 << 10;
        /// Compute shader.
        const COMPUTE_SHADER = 1 << 11;
        /// Transfer commands.
        const TRANSFER = 1 << 12;
        /// End of the pipeline.
        const BOTTOM_OF_PIPE = 1 << 13;
        /// Host access.
        const HOST = 1 << 14;
        /// Every graphics stage.
        const ALL_GRAPHICS = 1 << 15;
        /// Every command.
        const ALL_COMMANDS = 1 << 16;
    }
}

bitflags! {
    /// Memory access types, used by barriers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AccessFlags: u32 {
        /// Indirect command read.
        const INDIRECT_COMMAND_READ = 1 << 0;
        /// Index read.
        const INDEX_READ = 1 << 1;
        /// Vertex attribute read.
        const VERTEX_ATTRIBUTE_READ = 1 << 2;
        /// Uniform read.
        const UNIFORM_READ = 1 << 3;
        /// Input attachment read.
        const INPUT_ATTACHMENT_READ = 1 << 4;
        /// Shader read.
        const SHADER_READ = 1 << 5;
        /// Shader write.
        const SHADER_WRITE = 1 << 6;
        /// Colour attachment read.
        const COLOR_ATTACHMENT_READ = 1 << 7;
        /// Colour attachment write.
        const COLOR_ATTACHMENT_WRITE = 1 << 8;
        /// Depth/stencil attachment read.
        const DEPTH_STENCIL_ATTACHMENT_READ = 1 << 9;
        /// Depth/stencil attachment write.
        const DEPTH_STENCIL_ATTACHMENT_WRITE = 1 << 10;
        /// Transfer read.
        const TRANSFER_READ = 1 << 11;
        /// Transfer write.
        const TRANSFER_WRITE = 1 << 12;
        /// Host read.
        const HOST_READ = 1 << 13;
        /// Host write.
        const HOST_WRITE = 1 << 14;
        /// Any read.
        const MEMORY_READ = 1 << 15;
        /// Any write.
        const MEMORY_WRITE = 1 << 16;
    }
}

bitflags! {
    /// Dependency modifiers of a barrier or subpass dependency.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DependencyFlags: u32 {
        /// The dependency is framebuffer-local.
        const BY_REGION = 1 << 0;
    }
}

bitflags! {
    /// Colour channels written by a colour attachment.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ColorComponentFlags: u32 {
        /// Red channel.
        const R = 1 << 0;
        /// Green channel.
        const G = 1 << 1;
        /// Blue channel.
        const B = 1 << 2;
        /// Alpha channel.
        const A = 1 << 3;
        /// All channels.
        const ALL = Self::R.bits() | Self::G.bits() | Self::B.bits() | Self::A.bits();
    }
}

bitflags! {
    /// Usage hints given to `CommandBuffer::begin`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CommandBufferUsageFlags: u32 {
        /// The buffer is submitted once, then reset.
        const ONE_TIME_SUBMIT = 1 << 0;
        /// A secondary buffer entirely inside a render pass.
        const RENDER_PASS_CONTINUE = 1 << 1;
        /// The buffer may be resubmitted while pending.
        const SIMULTANEOUS_USE = 1 << 2;
    }
}

bitflags! {
    /// Flags given to `CommandBuffer::reset`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CommandBufferResetFlags: u32 {
        /// Release the memory held by the buffer.
        const RELEASE_RESOURCES = 1 << 0;
    }
}

bitflags! {
    /// How query results are returned.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct QueryResultFlags: u32 {
        /// Results are 64-bit.
        const RESULT_64 = 1 << 0;
        /// Wait until results are available.
        const WAIT = 1 << 1;
        /// Also return availability.
        const WITH_AVAILABILITY = 1 << 2;
        /// Partial results are acceptable.
        const PARTIAL = 1 << 3;
    }
}

bitflags! {
    /// The aspects of an image addressed by a subresource.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ImageAspectFlags: u32 {
        /// Colour aspect.
        const COLOR = 1 << 0;
        /// Depth aspect.
        const DEPTH = 1 << 1;
        /// Stencil aspect.
        const STENCIL = 1 << 2;
    }
}

bitflags! {
    /// Which faces a stencil state applies to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StencilFaceFlags: u32 {
        /// Front faces.
        const FRONT = 1 << 0;
        /// Back faces.
        const BACK = 1 << 1;
        /// Both faces.
        const FRONT_AND_BACK = Self::FRONT.bits() | Self::BACK.bits();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_stage_union_and_contains() {
        let stages = ShaderStageFlags::VERTEX | ShaderStageFlags::FRAGMENT;
        assert!(stages.contains(ShaderStageFlags::VERTEX));
        assert!(!stages.contains(ShaderStageFlags::COMPUTE));
        assert!(ShaderStageFlags::ALL_GRAPHICS.contains(stages));
    }

    #[test]
    fn color_components_all() {
        assert_eq!(ColorComponentFlags::ALL.bits(), 0b1111);
        assert!(ColorComponentFlags::ALL.contains(ColorComponentFlags::A));
    }
}
