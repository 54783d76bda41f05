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

//! Shader modules, push constants and specialisation constants.

use super::flags::ShaderStageFlags;
use super::format::ConstantFormat;

/// An opaque handle to a compiled shader module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderModuleId(pub usize);

/// A single shader stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex shader.
    Vertex,
    /// Tessellation control shader.
    TessellationControl,
    /// Tessellation evaluation shader.
    TessellationEvaluation,
    /// Geometry shader.
    Geometry,
    /// Fragment shader.
    Fragment,
    /// Compute shader.
    Compute,
}

impl ShaderStage {
    /// The stage as a flag.
    pub fn flag(&self) -> ShaderStageFlags {
        match self {
            ShaderStage::Vertex => ShaderStageFlags::VERTEX,
            ShaderStage::TessellationControl => ShaderStageFlags::TESSELLATION_CONTROL,
            ShaderStage::TessellationEvaluation => ShaderStageFlags::TESSELLATION_EVALUATION,
            ShaderStage::Geometry => ShaderStageFlags::GEOMETRY,
            ShaderStage::Fragment => ShaderStageFlags::FRAGMENT,
            ShaderStage::Compute => ShaderStageFlags::COMPUTE,
        }
    }
}

/// Describes a shader module. The source is GLSL text and is compiled at creation.
#[derive(Debug, Clone)]
pub struct ShaderModuleDescriptor {
    /// A debug label, used in compilation errors.
    pub label: Option<String>,
    /// The stage the source is written for.
    pub stage: ShaderStage,
    /// GLSL source.
    pub source: String,
}

/// A range of push constants declared in a pipeline layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PushConstantRange {
    /// Stages that read the range.
    pub stages: ShaderStageFlags,
    /// Byte offset of the range.
    pub offset: u32,
    /// Byte size of the range.
    pub size: u32,
}

/// One constant of a push constants buffer, mapped to a uniform location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PushConstant {
    /// The uniform location in the shader.
    pub location: u32,
    /// Byte offset of the value in the buffer data.
    pub offset: u32,
    /// Type of the value.
    pub format: ConstantFormat,
    /// Number of array elements (1 for scalars).
    pub array_size: u32,
}

/// A block of push constants and the bytes holding their values.
#[derive(Debug, Clone, PartialEq)]
pub struct PushConstantsBuffer {
    /// Stages that read the constants.
    pub stages: ShaderStageFlags,
    /// Byte offset of the block in the layout's push constant range.
    pub offset: u32,
    /// Declared constants.
    pub constants: Vec<PushConstant>,
    /// Raw constant values.
    pub data: Vec<u8>,
}

impl PushConstantsBuffer {
    /// Creates a buffer large enough for `constants`, zero-filled.
    pub fn new(stages: ShaderStageFlags, offset: u32, constants: Vec<PushConstant>) -> Self {
        let size = constants
            .iter()
            .map(|constant| constant.offset + constant.format.size() * constant.array_size.max(1))
            .max()
            .unwrap_or(0);
        Self {
            stages,
            offset,
            constants,
            data: vec![0; size as usize],
        }
    }

    /// Writes a plain value at `offset` in the buffer data.
    ///
    /// ## Panics
    ///
    /// Panics when the value does not fit in the buffer.
    pub fn write<T: bytemuck::Pod>(&mut self, offset: u32, value: &T) {
        let bytes = bytemuck::bytes_of(value);
        let start = offset as usize;
        self.data[start..start + bytes.len()].copy_from_slice(bytes);
    }
}

/// Maps a specialisation constant to a slice of [`SpecializationInfo::data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpecializationMapEntry {
    /// Constant id, used as its uniform location.
    pub constant_id: u32,
    /// Byte offset in the data.
    pub offset: u32,
    /// Type of the constant.
    pub format: ConstantFormat,
}

/// Specialisation constants of a shader stage.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecializationInfo {
    /// Declared constants.
    pub entries: Vec<SpecializationMapEntry>,
    /// Raw constant values.
    pub data: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_constants_buffer_is_sized_for_its_constants() {
        let buffer = PushConstantsBuffer::new(
            ShaderStageFlags::FRAGMENT,
            0,
            vec![
                PushConstant {
                    location: 0,
                    offset: 0,
                    format: ConstantFormat::Vec4f,
                    array_size: 1,
                },
                PushConstant {
                    location: 1,
                    offset: 16,
                    format: ConstantFormat::Int,
                    array_size: 2,
                },
            ],
        );
        assert_eq!(buffer.data.len(), 24);
    }

    #[test]
    fn write_places_bytes_at_offset() {
        let mut buffer = PushConstantsBuffer::new(
            ShaderStageFlags::VERTEX,
            0,
            vec![PushConstant {
                location: 3,
                offset: 0,
                format: ConstantFormat::Vec2f,
                array_size: 1,
            }],
        );
        buffer.write(4, &2.5f32);
        assert_eq!(&buffer.data[4..8], &2.5f32.to_ne_bytes());
        assert_eq!(&buffer.data[0..4], &[0, 0, 0, 0]);
    }

    #[test]
    fn stage_flags() {
        assert_eq!(ShaderStage::Compute.flag(), ShaderStageFlags::COMPUTE);
    }
}
