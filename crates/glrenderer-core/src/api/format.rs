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

//! Pixel formats and shader constant formats.

/// The pixel format of an image or attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// One 8-bit normalized unsigned component.
    R8Unorm,
    /// One 8-bit normalized signed component.
    R8Snorm,
    /// One 8-bit unsigned integer component.
    R8Uint,
    /// One 8-bit signed integer component.
    R8Sint,
    /// Two 8-bit normalized unsigned components.
    Rg8Unorm,
    /// Two 8-bit unsigned integer components.
    Rg8Uint,
    /// Three 8-bit normalized unsigned components.
    Rgb8Unorm,
    /// Four 8-bit normalized unsigned components.
    Rgba8Unorm,
    /// Four 8-bit normalized signed components.
    Rgba8Snorm,
    /// Four 8-bit unsigned integer components.
    Rgba8Uint,
    /// Four 8-bit signed integer components.
    Rgba8Sint,
    /// Four 8-bit normalized unsigned components, sRGB encoded.
    Rgba8Srgb,
    /// Four 8-bit normalized unsigned components in BGRA order.
    Bgra8Unorm,
    /// Four 8-bit normalized unsigned components in BGRA order, sRGB encoded.
    Bgra8Srgb,
    /// One 16-bit float component.
    R16Float,
    /// One 16-bit unsigned integer component.
    R16Uint,
    /// One 16-bit signed integer component.
    R16Sint,
    /// Two 16-bit float components.
    Rg16Float,
    /// Four 16-bit float components.
    Rgba16Float,
    /// Four 16-bit unsigned integer components.
    Rgba16Uint,
    /// Four 16-bit signed integer components.
    Rgba16Sint,
    /// One 32-bit float component.
    R32Float,
    /// One 32-bit unsigned integer component.
    R32Uint,
    /// One 32-bit signed integer component.
    R32Sint,
    /// Two 32-bit float components.
    Rg32Float,
    /// Two 32-bit unsigned integer components.
    Rg32Uint,
    /// Three 32-bit float components.
    Rgb32Float,
    /// Four 32-bit float components.
    Rgba32Float,
    /// Four 32-bit unsigned integer components.
    Rgba32Uint,
    /// Four 32-bit signed integer components.
    Rgba32Sint,
    /// Packed 10-bit colour with a 2-bit alpha.
    Rgb10A2Unorm,
    /// Packed 11/11/10-bit float colour.
    Rg11B10Float,
    /// 16-bit normalized depth.
    D16Unorm,
    /// 24-bit normalized depth.
    D24Unorm,
    /// 32-bit float depth.
    D32Float,
    /// 8-bit stencil.
    S8Uint,
    /// 24-bit normalized depth with 8-bit stencil.
    D24UnormS8Uint,
    /// 32-bit float depth with 8-bit stencil.
    D32FloatS8Uint,
}

impl Format {
    /// `true` for depth-only formats.
    pub fn is_depth(&self) -> bool {
        matches!(self, Format::D16Unorm | Format::D24Unorm | Format::D32Float)
    }

    /// `true` for stencil-only formats.
    pub fn is_stencil(&self) -> bool {
        matches!(self, Format::S8Uint)
    }

    /// `true` for combined depth-stencil formats.
    pub fn is_depth_stencil(&self) -> bool {
        matches!(self, Format::D24UnormS8Uint | Format::D32FloatS8Uint)
    }

    /// `true` for any format that is not a colour format.
    pub fn is_depth_or_stencil(&self) -> bool {
        self.is_depth() || self.is_stencil() || self.is_depth_stencil()
    }

    /// `true` when the format carries a depth aspect.
    pub fn has_depth(&self) -> bool {
        self.is_depth() || self.is_depth_stencil()
    }

    /// `true` when the format carries a stencil aspect.
    pub fn has_stencil(&self) -> bool {
        self.is_stencil() || self.is_depth_stencil()
    }

    /// `true` for non-normalized integer colour formats.
    pub fn is_integer(&self) -> bool {
        self.is_unsigned_integer() || self.is_signed_integer()
    }

    /// `true` for unsigned integer colour formats.
    pub fn is_unsigned_integer(&self) -> bool {
        matches!(
            self,
            Format::R8Uint
                | Format::Rg8Uint
                | Format::Rgba8Uint
                | Format::R16Uint
                | Format::Rgba16Uint
                | Format::R32Uint
                | Format::Rg32Uint
                | Format::Rgba32Uint
        )
    }

    /// `true` for signed integer colour formats.
    pub fn is_signed_integer(&self) -> bool {
        matches!(
            self,
            Format::R8Sint
                | Format::Rgba8Sint
                | Format::R16Sint
                | Format::Rgba16Sint
                | Format::R32Sint
                | Format::Rgba32Sint
        )
    }

    /// The number of components a shader sees when reading or writing this format.
    pub fn component_count(&self) -> u32 {
        match self {
            Format::R8Unorm
            | Format::R8Snorm
            | Format::R8Uint
            | Format::R8Sint
            | Format::R16Float
            | Format::R16Uint
            | Format::R16Sint
            | Format::R32Float
            | Format::R32Uint
            | Format::R32Sint
            | Format::D16Unorm
            | Format::D24Unorm
            | Format::D32Float
            | Format::S8Uint => 1,
            Format::Rg8Unorm
            | Format::Rg8Uint
            | Format::Rg16Float
            | Format::Rg32Float
            | Format::Rg32Uint
            | Format::D24UnormS8Uint
            | Format::D32FloatS8Uint => 2,
            Format::Rgb8Unorm | Format::Rgb32Float | Format::Rg11B10Float => 3,
            Format::Rgba8Unorm
            | Format::Rgba8Snorm
            | Format::Rgba8Uint
            | Format::Rgba8Sint
            | Format::Rgba8Srgb
            | Format::Bgra8Unorm
            | Format::Bgra8Srgb
            | Format::Rgba16Float
            | Format::Rgba16Uint
            | Format::Rgba16Sint
            | Format::Rgba32Float
            | Format::Rgba32Uint
            | Format::Rgba32Sint
            | Format::Rgb10A2Unorm => 4,
        }
    }

    /// The size in bytes of one texel, as laid out in a transfer buffer.
    pub fn texel_size(&self) -> u32 {
        match self {
            Format::R8Unorm | Format::R8Snorm | Format::R8Uint | Format::R8Sint => 1,
            Format::S8Uint => 1,
            Format::Rg8Unorm | Format::Rg8Uint => 2,
            Format::R16Float | Format::R16Uint | Format::R16Sint | Format::D16Unorm => 2,
            Format::Rgb8Unorm => 3,
            Format::Rgba8Unorm
            | Format::Rgba8Snorm
            | Format::Rgba8Uint
            | Format::Rgba8Sint
            | Format::Rgba8Srgb
            | Format::Bgra8Unorm
            | Format::Bgra8Srgb
            | Format::Rg16Float
            | Format::R32Float
            | Format::R32Uint
            | Format::R32Sint
            | Format::Rgb10A2Unorm
            | Format::Rg11B10Float
            | Format::D24Unorm
            | Format::D32Float
            | Format::D24UnormS8Uint => 4,
            Format::Rgba16Float
            | Format::Rgba16Uint
            | Format::Rgba16Sint
            | Format::Rg32Float
            | Format::Rg32Uint
            | Format::D32FloatS8Uint => 8,
            Format::Rgb32Float => 12,
            Format::Rgba32Float | Format::Rgba32Uint | Format::Rgba32Sint => 16,
        }
    }
}

/// The type of a push constant or specialisation constant, as declared in the shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstantFormat {
    /// `float`
    Float,
    /// `vec2`
    Vec2f,
    /// `vec3`
    Vec3f,
    /// `vec4`
    Vec4f,
    /// `int`
    Int,
    /// `ivec2`
    Vec2i,
    /// `ivec3`
    Vec3i,
    /// `ivec4`
    Vec4i,
    /// `uint`
    UInt,
    /// `uvec2`
    Vec2ui,
    /// `uvec3`
    Vec3ui,
    /// `uvec4`
    Vec4ui,
    /// `mat2`
    Mat2f,
    /// `mat3`
    Mat3f,
    /// `mat4`
    Mat4f,
    /// A `vec4` colour.
    Color,
}

impl ConstantFormat {
    /// The size in bytes of one element of this type.
    pub fn size(&self) -> u32 {
        match self {
            ConstantFormat::Float | ConstantFormat::Int | ConstantFormat::UInt => 4,
            ConstantFormat::Vec2f | ConstantFormat::Vec2i | ConstantFormat::Vec2ui => 8,
            ConstantFormat::Vec3f | ConstantFormat::Vec3i | ConstantFormat::Vec3ui => 12,
            ConstantFormat::Vec4f
            | ConstantFormat::Vec4i
            | ConstantFormat::Vec4ui
            | ConstantFormat::Color
            | ConstantFormat::Mat2f => 16,
            ConstantFormat::Mat3f => 36,
            ConstantFormat::Mat4f => 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_stencil_classification_is_exclusive() {
        for format in [Format::D16Unorm, Format::D24Unorm, Format::D32Float] {
            assert!(format.is_depth());
            assert!(!format.is_depth_stencil());
            assert!(!format.has_stencil());
        }
        assert!(Format::S8Uint.is_stencil());
        assert!(Format::D24UnormS8Uint.is_depth_stencil());
        assert!(Format::D24UnormS8Uint.has_depth() && Format::D24UnormS8Uint.has_stencil());
        assert!(!Format::Rgba8Unorm.is_depth_or_stencil());
    }

    #[test]
    fn integer_formats() {
        assert!(Format::Rgba32Uint.is_unsigned_integer());
        assert!(Format::R32Sint.is_signed_integer());
        assert!(!Format::Rgba16Float.is_integer());
    }

    #[test]
    fn texel_sizes() {
        assert_eq!(Format::Rgba8Unorm.texel_size(), 4);
        assert_eq!(Format::Rgba32Float.texel_size(), 16);
        assert_eq!(Format::D32FloatS8Uint.texel_size(), 8);
    }

    #[test]
    fn constant_sizes() {
        assert_eq!(ConstantFormat::Mat4f.size(), 64);
        assert_eq!(ConstantFormat::Vec3i.size(), 12);
    }
}
