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

//! Conversions from the backend-agnostic API types to OpenGL enums.

use super::enums::{self as gl, GLenum};
use crate::api::{
    AddressMode, BlendFactor, BlendOp, CompareOp, CullMode, Filter, Format, FrontFace, IndexType,
    LogicOp, MipmapMode, PolygonMode, PrimitiveTopology, QueryType, ShaderStage, StencilOp,
    TextureDimension, TextureViewDimension, VertexFormat,
};

/// A local conversion trait from API types into their OpenGL representation.
pub trait IntoGl<T> {
    /// Converts `self` into the OpenGL value.
    fn into_gl(self) -> T;
}

/// The three enums OpenGL needs to allocate and transfer a pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlPixelFormat {
    /// Sized internal format, used for storage allocation.
    pub internal_format: GLenum,
    /// Client pixel format, used for transfers.
    pub format: GLenum,
    /// Client component type, used for transfers.
    pub ty: GLenum,
}

impl GlPixelFormat {
    const fn new(internal_format: GLenum, format: GLenum, ty: GLenum) -> Self {
        Self {
            internal_format,
            format,
            ty,
        }
    }
}

impl IntoGl<GlPixelFormat> for Format {
    fn into_gl(self) -> GlPixelFormat {
        match self {
            Format::R8Unorm => GlPixelFormat::new(gl::R8, gl::RED, gl::UNSIGNED_BYTE),
            Format::R8Snorm => GlPixelFormat::new(gl::R8_SNORM, gl::RED, gl::BYTE),
            Format::R8Uint => GlPixelFormat::new(gl::R8UI, gl::RED_INTEGER, gl::UNSIGNED_BYTE),
            Format::R8Sint => GlPixelFormat::new(gl::R8I, gl::RED_INTEGER, gl::BYTE),
            Format::Rg8Unorm => GlPixelFormat::new(gl::RG8, gl::RG, gl::UNSIGNED_BYTE),
            Format::Rg8Uint => GlPixelFormat::new(gl::RG8UI, gl::RG_INTEGER, gl::UNSIGNED_BYTE),
            Format::Rgb8Unorm => GlPixelFormat::new(gl::RGB8, gl::RGB, gl::UNSIGNED_BYTE),
            Format::Rgba8Unorm => GlPixelFormat::new(gl::RGBA8, gl::RGBA, gl::UNSIGNED_BYTE),
            Format::Rgba8Snorm => GlPixelFormat::new(gl::RGBA8_SNORM, gl::RGBA, gl::BYTE),
            Format::Rgba8Uint => {
                GlPixelFormat::new(gl::RGBA8UI, gl::RGBA_INTEGER, gl::UNSIGNED_BYTE)
            }
            Format::Rgba8Sint => GlPixelFormat::new(gl::RGBA8I, gl::RGBA_INTEGER, gl::BYTE),
            Format::Rgba8Srgb => GlPixelFormat::new(gl::SRGB8_ALPHA8, gl::RGBA, gl::UNSIGNED_BYTE),
            Format::Bgra8Unorm => GlPixelFormat::new(gl::RGBA8, gl::BGRA, gl::UNSIGNED_BYTE),
            Format::Bgra8Srgb => GlPixelFormat::new(gl::SRGB8_ALPHA8, gl::BGRA, gl::UNSIGNED_BYTE),
            Format::R16Float => GlPixelFormat::new(gl::R16F, gl::RED, gl::HALF_FLOAT),
            Format::R16Uint => GlPixelFormat::new(gl::R16UI, gl::RED_INTEGER, gl::UNSIGNED_SHORT),
            Format::R16Sint => GlPixelFormat::new(gl::R16I, gl::RED_INTEGER, gl::SHORT),
            Format::Rg16Float => GlPixelFormat::new(gl::RG16F, gl::RG, gl::HALF_FLOAT),
            Format::Rgba16Float => GlPixelFormat::new(gl::RGBA16F, gl::RGBA, gl::HALF_FLOAT),
            Format::Rgba16Uint => {
                GlPixelFormat::new(gl::RGBA16UI, gl::RGBA_INTEGER, gl::UNSIGNED_SHORT)
            }
            Format::Rgba16Sint => GlPixelFormat::new(gl::RGBA16I, gl::RGBA_INTEGER, gl::SHORT),
            Format::R32Float => GlPixelFormat::new(gl::R32F, gl::RED, gl::FLOAT),
            Format::R32Uint => GlPixelFormat::new(gl::R32UI, gl::RED_INTEGER, gl::UNSIGNED_INT),
            Format::R32Sint => GlPixelFormat::new(gl::R32I, gl::RED_INTEGER, gl::INT),
            Format::Rg32Float => GlPixelFormat::new(gl::RG32F, gl::RG, gl::FLOAT),
            Format::Rg32Uint => GlPixelFormat::new(gl::RG32UI, gl::RG_INTEGER, gl::UNSIGNED_INT),
            Format::Rgb32Float => GlPixelFormat::new(gl::RGB32F, gl::RGB, gl::FLOAT),
            Format::Rgba32Float => GlPixelFormat::new(gl::RGBA32F, gl::RGBA, gl::FLOAT),
            Format::Rgba32Uint => {
                GlPixelFormat::new(gl::RGBA32UI, gl::RGBA_INTEGER, gl::UNSIGNED_INT)
            }
            Format::Rgba32Sint => GlPixelFormat::new(gl::RGBA32I, gl::RGBA_INTEGER, gl::INT),
            Format::Rgb10A2Unorm => {
                GlPixelFormat::new(gl::RGB10_A2, gl::RGBA, gl::UNSIGNED_INT_2_10_10_10_REV)
            }
            Format::Rg11B10Float => {
                GlPixelFormat::new(gl::R11F_G11F_B10F, gl::RGB, gl::UNSIGNED_INT_10F_11F_11F_REV)
            }
            Format::D16Unorm => {
                GlPixelFormat::new(gl::DEPTH_COMPONENT16, gl::DEPTH_COMPONENT, gl::UNSIGNED_SHORT)
            }
            Format::D24Unorm => {
                GlPixelFormat::new(gl::DEPTH_COMPONENT24, gl::DEPTH_COMPONENT, gl::UNSIGNED_INT)
            }
            Format::D32Float => {
                GlPixelFormat::new(gl::DEPTH_COMPONENT32F, gl::DEPTH_COMPONENT, gl::FLOAT)
            }
            Format::S8Uint => {
                GlPixelFormat::new(gl::STENCIL_INDEX8, gl::STENCIL_INDEX, gl::UNSIGNED_BYTE)
            }
            Format::D24UnormS8Uint => {
                GlPixelFormat::new(gl::DEPTH24_STENCIL8, gl::DEPTH_STENCIL, gl::UNSIGNED_INT_24_8)
            }
            Format::D32FloatS8Uint => GlPixelFormat::new(
                gl::DEPTH32F_STENCIL8,
                gl::DEPTH_STENCIL,
                gl::FLOAT_32_UNSIGNED_INT_24_8_REV,
            ),
        }
    }
}

/// The framebuffer attachment point for an attachment of `format`.
///
/// Colour attachments are numbered by `color_index`, the position among the
/// colour attachments of the framebuffer.
pub fn attachment_point(format: Format, color_index: u32) -> GLenum {
    if format.is_depth_stencil() {
        gl::DEPTH_STENCIL_ATTACHMENT
    } else if format.is_depth() {
        gl::DEPTH_ATTACHMENT
    } else if format.is_stencil() {
        gl::STENCIL_ATTACHMENT
    } else {
        gl::COLOR_ATTACHMENT0 + color_index
    }
}

/// The `glBlitFramebuffer` mask that copies every aspect of `format`.
pub fn blit_mask(format: Format) -> GLenum {
    if format.is_depth_stencil() {
        gl::DEPTH_BUFFER_BIT | gl::STENCIL_BUFFER_BIT
    } else if format.is_depth() {
        gl::DEPTH_BUFFER_BIT
    } else if format.is_stencil() {
        gl::STENCIL_BUFFER_BIT
    } else {
        gl::COLOR_BUFFER_BIT
    }
}

/// The texture target an image is created with.
pub fn texture_target(
    dimension: TextureDimension,
    array_layers: u32,
    samples: u32,
    cube_compatible: bool,
) -> GLenum {
    match dimension {
        TextureDimension::D1 if array_layers > 1 => gl::TEXTURE_1D_ARRAY,
        TextureDimension::D1 => gl::TEXTURE_1D,
        TextureDimension::D2 if samples > 1 && array_layers > 1 => gl::TEXTURE_2D_MULTISAMPLE_ARRAY,
        TextureDimension::D2 if samples > 1 => gl::TEXTURE_2D_MULTISAMPLE,
        TextureDimension::D2 if cube_compatible && array_layers > 6 => gl::TEXTURE_CUBE_MAP_ARRAY,
        TextureDimension::D2 if cube_compatible && array_layers == 6 => gl::TEXTURE_CUBE_MAP,
        TextureDimension::D2 if array_layers > 1 => gl::TEXTURE_2D_ARRAY,
        TextureDimension::D2 => gl::TEXTURE_2D,
        TextureDimension::D3 => gl::TEXTURE_3D,
    }
}

/// The texture target an image view is sampled through.
pub fn view_target(dimension: TextureViewDimension, samples: u32) -> GLenum {
    match dimension {
        TextureViewDimension::D1 => gl::TEXTURE_1D,
        TextureViewDimension::D1Array => gl::TEXTURE_1D_ARRAY,
        TextureViewDimension::D2 if samples > 1 => gl::TEXTURE_2D_MULTISAMPLE,
        TextureViewDimension::D2 => gl::TEXTURE_2D,
        TextureViewDimension::D2Array if samples > 1 => gl::TEXTURE_2D_MULTISAMPLE_ARRAY,
        TextureViewDimension::D2Array => gl::TEXTURE_2D_ARRAY,
        TextureViewDimension::Cube => gl::TEXTURE_CUBE_MAP,
        TextureViewDimension::CubeArray => gl::TEXTURE_CUBE_MAP_ARRAY,
        TextureViewDimension::D3 => gl::TEXTURE_3D,
    }
}

/// `GL_TEXTURE_MIN_FILTER` for a minification filter combined with a mipmap mode.
pub fn min_filter(filter: Filter, mipmap_mode: MipmapMode) -> GLenum {
    match (filter, mipmap_mode) {
        (Filter::Nearest, MipmapMode::Nearest) => gl::NEAREST_MIPMAP_NEAREST,
        (Filter::Linear, MipmapMode::Nearest) => gl::LINEAR_MIPMAP_NEAREST,
        (Filter::Nearest, MipmapMode::Linear) => gl::NEAREST_MIPMAP_LINEAR,
        (Filter::Linear, MipmapMode::Linear) => gl::LINEAR_MIPMAP_LINEAR,
    }
}

impl IntoGl<GLenum> for Filter {
    fn into_gl(self) -> GLenum {
        match self {
            Filter::Nearest => gl::NEAREST,
            Filter::Linear => gl::LINEAR,
        }
    }
}

impl IntoGl<GLenum> for AddressMode {
    fn into_gl(self) -> GLenum {
        match self {
            AddressMode::Repeat => gl::REPEAT,
            AddressMode::MirroredRepeat => gl::MIRRORED_REPEAT,
            AddressMode::ClampToEdge => gl::CLAMP_TO_EDGE,
            AddressMode::ClampToBorder => gl::CLAMP_TO_BORDER,
            AddressMode::MirrorClampToEdge => gl::MIRROR_CLAMP_TO_EDGE,
        }
    }
}

/// Component type of a vertex attribute.
impl IntoGl<GLenum> for VertexFormat {
    fn into_gl(self) -> GLenum {
        match self {
            VertexFormat::Uint8x4 | VertexFormat::Unorm8x4 => gl::UNSIGNED_BYTE,
            VertexFormat::Sint8x4 | VertexFormat::Snorm8x4 => gl::BYTE,
            VertexFormat::Unorm16x2 | VertexFormat::Unorm16x4 => gl::UNSIGNED_SHORT,
            VertexFormat::Float16x2 | VertexFormat::Float16x4 => gl::HALF_FLOAT,
            VertexFormat::Float32
            | VertexFormat::Float32x2
            | VertexFormat::Float32x3
            | VertexFormat::Float32x4 => gl::FLOAT,
            VertexFormat::Uint32
            | VertexFormat::Uint32x2
            | VertexFormat::Uint32x3
            | VertexFormat::Uint32x4 => gl::UNSIGNED_INT,
            VertexFormat::Sint32
            | VertexFormat::Sint32x2
            | VertexFormat::Sint32x3
            | VertexFormat::Sint32x4 => gl::INT,
        }
    }
}

impl IntoGl<GLenum> for IndexType {
    fn into_gl(self) -> GLenum {
        match self {
            IndexType::Uint16 => gl::UNSIGNED_SHORT,
            IndexType::Uint32 => gl::UNSIGNED_INT,
        }
    }
}

impl IntoGl<GLenum> for PrimitiveTopology {
    fn into_gl(self) -> GLenum {
        match self {
            PrimitiveTopology::PointList => gl::POINTS,
            PrimitiveTopology::LineList => gl::LINES,
            PrimitiveTopology::LineStrip => gl::LINE_STRIP,
            PrimitiveTopology::TriangleList => gl::TRIANGLES,
            PrimitiveTopology::TriangleStrip => gl::TRIANGLE_STRIP,
            PrimitiveTopology::TriangleFan => gl::TRIANGLE_FAN,
            PrimitiveTopology::PatchList => gl::PATCHES,
        }
    }
}

/// `None` when culling is disabled.
impl IntoGl<Option<GLenum>> for CullMode {
    fn into_gl(self) -> Option<GLenum> {
        match self {
            CullMode::None => None,
            CullMode::Front => Some(gl::FRONT),
            CullMode::Back => Some(gl::BACK),
            CullMode::FrontAndBack => Some(gl::FRONT_AND_BACK),
        }
    }
}

impl IntoGl<GLenum> for FrontFace {
    fn into_gl(self) -> GLenum {
        match self {
            FrontFace::Ccw => gl::CCW,
            FrontFace::Cw => gl::CW,
        }
    }
}

impl IntoGl<GLenum> for PolygonMode {
    fn into_gl(self) -> GLenum {
        match self {
            PolygonMode::Fill => gl::FILL,
            PolygonMode::Line => gl::LINE,
            PolygonMode::Point => gl::POINT,
        }
    }
}

impl IntoGl<GLenum> for CompareOp {
    fn into_gl(self) -> GLenum {
        match self {
            CompareOp::Never => gl::NEVER,
            CompareOp::Less => gl::LESS,
            CompareOp::Equal => gl::EQUAL,
            CompareOp::LessEqual => gl::LEQUAL,
            CompareOp::Greater => gl::GREATER,
            CompareOp::NotEqual => gl::NOTEQUAL,
            CompareOp::GreaterEqual => gl::GEQUAL,
            CompareOp::Always => gl::ALWAYS,
        }
    }
}

impl IntoGl<GLenum> for StencilOp {
    fn into_gl(self) -> GLenum {
        match self {
            StencilOp::Keep => gl::KEEP,
            StencilOp::Zero => gl::ZERO,
            StencilOp::Replace => gl::REPLACE,
            StencilOp::IncrementClamp => gl::INCR,
            StencilOp::DecrementClamp => gl::DECR,
            StencilOp::Invert => gl::INVERT,
            StencilOp::IncrementWrap => gl::INCR_WRAP,
            StencilOp::DecrementWrap => gl::DECR_WRAP,
        }
    }
}

impl IntoGl<GLenum> for BlendFactor {
    fn into_gl(self) -> GLenum {
        match self {
            BlendFactor::Zero => gl::ZERO,
            BlendFactor::One => gl::ONE,
            BlendFactor::SrcColor => gl::SRC_COLOR,
            BlendFactor::OneMinusSrcColor => gl::ONE_MINUS_SRC_COLOR,
            BlendFactor::DstColor => gl::DST_COLOR,
            BlendFactor::OneMinusDstColor => gl::ONE_MINUS_DST_COLOR,
            BlendFactor::SrcAlpha => gl::SRC_ALPHA,
            BlendFactor::OneMinusSrcAlpha => gl::ONE_MINUS_SRC_ALPHA,
            BlendFactor::DstAlpha => gl::DST_ALPHA,
            BlendFactor::OneMinusDstAlpha => gl::ONE_MINUS_DST_ALPHA,
            BlendFactor::ConstantColor => gl::CONSTANT_COLOR,
            BlendFactor::OneMinusConstantColor => gl::ONE_MINUS_CONSTANT_COLOR,
            BlendFactor::ConstantAlpha => gl::CONSTANT_ALPHA,
            BlendFactor::OneMinusConstantAlpha => gl::ONE_MINUS_CONSTANT_ALPHA,
            BlendFactor::SrcAlphaSaturate => gl::SRC_ALPHA_SATURATE,
        }
    }
}

impl IntoGl<GLenum> for BlendOp {
    fn into_gl(self) -> GLenum {
        match self {
            BlendOp::Add => gl::FUNC_ADD,
            BlendOp::Subtract => gl::FUNC_SUBTRACT,
            BlendOp::ReverseSubtract => gl::FUNC_REVERSE_SUBTRACT,
            BlendOp::Min => gl::MIN,
            BlendOp::Max => gl::MAX,
        }
    }
}

impl IntoGl<GLenum> for LogicOp {
    fn into_gl(self) -> GLenum {
        match self {
            LogicOp::Clear => gl::CLEAR,
            LogicOp::And => gl::AND,
            LogicOp::AndReverse => gl::AND_REVERSE,
            LogicOp::Copy => gl::COPY,
            LogicOp::AndInverted => gl::AND_INVERTED,
            LogicOp::NoOp => gl::NOOP,
            LogicOp::Xor => gl::XOR,
            LogicOp::Or => gl::OR,
            LogicOp::Nor => gl::NOR,
            LogicOp::Equivalent => gl::EQUIV,
            LogicOp::Invert => gl::INVERT,
            LogicOp::OrReverse => gl::OR_REVERSE,
            LogicOp::CopyInverted => gl::COPY_INVERTED,
            LogicOp::OrInverted => gl::OR_INVERTED,
            LogicOp::Nand => gl::NAND,
            LogicOp::Set => gl::SET,
        }
    }
}

impl IntoGl<GLenum> for ShaderStage {
    fn into_gl(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::TessellationControl => gl::TESS_CONTROL_SHADER,
            ShaderStage::TessellationEvaluation => gl::TESS_EVALUATION_SHADER,
            ShaderStage::Geometry => gl::GEOMETRY_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
            ShaderStage::Compute => gl::COMPUTE_SHADER,
        }
    }
}

impl IntoGl<GLenum> for QueryType {
    fn into_gl(self) -> GLenum {
        match self {
            QueryType::Occlusion => gl::SAMPLES_PASSED,
            QueryType::Timestamp => gl::TIMESTAMP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_formats_use_depth_transfer_formats() {
        let d32: GlPixelFormat = Format::D32Float.into_gl();
        assert_eq!(d32.internal_format, gl::DEPTH_COMPONENT32F);
        assert_eq!(d32.format, gl::DEPTH_COMPONENT);
        let ds: GlPixelFormat = Format::D24UnormS8Uint.into_gl();
        assert_eq!(ds.format, gl::DEPTH_STENCIL);
        assert_eq!(ds.ty, gl::UNSIGNED_INT_24_8);
    }

    #[test]
    fn integer_formats_use_integer_transfer_formats() {
        let rgba: GlPixelFormat = Format::Rgba32Uint.into_gl();
        assert_eq!(rgba.format, gl::RGBA_INTEGER);
        let r: GlPixelFormat = Format::R32Sint.into_gl();
        assert_eq!(r.format, gl::RED_INTEGER);
    }

    #[test]
    fn attachment_points() {
        assert_eq!(attachment_point(Format::Rgba8Unorm, 2), gl::COLOR_ATTACHMENT0 + 2);
        assert_eq!(attachment_point(Format::D32Float, 0), gl::DEPTH_ATTACHMENT);
        assert_eq!(attachment_point(Format::S8Uint, 0), gl::STENCIL_ATTACHMENT);
        assert_eq!(
            attachment_point(Format::D24UnormS8Uint, 0),
            gl::DEPTH_STENCIL_ATTACHMENT
        );
    }

    #[test]
    fn blit_masks_follow_format_aspects() {
        assert_eq!(blit_mask(Format::Rgba8Unorm), gl::COLOR_BUFFER_BIT);
        assert_eq!(blit_mask(Format::D16Unorm), gl::DEPTH_BUFFER_BIT);
        assert_eq!(blit_mask(Format::S8Uint), gl::STENCIL_BUFFER_BIT);
        assert_eq!(
            blit_mask(Format::D32FloatS8Uint),
            gl::DEPTH_BUFFER_BIT | gl::STENCIL_BUFFER_BIT
        );
    }

    #[test]
    fn texture_targets() {
        assert_eq!(texture_target(TextureDimension::D2, 1, 1, false), gl::TEXTURE_2D);
        assert_eq!(texture_target(TextureDimension::D2, 1, 4, false), gl::TEXTURE_2D_MULTISAMPLE);
        assert_eq!(texture_target(TextureDimension::D2, 6, 1, true), gl::TEXTURE_CUBE_MAP);
        assert_eq!(texture_target(TextureDimension::D2, 12, 1, true), gl::TEXTURE_CUBE_MAP_ARRAY);
        assert_eq!(texture_target(TextureDimension::D2, 4, 1, false), gl::TEXTURE_2D_ARRAY);
        assert_eq!(texture_target(TextureDimension::D1, 1, 1, false), gl::TEXTURE_1D);
        assert_eq!(texture_target(TextureDimension::D3, 1, 1, false), gl::TEXTURE_3D);
    }

    #[test]
    fn min_filter_combines_mipmap_mode() {
        assert_eq!(min_filter(Filter::Linear, MipmapMode::Nearest), gl::LINEAR_MIPMAP_NEAREST);
        assert_eq!(min_filter(Filter::Nearest, MipmapMode::Linear), gl::NEAREST_MIPMAP_LINEAR);
    }

    #[test]
    fn cull_none_disables_culling() {
        let none: Option<GLenum> = CullMode::None.into_gl();
        assert_eq!(none, None);
        let back: Option<GLenum> = CullMode::Back.into_gl();
        assert_eq!(back, Some(gl::BACK));
    }

    #[test]
    fn state_enums() {
        assert_eq!(IntoGl::<GLenum>::into_gl(CompareOp::LessEqual), gl::LEQUAL);
        assert_eq!(IntoGl::<GLenum>::into_gl(StencilOp::IncrementWrap), gl::INCR_WRAP);
        assert_eq!(IntoGl::<GLenum>::into_gl(LogicOp::Xor), gl::XOR);
        assert_eq!(IntoGl::<GLenum>::into_gl(PrimitiveTopology::PatchList), gl::PATCHES);
        assert_eq!(IntoGl::<GLenum>::into_gl(VertexFormat::Unorm8x4), gl::UNSIGNED_BYTE);
        assert_eq!(IntoGl::<GLenum>::into_gl(IndexType::Uint16), gl::UNSIGNED_SHORT);
    }
}
