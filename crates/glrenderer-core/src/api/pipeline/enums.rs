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

//! Enums for pipeline configuration.

/// The memory format of a single vertex attribute's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    /// Four 8-bit unsigned integer components.
    Uint8x4,
    /// Four 8-bit signed integer components.
    Sint8x4,
    /// Four 8-bit unsigned integer components normalized to `[0.0, 1.0]`.
    Unorm8x4,
    /// Four 8-bit signed integer components normalized to `[-1.0, 1.0]`.
    Snorm8x4,
    /// Two 16-bit unsigned integer components normalized to `[0.0, 1.0]`.
    Unorm16x2,
    /// Four 16-bit unsigned integer components normalized to `[0.0, 1.0]`.
    Unorm16x4,
    /// Two 16-bit float components.
    Float16x2,
    /// Four 16-bit float components.
    Float16x4,
    /// One 32-bit float component.
    Float32,
    /// Two 32-bit float components.
    Float32x2,
    /// Three 32-bit float components.
    Float32x3,
    /// Four 32-bit float components.
    Float32x4,
    /// One 32-bit unsigned integer component.
    Uint32,
    /// Two 32-bit unsigned integer components.
    Uint32x2,
    /// Three 32-bit unsigned integer components.
    Uint32x3,
    /// Four 32-bit unsigned integer components.
    Uint32x4,
    /// One 32-bit signed integer component.
    Sint32,
    /// Two 32-bit signed integer components.
    Sint32x2,
    /// Three 32-bit signed integer components.
    Sint32x3,
    /// Four 32-bit signed integer components.
    Sint32x4,
}

impl VertexFormat {
    /// Returns the size in bytes of this vertex format
    pub fn size(&self) -> usize {
        match self {
            VertexFormat::Float32 | VertexFormat::Uint32 | VertexFormat::Sint32 => 4,
            VertexFormat::Float32x2 | VertexFormat::Uint32x2 | VertexFormat::Sint32x2 => 8,
            VertexFormat::Float32x3 | VertexFormat::Uint32x3 | VertexFormat::Sint32x3 => 12,
            VertexFormat::Float32x4 | VertexFormat::Uint32x4 | VertexFormat::Sint32x4 => 16,
            VertexFormat::Uint8x4
            | VertexFormat::Sint8x4
            | VertexFormat::Unorm8x4
            | VertexFormat::Snorm8x4
            | VertexFormat::Unorm16x2
            | VertexFormat::Float16x2 => 4,
            VertexFormat::Unorm16x4 | VertexFormat::Float16x4 => 8,
        }
    }

    /// Returns the number of components the vertex shader receives.
    pub fn component_count(&self) -> u32 {
        match self {
            VertexFormat::Float32 | VertexFormat::Uint32 | VertexFormat::Sint32 => 1,
            VertexFormat::Float32x2
            | VertexFormat::Uint32x2
            | VertexFormat::Sint32x2
            | VertexFormat::Unorm16x2
            | VertexFormat::Float16x2 => 2,
            VertexFormat::Float32x3 | VertexFormat::Uint32x3 | VertexFormat::Sint32x3 => 3,
            _ => 4,
        }
    }

    /// `true` when the shader reads the attribute as an integer (`ivec`/`uvec`).
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            VertexFormat::Uint8x4
                | VertexFormat::Sint8x4
                | VertexFormat::Uint32
                | VertexFormat::Uint32x2
                | VertexFormat::Uint32x3
                | VertexFormat::Uint32x4
                | VertexFormat::Sint32
                | VertexFormat::Sint32x2
                | VertexFormat::Sint32x3
                | VertexFormat::Sint32x4
        )
    }

    /// `true` when integer data is normalized to a float range.
    pub fn is_normalized(&self) -> bool {
        matches!(
            self,
            VertexFormat::Unorm8x4
                | VertexFormat::Snorm8x4
                | VertexFormat::Unorm16x2
                | VertexFormat::Unorm16x4
        )
    }
}

/// Defines how often the GPU advances to the next element in a vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexStepMode {
    /// The GPU advances to the next element for each vertex.
    Vertex,
    /// The GPU advances to the next element only for each new instance being rendered.
    Instance,
}

/// Defines how vertices are connected to form a geometric primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTopology {
    /// Vertices are rendered as a list of isolated points.
    PointList,
    /// Every two vertices form a line.
    LineList,
    /// Vertices are rendered as a connected line strip.
    LineStrip,
    /// Every three vertices form a triangle.
    TriangleList,
    /// Vertices are rendered as a connected triangle strip.
    TriangleStrip,
    /// Vertices are rendered as a fan around the first vertex.
    TriangleFan,
    /// Vertices are grouped in patches for tessellation.
    PatchList,
}

/// Defines which faces of a triangle to cull.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CullMode {
    /// No culling is performed.
    None,
    /// Cull front-facing triangles.
    Front,
    /// Cull back-facing triangles.
    Back,
    /// Cull every triangle.
    FrontAndBack,
}

/// Defines which vertex winding order considers a triangle to be "front-facing".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrontFace {
    /// Counter-clockwise winding order is the front face.
    Ccw,
    /// Clockwise winding order is the front face.
    Cw,
}

/// Defines how polygons are rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolygonMode {
    /// Polygons are filled.
    Fill,
    /// Only polygon edges are drawn.
    Line,
    /// Only polygon vertices are drawn.
    Point,
}

/// A comparison function used by depth and stencil tests and by samplers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompareOp {
    /// Never passes.
    Never,
    /// Passes if `new < old`.
    Less,
    /// Passes if `new == old`.
    Equal,
    /// Passes if `new <= old`.
    LessEqual,
    /// Passes if `new > old`.
    Greater,
    /// Passes if `new != old`.
    NotEqual,
    /// Passes if `new >= old`.
    GreaterEqual,
    /// Always passes.
    #[default]
    Always,
}

/// An operation performed on the stencil buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StencilOp {
    /// Keep the existing stencil value.
    #[default]
    Keep,
    /// Set the stencil value to 0.
    Zero,
    /// Replace the stencil value with the reference value.
    Replace,
    /// Increment the stencil value, clamping at the maximum value.
    IncrementClamp,
    /// Decrement the stencil value, clamping at 0.
    DecrementClamp,
    /// Bitwise invert the stencil value.
    Invert,
    /// Increment the stencil value, wrapping to 0 on overflow.
    IncrementWrap,
    /// Decrement the stencil value, wrapping to the maximum value on underflow.
    DecrementWrap,
}

/// A factor in a blend equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    /// `0.0`
    Zero,
    /// `1.0`
    One,
    /// `src.rgb`
    SrcColor,
    /// `1.0 - src.rgb`
    OneMinusSrcColor,
    /// `dst.rgb`
    DstColor,
    /// `1.0 - dst.rgb`
    OneMinusDstColor,
    /// `src.a`
    SrcAlpha,
    /// `1.0 - src.a`
    OneMinusSrcAlpha,
    /// `dst.a`
    DstAlpha,
    /// `1.0 - dst.a`
    OneMinusDstAlpha,
    /// The blend constant colour.
    ConstantColor,
    /// `1.0 - constant.rgb`
    OneMinusConstantColor,
    /// The blend constant alpha.
    ConstantAlpha,
    /// `1.0 - constant.a`
    OneMinusConstantAlpha,
    /// `min(src.a, 1.0 - dst.a)`
    SrcAlphaSaturate,
}

/// The operation used to combine source and destination colors in a blend equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendOp {
    /// `source + destination`
    Add,
    /// `source - destination`
    Subtract,
    /// `destination - source`
    ReverseSubtract,
    /// `min(source, destination)`
    Min,
    /// `max(source, destination)`
    Max,
}

/// A bitwise operation applied to colour attachments instead of blending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicOp {
    /// `0`
    Clear,
    /// `s & d`
    And,
    /// `s & !d`
    AndReverse,
    /// `s`
    Copy,
    /// `!s & d`
    AndInverted,
    /// `d`
    NoOp,
    /// `s ^ d`
    Xor,
    /// `s | d`
    Or,
    /// `!(s | d)`
    Nor,
    /// `!(s ^ d)`
    Equivalent,
    /// `!d`
    Invert,
    /// `s | !d`
    OrReverse,
    /// `!s`
    CopyInverted,
    /// `!s | d`
    OrInverted,
    /// `!(s & d)`
    Nand,
    /// all ones
    Set,
}

/// Pipeline state that is set by recording calls instead of being baked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DynamicState {
    /// `set_viewport`
    Viewport,
    /// `set_scissor`
    Scissor,
    /// `set_line_width`
    LineWidth,
    /// `set_depth_bias`
    DepthBias,
    /// `set_blend_constants`
    BlendConstants,
    /// `set_stencil_reference`
    StencilReference,
}
