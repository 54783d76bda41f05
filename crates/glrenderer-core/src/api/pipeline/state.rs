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

//! State descriptors for the pipeline.

use super::enums::*;
use crate::api::flags::ColorComponentFlags;

/// Describes how vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputAssemblyState {
    /// The topology of the primitives.
    pub topology: PrimitiveTopology,
    /// If `true`, the maximum index value restarts strips.
    pub primitive_restart: bool,
}

impl Default for InputAssemblyState {
    fn default() -> Self {
        Self {
            topology: PrimitiveTopology::TriangleList,
            primitive_restart: false,
        }
    }
}

/// Describes depth biasing, used to prevent z-fighting.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DepthBiasState {
    /// A constant value added to the depth of each fragment.
    pub constant: f32,
    /// A factor that scales with the fragment's depth slope.
    pub slope_scale: f32,
    /// The maximum bias that can be applied.
    pub clamp: f32,
}

/// Describes the rasterization state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterizationState {
    /// If `true`, fragments beyond the depth range are clamped instead of clipped.
    pub depth_clamp: bool,
    /// If `true`, primitives are discarded before rasterization.
    pub rasterizer_discard: bool,
    /// The rasterization mode for polygons.
    pub polygon_mode: PolygonMode,
    /// The face culling mode.
    pub cull_mode: CullMode,
    /// The vertex winding order that determines the "front" face of a triangle.
    pub front_face: FrontFace,
    /// Depth bias, if enabled.
    pub depth_bias: Option<DepthBiasState>,
    /// Width of rasterized lines.
    pub line_width: f32,
}

impl Default for RasterizationState {
    fn default() -> Self {
        Self {
            depth_clamp: false,
            rasterizer_discard: false,
            polygon_mode: PolygonMode::Fill,
            cull_mode: CullMode::None,
            front_face: FrontFace::Ccw,
            depth_bias: None,
            line_width: 1.0,
        }
    }
}

/// Describes multisampling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultisampleState {
    /// Samples per pixel.
    pub samples: u32,
    /// Minimum fraction of samples shaded, if sample shading is enabled.
    pub sample_shading: Option<f32>,
    /// If `true`, the fragment alpha drives the coverage mask.
    pub alpha_to_coverage: bool,
    /// If `true`, the fragment alpha is forced to one.
    pub alpha_to_one: bool,
}

impl Default for MultisampleState {
    fn default() -> Self {
        Self {
            samples: 1,
            sample_shading: None,
            alpha_to_coverage: false,
            alpha_to_one: false,
        }
    }
}

/// Describes the stencil test and operations for a single face of a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StencilOpState {
    /// The operation to perform if the stencil test fails.
    pub fail_op: StencilOp,
    /// The operation to perform if both the stencil and depth tests pass.
    pub pass_op: StencilOp,
    /// The operation to perform if the stencil test passes but the depth test fails.
    pub depth_fail_op: StencilOp,
    /// The comparison function used for the stencil test.
    pub compare_op: CompareOp,
    /// A bitmask for reading from the stencil buffer.
    pub compare_mask: u32,
    /// A bitmask for writing to the stencil buffer.
    pub write_mask: u32,
    /// The reference value.
    pub reference: u32,
}

impl Default for StencilOpState {
    fn default() -> Self {
        Self {
            fail_op: StencilOp::Keep,
            pass_op: StencilOp::Keep,
            depth_fail_op: StencilOp::Keep,
            compare_op: CompareOp::Always,
            compare_mask: 0xFF,
            write_mask: 0xFF,
            reference: 0,
        }
    }
}

/// Describes the state for depth and stencil testing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthStencilState {
    /// Enables the depth test.
    pub depth_test: bool,
    /// If `true`, depth values will be written to the depth buffer.
    pub depth_write: bool,
    /// The comparison function used for the depth test.
    pub depth_compare: CompareOp,
    /// Enables the stencil test.
    pub stencil_test: bool,
    /// The stencil state for front-facing primitives.
    pub front: StencilOpState,
    /// The stencil state for back-facing primitives.
    pub back: StencilOpState,
}

impl Default for DepthStencilState {
    fn default() -> Self {
        Self {
            depth_test: true,
            depth_write: true,
            depth_compare: CompareOp::Less,
            stencil_test: false,
            front: StencilOpState::default(),
            back: StencilOpState::default(),
        }
    }
}

/// Describes the blending of one colour attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorBlendAttachmentState {
    /// `false` disables blending for this draw buffer.
    pub blend_enable: bool,
    /// Source colour factor.
    pub src_color_factor: BlendFactor,
    /// Destination colour factor.
    pub dst_color_factor: BlendFactor,
    /// Colour operation.
    pub color_op: BlendOp,
    /// Source alpha factor.
    pub src_alpha_factor: BlendFactor,
    /// Destination alpha factor.
    pub dst_alpha_factor: BlendFactor,
    /// Alpha operation.
    pub alpha_op: BlendOp,
    /// Channels written.
    pub write_mask: ColorComponentFlags,
}

impl Default for ColorBlendAttachmentState {
    fn default() -> Self {
        Self {
            blend_enable: false,
            src_color_factor: BlendFactor::One,
            dst_color_factor: BlendFactor::Zero,
            color_op: BlendOp::Add,
            src_alpha_factor: BlendFactor::One,
            dst_alpha_factor: BlendFactor::Zero,
            alpha_op: BlendOp::Add,
            write_mask: ColorComponentFlags::ALL,
        }
    }
}

impl ColorBlendAttachmentState {
    /// Classic `src * a + dst * (1 - a)` blending.
    pub fn alpha_blending() -> Self {
        Self {
            blend_enable: true,
            src_color_factor: BlendFactor::SrcAlpha,
            dst_color_factor: BlendFactor::OneMinusSrcAlpha,
            src_alpha_factor: BlendFactor::One,
            dst_alpha_factor: BlendFactor::OneMinusSrcAlpha,
            ..Self::default()
        }
    }
}

/// Describes the colour blending of all attachments of a subpass.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorBlendState {
    /// A logic operation replacing blending, if enabled.
    pub logic_op: Option<LogicOp>,
    /// One entry per colour attachment of the subpass.
    pub attachments: Vec<ColorBlendAttachmentState>,
    /// The blend constant colour.
    pub blend_constants: [f32; 4],
}

impl Default for ColorBlendState {
    fn default() -> Self {
        Self {
            logic_op: None,
            attachments: vec![ColorBlendAttachmentState::default()],
            blend_constants: [0.0; 4],
        }
    }
}

/// Describes the tessellation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TessellationState {
    /// Number of control points per patch.
    pub patch_control_points: u32,
}
