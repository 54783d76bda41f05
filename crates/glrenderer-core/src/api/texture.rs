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

//! Image, image view and sampler descriptors.

use super::dimension::Extent3D;
use super::flags::{ImageAspectFlags, TextureUsage};
use super::format::Format;
use super::pipeline::CompareOp;

/// An opaque handle to an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

/// An opaque handle to an image view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureViewId(pub usize);

/// An opaque handle to a sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplerId(pub usize);

/// The dimensionality of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureDimension {
    /// One dimensional.
    D1,
    /// Two dimensional.
    D2,
    /// Three dimensional.
    D3,
}

/// Describes an image to create. The image has no storage until memory is bound to it.
#[derive(Debug, Clone)]
pub struct TextureDescriptor {
    /// A debug label.
    pub label: Option<String>,
    /// Dimensionality.
    pub dimension: TextureDimension,
    /// Pixel format.
    pub format: Format,
    /// Size of mip level zero.
    pub extent: Extent3D,
    /// Number of mip levels.
    pub mip_levels: u32,
    /// Number of array layers (six per cube).
    pub array_layers: u32,
    /// Samples per texel.
    pub samples: u32,
    /// Intended usage.
    pub usage: TextureUsage,
    /// The layers can be viewed as cube faces.
    pub cube_compatible: bool,
}

impl TextureDescriptor {
    /// A single-level, single-sample 2D image.
    pub fn new_2d(format: Format, width: u32, height: u32, usage: TextureUsage) -> Self {
        Self {
            label: None,
            dimension: TextureDimension::D2,
            format,
            extent: Extent3D::new(width, height, 1),
            mip_levels: 1,
            array_layers: 1,
            samples: 1,
            usage,
            cube_compatible: false,
        }
    }
}

/// The layout of an image, as tracked by render passes and barriers.
///
/// OpenGL has no layouts; the value is carried for the calling contract only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageLayout {
    /// Contents are undefined.
    #[default]
    Undefined,
    /// Any usage.
    General,
    /// Colour attachment.
    ColorAttachmentOptimal,
    /// Depth/stencil attachment.
    DepthStencilAttachmentOptimal,
    /// Read-only depth/stencil.
    DepthStencilReadOnlyOptimal,
    /// Sampled by shaders.
    ShaderReadOnlyOptimal,
    /// Transfer source.
    TransferSrcOptimal,
    /// Transfer destination.
    TransferDstOptimal,
    /// Presentable swap chain image.
    PresentSrc,
}

/// The dimensionality of an image view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureViewDimension {
    /// One dimensional.
    D1,
    /// One dimensional array.
    D1Array,
    /// Two dimensional.
    D2,
    /// Two dimensional array.
    D2Array,
    /// Cube map.
    Cube,
    /// Cube map array.
    CubeArray,
    /// Three dimensional.
    D3,
}

/// A range of mip levels and array layers of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageSubresourceRange {
    /// Aspects covered by the range.
    pub aspect: ImageAspectFlags,
    /// First mip level.
    pub base_mip_level: u32,
    /// Number of mip levels.
    pub level_count: u32,
    /// First array layer.
    pub base_array_layer: u32,
    /// Number of array layers.
    pub layer_count: u32,
}

impl ImageSubresourceRange {
    /// The first mip level and layer of the given aspect.
    pub fn single(aspect: ImageAspectFlags) -> Self {
        Self {
            aspect,
            base_mip_level: 0,
            level_count: 1,
            base_array_layer: 0,
            layer_count: 1,
        }
    }
}

/// One mip level of a range of array layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageSubresourceLayers {
    /// Aspects covered.
    pub aspect: ImageAspectFlags,
    /// Mip level.
    pub mip_level: u32,
    /// First array layer.
    pub base_array_layer: u32,
    /// Number of array layers.
    pub layer_count: u32,
}

impl ImageSubresourceLayers {
    /// Mip level zero, layer zero of the given aspect.
    pub fn base(aspect: ImageAspectFlags) -> Self {
        Self {
            aspect,
            mip_level: 0,
            base_array_layer: 0,
            layer_count: 1,
        }
    }
}

/// Describes a view onto an image.
#[derive(Debug, Clone)]
pub struct TextureViewDescriptor {
    /// The viewed image.
    pub texture: TextureId,
    /// View dimensionality.
    pub dimension: TextureViewDimension,
    /// View format; must match the image's format.
    pub format: Format,
    /// Viewed subresources.
    pub subresource_range: ImageSubresourceRange,
}

/// Texel filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    /// Nearest texel.
    Nearest,
    /// Linear interpolation.
    Linear,
}

/// Filtering between mip levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MipmapMode {
    /// Nearest mip level.
    Nearest,
    /// Linear interpolation between levels.
    Linear,
}

/// Behaviour of texture coordinates outside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressMode {
    /// Tile.
    Repeat,
    /// Tile, mirroring every other repetition.
    MirroredRepeat,
    /// Clamp to the edge texel.
    ClampToEdge,
    /// Clamp to the border colour.
    ClampToBorder,
    /// Mirror once, then clamp.
    MirrorClampToEdge,
}

/// The border colour of a `ClampToBorder` sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorderColor {
    /// `(0, 0, 0, 0)`
    TransparentBlack,
    /// `(0, 0, 0, 1)`
    OpaqueBlack,
    /// `(1, 1, 1, 1)`
    OpaqueWhite,
}

/// Describes a sampler.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerDescriptor {
    /// Magnification filter.
    pub mag_filter: Filter,
    /// Minification filter.
    pub min_filter: Filter,
    /// Mip level filter.
    pub mipmap_mode: MipmapMode,
    /// Addressing along U.
    pub address_mode_u: AddressMode,
    /// Addressing along V.
    pub address_mode_v: AddressMode,
    /// Addressing along W.
    pub address_mode_w: AddressMode,
    /// Bias added to the computed level of detail.
    pub mip_lod_bias: f32,
    /// Anisotropic filtering, if enabled.
    pub max_anisotropy: Option<f32>,
    /// Depth comparison, if enabled.
    pub compare: Option<CompareOp>,
    /// Minimum level of detail.
    pub min_lod: f32,
    /// Maximum level of detail.
    pub max_lod: f32,
    /// Border colour.
    pub border_color: BorderColor,
}

impl Default for SamplerDescriptor {
    fn default() -> Self {
        Self {
            mag_filter: Filter::Linear,
            min_filter: Filter::Linear,
            mipmap_mode: MipmapMode::Linear,
            address_mode_u: AddressMode::Repeat,
            address_mode_v: AddressMode::Repeat,
            address_mode_w: AddressMode::Repeat,
            mip_lod_bias: 0.0,
            max_anisotropy: None,
            compare: None,
            min_lod: 0.0,
            max_lod: 1000.0,
            border_color: BorderColor::OpaqueBlack,
        }
    }
}
