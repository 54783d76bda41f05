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

//! Buffers, images, image views, samplers and shader modules.
//!
//! Buffers and images are created without storage. Their OpenGL object is
//! created when device memory is bound to them, see [`super::memory`].

use crate::api::{
    BufferDescriptor, BufferId, BufferUsage, DeviceMemoryId, MemoryRequirements,
    SamplerDescriptor, SamplerId, ShaderModuleId, ShaderStage, TextureDescriptor, TextureId,
    TextureViewDescriptor, TextureViewId,
};
use crate::error::{ContextError, ResourceError, ShaderError};
use crate::gl::enums::{self as gl, GLenum};
use crate::gl::{min_filter, texture_target, view_target, GlName, GlPixelFormat, GraphicsContext, IntoGl};
use std::sync::OnceLock;

/// Where a resource's storage lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MemoryBinding {
    pub memory: DeviceMemoryId,
    pub offset: u64,
    pub name: GlName,
}

#[derive(Debug)]
pub(crate) struct BufferObject {
    pub id: BufferId,
    pub descriptor: BufferDescriptor,
    pub binding: OnceLock<MemoryBinding>,
}

impl BufferObject {
    pub(crate) fn new(id: BufferId, descriptor: BufferDescriptor) -> Self {
        Self {
            id,
            descriptor,
            binding: OnceLock::new(),
        }
    }

    pub(crate) fn name(&self) -> Option<GlName> {
        self.binding.get().map(|binding| binding.name)
    }

    pub(crate) fn size(&self) -> u64 {
        self.descriptor.size
    }

    pub(crate) fn label(&self) -> &str {
        self.descriptor.label.as_deref().unwrap_or_default()
    }

    pub(crate) fn memory_requirements(&self) -> MemoryRequirements {
        let alignment = if self
            .descriptor
            .usage
            .intersects(BufferUsage::UNIFORM | BufferUsage::STORAGE)
        {
            256
        } else {
            4
        };
        MemoryRequirements {
            size: self.descriptor.size,
            alignment,
        }
    }

    /// Creates the buffer object and allocates its storage.
    pub(crate) fn realize(
        &self,
        ctx: &mut dyn GraphicsContext,
        memory: DeviceMemoryId,
        offset: u64,
        host_visible: bool,
    ) -> Result<GlName, ResourceError> {
        let name = ctx.create_buffer()?;
        let usage = if host_visible {
            gl::DYNAMIC_DRAW
        } else {
            gl::STATIC_DRAW
        };
        ctx.bind_buffer(gl::COPY_WRITE_BUFFER, Some(name));
        ctx.buffer_data(gl::COPY_WRITE_BUFFER, self.descriptor.size, usage);
        ctx.bind_buffer(gl::COPY_WRITE_BUFFER, None);
        // A buffer is realized at most once; the memory it is bound to refuses a second bind.
        let _ = self.binding.set(MemoryBinding {
            memory,
            offset,
            name,
        });
        Ok(name)
    }
}

#[derive(Debug)]
pub(crate) struct TextureObject {
    pub id: TextureId,
    pub descriptor: TextureDescriptor,
    pub target: GLenum,
    pub pixel: GlPixelFormat,
    /// Swap chain images stand for the default framebuffer and never get storage.
    pub presentable: bool,
    pub binding: OnceLock<MemoryBinding>,
}

impl TextureObject {
    pub(crate) fn new(id: TextureId, descriptor: TextureDescriptor, presentable: bool) -> Self {
        let target = texture_target(
            descriptor.dimension,
            descriptor.array_layers,
            descriptor.samples,
            descriptor.cube_compatible,
        );
        Self {
            id,
            target,
            pixel: descriptor.format.into_gl(),
            descriptor,
            presentable,
            binding: OnceLock::new(),
        }
    }

    pub(crate) fn name(&self) -> Option<GlName> {
        self.binding.get().map(|binding| binding.name)
    }

    pub(crate) fn is_layered(&self) -> bool {
        matches!(
            self.target,
            gl::TEXTURE_1D_ARRAY
                | gl::TEXTURE_2D_ARRAY
                | gl::TEXTURE_CUBE_MAP_ARRAY
                | gl::TEXTURE_3D
                | gl::TEXTURE_2D_MULTISAMPLE_ARRAY
        )
    }

    pub(crate) fn memory_requirements(&self) -> MemoryRequirements {
        let descriptor = &self.descriptor;
        let texel = u64::from(descriptor.format.texel_size());
        let levels = descriptor.mip_levels.max(1);
        let size: u64 = (0..levels)
            .map(|level| {
                let extent = descriptor.extent.mip_level(level);
                u64::from(extent.width) * u64::from(extent.height) * u64::from(extent.depth) * texel
            })
            .sum();
        MemoryRequirements {
            size: size * u64::from(descriptor.array_layers.max(1)) * u64::from(descriptor.samples.max(1)),
            alignment: 4,
        }
    }

    /// Creates the texture object and allocates immutable storage for every level.
    pub(crate) fn realize(
        &self,
        ctx: &mut dyn GraphicsContext,
        memory: DeviceMemoryId,
        offset: u64,
    ) -> Result<GlName, ResourceError> {
        let descriptor = &self.descriptor;
        let levels = descriptor.mip_levels.max(1) as i32;
        let (width, height, depth) = (
            descriptor.extent.width as i32,
            descriptor.extent.height as i32,
            descriptor.extent.depth as i32,
        );
        let layers = descriptor.array_layers.max(1) as i32;
        let internal = self.pixel.internal_format;

        if self.target == gl::TEXTURE_2D_MULTISAMPLE_ARRAY {
            return Err(ContextError::ObjectCreation {
                kind: "texture",
                details: "multisample array textures are not supported".to_string(),
            }
            .into());
        }

        let name = ctx.create_texture()?;
        ctx.bind_texture(self.target, Some(name));
        match self.target {
            gl::TEXTURE_1D => ctx.tex_storage_1d(self.target, levels, internal, width),
            gl::TEXTURE_1D_ARRAY => ctx.tex_storage_2d(self.target, levels, internal, width, layers),
            gl::TEXTURE_2D | gl::TEXTURE_CUBE_MAP => {
                ctx.tex_storage_2d(self.target, levels, internal, width, height)
            }
            gl::TEXTURE_2D_ARRAY | gl::TEXTURE_CUBE_MAP_ARRAY => {
                ctx.tex_storage_3d(self.target, levels, internal, width, height, layers)
            }
            gl::TEXTURE_3D => ctx.tex_storage_3d(self.target, levels, internal, width, height, depth),
            gl::TEXTURE_2D_MULTISAMPLE => ctx.tex_storage_2d_multisample(
                self.target,
                descriptor.samples as i32,
                internal,
                width,
                height,
            ),
            other => log::error!("TextureObject: unexpected texture target 0x{other:04X}"),
        }
        if self.target != gl::TEXTURE_2D_MULTISAMPLE {
            ctx.tex_parameter_i32(self.target, gl::TEXTURE_BASE_LEVEL, 0);
            ctx.tex_parameter_i32(self.target, gl::TEXTURE_MAX_LEVEL, levels - 1);
        }
        ctx.bind_texture(self.target, None);
        let _ = self.binding.set(MemoryBinding {
            memory,
            offset,
            name,
        });
        Ok(name)
    }
}

/// An image view. OpenGL samples the parent texture directly, so a view only
/// remembers the target and the subresources it selects.
#[derive(Debug)]
pub(crate) struct TextureViewObject {
    pub id: TextureViewId,
    pub descriptor: TextureViewDescriptor,
    pub texture: std::sync::Arc<TextureObject>,
    pub target: GLenum,
}

impl TextureViewObject {
    pub(crate) fn new(
        id: TextureViewId,
        descriptor: TextureViewDescriptor,
        texture: std::sync::Arc<TextureObject>,
    ) -> Self {
        let target = view_target(descriptor.dimension, texture.descriptor.samples);
        Self {
            id,
            descriptor,
            texture,
            target,
        }
    }

    pub(crate) fn name(&self) -> Option<GlName> {
        self.texture.name()
    }

    pub(crate) fn base_level(&self) -> i32 {
        self.descriptor.subresource_range.base_mip_level as i32
    }

    pub(crate) fn base_layer(&self) -> i32 {
        self.descriptor.subresource_range.base_array_layer as i32
    }
}

#[derive(Debug)]
pub(crate) struct SamplerObject {
    pub id: SamplerId,
    pub name: GlName,
}

impl SamplerObject {
    pub(crate) fn create(
        ctx: &mut dyn GraphicsContext,
        id: SamplerId,
        descriptor: &SamplerDescriptor,
    ) -> Result<Self, ResourceError> {
        let name = ctx.create_sampler()?;
        let min = min_filter(descriptor.min_filter, descriptor.mipmap_mode);
        let mag: GLenum = descriptor.mag_filter.into_gl();
        ctx.sampler_parameter_i32(name, gl::TEXTURE_MIN_FILTER, min as i32);
        ctx.sampler_parameter_i32(name, gl::TEXTURE_MAG_FILTER, mag as i32);
        for (parameter, mode) in [
            (gl::TEXTURE_WRAP_S, descriptor.address_mode_u),
            (gl::TEXTURE_WRAP_T, descriptor.address_mode_v),
            (gl::TEXTURE_WRAP_R, descriptor.address_mode_w),
        ] {
            let mode: GLenum = mode.into_gl();
            ctx.sampler_parameter_i32(name, parameter, mode as i32);
        }
        ctx.sampler_parameter_f32(name, gl::TEXTURE_MIN_LOD, descriptor.min_lod);
        ctx.sampler_parameter_f32(name, gl::TEXTURE_MAX_LOD, descriptor.max_lod);
        ctx.sampler_parameter_f32(name, gl::TEXTURE_LOD_BIAS, descriptor.mip_lod_bias);
        if let Some(anisotropy) = descriptor.max_anisotropy {
            ctx.sampler_parameter_f32(name, gl::TEXTURE_MAX_ANISOTROPY, anisotropy);
        }
        if let Some(compare) = descriptor.compare {
            let func: GLenum = compare.into_gl();
            ctx.sampler_parameter_i32(name, gl::TEXTURE_COMPARE_MODE, gl::COMPARE_REF_TO_TEXTURE as i32);
            ctx.sampler_parameter_i32(name, gl::TEXTURE_COMPARE_FUNC, func as i32);
        }
        let border = match descriptor.border_color {
            crate::api::BorderColor::TransparentBlack => [0.0, 0.0, 0.0, 0.0],
            crate::api::BorderColor::OpaqueBlack => [0.0, 0.0, 0.0, 1.0],
            crate::api::BorderColor::OpaqueWhite => [1.0, 1.0, 1.0, 1.0],
        };
        ctx.sampler_parameter_f32_slice(name, gl::TEXTURE_BORDER_COLOR, &border);
        Ok(Self { id, name })
    }
}

#[derive(Debug)]
pub(crate) struct ShaderModuleObject {
    pub id: ShaderModuleId,
    pub label: String,
    pub stage: ShaderStage,
    pub shader: GlName,
}

impl ShaderModuleObject {
    /// Creates and compiles the shader object.
    pub(crate) fn compile(
        ctx: &mut dyn GraphicsContext,
        id: ShaderModuleId,
        label: String,
        stage: ShaderStage,
        source: &str,
    ) -> Result<Self, ResourceError> {
        let shader = ctx.create_shader(stage.into_gl())?;
        if let Err(details) = ctx.compile_shader(shader, source) {
            ctx.delete_shader(shader);
            return Err(ShaderError::CompilationError { label, details }.into());
        }
        Ok(Self {
            id,
            label,
            stage,
            shader,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Format, TextureDimension, TextureUsage};
    use crate::gl::{GlCall, TraceContext};

    #[test]
    fn buffer_storage_usage_follows_host_visibility() {
        let mut context = TraceContext::new();
        let buffer = BufferObject::new(
            BufferId(0),
            BufferDescriptor {
                label: None,
                size: 64,
                usage: BufferUsage::VERTEX,
            },
        );
        assert_eq!(buffer.name(), None);

        let name = buffer
            .realize(&mut context, DeviceMemoryId(0), 0, true)
            .expect("buffer storage");
        assert_eq!(buffer.name(), Some(name));
        assert!(context.calls().contains(&GlCall::BufferData {
            target: gl::COPY_WRITE_BUFFER,
            size: 64,
            usage: gl::DYNAMIC_DRAW,
        }));
    }

    #[test]
    fn cube_textures_allocate_two_dimensional_storage() {
        let mut context = TraceContext::new();
        let mut descriptor =
            TextureDescriptor::new_2d(Format::Rgba8Unorm, 32, 32, TextureUsage::SAMPLED);
        descriptor.array_layers = 6;
        descriptor.cube_compatible = true;
        descriptor.mip_levels = 3;
        let texture = TextureObject::new(TextureId(0), descriptor, false);
        assert_eq!(texture.target, gl::TEXTURE_CUBE_MAP);

        texture
            .realize(&mut context, DeviceMemoryId(0), 0)
            .expect("texture storage");
        assert!(context.calls().contains(&GlCall::TexStorage {
            target: gl::TEXTURE_CUBE_MAP,
            levels: 3,
            internal_format: gl::RGBA8,
            size: [32, 32, 1],
            samples: 1,
        }));
    }

    #[test]
    fn texture_memory_requirements_cover_every_level_and_layer() {
        let mut descriptor =
            TextureDescriptor::new_2d(Format::R8Unorm, 4, 4, TextureUsage::SAMPLED);
        descriptor.mip_levels = 3;
        descriptor.array_layers = 2;
        descriptor.dimension = TextureDimension::D2;
        let texture = TextureObject::new(TextureId(0), descriptor, false);
        // 16 + 4 + 1 texels per layer.
        assert_eq!(texture.memory_requirements().size, 42);
    }

    #[test]
    fn failed_compilation_deletes_the_shader() {
        let mut context = TraceContext::new();
        context.fail_compile_on("broken");
        let result = ShaderModuleObject::compile(
            &mut context,
            ShaderModuleId(0),
            "broken.frag".to_string(),
            ShaderStage::Fragment,
            "broken",
        );
        assert!(matches!(
            result,
            Err(ResourceError::Shader(ShaderError::CompilationError { .. }))
        ));
        assert_eq!(
            context.count(|call| matches!(call, GlCall::Delete { .. })),
            1
        );
    }
}
