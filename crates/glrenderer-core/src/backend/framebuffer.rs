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

//! Framebuffers.
//!
//! A framebuffer whose views have no storage stands for the back buffer and
//! is bound as the default framebuffer.

use super::render_pass::RenderPassObject;
use super::resources::{TextureObject, TextureViewObject};
use crate::api::{Extent2D, Format, FramebufferId, RenderPassId};
use crate::error::ResourceError;
use crate::gl::enums::{self as gl, GLenum};
use crate::gl::{attachment_point, GlName, GraphicsContext};
use std::sync::Arc;

/// Attaches one level and layer of `texture` to the framebuffer bound to `target`.
pub(crate) fn attach_texture(
    ctx: &mut dyn GraphicsContext,
    target: GLenum,
    point: GLenum,
    texture: &TextureObject,
    level: i32,
    layer: i32,
) {
    let name = texture.name();
    match texture.target {
        gl::TEXTURE_CUBE_MAP => ctx.framebuffer_texture_2d(
            target,
            point,
            gl::TEXTURE_CUBE_MAP_POSITIVE_X + layer as GLenum,
            name,
            level,
        ),
        _ if texture.is_layered() => ctx.framebuffer_texture_layer(target, point, name, level, layer),
        texture_target => ctx.framebuffer_texture_2d(target, point, texture_target, name, level),
    }
}

/// Removes whatever is attached at `point`.
pub(crate) fn detach(ctx: &mut dyn GraphicsContext, target: GLenum, point: GLenum) {
    ctx.framebuffer_texture_2d(target, point, gl::TEXTURE_2D, None, 0);
}

#[derive(Debug)]
pub(crate) struct FramebufferAttachment {
    pub view: Arc<TextureViewObject>,
    pub format: Format,
    /// `None` for attachments that are only resolve targets.
    pub point: Option<GLenum>,
}

impl FramebufferAttachment {
    /// Index of the attachment in the draw buffer list, for colour clears.
    pub(crate) fn draw_buffer(&self) -> Option<i32> {
        self.point
            .filter(|point| (gl::COLOR_ATTACHMENT0..gl::COLOR_ATTACHMENT0 + 32).contains(point))
            .map(|point| (point - gl::COLOR_ATTACHMENT0) as i32)
    }
}

#[derive(Debug)]
pub(crate) struct FrameBufferObject {
    pub id: FramebufferId,
    pub render_pass: RenderPassId,
    /// `None` for the default framebuffer.
    pub name: Option<GlName>,
    pub extent: Extent2D,
    pub attachments: Vec<FramebufferAttachment>,
}

impl FrameBufferObject {
    pub(crate) fn create(
        ctx: &mut dyn GraphicsContext,
        id: FramebufferId,
        render_pass: &RenderPassObject,
        views: Vec<Arc<TextureViewObject>>,
        extent: Extent2D,
    ) -> Result<Self, ResourceError> {
        let descriptions = render_pass.attachments();
        if views.len() != descriptions.len() {
            return Err(ResourceError::FramebufferMismatch(format!(
                "{} views for {} render pass attachments",
                views.len(),
                descriptions.len()
            )));
        }
        for (index, (view, description)) in views.iter().zip(descriptions).enumerate() {
            if view.descriptor.format != description.format {
                return Err(ResourceError::FramebufferMismatch(format!(
                    "attachment {index} is {:?}, the render pass expects {:?}",
                    view.descriptor.format, description.format
                )));
            }
        }

        let mut color_index = 0;
        let attachments: Vec<FramebufferAttachment> = views
            .into_iter()
            .enumerate()
            .map(|(index, view)| {
                let format = view.descriptor.format;
                let point = (!render_pass.is_resolve_only(index as u32)).then(|| {
                    let point = attachment_point(format, color_index);
                    if !format.is_depth_or_stencil() {
                        color_index += 1;
                    }
                    point
                });
                FramebufferAttachment { view, format, point }
            })
            .collect();

        let is_default = attachments.iter().any(|attachment| attachment.view.name().is_none());
        if is_default {
            if attachments.len() > 1 {
                log::warn!(
                    "FrameBuffer: back buffer attachment found, the {} other attachments are ignored",
                    attachments.len() - 1
                );
            }
            return Ok(Self {
                id,
                render_pass: render_pass.id,
                name: None,
                extent,
                attachments,
            });
        }

        let name = ctx.create_framebuffer()?;
        ctx.bind_framebuffer(gl::FRAMEBUFFER, Some(name));
        for attachment in &attachments {
            if let Some(point) = attachment.point {
                let view = &attachment.view;
                attach_texture(ctx, gl::FRAMEBUFFER, point, &view.texture, view.base_level(), view.base_layer());
            }
        }
        let status = ctx.check_framebuffer_status(gl::FRAMEBUFFER);
        ctx.bind_framebuffer(gl::FRAMEBUFFER, None);
        if status != gl::FRAMEBUFFER_COMPLETE {
            ctx.delete_framebuffer(name);
            return Err(ResourceError::IncompleteFramebuffer { status });
        }
        Ok(Self {
            id,
            render_pass: render_pass.id,
            name: Some(name),
            extent,
            attachments,
        })
    }

    /// The draw buffers of every colour attachment, or the back buffer.
    pub(crate) fn color_points(&self) -> Vec<GLenum> {
        if self.name.is_none() {
            return vec![gl::BACK_LEFT];
        }
        self.attachments
            .iter()
            .filter_map(|attachment| attachment.point)
            .filter(|point| *point >= gl::COLOR_ATTACHMENT0 && *point < gl::COLOR_ATTACHMENT0 + 32)
            .collect()
    }

    pub(crate) fn destroy(&self, ctx: &mut dyn GraphicsContext) {
        if let Some(name) = self.name {
            ctx.delete_framebuffer(name);
        }
    }
}
