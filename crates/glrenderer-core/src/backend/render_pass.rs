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

//! Render passes.

use crate::api::{
    AttachmentDescription, AttachmentReference, Format, RenderPassDescriptor, RenderPassId,
    SubpassDescription,
};
use crate::error::ResourceError;

#[derive(Debug)]
pub(crate) struct RenderPassObject {
    pub id: RenderPassId,
    pub descriptor: RenderPassDescriptor,
}

impl RenderPassObject {
    /// Checks that every subpass only references declared attachments.
    pub(crate) fn new(id: RenderPassId, descriptor: RenderPassDescriptor) -> Result<Self, ResourceError> {
        let count = descriptor.attachments.len() as u32;
        for (index, subpass) in descriptor.subpasses.iter().enumerate() {
            let references = subpass
                .input_attachments
                .iter()
                .chain(&subpass.color_attachments)
                .chain(&subpass.resolve_attachments)
                .chain(subpass.depth_stencil_attachment.iter())
                .filter(|reference| reference.is_used())
                .map(|reference| reference.attachment)
                .chain(subpass.preserve_attachments.iter().copied());
            for attachment in references {
                if attachment >= count {
                    return Err(ResourceError::InvalidAttachmentReference {
                        subpass: index,
                        attachment,
                    });
                }
            }
            if !subpass.resolve_attachments.is_empty()
                && subpass.resolve_attachments.len() != subpass.color_attachments.len()
            {
                log::warn!(
                    "RenderPass: subpass {} declares {} resolve attachments for {} colour attachments",
                    index,
                    subpass.resolve_attachments.len(),
                    subpass.color_attachments.len()
                );
            }
        }
        Ok(Self { id, descriptor })
    }

    pub(crate) fn attachments(&self) -> &[AttachmentDescription] {
        &self.descriptor.attachments
    }

    pub(crate) fn subpass(&self, index: u32) -> Option<&SubpassDescription> {
        self.descriptor.subpasses.get(index as usize)
    }

    pub(crate) fn subpass_count(&self) -> usize {
        self.descriptor.subpasses.len()
    }

    /// Formats of the colour attachments written by `subpass`, in draw buffer order.
    pub(crate) fn color_formats(&self, subpass: u32) -> Vec<Format> {
        self.subpass(subpass)
            .map(|desc| {
                desc.color_attachments
                    .iter()
                    .filter(|reference| reference.is_used())
                    .filter_map(|reference| self.attachment_format(reference))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn attachment_format(&self, reference: &AttachmentReference) -> Option<Format> {
        self.descriptor
            .attachments
            .get(reference.attachment as usize)
            .map(|attachment| attachment.format)
    }

    /// `true` when the attachment is only ever written by a multisample resolve.
    pub(crate) fn is_resolve_only(&self, attachment: u32) -> bool {
        let mut resolved = false;
        for subpass in &self.descriptor.subpasses {
            let rendered = subpass
                .input_attachments
                .iter()
                .chain(&subpass.color_attachments)
                .chain(subpass.depth_stencil_attachment.iter())
                .any(|reference| reference.attachment == attachment);
            if rendered {
                return false;
            }
            resolved |= subpass
                .resolve_attachments
                .iter()
                .any(|reference| reference.attachment == attachment);
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ImageLayout, ATTACHMENT_UNUSED};

    fn msaa_pass() -> RenderPassDescriptor {
        let mut msaa = AttachmentDescription::cleared(Format::Rgba8Unorm, ImageLayout::ColorAttachmentOptimal);
        msaa.samples = 4;
        RenderPassDescriptor {
            label: None,
            attachments: vec![
                msaa,
                AttachmentDescription::cleared(Format::Rgba8Unorm, ImageLayout::PresentSrc),
            ],
            subpasses: vec![SubpassDescription {
                color_attachments: vec![AttachmentReference::new(0, ImageLayout::ColorAttachmentOptimal)],
                resolve_attachments: vec![AttachmentReference::new(1, ImageLayout::ColorAttachmentOptimal)],
                ..Default::default()
            }],
            dependencies: Vec::new(),
        }
    }

    #[test]
    fn resolve_targets_are_detected() {
        let pass = RenderPassObject::new(RenderPassId(0), msaa_pass()).expect("valid pass");
        assert!(!pass.is_resolve_only(0));
        assert!(pass.is_resolve_only(1));
        assert_eq!(pass.color_formats(0), vec![Format::Rgba8Unorm]);
    }

    #[test]
    fn dangling_reference_is_rejected() {
        let mut descriptor = msaa_pass();
        descriptor.subpasses[0].depth_stencil_attachment =
            Some(AttachmentReference::new(5, ImageLayout::DepthStencilAttachmentOptimal));
        let result = RenderPassObject::new(RenderPassId(0), descriptor);
        assert!(matches!(
            result,
            Err(ResourceError::InvalidAttachmentReference {
                subpass: 0,
                attachment: 5
            })
        ));
    }

    #[test]
    fn unused_references_are_allowed() {
        let mut descriptor = msaa_pass();
        descriptor.subpasses[0].resolve_attachments[0].attachment = ATTACHMENT_UNUSED;
        assert!(RenderPassObject::new(RenderPassId(0), descriptor).is_ok());
    }
}
