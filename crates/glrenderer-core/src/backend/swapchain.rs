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

//! Swap chains.
//!
//! Every image of an OpenGL swap chain aliases the default framebuffer. The
//! images exist so that views and framebuffers can reference them.

use crate::api::{SwapChainDescriptor, SwapChainId, TextureId};
use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Debug)]
pub(crate) struct SwapChainObject {
    pub id: SwapChainId,
    pub descriptor: SwapChainDescriptor,
    pub images: Vec<TextureId>,
    next_image: AtomicU32,
}

impl SwapChainObject {
    pub(crate) fn new(id: SwapChainId, descriptor: SwapChainDescriptor, images: Vec<TextureId>) -> Self {
        Self {
            id,
            descriptor,
            images,
            next_image: AtomicU32::new(0),
        }
    }

    /// Hands out the images in round-robin order.
    pub(crate) fn acquire_next_image(&self) -> u32 {
        let count = self.images.len().max(1) as u32;
        self.next_image.fetch_add(1, Ordering::Relaxed) % count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Extent2D, Format};

    #[test]
    fn images_are_acquired_round_robin() {
        let swapchain = SwapChainObject::new(
            SwapChainId(0),
            SwapChainDescriptor {
                label: None,
                extent: Extent2D::new(640, 480),
                format: Format::Bgra8Srgb,
                image_count: 3,
            },
            vec![TextureId(0), TextureId(1), TextureId(2)],
        );
        let acquired: Vec<u32> = (0..4).map(|_| swapchain.acquire_next_image()).collect();
        assert_eq!(acquired, vec![0, 1, 2, 0]);
    }
}
