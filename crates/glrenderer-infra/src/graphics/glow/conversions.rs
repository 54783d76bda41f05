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

//! Conversions between the backend's plain OpenGL names and glow's typed handles.

use glrenderer_core::gl::{GlFeature, GlName};
use std::num::NonZeroU32;

/// A local extension trait to convert backend names into glow handles.
/// Name `0` is never issued, so it converts to `None`.
pub trait IntoGlow<T> {
    /// Converts self into a glow handle.
    fn into_glow(self) -> T;
}

/// The reverse of [`IntoGlow`].
pub trait IntoGlName {
    /// Converts a glow handle into the name the backend stores.
    fn into_gl_name(self) -> GlName;
}

macro_rules! glow_objects {
    ($($native:ident),* $(,)?) => {
        $(
            impl IntoGlow<Option<glow::$native>> for GlName {
                fn into_glow(self) -> Option<glow::$native> {
                    NonZeroU32::new(self.0).map(glow::$native)
                }
            }

            impl IntoGlName for glow::$native {
                fn into_gl_name(self) -> GlName {
                    GlName(self.0.get())
                }
            }
        )*
    };
}

glow_objects!(
    NativeBuffer,
    NativeVertexArray,
    NativeTexture,
    NativeSampler,
    NativeFramebuffer,
    NativeShader,
    NativeProgram,
    NativeQuery,
);

/// The OpenGL version a context reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlVersion {
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
    /// `true` for OpenGL ES.
    pub embedded: bool,
}

impl GlVersion {
    /// `true` when the context is desktop OpenGL `desktop` or later, or OpenGL ES `es` or later.
    fn at_least(&self, desktop: (u32, u32), es: Option<(u32, u32)>) -> bool {
        let version = (self.major, self.minor);
        match (self.embedded, es) {
            (false, _) => version >= desktop,
            (true, Some(es)) => version >= es,
            (true, None) => false,
        }
    }

    /// Whether the optional entry point is reachable through glow on this version.
    pub fn supports(&self, feature: GlFeature) -> bool {
        match feature {
            GlFeature::CopyImageSubData => self.at_least((4, 3), Some((3, 2))),
            GlFeature::ImageLoadStore => self.at_least((4, 2), Some((3, 1))),
            GlFeature::ProgramInterfaceQuery => self.at_least((4, 3), Some((3, 1))),
            GlFeature::TimestampQuery => self.at_least((3, 3), None),
            // glow does not load these entry points.
            GlFeature::ClearTexImage
            | GlFeature::TexSubImage1D
            | GlFeature::LogicOp
            | GlFeature::SampleShading => false,
        }
    }
}

/// Byte offsets and sizes are `GLintptr` in the backend but `i32` in glow.
pub fn to_i32(value: u64) -> i32 {
    i32::try_from(value).unwrap_or_else(|_| {
        log::warn!("GlowContext: {value} does not fit a 32-bit offset, clamped");
        i32::MAX
    })
}

/// glow takes the sync timeout as an `i32` of nanoseconds.
pub fn wait_timeout(timeout_ns: u64) -> i32 {
    i32::try_from(timeout_ns).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_glow_handles() {
        let buffer: Option<glow::NativeBuffer> = GlName(7).into_glow();
        assert_eq!(buffer.map(IntoGlName::into_gl_name), Some(GlName(7)));

        let none: Option<glow::NativeTexture> = GlName(0).into_glow();
        assert!(none.is_none(), "name 0 is the null object");
    }

    #[test]
    fn features_follow_the_context_version() {
        let gl33 = GlVersion { major: 3, minor: 3, embedded: false };
        let gl45 = GlVersion { major: 4, minor: 5, embedded: false };
        let es32 = GlVersion { major: 3, minor: 2, embedded: true };

        assert!(!gl33.supports(GlFeature::CopyImageSubData));
        assert!(gl45.supports(GlFeature::CopyImageSubData));
        assert!(es32.supports(GlFeature::CopyImageSubData));
        assert!(gl33.supports(GlFeature::TimestampQuery));
        assert!(!es32.supports(GlFeature::TimestampQuery));
        assert!(!gl45.supports(GlFeature::ClearTexImage));
        assert!(!gl33.supports(GlFeature::ProgramInterfaceQuery));
        assert!(gl45.supports(GlFeature::ProgramInterfaceQuery));
        assert!(es32.supports(GlFeature::ProgramInterfaceQuery));
    }

    #[test]
    fn oversized_values_are_clamped() {
        assert_eq!(to_i32(16), 16);
        assert_eq!(to_i32(u64::MAX), i32::MAX);
        assert_eq!(wait_timeout(1_000_000_000), 1_000_000_000);
        assert_eq!(wait_timeout(u64::MAX), i32::MAX);
    }
}
