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

//! Defines the hierarchy of error types for the renderer.

use crate::api::{DeviceMemoryId, PipelineLayoutId, RenderPassId, ShaderModuleId};
use crate::gl::GlFeature;
use std::fmt;

/// An error raised by the OpenGL context itself.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextError {
    /// The driver refused to create an object.
    ObjectCreation {
        /// The kind of object (e.g. `"buffer"`, `"vertex array"`).
        kind: &'static str,
        /// The message reported by the driver.
        details: String,
    },
    /// A resource was used before it received its OpenGL object.
    MissingObject(&'static str),
    /// An optional entry point required by the operation is not available.
    Unsupported(GlFeature),
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextError::ObjectCreation { kind, details } => {
                write!(f, "Failed to create OpenGL {kind}: {details}")
            }
            ContextError::MissingObject(kind) => {
                write!(f, "The {kind} has no OpenGL object (memory not bound?)")
            }
            ContextError::Unsupported(feature) => {
                write!(f, "Unsupported OpenGL feature: {feature:?}")
            }
        }
    }
}

impl std::error::Error for ContextError {}

/// An error related to the creation, compilation or linking of shaders.
#[derive(Debug)]
pub enum ShaderError {
    /// The GLSL source failed to compile.
    CompilationError {
        /// A descriptive label for the shader, if available.
        label: String,
        /// The compiler's info log.
        details: String,
    },
    /// The shader stages failed to link into a program.
    LinkError {
        /// A descriptive label for the program, if available.
        label: String,
        /// The linker's info log.
        details: String,
    },
    /// The requested shader module could not be found.
    NotFound {
        /// The ID of the shader module that was not found.
        id: ShaderModuleId,
    },
    /// OpenGL only knows `main` as a shader entry point.
    InvalidEntryPoint {
        /// The ID of the shader module.
        id: ShaderModuleId,
        /// The entry point name that was requested.
        entry_point: String,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::CompilationError { label, details } => {
                write!(f, "Shader compilation failed for '{label}': {details}")
            }
            ShaderError::LinkError { label, details } => {
                write!(f, "Program link failed for '{label}': {details}")
            }
            ShaderError::NotFound { id } => {
                write!(f, "Shader module not found for ID: {id:?}")
            }
            ShaderError::InvalidEntryPoint { id, entry_point } => {
                write!(
                    f,
                    "Invalid entry point '{entry_point}' for shader module {id:?}"
                )
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// An error related to the creation of a pipeline or pipeline layout.
#[derive(Debug)]
pub enum PipelineError {
    /// The linked program does not match the vertex layouts or render pass attachments.
    Validation(String),
    /// The pipeline layout referenced by a pipeline descriptor does not exist.
    InvalidLayout {
        /// The missing layout.
        id: PipelineLayoutId,
    },
    /// The render pass referenced by a pipeline descriptor does not exist.
    InvalidRenderPass {
        /// The missing render pass.
        id: RenderPassId,
    },
    /// The subpass index is out of range for the render pass.
    InvalidSubpass {
        /// The requested subpass.
        subpass: u32,
        /// The number of subpasses in the render pass.
        count: usize,
    },
    /// A pipeline was created without the stage it requires.
    MissingStage(&'static str),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Validation(msg) => write!(f, "VALIDATION ERROR: {msg}"),
            PipelineError::InvalidLayout { id } => {
                write!(f, "Invalid pipeline layout ID: {id:?}")
            }
            PipelineError::InvalidRenderPass { id } => {
                write!(f, "Invalid render pass ID: {id:?}")
            }
            PipelineError::InvalidSubpass { subpass, count } => {
                write!(
                    f,
                    "Subpass {subpass} is out of range, the render pass has {count} subpasses"
                )
            }
            PipelineError::MissingStage(stage) => {
                write!(f, "Pipeline is missing its {stage} stage")
            }
        }
    }
}

impl std::error::Error for PipelineError {}

/// An error related to the creation or use of a GPU resource.
#[derive(Debug)]
pub enum ResourceError {
    /// A shader-specific error occurred.
    Shader(ShaderError),
    /// A pipeline-specific error occurred.
    Pipeline(PipelineError),
    /// The OpenGL context reported an error.
    Context(ContextError),
    /// A resource could not be found.
    NotFound {
        /// The kind of resource that was looked up.
        kind: &'static str,
        /// The raw value of the handle.
        id: usize,
    },
    /// The memory is already bound to another resource.
    MemoryAlreadyBound {
        /// The memory that was bound twice.
        memory: DeviceMemoryId,
    },
    /// The resource was bound to a memory that is too small for it.
    MemoryTooSmall {
        /// The size the resource needs.
        required: u64,
        /// The size left in the allocation after the bind offset.
        available: u64,
    },
    /// The memory is not bound to any resource yet.
    MemoryNotBound,
    /// Only host-visible memory can be locked.
    NotHostVisible,
    /// The memory was flushed, invalidated or unlocked without being locked.
    NotMapped,
    /// An attempt was made to access a resource out of its bounds.
    OutOfBounds,
    /// The host cannot read or write the bound resource through its memory.
    UnsupportedHostAccess(&'static str),
    /// The framebuffer attachments do not match the render pass attachments.
    FramebufferMismatch(String),
    /// The framebuffer object failed the completeness check.
    IncompleteFramebuffer {
        /// The status returned by `glCheckFramebufferStatus`.
        status: u32,
    },
    /// A subpass references an attachment the render pass does not declare.
    InvalidAttachmentReference {
        /// The subpass holding the reference.
        subpass: usize,
        /// The referenced attachment index.
        attachment: u32,
    },
    /// The descriptor pool has no set left to allocate.
    PoolExhausted,
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::Shader(err) => write!(f, "Shader resource error: {err}"),
            ResourceError::Pipeline(err) => write!(f, "Pipeline resource error: {err}"),
            ResourceError::Context(err) => write!(f, "Context error: {err}"),
            ResourceError::NotFound { kind, id } => {
                write!(f, "Resource not found: {kind} #{id}")
            }
            ResourceError::MemoryAlreadyBound { memory } => {
                write!(f, "Device memory {memory:?} is already bound to a resource")
            }
            ResourceError::MemoryTooSmall {
                required,
                available,
            } => write!(
                f,
                "Device memory too small: {required} bytes required, {available} available"
            ),
            ResourceError::MemoryNotBound => write!(f, "Device memory is not bound"),
            ResourceError::NotHostVisible => {
                write!(f, "Device memory is not host visible")
            }
            ResourceError::NotMapped => write!(f, "Device memory is not locked"),
            ResourceError::OutOfBounds => write!(f, "Resource access out of bounds."),
            ResourceError::UnsupportedHostAccess(reason) => {
                write!(f, "Host access to device memory is not supported: {reason}")
            }
            ResourceError::FramebufferMismatch(msg) => {
                write!(f, "Framebuffer does not match its render pass: {msg}")
            }
            ResourceError::IncompleteFramebuffer { status } => {
                write!(f, "Framebuffer is incomplete, status 0x{status:04X}")
            }
            ResourceError::InvalidAttachmentReference {
                subpass,
                attachment,
            } => write!(
                f,
                "Subpass {subpass} references attachment {attachment}, which does not exist"
            ),
            ResourceError::PoolExhausted => write!(f, "Descriptor pool is exhausted"),
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Shader(err) => Some(err),
            ResourceError::Pipeline(err) => Some(err),
            ResourceError::Context(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShaderError> for ResourceError {
    fn from(err: ShaderError) -> Self {
        ResourceError::Shader(err)
    }
}

impl From<PipelineError> for ResourceError {
    fn from(err: PipelineError) -> Self {
        ResourceError::Pipeline(err)
    }
}

impl From<ContextError> for ResourceError {
    fn from(err: ContextError) -> Self {
        ResourceError::Context(err)
    }
}

/// A high-level error returned by the device and the queues.
#[derive(Debug)]
pub enum RenderError {
    /// A failure occurred while creating the device.
    InitializationFailed(String),
    /// An error occurred while managing a GPU resource.
    ResourceError(ResourceError),
    /// A submitted command buffer could not be prepared for replay.
    SubmitFailed {
        /// Position of the failing command buffer in the submission.
        index: usize,
        /// The underlying error.
        source: ResourceError,
    },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InitializationFailed(msg) => {
                write!(f, "Failed to initialize the device: {msg}")
            }
            RenderError::ResourceError(err) => {
                write!(f, "Graphics resource operation failed: {err}")
            }
            RenderError::SubmitFailed { index, source } => {
                write!(f, "Submission of command buffer #{index} failed: {source}")
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::ResourceError(err) => Some(err),
            RenderError::SubmitFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::ResourceError(err)
    }
}

impl From<ContextError> for RenderError {
    fn from(err: ContextError) -> Self {
        RenderError::ResourceError(err.into())
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn shader_error_display() {
        let err = ShaderError::CompilationError {
            label: "fullscreen.vert".to_string(),
            details: "0:5(1): error: syntax error".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "Shader compilation failed for 'fullscreen.vert': 0:5(1): error: syntax error"
        );
    }

    #[test]
    fn resource_error_display_wrapping_shader_error() {
        let res_err: ResourceError = ShaderError::NotFound {
            id: ShaderModuleId(42),
        }
        .into();
        assert_eq!(
            format!("{res_err}"),
            "Shader resource error: Shader module not found for ID: ShaderModuleId(42)"
        );
        assert!(res_err.source().is_some());
    }

    #[test]
    fn render_error_chain_reaches_context_error() {
        let render_err: RenderError = ContextError::MissingObject("buffer").into();
        assert_eq!(
            format!("{render_err}"),
            "Graphics resource operation failed: Context error: The buffer has no OpenGL object (memory not bound?)"
        );
        let source = render_err.source().expect("resource error source");
        assert!(source.source().is_some());
    }

    #[test]
    fn memory_already_bound_names_the_memory() {
        let err = ResourceError::MemoryAlreadyBound {
            memory: DeviceMemoryId(3),
        };
        assert_eq!(
            err.to_string(),
            "Device memory DeviceMemoryId(3) is already bound to a resource"
        );
    }
}
