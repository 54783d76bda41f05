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

//! Pipeline and pipeline layout descriptors.

pub mod enums;
pub mod state;
pub mod vertex;

pub use enums::*;
pub use state::*;
pub use vertex::*;

use super::descriptor::DescriptorSetLayoutId;
use super::dimension::{Rect2D, Viewport};
use super::render_pass::RenderPassId;
use super::shader::{PushConstantRange, ShaderModuleId, SpecializationInfo};

/// An opaque handle to a pipeline layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineLayoutId(pub usize);

/// An opaque handle to a graphics pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineId(pub usize);

/// An opaque handle to a compute pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComputePipelineId(pub usize);

/// Describes a pipeline layout.
#[derive(Debug, Clone, Default)]
pub struct PipelineLayoutDescriptor {
    /// A debug label.
    pub label: Option<String>,
    /// Descriptor set layouts, indexed by set number.
    pub set_layouts: Vec<DescriptorSetLayoutId>,
    /// Push constant ranges.
    pub push_constant_ranges: Vec<PushConstantRange>,
}

/// One shader stage of a pipeline.
#[derive(Debug, Clone)]
pub struct ShaderStageDescriptor {
    /// The compiled module.
    pub module: ShaderModuleId,
    /// Entry point; OpenGL only supports `main`.
    pub entry_point: String,
    /// Specialisation constants of the stage.
    pub specialization: Option<SpecializationInfo>,
}

impl ShaderStageDescriptor {
    /// A stage with the `main` entry point and no specialisation.
    pub fn new(module: ShaderModuleId) -> Self {
        Self {
            module,
            entry_point: "main".to_string(),
            specialization: None,
        }
    }
}

/// Describes a graphics pipeline.
#[derive(Debug, Clone)]
pub struct GraphicsPipelineDescriptor {
    /// A debug label.
    pub label: Option<String>,
    /// The layout the pipeline is created from.
    pub layout: PipelineLayoutId,
    /// Shader stages; must contain a vertex stage.
    pub stages: Vec<ShaderStageDescriptor>,
    /// Vertex input layout; may be empty for procedural vertex shaders.
    pub vertex_input: VertexInputState,
    /// Primitive assembly.
    pub input_assembly: InputAssemblyState,
    /// Tessellation, for pipelines with tessellation stages.
    pub tessellation: Option<TessellationState>,
    /// A fixed viewport; `None` when the viewport is dynamic.
    pub viewport: Option<Viewport>,
    /// A fixed scissor; `None` when the scissor is dynamic or disabled.
    pub scissor: Option<Rect2D>,
    /// Rasterization.
    pub rasterization: RasterizationState,
    /// Multisampling.
    pub multisample: MultisampleState,
    /// Depth and stencil tests; `None` disables both.
    pub depth_stencil: Option<DepthStencilState>,
    /// Colour blending.
    pub color_blend: ColorBlendState,
    /// State set by recording calls.
    pub dynamic_states: Vec<DynamicState>,
    /// The render pass the pipeline is used with.
    pub render_pass: RenderPassId,
    /// The subpass the pipeline is used in.
    pub subpass: u32,
}

impl GraphicsPipelineDescriptor {
    /// A pipeline with default fixed-function state.
    pub fn new(
        layout: PipelineLayoutId,
        stages: Vec<ShaderStageDescriptor>,
        vertex_input: VertexInputState,
        render_pass: RenderPassId,
    ) -> Self {
        Self {
            label: None,
            layout,
            stages,
            vertex_input,
            input_assembly: InputAssemblyState::default(),
            tessellation: None,
            viewport: None,
            scissor: None,
            rasterization: RasterizationState::default(),
            multisample: MultisampleState::default(),
            depth_stencil: None,
            color_blend: ColorBlendState::default(),
            dynamic_states: Vec::new(),
            render_pass,
            subpass: 0,
        }
    }
}

/// Describes a compute pipeline.
#[derive(Debug, Clone)]
pub struct ComputePipelineDescriptor {
    /// A debug label.
    pub label: Option<String>,
    /// The layout the pipeline is created from.
    pub layout: PipelineLayoutId,
    /// The compute stage.
    pub stage: ShaderStageDescriptor,
}
