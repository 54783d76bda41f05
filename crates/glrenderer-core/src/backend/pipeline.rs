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

//! Pipeline layouts, graphics pipelines and compute pipelines.

use super::descriptor::DescriptorSetLayoutObject;
use super::program::ShaderProgram;
use super::render_pass::RenderPassObject;
use super::resources::ShaderModuleObject;
use super::validator::validate_program;
use super::command::WriteMasks;
use crate::api::{
    ColorComponentFlags, ComputePipelineDescriptor, ComputePipelineId, DynamicState, GraphicsPipelineDescriptor,
    PipelineId, PipelineLayoutId, PrimitiveTopology, PushConstant, PushConstantRange,
    PushConstantsBuffer, ShaderStage, ShaderStageDescriptor, SpecializationInfo, StencilOpState,
};
use crate::error::{PipelineError, ResourceError, ShaderError};
use crate::gl::enums::{self as gl, GLenum};
use crate::gl::{GlFeature, GraphicsContext, IntoGl};
use std::sync::Arc;

#[derive(Debug)]
pub(crate) struct PipelineLayoutObject {
    pub id: PipelineLayoutId,
    pub set_layouts: Vec<Arc<DescriptorSetLayoutObject>>,
    pub push_constant_ranges: Vec<PushConstantRange>,
}

/// Turns the specialisation constants of a stage into a constants buffer
/// applied after every bind of the pipeline.
fn bake_specialization(stage: ShaderStage, info: &SpecializationInfo) -> PushConstantsBuffer {
    PushConstantsBuffer {
        stages: stage.flag(),
        offset: 0,
        constants: info
            .entries
            .iter()
            .map(|entry| PushConstant {
                location: entry.constant_id,
                offset: entry.offset,
                format: entry.format,
                array_size: 1,
            })
            .collect(),
        data: info.data.clone(),
    }
}

fn color_mask(mask: ColorComponentFlags) -> [bool; 4] {
    [
        mask.contains(ColorComponentFlags::R),
        mask.contains(ColorComponentFlags::G),
        mask.contains(ColorComponentFlags::B),
        mask.contains(ColorComponentFlags::A),
    ]
}

fn check_entry_point(stage: &ShaderStageDescriptor) -> Result<(), ShaderError> {
    if stage.entry_point != "main" {
        return Err(ShaderError::InvalidEntryPoint {
            id: stage.module,
            entry_point: stage.entry_point.clone(),
        });
    }
    Ok(())
}

#[derive(Debug)]
pub(crate) struct GraphicsPipelineObject {
    pub id: PipelineId,
    pub descriptor: GraphicsPipelineDescriptor,
    pub layout: Arc<PipelineLayoutObject>,
    pub program: ShaderProgram,
    pub vertex_hash: u64,
    pub constants: Vec<PushConstantsBuffer>,
}

impl GraphicsPipelineObject {
    /// Links and validates the program of a graphics pipeline.
    ///
    /// `modules` holds the module of each entry of `descriptor.stages`, in order.
    pub(crate) fn create(
        ctx: &mut dyn GraphicsContext,
        id: PipelineId,
        descriptor: GraphicsPipelineDescriptor,
        layout: Arc<PipelineLayoutObject>,
        render_pass: &RenderPassObject,
        modules: &[Arc<ShaderModuleObject>],
        validate: bool,
    ) -> Result<Self, ResourceError> {
        if descriptor.subpass as usize >= render_pass.subpass_count() {
            return Err(PipelineError::InvalidSubpass {
                subpass: descriptor.subpass,
                count: render_pass.subpass_count(),
            }
            .into());
        }
        if !modules.iter().any(|module| module.stage == ShaderStage::Vertex) {
            return Err(PipelineError::MissingStage("vertex").into());
        }
        for stage in &descriptor.stages {
            check_entry_point(stage)?;
        }

        let label = descriptor.label.clone().unwrap_or_else(|| format!("pipeline #{}", id.0));
        let stages: Vec<&ShaderModuleObject> = modules.iter().map(Arc::as_ref).collect();
        let program = ShaderProgram::link(ctx, &label, &stages)?;

        if validate {
            let attachments = render_pass.color_formats(descriptor.subpass);
            if let Err(err) = validate_program(
                ctx,
                program.name,
                &descriptor.vertex_input.attributes,
                &attachments,
            ) {
                program.destroy(ctx);
                return Err(err.into());
            }
        }

        let constants = descriptor
            .stages
            .iter()
            .zip(modules)
            .filter_map(|(stage, module)| {
                stage
                    .specialization
                    .as_ref()
                    .map(|info| bake_specialization(module.stage, info))
            })
            .collect();

        Ok(Self {
            id,
            vertex_hash: descriptor.vertex_input.hash_value(),
            descriptor,
            layout,
            program,
            constants,
        })
    }

    pub(crate) fn is_dynamic(&self, state: DynamicState) -> bool {
        self.descriptor.dynamic_states.contains(&state)
    }

    pub(crate) fn topology(&self) -> GLenum {
        self.descriptor.input_assembly.topology.into_gl()
    }

    pub(crate) fn has_vertex_input(&self) -> bool {
        !self.descriptor.vertex_input.is_empty()
    }

    /// The stencil state of the given face, used by dynamic stencil references.
    pub(crate) fn stencil_state(&self, back: bool) -> StencilOpState {
        self.descriptor
            .depth_stencil
            .map(|state| if back { state.back } else { state.front })
            .unwrap_or_default()
    }

    /// The colour, depth and stencil write masks [`bind`](Self::bind) issues.
    pub(crate) fn write_masks(&self) -> WriteMasks {
        let desc = &self.descriptor;
        WriteMasks {
            color: desc
                .color_blend
                .attachments
                .iter()
                .map(|attachment| color_mask(attachment.write_mask))
                .collect(),
            depth: desc.depth_stencil.map(|state| state.depth_write),
            stencil: desc
                .depth_stencil
                .map(|state| [state.front.write_mask, state.back.write_mask]),
        }
    }

    /// Issues the whole fixed-function state of the pipeline.
    pub(crate) fn bind(&self, ctx: &mut dyn GraphicsContext) {
        let desc = &self.descriptor;
        ctx.use_program(Some(self.program.name));

        toggle(ctx, gl::PRIMITIVE_RESTART_FIXED_INDEX, desc.input_assembly.primitive_restart);

        let raster = &desc.rasterization;
        toggle(ctx, gl::DEPTH_CLAMP, raster.depth_clamp);
        toggle(ctx, gl::RASTERIZER_DISCARD, raster.rasterizer_discard);
        ctx.polygon_mode(gl::FRONT_AND_BACK, raster.polygon_mode.into_gl());
        match raster.cull_mode.into_gl() {
            Some(face) => {
                ctx.enable(gl::CULL_FACE);
                ctx.cull_face(face);
            }
            None => ctx.disable(gl::CULL_FACE),
        }
        ctx.front_face(raster.front_face.into_gl());
        let offset_caps = [gl::POLYGON_OFFSET_FILL, gl::POLYGON_OFFSET_LINE, gl::POLYGON_OFFSET_POINT];
        match raster.depth_bias {
            Some(bias) => {
                offset_caps.iter().for_each(|cap| ctx.enable(*cap));
                if !self.is_dynamic(DynamicState::DepthBias) {
                    ctx.polygon_offset(bias.slope_scale, bias.constant);
                }
            }
            None => offset_caps.iter().for_each(|cap| ctx.disable(*cap)),
        }
        if !self.is_dynamic(DynamicState::LineWidth) {
            ctx.line_width(raster.line_width);
        }

        let multisample = &desc.multisample;
        toggle(ctx, gl::MULTISAMPLE, multisample.samples > 1);
        match multisample.sample_shading {
            Some(fraction) if ctx.supports(GlFeature::SampleShading) => {
                ctx.enable(gl::SAMPLE_SHADING);
                ctx.min_sample_shading(fraction);
            }
            Some(_) => log::warn!("Pipeline: sample shading is not supported, ignored"),
            None => ctx.disable(gl::SAMPLE_SHADING),
        }
        toggle(ctx, gl::SAMPLE_ALPHA_TO_COVERAGE, multisample.alpha_to_coverage);
        toggle(ctx, gl::SAMPLE_ALPHA_TO_ONE, multisample.alpha_to_one);

        match &desc.depth_stencil {
            Some(state) => {
                toggle(ctx, gl::DEPTH_TEST, state.depth_test);
                ctx.depth_func(state.depth_compare.into_gl());
                ctx.depth_mask(state.depth_write);
                toggle(ctx, gl::STENCIL_TEST, state.stencil_test);
                for (face, stencil) in [(gl::FRONT, &state.front), (gl::BACK, &state.back)] {
                    ctx.stencil_op_separate(
                        face,
                        stencil.fail_op.into_gl(),
                        stencil.depth_fail_op.into_gl(),
                        stencil.pass_op.into_gl(),
                    );
                    ctx.stencil_func_separate(
                        face,
                        stencil.compare_op.into_gl(),
                        stencil.reference as i32,
                        stencil.compare_mask,
                    );
                    ctx.stencil_mask_separate(face, stencil.write_mask);
                }
            }
            None => {
                ctx.disable(gl::DEPTH_TEST);
                ctx.disable(gl::STENCIL_TEST);
            }
        }

        let blend = &desc.color_blend;
        for (index, attachment) in blend.attachments.iter().enumerate() {
            let index = index as u32;
            if attachment.blend_enable {
                ctx.enable_i(gl::BLEND, index);
                ctx.blend_equation_separate_i(index, attachment.color_op.into_gl(), attachment.alpha_op.into_gl());
                ctx.blend_func_separate_i(
                    index,
                    attachment.src_color_factor.into_gl(),
                    attachment.dst_color_factor.into_gl(),
                    attachment.src_alpha_factor.into_gl(),
                    attachment.dst_alpha_factor.into_gl(),
                );
            } else {
                ctx.disable_i(gl::BLEND, index);
            }
            ctx.color_mask_i(index, color_mask(attachment.write_mask));
        }
        if !self.is_dynamic(DynamicState::BlendConstants) {
            ctx.blend_color(blend.blend_constants);
        }
        match blend.logic_op {
            Some(op) if ctx.supports(GlFeature::LogicOp) => {
                ctx.enable(gl::COLOR_LOGIC_OP);
                ctx.logic_op(op.into_gl());
            }
            Some(_) => log::warn!("Pipeline: logic operations are not supported, ignored"),
            None => ctx.disable(gl::COLOR_LOGIC_OP),
        }

        if desc.input_assembly.topology == PrimitiveTopology::PatchList {
            let points = desc
                .tessellation
                .map(|state| state.patch_control_points)
                .unwrap_or(3);
            ctx.patch_parameter_i32(gl::PATCH_VERTICES, points as i32);
        }

        if let (Some(viewport), false) = (desc.viewport, self.is_dynamic(DynamicState::Viewport)) {
            ctx.viewport(
                viewport.x as i32,
                viewport.y as i32,
                viewport.width as i32,
                viewport.height as i32,
            );
            ctx.depth_range(viewport.min_depth, viewport.max_depth);
        }
        if let (Some(scissor), false) = (desc.scissor, self.is_dynamic(DynamicState::Scissor)) {
            ctx.scissor(
                scissor.offset.x,
                scissor.offset.y,
                scissor.extent.width as i32,
                scissor.extent.height as i32,
            );
        }
    }
}

fn toggle(ctx: &mut dyn GraphicsContext, capability: GLenum, enabled: bool) {
    if enabled {
        ctx.enable(capability);
    } else {
        ctx.disable(capability);
    }
}

#[derive(Debug)]
pub(crate) struct ComputePipelineObject {
    pub id: ComputePipelineId,
    pub layout: Arc<PipelineLayoutObject>,
    pub program: ShaderProgram,
    pub constants: Vec<PushConstantsBuffer>,
}

impl ComputePipelineObject {
    pub(crate) fn create(
        ctx: &mut dyn GraphicsContext,
        id: ComputePipelineId,
        descriptor: &ComputePipelineDescriptor,
        layout: Arc<PipelineLayoutObject>,
        module: &ShaderModuleObject,
    ) -> Result<Self, ResourceError> {
        if module.stage != ShaderStage::Compute {
            return Err(PipelineError::MissingStage("compute").into());
        }
        check_entry_point(&descriptor.stage)?;
        let label = descriptor
            .label
            .clone()
            .unwrap_or_else(|| format!("compute pipeline #{}", id.0));
        let program = ShaderProgram::link(ctx, &label, &[module])?;
        let constants = descriptor
            .stage
            .specialization
            .iter()
            .map(|info| bake_specialization(ShaderStage::Compute, info))
            .collect();
        Ok(Self {
            id,
            layout,
            program,
            constants,
        })
    }

    pub(crate) fn bind(&self, ctx: &mut dyn GraphicsContext) {
        ctx.use_program(Some(self.program.name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ConstantFormat, SpecializationMapEntry};

    #[test]
    fn specialization_constants_use_their_id_as_location() {
        let info = SpecializationInfo {
            entries: vec![
                SpecializationMapEntry {
                    constant_id: 7,
                    offset: 0,
                    format: ConstantFormat::Int,
                },
                SpecializationMapEntry {
                    constant_id: 9,
                    offset: 4,
                    format: ConstantFormat::Float,
                },
            ],
            data: vec![0; 8],
        };
        let buffer = bake_specialization(ShaderStage::Fragment, &info);
        assert_eq!(buffer.constants[1].location, 9);
        assert_eq!(buffer.constants[1].array_size, 1);
        assert_eq!(buffer.data.len(), 8);
    }

    #[test]
    fn only_main_is_a_valid_entry_point() {
        let mut stage = ShaderStageDescriptor::new(crate::api::ShaderModuleId(3));
        assert!(check_entry_point(&stage).is_ok());
        stage.entry_point = "vs_main".to_string();
        assert!(matches!(
            check_entry_point(&stage),
            Err(ShaderError::InvalidEntryPoint { .. })
        ));
    }
}
