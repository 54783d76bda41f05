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

//! Checks a linked program against the vertex layout and the render pass.
//!
//! Every active vertex input must be fed by an attribute of the vertex layout
//! and every fragment output must land in a colour attachment of the subpass.
//! Unused attributes and attachments are only worth a warning.

use crate::api::{Format, VertexAttributeDescription};
use crate::error::PipelineError;
use crate::gl::enums::{self as gl, GLenum};
use crate::gl::{GlName, GraphicsContext, ProgramResource};

/// Number of components of a reflected GLSL type, `None` for the types that
/// can never be fed by a vertex attribute or written to an attachment.
fn component_count(gl_type: GLenum) -> Option<u32> {
    match gl_type {
        gl::FLOAT | gl::INT | gl::UNSIGNED_INT => Some(1),
        gl::FLOAT_VEC2 | gl::INT_VEC2 | gl::UNSIGNED_INT_VEC2 => Some(2),
        gl::FLOAT_VEC3 | gl::INT_VEC3 | gl::UNSIGNED_INT_VEC3 => Some(3),
        gl::FLOAT_VEC4 | gl::INT_VEC4 | gl::UNSIGNED_INT_VEC4 => Some(4),
        _ => None,
    }
}

/// Locations and components per location of a vertex input. A `matN`
/// spans N consecutive locations of N components each.
fn input_shape(gl_type: GLenum) -> Option<(u32, u32)> {
    match gl_type {
        gl::FLOAT_MAT2 => Some((2, 2)),
        gl::FLOAT_MAT3 => Some((3, 3)),
        gl::FLOAT_MAT4 => Some((4, 4)),
        other => component_count(other).map(|components| (1, components)),
    }
}

/// The `GL_*` spelling of a reflected type, for diagnostics.
pub(crate) fn gl_type_name(gl_type: GLenum) -> String {
    let name = match gl_type {
        gl::FLOAT => "GL_FLOAT",
        gl::FLOAT_VEC2 => "GL_FLOAT_VEC2",
        gl::FLOAT_VEC3 => "GL_FLOAT_VEC3",
        gl::FLOAT_VEC4 => "GL_FLOAT_VEC4",
        gl::INT => "GL_INT",
        gl::INT_VEC2 => "GL_INT_VEC2",
        gl::INT_VEC3 => "GL_INT_VEC3",
        gl::INT_VEC4 => "GL_INT_VEC4",
        gl::UNSIGNED_INT => "GL_UNSIGNED_INT",
        gl::UNSIGNED_INT_VEC2 => "GL_UNSIGNED_INT_VEC2",
        gl::UNSIGNED_INT_VEC3 => "GL_UNSIGNED_INT_VEC3",
        gl::UNSIGNED_INT_VEC4 => "GL_UNSIGNED_INT_VEC4",
        gl::FLOAT_MAT2 => "GL_FLOAT_MAT2",
        gl::FLOAT_MAT3 => "GL_FLOAT_MAT3",
        gl::FLOAT_MAT4 => "GL_FLOAT_MAT4",
        other => return format!("0x{other:04X}"),
    };
    name.to_string()
}

fn is_builtin(resource: &ProgramResource) -> bool {
    resource.name.starts_with("gl_")
}

/// Indices in `unused` of the attributes feeding every location of `input`.
fn feeding_attributes(unused: &[&VertexAttributeDescription], input: &ProgramResource) -> Option<Vec<usize>> {
    let (locations, components) = input_shape(input.gl_type)?;
    (0..locations)
        .map(|column| {
            let location = i64::from(input.location) + i64::from(column);
            unused.iter().position(|attribute| {
                attribute.format.component_count() == components && i64::from(attribute.location) == location
            })
        })
        .collect()
}

fn check_inputs(
    inputs: &[ProgramResource],
    attributes: &[VertexAttributeDescription],
) -> Result<(), PipelineError> {
    let mut unused: Vec<&VertexAttributeDescription> = attributes.iter().collect();
    for input in inputs.iter().filter(|input| !is_builtin(input)) {
        match feeding_attributes(&unused, input) {
            Some(mut found) => {
                found.sort_unstable_by(|a, b| b.cmp(a));
                for index in found {
                    unused.remove(index);
                }
            }
            None => {
                return Err(PipelineError::Validation(format!(
                    "Attribute [{}], of type: {}, at location: {} is used in the shader program, but is not listed in the vertex layouts",
                    input.name,
                    gl_type_name(input.gl_type),
                    input.location
                )))
            }
        }
    }
    for attribute in unused {
        log::warn!(
            "Vertex layout has attribute of type {:?}, at location {}, which is not used by the program",
            attribute.format,
            attribute.location
        );
    }
    Ok(())
}

fn check_outputs(outputs: &[ProgramResource], attachments: &[Format]) -> Result<(), PipelineError> {
    let mut unused: Vec<Format> = attachments
        .iter()
        .copied()
        .filter(|format| !format.is_depth_or_stencil())
        .collect();
    for output in outputs.iter().filter(|output| !is_builtin(output)) {
        let components = component_count(output.gl_type);
        let found = unused
            .iter()
            .position(|format| Some(format.component_count()) == components);
        match found {
            Some(index) => {
                unused.remove(index);
            }
            None => {
                return Err(PipelineError::Validation(format!(
                    "Attachment [{}], of type: {}, at location: {} is used in the shader program, but is not listed in the render pass attachments",
                    output.name,
                    gl_type_name(output.gl_type),
                    output.location
                )))
            }
        }
    }
    for format in unused {
        log::warn!("Render pass has an attachment of type {format:?}, which is not used by the program");
    }
    Ok(())
}

/// Validates `program` against the attributes it will be fed and the formats
/// of the subpass attachments it renders to.
pub(crate) fn validate_program(
    ctx: &mut dyn GraphicsContext,
    program: GlName,
    attributes: &[VertexAttributeDescription],
    attachments: &[Format],
) -> Result<(), PipelineError> {
    match ctx.program_inputs(program) {
        Some(inputs) => check_inputs(&inputs, attributes)?,
        None => log::warn!("Program {program:?}: input reflection unavailable, skipping validation"),
    }
    match ctx.program_outputs(program) {
        Some(outputs) => check_outputs(&outputs, attachments)?,
        None => log::warn!("Program {program:?}: output reflection unavailable, skipping validation"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::VertexFormat;

    fn resource(name: &str, gl_type: GLenum, location: i32) -> ProgramResource {
        ProgramResource {
            name: name.to_string(),
            gl_type,
            location,
        }
    }

    fn attribute(location: u32, format: VertexFormat) -> VertexAttributeDescription {
        VertexAttributeDescription {
            location,
            binding: 0,
            format,
            offset: 0,
        }
    }

    #[test]
    fn inputs_match_by_location_and_components() {
        let inputs = [
            resource("position", gl::FLOAT_VEC3, 0),
            resource("uv", gl::FLOAT_VEC2, 1),
            resource("gl_VertexID", gl::INT, -1),
        ];
        let attributes = [
            attribute(0, VertexFormat::Float32x3),
            attribute(1, VertexFormat::Float32x2),
        ];
        assert!(check_inputs(&inputs, &attributes).is_ok());
    }

    #[test]
    fn missing_attribute_is_an_error() {
        let inputs = [resource("normal", gl::FLOAT_VEC3, 2)];
        let attributes = [attribute(2, VertexFormat::Float32x2)];
        let err = check_inputs(&inputs, &attributes).expect_err("mismatch");
        assert_eq!(
            err.to_string(),
            "VALIDATION ERROR: Attribute [normal], of type: GL_FLOAT_VEC3, at location: 2 is used in the shader program, but is not listed in the vertex layouts"
        );
    }

    #[test]
    fn matrix_inputs_take_one_attribute_per_column() {
        let inputs = [
            resource("position", gl::FLOAT_VEC3, 0),
            resource("model", gl::FLOAT_MAT4, 1),
        ];
        let attributes = [
            attribute(0, VertexFormat::Float32x3),
            attribute(1, VertexFormat::Float32x4),
            attribute(2, VertexFormat::Float32x4),
            attribute(3, VertexFormat::Float32x4),
            attribute(4, VertexFormat::Float32x4),
        ];
        assert!(check_inputs(&inputs, &attributes).is_ok());

        let attributes = [attribute(0, VertexFormat::Float32x2), attribute(1, VertexFormat::Float32x2)];
        let twice = [resource("model", gl::FLOAT_MAT2, 0), resource("uv", gl::FLOAT_VEC2, 1)];
        assert!(
            check_inputs(&twice, &attributes).is_err(),
            "a column attribute cannot feed another input"
        );
    }

    #[test]
    fn matrix_input_with_a_missing_column_is_an_error() {
        let inputs = [resource("normal_matrix", gl::FLOAT_MAT3, 2)];
        let short = [attribute(2, VertexFormat::Float32x3), attribute(3, VertexFormat::Float32x3)];
        assert!(check_inputs(&inputs, &short).is_err());

        let wide = [
            attribute(2, VertexFormat::Float32x4),
            attribute(3, VertexFormat::Float32x4),
            attribute(4, VertexFormat::Float32x4),
        ];
        assert!(check_inputs(&inputs, &wide).is_err(), "each column needs exactly three components");
    }

    #[test]
    fn outputs_ignore_depth_attachments() {
        let outputs = [resource("color", gl::FLOAT_VEC4, 0)];
        assert!(check_outputs(&outputs, &[Format::D24UnormS8Uint, Format::Rgba8Unorm]).is_ok());
        assert!(check_outputs(&outputs, &[Format::D32Float]).is_err());
    }

    #[test]
    fn each_attachment_satisfies_one_output() {
        let outputs = [
            resource("albedo", gl::FLOAT_VEC4, 0),
            resource("emissive", gl::FLOAT_VEC4, 1),
        ];
        assert!(check_outputs(&outputs, &[Format::Rgba8Unorm]).is_err());
        assert!(check_outputs(&outputs, &[Format::Rgba8Unorm, Format::Rgba16Float]).is_ok());
    }
}
