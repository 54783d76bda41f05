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

//! Linked shader programs.

use super::resources::ShaderModuleObject;
use crate::error::{ResourceError, ShaderError};
use crate::gl::{GlName, GraphicsContext};

/// A program linked from the shader modules of one pipeline.
#[derive(Debug)]
pub(crate) struct ShaderProgram {
    pub name: GlName,
}

impl ShaderProgram {
    /// Links `modules` into a new program. The shaders are detached afterwards
    /// so that destroying a module does not keep it alive inside the program.
    pub(crate) fn link(
        ctx: &mut dyn GraphicsContext,
        label: &str,
        modules: &[&ShaderModuleObject],
    ) -> Result<Self, ResourceError> {
        let name = ctx.create_program()?;
        for module in modules {
            ctx.attach_shader(name, module.shader);
        }
        let linked = ctx.link_program(name);
        for module in modules {
            ctx.detach_shader(name, module.shader);
        }
        if let Err(details) = linked {
            ctx.delete_program(name);
            return Err(ShaderError::LinkError {
                label: label.to_string(),
                details,
            }
            .into());
        }
        log::debug!("ShaderProgram: Linked '{}' with {} stages", label, modules.len());
        Ok(Self { name })
    }

    pub(crate) fn destroy(&self, ctx: &mut dyn GraphicsContext) {
        ctx.delete_program(self.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ShaderModuleId, ShaderStage};
    use crate::gl::{GlCall, TraceContext};

    #[test]
    fn shaders_are_detached_after_linking() {
        let mut context = TraceContext::new();
        let vertex = ShaderModuleObject::compile(
            &mut context,
            ShaderModuleId(0),
            "vs".to_string(),
            ShaderStage::Vertex,
            "void main() {}",
        )
        .expect("compiles");
        let program = ShaderProgram::link(&mut context, "test", &[&vertex]).expect("links");
        assert!(context.calls().contains(&GlCall::DetachShader {
            program: program.name,
            shader: vertex.shader,
        }));
    }

    #[test]
    fn link_failure_deletes_the_program() {
        let mut context = TraceContext::new();
        context.fail_link("undefined reference to main");
        let result = ShaderProgram::link(&mut context, "broken", &[]);
        match result {
            Err(ResourceError::Shader(ShaderError::LinkError { label, details })) => {
                assert_eq!(label, "broken");
                assert_eq!(details, "undefined reference to main");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
