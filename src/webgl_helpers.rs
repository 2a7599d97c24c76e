// Helper functions for dealing with shaders, compiling and linking them into shader programs

use web_sys::{WebGlProgram, WebGlRenderingContext, WebGlShader, WebGlUniformLocation};

use crate::renderer::RenderError;

pub fn compile_shader(
    context: &WebGlRenderingContext,
    shader_type: u32,
    source: &str,
) -> Result<WebGlShader, RenderError> {
    let shader = context
        .create_shader(shader_type)
        .ok_or(RenderError::Resource("shader object"))?;
    context.shader_source(&shader, source);
    context.compile_shader(&shader);

    if context
        .get_shader_parameter(&shader, WebGlRenderingContext::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = context
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| String::from("Unknown error creating shader"));
        context.delete_shader(Some(&shader));
        Err(RenderError::Shader(log))
    }
}

pub fn link_program(
    context: &WebGlRenderingContext,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<WebGlProgram, RenderError> {
    let vertex_shader =
        compile_shader(context, WebGlRenderingContext::VERTEX_SHADER, vertex_source)?;
    let fragment_shader =
        compile_shader(context, WebGlRenderingContext::FRAGMENT_SHADER, fragment_source)?;
    let program = context
        .create_program()
        .ok_or(RenderError::Resource("program object"))?;
    context.attach_shader(&program, &vertex_shader);
    context.attach_shader(&program, &fragment_shader);
    context.link_program(&program);

    // the program keeps what it needs once linked
    context.delete_shader(Some(&vertex_shader));
    context.delete_shader(Some(&fragment_shader));

    if context
        .get_program_parameter(&program, WebGlRenderingContext::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        Err(RenderError::Link(
            context
                .get_program_info_log(&program)
                .unwrap_or_else(|| String::from("Unknown error creating program object")),
        ))
    }
}

pub fn attrib_location(
    context: &WebGlRenderingContext,
    program: &WebGlProgram,
    name: &'static str,
) -> Result<u32, RenderError> {
    let location = context.get_attrib_location(program, name);
    if location < 0 {
        Err(RenderError::MissingAttribute(name))
    } else {
        Ok(location as u32)
    }
}

pub fn uniform_location(
    context: &WebGlRenderingContext,
    program: &WebGlProgram,
    name: &'static str,
) -> Result<WebGlUniformLocation, RenderError> {
    context
        .get_uniform_location(program, name)
        .ok_or(RenderError::MissingUniform(name))
}
