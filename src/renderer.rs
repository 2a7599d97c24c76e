// Renderer struct that handles WebGl calls for the rain: the glyph shader,
// one dynamic vertex buffer holding a textured quad per particle, and the
// glyph atlas texture. The particle state itself lives in `RainState`.

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    HtmlCanvasElement, WebGlBuffer, WebGlProgram, WebGlRenderingContext, WebGlUniformLocation,
};

use crate::color::Color;
use crate::field::GlyphPool;
use crate::glyph_atlas::{AtlasLayout, GlyphAtlas};
use crate::particle::Particle;
use crate::utils::describe;
use crate::viewport::Viewport;
use crate::webgl_helpers;

extern crate nalgebra_glm as glm;
use glm::TMat4;

/// x, y, u, v, alpha
const FLOATS_PER_VERTEX: usize = 5;
const VERTICES_PER_QUAD: usize = 6;

const VERTEX_SHADER: &str = r#"
    attribute vec2 a_Position;
    attribute vec2 a_TexCoord;
    attribute float a_Alpha;

    uniform mat4 u_ViewProj;

    varying vec2 v_TexCoord;
    varying float v_Alpha;

    void main() {
        gl_Position = u_ViewProj * vec4(a_Position, 0.0, 1.0);
        v_TexCoord = a_TexCoord;
        v_Alpha = a_Alpha;
    }
"#;

const FRAGMENT_SHADER: &str = r#"
    precision mediump float;

    varying vec2 v_TexCoord;
    varying float v_Alpha;

    uniform sampler2D u_Glyphs;
    uniform vec4 u_Tint;

    void main() {
        float coverage = texture2D(u_Glyphs, v_TexCoord).a;
        gl_FragColor = vec4(u_Tint.rgb, u_Tint.a * v_Alpha * coverage);
    }
"#;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no window")]
    MissingWindow,
    #[error("no document")]
    MissingDocument,
    #[error("missing #{0} element")]
    MissingCanvas(String),
    #[error("#{0} is not a canvas")]
    NotACanvas(String),
    #[error("WebGL not supported")]
    WebGlUnavailable,
    #[error("shader compile failed: {0}")]
    Shader(String),
    #[error("program link failed: {0}")]
    Link(String),
    #[error("attribute {0} not found")]
    MissingAttribute(&'static str),
    #[error("uniform {0} not found")]
    MissingUniform(&'static str),
    #[error("failed to create {0}")]
    Resource(&'static str),
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
    #[error("{0}")]
    Js(String),
}

impl From<JsValue> for RenderError {
    fn from(value: JsValue) -> Self {
        RenderError::Js(describe(&value))
    }
}

pub struct Renderer {
    context: WebGlRenderingContext,
    program: WebGlProgram,
    vertex_buffer: WebGlBuffer,
    atlas: GlyphAtlas,
    position_location: u32,
    tex_coord_location: u32,
    alpha_location: u32,
    view_proj_location: WebGlUniformLocation,
    tint_location: WebGlUniformLocation,
    sampler_location: WebGlUniformLocation,
    tint: Color,
    background: Color,
    vertex_array: Vec<f32>,
}

impl Renderer {
    // Grabs the WebGl context from the canvas, builds the glyph program and atlas
    pub fn new(
        canvas: &HtmlCanvasElement,
        pool: &GlyphPool,
        tint: Color,
        background: Color,
    ) -> Result<Self, RenderError> {
        let context = canvas
            .get_context("webgl")?
            .ok_or(RenderError::WebGlUnavailable)?
            .dyn_into::<WebGlRenderingContext>()
            .map_err(|_| RenderError::WebGlUnavailable)?;
        let document = canvas.owner_document().ok_or(RenderError::MissingDocument)?;

        let program = webgl_helpers::link_program(&context, VERTEX_SHADER, FRAGMENT_SHADER)?;
        let position_location = webgl_helpers::attrib_location(&context, &program, "a_Position")?;
        let tex_coord_location = webgl_helpers::attrib_location(&context, &program, "a_TexCoord")?;
        let alpha_location = webgl_helpers::attrib_location(&context, &program, "a_Alpha")?;
        let view_proj_location = webgl_helpers::uniform_location(&context, &program, "u_ViewProj")?;
        let tint_location = webgl_helpers::uniform_location(&context, &program, "u_Tint")?;
        let sampler_location = webgl_helpers::uniform_location(&context, &program, "u_Glyphs")?;

        let vertex_buffer = context
            .create_buffer()
            .ok_or(RenderError::Resource("vertex buffer"))?;
        let atlas = GlyphAtlas::new(&context, &document, pool)?;

        // additive blending, overlapping tails glow brighter
        context.enable(WebGlRenderingContext::BLEND);
        context.blend_func(WebGlRenderingContext::SRC_ALPHA, WebGlRenderingContext::ONE);
        context.disable(WebGlRenderingContext::DEPTH_TEST);

        Ok(Renderer {
            context,
            program,
            vertex_buffer,
            atlas,
            position_location,
            tex_coord_location,
            alpha_location,
            view_proj_location,
            tint_location,
            sampler_location,
            tint,
            background,
            vertex_array: Vec::new(),
        })
    }

    pub fn resize(&self, viewport: &Viewport) {
        let (width, height) = viewport.drawing_buffer();
        self.context.viewport(0, 0, width as i32, height as i32);
    }

    pub fn clear_screen(&self) {
        let [r, g, b, a] = self.background.to_gl();
        self.context.clear_color(r, g, b, a);
        self.context.clear(WebGlRenderingContext::COLOR_BUFFER_BIT);
    }

    pub fn render_particles(&mut self, particles: &[Particle], size: f64, view_proj: &TMat4<f32>) {
        fill_quad_vertices(particles, size, &self.atlas.layout, &mut self.vertex_array);

        let gl = &self.context;
        gl.use_program(Some(&self.program));
        gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&self.vertex_buffer));
        unsafe {
            // the view must not outlive this call: no allocation until buffer_data returns
            let vertex_array = js_sys::Float32Array::view(&self.vertex_array);
            gl.buffer_data_with_array_buffer_view(
                WebGlRenderingContext::ARRAY_BUFFER,
                &vertex_array,
                WebGlRenderingContext::DYNAMIC_DRAW,
            );
        }

        let float_size = std::mem::size_of::<f32>() as i32;
        let stride = FLOATS_PER_VERTEX as i32 * float_size;
        let attributes = [
            (self.position_location, 2, 0),
            (self.tex_coord_location, 2, 2 * float_size),
            (self.alpha_location, 1, 4 * float_size),
        ];
        for (location, components, offset) in attributes {
            gl.vertex_attrib_pointer_with_i32(
                location,
                components,
                WebGlRenderingContext::FLOAT,
                false,
                stride,
                offset,
            );
            gl.enable_vertex_attrib_array(location);
        }

        gl.uniform_matrix4fv_with_f32_array(
            Some(&self.view_proj_location),
            false,
            view_proj.as_slice(),
        );
        let [r, g, b, a] = self.tint.to_gl();
        gl.uniform4f(Some(&self.tint_location), r, g, b, a);

        gl.active_texture(WebGlRenderingContext::TEXTURE0);
        gl.bind_texture(WebGlRenderingContext::TEXTURE_2D, Some(&self.atlas.texture));
        gl.uniform1i(Some(&self.sampler_location), 0);

        gl.draw_arrays(
            WebGlRenderingContext::TRIANGLES,
            0,
            (particles.len() * VERTICES_PER_QUAD) as i32,
        );
    }
}

// Two triangles per particle centred on its position, glyph picked from the atlas
pub(crate) fn fill_quad_vertices(
    particles: &[Particle],
    size: f64,
    layout: &AtlasLayout,
    out: &mut Vec<f32>,
) {
    out.clear();
    out.reserve(particles.len() * VERTICES_PER_QUAD * FLOATS_PER_VERTEX);
    let half = (size / 2.0) as f32;

    for p in particles {
        let [x, y] = p.position();
        let (x, y) = (x as f32, y as f32);
        let alpha = p.opacity() as f32;
        let [u0, v0, u1, v1] = layout.uv(p.glyph());

        let (left, right, top, bottom) = (x - half, x + half, y + half, y - half);
        let corners = [
            (left, top, u0, v0),
            (left, bottom, u0, v1),
            (right, bottom, u1, v1),
            (left, top, u0, v0),
            (right, bottom, u1, v1),
            (right, top, u1, v0),
        ];
        for (cx, cy, u, v) in corners.iter() {
            out.extend_from_slice(&[*cx, *cy, *u, *v, alpha]);
        }
    }
}
