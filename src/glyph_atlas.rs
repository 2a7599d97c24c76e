// Glyph atlas: every glyph of the pool rasterised once into a square-ish grid
// on an offscreen 2D canvas, then uploaded as a single WebGL texture.
// Quads pick their glyph by texture coordinates.

use std::collections::HashMap;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    CanvasRenderingContext2d, Document, HtmlCanvasElement, WebGlRenderingContext, WebGlTexture,
};

use crate::field::GlyphPool;
use crate::renderer::RenderError;

const CELL_PX: u32 = 64;
const FONT: &str = "bold 48px monospace";

#[derive(Debug, Clone, PartialEq)]
pub struct AtlasLayout {
    columns: usize,
    rows: usize,
    slots: HashMap<char, usize>,
}

impl AtlasLayout {
    pub fn new(pool: &GlyphPool) -> AtlasLayout {
        let count = pool.len().max(1);
        let columns = (count as f64).sqrt().ceil() as usize;
        let rows = (count + columns - 1) / columns;
        let slots = pool
            .glyphs()
            .iter()
            .enumerate()
            .map(|(slot, glyph)| (*glyph, slot))
            .collect();
        AtlasLayout {
            columns,
            rows,
            slots,
        }
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        (self.columns as u32 * CELL_PX, self.rows as u32 * CELL_PX)
    }

    /// Texture rectangle `[u0, v0, u1, v1]` of a glyph, v growing downwards.
    /// Glyphs outside the pool map to the first slot.
    pub fn uv(&self, glyph: char) -> [f32; 4] {
        let slot = self.slots.get(&glyph).copied().unwrap_or(0);
        let column = slot % self.columns;
        let row = slot / self.columns;
        let du = 1.0 / self.columns as f32;
        let dv = 1.0 / self.rows as f32;
        [
            column as f32 * du,
            row as f32 * dv,
            (column + 1) as f32 * du,
            (row + 1) as f32 * dv,
        ]
    }

    fn cell_center(&self, slot: usize) -> (f64, f64) {
        let column = (slot % self.columns) as f64;
        let row = (slot / self.columns) as f64;
        let half = CELL_PX as f64 / 2.0;
        (column * CELL_PX as f64 + half, row * CELL_PX as f64 + half)
    }
}

pub struct GlyphAtlas {
    pub layout: AtlasLayout,
    pub texture: WebGlTexture,
}

impl GlyphAtlas {
    pub fn new(
        context: &WebGlRenderingContext,
        document: &Document,
        pool: &GlyphPool,
    ) -> Result<GlyphAtlas, RenderError> {
        let layout = AtlasLayout::new(pool);
        let canvas = Self::rasterize(document, pool, &layout)?;

        let texture = context
            .create_texture()
            .ok_or(RenderError::Resource("glyph texture"))?;
        context.bind_texture(WebGlRenderingContext::TEXTURE_2D, Some(&texture));
        // the atlas is rarely a power of two: no mipmaps, clamp at the edges
        for (parameter, value) in [
            (WebGlRenderingContext::TEXTURE_MIN_FILTER, WebGlRenderingContext::LINEAR),
            (WebGlRenderingContext::TEXTURE_MAG_FILTER, WebGlRenderingContext::LINEAR),
            (WebGlRenderingContext::TEXTURE_WRAP_S, WebGlRenderingContext::CLAMP_TO_EDGE),
            (WebGlRenderingContext::TEXTURE_WRAP_T, WebGlRenderingContext::CLAMP_TO_EDGE),
        ] {
            context.tex_parameteri(WebGlRenderingContext::TEXTURE_2D, parameter, value as i32);
        }
        context.tex_image_2d_with_u32_and_u32_and_canvas(
            WebGlRenderingContext::TEXTURE_2D,
            0,
            WebGlRenderingContext::RGBA as i32,
            WebGlRenderingContext::RGBA,
            WebGlRenderingContext::UNSIGNED_BYTE,
            &canvas,
        )?;

        log::debug!("glyph atlas {:?} px for {} glyphs", layout.pixel_size(), pool.len());
        Ok(GlyphAtlas { layout, texture })
    }

    fn rasterize(
        document: &Document,
        pool: &GlyphPool,
        layout: &AtlasLayout,
    ) -> Result<HtmlCanvasElement, RenderError> {
        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| RenderError::Resource("atlas canvas"))?;
        let (width, height) = layout.pixel_size();
        canvas.set_width(width);
        canvas.set_height(height);

        let ctx = canvas
            .get_context("2d")?
            .ok_or(RenderError::Resource("2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| RenderError::Resource("2d context"))?;
        ctx.set_font(FONT);
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        // white glyphs, the tint is applied in the fragment shader
        #[allow(deprecated)]
        ctx.set_fill_style(&JsValue::from_str("#ffffff"));

        let mut glyph_buf = [0u8; 4];
        for (slot, glyph) in pool.glyphs().iter().enumerate() {
            let (x, y) = layout.cell_center(slot);
            ctx.fill_text(glyph.encode_utf8(&mut glyph_buf), x, y)?;
        }
        Ok(canvas)
    }
}
