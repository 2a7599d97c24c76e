mod glyph_atlas;
mod renderer;
mod utils;
mod webgl_helpers;

pub mod camera;
pub mod color;
pub mod config;
pub mod feeds;
pub mod field;
pub mod particle;
pub mod rain;
pub mod typewriter;
pub mod viewport;

use wasm_bindgen::prelude::*;

pub use renderer::RenderError;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Page entry point. The rain failing to start (no canvas, no WebGL) is
/// logged and the rest of the page still loads.
#[wasm_bindgen]
pub fn initialize() -> Result<(), JsValue> {
    utils::set_panic_hook();
    utils::init_logging();

    let window = web_sys::window().ok_or_else(|| js_err(RenderError::MissingWindow))?;
    let document = window
        .document()
        .ok_or_else(|| js_err(RenderError::MissingDocument))?;

    let config = utils::load_config(&document);
    log::set_max_level(config.log_level().to_level_filter());
    log::debug!("starting with {:?}", config);

    if let Err(err) = rain::start(&window, &config) {
        log::error!("digital rain disabled: {}", err);
    }
    feeds::spawn_all(&window, &document, &config);
    typewriter::start(&window, &document);
    Ok(())
}

fn js_err(err: RenderError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
