// The animated background: owned rain state plus its browser wiring.
//
// `RainState` is everything that changes while the page is open (particles,
// camera, viewport, rng). `start` attaches it to the page canvas, installs
// the resize handler and drives one `RainState::tick` per animation frame.

use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, Window};

use crate::camera::Camera;
use crate::config::{Config, ConfigError, FieldConfig};
use crate::field::ParticleField;
use crate::renderer::{RenderError, Renderer};
use crate::utils::{describe, Timer};
use crate::viewport::Viewport;

pub struct RainState {
    pub field: ParticleField,
    pub camera: Camera,
    pub viewport: Viewport,
    rng: StdRng,
}

impl RainState {
    pub fn new(
        config: &FieldConfig,
        viewport: Viewport,
        mut rng: StdRng,
    ) -> Result<RainState, ConfigError> {
        let field = ParticleField::new(config, &mut rng)?;
        Ok(RainState {
            field,
            camera: Camera::new(viewport.aspect()),
            viewport,
            rng,
        })
    }

    /// One animation frame of particle motion.
    pub fn tick(&mut self) {
        self.field.update(self.viewport.height, &mut self.rng);
    }

    /// Camera and surface follow the new viewport; particles are left alone.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.set_aspect(viewport.aspect());
    }
}

struct RainStage {
    state: RainState,
    renderer: Renderer,
    canvas: HtmlCanvasElement,
    profile_frames: bool,
    frames_drawn: u64,
    running: bool,
}

impl RainStage {
    fn apply_viewport(&mut self, viewport: Viewport) {
        self.state.resize(viewport);

        let (width, height) = viewport.drawing_buffer();
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        let style = self.canvas.style();
        let sized = style
            .set_property("width", &format!("{}px", viewport.width))
            .and_then(|_| style.set_property("height", &format!("{}px", viewport.height)));
        if let Err(err) = sized {
            log::warn!("could not size canvas: {}", describe(&err));
        }
        self.renderer.resize(&viewport);
    }

    fn frame(&mut self) {
        let _timer = self.profile_frames.then(|| Timer::new("rain frame"));
        self.frames_drawn += 1;
        self.state.tick();
        self.renderer.clear_screen();
        self.renderer.render_particles(
            self.state.field.particles(),
            self.state.field.size(),
            self.state.camera.view_projection(),
        );
    }
}

/// Read-only view of a running background.
pub struct RainHandle {
    stage: Rc<RefCell<RainStage>>,
}

impl RainHandle {
    pub fn frames_drawn(&self) -> u64 {
        self.stage.borrow().frames_drawn
    }

    /// False once the loop noticed its canvas was detached.
    pub fn is_running(&self) -> bool {
        self.stage.borrow().running
    }
}

pub fn viewport_of(window: &Window) -> Viewport {
    let dimension = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    };
    Viewport::new(
        dimension(window.inner_width()),
        dimension(window.inner_height()),
        window.device_pixel_ratio(),
    )
}

/// Starts the background on the configured canvas. Fails only during setup;
/// once running the loop stops re-arming when the canvas leaves the document.
pub fn start(window: &Window, config: &Config) -> Result<RainHandle, RenderError> {
    let document = window.document().ok_or(RenderError::MissingDocument)?;
    let canvas = document
        .get_element_by_id(&config.canvas_id)
        .ok_or_else(|| RenderError::MissingCanvas(config.canvas_id.clone()))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| RenderError::NotACanvas(config.canvas_id.clone()))?;

    let viewport = viewport_of(window);
    let state = RainState::new(&config.rain, viewport, StdRng::from_entropy())?;
    let renderer = Renderer::new(
        &canvas,
        state.field.glyph_pool(),
        config.tint,
        config.background,
    )?;
    log::info!(
        "digital rain: {} particles on a {}x{} canvas",
        state.field.len(),
        viewport.drawing_buffer().0,
        viewport.drawing_buffer().1
    );

    let stage = Rc::new(RefCell::new(RainStage {
        state,
        renderer,
        canvas,
        profile_frames: config.profile_frames,
        frames_drawn: 0,
        running: true,
    }));
    stage.borrow_mut().apply_viewport(viewport);

    let handle = RainHandle {
        stage: stage.clone(),
    };

    let resize_closure = {
        let stage = stage.clone();
        let window = window.clone();
        Closure::wrap(Box::new(move || {
            let viewport = viewport_of(&window);
            log::debug!("resize to {}x{}", viewport.width, viewport.height);
            stage.borrow_mut().apply_viewport(viewport);
        }) as Box<dyn FnMut()>)
    };
    window.add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())?;
    resize_closure.forget();

    // `f` holds the frame closure so it can re-request itself every frame
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    let frame_window = window.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        {
            let mut stage = stage.borrow_mut();
            if !stage.canvas.is_connected() {
                log::info!("canvas left the document, stopping rain");
                stage.running = false;
                return;
            }
            stage.frame();
        }

        if let Some(callback) = f.borrow().as_ref() {
            let requested = frame_window.request_animation_frame(callback.as_ref().unchecked_ref());
            if let Err(err) = requested {
                log::error!("requestAnimationFrame failed: {}", describe(&err));
            }
        }
    }) as Box<dyn FnMut()>));

    if let Some(callback) = g.borrow().as_ref() {
        window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    }
    Ok(handle)
}
