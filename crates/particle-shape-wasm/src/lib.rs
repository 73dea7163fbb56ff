use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use particle_shape_core::attributes::ATTRIBUTES;
use particle_shape_core::color::Rgba;
use particle_shape_core::{ParticleShape, PixelBuffer, Surface};
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

fn log_error(context: &str, err: &JsValue) {
    web_sys::console::error_2(&context.into(), err);
}

/// 2D canvas context as a render target.
struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    /// Offscreen canvas holding the low-resolution frame when pixelating.
    scratch: Option<HtmlCanvasElement>,
}

impl CanvasSurface {
    fn scratch_canvas(&mut self, width: u32, height: u32) -> Result<HtmlCanvasElement, JsValue> {
        let canvas = match &self.scratch {
            Some(c) => c.clone(),
            None => {
                let document = web_sys::window()
                    .and_then(|w| w.document())
                    .ok_or("document unavailable")?;
                let c: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
                self.scratch = Some(c.clone());
                c
            }
        };
        if canvas.width() != width || canvas.height() != height {
            canvas.set_width(width);
            canvas.set_height(height);
        }
        Ok(canvas)
    }

    fn try_blit(&mut self, src: &PixelBuffer, dest_width: f32, dest_height: f32) -> Result<(), JsValue> {
        let image = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(src.as_bytes()),
            src.width(),
            src.height(),
        )?;
        let canvas = self.scratch_canvas(src.width(), src.height())?;
        let scratch_ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("2d context unavailable")?
            .dyn_into()?;
        scratch_ctx.put_image_data(&image, 0.0, 0.0)?;

        self.ctx.set_image_smoothing_enabled(false);
        let drawn = self.ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
            &canvas,
            0.0,
            0.0,
            dest_width as f64,
            dest_height as f64,
        );
        self.ctx.set_image_smoothing_enabled(true);
        drawn
    }
}

impl Surface for CanvasSurface {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width as f64);
        self.ctx.set_line_cap("round");
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }

    fn blit_nearest(&mut self, src: &PixelBuffer, dest_width: f32, dest_height: f32) {
        if let Err(err) = self.try_blit(src, dest_width, dest_height) {
            log_error("particle-shape: pixelated blit failed", &err);
        }
    }
}

struct Inner {
    shape: ParticleShape,
    surface: CanvasSurface,
    canvas: HtmlCanvasElement,
    /// Pending `requestAnimationFrame` id.
    frame: Option<i32>,
}

type TickClosure = Closure<dyn FnMut(f64)>;

/// `<particle-shape>` backing object. The custom element class forwards its
/// lifecycle callbacks, attribute changes and pointer events here.
#[wasm_bindgen]
pub struct ParticleShapeElement {
    inner: Rc<RefCell<Inner>>,
    tick: Rc<RefCell<Option<TickClosure>>>,
}

#[wasm_bindgen]
impl ParticleShapeElement {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<ParticleShapeElement, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("2d context unavailable")?
            .dyn_into()?;
        web_sys::console::log_1(&"WASM particle-shape element created".into());

        Ok(ParticleShapeElement {
            inner: Rc::new(RefCell::new(Inner {
                shape: ParticleShape::new(),
                surface: CanvasSurface { ctx, scratch: None },
                canvas,
                frame: None,
            })),
            tick: Rc::new(RefCell::new(None)),
        })
    }

    /// Attribute names the custom element should observe.
    #[wasm_bindgen]
    pub fn observed_attributes() -> js_sys::Array {
        ATTRIBUTES
            .iter()
            .map(|spec| JsValue::from_str(spec.name))
            .collect()
    }

    #[wasm_bindgen]
    pub fn attribute_changed(&self, name: &str, value: Option<String>) {
        self.inner.borrow_mut().shape.set_attribute(name, value.as_deref());
    }

    /// `connectedCallback`: size the canvas, build particles, start the loop.
    #[wasm_bindgen]
    pub fn attach(&self, width: f32, height: f32, device_pixel_ratio: f64) -> Result<(), JsValue> {
        self.resize(width, height, device_pixel_ratio)?;
        self.inner.borrow_mut().shape.attach(width, height);
        self.start()
    }

    /// `disconnectedCallback`: stop the loop. Safe to call repeatedly.
    #[wasm_bindgen]
    pub fn detach(&self) {
        self.stop();
        self.inner.borrow_mut().shape.detach();
    }

    #[wasm_bindgen]
    pub fn resize(&self, width: f32, height: f32, device_pixel_ratio: f64) -> Result<(), JsValue> {
        let mut inner = self.inner.borrow_mut();
        let dpr = if device_pixel_ratio > 0.0 { device_pixel_ratio } else { 1.0 };
        inner.canvas.set_width((width as f64 * dpr) as u32);
        inner.canvas.set_height((height as f64 * dpr) as u32);
        inner.surface.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
        inner.shape.resize(width, height);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn pointer_down(&self, x: f32, y: f32) {
        self.inner.borrow_mut().shape.pointer_down(x, y);
    }

    #[wasm_bindgen]
    pub fn pointer_move(&self, x: f32, y: f32) {
        self.inner.borrow_mut().shape.pointer_move(x, y);
    }

    #[wasm_bindgen]
    pub fn pointer_up(&self) {
        self.inner.borrow_mut().shape.pointer_up();
    }

    #[wasm_bindgen]
    pub fn particle_count(&self) -> usize {
        self.inner.borrow().shape.particles().count()
    }
}

impl ParticleShapeElement {
    fn start(&self) -> Result<(), JsValue> {
        self.stop();

        let inner = Rc::clone(&self.inner);
        let tick = Rc::clone(&self.tick);
        let closure = Closure::<dyn FnMut(f64)>::new(move |timestamp_ms: f64| {
            let mut state = inner.borrow_mut();
            state.frame = None;
            let Inner { shape, surface, .. } = &mut *state;
            shape.frame(surface, (timestamp_ms * 0.001) as f32);

            let Some(window) = web_sys::window() else {
                return;
            };
            if let Some(callback) = tick.borrow().as_ref() {
                match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                    Ok(id) => state.frame = Some(id),
                    Err(err) => log_error("particle-shape: requestAnimationFrame failed", &err),
                }
            }
        });

        let window = web_sys::window().ok_or("window unavailable")?;
        let id = window.request_animation_frame(closure.as_ref().unchecked_ref())?;
        self.inner.borrow_mut().frame = Some(id);
        *self.tick.borrow_mut() = Some(closure);
        Ok(())
    }

    fn stop(&self) {
        if let Some(id) = self.inner.borrow_mut().frame.take() {
            if let Some(window) = web_sys::window() {
                if let Err(err) = window.cancel_animation_frame(id) {
                    log_error("particle-shape: cancelAnimationFrame failed", &err);
                }
            }
        }
        // Dropping the closure breaks the Rc cycle with `inner`.
        self.tick.borrow_mut().take();
    }
}
