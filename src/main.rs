//! El Duel entry point
//!
//! Browser: requestAnimationFrame drives the scheduler, a 2D canvas draws the
//! frames. Native: a timer drives it headless for a few seconds.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use el_duel::demo::{self, DuelScenario};
    use el_duel::input::MouseButton;
    use el_duel::renderer::vertex::colors;
    use el_duel::renderer::{RenderFrame, Renderer};
    use el_duel::scheduler::{Clock, FixedStepScheduler, FrameLatch, FrameRequester};
    use el_duel::{Game, Settings};

    /// `performance.now()`
    struct PerformanceClock {
        performance: web_sys::Performance,
    }

    impl Clock for PerformanceClock {
        fn now_ms(&self) -> f64 {
            self.performance.now()
        }
    }

    type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

    /// Schedules the shared frame callback with requestAnimationFrame, at most once at a time
    struct RafFrames {
        callback: FrameCallback,
        latch: FrameLatch,
    }

    impl FrameRequester for RafFrames {
        fn request_frame(&mut self) {
            if !self.latch.arm() {
                return;
            }
            let scheduled = web_sys::window().is_some_and(|window| {
                self.callback.borrow().as_ref().is_some_and(|callback| {
                    window
                        .request_animation_frame(callback.as_ref().unchecked_ref())
                        .is_ok()
                })
            });
            if !scheduled {
                self.latch.release();
            }
        }
    }

    /// Fills every mesh triangle on a 2D canvas, in view space
    struct CanvasRenderer {
        ctx: CanvasRenderingContext2d,
        width: f64,
        height: f64,
    }

    impl Renderer for CanvasRenderer {
        fn render(&mut self, frame: &RenderFrame<'_>) {
            self.ctx.set_fill_style_str(&css_color(colors::BACKGROUND));
            self.ctx.fill_rect(0.0, 0.0, self.width, self.height);

            for mesh in &frame.meshes {
                let model = frame.view * mesh.interpolated_model;
                self.ctx.set_fill_style_str(&css_color(mesh.color));
                self.ctx.begin_path();
                for triangle in mesh.triangles {
                    let [a, b, c] =
                        triangle.map(|i| model.transform_point(mesh.local_vertices[i as usize]));
                    self.ctx.move_to(a.x as f64, a.y as f64);
                    self.ctx.line_to(b.x as f64, b.y as f64);
                    self.ctx.line_to(c.x as f64, c.y as f64);
                    self.ctx.close_path();
                }
                self.ctx.fill();
            }
        }
    }

    fn css_color([r, g, b, a]: [f32; 4]) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            (r * 255.0) as u8,
            (g * 255.0) as u8,
            (b * 255.0) as u8,
            a
        )
    }

    struct App {
        scheduler: FixedStepScheduler<PerformanceClock, RafFrames>,
        game: Game<CanvasRenderer>,
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;

        log::info!("El Duel starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let performance = window.performance().ok_or("no performance clock")?;

        let settings = Settings::load();

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        canvas.set_width(settings.viewport_width as u32);
        canvas.set_height(settings.viewport_height as u32);
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let mut game = Game::new(CanvasRenderer {
            ctx,
            width: settings.viewport_width as f64,
            height: settings.viewport_height as f64,
        });
        game.add_scenario(demo::NAME, Box::new(DuelScenario::new(&settings)));

        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let latch = FrameLatch::new();
        let scheduler = FixedStepScheduler::from_settings(
            PerformanceClock { performance },
            RafFrames {
                callback: callback.clone(),
                latch: latch.clone(),
            },
            &settings,
        )
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
        let app = Rc::new(RefCell::new(App { scheduler, game }));

        {
            let app = app.clone();
            *callback.borrow_mut() = Some(Closure::new(move |_time: f64| {
                latch.release();
                let mut app = app.borrow_mut();
                let App { scheduler, game } = &mut *app;
                // A stopped scheduler leaves the frame chain to die out
                if let Err(err) = scheduler.tick(game) {
                    log::debug!("frame skipped: {err}");
                }
            }));
        }

        setup_input_handlers(&canvas, app.clone())?;

        app.borrow_mut()
            .scheduler
            .start()
            .map_err(|err| JsValue::from_str(&err.to_string()))?;

        log::info!("El Duel running!");
        Ok(())
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        app: Rc<RefCell<App>>,
    ) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Keyboard
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                app.borrow_mut().game.input_mut().key_down(event.key_code());
            });
            window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                app.borrow_mut().game.input_mut().key_up(event.key_code());
            });
            window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Release held keys when the page loses focus
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().game.input_mut().clear();
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let position = glam::Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                app.borrow_mut().game.input_mut().mouse_moved(position);
            });
            canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if let Some(button) = MouseButton::from_dom(event.button()) {
                    app.borrow_mut().game.input_mut().mouse_down(button);
                }
            });
            canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if let Some(button) = MouseButton::from_dom(event.button()) {
                    app.borrow_mut().game.input_mut().mouse_up(button);
                }
            });
            window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(err) = native::run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::time::{Duration, Instant};

    use el_duel::demo::{self, DuelScenario};
    use el_duel::renderer::LogRenderer;
    use el_duel::scheduler::{FixedRateFrames, FixedStepScheduler, SystemClock};
    use el_duel::{Game, Settings, SettingsError};

    type BoxError = Box<dyn std::error::Error>;

    const DEFAULT_SECONDS: f64 = 3.0;

    /// `el-duel [settings.json] [seconds]`
    pub fn run() -> Result<(), BoxError> {
        let mut args = std::env::args().skip(1);
        let settings = match args.next() {
            Some(path) => Settings::load_from_path(path)?,
            None => Settings::default(),
        };
        let seconds = match args.next() {
            Some(arg) => arg
                .parse::<f64>()
                .ok()
                .filter(|s| s.is_finite() && *s >= 0.0)
                .ok_or_else(|| SettingsError::Invalid(format!("bad duration `{arg}`")))?,
            None => DEFAULT_SECONDS,
        };

        log::info!("El Duel (native, headless) running for {seconds} s");

        let mut game = Game::new(LogRenderer::new());
        game.add_scenario(demo::NAME, Box::new(DuelScenario::new(&settings)));

        let mut scheduler = FixedStepScheduler::from_settings(
            SystemClock::new(),
            FixedRateFrames::new(settings.step_rate_hz),
            &settings,
        )?;
        // Fresh scheduler, cannot already be running
        let _ = scheduler.start();

        let deadline = Instant::now() + Duration::from_secs_f64(seconds);
        while Instant::now() < deadline && scheduler.frames_mut().wait() {
            if let Err(err) = scheduler.tick(&mut game) {
                log::warn!("tick failed: {err}");
                break;
            }
        }
        let _ = scheduler.stop();

        log::info!(
            "done: {} steps, {} frames, {} triangles in last frame",
            game.steps(),
            game.frames(),
            game.renderer().last_batch().indices().len() / 3
        );
        Ok(())
    }
}
