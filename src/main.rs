//! Tetrout entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use tetrout::Settings;
    use tetrout::audio::AudioManager;
    use tetrout::consts::*;
    use tetrout::platform::{LocalStore, action_for_key, is_mute_toggle};
    use tetrout::renderer::{LayerStack, RenderState};
    use tetrout::score::{HighScore, score_line};
    use tetrout::sim::{GameEvent, GameState, Scheduler, apply_action};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        scheduler: Scheduler,
        layers: LayerStack,
        render_state: Option<RenderState>,
        audio: AudioManager,
        settings: Settings,
        high: HighScore,
        store: LocalStore,
        last_time: f64,
        /// Set by key handlers between frames
        blocks_dirty: bool,
    }

    impl Game {
        fn new() -> Self {
            let store = LocalStore::new();
            let settings = Settings::load(&store);
            let high = HighScore::load(&store);
            let state = GameState::new();
            let mut layers = LayerStack::new();
            layers.paint_all(&state);

            Self {
                state,
                scheduler: Scheduler::new(),
                layers,
                render_state: None,
                audio: AudioManager::new(&settings),
                settings,
                high,
                store,
                last_time: 0.0,
                blocks_dirty: false,
            }
        }

        /// Advance timers and dispatch side effects. Returns true if the
        /// run ended during this frame.
        fn update(&mut self, dt_ms: f64) -> bool {
            let report = self.scheduler.advance(&mut self.state, dt_ms);

            let mut over = false;
            for event in self.state.drain_events() {
                self.audio.play_event(event);
                match event {
                    GameEvent::GameOver => over = true,
                    GameEvent::BallSpawned => log::info!("Ball joined"),
                    _ => log::trace!("{:?}", event),
                }
            }

            if report.blocks_dirty || self.blocks_dirty {
                self.layers.paint_blocks(&self.state);
                self.blocks_dirty = false;
            }
            if report.balls_dirty {
                self.layers.paint_balls(&self.state);
            }

            if let Err(e) = self.high.observe(self.state.score(), &mut self.store) {
                log::warn!("Could not persist high score: {}", e);
            }

            over
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(ref mut render_state) = self.render_state else {
                return;
            };
            let vertices = self.layers.compose();
            match render_state.render(vertices) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => render_state.reconfigure(),
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Update the score line in the DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&score_line(&self.high, self.state.score())));
            }
        }

        /// Flip mute, persist it and retune the audio
        fn toggle_mute(&mut self) {
            let muted = self.settings.toggle_muted();
            if let Err(e) = self.settings.save(&mut self.store) {
                log::warn!("Could not persist settings: {}", e);
            }
            self.audio.apply_settings(&self.settings);
            log::info!("Audio {}", if muted { "muted" } else { "unmuted" });
        }

        /// Fresh run; the high score stays
        fn restart(&mut self) {
            self.state = GameState::new();
            self.scheduler = Scheduler::new();
            self.layers = LayerStack::new();
            self.layers.paint_all(&self.state);
            self.blocks_dirty = false;
            log::info!("New run started");
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Tetrout starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("well")
            .ok_or("no #well canvas")?
            .dyn_into()?;

        // Backing store follows the device pixel ratio, CSS size stays 20px cells
        let dpr = window.device_pixel_ratio();
        let width = (WELL_WIDTH as f64 * dpr) as u32;
        let height = (WELL_HEIGHT as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let game = Rc::new(RefCell::new(Game::new()));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("Failed to create surface: {}", e)))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get adapter: {}", e)))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to create device: {}", e)))?;
        game.borrow_mut().render_state = Some(render_state);
        game.borrow().update_hud();

        setup_input_handlers(&window, game.clone());

        request_animation_frame(game);

        log::info!("Tetrout running!");
        Ok(())
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let key = event.key();
            if is_mute_toggle(&key) {
                game.borrow_mut().toggle_mute();
                return;
            }
            let Some(action) = action_for_key(&key) else {
                return;
            };
            event.prevent_default();

            let mut g = game.borrow_mut();
            // First gesture unlocks audio
            g.audio.resume();
            if apply_action(&mut g.state, action) {
                g.blocks_dirty = true;
            }
        });
        let _ =
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let over = {
            let mut g = game.borrow_mut();

            let dt_ms = if g.last_time > 0.0 {
                time - g.last_time
            } else {
                0.0
            };
            g.last_time = time;

            let over = g.update(dt_ms);
            g.render();
            g.update_hud();
            over
        };

        if over {
            // alert blocks; the next frame's gap is discarded
            if let Some(window) = web_sys::window() {
                let _ = window.alert_with_message("Game Over");
            }
            let mut g = game.borrow_mut();
            g.restart();
            g.last_time = 0.0;
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Tetrout failed to start: {:?}", e);
    }
}

/// Headless session: scripted input, simulated frames, events to the log
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use tetrout::HighScore;
    use tetrout::platform::MemoryStore;
    use tetrout::renderer::LayerStack;
    use tetrout::score::score_line;
    use tetrout::sim::{GameEvent, GameState, PlayerAction, Scheduler, apply_action};

    const FRAME_MS: f64 = 16.0;

    env_logger::init();

    let seconds: u64 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(60);
    log::info!("Tetrout (native) headless demo, {}s of play", seconds);
    log::info!("Run with `trunk serve` for the playable web version");

    let mut store = MemoryStore::new();
    let mut high = HighScore::load(&store);
    let mut state = GameState::new();
    let mut scheduler = Scheduler::new();
    let mut layers = LayerStack::new();

    // Nudge pieces around so they do not all stack in one column
    let script = [
        PlayerAction::MoveLeft,
        PlayerAction::RotateClockwise,
        PlayerAction::MoveRight,
        PlayerAction::MoveRight,
        PlayerAction::RotateCounterClockwise,
        PlayerAction::MoveLeft,
    ];

    let frames = (seconds as f64 * 1000.0 / FRAME_MS) as u64;
    let mut runs = 1;
    for frame in 0..frames {
        if frame % 20 == 0 {
            let action = script[(frame / 20) as usize % script.len()];
            apply_action(&mut state, action);
        }

        let report = scheduler.advance(&mut state, FRAME_MS);
        if report.blocks_dirty {
            layers.paint_blocks(&state);
        }
        if report.balls_dirty {
            layers.paint_balls(&state);
        }

        let mut over = false;
        for event in state.drain_events() {
            match event {
                GameEvent::GameOver => over = true,
                GameEvent::PieceLanded => {
                    log::debug!("Piece landed, {} settled cells", state.settled.len())
                }
                GameEvent::BallSpawned => {
                    log::info!("Ball joined at {:.1}s", scheduler.now_ms() / 1000.0)
                }
                GameEvent::ThemeCue => log::debug!("Theme cue"),
                GameEvent::WallBounce | GameEvent::BlockBreak => log::trace!("{:?}", event),
            }
        }

        if let Err(e) = high.observe(state.score(), &mut store) {
            log::warn!("Could not persist high score: {}", e);
        }

        if over {
            log::info!("Game Over: {}", score_line(&high, state.score()));
            state = GameState::new();
            scheduler = Scheduler::new();
            layers = LayerStack::new();
            runs += 1;
        }
    }

    let vertices = layers.compose().len();
    log::info!(
        "Demo finished after {} run(s), {} vertices in last frame",
        runs,
        vertices
    );
    println!("{}", score_line(&high, state.score()));
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
