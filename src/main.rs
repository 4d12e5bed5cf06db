//! Word Hop entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, KeyboardEvent, PointerEvent};

    use word_hop::audio::AudioManager;
    use word_hop::consts::*;
    use word_hop::platform::{InputState, Key, StartupError};
    use word_hop::renderer::{RenderState, SceneOptions, Viewport, build_scene};
    use word_hop::sim::{GameEvent, GameState, tick};
    use word_hop::speech::Speaker;
    use word_hop::ui;
    use word_hop::{Settings, WordList};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        audio: AudioManager,
        speaker: Speaker,
        input: InputState,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        /// Letterbox in CSS pixels (pointer mapping and label placement)
        css_viewport: Viewport,
        /// DOM text overlays by block id
        labels: HashMap<u32, HtmlElement>,
        document: Document,
    }

    impl Game {
        fn new(seed: u64, words: WordList, settings: Settings, document: Document) -> Self {
            Self {
                state: GameState::with_words(seed, words),
                audio: AudioManager::new(
                    settings.effective_sfx_volume(),
                    settings.effective_music_volume(),
                    settings.music_enabled,
                ),
                speaker: Speaker::new(settings.speech_enabled, settings.speech_rate),
                settings,
                input: InputState::default(),
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                css_viewport: Viewport::fit(SCREEN_WIDTH, SCREEN_HEIGHT),
                labels: HashMap::new(),
                document,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.to_tick_input();
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.consume_one_shots();
            }
            if substeps == MAX_SUBSTEPS {
                self.accumulator = 0.0;
            }

            self.dispatch_events();
            self.audio.update_music();
        }

        /// Route simulation events to speech, audio and the HUD
        fn dispatch_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::Speak(text) => self.speaker.speak(&text),
                    GameEvent::Sound(cue) => self.audio.play(cue),
                    GameEvent::ScoreChanged(score) => {
                        self.set_text("hud-score", &ui::hud_score_text(score));
                    }
                    GameEvent::LevelStarted { index } => {
                        self.set_text("hud-level", &ui::hud_level_text(index));
                    }
                    GameEvent::BlockRemoved { block_id } => {
                        if let Some(el) = self.labels.remove(&block_id) {
                            el.remove();
                        }
                    }
                    GameEvent::SessionRestarted => {
                        for (_, el) in self.labels.drain() {
                            el.remove();
                        }
                        self.set_text("hud-score", &ui::hud_score_text(0));
                    }
                    other => log::debug!("{:?}", other),
                }
            }
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn update_hud(&self) {
            self.set_text("hud-level", &ui::hud_level_text(self.state.current_level));
            self.set_text("hud-score", &ui::hud_score_text(self.state.score));
            self.set_text("musicButton", ui::music_button_text(self.settings.music_enabled));
        }

        /// Position the word labels over their blocks
        fn sync_labels(&mut self) {
            let Some(container) = self.document.get_element_by_id("labels") else {
                return;
            };
            let scale = self.css_viewport.scale;

            for layout in ui::label_layouts(&self.state) {
                if !self.labels.contains_key(&layout.block_id) {
                    let Some(el) = self
                        .document
                        .create_element("div")
                        .ok()
                        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
                    else {
                        continue;
                    };
                    el.set_class_name("word-label");
                    el.set_text_content(Some(&layout.text));
                    let _ = container.append_child(&el);
                    self.labels.insert(layout.block_id, el);
                }
                let Some(el) = self.labels.get(&layout.block_id) else {
                    continue;
                };

                let pos = self.css_viewport.to_canvas(Vec2::new(layout.x, layout.y));
                let style = el.style();
                let display = if layout.visible { "block" } else { "none" };
                let _ = style.set_property("display", display);
                let _ = style.set_property("left", &format!("{}px", pos.x));
                let _ = style.set_property("top", &format!("{}px", pos.y));
                let _ = style.set_property("opacity", &layout.opacity.to_string());
                let _ = style.set_property("font-size", &format!("{}px", 24.0 * scale));
            }

            // Blocks removed without an event (e.g. a replaced session)
            let live: Vec<u32> = self.state.blocks.iter().map(|b| b.id).collect();
            self.labels.retain(|id, el| {
                let keep = live.contains(id);
                if !keep {
                    el.remove();
                }
                keep
            });
        }

        fn render(&mut self) {
            let options = SceneOptions {
                touch_controls: self.settings.touch_controls,
                particles: self.settings.particles,
            };
            let vertices = build_scene(&self.state, &self.input, options);

            if let Some(rs) = &mut self.render_state {
                match rs.render(&vertices) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let (w, h) = (rs.config.width, rs.config.height);
                        rs.resize(w, h);
                    }
                    Err(e) => log::error!("Render error: {:?}", e),
                }
            }
        }

        /// Map a pointer event to game screen coordinates
        fn pointer_to_game(&self, canvas: &HtmlCanvasElement, event: &PointerEvent) -> Vec2 {
            let rect = canvas.get_bounding_client_rect();
            let css = Vec2::new(
                (event.client_x() as f64 - rect.left()) as f32,
                (event.client_y() as f64 - rect.top()) as f32,
            );
            self.css_viewport.to_game(css)
        }
    }

    /// Word table from `<script id="word-list" type="application/json">`, if present
    fn load_word_list(document: &Document) -> WordList {
        let Some(json) = document
            .get_element_by_id("word-list")
            .and_then(|el| el.text_content())
        else {
            return WordList::builtin();
        };
        match WordList::from_json(&json) {
            Ok(words) => {
                log::info!("Loaded {} levels from page word list", words.len());
                words
            }
            Err(e) => {
                log::warn!("Page word list rejected ({}); using built-in words", e);
                WordList::builtin()
            }
        }
    }

    /// Size the canvas backing store to its CSS box times the pixel ratio
    fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (Viewport, u32, u32) {
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (Viewport::fit(client_w as f32, client_h as f32), width, height)
    }

    pub async fn run() -> Result<(), StartupError> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Word Hop starting...");

        let window = web_sys::window().ok_or(StartupError::NoWindow)?;
        let document = window.document().ok_or(StartupError::NoWindow)?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into().ok())
            .ok_or(StartupError::MissingElement("canvas"))?;

        let (css_viewport, width, height) = fit_canvas(&window, &canvas);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let words = load_word_list(&document);
        let settings = Settings::load();
        let game = Rc::new(RefCell::new(Game::new(seed, words, settings, document.clone())));
        game.borrow_mut().css_viewport = css_viewport;

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| StartupError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| StartupError::NoAdapter)?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await?;
        game.borrow_mut().render_state = Some(render_state);

        setup_keyboard(&document, game.clone());
        setup_pointer(&canvas, game.clone());
        setup_resize(&window, &canvas, game.clone());
        setup_blur(&window, game.clone());
        setup_music_button(&document, game.clone());
        setup_restart_button(&document);

        game.borrow().update_hud();

        // Show HUD
        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        // Start game loop
        request_animation_frame(game);

        log::info!("Word Hop running!");
        Ok(())
    }

    fn setup_keyboard(document: &Document, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = Key::from_code(&event.code()) else {
                    return;
                };
                // Keep arrows and space from scrolling the page
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.audio.unlock();
                g.input.key_down(key);
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if let Some(key) = Key::from_code(&event.code()) {
                game.borrow_mut().input.key_up(key);
            }
        });
        let _ =
            document.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_pointer(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let canvas_ref = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                g.audio.unlock();
                let point = g.pointer_to_game(&canvas_ref, &event);
                if g.input.pointer_down(event.pointer_id(), point) {
                    event.prevent_default();
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let canvas_ref = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                let point = g.pointer_to_game(&canvas_ref, &event);
                g.input.pointer_move(event.pointer_id(), point);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for name in ["pointerup", "pointercancel", "pointerleave"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                game.borrow_mut().input.pointer_up(event.pointer_id());
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(window: &web_sys::Window, canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else { return };
            let (css_viewport, width, height) = fit_canvas(&window, &canvas);
            let mut g = game.borrow_mut();
            g.css_viewport = css_viewport;
            if let Some(rs) = &mut g.render_state {
                rs.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Release everything held when the window loses focus
    fn setup_blur(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().input.release_all();
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_music_button(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(btn) = document.get_element_by_id("musicButton") else {
            log::warn!("No #musicButton on page");
            return;
        };
        let btn_ref = btn.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let mut g = game.borrow_mut();
            let g = &mut *g;
            let enabled = g.settings.toggle_music();
            g.audio.unlock();
            g.audio.apply_settings(&g.settings);
            g.speaker.apply_settings(&g.settings);
            g.settings.save();
            btn_ref.set_text_content(Some(ui::music_button_text(enabled)));
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Restart reloads the page; nothing about progress survives
    fn setup_restart_button(document: &Document) {
        let Some(btn) = document.get_element_by_id("restartButton") else {
            log::warn!("No #restartButton on page");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            if let Some(window) = web_sys::window() {
                let _ = window.location().reload();
            }
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.sync_labels();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Word Hop failed to start: {}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Word Hop (native) starting...");
    log::info!("Native mode runs a headless session - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2024);
    headless::run(seed, 90.0);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted session: run right, jump on a timer, log what happens
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use word_hop::Settings;
    use word_hop::audio::AudioManager;
    use word_hop::consts::SIM_DT;
    use word_hop::sim::{GameEvent, GameState, TickInput, tick};
    use word_hop::speech::Speaker;
    use word_hop::ui;

    pub fn run(seed: u64, seconds: f32) {
        let settings = Settings::load();
        let mut state = GameState::new(seed);
        let mut speaker = Speaker::new(settings.speech_enabled, settings.speech_rate);
        let mut audio = AudioManager::new(
            settings.effective_sfx_volume(),
            settings.effective_music_volume(),
            settings.music_enabled,
        );

        let steps = (seconds / SIM_DT) as u64;
        let jump_every = (0.9 / SIM_DT) as u64;
        let mut restarts = 0;
        let mut best_level = 0;

        for step in 0..steps {
            let input = TickInput {
                right: true,
                jump_pressed: step % jump_every == 0,
                ..Default::default()
            };
            tick(&mut state, &input, SIM_DT);

            for event in state.drain_events() {
                match event {
                    GameEvent::Speak(text) => speaker.speak(&text),
                    GameEvent::Sound(cue) => audio.play(cue),
                    GameEvent::LevelStarted { index } => {
                        best_level = best_level.max(index);
                        log::info!("{}", ui::hud_level_text(index));
                    }
                    GameEvent::ScoreChanged(score) => log::info!("{}", ui::hud_score_text(score)),
                    GameEvent::SessionRestarted => restarts += 1,
                    other => log::debug!("{:?}", other),
                }
            }
        }

        log::info!(
            "Headless run finished: {:.0}s simulated, furthest {}, {}, {} restarts, {} sounds",
            seconds,
            ui::hud_level_text(best_level),
            ui::hud_score_text(state.score),
            restarts,
            audio.played().len()
        );
    }
}
