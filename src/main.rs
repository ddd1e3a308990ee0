//! Dino Jump entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, EventTarget, HtmlCanvasElement, HtmlSelectElement, KeyboardEvent};

    use dino_jump::Settings;
    use dino_jump::audio::{AudioManager, SoundEffect};
    use dino_jump::persistence::Persistence;
    use dino_jump::platform::{InputEvent, StepClock, key_to_input, map_input};
    use dino_jump::renderer::{RenderState, build_frame};
    use dino_jump::sim::{
        Command, Difficulty, GameEvent, GamePhase, GameState, Simulation, autopilot,
    };
    use dino_jump::tuning::Tuning;
    use dino_jump::ui::{self, Toasts};

    /// Game instance holding all state
    struct Game {
        sim: Simulation,
        clock: StepClock,
        persistence: Persistence,
        settings: Settings,
        toasts: Toasts,
        audio: AudioManager,
        render_state: Option<RenderState>,
        /// Autopilot drives the run
        demo: bool,
        last_frame_ms: Option<f64>,
        document: Document,
    }

    impl Game {
        fn new(document: Document) -> Self {
            let mut persistence = Persistence::browser();
            let best = persistence.load_best();
            let settings = persistence.load_settings();
            let state = GameState::new(Tuning::default(), settings.difficulty, best);
            Self {
                sim: Simulation::new(state, js_sys::Date::now() as u64),
                clock: StepClock::default(),
                persistence,
                audio: AudioManager::new(&settings),
                settings,
                toasts: Toasts::new(),
                render_state: None,
                demo: false,
                last_frame_ms: None,
                document,
            }
        }

        /// Hand a command to the simulation; starts get a fresh seed
        fn dispatch(&mut self, command: Command) {
            let changed = match command {
                Command::Start => self.sim.start_seeded(js_sys::Date::now() as u64),
                other => self.sim.apply(other),
            };
            if !changed {
                return;
            }
            match command {
                Command::Start => self.audio.resume(),
                Command::Reset => {
                    self.clock.cancel();
                    self.toasts.clear();
                    log::info!("Game reset");
                }
                _ => {}
            }
        }

        fn input(&mut self, event: InputEvent) {
            if let Some(command) = map_input(self.sim.phase(), event) {
                self.dispatch(command);
            }
        }

        fn set_difficulty(&mut self, difficulty: Difficulty) {
            if !self.sim.state.set_difficulty(difficulty) {
                log::info!("Difficulty is locked while a run is in progress");
                return;
            }
            self.settings.difficulty = difficulty;
            self.persistence.save_settings(&self.settings);
            log::info!("Difficulty set to {}", difficulty.as_str());
        }

        fn toggle_mute(&mut self) {
            self.settings.muted = !self.settings.muted;
            self.audio.apply_settings(&self.settings);
            self.persistence.save_settings(&self.settings);
        }

        fn toggle_demo(&mut self) {
            self.demo = !self.demo;
            log::info!("Demo mode: {}", self.demo);
        }

        fn auto_pause(&mut self, reason: &str) {
            if self.settings.auto_pause && self.sim.phase() == GamePhase::Playing {
                self.dispatch(Command::Pause);
                log::info!("Auto-paused ({})", reason);
            }
        }

        /// One display refresh
        fn frame(&mut self, now_ms: f64) {
            let dt = self
                .last_frame_ms
                .map_or(0.0, |last| ((now_ms - last) / 1000.0) as f32);
            self.last_frame_ms = Some(now_ms);

            if self.demo
                && let Some(command) = autopilot::decide(&self.sim.state)
            {
                self.dispatch(command);
            }
            self.clock.pump(now_ms, &mut self.sim);
            self.handle_events();
            self.toasts.tick(dt);
            self.render();
            self.update_hud();
        }

        fn handle_events(&mut self) {
            let events = self.sim.drain_events();
            let new_best = events
                .iter()
                .any(|e| matches!(e, GameEvent::NewBest { .. }));
            for event in &events {
                if let GameEvent::NewBest { score } = event {
                    self.persistence.save_best(*score);
                }
                if let Some(effect) = SoundEffect::for_event(event, new_best) {
                    self.audio.play(effect);
                }
                self.toasts.notify(event);
            }
        }

        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let vertices = build_frame(&self.sim.state, self.settings.reduced_motion);
            match render_state.render(&vertices) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let (w, h) = render_state.size;
                    render_state.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let doc = &self.document;
            let state = &self.sim.state;
            let phase = state.phase;

            set_text(doc, "score", &ui::format_score(state.score));
            set_text(doc, "best-score", &ui::format_score(state.best_score));
            set_text(doc, "speed", &format!("{:.1}", state.speed));
            set_text(doc, "status", ui::status_label(phase));
            if let Some(el) = doc.get_element_by_id("status")
                && el.class_name() != ui::status_class(phase)
            {
                el.set_class_name(ui::status_class(phase));
            }

            match ui::overlay_text(phase) {
                Some((title, hint)) => {
                    set_text(doc, "overlay-title", title);
                    set_text(doc, "overlay-hint", hint);
                    set_visible(doc, "overlay", true);
                }
                None => set_visible(doc, "overlay", false),
            }
            set_visible(doc, "start-btn", phase == GamePhase::Waiting);
            set_visible(doc, "restart-btn", phase == GamePhase::GameOver);
            set_visible(doc, "resume-btn", phase == GamePhase::Paused);
            if phase == GamePhase::GameOver {
                set_text(doc, "final-score", &ui::format_score(state.score));
            }

            match self.toasts.current() {
                Some(toast) => {
                    set_text(doc, "toast-title", &toast.title);
                    set_text(doc, "toast-body", &toast.body);
                    set_visible(doc, "toast", true);
                }
                None => set_visible(doc, "toast", false),
            }

            if let Some(select) = doc
                .get_element_by_id("difficulty")
                .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
            {
                if select.value() != state.difficulty.as_str() {
                    select.set_value(state.difficulty.as_str());
                }
                select.set_disabled(state.run_active());
            }

            set_text(
                doc,
                "mute-btn",
                if self.settings.muted { "Sound: off" } else { "Sound: on" },
            );
            set_visible(doc, "session-note", self.persistence.is_session_only());
            set_visible(doc, "demo-badge", self.demo);

            let viewport = web_sys::window()
                .and_then(|w| w.inner_width().ok())
                .and_then(|v| v.as_f64())
                .unwrap_or(f64::from(ui::MOBILE_BREAKPOINT));
            set_visible(doc, "touch-controls", ui::is_mobile(viewport as u32));
        }
    }

    fn set_text(doc: &Document, id: &str, text: &str) {
        if let Some(el) = doc.get_element_by_id(id)
            && el.text_content().as_deref() != Some(text)
        {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(doc: &Document, id: &str, visible: bool) {
        if let Some(el) = doc.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    /// Attach a listener that borrows the game for the duration of the event
    fn listen<F>(target: &EventTarget, name: &str, game: &Rc<RefCell<Game>>, mut handler: F)
    where
        F: FnMut(&mut Game, &web_sys::Event) + 'static,
    {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            handler(&mut game.borrow_mut(), &event);
        });
        if let Err(e) =
            target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
        {
            log::warn!("Could not listen for {}: {:?}", name, e);
        }
        closure.forget();
    }

    /// Click handler on an element, if it exists
    fn on_click<F>(doc: &Document, id: &str, game: &Rc<RefCell<Game>>, mut handler: F)
    where
        F: FnMut(&mut Game) + 'static,
    {
        match doc.get_element_by_id(id) {
            Some(el) => listen(&el, "click", game, move |g, _| handler(g)),
            None => log::warn!("Missing #{} element", id),
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Dino Jump starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        let game = Rc::new(RefCell::new(Game::new(document.clone())));
        log::info!("Best score on record: {}", game.borrow().sim.state.best_score);

        setup_keyboard(&window, &game);
        setup_buttons(&document, &game);
        setup_auto_pause(&window, &document, &game);

        let canvas = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());
        match canvas {
            Some(canvas) => {
                listen(&canvas, "pointerdown", &game, |g, event| {
                    event.prevent_default();
                    g.input(InputEvent::Primary);
                });

                let (logical_w, logical_h) = {
                    let g = game.borrow();
                    let t = &g.sim.state.tuning;
                    (t.canvas_width, t.canvas_height)
                };
                let dpr = window.device_pixel_ratio();
                let width = (logical_w as f64 * dpr) as u32;
                let height = (logical_h as f64 * dpr) as u32;
                canvas.set_width(width);
                canvas.set_height(height);

                match RenderState::from_canvas(canvas, width, height).await {
                    Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
                    Err(e) => log::error!("Rendering disabled: {}", e),
                }
            }
            None => log::error!("No #canvas element; rendering disabled"),
        }

        request_animation_frame(game);

        log::info!("Dino Jump running!");
    }

    fn setup_keyboard(window: &web_sys::Window, game: &Rc<RefCell<Game>>) {
        for (name, pressed) in [("keydown", true), ("keyup", false)] {
            listen(window, name, game, move |g, event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let key = event.key();
                if pressed && matches!(key.as_str(), "i" | "I") {
                    g.toggle_demo();
                    return;
                }
                if let Some(input) = key_to_input(&key, pressed) {
                    // Keep Space and arrows from scrolling the page
                    event.prevent_default();
                    g.input(input);
                }
            });
        }
    }

    fn setup_buttons(doc: &Document, game: &Rc<RefCell<Game>>) {
        on_click(doc, "start-btn", game, |g| g.dispatch(Command::Start));
        on_click(doc, "restart-btn", game, |g| g.dispatch(Command::Start));
        on_click(doc, "resume-btn", game, |g| g.dispatch(Command::Resume));
        on_click(doc, "pause-btn", game, |g| g.input(InputEvent::PauseToggle));
        on_click(doc, "reset-btn", game, |g| g.input(InputEvent::Reset));
        on_click(doc, "jump-btn", game, |g| g.input(InputEvent::Primary));
        on_click(doc, "mute-btn", game, Game::toggle_mute);

        // Crouch is press-and-hold
        if let Some(btn) = doc.get_element_by_id("crouch-btn") {
            listen(&btn, "pointerdown", game, |g, event| {
                event.prevent_default();
                g.input(InputEvent::CrouchDown);
            });
            for name in ["pointerup", "pointerleave", "pointercancel"] {
                listen(&btn, name, game, |g, _| g.input(InputEvent::CrouchUp));
            }
        }

        if let Some(select) = doc.get_element_by_id("difficulty") {
            listen(&select, "change", game, |g, event| {
                let Some(select) = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlSelectElement>().ok())
                else {
                    return;
                };
                match select.value().parse::<Difficulty>() {
                    Ok(difficulty) => g.set_difficulty(difficulty),
                    Err(e) => log::warn!("{}", e),
                }
            });
        }
    }

    fn setup_auto_pause(window: &web_sys::Window, doc: &Document, game: &Rc<RefCell<Game>>) {
        // Tab switch, minimize
        let document = doc.clone();
        listen(doc, "visibilitychange", game, move |g, _| {
            if document.visibility_state() == web_sys::VisibilityState::Hidden {
                g.auto_pause("tab hidden");
            }
        });

        // Click outside the window
        listen(window, "blur", game, |g, _| g.auto_pause("window blur"));
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
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Headless demo: the autopilot plays one run and the result is logged.
///
/// Usage: `dino-jump [seed] [easy|normal|hard]`; set `DINO_TUNING` to a JSON
/// file to override balance values.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use dino_jump::sim::{
        Command, Difficulty, GameEvent, GamePhase, GameState, Simulation, autopilot,
    };
    use dino_jump::tuning::Tuning;

    /// Ten minutes of play at 60 steps per second
    const MAX_STEPS: u64 = 60 * 60 * 10;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(2024);
    let difficulty = args
        .next()
        .and_then(|s| s.parse::<Difficulty>().ok())
        .unwrap_or_default();

    log::info!(
        "Dino Jump (native) headless demo: seed {}, {}",
        seed,
        difficulty.as_str()
    );

    let tuning = match std::env::var("DINO_TUNING") {
        Ok(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json(&json).unwrap_or_else(|e| {
                log::error!("{}: {}; using default tuning", path, e);
                Tuning::default()
            }),
            Err(e) => {
                log::error!("Could not read {}: {}; using default tuning", path, e);
                Tuning::default()
            }
        },
        Err(_) => Tuning::default(),
    };

    let mut sim = Simulation::new(GameState::new(tuning, difficulty, 0), seed);
    sim.start_seeded(seed);

    let mut jumps = 0u32;
    while sim.phase() == GamePhase::Playing && sim.state.time_ticks < MAX_STEPS {
        if let Some(command) = autopilot::decide(&sim.state)
            && command != Command::Start
        {
            sim.apply(command);
        }
        sim.step();
        for event in sim.drain_events() {
            match event {
                GameEvent::Jumped => jumps += 1,
                GameEvent::Milestone(m) => {
                    log::debug!("Milestone {} at speed {:.2}", m, sim.state.speed)
                }
                GameEvent::NewBest { .. } | GameEvent::GameOver { .. } => {}
            }
        }
    }

    let outcome = if sim.phase() == GamePhase::GameOver {
        "crashed"
    } else {
        "survived"
    };
    log::info!(
        "Demo run {}: score {} after {} steps, {} jumps, final speed {:.2}",
        outcome,
        sim.state.score,
        sim.state.time_ticks,
        jumps,
        sim.state.speed
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
