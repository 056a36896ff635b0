//! Desert Flight entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use desert_flight::audio::{AudioManager, Mixer, SoundEffect, sounds_for};
    use desert_flight::highscores::LEADERBOARD_SIZE;
    use desert_flight::persistence::{KEY_USERNAME, LocalStorage, Storage};
    use desert_flight::platform::{InputSource, now_ms, playfield_for_viewport};
    use desert_flight::renderer::{CanvasPainter, RenderOptions, render};
    use desert_flight::services::{
        HttpScoreClient, LeaderboardService, LocalLeaderboard, LocalScoreService, ScoreService,
    };
    use desert_flight::session::{RunResult, ScoreTicket};
    use desert_flight::sim::{GameEvent, GamePhase};
    use desert_flight::{BestScore, Session, Settings, Tuning};

    /// Score server root; the API is served from the same origin
    const API_BASE: &str = "";
    /// Name used on the in-browser board when nobody is signed in
    const GUEST_NAME: &str = "You";

    thread_local! {
        /// Handle for calls coming from page script
        static GAME: RefCell<Option<Rc<RefCell<Game>>>> = const { RefCell::new(None) };
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        canvas: HtmlCanvasElement,
        painter: CanvasPainter,
        audio: AudioManager,
        options: RenderOptions,
        storage: Rc<dyn Storage>,
        local_board: Rc<LocalLeaderboard>,
        last_score: Option<u64>,
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn viewport_width() -> f32 {
        web_sys::window()
            .and_then(|w| w.inner_width().ok())
            .and_then(|v| v.as_f64())
            .unwrap_or(1024.0) as f32
    }

    impl Game {
        fn username(&self) -> Option<String> {
            self.storage.get(KEY_USERNAME)
        }

        fn apply_canvas_size(&self) {
            self.canvas.set_width(self.session.state.width as u32);
            self.canvas.set_height(self.session.state.height as u32);
        }

        /// Advance, play sounds, draw, refresh the HUD.
        /// Returns a score report owed for a run that just ended.
        fn frame(&mut self, time: f64) -> Option<ScoreTicket> {
            let events = self.session.frame(time);
            self.audio.play_all(&sounds_for(&events));
            render(&self.session.state, &mut self.painter, &self.options);
            self.update_hud(&events);
            self.session.take_report()
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self, events: &[GameEvent]) {
            let Some(document) = document() else { return };
            let state = &self.session.state;

            if self.last_score != Some(state.score) {
                set_text(&document, "score", &state.score.to_string());
                self.last_score = Some(state.score);
            }

            for event in events {
                match event {
                    GameEvent::Started => {
                        set_text(&document, "gameStatus", "Flying");
                        set_visible(&document, "gameOverPanel", false);
                        set_visible(&document, "newRecord", false);
                    }
                    GameEvent::GameOver { score, .. } => {
                        set_text(&document, "gameStatus", "Game Over!");
                        set_text(&document, "finalScore", &score.to_string());
                        set_visible(&document, "gameOverPanel", true);
                    }
                    _ => {}
                }
            }

            if state.phase == GamePhase::Ready {
                set_text(&document, "gameStatus", "Hold SPACE to fly");
            }
        }

        fn show_result(&self, run: RunResult) {
            let Some(document) = document() else { return };
            set_visible(&document, "newRecord", run.is_new_record);
            self.show_best();
        }

        fn show_best(&self) {
            let Some(document) = document() else { return };
            let best = self.session.best();
            set_text(&document, "bestScoreValue", &best.best_score.to_string());
            set_text(&document, "totalGames", &best.total_games.to_string());
        }

        fn show_leaderboard(&self) {
            let Some(document) = document() else { return };
            let name = self.username().unwrap_or_else(|| GUEST_NAME.to_string());
            set_text(&document, "userRank", &self.session.rank_label(&name));

            if let Some(list) = document.get_element_by_id("leaderboardList") {
                list.set_inner_html("");
                for row in self.session.leaderboard() {
                    if let Ok(li) = document.create_element("li") {
                        li.set_text_content(Some(&format!(
                            "#{} {} - {}",
                            row.rank, row.username, row.score
                        )));
                        let _ = list.append_child(&li);
                    }
                }
            }
        }

        fn restart(&mut self) {
            if self.session.restart_if_over() {
                self.last_score = None;
            }
        }

        /// Push the session's settings to audio and drawing, then persist them
        fn apply_settings(&mut self) {
            let settings = self.session.settings().clone();
            self.audio.set_mixer(Mixer::from_settings(&settings));
            self.options = RenderOptions::from(&settings);
            settings.save(self.storage.as_ref());
        }
    }

    /// Change the player color from page script; false for unknown names
    pub fn change_character(name: &str) -> bool {
        GAME.with(|slot| {
            let Some(game) = slot.borrow().clone() else {
                log::warn!("change_character called before the game started");
                return false;
            };
            let mut g = game.borrow_mut();
            if g.session.change_character(name).is_none() {
                return false;
            }
            g.apply_settings();
            true
        })
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Desert Flight starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let painter = CanvasPainter::new(&canvas).expect("no 2d context");

        let storage: Rc<dyn Storage> = Rc::new(LocalStorage::open());
        let settings = Settings::load(storage.as_ref());
        let (width, height) = playfield_for_viewport(viewport_width());

        let seed = now_ms() as u64;
        let mut session = Session::new(seed, width, height, Tuning::default(), settings.clone());
        session.set_best(BestScore::load(storage.as_ref()));

        let game = Rc::new(RefCell::new(Game {
            session,
            canvas: canvas.clone(),
            painter,
            audio: AudioManager::new(Mixer::from_settings(&settings)),
            options: RenderOptions::from(&settings),
            storage,
            local_board: Rc::new(LocalLeaderboard::new()),
            last_score: None,
        }));
        {
            let g = game.borrow();
            g.apply_canvas_size();
            g.show_best();
        }

        log::info!("Game initialized with seed: {}", seed);
        GAME.with(|slot| *slot.borrow_mut() = Some(game.clone()));

        setup_input_handlers(&canvas, game.clone());
        setup_restart_button(game.clone());
        setup_resize(game.clone());

        request_animation_frame(game);

        log::info!("Desert Flight running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Keyboard: Space thrusts, R restarts after a crash
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "Space" => {
                        event.prevent_default();
                        g.audio.resume();
                        g.session.input.press(InputSource::Keyboard);
                    }
                    "KeyR" => g.restart(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() == "Space" {
                    game.borrow_mut().session.input.release(InputSource::Keyboard);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse: held on the canvas, released anywhere
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.session.input.press(InputSource::Pointer);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().session.input.release(InputSource::Pointer);
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.session.input.press(InputSource::Touch);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        for name in ["touchend", "touchcancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().session.input.release(InputSource::Touch);
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else { return };

        if let Some(btn) = document.get_element_by_id("restartButton") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().restart();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// A viewport change picks a new playfield and restarts the run
    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            let before = (g.session.state.width, g.session.state.height);
            if playfield_for_viewport(viewport_width()) != before {
                let (w, h) = g.session.resize(viewport_width());
                g.apply_canvas_size();
                g.last_score = None;
                log::info!("Playfield resized to {}x{}", w, h);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Report a finished run, then refresh the leaderboard with it included
    fn submit_report(game: Rc<RefCell<Game>>, ticket: ScoreTicket) {
        let (storage, board, name) = {
            let g = game.borrow();
            (g.storage.clone(), g.local_board.clone(), g.username())
        };

        wasm_bindgen_futures::spawn_local(async move {
            let client = HttpScoreClient::from_storage(API_BASE, storage.as_ref());
            let signed_in = client.is_authenticated();
            let result = if signed_in {
                client.submit_score(ticket.score).await
            } else {
                board.submit(name.as_deref().unwrap_or(GUEST_NAME), ticket.score);
                LocalScoreService::new(storage.clone())
                    .submit_score(ticket.score)
                    .await
            };

            let board_ticket = {
                let mut g = game.borrow_mut();
                let Some(run) = g.session.complete_report(ticket, result) else {
                    return;
                };
                if run.is_new_record {
                    g.audio.play(SoundEffect::NewRecord);
                }
                g.show_result(run);
                g.session.request_leaderboard()
            };

            let rows = if signed_in {
                client.top_scores(LEADERBOARD_SIZE).await
            } else {
                board.top_scores(LEADERBOARD_SIZE).await
            };

            let mut g = game.borrow_mut();
            if g.session.complete_leaderboard(board_ticket, rows) {
                g.show_leaderboard();
            }
        });
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
        let report = game.borrow_mut().frame(time);
        if let Some(ticket) = report {
            submit_report(game.clone(), ticket);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

/// Exposed to the character picker as `change_character("blue")`
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn change_character(name: &str) -> bool {
    wasm_game::change_character(name)
}

#[cfg(not(target_arch = "wasm32"))]
use desert_flight::Tuning;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Desert Flight (native) starting...");
    log::info!("Native mode runs a headless autopilot - serve the wasm build to play");

    // Optional tuning document as the first argument
    let tuning = match std::env::args().nth(1) {
        Some(path) => match Tuning::from_path(&path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning file {}: {}", path, e);
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    autopilot::run(42, 120_000.0, tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run steering for the nearest gap
#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use std::rc::Rc;

    use desert_flight::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
    use desert_flight::highscores::LEADERBOARD_SIZE;
    use desert_flight::persistence::{MemoryStorage, Storage};
    use desert_flight::platform::InputSource;
    use desert_flight::services::{LocalLeaderboard, LocalScoreService};
    use desert_flight::sim::{GameEvent, GameState, Geometry};
    use desert_flight::{Session, Settings, Tuning};

    const STEP_MS: f32 = 1000.0 / 60.0;

    /// Height the player should aim for
    fn target_y(state: &GameState) -> f32 {
        let player = &state.player;
        let ahead = state
            .obstacles
            .iter()
            .filter(|o| o.trailing_edge() > player.x)
            .min_by(|a, b| a.x.total_cmp(&b.x));

        match ahead.map(|o| o.geometry) {
            Some(Geometry::Columns {
                top_height, bottom_y, ..
            }) => (top_height + bottom_y) / 2.0,
            Some(Geometry::Rect { y, height, .. }) => {
                if y + height / 2.0 > state.height / 2.0 {
                    y / 2.0
                } else {
                    (y + height + state.height) / 2.0
                }
            }
            Some(Geometry::Circle { y, radius }) => {
                if y + radius > state.height / 2.0 {
                    y / 2.0
                } else {
                    (y + radius * 2.0 + state.height) / 2.0
                }
            }
            None => state.height / 2.0,
        }
    }

    pub fn run(seed: u64, duration_ms: f32, tuning: Tuning) {
        let storage: Rc<dyn Storage> = Rc::new(MemoryStorage::new());
        let scores = LocalScoreService::new(storage);
        let board = LocalLeaderboard::new();

        let mut session = Session::new(
            seed,
            DEFAULT_WIDTH,
            DEFAULT_HEIGHT,
            tuning,
            Settings::default(),
        );
        session.input.press(InputSource::Keyboard);

        let mut elapsed = 0.0;
        let mut runs = 0;
        while elapsed < duration_ms {
            let state = &session.state;
            if state.player.center().y > target_y(state) {
                session.input.press(InputSource::Keyboard);
            } else {
                session.input.release(InputSource::Keyboard);
            }

            for event in session.step(STEP_MS) {
                if let GameEvent::GameOver { score, reason } = event {
                    runs += 1;
                    log::info!("Run {} over: {} points ({:?})", runs, score, reason);
                }
            }
            if let Some(ticket) = session.take_report() {
                let outcome = scores.record(ticket.score);
                board.submit(&format!("autopilot-{}", runs), ticket.score);
                session.complete_report(ticket, Ok(outcome));
                session.restart();
            }
            elapsed += STEP_MS;
        }

        let best = scores.best();
        log::info!(
            "Autopilot finished: {} games, best {}",
            best.total_games,
            best.best_score
        );
        for row in board.top(LEADERBOARD_SIZE) {
            log::info!("  #{} {} {}", row.rank, row.username, row.score);
        }
    }
}
