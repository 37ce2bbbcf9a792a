mod console;

use std::{cell::RefCell, io, rc::Rc};

use idle_tycoon::time::{unix_now, Frame, FrameClock};
use idle_tycoon::tycoon::config::GameConfig;
use idle_tycoon::tycoon::save::{self, SaveStore};
use idle_tycoon::tycoon::{logic, offline, render, TycoonGame};
use ratzilla::event::KeyCode;
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use tracing::{info, warn};

/// Everything the frame callback mutates.
struct App {
    game: TycoonGame,
    clock: FrameClock,
    /// Unix seconds of the last autosave.
    last_save: f64,
}

/// Monotonic milliseconds for the frame clock.
fn monotonic_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

#[cfg(target_arch = "wasm32")]
fn open_store() -> Box<dyn SaveStore> {
    match save::LocalStorage::open() {
        Ok(store) => Box::new(store),
        Err(e) => {
            warn!(error = %e, "progress will not be kept");
            Box::new(save::MemoryStore::default())
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn open_store() -> Box<dyn SaveStore> {
    Box::new(save::MemoryStore::default())
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();
    console::init();

    let config =
        GameConfig::builtin().map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let store: Rc<dyn SaveStore> = Rc::from(open_store());

    let now = unix_now();
    let mut state = save::load_or_new(&config, store.as_ref(), now);
    let report = offline::catch_up(&mut state, now);
    info!(
        businesses = state.businesses.len(),
        away_secs = report.elapsed,
        "game loaded"
    );

    let app = Rc::new(RefCell::new(App {
        game: TycoonGame::from_state(state),
        clock: FrameClock::default(),
        last_save: now,
    }));

    let backend = DomBackend::new()?;
    let mut terminal = Terminal::new(backend)?;

    // Keyboard handler
    terminal.on_key_event({
        let app = app.clone();
        move |key_event| {
            if let KeyCode::Char(c) = key_event.code {
                app.borrow_mut().game.handle_key(c);
            }
        }
    });

    terminal.draw_web(move |f| {
        let mut app = app.borrow_mut();
        let wall = unix_now();

        match app.clock.update(monotonic_ms()) {
            Frame::Step(dt) => {
                logic::tick(&mut app.game.state, dt);
            }
            Frame::Resume(gap) => {
                info!(gap, "resuming after a pause");
                offline::catch_up(&mut app.game.state, wall);
            }
        }
        app.game.state.touch(wall);

        if wall - app.last_save >= save::AUTOSAVE_INTERVAL_SECS {
            if let Err(e) = save::save_game(&app.game.state, store.as_ref()) {
                warn!(error = %e, "autosave failed");
            }
            app.last_save = wall;
        }

        let view = app.game.view();
        render::render(&view, f, f.area());
    });

    Ok(())
}
