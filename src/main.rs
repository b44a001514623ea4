use std::io::{Write, stdout};
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseButton, MouseEventKind,
    },
    execute, terminal,
};
use log::{info, warn};
use rand::Rng;

use flappy_cat::audio::{Silent, SoundPlayer, Synth};
use flappy_cat::render::Renderer;
use flappy_cat::store::{FileStore, MemoryStore, ScoreStore};
use flappy_cat::{Error, GameConfig, Session, logging};

type Game = Session<Box<dyn SoundPlayer>, Box<dyn ScoreStore>>;

fn open_sound() -> Box<dyn SoundPlayer> {
    match Synth::open() {
        Ok(synth) => Box::new(synth),
        Err(e) => {
            warn!("{e}; running without sound");
            Box::new(Silent)
        }
    }
}

fn open_store() -> Box<dyn ScoreStore> {
    match FileStore::default_location() {
        Ok(store) => {
            info!("best score file: {}", store.path().display());
            Box::new(store)
        }
        Err(e) => {
            warn!("{e}; best score will not survive this run");
            Box::new(MemoryStore::default())
        }
    }
}

// ── Main ────────────────────────────────────────────────────────────────────

fn main() -> Result<(), Error> {
    if let Some(path) = logging::init() {
        info!("logging to {}", path.display());
    }
    let config = GameConfig::discover()?;
    let frame_dur = Duration::from_millis(config.timing.frame_ms);
    let mut game: Game = Session::new(config, open_sound(), open_store());
    let mut rng = rand::thread_rng();

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
        EnableMouseCapture,
    )?;

    let result = run(&mut out, &mut game, &mut rng, frame_dur);

    // Always restore the terminal
    let _ = execute!(
        out,
        DisableMouseCapture,
        terminal::LeaveAlternateScreen,
        cursor::Show,
        terminal::EnableLineWrap,
    );
    let _ = terminal::disable_raw_mode();

    info!("exiting with best score {}", game.best());
    result
}

fn run<R: Rng>(
    out: &mut impl Write,
    game: &mut Game,
    rng: &mut R,
    frame_dur: Duration,
) -> Result<(), Error> {
    let (cols, rows) = terminal::size()?;
    let mut renderer = Renderer::new(cols, rows);

    loop {
        let frame_start = Instant::now();

        // Input
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(());
                    }
                    KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => game.activate(rng),
                    _ => {}
                },
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                    game.activate(rng);
                }
                Event::Resize(c, r) => renderer.resize(c, r),
                _ => {}
            }
        }

        // Update
        game.tick(rng);

        // Render
        renderer.draw(game);
        renderer.present(out)?;

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}
