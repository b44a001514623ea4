//! Game lifecycle and the per-tick driver.
//!
//! ```text
//!  START --activate--> PLAY --hit / ground / ceiling--> OVER
//!    ^                  |  ^                              |
//!    |                  +--+ activate = flap              |
//!    +--------------------- activate ---------------------+
//! ```

use log::{info, warn};
use rand::Rng;

use crate::audio::{Cue, SoundPlayer};
use crate::cat::Cat;
use crate::config::GameConfig;
use crate::pipes::{PipeEvent, PipeField};
use crate::store::ScoreStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Idle, waiting for the first input.
    Start,
    Play,
    /// Halted until the next input.
    Over,
}

pub struct Session<S, B> {
    config: GameConfig,
    state: GameState,
    score: u32,
    best: u32,
    cat: Cat,
    pipes: PipeField,
    /// Scroll position of the ground strip, in `(-field width, 0]`.
    ground_offset: f64,
    sound: S,
    store: B,
}

impl<S: SoundPlayer, B: ScoreStore> Session<S, B> {
    pub fn new(config: GameConfig, sound: S, store: B) -> Self {
        let best = store.load_best();
        info!("loaded best score {best}");
        Self {
            cat: Cat::new(&config.cat),
            pipes: PipeField::new(&config.pipes, config.field.width),
            config,
            state: GameState::Start,
            score: 0,
            best,
            ground_offset: 0.0,
            sound,
            store,
        }
    }

    /// The single input event: key, click or tap.
    pub fn activate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        match self.state {
            GameState::Start => {
                self.state = GameState::Play;
                self.score = 0;
                self.cat.reset();
                self.pipes.reset();
                self.pipes.spawn(rng);
                info!("session started");
            }
            GameState::Play => {
                self.cat.flap();
                self.sound.play(Cue::Flap);
            }
            GameState::Over => {
                self.state = GameState::Start;
            }
        }
    }

    /// Advance one frame. Does nothing outside of play.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.state != GameState::Play {
            return;
        }

        self.cat.update();
        for event in self.pipes.update(&self.cat, rng) {
            match event {
                PipeEvent::Hit => self.end(),
                PipeEvent::Scored => self.add_point(),
            }
        }

        let width = self.config.field.width;
        self.ground_offset = (self.ground_offset - self.config.pipes.speed) % width;

        let floor = self.config.field.height - self.config.field.ground_height;
        if self.cat.bottom() >= floor || self.cat.top() < 0.0 {
            self.end();
        }
    }

    /// PLAY -> OVER. Repeated calls are no-ops.
    pub fn end(&mut self) {
        if self.state != GameState::Play {
            return;
        }
        self.state = GameState::Over;
        self.sound.play(Cue::Hit);
        self.sound.play(Cue::GameOver);

        if self.score > self.best {
            info!("new best score {} (was {})", self.score, self.best);
        }
        self.best = self.best.max(self.score);
        info!("game over with score {}", self.score);
        if let Err(e) = self.store.save_best(self.best) {
            warn!("could not save best score: {e}");
        }
    }

    fn add_point(&mut self) {
        if self.state != GameState::Play {
            return;
        }
        self.score += 1;
        self.sound.play(Cue::Score);
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn cat(&self) -> &Cat {
        &self.cat
    }

    pub fn pipes(&self) -> &PipeField {
        &self.pipes
    }

    pub fn ground_offset(&self) -> f64 {
        self.ground_offset
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn sound(&self) -> &S {
        &self.sound
    }

    pub fn store(&self) -> &B {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Recorder;
    use crate::pipes::Pipe;
    use crate::store::MemoryStore;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    type TestSession = Session<Recorder, MemoryStore>;

    fn session(best: u32) -> (TestSession, ChaCha8Rng) {
        (
            Session::new(
                GameConfig::default(),
                Recorder::default(),
                MemoryStore::with_best(best),
            ),
            ChaCha8Rng::seed_from_u64(1),
        )
    }

    #[test]
    fn test_starts_idle_with_stored_best() {
        let (s, _) = session(17);
        assert_eq!(s.state(), GameState::Start);
        assert_eq!(s.best(), 17);
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn test_tick_is_noop_outside_play() {
        let (mut s, mut rng) = session(0);
        s.tick(&mut rng);
        assert_eq!(s.cat().y, 240.0);
        assert!(s.pipes().is_empty());
        assert_eq!(s.ground_offset(), 0.0);
    }

    #[test]
    fn test_activate_flaps_while_playing() {
        let (mut s, mut rng) = session(0);
        s.activate(&mut rng);
        s.tick(&mut rng);
        s.activate(&mut rng);
        assert_eq!(s.state(), GameState::Play);
        assert_eq!(s.cat().velocity, -4.0);
        assert_eq!(s.sound().played, vec![Cue::Flap]);
    }

    #[test]
    fn test_over_returns_to_start_without_resetting() {
        let (mut s, mut rng) = session(0);
        s.activate(&mut rng);
        s.score = 4;
        s.end();
        s.activate(&mut rng);
        assert_eq!(s.state(), GameState::Start);
        assert_eq!(s.score(), 4);
        assert_eq!(s.best(), 4);
    }

    #[test]
    fn test_end_outside_play_is_ignored() {
        let (mut s, _) = session(2);
        s.end();
        assert_eq!(s.state(), GameState::Start);
        assert!(s.sound().played.is_empty());
        assert_eq!(s.store().saves, 0);
    }

    #[test]
    fn test_end_plays_hit_then_game_over() {
        let (mut s, mut rng) = session(0);
        s.activate(&mut rng);
        s.end();
        assert_eq!(s.sound().played, vec![Cue::Hit, Cue::GameOver]);
    }

    #[test]
    fn test_lower_score_keeps_best() {
        let (mut s, mut rng) = session(10);
        s.activate(&mut rng);
        s.score = 3;
        s.end();
        assert_eq!(s.best(), 10);
        assert_eq!(s.store().best, Some(10));
    }

    #[test]
    fn test_ceiling_ends_session() {
        let (mut s, mut rng) = session(0);
        s.activate(&mut rng);
        s.cat.y = 1.0;
        s.cat.velocity = -4.0;
        s.tick(&mut rng);
        assert_eq!(s.state(), GameState::Over);
    }

    #[test]
    fn test_ground_scrolls_with_pipes() {
        let (mut s, mut rng) = session(0);
        s.activate(&mut rng);
        for _ in 0..60 {
            s.tick(&mut rng);
        }
        assert_eq!(s.state(), GameState::Play);
        assert!((s.ground_offset() + 126.0).abs() < 1e-9);
    }

    #[test]
    fn test_ground_offset_wraps() {
        let (mut s, mut rng) = session(0);
        s.activate(&mut rng);
        s.ground_offset = -359.0;
        s.tick(&mut rng);
        assert!((s.ground_offset() + 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_score_then_hit_in_same_tick_counts_point() {
        let (mut s, mut rng) = session(0);
        s.activate(&mut rng);
        s.pipes.reset();
        s.pipes.push(Pipe {
            x: 21.0,
            y: -150.0,
            scored: false,
        });
        s.pipes.push(Pipe {
            x: 150.0,
            y: -10.0,
            scored: false,
        });
        s.tick(&mut rng);
        assert_eq!(s.state(), GameState::Over);
        assert_eq!(s.score(), 1);
        assert_eq!(s.best(), 1);
        assert_eq!(s.sound().played, vec![Cue::Score, Cue::Hit, Cue::GameOver]);
    }

    #[test]
    fn test_no_point_after_hit_in_same_tick() {
        let (mut s, mut rng) = session(0);
        s.activate(&mut rng);
        s.pipes.reset();
        s.pipes.push(Pipe {
            x: 150.0,
            y: -10.0,
            scored: false,
        });
        // out of queue order on purpose: processed after the hit
        s.pipes.push(Pipe {
            x: 21.0,
            y: -150.0,
            scored: false,
        });
        s.tick(&mut rng);
        assert_eq!(s.state(), GameState::Over);
        assert_eq!(s.score(), 0);
    }
}
