//! Scrolling pipe obstacles.
//!
//! Pipes live in a queue ordered by spawn time, which is also left-to-right
//! order: all pipes move at the same speed and new ones always enter at the
//! right edge. That lets removal look only at the front of the queue.

use std::collections::VecDeque;

use log::debug;
use rand::Rng;

use crate::cat::Cat;
use crate::config::PipeConfig;

/// A top/bottom pipe pair with a gap between.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    /// Left edge.
    pub x: f64,
    /// Top of the upper segment; always in `[-offset_range, 0)`.
    pub y: f64,
    /// Set once the cat has fully passed; never cleared.
    pub scored: bool,
}

/// Something that happened to the cat while processing one pipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipeEvent {
    Hit,
    Scored,
}

#[derive(Debug, Clone)]
pub struct PipeField {
    pipes: VecDeque<Pipe>,
    config: PipeConfig,
    field_width: f64,
}

impl PipeField {
    pub fn new(config: &PipeConfig, field_width: f64) -> Self {
        Self {
            pipes: VecDeque::new(),
            config: config.clone(),
            field_width,
        }
    }

    pub fn reset(&mut self) {
        self.pipes.clear();
    }

    /// Push a new pipe at the right edge with a random vertical offset.
    pub fn spawn<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let y = rng.gen_range(-self.config.offset_range..0.0);
        debug!("spawning pipe at x={} y={y:.1}", self.field_width);
        self.pipes.push_back(Pipe {
            x: self.field_width,
            y,
            scored: false,
        });
    }

    /// Advance one tick.
    ///
    /// Returns what happened to the cat, in pipe order. Collision is checked
    /// before scoring for each pipe.
    pub fn update<R: Rng + ?Sized>(&mut self, cat: &Cat, rng: &mut R) -> Vec<PipeEvent> {
        let mut events = Vec::new();
        let speed = self.config.speed;
        let width = self.config.width;

        for i in 0..self.pipes.len() {
            self.pipes[i].x -= speed;

            if self.collides(&self.pipes[i], cat) {
                events.push(PipeEvent::Hit);
            }

            let pipe = &mut self.pipes[i];
            if !pipe.scored && pipe.x + width < cat.left() {
                pipe.scored = true;
                events.push(PipeEvent::Scored);
            }
        }

        if self.pipes.front().is_some_and(|p| p.x < -width) {
            self.pipes.pop_front();
            debug!("pipe left the field, {} remaining", self.pipes.len());
        }

        let should_spawn = match self.pipes.back() {
            None => true,
            Some(last) => self.field_width - last.x >= self.config.spacing,
        };
        if should_spawn {
            self.spawn(rng);
        }

        events
    }

    /// Horizontal overlap AND the cat poking out of the gap, above or below.
    pub fn collides(&self, pipe: &Pipe, cat: &Cat) -> bool {
        cat.left() < pipe.x + self.config.width
            && cat.right() > pipe.x
            && (cat.top() < self.gap_top(pipe) || cat.bottom() > self.gap_bottom(pipe))
    }

    pub fn gap_top(&self, pipe: &Pipe) -> f64 {
        pipe.y + self.config.segment_height
    }

    pub fn gap_bottom(&self, pipe: &Pipe) -> f64 {
        self.gap_top(pipe) + self.config.gap
    }

    /// Oldest (leftmost) first.
    pub fn iter(&self) -> impl Iterator<Item = &Pipe> {
        self.pipes.iter()
    }

    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }

    pub fn config(&self) -> &PipeConfig {
        &self.config
    }

    #[cfg(test)]
    pub(crate) fn push(&mut self, pipe: Pipe) {
        self.pipes.push_back(pipe);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup() -> (PipeField, Cat, ChaCha8Rng) {
        (
            PipeField::new(&PipeConfig::default(), 360.0),
            Cat::new(&CatConfig::default()),
            ChaCha8Rng::seed_from_u64(7),
        )
    }

    /// Gap 210..390 comfortably contains the cat at 240..292.
    fn open_pipe(x: f64) -> Pipe {
        Pipe {
            x,
            y: -150.0,
            scored: false,
        }
    }

    #[test]
    fn test_update_on_empty_field_spawns_at_right_edge() {
        let (mut field, cat, mut rng) = setup();
        let events = field.update(&cat, &mut rng);
        assert!(events.is_empty());
        assert_eq!(field.len(), 1);
        let pipe = field.iter().next().unwrap();
        assert_eq!(pipe.x, 360.0);
        assert!(!pipe.scored);
    }

    #[test]
    fn test_spawn_offset_in_range() {
        let (mut field, _, mut rng) = setup();
        for _ in 0..500 {
            field.spawn(&mut rng);
        }
        assert!(field.iter().all(|p| p.y >= -200.0 && p.y < 0.0));
    }

    #[test]
    fn test_pipes_scroll_left() {
        let (mut field, cat, mut rng) = setup();
        field.push(open_pipe(300.0));
        field.update(&cat, &mut rng);
        let pipe = field.iter().next().unwrap();
        assert!((pipe.x - 297.9).abs() < 1e-9);
    }

    #[test]
    fn test_spacing_between_consecutive_spawns() {
        let (mut field, cat, mut rng) = setup();
        let mut spawns = 0;
        for _ in 0..2000 {
            field.update(&cat, &mut rng);
            let xs: Vec<f64> = field.iter().map(|p| p.x).collect();
            // a pipe sitting exactly on the right edge was spawned this tick
            if xs.len() >= 2 && xs[xs.len() - 1] == 360.0 {
                let gap = 360.0 - xs[xs.len() - 2];
                assert!(gap >= 180.0, "spacing {gap} too small");
                spawns += 1;
            }
        }
        assert!(spawns > 10);
    }

    #[test]
    fn test_at_most_one_spawn_per_tick() {
        let (mut field, cat, mut rng) = setup();
        for _ in 0..500 {
            let before = field.len();
            field.update(&cat, &mut rng);
            assert!(field.len() <= before + 1);
        }
    }

    #[test]
    fn test_ordering_holds() {
        let (mut field, cat, mut rng) = setup();
        for _ in 0..1500 {
            field.update(&cat, &mut rng);
            let xs: Vec<f64> = field.iter().map(|p| p.x).collect();
            assert!(xs.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn test_offscreen_pipe_removed_from_front() {
        let (mut field, cat, mut rng) = setup();
        let mut gone = open_pipe(-59.0);
        gone.scored = true;
        field.push(gone);
        field.push(open_pipe(200.0));
        field.update(&cat, &mut rng);
        assert_eq!(field.len(), 1);
        assert!((field.iter().next().unwrap().x - 197.9).abs() < 1e-9);
    }

    #[test]
    fn test_score_when_trailing_edge_passes() {
        let (mut field, cat, mut rng) = setup();
        // right edge at 21.0 + 60 = 81, one tick later 78.9 < 80
        field.push(open_pipe(21.0));
        let events = field.update(&cat, &mut rng);
        assert_eq!(events, vec![PipeEvent::Scored]);
        assert!(field.iter().next().unwrap().scored);

        let events = field.update(&cat, &mut rng);
        assert!(events.is_empty());
        assert!(field.iter().next().unwrap().scored);
    }

    #[test]
    fn test_hit_top_segment() {
        let (mut field, cat, mut rng) = setup();
        // gap 300..480, cat top at 240 is above it
        field.push(Pipe {
            x: 100.0,
            y: -60.0,
            scored: false,
        });
        let events = field.update(&cat, &mut rng);
        assert_eq!(events, vec![PipeEvent::Hit]);
    }

    #[test]
    fn test_hit_bottom_segment() {
        let (mut field, cat, mut rng) = setup();
        // gap 100..280, cat bottom at 292 pokes out
        field.push(Pipe {
            x: 100.0,
            y: -260.0,
            scored: false,
        });
        let events = field.update(&cat, &mut rng);
        assert_eq!(events, vec![PipeEvent::Hit]);
    }

    #[test]
    fn test_no_hit_inside_gap() {
        let (mut field, cat, mut rng) = setup();
        field.push(open_pipe(100.0));
        assert!(field.update(&cat, &mut rng).is_empty());
    }

    #[test]
    fn test_no_hit_without_horizontal_overlap() {
        let (mut field, cat, mut rng) = setup();
        // vertically blocked, but still to the right of the cat after moving
        let pipe = Pipe {
            x: 185.0,
            y: -60.0,
            scored: false,
        };
        assert!(!field.collides(&pipe, &cat));
        field.push(pipe);
        assert!(field.update(&cat, &mut rng).is_empty());
    }

    #[test]
    fn test_edges_touching_is_not_overlap() {
        let (field, cat, _) = setup();
        let touching = Pipe {
            x: 180.0,
            y: -60.0,
            scored: false,
        };
        assert!(!field.collides(&touching, &cat));
    }

    #[test]
    fn test_events_follow_pipe_order() {
        let (mut field, cat, mut rng) = setup();
        field.push(open_pipe(21.0));
        field.push(Pipe {
            x: 150.0,
            y: -60.0,
            scored: false,
        });
        let events = field.update(&cat, &mut rng);
        assert_eq!(events, vec![PipeEvent::Scored, PipeEvent::Hit]);
    }

    #[test]
    fn test_reset_clears() {
        let (mut field, _, mut rng) = setup();
        field.spawn(&mut rng);
        field.spawn(&mut rng);
        field.reset();
        assert!(field.is_empty());
    }

    #[test]
    fn test_gap_geometry() {
        let (field, _, _) = setup();
        let pipe = open_pipe(0.0);
        assert_eq!(field.gap_top(&pipe), 210.0);
        assert_eq!(field.gap_bottom(&pipe), 390.0);
    }
}
