//! A Flappy Bird style game starring a cat.
//!
//! The simulation ([`session`], [`cat`], [`pipes`]) knows nothing about
//! terminals, audio devices or files; those are reached through the
//! [`audio::SoundPlayer`] and [`store::ScoreStore`] traits and drawn by
//! [`render`]. The binary in `main.rs` drives it once per frame.

pub mod audio;
pub mod cat;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipes;
pub mod render;
pub mod session;
pub mod store;

pub use config::GameConfig;
pub use error::Error;
pub use session::{GameState, Session};
