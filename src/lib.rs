//! Reverie - terminal screensaver playing back a fictional AI boot
//! and awakening narrative.
//!
//! Two cooperating pieces: a renderer that turns (text, tag, timing)
//! into colored terminal output and single-line animations, and a
//! sequencer that walks a scripted list of phases, beat by beat,
//! through that renderer. Everything it prints is cosmetic.

pub mod config;
pub mod content;
pub mod error;
pub mod heartbeat;
pub mod render;
pub mod rng;
pub mod runner;
pub mod script;
pub mod sink;
pub mod theme;

pub use config::{Overrides, RunConfig};
pub use content::{PoolKey, Pools};
pub use error::ReverieError;
pub use render::{AnimationKind, Renderer, Stamp};
pub use rng::StoryRng;
pub use runner::Runner;
pub use script::{Beat, BeatKind, MonitorBeat, Phase, TextSource};
pub use sink::OutputSink;
pub use theme::{Tag, TagStyle, Theme};
