//! Player configuration.

use crate::cube::ColorScheme;
use crate::notation::Algorithm;
use crate::pattern;

/// How the state shown after a reset is derived.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum PlaybackMode {
    /// Start from the state the algorithm solves: its inverse is applied
    #[default]
    Solver,
    /// Start from the init script applied to a solved cube
    Plain,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PlayerConfig {
    /// Raw pattern or preset name
    pub(crate) stickers: String,
    pub(crate) alg: String,
    pub(crate) init_script: String,
    pub(crate) mode: PlaybackMode,
    pub(crate) playable: bool,
    pub(crate) scramble_length: Option<usize>,
    pub(crate) seed: Option<u64>,
    pub(crate) color_scheme: ColorScheme,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            stickers: pattern::SOLVED.to_string(),
            alg: String::new(),
            init_script: String::new(),
            mode: PlaybackMode::Solver,
            playable: true,
            scramble_length: None,
            seed: None,
            color_scheme: ColorScheme::default(),
        }
    }
}

impl PlayerConfig {
    /// Sticker pattern with presets expanded.
    pub(crate) fn sticker_pattern(&self) -> &str {
        pattern::resolve(&self.stickers)
    }

    /// Moves played, in initializing mode, on every reset.
    pub(crate) fn setup_moves(&self) -> Algorithm {
        match self.mode {
            PlaybackMode::Solver => Algorithm::parse(&format!("{}{}", self.alg, self.init_script)).inverse(),
            PlaybackMode::Plain => Algorithm::parse(&self.init_script),
        }
    }
}
