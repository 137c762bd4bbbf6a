use crate::config::{PlaybackMode, PlayerConfig};
use crate::cube::ColorScheme;

/// Interactive 3x3x3 cube player
///
/// Opens a window with the cube. Drag a layer to turn it, drag the
/// background to reorient the cube, or type an algorithm and press Play.
#[derive(Debug, clap::Parser)]
#[command(version)]
pub(crate) struct Args {
    /// Sticker pattern: 54 color codes (r g w o b y x k) in F R D B L U face
    /// order, or a preset name (CROSS, FL, F2L, SHORTCUT, OLL, PLL, FULL).
    #[arg(long)]
    pub stickers: Option<String>,

    /// Algorithm shown to the user and, in solver mode, undone on reset.
    #[arg(long, default_value = "")]
    pub alg: String,

    /// Moves applied on reset after the algorithm.
    #[arg(long, default_value = "")]
    pub init_script: String,

    /// How the initial state is derived from the algorithm.
    #[arg(long, value_enum, default_value_t = PlaybackMode::Solver)]
    pub mode: PlaybackMode,

    /// Whether layers can be turned with the mouse.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub playable: bool,

    /// Number of moves in a scramble; random between 10 and 19 if omitted.
    #[arg(long)]
    pub scramble_length: Option<usize>,

    /// Seed for deterministic scrambles.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Sticker colors: 8 hex values (RRGGBB or RRGGBBAA) for r g w o b y x k.
    #[arg(long)]
    pub color_scheme: Option<ColorScheme>,
}

impl From<Args> for PlayerConfig {
    fn from(args: Args) -> Self {
        let defaults = PlayerConfig::default();
        Self {
            stickers: args.stickers.unwrap_or(defaults.stickers),
            alg: args.alg,
            init_script: args.init_script,
            mode: args.mode,
            playable: args.playable,
            scramble_length: args.scramble_length,
            seed: args.seed,
            color_scheme: args.color_scheme.unwrap_or(defaults.color_scheme),
        }
    }
}
