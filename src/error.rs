//! Error types for the rendering surface and player start-up.

use thiserror::Error;

/// Failure reported by a [`RenderSurface`](crate::surface::RenderSurface).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum SurfaceError {
    #[error("render target must be at least 1x1, got {width}x{height}")]
    EmptyTarget { width: u32, height: u32 },
    #[error("unknown render target {0}")]
    UnknownTarget(usize),
}

/// Malformed `--color-scheme` value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ColorSchemeError {
    #[error("expected 8 colors (r g w o b y x k), got {0}")]
    WrongCount(usize),
    #[error("invalid color {0:?}, expected RRGGBB or RRGGBBAA")]
    InvalidColor(String),
}

/// Failure to bring a player up on a surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum StartError {
    #[error("renderer unavailable")]
    RendererUnavailable(#[from] SurfaceError),
    #[error("player already started")]
    AlreadyStarted,
}
