use thiserror::Error;

/// Errors surfaced by the motion core. Both are configuration problems; nothing in the
/// per-tick path can fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("pixels per tile must be a positive, finite number (got {0})")]
    InvalidPixelsPerTile(f32),

    #[error("unknown motion state \"{0}\"")]
    UnknownState(String),
}
