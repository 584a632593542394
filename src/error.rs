use thiserror::Error;

/// Errors raised while loading or validating an [`AnimationConfig`](crate::AnimationConfig).
///
/// The frame pipeline itself never fails; degenerate input produces an empty frame.
#[derive(Error, Debug)]
pub enum Error {
    #[error("config file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(String),

    #[error("invalid range for `{field}`: min {min} is greater than max {max}")]
    InvalidRange { field: &'static str, min: f32, max: f32 },

    #[error("`{field}` must be positive")]
    NonPositive { field: &'static str },

    #[error("`{field}` must be finite")]
    NonFinite { field: &'static str },

    #[error("`{field}` must lie in [0, 1], got {value}")]
    OutOfUnitRange { field: &'static str, value: f32 },

    #[error("spawn interval for the {effect} effect is zero")]
    ZeroInterval { effect: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
