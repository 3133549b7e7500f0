use thiserror::Error;
use wedlot_core::WedlotError;

pub type Result<T> = std::result::Result<T, DrawError>;

#[derive(Error, Debug)]
pub enum DrawError {
    #[error("The name pool is empty, add names first")]
    EmptyPool,

    #[error("All {pool_size} participants have already won; reset winners to draw again")]
    PoolExhausted { pool_size: usize },

    #[error("Need at least two remaining names, only {remaining} left")]
    InsufficientRemaining { remaining: usize },

    #[error("Wedlot core error: {0}")]
    Core(#[from] WedlotError),
}

impl DrawError {
    /// Expected conditions an operator can act on, as opposed to failures.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, DrawError::Core(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DrawError::EmptyPool => "emptyPool",
            DrawError::PoolExhausted { .. } => "poolExhausted",
            DrawError::InsufficientRemaining { .. } => "insufficientRemaining",
            DrawError::Core(_) => "storage",
        }
    }
}
