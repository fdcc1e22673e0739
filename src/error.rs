//! Level generation failures.
//!
//! Generation either yields a complete [`Level`](crate::level::Level) or one of these errors;
//! a half-built level is never handed to the simulation.

/// What a bounded retry loop was trying to produce when it gave up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attempt {
    PlayerStart,
    Key,
    AgentSpawn,
    RepairPass,
}

impl std::fmt::Display for Attempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Attempt::PlayerStart => "player start",
            Attempt::Key => "key position",
            Attempt::AgentSpawn => "agent spawn",
            Attempt::RepairPass => "connectivity repair",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum GenerationError {
    /// Requested grid is too small to carve a maze into.
    #[error("grid {width}x{height} is below the minimum side of {min}")]
    InvalidDimensions {
        width: usize,
        height: usize,
        min: usize,
    },

    /// Levels are numbered from 1 up to `MAX_LEVEL_INDEX`.
    #[error("level index {0} is invalid, levels run from 1 to {max}", max = crate::constants::MAX_LEVEL_INDEX)]
    InvalidLevelIndex(u32),

    #[error("room probability {0} is outside [0, 1]")]
    InvalidProbability(f64),

    /// A bounded retry loop ran out of budget.
    #[error("gave up on {what} after {attempts} attempts")]
    GenerationExhausted { what: Attempt, attempts: u32 },

    /// Repair finished but the open cells still form several components. This is a bug.
    #[error("connectivity repair left {components} components")]
    ConnectivityInvariantViolation { components: usize },
}

pub type Result<T> = std::result::Result<T, GenerationError>;
