use thiserror::Error;

/// Validation failures of the engine. All of them are local: the action is
/// rejected and the match state is left unchanged, so the caller can surface
/// a message and let the player retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("invalid target: {0}")]
    InvalidTarget(String),
    #[error("capacity exceeded: {0}")]
    CapacityExceeded(String),
    #[error("not enough cards: requested {requested}, available {available}")]
    InsufficientCards { requested: usize, available: usize },
    #[error("not legal now: {0}")]
    IllegalPhaseAction(String),
    #[error("illegal response: {0}")]
    IllegalResponse(String),
}
