use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::battle::Battle;

/// The regular turn cycle. `Moves` carries the remaining move budget,
/// `Trade` whether the one trade of the turn has been used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum NormalPhase {
    Trade { traded: bool },
    Moves { remaining: u8 },
    Discard,
    Draw,
    Score,
    GameOver,
}

/// A contested action suspends the normal cycle entirely; the machine cannot
/// be in two phases at once, and resolving the battle restores the
/// interrupted moves phase from the budget saved in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Phase {
    Normal(NormalPhase),
    Contested(Battle),
}
