use serde::{Deserialize, Serialize};

use crate::{card::Card, network::NodeId, phase::NormalPhase, play::Play, player::PlayerId};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Event {
    Play(PlayerId, Play),
    Connect(PlayerId, NodeId, NodeId),
    Trade(PlayerId, Card),
    Discard(PlayerId, Card),
    /// Drawn card is private to the drawing player; the count is the cards
    /// left in the deck.
    PickUp(PlayerId, Option<Card>, usize),
    Phase(PlayerId, NormalPhase),
    /// `None` is a pass.
    BattleResponse(PlayerId, Option<Card>),
    BattleWon(PlayerId),
    ComputersReturned(PlayerId, usize),
    /// From, to, card.
    ClassificationStolen(PlayerId, PlayerId, Card),
    Reshuffle(usize),
    /// Bitcoin gained this score phase and the new total.
    Score(PlayerId, u32, u32),
    Winner(Vec<PlayerId>),
}

#[derive(PartialEq, Clone, Debug)]
pub enum EventVisibility {
    Public,
    Private(PlayerId),
}

pub struct EventEntry {
    pub visibility: EventVisibility,
    pub event: Event,
}
