use serde::{Deserialize, Serialize};

use crate::{card::Card, network::NodeId, player::PlayerId};

pub type ActionId = usize;

/// A card played from hand. Which of the optional fields must be set depends
/// on the card: placements take an own equipment node, attacks an opponent
/// (and for disabling attacks one of their nodes), a head hunter the
/// classification to steal, a classification the own card to replace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Play {
    pub card: Card,
    pub node: Option<NodeId>,
    pub opponent: Option<PlayerId>,
    pub classification: Option<Card>,
}

impl Play {
    pub fn bare(card: Card) -> Self {
        Play {
            card,
            node: None,
            opponent: None,
            classification: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    EndPhase,
    Trade(Card),
    Play(Play),
    Connect { floating: NodeId, target: NodeId },
    Discard(Card),
    Respond(Card),
    Pass,
}
