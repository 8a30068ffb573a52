use serde::{Deserialize, Serialize};

use crate::{card::Card, error::GameError, player::PlayerId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleKind {
    Audit { computers_to_return: usize },
    HeadHunter { classification: Card },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    AttackerWins,
    DefenderWins,
}

/// A contested action in flight: an alternating block/counter chain between
/// the attacker and the defender. Turn to respond follows chain parity, the
/// first pass ends the battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Battle {
    pub kind: BattleKind,
    pub attacker: PlayerId,
    pub defender: PlayerId,
    pub chain: Vec<(PlayerId, Card)>,
    /// Move budget of the interrupted moves phase, restored on resolution.
    pub saved_budget: u8,
}

impl Battle {
    pub fn new(kind: BattleKind, attacker: PlayerId, defender: PlayerId, saved_budget: u8) -> Self {
        Battle {
            kind,
            attacker,
            defender,
            chain: vec![],
            saved_budget,
        }
    }

    /// Whose turn it is to block, counter or pass. Even chain length means
    /// the defender, odd the attacker.
    pub fn responder(&self) -> PlayerId {
        if self.chain.len() % 2 == 0 {
            self.defender
        } else {
            self.attacker
        }
    }

    /// The one card family that blocks or counters in this battle.
    pub fn response_card(&self) -> Card {
        match self.kind {
            BattleKind::Audit { .. } => Card::Hacked,
            BattleKind::HeadHunter { .. } => Card::HeadHunter,
        }
    }

    pub fn push_response(&mut self, player: PlayerId, card: Card) -> Result<(), GameError> {
        if player != self.responder() {
            return Err(GameError::IllegalResponse(
                "it is not your turn to respond".to_string(),
            ));
        }
        if card != self.response_card() {
            return Err(GameError::IllegalResponse(format!(
                "this battle is answered with {}",
                self.response_card()
            )));
        }
        self.chain.push((player, card));
        Ok(())
    }

    /// Terminal outcome if the current responder passes. A defender pass
    /// concedes the attack, an attacker pass abandons it.
    pub fn outcome_on_pass(&self) -> BattleOutcome {
        if self.chain.len() % 2 == 0 {
            BattleOutcome::AttackerWins
        } else {
            BattleOutcome::DefenderWins
        }
    }

    pub fn winner_on_pass(&self) -> PlayerId {
        match self.outcome_on_pass() {
            BattleOutcome::AttackerWins => self.attacker,
            BattleOutcome::DefenderWins => self.defender,
        }
    }
}
