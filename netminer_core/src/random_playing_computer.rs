use std::cell::RefCell;

use itertools::Itertools;
use log::debug;
use rand::{seq::SliceRandom, Rng};

use crate::{
    event::Event,
    play::{Action, ActionId},
    player::{Player, PlayerId},
};

/// Observability trail of a computer seat, one immutable entry per decision.
#[derive(Debug, Clone)]
pub struct AiAction {
    pub action: Action,
    /// The responder had no eligible card and passing was the only option.
    pub forced_pass: bool,
}

/// Computer opponent. Prefers building and fighting over ending the phase,
/// but picks randomly within that.
pub struct RandomPlayingComputer {
    name: String,
    thoughts: RefCell<Vec<AiAction>>,
}

impl RandomPlayingComputer {
    pub fn new(id: PlayerId) -> Self {
        RandomPlayingComputer {
            name: format!("Computer {id}"),
            thoughts: RefCell::new(vec![]),
        }
    }

    pub fn thoughts(&self) -> Vec<AiAction> {
        self.thoughts.borrow().clone()
    }
}

impl Player for RandomPlayingComputer {
    fn name(&self) -> &String {
        &self.name
    }

    fn notify(&self, _game_log: &[Event], _players: &[&String]) {}

    fn obtain_action(
        &self,
        _players: &[&String],
        _game_log: &[Event],
        actions: &[Action],
    ) -> ActionId {
        let mut rng = rand::thread_rng();
        let preferred = actions
            .iter()
            .positions(|a| {
                matches!(
                    a,
                    Action::Play(_) | Action::Connect { .. } | Action::Respond(_)
                )
            })
            .collect_vec();
        let chosen = match preferred.choose(&mut rng) {
            Some(&index) => index,
            None => rng.gen_range(0..actions.len()),
        };
        let forced_pass = actions.len() == 1 && actions[0] == Action::Pass;
        debug!("{} chose {:?}", self.name, actions[chosen]);
        self.thoughts.borrow_mut().push(AiAction {
            action: actions[chosen].clone(),
            forced_pass,
        });
        chosen
    }
}
