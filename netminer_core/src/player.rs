use crate::{
    event::Event,
    play::{Action, ActionId},
};

pub type PlayerId = usize;

/// The one seam between the engine and whoever drives a seat, human or
/// computer. `obtain_action` picks an index into the valid actions.
pub trait Player {
    fn name(&self) -> &String;
    fn notify(&self, game_log: &[Event], players: &[&String]);
    fn obtain_action(&self, players: &[&String], game_log: &[Event], actions: &[Action])
        -> ActionId;
}
