use game_lobby::GameLobby;
use player::{Player, PlayerId};
use random_playing_computer::RandomPlayingComputer;

pub mod battle;
pub mod card;
pub mod deck;
pub mod error;
pub mod event;
pub mod game_lobby;
mod game_logic;
pub mod game_state;
pub mod network;
pub mod phase;
pub mod play;
pub mod player;
pub mod random_playing_computer;
pub mod rate_limiter;
pub mod utils;

pub const DEFAULT_SEATS: usize = 3;

/// One match of the given player against computer opponents.
pub fn run_game<C, T>(player_constructor: C)
where
    C: FnOnce(PlayerId) -> T,
    T: Player + 'static,
{
    let mut lobby = GameLobby::new();
    lobby.add_player(|| player_constructor(0));
    for id in 1..DEFAULT_SEATS {
        lobby.add_player(|| RandomPlayingComputer::new(id));
    }
    lobby.play_match();
}
