use log::warn;
use rand::seq::SliceRandom;

use crate::{
    deck,
    event::{Event, EventEntry, EventVisibility},
    game_state::GameState,
    play::ActionId,
    player::{Player, PlayerId},
};

pub struct GameLobby {
    players: Vec<Box<dyn Player>>,
}

impl GameLobby {
    pub fn new() -> Self {
        GameLobby { players: vec![] }
    }

    pub fn add_player<C, T>(&mut self, player_constructor: C)
    where
        C: FnOnce() -> T,
        T: Player + 'static,
    {
        let player = player_constructor();
        self.players.push(Box::new(player));
    }

    pub fn player_names(&self) -> Vec<&String> {
        self.players.iter().map(|p| p.name()).collect::<Vec<_>>()
    }

    fn filter_event(log: &[EventEntry], visible_to: Option<PlayerId>) -> Vec<Event> {
        log.iter()
            .map(|e| match e.visibility {
                EventVisibility::Public => e.event.clone(),
                EventVisibility::Private(player) => {
                    if visible_to.is_none() || Some(player) == visible_to {
                        e.event.clone()
                    } else {
                        match e.event {
                            Event::PickUp(p, _, s) => Event::PickUp(p, None, s),
                            _ => e.event.clone(),
                        }
                    }
                }
            })
            .collect()
    }

    pub fn play_match(&mut self) {
        let mut game_log: Vec<EventEntry> = vec![];
        let mut rng = rand::thread_rng();

        let deck = deck::shuffle(&deck::build(), &mut rng);
        self.players.shuffle(&mut rng);

        let mut state = match GameState::new(self.players.len(), deck, &mut game_log) {
            Ok(state) => state,
            Err(e) => {
                warn!("could not start a match: {e}");
                return;
            }
        };

        loop {
            let (players_turn, actions) = state.valid_actions();

            let Some(turn) = players_turn else {
                break;
            };

            let chosen: ActionId = self.players[turn].obtain_action(
                &self.player_names(),
                &GameLobby::filter_event(&game_log, Some(turn)),
                &actions,
            );

            if chosen >= actions.len() {
                continue;
            }
            if let Err(e) = state.handle_action(&actions[chosen], &mut rng, &mut game_log) {
                warn!("rejected action of player {turn}: {e}");
                continue;
            }

            for (i, p) in self.players.iter().enumerate() {
                p.notify(
                    &GameLobby::filter_event(&game_log, Some(i)),
                    &self.player_names(),
                );
            }
        }

        for p in self.players.iter() {
            p.notify(
                &GameLobby::filter_event(&game_log, None),
                &self.player_names(),
            );
        }
    }
}

impl Default for GameLobby {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        event::Event,
        game_lobby::GameLobby,
        play::{Action, ActionId},
        player::Player,
    };

    #[test]
    fn player_names_should_return_list_of_names() {
        let lobby = GameLobby {
            players: vec![
                Box::new(TestPlayer::new("Foo")),
                Box::new(TestPlayer::new("Bar")),
            ],
        };

        assert_eq!(lobby.player_names(), vec!["Foo", "Bar"]);
    }

    // Infra ----------------------------------------------------------------

    pub struct TestPlayer {
        pub name: String,
    }

    impl TestPlayer {
        pub fn new(name: &str) -> Self {
            TestPlayer {
                name: name.to_string(),
            }
        }
    }

    impl Player for TestPlayer {
        fn name(&self) -> &String {
            &self.name
        }

        fn notify(&self, _game_log: &[Event], _players: &[&String]) {}

        fn obtain_action(
            &self,
            _players: &[&String],
            _game_log: &[Event],
            _actions: &[Action],
        ) -> ActionId {
            0
        }
    }
}
