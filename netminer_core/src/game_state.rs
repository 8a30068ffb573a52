use itertools::{iproduct, Itertools};

use crate::{
    card::{Card, CardKind},
    deck,
    error::GameError,
    event::{Event, EventEntry, EventVisibility},
    network::PlayerNetwork,
    phase::{NormalPhase, Phase},
    play::{Action, Play},
    player::PlayerId,
};

pub const MOVES_PER_TURN: u8 = 3;
pub const HAND_TARGET: usize = 6;
pub const WIN_SCORE: u32 = 15;
pub const AUDIT_RETURN_COUNT: usize = 2;
pub const MAX_CLASSIFICATIONS: usize = 2;

pub struct PlayerState {
    hand: Vec<Card>,
    network: PlayerNetwork,
    classifications: Vec<Card>,
    score: u32,
}

impl PlayerState {
    pub fn new() -> Self {
        PlayerState {
            hand: vec![],
            network: PlayerNetwork::new(),
            classifications: vec![],
            score: 0,
        }
    }

    pub fn hand(&self) -> &Vec<Card> {
        &self.hand
    }

    pub fn hand_mut(&mut self) -> &mut Vec<Card> {
        &mut self.hand
    }

    pub fn network(&self) -> &PlayerNetwork {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut PlayerNetwork {
        &mut self.network
    }

    pub fn classifications(&self) -> &Vec<Card> {
        &self.classifications
    }

    pub fn classifications_mut(&mut self) -> &mut Vec<Card> {
        &mut self.classifications
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn add_score(&mut self, gained: u32) {
        self.score += gained;
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

pub struct GameState {
    pub players: Vec<PlayerState>,
    pub deck: Vec<Card>,
    pub discard: Vec<Card>,
    pub phase: Phase,
    pub players_turn: PlayerId,
}

impl GameState {
    pub fn new(
        player_count: usize,
        deck: Vec<Card>,
        log: &mut Vec<EventEntry>,
    ) -> Result<Self, GameError> {
        let mut state = GameState {
            players: vec![],
            deck,
            discard: vec![],
            phase: Phase::Normal(NormalPhase::Trade { traded: false }),
            players_turn: 0,
        };
        for id in 0..player_count {
            state.players.push(PlayerState::new());
            let (dealt, rest) = deck::deal(&state.deck, HAND_TARGET)?;
            state.deck = rest;
            for card in dealt {
                log.push(EventEntry {
                    visibility: EventVisibility::Private(id),
                    event: Event::PickUp(id, Some(card), state.deck.len()),
                });
                state.players[id].hand_mut().push(card);
            }
        }
        log.push(EventEntry {
            visibility: EventVisibility::Public,
            event: Event::Phase(0, NormalPhase::Trade { traded: false }),
        });
        Ok(state)
    }

    /// Who may act right now: the responder of a running battle, otherwise
    /// the player whose turn it is. `None` once the game is over.
    pub fn acting_player(&self) -> Option<PlayerId> {
        match &self.phase {
            Phase::Normal(NormalPhase::GameOver) => None,
            Phase::Normal(_) => Some(self.players_turn),
            Phase::Contested(battle) => Some(battle.responder()),
        }
    }

    pub fn valid_actions(&self) -> (Option<PlayerId>, Vec<Action>) {
        let actions = self
            .possible_actions()
            .into_iter()
            .filter(|a| self.is_valid(a))
            .collect_vec();
        if actions.is_empty() {
            (None, actions)
        } else {
            (self.acting_player(), actions)
        }
    }

    pub fn possible_actions(&self) -> Vec<Action> {
        match &self.phase {
            Phase::Normal(NormalPhase::GameOver) => vec![],
            Phase::Contested(battle) => {
                vec![Action::Pass, Action::Respond(battle.response_card())]
            }
            Phase::Normal(NormalPhase::Trade { .. }) => std::iter::once(Action::EndPhase)
                .chain(self.hand_unique().into_iter().map(Action::Trade))
                .collect(),
            Phase::Normal(NormalPhase::Discard) => std::iter::once(Action::EndPhase)
                .chain(self.hand_unique().into_iter().map(Action::Discard))
                .collect(),
            Phase::Normal(NormalPhase::Draw) | Phase::Normal(NormalPhase::Score) => {
                vec![Action::EndPhase]
            }
            Phase::Normal(NormalPhase::Moves { .. }) => self.possible_moves(),
        }
    }

    fn possible_moves(&self) -> Vec<Action> {
        let net = self.players[self.players_turn].network();
        let mut actions = vec![Action::EndPhase];
        for card in self.hand_unique() {
            match card {
                Card::Switch => actions.push(Action::Play(Play::bare(card))),
                Card::CableTwo | Card::CableThree => {
                    actions.push(Action::Play(Play::bare(card)));
                    for switch in net.switches() {
                        actions.push(Action::Play(Play {
                            node: Some(switch),
                            ..Play::bare(card)
                        }));
                    }
                }
                Card::Computer => {
                    actions.push(Action::Play(Play::bare(card)));
                    for cable in net.cables() {
                        actions.push(Action::Play(Play {
                            node: Some(cable),
                            ..Play::bare(card)
                        }));
                    }
                }
                Card::Hacked | Card::NewHire | Card::PowerOutage => {
                    for opponent in self.other_players() {
                        for node in self.players[opponent].network().ids() {
                            actions.push(Action::Play(Play {
                                node: Some(node),
                                opponent: Some(opponent),
                                ..Play::bare(card)
                            }));
                        }
                    }
                }
                Card::Audit => {
                    for opponent in self.other_players() {
                        actions.push(Action::Play(Play {
                            opponent: Some(opponent),
                            ..Play::bare(card)
                        }));
                    }
                }
                Card::HeadHunter => {
                    for opponent in self.other_players() {
                        for &classification in self.players[opponent].classifications() {
                            actions.push(Action::Play(Play {
                                opponent: Some(opponent),
                                classification: Some(classification),
                                ..Play::bare(card)
                            }));
                        }
                    }
                }
                Card::Patch | Card::Orientation | Card::Generator | Card::Helpdesk => {
                    for node in net.disabled() {
                        actions.push(Action::Play(Play {
                            node: Some(node),
                            ..Play::bare(card)
                        }));
                    }
                }
                Card::Engineer | Card::Architect => {
                    actions.push(Action::Play(Play::bare(card)));
                    for &existing in self.players[self.players_turn].classifications() {
                        actions.push(Action::Play(Play {
                            classification: Some(existing),
                            ..Play::bare(card)
                        }));
                    }
                }
            }
        }
        for (floating, target) in iproduct!(net.floating(), net.ids()) {
            actions.push(Action::Connect { floating, target });
        }
        actions
    }

    pub fn is_valid(&self, action: &Action) -> bool {
        self.validate(action).is_ok()
    }

    pub fn validate(&self, action: &Action) -> Result<(), GameError> {
        match &self.phase {
            Phase::Contested(battle) => match action {
                Action::Pass => Ok(()),
                Action::Respond(card) => {
                    if *card != battle.response_card() {
                        return Err(GameError::IllegalResponse(format!(
                            "this battle is answered with {}",
                            battle.response_card()
                        )));
                    }
                    if !self.players[battle.responder()].hand().contains(card) {
                        return Err(GameError::IllegalResponse(
                            "no eligible card in hand".to_string(),
                        ));
                    }
                    Ok(())
                }
                _ => Err(GameError::IllegalPhaseAction(
                    "a contested action is being resolved".to_string(),
                )),
            },
            Phase::Normal(phase) => self.validate_normal(*phase, action),
        }
    }

    fn validate_normal(&self, phase: NormalPhase, action: &Action) -> Result<(), GameError> {
        let hand = self.players[self.players_turn].hand();
        match action {
            Action::EndPhase => match phase {
                NormalPhase::GameOver => {
                    Err(GameError::IllegalPhaseAction("the game is over".to_string()))
                }
                NormalPhase::Discard if hand.len() > HAND_TARGET => Err(
                    GameError::IllegalPhaseAction(format!("discard down to {HAND_TARGET} cards first")),
                ),
                _ => Ok(()),
            },
            Action::Trade(card) => match phase {
                NormalPhase::Trade { traded: true } => Err(GameError::IllegalPhaseAction(
                    "only one trade per turn".to_string(),
                )),
                NormalPhase::Trade { traded: false } => {
                    if hand.contains(card) {
                        Ok(())
                    } else {
                        Err(GameError::InvalidTarget("card is not in hand".to_string()))
                    }
                }
                _ => Err(GameError::IllegalPhaseAction(
                    "cards are traded in the trade phase".to_string(),
                )),
            },
            Action::Discard(card) => match phase {
                NormalPhase::Discard => {
                    if hand.contains(card) {
                        Ok(())
                    } else {
                        Err(GameError::InvalidTarget("card is not in hand".to_string()))
                    }
                }
                _ => Err(GameError::IllegalPhaseAction(
                    "cards are discarded in the discard phase".to_string(),
                )),
            },
            Action::Connect { floating, target } => match phase {
                NormalPhase::Moves { .. } => self.players[self.players_turn]
                    .network()
                    .validate_connect(*floating, *target),
                _ => Err(GameError::IllegalPhaseAction(
                    "equipment is connected in the moves phase".to_string(),
                )),
            },
            Action::Play(play) => match phase {
                NormalPhase::Moves { remaining: 0 } => Err(GameError::IllegalPhaseAction(
                    "no moves remaining".to_string(),
                )),
                NormalPhase::Moves { .. } => {
                    if !hand.contains(&play.card) {
                        return Err(GameError::InvalidTarget("card is not in hand".to_string()));
                    }
                    self.validate_play(play)
                }
                _ => Err(GameError::IllegalPhaseAction(
                    "cards are played in the moves phase".to_string(),
                )),
            },
            Action::Respond(_) | Action::Pass => Err(GameError::IllegalPhaseAction(
                "no contested action is in progress".to_string(),
            )),
        }
    }

    fn validate_play(&self, play: &Play) -> Result<(), GameError> {
        let net = self.players[self.players_turn].network();
        match play.card {
            Card::Switch => {
                self.expect_untargeted(play)?;
                if play.node.is_some() {
                    return Err(GameError::InvalidTarget(
                        "a switch takes no target".to_string(),
                    ));
                }
            }
            Card::CableTwo | Card::CableThree => {
                self.expect_untargeted(play)?;
                if let Some(switch) = play.node {
                    net.validate_cable_target(switch)?;
                }
            }
            Card::Computer => {
                self.expect_untargeted(play)?;
                if let Some(cable) = play.node {
                    net.validate_computer_target(cable)?;
                }
            }
            Card::Hacked | Card::NewHire | Card::PowerOutage => {
                let opponent = self.opponent_of(play)?;
                let node = play.node.ok_or_else(|| {
                    GameError::InvalidTarget("choose a piece of equipment to attack".to_string())
                })?;
                self.players[opponent].network().validate_disable(node)?;
            }
            Card::Audit => {
                self.opponent_of(play)?;
            }
            Card::HeadHunter => {
                let opponent = self.opponent_of(play)?;
                let target = play.classification.ok_or_else(|| {
                    GameError::InvalidTarget("choose a classification to steal".to_string())
                })?;
                if target.kind() != CardKind::Classification
                    || !self.players[opponent].classifications().contains(&target)
                {
                    return Err(GameError::InvalidTarget(
                        "opponent does not hold that classification".to_string(),
                    ));
                }
            }
            Card::Patch | Card::Orientation | Card::Generator | Card::Helpdesk => {
                let node = play.node.ok_or_else(|| {
                    GameError::InvalidTarget("choose the equipment to repair".to_string())
                })?;
                net.validate_resolve(node, play.card)?;
            }
            Card::Engineer | Card::Architect => {
                let zone = self.players[self.players_turn].classifications();
                match play.classification {
                    Some(existing) => {
                        if !zone.contains(&existing) {
                            return Err(GameError::InvalidTarget(
                                "no such classification to replace".to_string(),
                            ));
                        }
                    }
                    None => {
                        if zone.len() >= MAX_CLASSIFICATIONS {
                            return Err(GameError::CapacityExceeded(format!(
                                "at most {MAX_CLASSIFICATIONS} classifications at a time"
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn expect_untargeted(&self, play: &Play) -> Result<(), GameError> {
        if play.opponent.is_some() || play.classification.is_some() {
            return Err(GameError::InvalidTarget(format!(
                "{} takes neither opponent nor classification",
                play.card
            )));
        }
        Ok(())
    }

    pub(crate) fn opponent_of(&self, play: &Play) -> Result<PlayerId, GameError> {
        let opponent = play
            .opponent
            .ok_or_else(|| GameError::InvalidTarget("choose an opponent".to_string()))?;
        if opponent == self.players_turn || opponent >= self.players.len() {
            return Err(GameError::InvalidTarget("no such opponent".to_string()));
        }
        Ok(opponent)
    }

    pub fn other_players(&self) -> Vec<PlayerId> {
        (0..self.players.len())
            .filter(|&id| id != self.players_turn)
            .collect()
    }

    fn hand_unique(&self) -> Vec<Card> {
        self.players[self.players_turn]
            .hand()
            .iter()
            .copied()
            .unique()
            .collect_vec()
    }
}
