use log::debug;
use rand::Rng;

use crate::{
    battle::{Battle, BattleKind, BattleOutcome},
    card::{Card, CardKind},
    deck,
    error::GameError,
    event::{Event, EventEntry, EventVisibility},
    game_state::{GameState, AUDIT_RETURN_COUNT, HAND_TARGET, MAX_CLASSIFICATIONS, MOVES_PER_TURN, WIN_SCORE},
    network::NodeId,
    phase::{NormalPhase, Phase},
    play::{Action, Play},
    player::PlayerId,
    utils::VecExtensions,
};

impl GameState {
    /// Apply one action for the acting player. Validation runs first and on
    /// any error the match state is left untouched.
    pub fn handle_action<R: Rng>(
        &mut self,
        action: &Action,
        rng: &mut R,
        log: &mut Vec<EventEntry>,
    ) -> Result<(), GameError> {
        self.validate(action)?;
        match action {
            Action::EndPhase => self.end_phase(rng, log),
            Action::Trade(card) => self.handle_trade(*card, rng, log),
            Action::Discard(card) => self.handle_discard(*card, log),
            Action::Connect { floating, target } => self.handle_connect(*floating, *target, log),
            Action::Play(play) => self.handle_play(play, log),
            Action::Respond(card) => self.handle_response(*card, log),
            Action::Pass => self.handle_pass(log),
        }
    }

    fn end_phase<R: Rng>(
        &mut self,
        rng: &mut R,
        log: &mut Vec<EventEntry>,
    ) -> Result<(), GameError> {
        let turn = self.players_turn;
        let phase = match &self.phase {
            Phase::Normal(phase) => *phase,
            Phase::Contested(_) => {
                return Err(GameError::IllegalPhaseAction(
                    "a contested action must resolve first".to_string(),
                ))
            }
        };
        match phase {
            NormalPhase::Trade { .. } => self.enter_phase(
                turn,
                NormalPhase::Moves {
                    remaining: MOVES_PER_TURN,
                },
                log,
            ),
            NormalPhase::Moves { .. } => self.enter_phase(turn, NormalPhase::Discard, log),
            NormalPhase::Discard => {
                if self.players[turn].hand().len() > HAND_TARGET {
                    return Err(GameError::IllegalPhaseAction(format!(
                        "discard down to {HAND_TARGET} cards first"
                    )));
                }
                self.enter_phase(turn, NormalPhase::Draw, log);
                let missing = HAND_TARGET.saturating_sub(self.players[turn].hand().len());
                self.draw_cards(turn, missing, rng, log);
            }
            NormalPhase::Draw => {
                self.enter_phase(turn, NormalPhase::Score, log);
                let gained = self.players[turn].network().connected_computers() as u32;
                self.players[turn].add_score(gained);
                log.push(EventEntry {
                    visibility: EventVisibility::Public,
                    event: Event::Score(turn, gained, self.players[turn].score()),
                });
                debug!("player {turn} mined {gained} bitcoin");
            }
            NormalPhase::Score => {
                let winners: Vec<PlayerId> = self
                    .players
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.score() >= WIN_SCORE)
                    .map(|(id, _)| id)
                    .collect();
                if winners.is_empty() {
                    self.players_turn = (turn + 1) % self.players.len();
                    self.enter_phase(
                        self.players_turn,
                        NormalPhase::Trade { traded: false },
                        log,
                    );
                } else {
                    self.enter_phase(turn, NormalPhase::GameOver, log);
                    log.push(EventEntry {
                        visibility: EventVisibility::Public,
                        event: Event::Winner(winners),
                    });
                }
            }
            NormalPhase::GameOver => {
                return Err(GameError::IllegalPhaseAction("the game is over".to_string()))
            }
        }
        Ok(())
    }

    fn enter_phase(&mut self, player: PlayerId, phase: NormalPhase, log: &mut Vec<EventEntry>) {
        self.phase = Phase::Normal(phase);
        log.push(EventEntry {
            visibility: EventVisibility::Public,
            event: Event::Phase(player, phase),
        });
    }

    fn handle_trade<R: Rng>(
        &mut self,
        card: Card,
        rng: &mut R,
        log: &mut Vec<EventEntry>,
    ) -> Result<(), GameError> {
        let turn = self.players_turn;
        let traded = self.players[turn]
            .hand_mut()
            .remove_first_where(|&c| c == card)
            .ok_or_else(|| GameError::InvalidTarget("card is not in hand".to_string()))?;
        self.discard.push(traded);
        log.push(EventEntry {
            visibility: EventVisibility::Public,
            event: Event::Trade(turn, traded),
        });
        self.draw_cards(turn, 1, rng, log);
        self.phase = Phase::Normal(NormalPhase::Trade { traded: true });
        Ok(())
    }

    fn handle_discard(&mut self, card: Card, log: &mut Vec<EventEntry>) -> Result<(), GameError> {
        let turn = self.players_turn;
        let discarded = self.players[turn]
            .hand_mut()
            .remove_first_where(|&c| c == card)
            .ok_or_else(|| GameError::InvalidTarget("card is not in hand".to_string()))?;
        self.discard.push(discarded);
        log.push(EventEntry {
            visibility: EventVisibility::Public,
            event: Event::Discard(turn, discarded),
        });
        Ok(())
    }

    fn handle_connect(
        &mut self,
        floating: NodeId,
        target: NodeId,
        log: &mut Vec<EventEntry>,
    ) -> Result<(), GameError> {
        let turn = self.players_turn;
        self.players[turn].network_mut().connect(floating, target)?;
        log.push(EventEntry {
            visibility: EventVisibility::Public,
            event: Event::Connect(turn, floating, target),
        });
        Ok(())
    }

    fn handle_play(&mut self, play: &Play, log: &mut Vec<EventEntry>) -> Result<(), GameError> {
        let turn = self.players_turn;
        let remaining = match self.phase {
            Phase::Normal(NormalPhase::Moves { remaining }) if remaining > 0 => remaining,
            _ => {
                return Err(GameError::IllegalPhaseAction(
                    "cards are played in the moves phase".to_string(),
                ))
            }
        };
        match play.card {
            Card::Switch => {
                self.players[turn].network_mut().play_switch();
            }
            Card::CableTwo | Card::CableThree => {
                self.players[turn]
                    .network_mut()
                    .play_cable(play.card, play.node)?;
            }
            Card::Computer => {
                self.players[turn].network_mut().play_computer(play.node)?;
            }
            Card::Hacked | Card::NewHire | Card::PowerOutage => {
                let opponent = self.opponent_of(play)?;
                let node = play.node.ok_or_else(|| {
                    GameError::InvalidTarget("choose a piece of equipment to attack".to_string())
                })?;
                let issue = play.card.issue().ok_or_else(|| {
                    GameError::InvalidTarget("that card opens no issue".to_string())
                })?;
                self.players[opponent].network_mut().disable(node, issue)?;
            }
            Card::Audit | Card::HeadHunter => return self.start_battle(play, remaining, log),
            Card::Patch | Card::Orientation | Card::Generator | Card::Helpdesk => {
                let node = play.node.ok_or_else(|| {
                    GameError::InvalidTarget("choose the equipment to repair".to_string())
                })?;
                self.players[turn].network_mut().resolve(node, play.card)?;
            }
            Card::Engineer | Card::Architect => {
                if let Some(existing) = play.classification {
                    let replaced = self.players[turn]
                        .classifications_mut()
                        .remove_first_where(|&c| c == existing)
                        .ok_or_else(|| {
                            GameError::InvalidTarget(
                                "no such classification to replace".to_string(),
                            )
                        })?;
                    self.discard.push(replaced);
                }
                self.players[turn].classifications_mut().push(play.card);
            }
        }
        self.spend_card(turn, play.card)?;
        self.phase = Phase::Normal(NormalPhase::Moves {
            remaining: remaining - 1,
        });
        log.push(EventEntry {
            visibility: EventVisibility::Public,
            event: Event::Play(turn, play.clone()),
        });
        Ok(())
    }

    fn start_battle(
        &mut self,
        play: &Play,
        remaining: u8,
        log: &mut Vec<EventEntry>,
    ) -> Result<(), GameError> {
        let turn = self.players_turn;
        let opponent = self.opponent_of(play)?;
        let kind = match play.card {
            Card::Audit => BattleKind::Audit {
                computers_to_return: AUDIT_RETURN_COUNT,
            },
            Card::HeadHunter => BattleKind::HeadHunter {
                classification: play.classification.ok_or_else(|| {
                    GameError::InvalidTarget("choose a classification to steal".to_string())
                })?,
            },
            _ => {
                return Err(GameError::InvalidTarget(
                    "not a contested attack".to_string(),
                ))
            }
        };
        self.spend_card(turn, play.card)?;
        log.push(EventEntry {
            visibility: EventVisibility::Public,
            event: Event::Play(turn, play.clone()),
        });
        self.phase = Phase::Contested(Battle::new(kind, turn, opponent, remaining - 1));
        debug!("player {turn} opened a contested action against player {opponent}");
        Ok(())
    }

    fn handle_response(&mut self, card: Card, log: &mut Vec<EventEntry>) -> Result<(), GameError> {
        let battle = match &self.phase {
            Phase::Contested(battle) => battle.clone(),
            Phase::Normal(_) => {
                return Err(GameError::IllegalPhaseAction(
                    "no contested action is in progress".to_string(),
                ))
            }
        };
        let responder = battle.responder();
        let mut battle = battle;
        battle.push_response(responder, card)?;
        let spent = self.players[responder]
            .hand_mut()
            .remove_first_where(|&c| c == card)
            .ok_or_else(|| GameError::IllegalResponse("no eligible card in hand".to_string()))?;
        self.discard.push(spent);
        log.push(EventEntry {
            visibility: EventVisibility::Public,
            event: Event::BattleResponse(responder, Some(card)),
        });
        self.phase = Phase::Contested(battle);
        Ok(())
    }

    fn handle_pass(&mut self, log: &mut Vec<EventEntry>) -> Result<(), GameError> {
        let battle = match &self.phase {
            Phase::Contested(battle) => battle.clone(),
            Phase::Normal(_) => {
                return Err(GameError::IllegalPhaseAction(
                    "no contested action is in progress".to_string(),
                ))
            }
        };
        log.push(EventEntry {
            visibility: EventVisibility::Public,
            event: Event::BattleResponse(battle.responder(), None),
        });
        if battle.outcome_on_pass() == BattleOutcome::AttackerWins {
            self.apply_battle_effect(&battle, log);
        }
        log.push(EventEntry {
            visibility: EventVisibility::Public,
            event: Event::BattleWon(battle.winner_on_pass()),
        });
        let resumed = NormalPhase::Moves {
            remaining: battle.saved_budget,
        };
        self.enter_phase(self.players_turn, resumed, log);
        debug!(
            "contested action won by player {}, resuming moves",
            battle.winner_on_pass()
        );
        Ok(())
    }

    fn apply_battle_effect(&mut self, battle: &Battle, log: &mut Vec<EventEntry>) {
        match battle.kind {
            BattleKind::Audit { computers_to_return } => {
                let ids = self.players[battle.defender]
                    .network()
                    .connected_computer_ids();
                let start = ids.len().saturating_sub(computers_to_return);
                let mut returned = 0;
                for &id in &ids[start..] {
                    if let Ok(card) = self.players[battle.defender]
                        .network_mut()
                        .remove_computer(id)
                    {
                        self.players[battle.defender].hand_mut().push(card);
                        returned += 1;
                    }
                }
                log.push(EventEntry {
                    visibility: EventVisibility::Public,
                    event: Event::ComputersReturned(battle.defender, returned),
                });
            }
            BattleKind::HeadHunter { classification } => {
                if let Some(card) = self.players[battle.defender]
                    .classifications_mut()
                    .remove_first_where(|&c| c == classification)
                {
                    if self.players[battle.attacker].classifications().len() >= MAX_CLASSIFICATIONS
                    {
                        let oldest = self.players[battle.attacker].classifications_mut().remove(0);
                        self.discard.push(oldest);
                    }
                    self.players[battle.attacker].classifications_mut().push(card);
                    log.push(EventEntry {
                        visibility: EventVisibility::Public,
                        event: Event::ClassificationStolen(battle.defender, battle.attacker, card),
                    });
                }
            }
        }
    }

    /// Remove the played card from hand; attacks and resolutions go to the
    /// discard pile, equipment and classifications live on in play.
    fn spend_card(&mut self, player: PlayerId, card: Card) -> Result<(), GameError> {
        let spent = self.players[player]
            .hand_mut()
            .remove_first_where(|&c| c == card)
            .ok_or_else(|| GameError::InvalidTarget("card is not in hand".to_string()))?;
        match spent.kind() {
            CardKind::Attack | CardKind::Resolution => self.discard.push(spent),
            CardKind::Equipment | CardKind::Classification => {}
        }
        Ok(())
    }

    /// Draw up to `n` cards, reshuffling the discard pile into the deck when
    /// it runs dry. Stops short if both piles are empty.
    pub(crate) fn draw_cards<R: Rng>(
        &mut self,
        player: PlayerId,
        n: usize,
        rng: &mut R,
        log: &mut Vec<EventEntry>,
    ) {
        for _ in 0..n {
            if self.deck.is_empty() {
                if self.discard.is_empty() {
                    break;
                }
                let pile: Vec<Card> = self.discard.drain(..).collect();
                self.deck = deck::shuffle(&pile, rng);
                log.push(EventEntry {
                    visibility: EventVisibility::Public,
                    event: Event::Reshuffle(self.deck.len()),
                });
                debug!("reshuffled {} discarded cards into the deck", self.deck.len());
            }
            if let Ok((dealt, rest)) = deck::deal(&self.deck, 1) {
                self.deck = rest;
                if let Some(&card) = dealt.first() {
                    self.players[player].hand_mut().push(card);
                    log.push(EventEntry {
                        visibility: EventVisibility::Private(player),
                        event: Event::PickUp(player, Some(card), self.deck.len()),
                    });
                }
            }
        }
    }
}
