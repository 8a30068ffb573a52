use std::{
    io::{self, BufRead, Write},
    str::FromStr,
};

use itertools::Itertools;

use netminer_core::{
    card::Card,
    event::Event,
    play::{Action, ActionId, Play},
    player::{Player, PlayerId},
};

static RULES: &str = "
*** Netminer ***
Build a computer network and mine bitcoin with it. A switch is connected to the internet by
itself, cables hang off switches and computers hang off cables. Every score phase each of your
computers with a working path to a switch mines one bitcoin; the first player to reach the
target total wins.
A turn runs trade -> moves -> discard -> draw -> score. You may trade one card back into the
deck, then spend three moves placing equipment, attacking or repairing. Connecting equipment
you already placed is free. Attack cards open issues that disable equipment until a matching
resolution card clears them (a Helpdesk clears anything). Audits and Head Hunters are contested:
the defender may block, the attacker may counter, and the first pass settles it.
Press c to see what each card does.";

#[derive(Debug, PartialEq)]
enum CliAction {
    Quit,
    Rules,
    CardEffects,
    Choice(ActionId),
}

#[derive(Debug, PartialEq, Eq)]
struct ParseActionError;

impl FromStr for CliAction {
    type Err = ParseActionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "q" => Ok(CliAction::Quit),
            "r" => Ok(CliAction::Rules),
            "c" => Ok(CliAction::CardEffects),
            _ => {
                if let Ok(choice) = usize::from_str(s) {
                    Ok(CliAction::Choice(choice))
                } else {
                    Err(ParseActionError)
                }
            }
        }
    }
}

pub struct CliPlayer {
    pub name: String,
}

impl CliPlayer {
    pub fn new(_id: PlayerId) -> CliPlayer {
        print!("Please Enter Name: ");
        io::stdout().flush().unwrap();

        let name = match io::stdin().lock().lines().next() {
            Some(Ok(line)) => line,
            _ => "You".to_string(),
        };

        CliPlayer { name }
    }

    fn query_user(&self, actions: &[Action], players: &[&String]) -> CliAction {
        let mut op = None;
        print!("\nChoose your action:\n");
        while op.is_none() {
            println!("- [q]: quit");
            println!("- [r]: display rules");
            println!("- [c]: display card effects");
            for (i, action) in actions.iter().enumerate() {
                println!("- [{}]: {}", i, self.format_action(action, players));
            }
            print!(">");
            io::stdout().flush().unwrap();
            if let Some(Ok(line)) = io::stdin().lock().lines().next() {
                if let Ok(s) = CliAction::from_str(&line) {
                    op = Some(s);
                }
            }
        }
        op.unwrap()
    }

    fn format_action(&self, action: &Action, players: &[&String]) -> String {
        match action {
            Action::EndPhase => "end the current phase".to_string(),
            Action::Trade(c) => format!("trade away {c}"),
            Action::Discard(c) => format!("discard {c}"),
            Action::Connect { floating, target } => {
                format!("connect equipment #{floating} to #{target} (free)")
            }
            Action::Respond(c) => format!("respond with {c}"),
            Action::Pass => "pass".to_string(),
            Action::Play(play) => format!("play {}", self.format_play(play, players)),
        }
    }

    fn format_play(&self, play: &Play, players: &[&String]) -> String {
        let node_str = play.node.map(|n| format!(" onto equipment #{n}"));
        let op_str = play.opponent.map(|op| format!(" against {}", players[op]));
        let class_str = play
            .classification
            .map(|c| format!(" targeting {c}"));
        format!(
            "{}{}{}{}",
            play.card,
            node_str.unwrap_or_default(),
            op_str.unwrap_or_default(),
            class_str.unwrap_or_default()
        )
    }

    fn print_event(&self, event: &Event, players: &[&String]) {
        match &event {
            Event::Play(pl, p) => println!(
                "~ Play: {} played {}",
                players[*pl],
                self.format_play(p, players)
            ),
            Event::Connect(pl, floating, target) => println!(
                "~ Connect: {} connected equipment #{} to #{}",
                players[*pl], floating, target
            ),
            Event::Trade(pl, c) => println!("~ Trade: {} traded away {}", players[*pl], c),
            Event::Discard(pl, c) => println!("~ Discard: {} discarded {}", players[*pl], c),
            Event::PickUp(pl, c, s) => {
                if let Some(card) = c {
                    println!(
                        "~ PickUp: {} picked up {} , {} cards remaining in deck",
                        players[*pl], card, s
                    );
                } else {
                    println!(
                        "~ PickUp: {} picked up *** , {} cards remaining in deck",
                        players[*pl], s
                    );
                }
            }
            Event::Phase(pl, phase) => {
                println!("~ Phase: {} entered the {} phase", players[*pl], phase)
            }
            Event::BattleResponse(pl, c) => match c {
                Some(card) => println!("~ Battle: {} responded with {}", players[*pl], card),
                None => println!("~ Battle: {} passed", players[*pl]),
            },
            Event::BattleWon(pl) => println!("~ Battle: won by {}", players[*pl]),
            Event::ComputersReturned(pl, count) => println!(
                "~ Audit: {} returned {} computers to hand",
                players[*pl], count
            ),
            Event::ClassificationStolen(from, to, c) => println!(
                "~ HeadHunter: {} lost {} to {}",
                players[*from], c, players[*to]
            ),
            Event::Reshuffle(count) => {
                println!("~ Reshuffle: {} discarded cards form the new deck", count)
            }
            Event::Score(pl, gained, total) => println!(
                "~ Score: {} mined {} bitcoin, {} total",
                players[*pl], gained, total
            ),
            Event::Winner(pl) => {
                let banner = pl.iter().map(|&p| players[p].clone()).join(", ");
                println!("Winner is {}", banner);
            }
        }
    }
}

impl Player for CliPlayer {
    fn name(&self) -> &String {
        &self.name
    }

    fn notify(&self, game_log: &[Event], players: &[&String]) {
        println!("================================================");
        for entry in game_log {
            self.print_event(entry, players);
        }
    }

    fn obtain_action(
        &self,
        players: &[&String],
        game_log: &[Event],
        actions: &[Action],
    ) -> ActionId {
        self.notify(game_log, players);

        loop {
            match self.query_user(actions, players) {
                CliAction::Quit => std::process::exit(0),
                CliAction::Rules => println!("{}", RULES),
                CliAction::CardEffects => println!("{}", Card::rules()),
                CliAction::Choice(i) if i < actions.len() => return i,
                CliAction::Choice(_) => {}
            }
        }
    }
}
