use std::iter::repeat;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::{EnumMessage, IntoEnumIterator};
use strum_macros::{Display, EnumIter, EnumMessage, EnumString};

/// The four card families of the game.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize, Display)]
pub enum CardKind {
    Equipment,
    Attack,
    Resolution,
    Classification,
}

/// An open issue on a piece of equipment. Equipment with an open issue is
/// disabled and does not carry traffic until a matching resolution card
/// clears the issue.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum IssueKind {
    Hacked,
    NewHire,
    PowerOutage,
}

#[derive(
    Debug,
    PartialEq,
    Eq,
    Copy,
    Clone,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    EnumMessage,
)]
pub enum Card {
    #[strum(
        message = "Attach this to a cable with a free port. A computer mines one bitcoin per score phase while its cable and switch are up."
    )]
    Computer,
    #[strum(
        message = "The root of a network. A switch is connected to the internet by itself and accepts any number of cables."
    )]
    Switch,
    #[strum(message = "Connects up to 2 computers to a switch.")]
    CableTwo,
    #[strum(message = "Connects up to 3 computers to a switch.")]
    CableThree,
    #[strum(
        message = "Open a Hacked issue on an opponent's equipment, disabling it until they play a Patch or Helpdesk. Also blocks or counters an Audit."
    )]
    Hacked,
    #[strum(
        message = "Open a New Hire issue on an opponent's equipment, disabling it until they play an Orientation or Helpdesk."
    )]
    NewHire,
    #[strum(
        message = "Open a Power Outage issue on an opponent's equipment, disabling it until they play a Generator or Helpdesk."
    )]
    PowerOutage,
    #[strum(
        message = "Audit an opponent. Unless they block, they must return two connected computers to their hand."
    )]
    Audit,
    #[strum(
        message = "Poach from an opponent. Unless they block, one of their classifications joins your zone. Also blocks or counters a Head Hunter."
    )]
    HeadHunter,
    #[strum(message = "Clears a Hacked issue.")]
    Patch,
    #[strum(message = "Clears a New Hire issue.")]
    Orientation,
    #[strum(message = "Clears a Power Outage issue.")]
    Generator,
    #[strum(message = "Clears any open issue.")]
    Helpdesk,
    #[strum(message = "A classification for your zone. You may hold two classifications at a time.")]
    Engineer,
    #[strum(message = "A classification for your zone. You may hold two classifications at a time.")]
    Architect,
}

impl Card {
    pub fn kind(&self) -> CardKind {
        match self {
            Card::Computer | Card::Switch | Card::CableTwo | Card::CableThree => CardKind::Equipment,
            Card::Hacked | Card::NewHire | Card::PowerOutage | Card::Audit | Card::HeadHunter => {
                CardKind::Attack
            }
            Card::Patch | Card::Orientation | Card::Generator | Card::Helpdesk => {
                CardKind::Resolution
            }
            Card::Engineer | Card::Architect => CardKind::Classification,
        }
    }

    /// Number of copies of this card in a full deck.
    pub fn copies(&self) -> usize {
        match self {
            Card::Computer => 32,
            Card::Switch => 8,
            Card::CableTwo => 16,
            Card::CableThree => 8,
            Card::Hacked => 4,
            Card::NewHire => 4,
            Card::PowerOutage => 4,
            Card::Audit => 3,
            Card::HeadHunter => 3,
            Card::Patch => 4,
            Card::Orientation => 4,
            Card::Generator => 4,
            Card::Helpdesk => 2,
            Card::Engineer => 3,
            Card::Architect => 3,
        }
    }

    /// The full unshuffled deck, one entry per physical card.
    pub fn deck() -> Vec<Card> {
        Card::iter()
            .flat_map(|c| repeat(c).take(c.copies()))
            .collect()
    }

    /// How many computers a cable card accepts, `None` for non-cables.
    pub fn cable_capacity(&self) -> Option<usize> {
        match self {
            Card::CableTwo => Some(2),
            Card::CableThree => Some(3),
            _ => None,
        }
    }

    /// The issue a disabling attack card opens, `None` for all other cards.
    pub fn issue(&self) -> Option<IssueKind> {
        match self {
            Card::Hacked => Some(IssueKind::Hacked),
            Card::NewHire => Some(IssueKind::NewHire),
            Card::PowerOutage => Some(IssueKind::PowerOutage),
            _ => None,
        }
    }

    /// Whether this resolution card clears the given issue.
    pub fn clears(&self, issue: IssueKind) -> bool {
        match self {
            Card::Patch => issue == IssueKind::Hacked,
            Card::Orientation => issue == IssueKind::NewHire,
            Card::Generator => issue == IssueKind::PowerOutage,
            Card::Helpdesk => true,
            _ => false,
        }
    }

    /// Opaque asset key, resolved by the presentation layer.
    pub fn image(&self) -> &'static str {
        match self {
            Card::Computer => "cards/computer",
            Card::Switch => "cards/switch",
            Card::CableTwo => "cards/cable-2",
            Card::CableThree => "cards/cable-3",
            Card::Hacked => "cards/hacked",
            Card::NewHire => "cards/new-hire",
            Card::PowerOutage => "cards/power-outage",
            Card::Audit => "cards/audit",
            Card::HeadHunter => "cards/head-hunter",
            Card::Patch => "cards/patch",
            Card::Orientation => "cards/orientation",
            Card::Generator => "cards/generator",
            Card::Helpdesk => "cards/helpdesk",
            Card::Engineer => "cards/engineer",
            Card::Architect => "cards/architect",
        }
    }

    pub fn rules() -> String {
        Card::iter().map(|c| c.rule()).join("\n")
    }

    pub fn rule(&self) -> String {
        format!(
            "{} [{} x{}]: {}",
            self,
            self.kind(),
            self.copies(),
            self.get_message().unwrap_or("No rule")
        )
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use crate::card::{Card, CardKind, IssueKind};

    #[test]
    fn deck_should_contain_the_fixed_composition() {
        let deck = Card::deck();

        assert_eq!(deck.len(), 102);
        assert_eq!(deck.iter().filter(|&&c| c == Card::Computer).count(), 32);
        assert_eq!(deck.iter().filter(|&&c| c == Card::CableTwo).count(), 16);
        assert_eq!(deck.iter().filter(|&&c| c == Card::Switch).count(), 8);
        assert_eq!(deck.iter().filter(|&&c| c == Card::Helpdesk).count(), 2);
        for card in Card::iter() {
            assert_eq!(
                deck.iter().filter(|&&c| c == card).count(),
                card.copies(),
                "wrong count for {card}"
            );
        }
    }

    #[test]
    fn every_card_should_belong_to_exactly_one_family() {
        for card in Card::iter() {
            match card.kind() {
                CardKind::Equipment => assert!(card.issue().is_none()),
                CardKind::Attack => assert!(card.cable_capacity().is_none()),
                CardKind::Resolution => assert!(card.issue().is_none()),
                CardKind::Classification => {
                    assert!(card.issue().is_none() && card.cable_capacity().is_none())
                }
            }
        }
    }

    #[test]
    fn resolutions_should_clear_only_their_issue() {
        assert!(Card::Patch.clears(IssueKind::Hacked));
        assert!(!Card::Patch.clears(IssueKind::PowerOutage));
        assert!(Card::Orientation.clears(IssueKind::NewHire));
        assert!(Card::Generator.clears(IssueKind::PowerOutage));
        assert!(!Card::Generator.clears(IssueKind::NewHire));
    }

    #[test]
    fn helpdesk_should_clear_any_issue() {
        for issue in IssueKind::iter() {
            assert!(Card::Helpdesk.clears(issue));
        }
    }

    #[test]
    fn cable_capacity_should_match_the_subtype() {
        assert_eq!(Card::CableTwo.cable_capacity(), Some(2));
        assert_eq!(Card::CableThree.cable_capacity(), Some(3));
        assert_eq!(Card::Computer.cable_capacity(), None);
    }
}
