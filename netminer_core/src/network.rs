use std::collections::BTreeMap;

use crate::{
    card::{Card, IssueKind},
    error::GameError,
};

pub type NodeId = usize;

/// One piece of placed equipment. Floating equipment simply has no parent.
#[derive(Debug, Clone)]
pub struct EquipmentNode {
    card: Card,
    parent: Option<NodeId>,
    issue: Option<IssueKind>,
}

impl EquipmentNode {
    pub fn card(&self) -> Card {
        self.card
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn issue(&self) -> Option<IssueKind> {
        self.issue
    }

    pub fn is_disabled(&self) -> bool {
        self.issue.is_some()
    }
}

/// A player's equipment, kept as an id-keyed arena with parent links instead
/// of a nested tree. Switches are roots, cables hang off switches, computers
/// hang off cables.
#[derive(Debug, Clone, Default)]
pub struct PlayerNetwork {
    nodes: BTreeMap<NodeId, EquipmentNode>,
    next_id: NodeId,
}

impl PlayerNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, id: NodeId) -> Result<&EquipmentNode, GameError> {
        self.nodes
            .get(&id)
            .ok_or_else(|| GameError::InvalidTarget(format!("no equipment with id {id}")))
    }

    fn insert(&mut self, card: Card, parent: Option<NodeId>) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(
            id,
            EquipmentNode {
                card,
                parent,
                issue: None,
            },
        );
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&EquipmentNode> {
        self.nodes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node ids in placement order.
    pub fn ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    pub fn switches(&self) -> Vec<NodeId> {
        self.filtered(|n| n.card == Card::Switch)
    }

    pub fn cables(&self) -> Vec<NodeId> {
        self.filtered(|n| n.card.cable_capacity().is_some())
    }

    /// Placed but not yet connected. Switches are never floating, they are
    /// connected to the internet on their own.
    pub fn floating(&self) -> Vec<NodeId> {
        self.filtered(|n| n.parent.is_none() && n.card != Card::Switch)
    }

    pub fn disabled(&self) -> Vec<NodeId> {
        self.filtered(|n| n.issue.is_some())
    }

    fn filtered<F>(&self, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&EquipmentNode) -> bool,
    {
        self.nodes
            .iter()
            .filter(|(_, n)| predicate(n))
            .map(|(&id, _)| id)
            .collect()
    }

    fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.filtered(|n| n.parent == Some(id))
    }

    pub fn validate_cable_target(&self, switch: NodeId) -> Result<(), GameError> {
        let node = self.get(switch)?;
        if node.card != Card::Switch {
            return Err(GameError::InvalidTarget(
                "cables connect to switches".to_string(),
            ));
        }
        if node.is_disabled() {
            return Err(GameError::InvalidTarget(
                "that switch is disabled".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_computer_target(&self, cable: NodeId) -> Result<(), GameError> {
        let node = self.get(cable)?;
        let capacity = node.card.cable_capacity().ok_or_else(|| {
            GameError::InvalidTarget("computers connect to cables".to_string())
        })?;
        if node.is_disabled() {
            return Err(GameError::InvalidTarget(
                "that cable is disabled".to_string(),
            ));
        }
        if self.children(cable).len() >= capacity {
            return Err(GameError::CapacityExceeded(format!(
                "that cable holds at most {capacity} computers"
            )));
        }
        Ok(())
    }

    pub fn validate_connect(&self, floating: NodeId, target: NodeId) -> Result<(), GameError> {
        let node = self.get(floating)?;
        if node.parent.is_some() {
            return Err(GameError::InvalidTarget(
                "that equipment is already connected".to_string(),
            ));
        }
        match node.card {
            Card::CableTwo | Card::CableThree => self.validate_cable_target(target),
            Card::Computer => self.validate_computer_target(target),
            _ => Err(GameError::InvalidTarget(
                "switches connect to the internet on their own".to_string(),
            )),
        }
    }

    pub fn validate_disable(&self, id: NodeId) -> Result<(), GameError> {
        let node = self.get(id)?;
        if node.issue.is_some() {
            return Err(GameError::InvalidTarget(
                "an issue is already open on that equipment".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_resolve(&self, id: NodeId, card: Card) -> Result<(), GameError> {
        let node = self.get(id)?;
        match node.issue {
            None => Err(GameError::InvalidTarget(
                "no open issue on that equipment".to_string(),
            )),
            Some(issue) if card.clears(issue) => Ok(()),
            Some(issue) => Err(GameError::InvalidTarget(format!(
                "{card} does not clear a {issue} issue"
            ))),
        }
    }

    pub fn play_switch(&mut self) -> NodeId {
        self.insert(Card::Switch, None)
    }

    /// Place a cable, attached to `switch` or floating when `None`.
    pub fn play_cable(&mut self, card: Card, switch: Option<NodeId>) -> Result<NodeId, GameError> {
        if card.cable_capacity().is_none() {
            return Err(GameError::InvalidTarget(format!("{card} is not a cable")));
        }
        if let Some(switch) = switch {
            self.validate_cable_target(switch)?;
        }
        Ok(self.insert(card, switch))
    }

    /// Place a computer, attached to `cable` or floating when `None`.
    pub fn play_computer(&mut self, cable: Option<NodeId>) -> Result<NodeId, GameError> {
        if let Some(cable) = cable {
            self.validate_computer_target(cable)?;
        }
        Ok(self.insert(Card::Computer, cable))
    }

    /// Move a floating node under a target, with the same capacity and
    /// disabled checks as a direct placement. Zero-cost for the caller.
    pub fn connect(&mut self, floating: NodeId, target: NodeId) -> Result<(), GameError> {
        self.validate_connect(floating, target)?;
        if let Some(node) = self.nodes.get_mut(&floating) {
            node.parent = Some(target);
        }
        Ok(())
    }

    pub fn disable(&mut self, id: NodeId, issue: IssueKind) -> Result<(), GameError> {
        self.validate_disable(id)?;
        if let Some(node) = self.nodes.get_mut(&id) {
            node.issue = Some(issue);
        }
        Ok(())
    }

    pub fn resolve(&mut self, id: NodeId, card: Card) -> Result<(), GameError> {
        self.validate_resolve(id, card)?;
        if let Some(node) = self.nodes.get_mut(&id) {
            node.issue = None;
        }
        Ok(())
    }

    /// Take a computer out of the network, e.g. after a lost audit. The card
    /// goes back to the owner's hand.
    pub fn remove_computer(&mut self, id: NodeId) -> Result<Card, GameError> {
        if self.get(id)?.card != Card::Computer {
            return Err(GameError::InvalidTarget(
                "only computers are returned to hand".to_string(),
            ));
        }
        match self.nodes.remove(&id) {
            Some(node) => Ok(node.card),
            None => Err(GameError::InvalidTarget(format!("no equipment with id {id}"))),
        }
    }

    /// Computers whose whole path to a switch is attached and free of open
    /// issues, in placement order. The sole feed into scoring.
    pub fn connected_computer_ids(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.card == Card::Computer && n.issue.is_none() && self.has_live_uplink(n))
            .map(|(&id, _)| id)
            .collect()
    }

    pub fn connected_computers(&self) -> usize {
        self.connected_computer_ids().len()
    }

    fn has_live_uplink(&self, computer: &EquipmentNode) -> bool {
        let cable = match computer.parent.and_then(|id| self.nodes.get(&id)) {
            Some(cable) if cable.issue.is_none() => cable,
            _ => return false,
        };
        match cable.parent.and_then(|id| self.nodes.get(&id)) {
            Some(switch) => switch.issue.is_none(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        card::{Card, IssueKind},
        error::GameError,
        network::PlayerNetwork,
    };

    fn scoring_network() -> (PlayerNetwork, usize, usize) {
        let mut net = PlayerNetwork::new();
        let switch = net.play_switch();
        let cable = net.play_cable(Card::CableTwo, Some(switch)).unwrap();
        net.play_computer(Some(cable)).unwrap();
        net.play_computer(Some(cable)).unwrap();
        (net, switch, cable)
    }

    #[test]
    fn cable_capacity_should_never_be_exceeded() {
        let (mut net, _, cable) = scoring_network();

        let result = net.play_computer(Some(cable));

        assert!(matches!(result, Err(GameError::CapacityExceeded(_))));
        assert_eq!(net.len(), 4);
    }

    #[test]
    fn cable_three_should_hold_a_third_computer() {
        let mut net = PlayerNetwork::new();
        let switch = net.play_switch();
        let cable = net.play_cable(Card::CableThree, Some(switch)).unwrap();
        for _ in 0..3 {
            net.play_computer(Some(cable)).unwrap();
        }

        assert_eq!(net.connected_computers(), 3);
        assert!(net.play_computer(Some(cable)).is_err());
    }

    #[test]
    fn connected_computers_should_require_a_live_path() {
        let (mut net, _, cable) = scoring_network();
        assert_eq!(net.connected_computers(), 2);

        net.disable(cable, IssueKind::PowerOutage).unwrap();
        assert_eq!(net.connected_computers(), 0);
        assert_eq!(net.len(), 4, "disabling must not remove nodes");

        net.resolve(cable, Card::Generator).unwrap();
        assert_eq!(net.connected_computers(), 2);
    }

    #[test]
    fn disabling_the_switch_should_drop_the_whole_subtree() {
        let (mut net, switch, _) = scoring_network();

        net.disable(switch, IssueKind::Hacked).unwrap();

        assert_eq!(net.connected_computers(), 0);
    }

    #[test]
    fn floating_equipment_should_not_score() {
        let mut net = PlayerNetwork::new();
        let cable = net.play_cable(Card::CableTwo, None).unwrap();
        net.play_computer(Some(cable)).unwrap();
        net.play_computer(None).unwrap();

        assert_eq!(net.connected_computers(), 0);
        assert_eq!(net.floating().len(), 2);
    }

    #[test]
    fn connect_should_move_a_floating_cable_under_a_switch() {
        let mut net = PlayerNetwork::new();
        let cable = net.play_cable(Card::CableTwo, None).unwrap();
        net.play_computer(Some(cable)).unwrap();
        let switch = net.play_switch();

        net.connect(cable, switch).unwrap();

        assert_eq!(net.connected_computers(), 1);
        assert!(net.floating().is_empty());
    }

    #[test]
    fn connect_should_reject_attached_equipment() {
        let (mut net, switch, cable) = scoring_network();

        assert!(matches!(
            net.connect(cable, switch),
            Err(GameError::InvalidTarget(_))
        ));
    }

    #[test]
    fn connect_should_respect_capacity() {
        let (mut net, _, cable) = scoring_network();
        let floater = net.play_computer(None).unwrap();

        assert!(matches!(
            net.connect(floater, cable),
            Err(GameError::CapacityExceeded(_))
        ));
    }

    #[test]
    fn cables_should_only_attach_to_enabled_switches() {
        let mut net = PlayerNetwork::new();
        let switch = net.play_switch();
        net.disable(switch, IssueKind::NewHire).unwrap();

        let result = net.play_cable(Card::CableTwo, Some(switch));

        assert!(matches!(result, Err(GameError::InvalidTarget(_))));
    }

    #[test]
    fn a_node_should_carry_at_most_one_open_issue() {
        let (mut net, switch, _) = scoring_network();
        net.disable(switch, IssueKind::Hacked).unwrap();

        let result = net.disable(switch, IssueKind::Hacked);

        assert!(matches!(result, Err(GameError::InvalidTarget(_))));
        assert_eq!(net.node(switch).unwrap().issue(), Some(IssueKind::Hacked));
    }

    #[test]
    fn resolve_should_require_a_matching_kind() {
        let (mut net, switch, _) = scoring_network();
        net.disable(switch, IssueKind::Hacked).unwrap();

        assert!(net.resolve(switch, Card::Generator).is_err());
        assert!(net.node(switch).unwrap().is_disabled());

        net.resolve(switch, Card::Patch).unwrap();
        assert!(!net.node(switch).unwrap().is_disabled());
    }

    #[test]
    fn helpdesk_should_resolve_any_issue() {
        let (mut net, _, cable) = scoring_network();
        net.disable(cable, IssueKind::NewHire).unwrap();

        net.resolve(cable, Card::Helpdesk).unwrap();

        assert_eq!(net.connected_computers(), 2);
    }

    #[test]
    fn remove_computer_should_reject_other_equipment() {
        let (mut net, switch, _) = scoring_network();

        assert!(net.remove_computer(switch).is_err());
        assert_eq!(net.len(), 4);
    }
}
