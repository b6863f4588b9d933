//! Combat Scenario Tests
//!
//! Initiative building from the Briar fixture and multi-round turn flows.

use rstest::rstest;

use crate::core::combat::{
    build_initiative, ActionBudget, ActionKind, CombatStatus, EntryType, InitiativeBuilder,
    TurnOptions,
};
use crate::tests::common::fixtures::{briar_campaign, party, rolled_entry, running_combat};

// =============================================================================
// Initiative Builder
// =============================================================================

#[test]
fn test_ambush_roster_contents() {
    let (campaign, ids) = briar_campaign();
    let ambush = campaign.encounter(&ids.ambush).unwrap();
    let entries = build_initiative(ambush, &party(), Some(&campaign));

    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        ["Goblin", "Snag", "Wolf", "Aria", "Tomas", "Captain Vell (Enraged)"]
    );
    assert!(entries.iter().all(|e| e.initiative.is_none() && !e.is_defeated));

    let captain = entries.last().unwrap();
    assert_eq!(captain.entry_type, EntryType::Npc);
    assert_eq!(captain.source_id, ambush.encounter_npcs[0].id);
    assert_eq!((captain.current_pv, captain.max_pv), (Some(40), Some(40)));
    assert_eq!(captain.ca, Some(14));

    let aria = &entries[3];
    assert_eq!((aria.current_pm, aria.max_pm), (Some(10), Some(10)));
}

#[test]
fn test_camp_roster_skips_non_combatant_npc() {
    let (campaign, ids) = briar_campaign();
    let camp = campaign.encounter(&ids.camp).unwrap();
    let entries = build_initiative(camp, &[], Some(&campaign));

    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.entry_type == EntryType::Enemy));
}

#[test]
fn test_gate_roster_skips_dangling_npc() {
    let (campaign, ids) = briar_campaign();
    let gate = campaign.encounter(&ids.gate).unwrap();
    let entries = build_initiative(gate, &[], Some(&campaign));

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "Wolf");
}

#[test]
fn test_builder_uses_configured_budget() {
    let (campaign, ids) = briar_campaign();
    let budget = ActionBudget {
        standard: 2,
        movement: 1,
        free: 3,
    };
    let entries = InitiativeBuilder::new(budget).build(
        campaign.encounter(&ids.crypt).unwrap(),
        &[],
        Some(&campaign),
    );
    assert_eq!(entries[0].available_actions, Some(budget));
}

// =============================================================================
// Turn Flow
// =============================================================================

#[test]
fn test_full_round_cycle() {
    let mut combat = running_combat(vec![
        rolled_entry("Goblin", EntryType::Enemy, 12),
        rolled_entry("Aria", EntryType::Player, 18),
        rolled_entry("Captain", EntryType::Npc, 12),
    ]);
    let options = TurnOptions::default();

    let mut seen = vec![combat.current_entry().unwrap().name.clone()];
    for _ in 0..3 {
        combat.next_turn(&options);
        seen.push(combat.current_entry().unwrap().name.clone());
    }

    assert_eq!(seen, ["Aria", "Captain", "Goblin", "Aria"]);
    assert_eq!(combat.round, 2);
}

#[test]
fn test_unrolled_entries_are_left_out() {
    let (campaign, ids) = briar_campaign();
    let entries = build_initiative(campaign.encounter(&ids.ambush).unwrap(), &party(), Some(&campaign));
    let mut combat = crate::core::combat::CombatState::start(&ids.ambush, entries);

    let rolled: Vec<String> = combat.initiative_order.iter().take(2).map(|e| e.id.clone()).collect();
    for (i, id) in rolled.iter().enumerate() {
        combat.set_initiative(id, 10 + i as i32);
    }

    let excluded = combat.resolve();
    assert_eq!(excluded.len(), 4);
    assert_eq!(combat.status, CombatStatus::InProgress);
    assert_eq!(combat.initiative_order.len(), 2);
    assert_eq!(combat.current_entry().unwrap().name, "Snag");
}

#[rstest]
#[case::plain(false, ["B", "C", "A"])]
#[case::skipping(true, ["C", "A", "C"])]
fn test_advance_with_defeated(#[case] skip_defeated: bool, #[case] expected: [&str; 3]) {
    let mut combat = running_combat(vec![
        rolled_entry("A", EntryType::Player, 20),
        rolled_entry("B", EntryType::Enemy, 15),
        rolled_entry("C", EntryType::Enemy, 10),
    ]);
    let b = combat.initiative_order[1].id.clone();
    combat.set_defeated(&b, true);
    let options = TurnOptions {
        skip_defeated,
        ..TurnOptions::default()
    };

    let seen: Vec<String> = (0..3)
        .map(|_| {
            combat.next_turn(&options);
            combat.current_entry().unwrap().name.clone()
        })
        .collect();
    assert_eq!(seen, expected);
}

#[rstest]
#[case::wraps(true, 1, "C")]
#[case::clamps(false, 2, "A")]
fn test_rewind_past_round_start(
    #[case] previous_wraps_round: bool,
    #[case] expected_round: u32,
    #[case] expected_name: &str,
) {
    let mut combat = running_combat(vec![
        rolled_entry("A", EntryType::Player, 20),
        rolled_entry("B", EntryType::Enemy, 15),
        rolled_entry("C", EntryType::Enemy, 10),
    ]);
    let options = TurnOptions {
        previous_wraps_round,
        ..TurnOptions::default()
    };
    for _ in 0..3 {
        combat.next_turn(&options);
    }
    assert_eq!((combat.round, combat.current_turn_index), (2, 0));

    let outcome = combat.previous_turn(&options);
    assert_eq!(outcome.round, expected_round);
    assert_eq!(combat.current_entry().unwrap().name, expected_name);
}

#[test]
fn test_actions_refill_when_turn_begins() {
    let mut combat = running_combat(vec![
        rolled_entry("A", EntryType::Player, 20),
        rolled_entry("B", EntryType::Enemy, 15),
    ]);
    let a = combat.initiative_order[0].id.clone();
    combat.entry_mut(&a).unwrap().available_actions = Some(ActionBudget::default());
    assert!(combat.use_action(&a, ActionKind::Standard));
    assert!(!combat.use_action(&a, ActionKind::Standard));

    let options = TurnOptions::default();
    combat.next_turn(&options);
    combat.next_turn(&options);

    let budget = combat.entry(&a).unwrap().available_actions.unwrap();
    assert_eq!(budget.remaining(ActionKind::Standard), 1);
}

#[test]
fn test_removing_current_entry_mid_round() {
    let mut combat = running_combat(vec![
        rolled_entry("A", EntryType::Player, 20),
        rolled_entry("B", EntryType::Enemy, 15),
        rolled_entry("C", EntryType::Enemy, 10),
    ]);
    combat.next_turn(&TurnOptions::default());
    let b = combat.current_entry().unwrap().id.clone();

    combat.remove_entry(&b);

    assert_eq!(combat.current_entry().unwrap().name, "C");
    assert_eq!(combat.round, 1);
}

#[test]
fn test_damage_then_heal_stays_in_bounds() {
    let mut combat = running_combat(vec![rolled_entry("A", EntryType::Player, 20)]);
    let a = combat.initiative_order[0].id.clone();

    assert_eq!(combat.apply_damage(&a, 25), Some(0));
    assert_eq!(combat.heal(&a, 4), Some(4));
    assert_eq!(combat.heal(&a, 50), Some(10));
    assert_eq!(combat.apply_damage(&a, -3), Some(10));
    assert!(!combat.entry(&a).unwrap().is_defeated);
}
