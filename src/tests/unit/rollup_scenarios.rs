//! Rollup Scenario Tests
//!
//! Campaign, adventure and session rollups over the Briar fixture.

use rstest::rstest;

use crate::core::campaign::CardType;
use crate::core::rollup::{rollup, RollupScope, UNKNOWN_NPC_NAME, UNKNOWN_OBJECT_NAME};
use crate::tests::common::fixtures::briar_campaign;

fn encounter_ids(paths: &[crate::core::rollup::EncounterPath]) -> Vec<&str> {
    paths.iter().map(|p| p.encounter_id.as_str()).collect()
}

// =============================================================================
// Campaign Scope
// =============================================================================

#[test]
fn test_campaign_rollup_groups_enemies_by_creature() {
    let (campaign, ids) = briar_campaign();
    let data = rollup(&campaign, &RollupScope::Campaign);

    let names: Vec<&str> = data.enemies.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Wolf", "Goblin", "Ogre"]);

    let goblin = &data.enemies[1];
    assert_eq!(goblin.creature_id, ids.goblin);
    assert_eq!(goblin.count, 3);
    assert_eq!(encounter_ids(&goblin.paths), [ids.ambush.as_str(), ids.camp.as_str()]);

    let ogre = &data.enemies[2];
    assert_eq!(ogre.count, 2);
    assert_eq!(encounter_ids(&ogre.paths), [ids.camp.as_str(), ids.crypt.as_str()]);
    assert_eq!(ogre.paths[1].adventure_id, ids.depths);
}

#[test]
fn test_campaign_rollup_resolves_npcs_and_placeholders() {
    let (campaign, ids) = briar_campaign();
    let data = rollup(&campaign, &RollupScope::Campaign);

    let npc_ids: Vec<&str> = data.npcs.iter().map(|n| n.npc_id.as_str()).collect();
    assert_eq!(npc_ids, [ids.captain.as_str(), ids.merchant.as_str(), ids.ghost_npc.as_str()]);

    let captain = &data.npcs[0];
    assert_eq!(captain.name, "Captain Vell");
    assert_eq!(captain.title.as_deref(), Some("Watch Captain"));
    assert!(captain.is_combatant);

    let ghost = &data.npcs[2];
    assert!(ghost.is_unknown);
    assert_eq!(ghost.name, UNKNOWN_NPC_NAME);
    assert_eq!(ghost.paths[0].session_id, ids.road_s2);
}

#[test]
fn test_campaign_rollup_sums_object_quantities() {
    let (campaign, ids) = briar_campaign();
    let data = rollup(&campaign, &RollupScope::Campaign);

    assert_eq!(data.objects.len(), 2);
    let potion = &data.objects[0];
    assert_eq!(potion.object_id, ids.potion);
    assert_eq!(potion.total_quantity, 3);
    assert_eq!(potion.paths.len(), 2);
    assert_eq!(potion.category.as_deref(), Some("consumable"));

    let missing = &data.objects[1];
    assert_eq!(missing.object_id, ids.missing_object);
    assert_eq!(missing.name, UNKNOWN_OBJECT_NAME);
    assert_eq!(missing.total_quantity, 3);
    assert!(missing.is_unknown);
}

#[test]
fn test_campaign_rollup_cards_and_rewards() {
    let (campaign, ids) = briar_campaign();
    let data = rollup(&campaign, &RollupScope::Campaign);

    let sections: Vec<CardType> = data.card_sections.iter().map(|s| s.card_type).collect();
    assert_eq!(sections, [CardType::Character, CardType::Threat, CardType::Plot]);
    assert_eq!(data.card_sections[0].cards[0].adventure_id, ids.depths);
    assert_eq!(data.card_sections[1].cards[0].adventure_name, "Road to Briar");

    assert_eq!(data.rewards.total_gold, 75);
    assert_eq!(data.rewards.total_xp, 100);
    assert_eq!(data.rewards.items.len(), 1);
    assert_eq!(data.rewards.items[0].reward.name, "Silver ring");
    assert_eq!(data.rewards.items[0].path.encounter_id, ids.ambush);
}

// =============================================================================
// Scope Table
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum Scope {
    Campaign,
    Road,
    Depths,
    RoadSessionTwo,
    UnknownAdventure,
}

#[rstest]
#[case::campaign(Scope::Campaign, 4, 7, 3)]
#[case::road(Scope::Road, 3, 6, 2)]
#[case::depths(Scope::Depths, 1, 1, 1)]
#[case::road_session_two(Scope::RoadSessionTwo, 1, 1, 0)]
#[case::unknown_adventure(Scope::UnknownAdventure, 0, 0, 0)]
fn test_rollup_counts_per_scope(
    #[case] scope: Scope,
    #[case] encounters: usize,
    #[case] enemy_instances: usize,
    #[case] card_instances: usize,
) {
    let (campaign, ids) = briar_campaign();
    let scope = match scope {
        Scope::Campaign => RollupScope::Campaign,
        Scope::Road => RollupScope::Adventure {
            adventure_id: ids.road.clone(),
        },
        Scope::Depths => RollupScope::Adventure {
            adventure_id: ids.depths.clone(),
        },
        Scope::RoadSessionTwo => RollupScope::Session {
            adventure_id: ids.road.clone(),
            session_id: ids.road_s2.clone(),
        },
        Scope::UnknownAdventure => RollupScope::Adventure {
            adventure_id: "nowhere".to_string(),
        },
    };

    let data = rollup(&campaign, &scope);
    assert_eq!(data.counts.encounters, encounters);
    assert_eq!(data.counts.enemy_instances, enemy_instances);
    assert_eq!(data.counts.card_instances, card_instances);

    let grouped: usize = data.enemies.iter().map(|e| e.count).sum();
    assert_eq!(grouped, enemy_instances);
}

#[test]
fn test_session_rollup_carries_no_cards() {
    let (campaign, ids) = briar_campaign();
    let data = rollup(
        &campaign,
        &RollupScope::Session {
            adventure_id: ids.road.clone(),
            session_id: ids.road_s1.clone(),
        },
    );
    assert!(data.card_sections.is_empty());
    assert_eq!(data.rewards.total_gold, 75);
    assert_eq!(data.enemies.iter().map(|e| e.count).sum::<usize>(), 5);
}

#[test]
fn test_unknown_adventure_is_empty() {
    let (campaign, _) = briar_campaign();
    let data = rollup(
        &campaign,
        &RollupScope::Adventure {
            adventure_id: "nowhere".to_string(),
        },
    );
    assert!(data.is_empty());
}
