//! Property-based tests for the Rollup Aggregator
//!
//! Tests invariants:
//! - Aggregation is deterministic
//! - Counts add up; paths are deduplicated per encounter
//! - Quantities are summed
//! - Missing catalog entries become placeholders

use proptest::prelude::*;

use crate::core::campaign::{
    Adventure, Campaign, CampaignObject, Creature, Encounter, EncounterEnemy, EncounterNpc,
    EncounterObject, Npc, Session,
};
use crate::core::rollup::{rollup, RollupScope, UNKNOWN_NPC_NAME};

// ============================================================================
// Strategies for generating test inputs
// ============================================================================

/// One encounter's placements, as indexes into the generated catalogs.
#[derive(Debug, Clone)]
struct EncounterShape {
    creatures: Vec<usize>,
    npcs: Vec<usize>,
    objects: Vec<(usize, u32)>,
}

fn arb_encounter_shape() -> impl Strategy<Value = EncounterShape> {
    (
        prop::collection::vec(0usize..4, 0..6),
        prop::collection::vec(0usize..3, 0..3),
        prop::collection::vec((0usize..3, 1u32..10), 0..4),
    )
        .prop_map(|(creatures, npcs, objects)| EncounterShape {
            creatures,
            npcs,
            objects,
        })
}

/// Adventures of sessions of encounter shapes.
fn arb_hierarchy() -> impl Strategy<Value = Vec<Vec<Vec<EncounterShape>>>> {
    prop::collection::vec(
        prop::collection::vec(prop::collection::vec(arb_encounter_shape(), 0..4), 0..3),
        1..3,
    )
}

fn arb_nd() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.25), Just(0.5), Just(1.0), Just(3.0), Just(10.0)]
}

/// Materialize a campaign. NPC index 2 is left out of the catalog so every
/// placement of it dangles.
fn build_campaign(nds: &[f64], hierarchy: &[Vec<Vec<EncounterShape>>]) -> Campaign {
    let creatures: Vec<Creature> = nds
        .iter()
        .enumerate()
        .map(|(i, nd)| Creature::new(format!("Creature {i}"), *nd, "beast", 10))
        .collect();
    let npcs: Vec<Npc> = (0..3).map(|i| Npc::new(format!("Npc {i}"))).collect();
    let objects: Vec<CampaignObject> = (0..3).map(|i| CampaignObject::new(format!("Object {i}"))).collect();

    let mut campaign = Campaign::new("Generated", "");
    for (a, sessions) in hierarchy.iter().enumerate() {
        let mut adventure = Adventure::new(format!("Adventure {a}"), "");
        for (s, encounters) in sessions.iter().enumerate() {
            let mut session = Session::new(format!("Session {s}"), s as u32 + 1);
            for (e, shape) in encounters.iter().enumerate() {
                let mut encounter = Encounter::new(format!("Encounter {e}"), "");
                for &c in &shape.creatures {
                    encounter.enemies.push(EncounterEnemy::from_creature(&creatures[c]));
                }
                for &n in &shape.npcs {
                    encounter.encounter_npcs.push(EncounterNpc::new(&npcs[n].id, None));
                }
                for &(o, quantity) in &shape.objects {
                    encounter.encounter_objects.push(EncounterObject::new(&objects[o].id, quantity));
                }
                session.encounters.push(encounter);
            }
            adventure.sessions.push(session);
        }
        campaign.adventures.push(adventure);
    }
    campaign.npcs.extend(npcs.into_iter().take(2));
    campaign.objects.extend(objects);
    campaign
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: Aggregating the same campaign twice gives equal results
    #[test]
    fn prop_aggregation_is_deterministic(
        nds in prop::collection::vec(arb_nd(), 4),
        hierarchy in arb_hierarchy()
    ) {
        let campaign = build_campaign(&nds, &hierarchy);
        let first = rollup(&campaign, &RollupScope::Campaign);
        let second = rollup(&campaign, &RollupScope::Campaign);
        prop_assert_eq!(first, second);
    }

    /// Property: Enemy counts add up to placements, and each group has one
    /// path per distinct encounter it appears in
    #[test]
    fn prop_enemy_counts_and_paths(
        nds in prop::collection::vec(arb_nd(), 4),
        hierarchy in arb_hierarchy()
    ) {
        let campaign = build_campaign(&nds, &hierarchy);
        let data = rollup(&campaign, &RollupScope::Campaign);

        let placements: usize = campaign.encounters().map(|e| e.enemies.len()).sum();
        let grouped: usize = data.enemies.iter().map(|e| e.count).sum();
        prop_assert_eq!(grouped, placements);
        prop_assert_eq!(data.counts.enemy_instances, placements);

        for group in &data.enemies {
            let hosting = campaign
                .encounters()
                .filter(|e| e.enemies.iter().any(|x| x.creature_id == group.creature_id))
                .count();
            prop_assert_eq!(group.paths.len(), hosting);
            prop_assert!(group.paths.len() <= group.count);
        }
    }

    /// Property: Enemies are ordered by ascending ND
    #[test]
    fn prop_enemies_sorted_by_nd(
        nds in prop::collection::vec(arb_nd(), 4),
        hierarchy in arb_hierarchy()
    ) {
        let campaign = build_campaign(&nds, &hierarchy);
        let data = rollup(&campaign, &RollupScope::Campaign);
        for pair in data.enemies.windows(2) {
            prop_assert!(pair[0].nd <= pair[1].nd);
        }
    }

    /// Property: Object quantities are summed across placements
    #[test]
    fn prop_object_quantities_summed(
        nds in prop::collection::vec(arb_nd(), 4),
        hierarchy in arb_hierarchy()
    ) {
        let campaign = build_campaign(&nds, &hierarchy);
        let data = rollup(&campaign, &RollupScope::Campaign);

        for group in &data.objects {
            let expected: u64 = campaign
                .encounters()
                .flat_map(|e| &e.encounter_objects)
                .filter(|o| o.object_id == group.object_id)
                .map(|o| u64::from(o.quantity))
                .sum();
            prop_assert_eq!(group.total_quantity, expected);
            prop_assert!(!group.is_unknown);
        }
    }

    /// Property: Dangling NPC references become placeholders
    #[test]
    fn prop_dangling_npcs_become_placeholders(
        nds in prop::collection::vec(arb_nd(), 4),
        hierarchy in arb_hierarchy()
    ) {
        let campaign = build_campaign(&nds, &hierarchy);
        let data = rollup(&campaign, &RollupScope::Campaign);

        for group in &data.npcs {
            let known = campaign.npc(&group.npc_id).is_some();
            prop_assert_eq!(group.is_unknown, !known);
            if !known {
                prop_assert_eq!(group.name.as_str(), UNKNOWN_NPC_NAME);
            }
        }
    }

    /// Property: Per-adventure rollups partition the campaign's placements
    #[test]
    fn prop_adventure_rollups_partition_campaign(
        nds in prop::collection::vec(arb_nd(), 4),
        hierarchy in arb_hierarchy()
    ) {
        let campaign = build_campaign(&nds, &hierarchy);
        let total = rollup(&campaign, &RollupScope::Campaign);

        let (mut encounters, mut enemies) = (0, 0);
        for adventure in &campaign.adventures {
            let part = rollup(&campaign, &RollupScope::Adventure { adventure_id: adventure.id.clone() });
            encounters += part.counts.encounters;
            enemies += part.counts.enemy_instances;
        }
        prop_assert_eq!(encounters, total.counts.encounters);
        prop_assert_eq!(enemies, total.counts.enemy_instances);
    }
}
