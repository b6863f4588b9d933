//! Rollup Aggregator
//!
//! Turns a flat list of collected encounters into grouped, counted and
//! path-annotated summaries per entity kind. Pure and deterministic: the same
//! input always yields the same groups, counts and path order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::path::{CollectedEncounter, EncounterPath};
use crate::core::campaign::{Adventure, Campaign, CardType, DrawnCard, Reward, RewardType};

/// Display name used when an encounter points at a deleted NPC.
pub const UNKNOWN_NPC_NAME: &str = "Unknown NPC";
/// Display name used when an encounter points at a deleted object.
pub const UNKNOWN_OBJECT_NAME: &str = "Unknown object";

// ============================================================================
// Output Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedEnemy {
    pub creature_id: String,
    pub name: String,
    pub nd: f64,
    pub creature_type: String,
    /// Every placement, including repeats inside one encounter
    pub count: usize,
    /// One entry per distinct encounter
    pub paths: Vec<EncounterPath>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedNpc {
    pub npc_id: String,
    pub name: String,
    pub title: Option<String>,
    pub alignment: Option<String>,
    pub is_combatant: bool,
    /// True when the catalog entry no longer exists
    pub is_unknown: bool,
    pub count: usize,
    pub paths: Vec<EncounterPath>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedObject {
    pub object_id: String,
    pub name: String,
    pub category: Option<String>,
    pub is_unknown: bool,
    /// Sum of quantities across placements
    pub total_quantity: u64,
    pub paths: Vec<EncounterPath>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedCard {
    pub card: DrawnCard,
    pub adventure_id: String,
    pub adventure_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardSection {
    pub card_type: CardType,
    pub cards: Vec<AggregatedCard>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemReward {
    pub reward: Reward,
    pub path: EncounterPath,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RewardSummary {
    pub total_gold: i64,
    pub total_xp: i64,
    pub items: Vec<ItemReward>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RollupCounts {
    pub encounters: usize,
    /// Enemy placements before grouping
    pub enemy_instances: usize,
    pub card_instances: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedData {
    /// Sorted by ascending ND
    pub enemies: Vec<AggregatedEnemy>,
    /// In order of first appearance
    pub npcs: Vec<AggregatedNpc>,
    pub objects: Vec<AggregatedObject>,
    /// Only non-empty sections, in [`CardType::ORDER`]
    pub card_sections: Vec<CardSection>,
    pub rewards: RewardSummary,
    pub counts: RollupCounts,
}

impl AggregatedData {
    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
            && self.npcs.is_empty()
            && self.objects.is_empty()
            && self.card_sections.is_empty()
            && self.rewards.items.is_empty()
            && self.rewards.total_gold == 0
            && self.rewards.total_xp == 0
    }
}

// ============================================================================
// Aggregation
// ============================================================================

/// Append `path` unless its encounter is already recorded.
fn record_path(paths: &mut Vec<EncounterPath>, path: &EncounterPath) {
    if !paths.iter().any(|p| p.encounter_id == path.encounter_id) {
        paths.push(path.clone());
    }
}

/// Summarize every enemy, NPC, object, card and reward under the collected
/// encounters.
///
/// `campaign` resolves NPC and object display data; without it every NPC and
/// object is reported as unknown. Cards come from `adventures`, never from the
/// encounters themselves.
pub fn aggregate(
    items: &[CollectedEncounter<'_>],
    campaign: Option<&Campaign>,
    adventures: &[Adventure],
) -> AggregatedData {
    let mut counts = RollupCounts {
        encounters: items.len(),
        ..RollupCounts::default()
    };

    let mut enemies: IndexMap<&str, AggregatedEnemy> = IndexMap::new();
    let mut npcs: IndexMap<&str, AggregatedNpc> = IndexMap::new();
    let mut objects: IndexMap<&str, AggregatedObject> = IndexMap::new();
    let mut rewards = RewardSummary::default();

    for item in items {
        let encounter = item.encounter;

        for enemy in &encounter.enemies {
            counts.enemy_instances += 1;
            let entry = enemies
                .entry(enemy.creature_id.as_str())
                .or_insert_with(|| AggregatedEnemy {
                    creature_id: enemy.creature_id.clone(),
                    name: enemy.creature.name.clone(),
                    nd: enemy.creature.nd,
                    creature_type: enemy.creature.creature_type.clone(),
                    count: 0,
                    paths: Vec::new(),
                });
            entry.count += 1;
            record_path(&mut entry.paths, &item.path);
        }

        for link in &encounter.encounter_npcs {
            let entry = npcs.entry(link.npc_id.as_str()).or_insert_with(|| {
                match campaign.and_then(|c| c.npc(&link.npc_id)) {
                    Some(npc) => AggregatedNpc {
                        npc_id: npc.id.clone(),
                        name: npc.name.clone(),
                        title: npc.title.clone(),
                        alignment: npc.alignment.clone(),
                        is_combatant: npc.is_combatant,
                        is_unknown: false,
                        count: 0,
                        paths: Vec::new(),
                    },
                    None => {
                        tracing::debug!(npc_id = %link.npc_id, "NPC missing from catalog, using placeholder");
                        AggregatedNpc {
                            npc_id: link.npc_id.clone(),
                            name: UNKNOWN_NPC_NAME.to_string(),
                            title: None,
                            alignment: None,
                            is_combatant: false,
                            is_unknown: true,
                            count: 0,
                            paths: Vec::new(),
                        }
                    }
                }
            });
            entry.count += 1;
            record_path(&mut entry.paths, &item.path);
        }

        for link in &encounter.encounter_objects {
            let entry = objects.entry(link.object_id.as_str()).or_insert_with(|| {
                let object = campaign.and_then(|c| c.object(&link.object_id));
                AggregatedObject {
                    object_id: link.object_id.clone(),
                    name: object
                        .map(|o| o.name.clone())
                        .unwrap_or_else(|| UNKNOWN_OBJECT_NAME.to_string()),
                    category: object.and_then(|o| o.category.clone()),
                    is_unknown: object.is_none(),
                    total_quantity: 0,
                    paths: Vec::new(),
                }
            });
            entry.total_quantity = entry.total_quantity.saturating_add(u64::from(link.quantity));
            record_path(&mut entry.paths, &item.path);
        }

        for reward in &encounter.rewards {
            match reward.reward_type {
                RewardType::Gold => {
                    rewards.total_gold = rewards.total_gold.saturating_add(reward.value.unwrap_or(0));
                }
                RewardType::Xp => {
                    rewards.total_xp = rewards.total_xp.saturating_add(reward.value.unwrap_or(0));
                }
                RewardType::Item => rewards.items.push(ItemReward {
                    reward: reward.clone(),
                    path: item.path.clone(),
                }),
            }
        }
    }

    let mut card_sections = Vec::new();
    for card_type in CardType::ORDER {
        let cards: Vec<AggregatedCard> = adventures
            .iter()
            .flat_map(|adventure| {
                adventure
                    .drawn_cards
                    .iter()
                    .filter(move |card| card.card_type == card_type)
                    .map(move |card| AggregatedCard {
                        card: card.clone(),
                        adventure_id: adventure.id.clone(),
                        adventure_name: adventure.name.clone(),
                    })
            })
            .collect();
        counts.card_instances += cards.len();
        if !cards.is_empty() {
            card_sections.push(CardSection { card_type, cards });
        }
    }

    let mut enemies: Vec<AggregatedEnemy> = enemies.into_values().collect();
    enemies.sort_by(|a, b| a.nd.total_cmp(&b.nd));

    tracing::debug!(
        encounters = counts.encounters,
        enemy_groups = enemies.len(),
        npc_groups = npcs.len(),
        object_groups = objects.len(),
        cards = counts.card_instances,
        "Aggregated rollup"
    );

    AggregatedData {
        enemies,
        npcs: npcs.into_values().collect(),
        objects: objects.into_values().collect(),
        card_sections,
        rewards,
        counts,
    }
}
