//! Initiative Builder
//!
//! Produces the unrolled roster for a new combat from an encounter's enemies,
//! the active party and the combat-flagged NPCs placed in the encounter.

use crate::core::campaign::{Campaign, Character, Encounter, EncounterEnemy, EncounterNpc};

use super::entry::{ActionBudget, EntryType, InitiativeEntry};

#[derive(Debug, Clone, Default)]
pub struct InitiativeBuilder {
    action_budget: ActionBudget,
}

impl InitiativeBuilder {
    pub fn new(action_budget: ActionBudget) -> Self {
        Self { action_budget }
    }

    /// Build one entry per enemy, per active party character, and per
    /// combat-flagged NPC.
    ///
    /// Every entry starts unrolled and not defeated. NPC links whose catalog
    /// entry is gone are skipped: without the catalog there is no way to tell
    /// whether they fight.
    pub fn build(
        &self,
        encounter: &Encounter,
        party: &[Character],
        campaign: Option<&Campaign>,
    ) -> Vec<InitiativeEntry> {
        let mut entries = Vec::with_capacity(
            encounter.enemies.len() + party.len() + encounter.encounter_npcs.len(),
        );

        entries.extend(encounter.enemies.iter().map(|enemy| self.enemy_entry(enemy)));

        entries.extend(
            party
                .iter()
                .filter(|c| c.is_active)
                .map(|character| self.player_entry(character)),
        );

        for link in &encounter.encounter_npcs {
            if let Some(entry) = self.npc_entry(link, campaign) {
                entries.push(entry);
            }
        }

        tracing::debug!(
            encounter_id = %encounter.id,
            entries = entries.len(),
            "Built initiative roster"
        );
        entries
    }

    fn enemy_entry(&self, enemy: &EncounterEnemy) -> InitiativeEntry {
        let creature = &enemy.creature;
        let mut entry = InitiativeEntry::new(EntryType::Enemy, &enemy.id, enemy.display_name())
            .with_pv(enemy.current_pv, creature.pv);
        if let Some(pm) = creature.pm {
            entry = entry.with_pm(pm, pm);
        }
        entry.ca = creature.ca;
        entry.available_actions = Some(self.action_budget);
        entry
    }

    fn player_entry(&self, character: &Character) -> InitiativeEntry {
        let mut entry = InitiativeEntry::new(EntryType::Player, &character.id, &character.name)
            .with_pv(character.current_pv, character.max_pv);
        if let Some(max_pm) = character.max_pm {
            entry = entry.with_pm(character.current_pm.unwrap_or(max_pm), max_pm);
        }
        entry.ca = character.ca;
        entry.available_actions = Some(self.action_budget);
        entry
    }

    pub(crate) fn npc_entry(&self, link: &EncounterNpc, campaign: Option<&Campaign>) -> Option<InitiativeEntry> {
        let Some(npc) = campaign.and_then(|c| c.npc(&link.npc_id)) else {
            tracing::debug!(npc_id = %link.npc_id, "Skipping NPC missing from catalog");
            return None;
        };
        if !npc.is_combatant {
            return None;
        }

        let version = link
            .version_id
            .as_deref()
            .and_then(|id| npc.version(id))
            .or_else(|| npc.versions.first());

        let name = match version {
            Some(v) if npc.versions.len() > 1 => format!("{} ({})", npc.name, v.name),
            _ => npc.name.clone(),
        };

        let mut entry = InitiativeEntry::new(EntryType::Npc, &link.id, name);
        if let Some(stats) = version.and_then(|v| v.stats.as_ref()) {
            entry = entry.with_pv(link.current_pv.unwrap_or(stats.pv), stats.pv);
            if let Some(pm) = stats.pm {
                entry = entry.with_pm(pm, pm);
            }
            entry.ca = stats.ca;
        }
        entry.available_actions = Some(self.action_budget);
        Some(entry)
    }
}

/// Build a roster with the default action budget.
pub fn build_initiative(
    encounter: &Encounter,
    party: &[Character],
    campaign: Option<&Campaign>,
) -> Vec<InitiativeEntry> {
    InitiativeBuilder::default().build(encounter, party, campaign)
}
