//! Tracker State
//!
//! The single mutable view of a facilitator's table: the campaign hierarchy,
//! navigation, and the combat running in the active encounter. Commands are
//! applied one at a time; none of them fail. A command naming an id that no
//! longer exists is logged and ignored.

use serde::{Deserialize, Serialize};

use super::command::{Command, EnemyUpdate, NpcLinkUpdate, ObjectLinkUpdate};
use super::event::TrackerEvent;
use crate::core::campaign::{Adventure, Campaign, Encounter, EncounterStatus, Session};
use crate::core::combat::{
    CombatState, EntryType, InitiativeBuilder, InitiativeEntry, TurnOptions, TurnOutcome,
};
use crate::core::rollup::{collect_encounters, rollup, AggregatedData, RollupScope};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrackerState {
    pub campaigns: Vec<Campaign>,
    pub active_campaign_id: Option<String>,
    pub active_adventure_id: Option<String>,
    pub active_session_id: Option<String>,
    pub active_encounter_id: Option<String>,
    pub combat: Option<CombatState>,
    #[serde(default)]
    pub turn_options: TurnOptions,
}

// ============================================================================
// Lookup Helpers
// ============================================================================

fn find_campaign_mut<'a>(campaigns: &'a mut [Campaign], campaign_id: &str) -> Option<&'a mut Campaign> {
    campaigns.iter_mut().find(|c| c.id == campaign_id)
}

fn find_encounter_mut<'a>(campaigns: &'a mut [Campaign], encounter_id: &str) -> Option<&'a mut Encounter> {
    campaigns.iter_mut().find_map(|c| c.encounter_mut(encounter_id))
}

fn find_adventure_mut<'a>(campaigns: &'a mut [Campaign], adventure_id: &str) -> Option<&'a mut Adventure> {
    campaigns.iter_mut().find_map(|c| c.adventure_mut(adventure_id))
}

/// Copy the live PV of an enemy or NPC entry onto its encounter record.
fn mirror_to_encounter(campaigns: &mut [Campaign], encounter_id: &str, entry: &InitiativeEntry) {
    let Some(current_pv) = entry.current_pv else {
        return;
    };
    let Some(encounter) = find_encounter_mut(campaigns, encounter_id) else {
        return;
    };
    match entry.entry_type {
        EntryType::Enemy => {
            if let Some(enemy) = encounter.enemy_mut(&entry.source_id) {
                enemy.current_pv = current_pv;
            }
        }
        EntryType::Npc => {
            if let Some(link) = encounter.npc_mut(&entry.source_id) {
                link.current_pv = Some(current_pv);
            }
        }
        // Player sheets live outside the hierarchy; they get an event instead
        EntryType::Player => {}
    }
}

fn player_event(entry: &InitiativeEntry) -> Option<TrackerEvent> {
    (entry.entry_type == EntryType::Player).then(|| TrackerEvent::PlayerEntryUpdated {
        character_id: entry.source_id.clone(),
        entry: entry.clone(),
    })
}

impl TrackerState {
    pub fn new(turn_options: TurnOptions) -> Self {
        Self {
            turn_options,
            ..Self::default()
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn campaign(&self, campaign_id: &str) -> Option<&Campaign> {
        self.campaigns.iter().find(|c| c.id == campaign_id)
    }

    pub fn active_campaign(&self) -> Option<&Campaign> {
        self.active_campaign_id.as_deref().and_then(|id| self.campaign(id))
    }

    pub fn active_adventure(&self) -> Option<&Adventure> {
        let id = self.active_adventure_id.as_deref()?;
        self.active_campaign()?.adventure(id)
    }

    pub fn active_session(&self) -> Option<&Session> {
        let id = self.active_session_id.as_deref()?;
        self.active_adventure()?.session(id)
    }

    pub fn active_encounter(&self) -> Option<&Encounter> {
        let id = self.active_encounter_id.as_deref()?;
        self.active_campaign()?.encounter(id)
    }

    /// Rollup of the active campaign at the given scope.
    pub fn rollup(&self, scope: &RollupScope) -> Option<AggregatedData> {
        self.active_campaign().map(|campaign| rollup(campaign, scope))
    }

    /// Rollup at the deepest navigation level short of a single encounter.
    pub fn navigation_rollup(&self) -> Option<AggregatedData> {
        let scope = match (&self.active_adventure_id, &self.active_session_id) {
            (Some(adventure_id), Some(session_id)) => RollupScope::Session {
                adventure_id: adventure_id.clone(),
                session_id: session_id.clone(),
            },
            (Some(adventure_id), None) => RollupScope::Adventure {
                adventure_id: adventure_id.clone(),
            },
            _ => RollupScope::Campaign,
        };
        self.rollup(&scope)
    }

    /// Entries still waiting for an initiative roll.
    pub fn pending_initiative(&self) -> Vec<&InitiativeEntry> {
        self.combat
            .as_ref()
            .map(|c| c.pending_entries())
            .unwrap_or_default()
    }

    // ========================================================================
    // Command Application
    // ========================================================================

    /// Functional form of [`TrackerState::apply`].
    pub fn reduce(mut self, command: Command) -> (Self, Vec<TrackerEvent>) {
        let events = self.apply(command);
        (self, events)
    }

    /// Apply one command and return the events to forward.
    pub fn apply(&mut self, command: Command) -> Vec<TrackerEvent> {
        let name = command.name();
        tracing::trace!(command = name, "Applying command");

        let mut events = Vec::new();
        let applied = match command {
            Command::CreateCampaign { campaign } => {
                if self.campaign(&campaign.id).is_some() {
                    false
                } else {
                    self.campaigns.push(campaign);
                    true
                }
            }
            Command::CreateAdventure { campaign_id, adventure } => {
                find_campaign_mut(&mut self.campaigns, &campaign_id)
                    .map(|c| c.adventures.push(adventure))
                    .is_some()
            }
            Command::CreateSession { campaign_id, adventure_id, session } => {
                find_campaign_mut(&mut self.campaigns, &campaign_id)
                    .and_then(|c| c.adventure_mut(&adventure_id))
                    .map(|a| a.sessions.push(session))
                    .is_some()
            }
            Command::CreateEncounter { campaign_id, adventure_id, session_id, encounter } => {
                find_campaign_mut(&mut self.campaigns, &campaign_id)
                    .and_then(|c| c.adventure_mut(&adventure_id))
                    .and_then(|a| a.session_mut(&session_id))
                    .map(|s| s.encounters.push(encounter))
                    .is_some()
            }

            Command::SetActiveCampaign { campaign_id } => self.set_active_campaign(campaign_id),
            Command::SetActiveAdventure { adventure_id } => self.set_active_adventure(adventure_id),
            Command::SetActiveSession { session_id } => self.set_active_session(session_id),
            Command::SetActiveEncounter { encounter_id } => self.set_active_encounter(encounter_id),

            Command::AddCampaignNpc { campaign_id, npc } => {
                find_campaign_mut(&mut self.campaigns, &campaign_id)
                    .map(|c| c.npcs.push(npc))
                    .is_some()
            }
            Command::RemoveCampaignNpc { campaign_id, npc_id } => {
                find_campaign_mut(&mut self.campaigns, &campaign_id)
                    .map(|c| c.npcs.retain(|n| n.id != npc_id))
                    .is_some()
            }
            Command::AddCampaignObject { campaign_id, object } => {
                find_campaign_mut(&mut self.campaigns, &campaign_id)
                    .map(|c| c.objects.push(object))
                    .is_some()
            }
            Command::RemoveCampaignObject { campaign_id, object_id } => {
                find_campaign_mut(&mut self.campaigns, &campaign_id)
                    .map(|c| c.objects.retain(|o| o.id != object_id))
                    .is_some()
            }
            Command::DrawCard { adventure_id, card } => {
                find_adventure_mut(&mut self.campaigns, &adventure_id)
                    .map(|a| a.drawn_cards.push(card))
                    .is_some()
            }

            Command::AddEnemyToEncounter { encounter_id, enemy } => {
                find_encounter_mut(&mut self.campaigns, &encounter_id)
                    .map(|e| e.enemies.push(enemy))
                    .is_some()
            }
            Command::RemoveEnemyFromEncounter { encounter_id, enemy_id } => {
                self.remove_enemy(&encounter_id, &enemy_id)
            }
            Command::UpdateEnemyInEncounter { encounter_id, enemy_id, updates } => {
                self.update_enemy(&encounter_id, &enemy_id, &updates)
            }
            Command::AddNpcToEncounter { encounter_id, npc } => {
                find_encounter_mut(&mut self.campaigns, &encounter_id)
                    .map(|e| e.encounter_npcs.push(npc))
                    .is_some()
            }
            Command::RemoveNpcFromEncounter { encounter_id, link_id } => {
                self.remove_npc(&encounter_id, &link_id)
            }
            Command::UpdateNpcInEncounter { encounter_id, link_id, updates } => {
                self.update_npc(&encounter_id, &link_id, &updates)
            }
            Command::AddObjectToEncounter { encounter_id, object } => {
                find_encounter_mut(&mut self.campaigns, &encounter_id)
                    .map(|e| e.encounter_objects.push(object))
                    .is_some()
            }
            Command::RemoveObjectFromEncounter { encounter_id, link_id } => {
                find_encounter_mut(&mut self.campaigns, &encounter_id)
                    .map(|e| e.encounter_objects.retain(|o| o.id != link_id))
                    .is_some()
            }
            Command::UpdateObjectInEncounter { encounter_id, link_id, updates } => {
                self.update_object(&encounter_id, &link_id, &updates)
            }
            Command::AddReward { encounter_id, reward } => {
                find_encounter_mut(&mut self.campaigns, &encounter_id)
                    .map(|e| e.rewards.push(reward))
                    .is_some()
            }
            Command::RemoveReward { encounter_id, reward_id } => {
                find_encounter_mut(&mut self.campaigns, &encounter_id)
                    .map(|e| e.rewards.retain(|r| r.id != reward_id))
                    .is_some()
            }
            Command::ToggleReward { encounter_id, reward_id } => {
                find_encounter_mut(&mut self.campaigns, &encounter_id)
                    .and_then(|e| e.reward_mut(&reward_id))
                    .map(|r| r.distributed = !r.distributed)
                    .is_some()
            }

            Command::StartCombat { encounter_id, initiative_order } => {
                self.start_combat(encounter_id, initiative_order, &mut events)
            }
            Command::SetInitiative { entry_id, value } => {
                let Some(combat) = self.combat.as_mut() else {
                    return self.ignored(name, events);
                };
                let applied = combat.set_initiative(&entry_id, value);
                events.extend(combat.entry(&entry_id).and_then(player_event));
                applied
            }
            Command::ResolveInitiative => match self.combat.as_mut() {
                Some(combat) if !combat.is_in_progress() => {
                    combat.resolve();
                    events.push(TrackerEvent::TurnChanged {
                        round: combat.round,
                        entry_id: combat.current_entry().map(|e| e.id.clone()),
                    });
                    true
                }
                _ => false,
            },
            Command::ResortInitiative => match self.combat.as_mut() {
                Some(combat) if combat.is_in_progress() => {
                    combat.resort();
                    events.push(TrackerEvent::TurnChanged {
                        round: combat.round,
                        entry_id: combat.current_entry().map(|e| e.id.clone()),
                    });
                    true
                }
                _ => false,
            },
            Command::RestoreCombat { mut combat } => {
                if !self.set_active_encounter(Some(combat.encounter_id.clone())) {
                    tracing::warn!(encounter_id = %combat.encounter_id, "Restored combat belongs to an unknown encounter");
                }
                combat.initiative_order.iter_mut().for_each(InitiativeEntry::clamp_resources);
                self.combat = Some(combat);
                true
            }
            Command::UpdateCombatEntry { entry_id, updates } => {
                self.mutate_entry(&entry_id, &mut events, |combat, id| {
                    let touches_view = updates.touches_participant_view();
                    combat.update_entry(id, &updates).is_some() && touches_view
                })
            }
            Command::DamageCombatant { entry_id, amount } => {
                self.mutate_entry(&entry_id, &mut events, |combat, id| {
                    let before = combat.entry(id).and_then(|e| e.current_pv);
                    combat.apply_damage(id, amount) != before
                })
            }
            Command::HealCombatant { entry_id, amount } => {
                self.mutate_entry(&entry_id, &mut events, |combat, id| {
                    let before = combat.entry(id).and_then(|e| e.current_pv);
                    combat.heal(id, amount) != before
                })
            }
            Command::AddCondition { entry_id, condition } => {
                self.mutate_entry(&entry_id, &mut events, |combat, id| combat.add_condition(id, &condition))
            }
            Command::RemoveCondition { entry_id, condition } => {
                self.mutate_entry(&entry_id, &mut events, |combat, id| {
                    combat.remove_condition(id, &condition)
                })
            }
            Command::UseAction { entry_id, action } => {
                self.combat
                    .as_mut()
                    .is_some_and(|combat| combat.use_action(&entry_id, action))
            }
            Command::NextTurn => self.change_turn(CombatState::next_turn, &mut events),
            Command::PreviousTurn => self.change_turn(CombatState::previous_turn, &mut events),
            Command::EndCombat => self.end_combat(&mut events),
        };

        if applied {
            events
        } else {
            self.ignored(name, events)
        }
    }

    fn ignored(&self, name: &str, events: Vec<TrackerEvent>) -> Vec<TrackerEvent> {
        tracing::debug!(command = name, "Command had no effect (stale or unknown target)");
        events
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    fn set_active_campaign(&mut self, campaign_id: Option<String>) -> bool {
        if let Some(id) = &campaign_id {
            if self.campaign(id).is_none() {
                return false;
            }
        }
        self.active_campaign_id = campaign_id;
        self.active_adventure_id = None;
        self.active_session_id = None;
        self.active_encounter_id = None;
        true
    }

    fn set_active_adventure(&mut self, adventure_id: Option<String>) -> bool {
        let Some(id) = adventure_id else {
            self.active_adventure_id = None;
            self.active_session_id = None;
            self.active_encounter_id = None;
            return true;
        };
        let Some(campaign) = self.campaigns.iter().find(|c| c.adventure(&id).is_some()) else {
            return false;
        };
        self.active_campaign_id = Some(campaign.id.clone());
        self.active_adventure_id = Some(id);
        self.active_session_id = None;
        self.active_encounter_id = None;
        true
    }

    fn set_active_session(&mut self, session_id: Option<String>) -> bool {
        let Some(id) = session_id else {
            self.active_session_id = None;
            self.active_encounter_id = None;
            return true;
        };
        let found = self.campaigns.iter().find_map(|c| {
            c.adventures
                .iter()
                .find(|a| a.session(&id).is_some())
                .map(|a| (c.id.clone(), a.id.clone()))
        });
        let Some((campaign_id, adventure_id)) = found else {
            return false;
        };
        self.active_campaign_id = Some(campaign_id);
        self.active_adventure_id = Some(adventure_id);
        self.active_session_id = Some(id);
        self.active_encounter_id = None;
        true
    }

    /// Select an encounter and point every ancestor at its breadcrumb.
    fn set_active_encounter(&mut self, encounter_id: Option<String>) -> bool {
        let Some(id) = encounter_id else {
            self.active_encounter_id = None;
            return true;
        };
        let found = self.campaigns.iter().find_map(|campaign| {
            collect_encounters(campaign, None, None)
                .into_iter()
                .find(|item| item.path.encounter_id == id)
                .map(|item| (campaign.id.clone(), item.path))
        });
        let Some((campaign_id, path)) = found else {
            return false;
        };
        self.active_campaign_id = Some(campaign_id);
        self.active_adventure_id = Some(path.adventure_id);
        self.active_session_id = Some(path.session_id);
        self.active_encounter_id = Some(path.encounter_id);
        true
    }

    // ========================================================================
    // Encounter Contents
    // ========================================================================

    fn live_entry_mut(&mut self, encounter_id: &str, source_id: &str) -> Option<&mut InitiativeEntry> {
        self.combat
            .as_mut()
            .filter(|c| c.encounter_id == encounter_id)?
            .initiative_order
            .iter_mut()
            .find(|e| e.source_id == source_id)
    }

    fn remove_live_entry(&mut self, encounter_id: &str, source_id: &str) {
        let Some(combat) = self.combat.as_mut().filter(|c| c.encounter_id == encounter_id) else {
            return;
        };
        if let Some(entry_id) = combat.entry_by_source(source_id).map(|e| e.id.clone()) {
            combat.remove_entry(&entry_id);
        }
    }

    fn remove_enemy(&mut self, encounter_id: &str, enemy_id: &str) -> bool {
        let Some(encounter) = find_encounter_mut(&mut self.campaigns, encounter_id) else {
            return false;
        };
        let before = encounter.enemies.len();
        encounter.enemies.retain(|e| e.id != enemy_id);
        if encounter.enemies.len() == before {
            return false;
        }
        self.remove_live_entry(encounter_id, enemy_id);
        true
    }

    /// Update an enemy record and the live combat entry standing for it.
    fn update_enemy(&mut self, encounter_id: &str, enemy_id: &str, updates: &EnemyUpdate) -> bool {
        let Some(enemy) = find_encounter_mut(&mut self.campaigns, encounter_id)
            .and_then(|e| e.enemy_mut(enemy_id))
        else {
            return false;
        };
        if let Some(nickname) = &updates.nickname {
            enemy.nickname = Some(nickname.clone()).filter(|n| !n.is_empty());
        }
        if let Some(pv) = updates.current_pv {
            enemy.current_pv = pv.clamp(0, enemy.creature.pv.max(0));
        }
        let (name, pv) = (enemy.display_name().to_string(), enemy.current_pv);

        if let Some(entry) = self.live_entry_mut(encounter_id, enemy_id) {
            entry.name = name;
            entry.current_pv = Some(pv);
            entry.clamp_resources();
        }
        true
    }

    fn remove_npc(&mut self, encounter_id: &str, link_id: &str) -> bool {
        let Some(encounter) = find_encounter_mut(&mut self.campaigns, encounter_id) else {
            return false;
        };
        let before = encounter.encounter_npcs.len();
        encounter.encounter_npcs.retain(|n| n.id != link_id);
        if encounter.encounter_npcs.len() == before {
            return false;
        }
        self.remove_live_entry(encounter_id, link_id);
        true
    }

    fn update_npc(&mut self, encounter_id: &str, link_id: &str, updates: &NpcLinkUpdate) -> bool {
        let Some(link) = find_encounter_mut(&mut self.campaigns, encounter_id)
            .and_then(|e| e.npc_mut(link_id))
        else {
            return false;
        };
        let version_changed = updates
            .version_id
            .as_ref()
            .is_some_and(|v| link.version_id.as_ref() != Some(v));
        if let Some(version_id) = &updates.version_id {
            link.version_id = Some(version_id.clone());
        }
        if let Some(pv) = updates.current_pv {
            link.current_pv = Some(pv.max(0));
        }
        let mut link = link.clone();
        if version_changed && updates.current_pv.is_none() {
            // A new stat block starts at full PV
            link.current_pv = None;
        }

        let refreshed = version_changed
            .then(|| {
                let campaign = self.campaigns.iter().find(|c| c.encounter(encounter_id).is_some());
                InitiativeBuilder::default().npc_entry(&link, campaign)
            })
            .flatten();
        if let Some(fresh) = &refreshed {
            mirror_to_encounter(&mut self.campaigns, encounter_id, fresh);
        }

        let Some(entry) = self.live_entry_mut(encounter_id, link_id) else {
            return true;
        };
        if let Some(fresh) = refreshed {
            entry.name = fresh.name;
            entry.max_pv = fresh.max_pv;
            entry.current_pv = fresh.current_pv;
            entry.max_pm = fresh.max_pm;
            entry.current_pm = entry.current_pm.or(fresh.current_pm);
            entry.ca = fresh.ca;
        } else if let Some(pv) = link.current_pv {
            entry.current_pv = Some(pv);
        }
        entry.clamp_resources();
        true
    }

    fn update_object(&mut self, encounter_id: &str, link_id: &str, updates: &ObjectLinkUpdate) -> bool {
        let Some(link) = find_encounter_mut(&mut self.campaigns, encounter_id)
            .and_then(|e| e.object_mut(link_id))
        else {
            return false;
        };
        if let Some(quantity) = updates.quantity {
            link.quantity = quantity;
        }
        true
    }

    // ========================================================================
    // Combat
    // ========================================================================

    fn start_combat(
        &mut self,
        encounter_id: String,
        initiative_order: Vec<InitiativeEntry>,
        events: &mut Vec<TrackerEvent>,
    ) -> bool {
        let Some(encounter) = find_encounter_mut(&mut self.campaigns, &encounter_id) else {
            return false;
        };
        encounter.status = EncounterStatus::Active;

        if let Some(previous) = &self.combat {
            tracing::warn!(
                previous = %previous.encounter_id,
                next = %encounter_id,
                "Starting combat replaces the one in progress"
            );
        }

        tracing::info!(encounter_id = %encounter_id, combatants = initiative_order.len(), "Combat started");
        events.push(TrackerEvent::InitiativeBroadcastRequested {
            encounter_id: encounter_id.clone(),
            entries: initiative_order.clone(),
        });
        self.combat = Some(CombatState::start(encounter_id.clone(), initiative_order));
        self.set_active_encounter(Some(encounter_id));
        true
    }

    /// Run `mutation` against one entry, then mirror the result onto the
    /// encounter and notify the player it belongs to.
    ///
    /// `mutation` returns whether anything a participant sees changed.
    fn mutate_entry<F>(&mut self, entry_id: &str, events: &mut Vec<TrackerEvent>, mutation: F) -> bool
    where
        F: FnOnce(&mut CombatState, &str) -> bool,
    {
        let Some(combat) = self.combat.as_mut() else {
            return false;
        };
        if combat.entry(entry_id).is_none() {
            return false;
        }
        let changed = mutation(combat, entry_id);

        if let Some(entry) = combat.entry(entry_id) {
            mirror_to_encounter(&mut self.campaigns, &combat.encounter_id, entry);
            if changed {
                events.extend(player_event(entry));
            }
        }
        true
    }

    fn change_turn<F>(&mut self, step: F, events: &mut Vec<TrackerEvent>) -> bool
    where
        F: FnOnce(&mut CombatState, &TurnOptions) -> TurnOutcome,
    {
        let options = self.turn_options;
        let Some(combat) = self.combat.as_mut().filter(|c| c.is_in_progress()) else {
            return false;
        };
        let outcome = step(combat, &options);
        events.push(TrackerEvent::TurnChanged {
            round: outcome.round,
            entry_id: outcome.current_entry_id,
        });
        true
    }

    fn end_combat(&mut self, events: &mut Vec<TrackerEvent>) -> bool {
        let Some(combat) = self.combat.take() else {
            return false;
        };
        if let Some(encounter) = find_encounter_mut(&mut self.campaigns, &combat.encounter_id) {
            encounter.status = EncounterStatus::Done;
        }
        tracing::info!(
            encounter_id = %combat.encounter_id,
            rounds = combat.round,
            "Combat ended"
        );
        events.push(TrackerEvent::CombatEnded {
            encounter_id: combat.encounter_id,
        });
        true
    }
}

// ============================================================================
// Tests
// ============================================================================
