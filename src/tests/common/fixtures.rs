//! Test Fixtures
//!
//! A small but complete campaign ("Briar") with two adventures, repeated
//! enemies, a multi-version NPC, dangling catalog references and drawn
//! cards, plus helpers for parties and tracker state.

use crate::core::campaign::{
    Adventure, Campaign, CampaignObject, CardType, Character, Creature, DrawnCard, Encounter,
    EncounterEnemy, EncounterNpc, EncounterObject, Npc, NpcVersion, Reward, Session, StatBlock,
};
use crate::core::combat::{build_initiative, CombatState, EntryType, InitiativeEntry};
use crate::core::tracker::{Command, TrackerState};

// =============================================================================
// Campaign Fixture
// =============================================================================

/// Ids of everything in [`briar_campaign`] that tests refer to.
#[derive(Debug, Clone)]
pub struct BriarIds {
    pub campaign: String,
    pub road: String,
    pub depths: String,
    pub road_s1: String,
    pub road_s2: String,
    pub depths_s1: String,
    pub ambush: String,
    pub camp: String,
    pub gate: String,
    pub crypt: String,
    pub goblin: String,
    pub wolf: String,
    pub ogre: String,
    pub captain: String,
    pub captain_enraged: String,
    pub merchant: String,
    pub potion: String,
    pub ghost_npc: String,
    pub missing_object: String,
}

pub fn goblin() -> Creature {
    Creature::new("Goblin", 0.5, "humanoid", 7).with_ca(15)
}

pub fn wolf() -> Creature {
    Creature::new("Wolf", 0.25, "beast", 11).with_ca(13)
}

pub fn ogre() -> Creature {
    Creature::new("Ogre", 3.0, "giant", 59).with_pm(0).with_ca(11)
}

/// Build the Briar campaign.
///
/// Road to Briar
///   Session 1: Ambush (goblin x2, wolf, captain, potion x2, 50 gold, 100 xp, ring)
///              Camp   (ogre, goblin, merchant, potion x1, 25 gold)
///   Session 2: Gate   (wolf, dangling NPC, dangling object x3)
///   Cards: threat, plot
/// Depths of Briar
///   Session 1: Crypt  (ogre)
///   Cards: character
pub fn briar_campaign() -> (Campaign, BriarIds) {
    let (goblin, wolf, ogre) = (goblin(), wolf(), ogre());

    let calm = NpcVersion::new("Calm", Some(StatBlock { pv: 30, pm: None, ca: Some(16) }));
    let enraged = NpcVersion::new("Enraged", Some(StatBlock { pv: 40, pm: None, ca: Some(14) }));
    let captain = Npc::new("Captain Vell")
        .combatant()
        .with_title("Watch Captain")
        .with_alignment("lawful neutral")
        .with_version(calm)
        .with_version(enraged.clone());
    let merchant = Npc::new("Odo").with_title("Merchant").with_version(NpcVersion::new("Base", None));
    let potion = CampaignObject::new("Healing potion").with_category("consumable");

    let mut ambush = Encounter::new("Ambush", "On the north road");
    ambush.enemies.push(EncounterEnemy::from_creature(&goblin));
    ambush.enemies.push(EncounterEnemy::from_creature(&goblin).with_nickname("Snag"));
    ambush.enemies.push(EncounterEnemy::from_creature(&wolf));
    ambush.encounter_npcs.push(EncounterNpc::from_npc(&captain, Some(enraged.id.as_str())));
    ambush.encounter_objects.push(EncounterObject::new(&potion.id, 2));
    ambush.rewards.push(Reward::gold(50));
    ambush.rewards.push(Reward::xp(100));
    ambush.rewards.push(Reward::item("Silver ring").with_quantity(1));

    let mut camp = Encounter::new("Camp", "");
    camp.enemies.push(EncounterEnemy::from_creature(&ogre));
    camp.enemies.push(EncounterEnemy::from_creature(&goblin));
    camp.encounter_npcs.push(EncounterNpc::from_npc(&merchant, None));
    camp.encounter_objects.push(EncounterObject::new(&potion.id, 1));
    camp.rewards.push(Reward::gold(25));

    let mut gate = Encounter::new("Gate", "");
    gate.enemies.push(EncounterEnemy::from_creature(&wolf));
    let ghost_link = EncounterNpc::new("ghost-npc", None);
    gate.encounter_npcs.push(ghost_link);
    gate.encounter_objects.push(EncounterObject::new("missing-object", 3));

    let mut crypt = Encounter::new("Crypt", "");
    crypt.enemies.push(EncounterEnemy::from_creature(&ogre));

    let mut road_s1 = Session::new("Session 1", 1);
    let mut road_s2 = Session::new("Session 2", 2);
    let mut depths_s1 = Session::new("Session 1", 1);

    let ids = BriarIds {
        campaign: String::new(),
        road: String::new(),
        depths: String::new(),
        road_s1: road_s1.id.clone(),
        road_s2: road_s2.id.clone(),
        depths_s1: depths_s1.id.clone(),
        ambush: ambush.id.clone(),
        camp: camp.id.clone(),
        gate: gate.id.clone(),
        crypt: crypt.id.clone(),
        goblin: goblin.id.clone(),
        wolf: wolf.id.clone(),
        ogre: ogre.id.clone(),
        captain: captain.id.clone(),
        captain_enraged: enraged.id.clone(),
        merchant: merchant.id.clone(),
        potion: potion.id.clone(),
        ghost_npc: "ghost-npc".to_string(),
        missing_object: "missing-object".to_string(),
    };

    road_s1.encounters.extend([ambush, camp]);
    road_s2.encounters.push(gate);
    depths_s1.encounters.push(crypt);

    let mut road = Adventure::new("Road to Briar", "");
    road.sessions.extend([road_s1, road_s2]);
    road.drawn_cards.push(DrawnCard::new(CardType::Plot, "The stolen seal"));
    road.drawn_cards.push(DrawnCard::new(CardType::Threat, "Wolves at dusk"));

    let mut depths = Adventure::new("Depths of Briar", "");
    depths.sessions.push(depths_s1);
    depths.drawn_cards.push(DrawnCard::new(CardType::Character, "A lost squire"));

    let mut campaign = Campaign::new("Briar", "A border town in trouble");
    campaign.npcs.extend([captain, merchant]);
    campaign.objects.push(potion);

    let ids = BriarIds {
        campaign: campaign.id.clone(),
        road: road.id.clone(),
        depths: depths.id.clone(),
        ..ids
    };
    campaign.adventures.extend([road, depths]);

    (campaign, ids)
}

// =============================================================================
// Party Fixtures
// =============================================================================

pub fn party() -> Vec<Character> {
    let mut benched = Character::new("Benched Bram", 18);
    benched.is_active = false;
    vec![
        Character::new("Aria", 24).with_mana(10).with_ca(14),
        Character::new("Tomas", 31).with_ca(17),
        benched,
    ]
}

// =============================================================================
// Combat Fixtures
// =============================================================================

/// An entry with full PV and the given roll.
pub fn rolled_entry(name: &str, entry_type: EntryType, initiative: i32) -> InitiativeEntry {
    InitiativeEntry::new(entry_type, format!("src-{name}"), name)
        .with_pv(10, 10)
        .with_initiative(initiative)
}

/// A combat already past the rolling phase.
pub fn running_combat(entries: Vec<InitiativeEntry>) -> CombatState {
    let mut combat = CombatState::start("enc-test", entries);
    combat.resolve();
    combat
}

// =============================================================================
// Tracker Fixtures
// =============================================================================

/// Tracker holding the Briar campaign, with nothing selected.
pub fn briar_tracker() -> (TrackerState, BriarIds) {
    let (campaign, ids) = briar_campaign();
    let mut state = TrackerState::default();
    state.apply(Command::CreateCampaign { campaign });
    (state, ids)
}

/// Start combat in the Ambush with the active party.
pub fn start_ambush(state: &mut TrackerState, ids: &BriarIds) {
    let campaign = state.campaign(&ids.campaign).cloned();
    let order = campaign
        .as_ref()
        .and_then(|c| c.encounter(&ids.ambush).map(|e| build_initiative(e, &party(), Some(c))))
        .unwrap_or_default();
    state.apply(Command::StartCombat {
        encounter_id: ids.ambush.clone(),
        initiative_order: order,
    });
}
