//! Plain-data campaign records.
//!
//! Every record's `Default` carries the values a loader assumes when a
//! field is absent from the text.

use serde::Serialize;
use shatter_core::Vec3;

/// Sentinel for "no deadline" in `start_before` fields.
pub const TIME_NEVER: i32 = 1_000_000_000;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Campaign {
    pub name: String,
    pub description: String,
    pub situation: String,
    pub orders: Vec<String>,
    pub scripted: bool,
    pub sequential: bool,
    /// Declared in `action_groups`; not checked against `actions.len()`.
    pub action_size: i32,
    /// Declared in `combatant_groups`.
    pub combatant_size: i32,
    pub combatants: Vec<CombatantGroup>,
    pub actions: Vec<CampaignAction>,
    pub zones: Vec<Zone>,
    pub mission_list: Vec<MissionListEntry>,
    pub template_list: Vec<TemplateListEntry>,
    pub missions: Vec<Mission>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CombatantGroup {
    pub name: String,
    pub size: i32,
    pub groups: Vec<GroupUnit>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupUnit {
    pub group_type: String,
    pub id: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignAction {
    pub id: i32,
    pub action_type: String,
    pub subtype: i32,
    pub opp_type: i32,
    pub team: i32,
    pub iff: i32,
    pub count: i32,
    pub start_before: i32,
    pub start_after: i32,
    pub min_rank: i32,
    pub max_rank: i32,
    pub delay: i32,
    pub probability: i32,
    pub asset_type: String,
    pub asset_id: i32,
    pub target_type: String,
    pub target_id: i32,
    pub target_iff: i32,
    pub location: Vec3,
    pub system: String,
    pub region: String,
    pub file: String,
    pub image: String,
    pub scene: String,
    pub text: String,
    pub source: String,
    pub asset_kills: Vec<String>,
    pub target_kills: Vec<String>,
    pub requirements: Vec<ActionRequirement>,
}

impl Default for CampaignAction {
    fn default() -> Self {
        CampaignAction {
            id: 0,
            action_type: String::new(),
            subtype: 0,
            opp_type: -1,
            team: 0,
            iff: 0,
            count: 1,
            start_before: TIME_NEVER,
            start_after: 0,
            min_rank: 0,
            max_rank: 100,
            delay: 0,
            probability: 100,
            asset_type: String::new(),
            asset_id: 0,
            target_type: String::new(),
            target_id: 0,
            target_iff: 0,
            location: Vec3::default(),
            system: String::new(),
            region: String::new(),
            file: String::new(),
            image: String::new(),
            scene: String::new(),
            text: String::new(),
            source: String::new(),
            asset_kills: Vec::new(),
            target_kills: Vec::new(),
            requirements: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionRequirement {
    pub action: i32,
    pub status: String,
    pub not_action: bool,
    pub combatant1: String,
    pub combatant2: String,
    pub comp: String,
    pub score: i32,
    pub intel: String,
    pub group_type: i32,
    pub group_id: i32,
}

impl Default for ActionRequirement {
    fn default() -> Self {
        ActionRequirement {
            action: 0,
            status: "Complete".to_owned(),
            not_action: false,
            combatant1: String::new(),
            combatant2: String::new(),
            comp: String::new(),
            score: 0,
            intel: String::new(),
            group_type: 0,
            group_id: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Zone {
    pub region: String,
    pub system: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionListEntry {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub system: String,
    pub region: String,
    /// Seconds from campaign start.
    pub start: i32,
    pub script: String,
    pub mission_type: i32,
}

impl Default for MissionListEntry {
    fn default() -> Self {
        MissionListEntry {
            id: 0,
            name: String::new(),
            description: String::new(),
            system: "Unknown".to_owned(),
            region: "Unknown".to_owned(),
            start: 0,
            script: String::new(),
            mission_type: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateListEntry {
    pub id: i32,
    pub name: String,
    pub script: String,
    pub region: String,
    pub mission_type: i32,
    pub group_type: i32,
    pub min_rank: i32,
    pub max_rank: i32,
    pub action_id: i32,
    pub action_status: i32,
    pub exec_once: bool,
    pub start_before: i32,
    pub start_after: i32,
}

impl Default for TemplateListEntry {
    fn default() -> Self {
        TemplateListEntry {
            id: 0,
            name: String::new(),
            script: String::new(),
            region: String::new(),
            mission_type: 0,
            group_type: 0,
            min_rank: 0,
            max_rank: 100,
            action_id: 0,
            action_status: 0,
            exec_once: false,
            start_before: TIME_NEVER,
            start_after: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Mission {
    pub name: String,
    pub scene: String,
    pub description: String,
    pub mission_type: i32,
    pub system: String,
    pub region: String,
    /// Headings in this file are given in degrees.
    pub degrees: bool,
    pub objective: String,
    pub sitrep: String,
    pub subtitles: String,
    pub start: String,
    pub stardate: f64,
    pub team: i32,
    pub target: String,
    pub ward: String,
    pub elements: Vec<MissionElement>,
    pub events: Vec<MissionEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionElement {
    pub name: String,
    pub carrier: String,
    pub commander: String,
    pub squadron: String,
    pub path: String,
    pub design: String,
    pub skin: String,
    pub role: String,
    pub loc: Vec3,
    pub region: String,
    /// Radians.
    pub heading: f64,
    pub iff: i32,
    pub count: i32,
    pub maint_count: i32,
    pub dead_count: i32,
    pub player: i32,
    pub alert: bool,
    pub playable: bool,
    pub rogue: bool,
    pub invulnerable: bool,
    pub command_ai: i32,
    pub respawns: i32,
    pub hold_time: i32,
    pub zone_lock: i32,
    pub instructions: Vec<String>,
    pub objectives: Vec<Instruction>,
    pub navpoints: Vec<Instruction>,
}

impl Default for MissionElement {
    fn default() -> Self {
        MissionElement {
            name: String::new(),
            carrier: String::new(),
            commander: String::new(),
            squadron: String::new(),
            path: String::new(),
            design: String::new(),
            skin: String::new(),
            role: String::new(),
            loc: Vec3::default(),
            region: String::new(),
            heading: 0.0,
            iff: 0,
            count: 1,
            maint_count: 0,
            dead_count: 0,
            player: 0,
            alert: false,
            playable: false,
            rogue: false,
            invulnerable: false,
            command_ai: 0,
            respawns: 0,
            hold_time: 0,
            zone_lock: 0,
            instructions: Vec::new(),
            objectives: Vec::new(),
            navpoints: Vec::new(),
        }
    }
}

/// An element objective or navigation point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instruction {
    pub action: String,
    pub status: String,
    pub formation: String,
    pub speed: i32,
    pub target: String,
    pub target_desc: String,
    pub region: String,
    pub loc: Vec3,
    pub emcon: i32,
    pub weapons_free: bool,
    pub priority: i32,
    pub farcast: bool,
    pub hold_time: i32,
}

impl Default for Instruction {
    fn default() -> Self {
        Instruction {
            action: String::new(),
            status: String::new(),
            formation: String::new(),
            speed: 0,
            target: String::new(),
            target_desc: String::new(),
            region: String::new(),
            loc: Vec3::default(),
            emcon: 0,
            weapons_free: false,
            priority: 1,
            farcast: false,
            hold_time: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionEvent {
    pub id: i32,
    pub time: f64,
    pub delay: f64,
    pub event: String,
    pub event_ship: String,
    pub event_source: String,
    pub event_target: String,
    pub event_message: String,
    pub event_sound: String,
    pub event_chance: i32,
    pub event_param: Vec<i32>,
    pub trigger: String,
    pub trigger_ship: String,
    pub trigger_target: String,
    pub trigger_param: Vec<i32>,
}

impl Default for MissionEvent {
    fn default() -> Self {
        MissionEvent {
            id: 0,
            time: 0.0,
            delay: 0.0,
            event: String::new(),
            event_ship: String::new(),
            event_source: String::new(),
            event_target: String::new(),
            event_message: String::new(),
            event_sound: String::new(),
            event_chance: 100,
            event_param: Vec::new(),
            trigger: String::new(),
            trigger_ship: String::new(),
            trigger_target: String::new(),
            trigger_param: Vec::new(),
        }
    }
}
