//! `action` structs of the campaign file and their `req` requirements.

use std::sync::OnceLock;

use shatter_core::{get_def, Def, Term};

use crate::fields::{
    name_code, number_or_name, number_or_time, push_def, struct_body, FieldTable,
};
use crate::names::{
    ACTION_TYPES, COMBAT_EVENTS, COMBAT_EVENT, GROUP_TYPES, INTEL_EVENT, INTEL_LEVELS,
    MISSION_TEMPLATE, MISSION_TYPES, RANKS,
};
use crate::records::{ActionRequirement, CampaignAction};

pub fn action_fields() -> &'static FieldTable<CampaignAction> {
    static TABLE: OnceLock<FieldTable<CampaignAction>> = OnceLock::new();
    TABLE.get_or_init(|| {
        FieldTable::<CampaignAction>::new("action")
            .field("id", |a, d, f| {
                get_def(&mut a.id, Some(d), f);
            })
            .field("type", |a, d, f| {
                get_def(&mut a.action_type, Some(d), f);
            })
            .field("subtype", subtype)
            .field("opp_type", |a, d, f| number_or_name(&mut a.opp_type, d, f, &MISSION_TYPES))
            .field("source", |a, d, f| {
                get_def(&mut a.source, Some(d), f);
            })
            .field("team", |a, d, f| {
                get_def(&mut a.team, Some(d), f);
            })
            .field("iff", |a, d, f| {
                get_def(&mut a.iff, Some(d), f);
            })
            .field("count", |a, d, f| {
                get_def(&mut a.count, Some(d), f);
            })
            .field("min_rank", |a, d, f| number_or_name(&mut a.min_rank, d, f, &RANKS))
            .field("max_rank", |a, d, f| number_or_name(&mut a.max_rank, d, f, &RANKS))
            .field("delay", |a, d, f| {
                get_def(&mut a.delay, Some(d), f);
            })
            .field("probability", |a, d, f| {
                get_def(&mut a.probability, Some(d), f);
            })
            .field("asset_type", |a, d, f| {
                get_def(&mut a.asset_type, Some(d), f);
            })
            .field("asset_id", |a, d, f| {
                get_def(&mut a.asset_id, Some(d), f);
            })
            .field("target_type", |a, d, f| {
                get_def(&mut a.target_type, Some(d), f);
            })
            .field("target_id", |a, d, f| {
                get_def(&mut a.target_id, Some(d), f);
            })
            .field("target_iff", |a, d, f| {
                get_def(&mut a.target_iff, Some(d), f);
            })
            .fields(&["location", "loc"], |a, d, f| {
                get_def(&mut a.location, Some(d), f);
            })
            .fields(&["system", "sys"], |a, d, f| {
                get_def(&mut a.system, Some(d), f);
            })
            .fields(&["region", "rgn", "zone"], |a, d, f| {
                get_def(&mut a.region, Some(d), f);
            })
            .field("file", |a, d, f| {
                get_def(&mut a.file, Some(d), f);
            })
            .field("image", |a, d, f| {
                get_def(&mut a.image, Some(d), f);
            })
            .field("scene", |a, d, f| {
                get_def(&mut a.scene, Some(d), f);
            })
            .field("text", |a, d, f| {
                get_def(&mut a.text, Some(d), f);
            })
            .field("asset_kill", |a, d, f| push_def(&mut a.asset_kills, d, f))
            .field("target_kill", |a, d, f| push_def(&mut a.target_kills, d, f))
            .field("req", |a, d, f| {
                if let Some(body) = struct_body(d, f) {
                    a.requirements.push(requirement_fields().build(body, f));
                }
            })
            .containing("before", |a, d, f| number_or_time(&mut a.start_before, d, f))
            .containing("after", |a, d, f| number_or_time(&mut a.start_after, d, f))
    })
}

/// Subtype names are interpreted according to the action's type, so
/// `type` must appear before `subtype` for a named subtype to resolve.
fn subtype(a: &mut CampaignAction, d: &Def, f: &str) {
    let Term::Text(name) = &d.value else {
        get_def(&mut a.subtype, Some(d), f);
        return;
    };
    let table = match ACTION_TYPES.lookup(&a.action_type) {
        Some(MISSION_TEMPLATE) => &MISSION_TYPES,
        Some(COMBAT_EVENT) => &COMBAT_EVENTS,
        Some(INTEL_EVENT) => &INTEL_LEVELS,
        _ => {
            tracing::warn!(
                "named subtype '{}' needs a typed action (action {} in '{}')",
                name,
                a.id,
                f
            );
            return;
        }
    };
    a.subtype = table.code(name, f);
}

pub fn requirement_fields() -> &'static FieldTable<ActionRequirement> {
    static TABLE: OnceLock<FieldTable<ActionRequirement>> = OnceLock::new();
    TABLE.get_or_init(|| {
        FieldTable::<ActionRequirement>::new("req")
            .field("action", |r, d, f| {
                get_def(&mut r.action, Some(d), f);
            })
            .field("status", |r, d, f| {
                get_def(&mut r.status, Some(d), f);
            })
            .field("not", |r, d, f| {
                get_def(&mut r.not_action, Some(d), f);
            })
            .field("c1", |r, d, f| {
                get_def(&mut r.combatant1, Some(d), f);
            })
            .field("c2", |r, d, f| {
                get_def(&mut r.combatant2, Some(d), f);
            })
            .field("comp", |r, d, f| {
                get_def(&mut r.comp, Some(d), f);
            })
            .field("score", |r, d, f| {
                get_def(&mut r.score, Some(d), f);
            })
            .field("intel", |r, d, f| match &d.value {
                Term::Number(n) => match INTEL_LEVELS.name_of(*n as i32) {
                    Some(name) => r.intel = name.to_owned(),
                    None => tracing::warn!("unknown intel level {} in '{}'", n, f),
                },
                _ => {
                    get_def(&mut r.intel, Some(d), f);
                }
            })
            .field("group_type", |r, d, f| name_code(&mut r.group_type, d, f, &GROUP_TYPES))
            .field("group_id", |r, d, f| {
                get_def(&mut r.group_id, Some(d), f);
            })
    })
}

/// Build one action from its struct body, starting from the defaults.
pub fn parse_action(body: &[Def], file: &str) -> CampaignAction {
    action_fields().build(body, file)
}
