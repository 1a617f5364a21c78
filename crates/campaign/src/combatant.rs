//! `combatant` structs of the campaign file.

use std::sync::OnceLock;

use shatter_core::{get_def, Def};

use crate::fields::{struct_body, FieldTable};
use crate::records::{CombatantGroup, GroupUnit};

pub fn combatant_fields() -> &'static FieldTable<CombatantGroup> {
    static TABLE: OnceLock<FieldTable<CombatantGroup>> = OnceLock::new();
    TABLE.get_or_init(|| {
        FieldTable::<CombatantGroup>::new("combatant")
            .field("name", |c, d, f| {
                get_def(&mut c.name, Some(d), f);
            })
            .field("size", |c, d, f| {
                get_def(&mut c.size, Some(d), f);
            })
            .field("group", |c, d, f| {
                if let Some(body) = struct_body(d, f) {
                    c.groups.push(group_fields().build(body, f));
                }
            })
    })
}

fn group_fields() -> &'static FieldTable<GroupUnit> {
    static TABLE: OnceLock<FieldTable<GroupUnit>> = OnceLock::new();
    TABLE.get_or_init(|| {
        FieldTable::<GroupUnit>::new("group")
            .field("type", |g, d, f| {
                get_def(&mut g.group_type, Some(d), f);
            })
            .field("id", |g, d, f| {
                get_def(&mut g.id, Some(d), f);
            })
    })
}

pub fn parse_combatant(body: &[Def], file: &str) -> CombatantGroup {
    combatant_fields().build(body, file)
}
