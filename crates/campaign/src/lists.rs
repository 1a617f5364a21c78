//! Records of the secondary campaign files: `zones.def`, `Missions.def`
//! and `Templates.def`.

use std::sync::OnceLock;

use shatter_core::{get_def, get_def_time, Def, Term};

use crate::fields::{name_code, number_or_name, number_or_time, FieldTable};
use crate::names::{GROUP_TYPES, MISSION_TYPES, RANKS};
use crate::records::{MissionListEntry, TemplateListEntry, Zone};

pub fn zone_fields() -> &'static FieldTable<Zone> {
    static TABLE: OnceLock<FieldTable<Zone>> = OnceLock::new();
    TABLE.get_or_init(|| {
        FieldTable::<Zone>::new("zone")
            .field("region", |z, d, f| {
                get_def(&mut z.region, Some(d), f);
            })
            .field("system", |z, d, f| {
                get_def(&mut z.system, Some(d), f);
            })
    })
}

pub fn mission_list_fields() -> &'static FieldTable<MissionListEntry> {
    static TABLE: OnceLock<FieldTable<MissionListEntry>> = OnceLock::new();
    TABLE.get_or_init(|| {
        FieldTable::<MissionListEntry>::new("mission list entry")
            .field("id", |m, d, f| {
                get_def(&mut m.id, Some(d), f);
            })
            .field("name", |m, d, f| {
                get_def(&mut m.name, Some(d), f);
            })
            .field("desc", |m, d, f| {
                get_def(&mut m.description, Some(d), f);
            })
            .field("start", |m, d, f| {
                get_def_time(&mut m.start, Some(d), f);
            })
            .field("system", |m, d, f| {
                get_def(&mut m.system, Some(d), f);
            })
            .field("region", |m, d, f| {
                get_def(&mut m.region, Some(d), f);
            })
            .field("script", |m, d, f| {
                get_def(&mut m.script, Some(d), f);
            })
            .field("type", |m, d, f| name_code(&mut m.mission_type, d, f, &MISSION_TYPES))
    })
}

pub fn template_fields() -> &'static FieldTable<TemplateListEntry> {
    static TABLE: OnceLock<FieldTable<TemplateListEntry>> = OnceLock::new();
    TABLE.get_or_init(|| {
        FieldTable::<TemplateListEntry>::new("template list entry")
            .field("id", |t, d, f| {
                get_def(&mut t.id, Some(d), f);
            })
            .field("name", |t, d, f| {
                get_def(&mut t.name, Some(d), f);
            })
            .field("script", |t, d, f| {
                get_def(&mut t.script, Some(d), f);
            })
            .fields(&["region", "rgn"], |t, d, f| {
                get_def(&mut t.region, Some(d), f);
            })
            .field("type", |t, d, f| name_code(&mut t.mission_type, d, f, &MISSION_TYPES))
            .field("group", |t, d, f| name_code(&mut t.group_type, d, f, &GROUP_TYPES))
            .field("min_rank", |t, d, f| number_or_name(&mut t.min_rank, d, f, &RANKS))
            .field("max_rank", |t, d, f| number_or_name(&mut t.max_rank, d, f, &RANKS))
            .field("action_id", |t, d, f| {
                get_def(&mut t.action_id, Some(d), f);
            })
            .field("action_status", |t, d, f| {
                get_def(&mut t.action_status, Some(d), f);
            })
            .field("exec_once", |t, d, f| match d.value {
                Term::Number(n) => t.exec_once = n != 0.0,
                _ => {
                    get_def(&mut t.exec_once, Some(d), f);
                }
            })
            .containing("before", |t, d, f| number_or_time(&mut t.start_before, d, f))
            .containing("after", |t, d, f| number_or_time(&mut t.start_after, d, f))
    })
}

pub fn parse_zone(body: &[Def], file: &str) -> Zone {
    zone_fields().build(body, file)
}

pub fn parse_mission_entry(body: &[Def], file: &str) -> MissionListEntry {
    mission_list_fields().build(body, file)
}

pub fn parse_template(body: &[Def], file: &str) -> TemplateListEntry {
    template_fields().build(body, file)
}
