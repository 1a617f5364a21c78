//! Mission scene files under `Scenes/`.
//!
//! A scene file is a flat list of mission fields plus `element` (or
//! `ship` / `station`) and `event` structs. Elements carry their own
//! `objective` and `navpt` instructions.

use std::sync::OnceLock;

use shatter_core::{get_def, Def, Term, Vec3};

use crate::fields::{name_code, push_def, struct_body, FieldTable};
use crate::names::MISSION_TYPES;
use crate::records::{Instruction, Mission, MissionElement, MissionEvent};

pub fn mission_fields() -> &'static FieldTable<Mission> {
    static TABLE: OnceLock<FieldTable<Mission>> = OnceLock::new();
    TABLE.get_or_init(|| {
        FieldTable::<Mission>::new("mission")
            .field("name", |m, d, f| {
                get_def(&mut m.name, Some(d), f);
            })
            .field("scene", |m, d, f| {
                get_def(&mut m.scene, Some(d), f);
            })
            .field("desc", |m, d, f| {
                get_def(&mut m.description, Some(d), f);
            })
            .field("type", |m, d, f| name_code(&mut m.mission_type, d, f, &MISSION_TYPES))
            .field("system", |m, d, f| {
                get_def(&mut m.system, Some(d), f);
            })
            .field("region", |m, d, f| {
                get_def(&mut m.region, Some(d), f);
            })
            .field("degrees", |m, d, f| {
                get_def(&mut m.degrees, Some(d), f);
            })
            .field("objective", |m, d, f| {
                get_def(&mut m.objective, Some(d), f);
            })
            .field("sitrep", |m, d, f| {
                get_def(&mut m.sitrep, Some(d), f);
            })
            .field("subtitles", |m, d, f| {
                get_def(&mut m.subtitles, Some(d), f);
            })
            .field("start", |m, d, f| {
                get_def(&mut m.start, Some(d), f);
            })
            .field("stardate", |m, d, f| {
                get_def(&mut m.stardate, Some(d), f);
            })
            .field("team", |m, d, f| {
                get_def(&mut m.team, Some(d), f);
            })
            .field("target", |m, d, f| {
                get_def(&mut m.target, Some(d), f);
            })
            .field("ward", |m, d, f| {
                get_def(&mut m.ward, Some(d), f);
            })
            .fields(&["element", "ship", "station"], |m, d, f| {
                if let Some(body) = struct_body(d, f) {
                    let elem = parse_element(body, m.degrees, f);
                    m.elements.push(elem);
                }
            })
            .field("event", |m, d, f| {
                if let Some(body) = struct_body(d, f) {
                    m.events.push(event_fields().build(body, f));
                }
            })
    })
}

/// Element being built, plus the unit of its headings.
struct ElementDraft {
    elem: MissionElement,
    degrees: bool,
}

fn element_fields() -> &'static FieldTable<ElementDraft> {
    static TABLE: OnceLock<FieldTable<ElementDraft>> = OnceLock::new();
    TABLE.get_or_init(|| {
        FieldTable::<ElementDraft>::new("element")
            .field("name", |e, d, f| {
                get_def(&mut e.elem.name, Some(d), f);
            })
            .field("carrier", |e, d, f| {
                get_def(&mut e.elem.carrier, Some(d), f);
            })
            .field("commander", |e, d, f| {
                get_def(&mut e.elem.commander, Some(d), f);
            })
            .field("squadron", |e, d, f| {
                get_def(&mut e.elem.squadron, Some(d), f);
            })
            .field("path", |e, d, f| {
                get_def(&mut e.elem.path, Some(d), f);
            })
            .field("design", |e, d, f| {
                get_def(&mut e.elem.design, Some(d), f);
            })
            .field("skin", |e, d, f| {
                get_def(&mut e.elem.skin, Some(d), f);
            })
            .fields(&["mission", "intel"], |e, d, f| {
                get_def(&mut e.elem.role, Some(d), f);
            })
            .field("loc", |e, d, f| {
                get_def(&mut e.elem.loc, Some(d), f);
            })
            .fields(&["region", "rgn"], |e, d, f| {
                get_def(&mut e.elem.region, Some(d), f);
            })
            .field("iff", |e, d, f| {
                get_def(&mut e.elem.iff, Some(d), f);
            })
            .field("count", |e, d, f| {
                get_def(&mut e.elem.count, Some(d), f);
            })
            .field("maint_count", |e, d, f| {
                get_def(&mut e.elem.maint_count, Some(d), f);
            })
            .field("dead_count", |e, d, f| {
                get_def(&mut e.elem.dead_count, Some(d), f);
            })
            .field("player", |e, d, f| {
                get_def(&mut e.elem.player, Some(d), f);
            })
            .field("alert", |e, d, f| {
                get_def(&mut e.elem.alert, Some(d), f);
            })
            .field("playable", |e, d, f| {
                get_def(&mut e.elem.playable, Some(d), f);
            })
            .field("rogue", |e, d, f| {
                get_def(&mut e.elem.rogue, Some(d), f);
            })
            .field("invulnerable", |e, d, f| {
                get_def(&mut e.elem.invulnerable, Some(d), f);
            })
            .field("command_ai", |e, d, f| {
                get_def(&mut e.elem.command_ai, Some(d), f);
            })
            .field("instr", |e, d, f| push_def(&mut e.elem.instructions, d, f))
            .field("objective", |e, d, f| {
                if let Some(body) = struct_body(d, f) {
                    e.elem.objectives.push(instruction_fields().build(body, f));
                }
            })
            .fields(&["order", "navpt"], |e, d, f| {
                if let Some(body) = struct_body(d, f) {
                    e.elem.navpoints.push(instruction_fields().build(body, f));
                }
            })
            .fields(&["ship", "loadout", "rloc"], |_, d, f| {
                struct_body(d, f);
            })
            .prefixed("head", heading)
            .prefixed("respawn", |e, d, f| {
                get_def(&mut e.elem.respawns, Some(d), f);
            })
            .prefixed("hold", |e, d, f| {
                get_def(&mut e.elem.hold_time, Some(d), f);
            })
            .prefixed("zone", |e, d, f| match d.value {
                Term::Bool(locked) => e.elem.zone_lock = i32::from(locked),
                _ => {
                    get_def(&mut e.elem.zone_lock, Some(d), f);
                }
            })
    })
}

/// A heading is a number or a vector whose z component is the heading.
fn heading(e: &mut ElementDraft, d: &Def, f: &str) {
    let value = match &d.value {
        Term::Array(_) => {
            let mut v = Vec3::default();
            if !get_def(&mut v, Some(d), f) {
                return;
            }
            f64::from(v.z)
        }
        _ => {
            let mut h = 0.0f64;
            if !get_def(&mut h, Some(d), f) {
                return;
            }
            h
        }
    };
    e.elem.heading = if e.degrees { value.to_radians() } else { value };
}

pub fn parse_element(body: &[Def], degrees: bool, file: &str) -> MissionElement {
    let mut draft = ElementDraft {
        elem: MissionElement::default(),
        degrees,
    };
    element_fields().apply_all(&mut draft, body, file);
    draft.elem
}

pub fn instruction_fields() -> &'static FieldTable<Instruction> {
    static TABLE: OnceLock<FieldTable<Instruction>> = OnceLock::new();
    TABLE.get_or_init(|| {
        FieldTable::<Instruction>::new("instruction")
            .fields(&["cmd", "action"], |i, d, f| {
                get_def(&mut i.action, Some(d), f);
            })
            .field("status", |i, d, f| {
                get_def(&mut i.status, Some(d), f);
            })
            .field("formation", |i, d, f| {
                get_def(&mut i.formation, Some(d), f);
            })
            .field("speed", |i, d, f| {
                get_def(&mut i.speed, Some(d), f);
            })
            .field("target", |i, d, f| {
                get_def(&mut i.target, Some(d), f);
            })
            .field("tgt_desc", |i, d, f| {
                get_def(&mut i.target_desc, Some(d), f);
            })
            .fields(&["rgn", "region"], |i, d, f| {
                get_def(&mut i.region, Some(d), f);
            })
            .field("loc", |i, d, f| {
                get_def(&mut i.loc, Some(d), f);
            })
            .field("emcon", |i, d, f| {
                get_def(&mut i.emcon, Some(d), f);
            })
            .field("wep_free", |i, d, f| {
                get_def(&mut i.weapons_free, Some(d), f);
            })
            .field("priority", |i, d, f| {
                get_def(&mut i.priority, Some(d), f);
            })
            .field("farcast", |i, d, f| {
                get_def(&mut i.farcast, Some(d), f);
            })
            .field("hold", |i, d, f| {
                get_def(&mut i.hold_time, Some(d), f);
            })
    })
}

pub fn event_fields() -> &'static FieldTable<MissionEvent> {
    static TABLE: OnceLock<FieldTable<MissionEvent>> = OnceLock::new();
    TABLE.get_or_init(|| {
        FieldTable::<MissionEvent>::new("event")
            .field("id", |e, d, f| {
                get_def(&mut e.id, Some(d), f);
            })
            .field("time", |e, d, f| {
                get_def(&mut e.time, Some(d), f);
            })
            .field("delay", |e, d, f| {
                get_def(&mut e.delay, Some(d), f);
            })
            .field("event", |e, d, f| {
                get_def(&mut e.event, Some(d), f);
            })
            .field("event_ship", |e, d, f| {
                get_def(&mut e.event_ship, Some(d), f);
            })
            .field("event_source", |e, d, f| {
                get_def(&mut e.event_source, Some(d), f);
            })
            .field("event_target", |e, d, f| {
                get_def(&mut e.event_target, Some(d), f);
            })
            .field("event_message", |e, d, f| {
                get_def(&mut e.event_message, Some(d), f);
            })
            .field("event_sound", |e, d, f| {
                get_def(&mut e.event_sound, Some(d), f);
            })
            .field("event_chance", |e, d, f| {
                get_def(&mut e.event_chance, Some(d), f);
            })
            .field("event_param", |e, d, f| param(&mut e.event_param, d, f))
            .field("trigger", |e, d, f| {
                get_def(&mut e.trigger, Some(d), f);
            })
            .field("trigger_ship", |e, d, f| {
                get_def(&mut e.trigger_ship, Some(d), f);
            })
            .field("trigger_target", |e, d, f| {
                get_def(&mut e.trigger_target, Some(d), f);
            })
            .field("trigger_param", |e, d, f| param(&mut e.trigger_param, d, f))
    })
}

/// Event parameters are a single number or an array of numbers.
fn param(dst: &mut Vec<i32>, d: &Def, f: &str) {
    match d.value {
        Term::Number(n) => *dst = vec![n as i32],
        _ => {
            get_def(dst, Some(d), f);
        }
    }
}

/// Build a mission from the definitions of one scene file.
pub fn parse_mission<'a>(defs: impl IntoIterator<Item = &'a Def>, file: &str) -> Mission {
    let table = mission_fields();
    let mut mission = Mission::default();
    for def in defs {
        table.apply(&mut mission, def, file);
    }
    mission
}

#[cfg(test)]
mod tests {
    use super::*;
    use shatter_core::parse_str;

    fn mission(src: &str) -> Mission {
        let terms = parse_str(src, "Scenes/m.def").unwrap();
        parse_mission(terms.iter().filter_map(Term::as_def), "Scenes/m.def")
    }

    #[test]
    fn scalar_fields() {
        let m = mission(
            "name = \"Op Talon\"\ntype = \"Strike\"\nsystem = \"Janus\"\n\
             desc = \"A long description that runs past thirty two characters\"\n\
             stardate = 1150000.5\nteam = 1\nstart = \"33:00:00\"",
        );
        assert_eq!(m.name, "Op Talon");
        assert_eq!(m.mission_type, 6);
        assert_eq!(m.system, "Janus");
        assert!(m.description.len() > 32);
        assert_eq!(m.stardate, 1150000.5);
        assert_eq!(m.team, 1);
        assert_eq!(m.start, "33:00:00");
    }

    #[test]
    fn elements_from_all_three_names() {
        let m = mission(
            "element = { name = \"Alpha\" }\nship = { name = \"Beta\" }\nstation = { name = \"Gamma\" }",
        );
        let names: Vec<_> = m.elements.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta", "Gamma"]);
        assert_eq!(m.elements[0].count, 1);
    }

    #[test]
    fn heading_uses_degrees_flag() {
        let m = mission("degrees = true\nelement = { name = \"A\", heading = 90 }");
        assert!((m.elements[0].heading - std::f64::consts::FRAC_PI_2).abs() < 1e-9);

        let m = mission("element = { name = \"A\", head = (0, 0, 1.5) }");
        assert!((m.elements[0].heading - 1.5).abs() < 1e-6);
    }

    #[test]
    fn element_prefix_fields() {
        let m = mission(
            "element = { respawns = 2, hold_time = 30, zone_locked = true, \
             instr = \"Hold position\", instr = \"Go\", ship = { name = \"x\" } }",
        );
        let e = &m.elements[0];
        assert_eq!(e.respawns, 2);
        assert_eq!(e.hold_time, 30);
        assert_eq!(e.zone_lock, 1);
        assert_eq!(e.instructions, vec!["Hold position", "Go"]);
        assert_eq!(e.name, "");
    }

    #[test]
    fn objectives_and_navpoints() {
        let m = mission(
            "element = {\n\
               objective = { cmd = \"Patrol\", tgt = \"x\", tgt_desc = \"station\" }\n\
               navpt = { cmd = \"Vector\", loc = (1, 2, 3), speed = 500, rgn = \"Ostara\" }\n\
               order = { action = \"Escort\", priority = 2, wep_free = true }\n\
             }",
        );
        let e = &m.elements[0];
        assert_eq!(e.objectives.len(), 1);
        assert_eq!(e.objectives[0].target_desc, "station");
        assert_eq!(e.objectives[0].priority, 1);
        assert_eq!(e.navpoints.len(), 2);
        assert_eq!(e.navpoints[0].loc, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(e.navpoints[0].region, "Ostara");
        assert!(e.navpoints[1].weapons_free);
        assert_eq!(e.navpoints[1].priority, 2);
    }

    #[test]
    fn events() {
        let m = mission(
            "event = { id = 1, time = 20, event = \"Message\", event_message = \"hi\", \
             trigger = \"Time\", trigger_param = 5 }\n\
             event = { id = 2, event_param = (1, 2), event_chance = 50 }",
        );
        assert_eq!(m.events.len(), 2);
        assert_eq!(m.events[0].trigger_param, vec![5]);
        assert_eq!(m.events[0].event_chance, 100);
        assert_eq!(m.events[1].event_param, vec![1, 2]);
        assert_eq!(m.events[1].event_chance, 50);
    }

    #[test]
    fn non_struct_element_is_skipped() {
        let m = mission("element = \"nope\"\nname = \"still read\"");
        assert!(m.elements.is_empty());
        assert_eq!(m.name, "still read");
    }
}
