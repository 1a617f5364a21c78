//! Fields of the root `campaign.def` file.

use std::sync::OnceLock;

use shatter_core::get_def;

use crate::action::parse_action;
use crate::combatant::parse_combatant;
use crate::fields::{push_def, struct_body, FieldTable};
use crate::records::Campaign;

pub fn campaign_fields() -> &'static FieldTable<Campaign> {
    static TABLE: OnceLock<FieldTable<Campaign>> = OnceLock::new();
    TABLE.get_or_init(|| {
        FieldTable::<Campaign>::new("campaign")
            .field("name", |c, d, f| {
                get_def(&mut c.name, Some(d), f);
            })
            .field("desc", |c, d, f| {
                get_def(&mut c.description, Some(d), f);
            })
            .field("situation", |c, d, f| {
                get_def(&mut c.situation, Some(d), f);
            })
            .field("orders", |c, d, f| push_def(&mut c.orders, d, f))
            .field("scripted", |c, d, f| {
                get_def(&mut c.scripted, Some(d), f);
            })
            .field("sequential", |c, d, f| {
                get_def(&mut c.sequential, Some(d), f);
            })
            .field("combatant_groups", |c, d, f| {
                get_def(&mut c.combatant_size, Some(d), f);
            })
            .field("action_groups", |c, d, f| {
                get_def(&mut c.action_size, Some(d), f);
            })
            .field("action", |c, d, f| {
                if let Some(body) = struct_body(d, f) {
                    c.actions.push(parse_action(body, f));
                }
            })
            .field("combatant", |c, d, f| {
                if let Some(body) = struct_body(d, f) {
                    c.combatants.push(parse_combatant(body, f));
                }
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shatter_core::{parse_str, Term};

    #[test]
    fn root_fields_and_lists() {
        let src = "name = \"Operation Live Fire\"\n\
                   desc = \"Training\"\n\
                   orders = \"first\"\norders = \"second\"\n\
                   scripted = true\n\
                   action_groups = 2\n\
                   action = { id = 1 }\naction = { id = 2, probability = 50 }\n\
                   combatant = { name = \"Alliance\" }";
        let terms = parse_str(src, "campaign.def").unwrap();
        let mut c = Campaign::default();
        for def in terms.iter().filter_map(Term::as_def) {
            campaign_fields().apply(&mut c, def, "campaign.def");
        }
        assert_eq!(c.name, "Operation Live Fire");
        assert_eq!(c.orders, vec!["first", "second"]);
        assert!(c.scripted);
        assert!(!c.sequential);
        assert_eq!(c.action_size, 2);
        assert_eq!(c.actions.len(), 2);
        assert_eq!(c.actions[0].probability, 100);
        assert_eq!(c.actions[1].probability, 50);
        assert_eq!(c.combatants[0].name, "Alliance");
    }
}
