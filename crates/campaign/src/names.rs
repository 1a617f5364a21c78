//! Name tables mapping campaign vocabulary to integer codes.
//!
//! Lookups ignore case and every non-alphanumeric character, so
//! `"Airborne Patrol"`, `"airborne_patrol"` and `"AIRBORNE-PATROL"` are the
//! same name.

/// A fixed vocabulary for one kind of coded value.
#[derive(Debug)]
pub struct NameTable {
    kind: &'static str,
    entries: &'static [(&'static str, i32)],
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

impl NameTable {
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn lookup(&self, name: &str) -> Option<i32> {
        let key = normalize(name);
        self.entries
            .iter()
            .find(|(n, _)| normalize(n) == key)
            .map(|&(_, code)| code)
    }

    /// Code for `name`, or 0 with a warning when the name is unknown.
    pub fn code(&self, name: &str, file: &str) -> i32 {
        self.lookup(name).unwrap_or_else(|| {
            tracing::warn!("unknown {} '{}' in '{}'", self.kind, name, file);
            0
        })
    }

    /// Canonical name for `code`.
    pub fn name_of(&self, code: i32) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|&&(_, c)| c == code)
            .map(|&(n, _)| n)
    }
}

pub static MISSION_TYPES: NameTable = NameTable {
    kind: "mission type",
    entries: &[
        ("Patrol", 0),
        ("Sweep", 1),
        ("Intercept", 2),
        ("Airborne Patrol", 3),
        ("Airborne Sweep", 4),
        ("Airborne Intercept", 5),
        ("Strike", 6),
        ("Assault", 7),
        ("Defend", 8),
        ("Escort", 9),
        ("Freight Escort", 10),
        ("Escort Freight", 10),
        ("Shuttle Escort", 11),
        ("Escort Shuttle", 11),
        ("Strike Escort", 12),
        ("Escort Strike", 12),
        ("Intel", 13),
        ("Scout", 14),
        ("Recon", 15),
        ("Blockade", 16),
        ("Fleet", 17),
        ("Attack", 18),
        ("Bombardment", 18),
        ("Flight Ops", 19),
        ("Transport", 20),
        ("Cargo", 21),
        ("Training", 22),
        ("Misc", 23),
        ("Other", 23),
    ],
};

pub static GROUP_TYPES: NameTable = NameTable {
    kind: "combat group type",
    entries: &[
        ("force", 1),
        ("wing", 2),
        ("intercept_squadron", 3),
        ("fighter_squadron", 4),
        ("attack_squadron", 5),
        ("lca_squadron", 6),
        ("fleet", 7),
        ("destroyer_squadron", 8),
        ("battle_group", 9),
        ("carrier_group", 10),
        ("battalion", 11),
        ("minefield", 12),
        ("battery", 13),
        ("missile", 14),
        ("station", 15),
        ("starbase", 16),
        ("c3i", 17),
        ("comm_relay", 18),
        ("early_warning", 19),
        ("fwd_control_ctr", 20),
        ("ecm", 21),
        ("support", 22),
        ("courier", 23),
        ("medical", 24),
        ("supply", 25),
        ("repair", 26),
        ("civilian", 27),
        ("war_production", 28),
        ("factory", 29),
        ("refinery", 30),
        ("resource", 31),
        ("infrastructure", 32),
        ("transport", 33),
        ("network", 34),
        ("habitat", 35),
        ("storage", 36),
        ("non_com", 37),
    ],
};

pub static RANKS: NameTable = NameTable {
    kind: "rank",
    entries: &[
        ("Ensign", 0),
        ("Lieutenant JG", 1),
        ("Lieutenant", 2),
        ("Lt Commander", 3),
        ("Lieutenant Commander", 3),
        ("Commander", 4),
        ("Captain", 5),
        ("Commodore", 6),
        ("Rear Admiral", 7),
        ("Vice Admiral", 8),
        ("Admiral", 9),
        ("Fleet Admiral", 10),
    ],
};

pub static INTEL_LEVELS: NameTable = NameTable {
    kind: "intel level",
    entries: &[
        ("reserve", 1),
        ("secret", 2),
        ("known", 3),
        ("located", 4),
        ("tracked", 5),
    ],
};

pub static ACTION_TYPES: NameTable = NameTable {
    kind: "action type",
    entries: &[
        ("no_action", 0),
        ("strategic_directive", 1),
        ("zone_assignment", 2),
        ("system_assignment", 3),
        ("mission_template", 4),
        ("combat_event", 5),
        ("intel_event", 6),
        ("campaign_situation", 7),
        ("campaign_orders", 8),
    ],
};

pub const MISSION_TEMPLATE: i32 = 4;
pub const COMBAT_EVENT: i32 = 5;
pub const INTEL_EVENT: i32 = 6;

pub static COMBAT_EVENTS: NameTable = NameTable {
    kind: "combat event",
    entries: &[
        ("attack", 0),
        ("defend", 1),
        ("move_to", 2),
        ("capture", 3),
        ("strategy", 4),
        ("campaign_start", 5),
        ("story", 6),
        ("campaign_end", 7),
        ("campaign_fail", 8),
    ],
};
