//! shatter-campaign: Starshatter campaign data from definition files.
//!
//! [`CampaignLoader`] reads a campaign directory through a
//! [`DataProvider`] and assembles a [`Campaign`] record graph. Each record
//! type has a [`FieldTable`] mapping field names to handlers; the tables
//! are public so single records can be parsed on their own.

pub mod action;
pub mod campaign;
pub mod combatant;
pub mod config;
pub mod error;
pub mod fields;
pub mod lists;
pub mod loader;
pub mod mission;
pub mod names;
pub mod provider;
pub mod records;

pub use config::{FileNames, LoaderConfig};
pub use error::{ConfigError, LoadIssue};
pub use fields::FieldTable;
pub use loader::{CampaignLoader, LoadReport};
pub use provider::{DataProvider, FileSystemProvider, InMemoryProvider};
pub use records::{
    ActionRequirement, Campaign, CampaignAction, CombatantGroup, GroupUnit, Instruction, Mission,
    MissionElement, MissionEvent, MissionListEntry, TemplateListEntry, Zone, TIME_NEVER,
};
