//! Multi-file campaign assembly.
//!
//! One campaign directory holds:
//!
//! - `campaign.def` -- name, orders, actions, combatants
//! - `zones.def` -- tagged `ZONES`
//! - `Missions.def` -- tagged `MISSIONLIST`, optional
//! - `Templates.def` -- tagged `TEMPLATELIST`, optional
//! - `Scenes/*.def` -- one mission per file
//!
//! Loading is best-effort: a file that is missing, unreadable or malformed
//! leaves its part of the campaign empty (or holding whatever was read
//! before the error) and is recorded as a [`LoadIssue`].

use std::path::{Path, PathBuf};

use shatter_core::{BlockSource, Parser, Term};

use crate::campaign::campaign_fields;
use crate::config::LoaderConfig;
use crate::error::LoadIssue;
use crate::fields::FieldTable;
use crate::lists::{mission_list_fields, template_fields, zone_fields};
use crate::mission::parse_mission;
use crate::provider::DataProvider;
use crate::records::{Campaign, Mission, MissionListEntry, TemplateListEntry, Zone};

/// Result of loading one campaign directory.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub dir: PathBuf,
    pub campaign: Campaign,
    pub issues: Vec<LoadIssue>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// A secondary file's expected tag and record name.
struct ListFile {
    tag: &'static str,
    record: &'static str,
    optional: bool,
}

const ZONES: ListFile = ListFile {
    tag: "ZONES",
    record: "zone",
    optional: false,
};

const MISSION_LIST: ListFile = ListFile {
    tag: "MISSIONLIST",
    record: "mission",
    optional: true,
};

const TEMPLATE_LIST: ListFile = ListFile {
    tag: "TEMPLATELIST",
    record: "mission",
    optional: true,
};

fn report(issues: &mut Vec<LoadIssue>, issue: LoadIssue) {
    match &issue {
        LoadIssue::MissingFile { .. } => tracing::info!("{}", issue),
        _ => tracing::warn!("{}", issue),
    }
    issues.push(issue);
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

/// Skip a leading bare-text header, if any.
fn without_header(terms: &[Term]) -> &[Term] {
    match terms.first() {
        Some(Term::Text(_)) => &terms[1..],
        _ => terms,
    }
}

pub struct CampaignLoader<P> {
    provider: P,
    config: LoaderConfig,
}

impl<P: DataProvider> CampaignLoader<P> {
    pub fn new(provider: P, config: LoaderConfig) -> Self {
        CampaignLoader { provider, config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Load every configured campaign, in configuration order.
    pub fn load_all(&self) -> Vec<LoadReport> {
        self.config
            .campaigns
            .iter()
            .map(|&n| self.load_campaign(&self.config.campaign_dir(n)))
            .collect()
    }

    /// Load one campaign directory: root file, zones, mission list,
    /// template list, then scenes.
    pub fn load_campaign(&self, dir: &Path) -> LoadReport {
        let mut issues = Vec::new();
        let root = dir.join(&self.config.files.campaign);
        tracing::info!("loading campaign '{}'", root.display());

        let mut campaign = Campaign::default();
        if let Some(terms) = self.read_terms(&root, &mut issues) {
            let file = display(&root);
            let table = campaign_fields();
            for def in without_header(&terms).iter().filter_map(Term::as_def) {
                table.apply(&mut campaign, def, &file);
            }
        }

        campaign.zones = self.load_zones(dir, &mut issues);
        campaign.mission_list = self.load_mission_list(dir, &mut issues);
        campaign.template_list = self.load_template_list(dir, &mut issues);
        campaign.missions = self.load_missions(dir, &mut issues);

        tracing::info!(
            "campaign '{}': {} actions, {} combatants, {} zones, {} missions, {} issues",
            campaign.name,
            campaign.actions.len(),
            campaign.combatants.len(),
            campaign.zones.len(),
            campaign.missions.len(),
            issues.len()
        );
        LoadReport {
            dir: dir.to_path_buf(),
            campaign,
            issues,
        }
    }

    pub fn load_zones(&self, dir: &Path, issues: &mut Vec<LoadIssue>) -> Vec<Zone> {
        let path = dir.join(&self.config.files.zones);
        self.load_list(&path, &ZONES, zone_fields(), issues)
    }

    pub fn load_mission_list(
        &self,
        dir: &Path,
        issues: &mut Vec<LoadIssue>,
    ) -> Vec<MissionListEntry> {
        let path = dir.join(&self.config.files.missions);
        self.load_list(&path, &MISSION_LIST, mission_list_fields(), issues)
    }

    pub fn load_template_list(
        &self,
        dir: &Path,
        issues: &mut Vec<LoadIssue>,
    ) -> Vec<TemplateListEntry> {
        let path = dir.join(&self.config.files.templates);
        self.load_list(&path, &TEMPLATE_LIST, template_fields(), issues)
    }

    /// Every scene file under the scenes directory, one mission each.
    pub fn load_missions(&self, dir: &Path, issues: &mut Vec<LoadIssue>) -> Vec<Mission> {
        let scenes = dir.join(&self.config.files.scenes);
        let files = match self
            .provider
            .find_files(&scenes, &self.config.files.scene_extension)
        {
            Ok(files) => files,
            Err(e) => {
                tracing::debug!("no scenes in '{}': {}", scenes.display(), e);
                return Vec::new();
            }
        };
        files
            .iter()
            .filter_map(|path| self.load_mission(path, issues))
            .collect()
    }

    /// One scene file. A leading bare-text header is skipped.
    pub fn load_mission(&self, path: &Path, issues: &mut Vec<LoadIssue>) -> Option<Mission> {
        tracing::info!("loading mission '{}'", path.display());
        let terms = self.read_terms(path, issues)?;
        let defs = without_header(&terms).iter().filter_map(Term::as_def);
        Some(parse_mission(defs, &display(path)))
    }

    /// Read and parse a whole file. Terms read before a parse error are
    /// kept; `None` only when the file could not be read.
    fn read_terms(&self, path: &Path, issues: &mut Vec<LoadIssue>) -> Option<Vec<Term>> {
        let buf = match self.provider.load_buffer(path) {
            Ok(buf) => buf,
            Err(e) => {
                report(
                    issues,
                    LoadIssue::Unreadable {
                        file: display(path),
                        message: e.to_string(),
                    },
                );
                return None;
            }
        };
        let source = BlockSource::with_len(&buf, buf.len()).named(display(path));
        let mut parser = Parser::new(source);
        let mut terms = Vec::new();
        loop {
            match parser.parse_term() {
                Ok(Some(term)) => terms.push(term),
                Ok(None) => break,
                Err(e) => {
                    report(issues, LoadIssue::Parse(e));
                    break;
                }
            }
        }
        Some(terms)
    }

    /// A tagged list file: bare-text tag first, then one struct per record.
    fn load_list<R: Default>(
        &self,
        path: &Path,
        kind: &ListFile,
        table: &FieldTable<R>,
        issues: &mut Vec<LoadIssue>,
    ) -> Vec<R> {
        let file = display(path);
        if kind.optional && !self.provider.file_exists(path) {
            report(issues, LoadIssue::MissingFile { file });
            return Vec::new();
        }
        tracing::info!("loading {} file '{}'", kind.tag, file);
        let Some(terms) = self.read_terms(path, issues) else {
            return Vec::new();
        };

        match terms.first() {
            Some(Term::Text(tag)) if tag == kind.tag => {}
            other => {
                let found = match other {
                    Some(t) => t.to_string(),
                    None => "an empty file".to_owned(),
                };
                report(
                    issues,
                    LoadIssue::WrongFileType {
                        file,
                        expected: kind.tag,
                        found,
                    },
                );
                return Vec::new();
            }
        }

        let mut records = Vec::new();
        for def in terms[1..].iter().filter_map(Term::as_def) {
            if def.name != kind.record {
                tracing::debug!("ignoring '{}' in '{}'", def.name, file);
                continue;
            }
            match def.value.as_struct() {
                Some(body) => records.push(table.build(body, &file)),
                None => report(
                    issues,
                    LoadIssue::NotAStruct {
                        record: kind.record.to_owned(),
                        file: file.clone(),
                    },
                ),
            }
        }
        records
    }
}
