//! Static analysis of Chef cookbooks and roles.
//!
//! Responsibilities:
//! - crawl configured cookbook and role directories
//! - parse Ruby and JSON sources into a knowledge base
//! - run inference rules over it and build reports from their facts

pub mod config;
pub mod crawl;
pub mod error;
pub mod kb;
pub mod keys;
pub mod parse;
pub mod report;
pub mod rules;
pub mod util;

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::config::Configuration;
use crate::error::Result;
use crate::kb::KnowledgeBase;
use crate::keys::Key;
use crate::report::catalog::ReportId;
use crate::report::model::ReportOutput;
use crate::rules::catalog::RuleId;
use crate::rules::engine::{InferEngine, schedule};

pub const TOOL_NAME: &str = "bookworm";

/// Keys a set of rules reads, deduplicated and in key order.
pub fn keys_for_rules(rules: &[RuleId]) -> Vec<Key> {
    rules
        .iter()
        .flat_map(|rule| rule.keys().iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Run the rules `report` needs over a fresh crawl and build the report.
///
/// Only keys those rules read are crawled.
pub fn run_report(config: &Configuration, report: ReportId) -> Result<ReportOutput> {
    let rules = schedule(report.needs_rules())?;
    let keys = keys_for_rules(&rules);
    info!(report = %report, rules = rules.len(), keys = keys.len(), "running report");

    let processed = crawl::crawl(config, &keys)?;
    let mut engine = InferEngine::new(KnowledgeBase::new(processed)?);
    engine.run(&rules)?;

    let kb = engine.knowledge_base();
    debug!(executed = ?kb.executed_rules(), "rules finished");
    report::build(report, kb)
}
