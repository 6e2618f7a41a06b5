use std::collections::BTreeSet;

use crate::error::Result;
use crate::kb::KnowledgeBase;
use crate::report::catalog::ReportId;
use crate::report::model::ReportOutput;
use crate::rules::catalog::RuleId;

pub fn all_role_descriptions(kb: &KnowledgeBase) -> Result<ReportOutput> {
    let requester = ReportId::AllRoleDescriptions.as_str();
    let mut text = String::new();
    for (name, entry) in kb.roles() {
        let description = entry.text(RuleId::RoleDescription, requester)?;
        text.push_str(&format!("role: {name} desc: {description}\n"));
    }
    Ok(ReportOutput::Text(text))
}

pub fn role_referenced_roles(kb: &KnowledgeBase) -> Result<ReportOutput> {
    let requester = ReportId::RoleReferencedRoles.as_str();
    let mut roles = BTreeSet::new();
    for entry in kb.roles().values() {
        roles.extend(entry.list(RuleId::RoleExplicitRoles, requester)?.iter().cloned());
    }
    Ok(ReportOutput::Lines(roles.into_iter().collect()))
}
