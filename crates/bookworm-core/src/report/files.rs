//! Reports over individual source files: libraries, resources, unparsed Ruby.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::error::Result;
use crate::kb::KnowledgeBase;
use crate::report::catalog::ReportId;
use crate::report::model::ReportOutput;
use crate::rules::catalog::RuleId;

pub fn library_constants(kb: &KnowledgeBase) -> Result<ReportOutput> {
    let requester = ReportId::LibraryDefinedModulesAndClassConstants.as_str();
    let mut text = String::from("file\tmodules\tconstants\n");
    for (name, entry) in kb.libraries() {
        let modules = entry.list(RuleId::LibraryDefinedModuleConstants, requester)?;
        let classes = entry.list(RuleId::LibraryDefinedClassConstants, requester)?;
        text.push_str(&format!(
            "{name}:\t{}\t{}\n",
            modules.join(","),
            classes.join(",")
        ));
    }
    Ok(ReportOutput::Text(text))
}

/// Files of every Ruby key whose source produced no usable syntax tree.
pub fn no_parsed_ruby(kb: &KnowledgeBase) -> Result<ReportOutput> {
    let requester = ReportId::NoParsedRuby.as_str();
    let mut plain = String::new();
    let mut json = serde_json::Map::new();

    for key in RuleId::NoParsedRuby.keys() {
        let plural = key.spec().plural;
        let mut names = Vec::new();
        for (name, entry) in kb.get(*key) {
            if entry.flag(RuleId::NoParsedRuby, requester)? {
                names.push(name.clone());
            }
        }

        if names.is_empty() {
            plain.push_str(&format!("No non-AST {plural} files\n"));
        } else {
            plain.push_str(&format!("{}:\n", capitalize(plural)));
            for name in &names {
                plain.push_str(&format!("\t{name}\n"));
            }
        }
        json.insert(plural.to_string(), Value::from(names));
    }

    Ok(ReportOutput::Structured {
        plain,
        json: Value::Object(json),
    })
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Distinct notifications across resources and recipes, sorted by their
/// rendered form.
pub fn resource_notifications(kb: &KnowledgeBase) -> Result<ReportOutput> {
    let requester = ReportId::ResourceNotifications.as_str();
    let mut seen = BTreeSet::new();
    for entry in kb.resources().values().chain(kb.recipes().values()) {
        for notification in entry.notifications(RuleId::ResourceNotifications, requester)? {
            seen.insert(notification.to_string());
        }
    }
    Ok(ReportOutput::Lines(seen.into_iter().collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::Key;
    use crate::report::build;
    use crate::report::fixtures::{KbBuilder, list};
    use crate::rules::output::{Notification, NotificationMethod, RuleOutput};
    use serde_json::json;

    #[test]
    fn library_table() {
        let kb = KbBuilder::new()
            .entry(
                Key::Library,
                "fb_helpers::node",
                vec![
                    (RuleId::LibraryDefinedModuleConstants, list(&["FB", "FB::Helpers"])),
                    (RuleId::LibraryDefinedClassConstants, list(&["Chef::Node"])),
                ],
            )
            .entry(
                Key::Library,
                "fb_apt::sanity",
                vec![
                    (RuleId::LibraryDefinedModuleConstants, list(&[])),
                    (RuleId::LibraryDefinedClassConstants, list(&[])),
                ],
            )
            .build_for(ReportId::LibraryDefinedModulesAndClassConstants);
        assert_eq!(
            build(ReportId::LibraryDefinedModulesAndClassConstants, &kb).unwrap(),
            ReportOutput::Text(
                "file\tmodules\tconstants\nfb_apt::sanity:\t\t\nfb_helpers::node:\tFB,FB::Helpers\tChef::Node\n"
                    .into()
            )
        );
    }

    #[test]
    fn unparsed_files_grouped_by_key() {
        let flag = |v| vec![(RuleId::NoParsedRuby, RuleOutput::Flag(v))];
        let kb = KbBuilder::new()
            .entry(Key::Recipe, "fb_init::default", flag(false))
            .entry(Key::Recipe, "fb_init::empty", flag(true))
            .entry(Key::Attribute, "fb_init::default", flag(true))
            .entry(Key::Role, "blank", flag(true))
            .build_for(ReportId::NoParsedRuby);

        let out = build(ReportId::NoParsedRuby, &kb).unwrap();
        assert_eq!(
            out.to_json(),
            json!({
                "recipes": ["fb_init::empty"],
                "attributes": ["fb_init::default"],
                "libraries": [],
                "resources": [],
                "providers": [],
                "metadatarbs": [],
                "roles": ["blank"],
            })
        );
        let ReportOutput::Structured { plain, .. } = out else {
            panic!("expected structured output");
        };
        assert_eq!(
            plain,
            "Recipes:\n\tfb_init::empty\n\
             Attributes:\n\tfb_init::default\n\
             No non-AST libraries files\n\
             No non-AST resources files\n\
             No non-AST providers files\n\
             No non-AST metadatarbs files\n\
             Roles:\n\tblank\n"
        );
    }

    #[test]
    fn notifications_are_deduplicated() {
        let restart = Notification {
            method: NotificationMethod::Notifies,
            action: "restart".into(),
            resources: vec!["service[sshd]".into()],
            timer: Notification::DEFAULT_TIMER.into(),
        };
        let reload = Notification {
            method: NotificationMethod::Subscribes,
            action: "reload".into(),
            resources: vec!["template[/etc/ssh/sshd_config]".into()],
            timer: "immediately".into(),
        };
        let kb = KbBuilder::new()
            .entry(
                Key::Resource,
                "fb_ssh::config",
                vec![(RuleId::ResourceNotifications, RuleOutput::Notifications(vec![restart.clone()]))],
            )
            .entry(
                Key::Recipe,
                "fb_ssh::default",
                vec![(
                    RuleId::ResourceNotifications,
                    RuleOutput::Notifications(vec![restart, reload]),
                )],
            )
            .build_for(ReportId::ResourceNotifications);
        assert_eq!(
            build(ReportId::ResourceNotifications, &kb).unwrap(),
            ReportOutput::lines([
                "notifies :restart, service[sshd], :delayed",
                "subscribes :reload, template[/etc/ssh/sshd_config], :immediately",
            ])
        );
    }
}
