use crate::kb::FileEntry;
use crate::rules::ast::{call_arguments, calls_named, receiverless_method, string_list, symbol_name};
use crate::rules::output::{Notification, NotificationMethod, RuleOutput};

/// `notifies`/`subscribes` properties in source order.
///
/// Matches `method :action, target[, :timer]` where the target is a string
/// or an array of strings; anything else is skipped.
pub fn resource_notifications(entry: &FileEntry) -> RuleOutput {
    let Some(ast) = entry.source.ruby() else {
        return RuleOutput::Notifications(Vec::new());
    };

    let mut found = Vec::new();
    for call in calls_named(ast, ast.root(), &["notifies", "subscribes"]) {
        let method = match receiverless_method(ast, call) {
            Some("notifies") => NotificationMethod::Notifies,
            Some("subscribes") => NotificationMethod::Subscribes,
            _ => continue,
        };

        let args = call_arguments(call);
        let (action, target, timer) = match args.as_slice() {
            [action, target] => (*action, *target, None),
            [action, target, timer] => (*action, *target, Some(*timer)),
            _ => continue,
        };

        let Some(action) = symbol_name(ast, action) else {
            continue;
        };
        let Some(resources) = string_list(ast, target) else {
            continue;
        };
        let timer = match timer {
            Some(node) => match symbol_name(ast, node) {
                Some(timer) => timer,
                None => continue,
            },
            None => Notification::DEFAULT_TIMER.to_string(),
        };

        found.push(Notification {
            method,
            action,
            resources,
            timer,
        });
    }
    RuleOutput::Notifications(found)
}
