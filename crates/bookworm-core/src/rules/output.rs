use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::rules::catalog::OutputKind;

/// Value a rule stores on a knowledge base entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum RuleOutput {
    List(Vec<String>),
    Map(BTreeMap<String, serde_json::Value>),
    Flag(bool),
    Text(String),
    Notifications(Vec<Notification>),
}

impl RuleOutput {
    pub fn kind(&self) -> OutputKind {
        match self {
            RuleOutput::List(_) => OutputKind::List,
            RuleOutput::Map(_) => OutputKind::Map,
            RuleOutput::Flag(_) => OutputKind::Flag,
            RuleOutput::Text(_) => OutputKind::Text,
            RuleOutput::Notifications(_) => OutputKind::Notifications,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationMethod {
    Notifies,
    Subscribes,
}

impl NotificationMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationMethod::Notifies => "notifies",
            NotificationMethod::Subscribes => "subscribes",
        }
    }
}

/// One `notifies`/`subscribes` property found in a resource block.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Notification {
    pub method: NotificationMethod,
    pub action: String,
    pub resources: Vec<String>,
    pub timer: String,
}

impl Notification {
    pub const DEFAULT_TIMER: &'static str = "delayed";
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} :{}, {}, :{}",
            self.method.as_str(),
            self.action,
            self.resources.join(", "),
            self.timer
        )
    }
}
