use serde_json::Value;

/// Result of building a report.
///
/// `Lines` and `Text` render the same content for plain and JSON output;
/// `Structured` reports carry a separate plain rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutput {
    Lines(Vec<String>),
    Text(String),
    Structured { plain: String, json: Value },
}

impl ReportOutput {
    pub fn lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ReportOutput::Lines(lines.into_iter().map(Into::into).collect())
    }

    pub fn to_json(&self) -> Value {
        match self {
            ReportOutput::Lines(lines) => Value::from(lines.clone()),
            ReportOutput::Text(text) => Value::String(text.clone()),
            ReportOutput::Structured { json, .. } => json.clone(),
        }
    }
}
