use crate::report::model::ReportOutput;

/// Plain text: one line per entry, text reports verbatim.
pub fn render_plain(output: &ReportOutput) -> String {
    match output {
        ReportOutput::Lines(lines) => {
            let mut out = String::new();
            for line in lines {
                out.push_str(line);
                out.push('\n');
            }
            out
        }
        ReportOutput::Text(text) => text.clone(),
        ReportOutput::Structured { plain, .. } => plain.clone(),
    }
}

pub fn render_json(output: &ReportOutput) -> serde_json::Result<String> {
    let mut out = serde_json::to_string_pretty(&output.to_json())?;
    out.push('\n');
    Ok(out)
}
