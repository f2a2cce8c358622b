use crate::Result;
use crate::model::KpiReport;

/// Render the KPI rows and averages as pretty-printed JSON.
pub fn render_json_report(report: &KpiReport) -> Result<String> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}
