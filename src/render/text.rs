use crate::model::{EpayKpi, KpiAverages, KpiReport};

const RULE_WIDTH: usize = 60;

/// Render the fixed-layout EPAY KPI table.
///
/// Columns are single-space separated: sequence number, report time, TPS with
/// thousands separators, then count / CPU% / call cost for standard and for
/// specialized clients. The trailing AVERAGE row prints `--` and `-` in place
/// of the client counts.
pub fn render_text_report(report: &KpiReport) -> String {
    let mut out = String::new();

    out.push_str("EPAY SPA KPI report: (demo version)\n");
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');
    out.push_str("# report_time, tps, StdClient# CPU% CallCost, SpcClient# CPU% CallCost\n");

    for (i, kpi) in report.rows.iter().enumerate() {
        push_row(&mut out, i + 1, kpi);
    }

    out.push_str(&"-".repeat(RULE_WIDTH));
    out.push('\n');
    push_average(&mut out, &report.average);
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');

    out
}

fn push_row(out: &mut String, seq: usize, kpi: &EpayKpi) {
    out.push_str(&format!(
        "{} {} {} {} {:.2} {:.2} {} {:.2} {:.2}\n",
        seq,
        kpi.report_time,
        with_thousands(kpi.tps),
        kpi.std_client_num,
        kpi.std_client_cpu_usage,
        kpi.std_client_call_cost,
        kpi.spc_client_num,
        kpi.spc_client_cpu_usage,
        kpi.spc_client_call_cost,
    ));
}

fn push_average(out: &mut String, avg: &KpiAverages) {
    out.push_str(&format!(
        "  AVERAGE          {} -- {:.2} {:.2} - {:.2} {:.2}\n",
        with_thousands(avg.tps),
        avg.std_client_cpu_usage,
        avg.std_client_call_cost,
        avg.spc_client_cpu_usage,
        avg.spc_client_call_cost,
    ));
}

/// 1234567 -> "1,234,567".
pub fn with_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
