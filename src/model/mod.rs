//! Aggregation model: join SA_SPAMEAS throughput with MS_PROCESS_MEAS CPU usage
//! into per-interval EPAY KPIs.

use crate::measlog::{MeasStore, ProcessMeasRecord, ReportTime};
use crate::roles::{Role, RoleMap};

use serde::Serialize;

/// SPA names carrying this prefix are EPAY services.
pub const EPAY_PREFIX: &str = "EPAY";

/// call cost = cpu% * 10 * clients / tps
const CALL_COST_SCALE: f64 = 10.0;

/// How client processes are matched to an EPAY SPA row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinScope {
    /// Every row is joined on the last EPAY name met while selecting rows.
    /// Identical to per-record matching when a log carries one EPAY service.
    #[default]
    LastSeen,
    /// Every row is joined on its own SPA name.
    PerRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpayKpi {
    pub report_time: ReportTime,
    pub spa_name: String,
    pub tps: u64,
    pub std_client_num: usize,
    pub std_client_cpu_usage: f64,
    pub std_client_call_cost: f64,
    pub spc_client_num: usize,
    pub spc_client_cpu_usage: f64,
    pub spc_client_call_cost: f64,
}

/// Column means over all KPI rows. `tps` is the truncated integer mean.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KpiAverages {
    pub tps: u64,
    pub std_client_cpu_usage: f64,
    pub std_client_call_cost: f64,
    pub spc_client_cpu_usage: f64,
    pub spc_client_call_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiReport {
    pub rows: Vec<EpayKpi>,
    pub average: KpiAverages,
}

/// Running count and CPU sum for one client class.
#[derive(Debug, Default)]
struct ClientTally {
    num: usize,
    cpu_sum: f64,
}

impl ClientTally {
    fn add(&mut self, rec: &ProcessMeasRecord) {
        self.num += 1;
        self.cpu_sum += rec.cpu_usage;
    }

    /// (mean cpu usage, call cost); both 0 without matches or without traffic.
    fn finish(&self, tps: u64) -> (f64, f64) {
        if self.num == 0 {
            return (0.0, 0.0);
        }
        let cpu = self.cpu_sum / self.num as f64;
        let cost = if tps == 0 {
            0.0
        } else {
            cpu * CALL_COST_SCALE * self.num as f64 / tps as f64
        };
        (cpu, cost)
    }
}

/// Build the EPAY KPI rows and their averages.
///
/// - select every SA_SPAMEAS row whose SPA name starts with `EPAY` (rows
///   sharing a report time stay separate)
/// - split same-time client processes (`<spa_name>_*`) by whether their
///   host is in `db1` (specialized) or not (standard)
/// - average the numeric columns
pub fn build_kpi_report(store: &MeasStore, roles: &RoleMap, scope: JoinScope) -> KpiReport {
    // Phase 1: selection.
    let mut last_spa_name = String::new();
    let mut rows: Vec<EpayKpi> = Vec::new();
    for rec in store.spa.iter().filter(|r| r.spa_name.starts_with(EPAY_PREFIX)) {
        last_spa_name = rec.spa_name.clone();
        rows.push(EpayKpi {
            report_time: rec.report_time.clone(),
            spa_name: rec.spa_name.clone(),
            tps: rec.tps,
            std_client_num: 0,
            std_client_cpu_usage: 0.0,
            std_client_call_cost: 0.0,
            spc_client_num: 0,
            spc_client_cpu_usage: 0.0,
            spc_client_call_cost: 0.0,
        });
    }

    // Phase 2: join against process rows.
    for kpi in &mut rows {
        let spa_name = match scope {
            JoinScope::LastSeen => last_spa_name.as_str(),
            JoinScope::PerRecord => kpi.spa_name.as_str(),
        };
        let client_prefix = format!("{}_", spa_name);

        let mut std = ClientTally::default();
        let mut spc = ClientTally::default();
        for rec in &store.process {
            if rec.report_time != kpi.report_time || !rec.process_name.starts_with(&client_prefix) {
                continue;
            }
            log::trace!("{} matches {} on {}", rec.process_name, kpi.spa_name, rec.host_id);
            if roles.contains(Role::Db1, &rec.host_id) {
                spc.add(rec);
            } else {
                std.add(rec);
            }
        }

        kpi.std_client_num = std.num;
        (kpi.std_client_cpu_usage, kpi.std_client_call_cost) = std.finish(kpi.tps);
        kpi.spc_client_num = spc.num;
        (kpi.spc_client_cpu_usage, kpi.spc_client_call_cost) = spc.finish(kpi.tps);

        log::debug!(
            "[{}] {}*: {} std / {} spc ({}) clients",
            kpi.report_time,
            client_prefix,
            kpi.std_client_num,
            kpi.spc_client_num,
            Role::Db1.name()
        );
    }

    // Phase 3: averages.
    let average = average_of(&rows);

    KpiReport { rows, average }
}

fn average_of(rows: &[EpayKpi]) -> KpiAverages {
    if rows.is_empty() {
        return KpiAverages::default();
    }

    let n = rows.len();
    let mean = |f: fn(&EpayKpi) -> f64| rows.iter().map(f).sum::<f64>() / n as f64;

    KpiAverages {
        // Summed wide; the mean of u64 values always fits back in u64.
        tps: (rows.iter().map(|r| u128::from(r.tps)).sum::<u128>() / n as u128) as u64,
        std_client_cpu_usage: mean(|r| r.std_client_cpu_usage),
        std_client_call_cost: mean(|r| r.std_client_call_cost),
        spc_client_cpu_usage: mean(|r| r.spc_client_cpu_usage),
        spc_client_call_cost: mean(|r| r.spc_client_call_cost),
    }
}
