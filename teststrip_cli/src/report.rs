// Result presentation: the count table printed at the enlarger, a JSON
// form of the same rows, and the stop sequences used for plotting.
//
// Table layout (right-aligned):
//
//   TEMPO 126
//   Count every 2nd beat
//
//        Count      Stops    Seconds   Target Sec   % of stepsize Error
//            5              -1      4.762        5.000      -21.1%
//
// Stops are labelled by their exact fraction of a stop (`format_stop`), the
// error column is the stop error as a percentage of one step.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use teststrip_core::search::SearchOutcome;
use teststrip_core::timing::{CountMode, StripTiming};

/// Label a target step: `0`, `+k`/`-k` for whole stops, else the
/// unreduced fraction `+a/b`.
pub fn format_stop(numerator: i64, stepsize: u32) -> String {
    if numerator == 0 {
        return "0".to_string();
    }
    let sign = if numerator > 0 { '+' } else { '-' };
    let magnitude = numerator.unsigned_abs();
    let stepsize = u64::from(stepsize);
    if magnitude % stepsize == 0 {
        format!("{sign}{}", magnitude / stepsize)
    } else {
        format!("{sign}{magnitude}/{stepsize}")
    }
}

/// One printed row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Display count: `7` or `7+2/4`.
    pub count: String,
    /// Count in groups (beats / divisor).
    pub count_value: f64,
    pub beats: u64,
    /// Target stop label.
    pub stops: String,
    pub target_stop: f64,
    pub achieved_stop: f64,
    pub seconds: f64,
    pub target_seconds: f64,
    /// Stop error as a percentage of one step.
    pub error_percent: f64,
}

/// Target and achieved stop sequences, equal length, strip order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotData {
    pub target_stops: Vec<f64>,
    pub achieved_stops: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StripReport {
    pub tempo: u32,
    pub notice: String,
    pub mode: CountMode,
    pub divisor: u32,
    pub loss: f64,
    pub evaluated: usize,
    pub pruned: usize,
    pub rows: Vec<ReportRow>,
}

impl StripReport {
    pub fn new(timing: &StripTiming, outcome: &SearchOutcome, stepsize: u32) -> Self {
        let rows = timing
            .steps
            .iter()
            .map(|step| ReportRow {
                count: step.count.to_string(),
                count_value: step.count.value(),
                beats: step.count.beats,
                stops: format_stop(step.target.numerator, stepsize),
                target_stop: step.target.stop,
                achieved_stop: step.assignment.stop,
                seconds: step.assignment.seconds,
                target_seconds: step.target_seconds,
                error_percent: step.assignment.error() * stepsize as f64 * 100.0,
            })
            .collect();

        StripReport {
            tempo: timing.tempo,
            notice: timing.notice(),
            mode: timing.mode,
            divisor: timing.subdivision.divisor(),
            loss: timing.loss,
            evaluated: outcome.evaluated,
            pruned: outcome.pruned,
            rows,
        }
    }

    pub fn plot_data(&self) -> PlotData {
        PlotData {
            target_stops: self.rows.iter().map(|r| r.target_stop).collect(),
            achieved_stops: self.rows.iter().map(|r| r.achieved_stop).collect(),
        }
    }

    pub fn write_plot_data(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&self.plot_data())?;
        std::fs::write(path, json)
            .with_context(|| format!("writing plot data to '{}'", path.display()))
    }

    pub fn render_table(&self) -> String {
        let mut out = String::new();
        out.push('\n');
        out.push_str(&format!("TEMPO {}\n", self.tempo));
        out.push_str(&self.notice);
        out.push_str("\n\n");
        out.push_str(&format!(
            "{:>10} {:>10} {:>10} {:>12} {:>21}\n",
            "Count", "Stops", "Seconds", "Target Sec", "% of stepsize Error"
        ));
        for row in &self.rows {
            // Pad whole counts so their digits line up with the whole part
            // of `whole+rem/div` counts.
            let count = if row.count.contains('+') {
                row.count.clone()
            } else {
                format!("{}    ", row.count)
            };
            out.push_str(&format!(
                "{:>10} {:>10} {:>10.3} {:>12.3} {:>10}\n",
                count,
                row.stops,
                row.seconds,
                row.target_seconds,
                format!("{:.1}%", row.error_percent)
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teststrip_core::loss::LpLoss;
    use teststrip_core::schedule::{Schedule, StripParams};
    use teststrip_core::search::search;
    use teststrip_core::timing::{Subdivision, process};

    #[test]
    fn stop_labels() {
        assert_eq!(format_stop(0, 3), "0");
        assert_eq!(format_stop(3, 3), "+1");
        assert_eq!(format_stop(-6, 3), "-2");
        assert_eq!(format_stop(2, 3), "+2/3");
        assert_eq!(format_stop(-1, 3), "-1/3");
        assert_eq!(format_stop(2, 4), "+2/4");
        assert_eq!(format_stop(-5, 1), "-5");
    }

    fn whole_stop_report(mode: CountMode, divisions: Option<i64>) -> StripReport {
        let schedule = Schedule::build(&StripParams {
            base: 10.0,
            stepsize: 1,
            numsteps: 3,
            baseplace: Some(2),
        })
        .unwrap();
        let outcome = search(&[60, 120], &schedule, &LpLoss::L2).unwrap();
        let subdivision = Subdivision::resolve(outcome.winner.tempo, divisions).unwrap();
        let timing = process(&outcome.winner, &schedule, mode, subdivision);
        StripReport::new(&timing, &outcome, schedule.stepsize())
    }

    #[test]
    fn rows_carry_structured_results() {
        let report = whole_stop_report(CountMode::Cumulative, None);
        assert_eq!(report.tempo, 120);
        assert_eq!(report.divisor, 2);
        let counts: Vec<&str> = report.rows.iter().map(|r| r.count.as_str()).collect();
        assert_eq!(counts, vec!["5", "10", "20"]);
        let stops: Vec<&str> = report.rows.iter().map(|r| r.stops.as_str()).collect();
        assert_eq!(stops, vec!["-1", "0", "+1"]);
        assert!(report.rows.iter().all(|r| r.error_percent.abs() < 1e-9));
        assert!((report.rows[2].seconds - 20.0).abs() < 1e-12);
    }

    #[test]
    fn table_layout() {
        let report = whole_stop_report(CountMode::Incremental, Some(4));
        let table = report.render_table();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "TEMPO 120");
        assert_eq!(lines[2], "Count every 4th beat");
        assert_eq!(lines[3], "");
        assert_eq!(
            lines[4],
            "     Count      Stops    Seconds   Target Sec   % of stepsize Error"
        );
        // Incremental beats 10, 10, 20 in groups of 4.
        assert_eq!(
            lines[5],
            "     2+2/4         -1      5.000        5.000       0.0%"
        );
        assert_eq!(
            lines[7],
            "     5             +1     20.000       20.000       0.0%"
        );
    }

    #[test]
    fn plot_data_has_equal_lengths() {
        let report = whole_stop_report(CountMode::Incremental, None);
        let plot = report.plot_data();
        assert_eq!(plot.target_stops, vec![-1.0, 0.0, 1.0]);
        assert_eq!(plot.achieved_stops.len(), plot.target_stops.len());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.json");
        report.write_plot_data(&path).unwrap();
        let restored: PlotData =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(restored, plot);
    }
}
