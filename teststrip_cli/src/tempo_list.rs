// Tempo candidate sources.
//
// Candidates come either from an inclusive integer range (`--tmin` /
// `--tmax`) or from a plaintext list, typically the markings printed on a
// mechanical metronome. List grammar, one entry per line:
//
//   # comment
//   60              a single tempo
//   40:60 2         every 2nd tempo from 40 to 60 inclusive
//   100:120         step defaults to 1
//
// Blank lines and `#` lines are ignored. Anything else that does not parse
// is reported as a `MalformedTempoLine` and skipped; a bad line never
// aborts the run. Tempi above `MAX_TEMPO` are rejected, which also bounds
// the size of any range. The resulting list is deduplicated and sorted
// ascending (the search imposes its own order).

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Context;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {reason}: {text:?}")]
pub struct MalformedTempoLine {
    /// 1-indexed line number.
    pub line: usize,
    pub text: String,
    pub reason: String,
}

/// Parsed tempo list plus the lines that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TempoList {
    pub tempi: Vec<u32>,
    pub skipped: Vec<MalformedTempoLine>,
}

/// Fastest tempo accepted from a list or range. Far beyond any metronome,
/// small enough that a full range stays a few kilobytes.
pub const MAX_TEMPO: u32 = 10_000;

/// Every tempo from `tmin` to `tmax` inclusive. Empty if `tmin > tmax`.
/// Callers keep `tmax <= MAX_TEMPO` (see `StripConfig::tempo_bounds`).
pub fn tempo_range(tmin: u32, tmax: u32) -> Vec<u32> {
    (tmin..=tmax).collect()
}

fn parse_tempo(token: &str) -> Result<u32, String> {
    match token.parse::<u32>() {
        Ok(0) => Err("tempo must be positive".into()),
        Ok(t) if t > MAX_TEMPO => Err(format!("tempo {t} is above {MAX_TEMPO}")),
        Ok(t) => Ok(t),
        Err(_) => Err(format!("not a tempo: {token:?}")),
    }
}

/// Parse one non-comment line into the tempi it names.
fn parse_entry(entry: &str) -> Result<Vec<u32>, String> {
    let mut tokens = entry.split_whitespace();
    let head = tokens.next().ok_or("empty entry")?;
    let step = tokens.next();
    if tokens.next().is_some() {
        return Err("too many fields".into());
    }

    let Some((start, end)) = head.split_once(':') else {
        if step.is_some() {
            return Err("step given without a range".into());
        }
        return Ok(vec![parse_tempo(head)?]);
    };

    let start = parse_tempo(start)?;
    let end = parse_tempo(end)?;
    if start > end {
        return Err(format!("range start {start} is above end {end}"));
    }
    let step = match step {
        Some(s) => match s.parse::<u32>() {
            Ok(0) | Err(_) => return Err(format!("invalid range step {s:?}")),
            Ok(s) => s,
        },
        None => 1,
    };
    Ok((start..=end).step_by(step as usize).collect())
}

/// Parse a tempo list, skipping (and logging) malformed lines.
pub fn parse_tempo_list(text: &str) -> TempoList {
    let mut tempi = BTreeSet::new();
    let mut skipped = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let entry = raw.trim();
        if entry.is_empty() || entry.starts_with('#') {
            continue;
        }
        match parse_entry(entry) {
            Ok(values) => tempi.extend(values),
            Err(reason) => {
                let bad = MalformedTempoLine {
                    line: index + 1,
                    text: entry.to_string(),
                    reason,
                };
                warn!("skipping tempo list {bad}");
                skipped.push(bad);
            }
        }
    }

    TempoList {
        tempi: tempi.into_iter().collect(),
        skipped,
    }
}

/// Read and parse a tempo list file.
pub fn read_tempo_file(path: &Path) -> anyhow::Result<TempoList> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading tempo file '{}'", path.display()))?;
    Ok(parse_tempo_list(&text))
}
