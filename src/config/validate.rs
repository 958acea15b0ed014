// src/config/validate.rs

use std::collections::BTreeSet;
use std::time::Duration;

use crate::config::model::{JobFile, RawJob, RawJobFile};
use crate::errors::{DeskError, Result};
use crate::scheduler::Job;

impl TryFrom<RawJobFile> for JobFile {
    type Error = DeskError;

    fn try_from(raw: RawJobFile) -> std::result::Result<Self, Self::Error> {
        ensure_has_jobs(&raw)?;
        ensure_unique_names(&raw)?;

        let jobs = raw
            .jobs
            .into_iter()
            .map(validate_job)
            .collect::<Result<Vec<_>>>()?;

        Ok(JobFile::new_unchecked(jobs))
    }
}

fn ensure_has_jobs(raw: &RawJobFile) -> Result<()> {
    if raw.jobs.is_empty() {
        return Err(DeskError::ConfigError(
            "job source must contain at least one [[jobs]] entry".to_string(),
        ));
    }
    Ok(())
}

fn ensure_unique_names(raw: &RawJobFile) -> Result<()> {
    let mut seen = BTreeSet::new();
    for job in &raw.jobs {
        if !seen.insert(job.name.trim()) {
            return Err(DeskError::ConfigError(format!(
                "duplicate job name '{}'",
                job.name
            )));
        }
    }
    Ok(())
}

fn validate_job(raw: RawJob) -> Result<Job> {
    let name = raw.name.trim().to_string();
    if name.is_empty() {
        return Err(DeskError::ConfigError("job name must not be empty".to_string()));
    }

    let command = raw.command.trim().to_string();
    if command.is_empty() {
        return Err(DeskError::ConfigError(format!(
            "job '{name}' has an empty command"
        )));
    }

    let interval = parse_interval(&raw.interval)
        .map_err(|e| DeskError::ConfigError(format!("job '{name}': {e}")))?;

    Ok(Job {
        name,
        description: raw.description,
        kind: raw.kind,
        command,
        args: raw.args,
        interval,
    })
}

/// Parse a duration made of one or more `<number><unit>` groups, with units
/// `ms`, `s`, `m` and `h` (`"500ms"`, `"90s"`, `"1h30m"`). Zero is rejected.
pub fn parse_interval(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty interval".to_string());
    }

    let mut total = Duration::ZERO;
    let mut rest = s;

    while !rest.is_empty() {
        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| format!("interval '{s}' is missing a unit suffix"))?;
        if digits == 0 {
            return Err(format!("invalid interval '{s}'"));
        }

        let (num_part, tail) = rest.split_at(digits);
        let value: u64 = num_part
            .parse()
            .map_err(|e| format!("invalid interval number '{num_part}': {e}"))?;

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_len);

        let part = match unit {
            "ms" => Duration::from_millis(value),
            "s" => Duration::from_secs(value),
            "m" => Duration::from_secs(value.saturating_mul(60)),
            "h" => Duration::from_secs(value.saturating_mul(60 * 60)),
            other => {
                return Err(format!(
                    "unsupported interval unit '{other}'; expected ms, s, m, or h"
                ));
            }
        };

        total = total.saturating_add(part);
        rest = next;
    }

    if total.is_zero() {
        return Err(format!("interval '{s}' must be greater than zero"));
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_and_compound_intervals() {
        assert_eq!(parse_interval("500ms"), Ok(Duration::from_millis(500)));
        assert_eq!(parse_interval("90s"), Ok(Duration::from_secs(90)));
        assert_eq!(parse_interval(" 5m "), Ok(Duration::from_secs(300)));
        assert_eq!(parse_interval("1h30m"), Ok(Duration::from_secs(5400)));
        assert_eq!(parse_interval("1m500ms"), Ok(Duration::from_millis(60_500)));
    }

    #[test]
    fn rejects_malformed_or_zero_intervals() {
        for bad in ["", "10", "s", "10d", "1h-5m", "0s", "0m0s", "1.5s"] {
            assert!(parse_interval(bad).is_err(), "{bad:?} should be rejected");
        }
    }
}
