//! Parameter-store decoders: key/value records and the thread-tagged
//! performance grammars
//!
//! Parameter values stay raw strings, never boolean-coerced, so the exact
//! original text survives for audit.

use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::parser::dispatch::Outcome;
use crate::types::records::{ParamDbPerf, ParamPerf, Parameter};
use crate::types::store::LogData;

static THREAD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^T(\d+)\s+(.+)").unwrap());
static ELAPSED_MS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([\d.]+)ms").unwrap());
static OUT_OF_RANGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"OUT_OF_RANGE\([^)]+\)").unwrap());

/// Parameter-store bootstrap races and lookup misses reported at INFO
/// severity; they still belong in the error stream
const PARAM_ERROR_PATTERNS: &[&str] = &[
    "Created missing shelve key during startup race:",
    "Created missing TinyDB record during startup race:",
    "not found in memory or shelve DB",
    "not found in TinyDB memory or file",
];

/// Split `TAG, key, value-with-commas` into (key, value)
fn split_kv(payload: &str) -> Option<(String, String)> {
    let mut parts = payload.splitn(3, ',');
    let _tag = parts.next()?;
    let key = parts.next()?.trim();
    let value = parts.next()?.trim();
    Some((key.to_string(), value.to_string()))
}

pub(crate) fn cc_parameter(
    data: &mut LogData,
    timestamp: NaiveDateTime,
    payload: &str,
) -> Result<Outcome> {
    if PARAM_ERROR_PATTERNS.iter().any(|p| payload.contains(p)) {
        return Ok(Outcome::Flagged(payload.to_string()));
    }
    match split_kv(payload) {
        Some((key, value)) => {
            data.cc_parameter.push(Parameter {
                timestamp,
                key,
                value: Some(value),
            });
            Ok(Outcome::Recorded)
        }
        None => Ok(Outcome::Skipped),
    }
}

macro_rules! kv_decoder {
    ($name:ident, $field:ident) => {
        pub(crate) fn $name(
            data: &mut LogData,
            timestamp: NaiveDateTime,
            payload: &str,
        ) -> Result<Outcome> {
            match split_kv(payload) {
                Some((key, value)) => {
                    data.$field.push(Parameter {
                        timestamp,
                        key,
                        value: Some(value),
                    });
                    Ok(Outcome::Recorded)
                }
                None => Ok(Outcome::Skipped),
            }
        }
    };
}

kv_decoder!(cc_parameter_shelve, cc_parameter_shelve);
kv_decoder!(cc_parameter_tiny, cc_parameter_tiny);
kv_decoder!(ap_parameter, ap_parameter);
kv_decoder!(ga_set_param, ga_set_param);
kv_decoder!(ga_param, ga_param);

pub(crate) fn ap_parameter_tiny(
    data: &mut LogData,
    timestamp: NaiveDateTime,
    payload: &str,
) -> Result<Outcome> {
    // Three-part form joins the first two fields into the key, e.g.
    // AP_PARAMETER_TINY, VERSION, ARDUPILOT, 4_1_1_v11
    let parts: Vec<&str> = payload.split(',').skip(1).map(str::trim).collect();
    if parts.len() < 2 {
        return Ok(Outcome::Skipped);
    }
    let (key, value) = if parts.len() >= 3 {
        (format!("{}_{}", parts[0], parts[1]), parts[2].to_string())
    } else {
        (parts[0].to_string(), parts[1].to_string())
    };

    data.ap_parameter_tiny.push(Parameter {
        timestamp,
        key,
        value: Some(value),
    });
    Ok(Outcome::Recorded)
}

pub(crate) fn ga_get_param(
    data: &mut LogData,
    timestamp: NaiveDateTime,
    payload: &str,
) -> Result<Outcome> {
    let key = match payload.split_once(',') {
        Some((_, rest)) => rest.trim(),
        None => return Ok(Outcome::Skipped),
    };
    if key.is_empty() {
        return Ok(Outcome::Skipped);
    }

    // GET requests carry no value
    data.ga_get_param.push(Parameter {
        timestamp,
        key: key.to_string(),
        value: None,
    });
    Ok(Outcome::Recorded)
}

fn elapsed_ms(text: &str) -> Option<f64> {
    ELAPSED_MS_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Decode the five-outcome parameter performance grammar:
/// NOT_FOUND / NO_CHANGE / OUT_OF_RANGE(lo-hi) / SUCCESS / FAILED, each
/// with a trailing elapsed-milliseconds suffix
pub(crate) fn cc_parameter_perf(
    data: &mut LogData,
    timestamp: NaiveDateTime,
    payload: &str,
) -> Result<Outcome> {
    let perf = payload["CC_PARAMETER_PERF:".len()..].trim();
    let caps = match THREAD_RE.captures(perf) {
        Some(c) => c,
        None => return Ok(Outcome::Skipped),
    };
    let thread_id: i64 = caps[1].parse()?;
    let remaining = caps[2].trim();
    let parts: Vec<&str> = remaining.split_whitespace().collect();
    let first = parts
        .first()
        .ok_or_else(|| anyhow!("empty perf record after thread tag"))?;
    let second = parts.get(1);

    let (param_name, value, state) = if remaining.contains("NOT_FOUND") {
        (Some(first.to_string()), None, Some("NOT_FOUND".to_string()))
    } else if remaining.contains("NO_CHANGE") {
        // param_name {val} {time}ms NO_CHANGE
        let before = remaining
            [..remaining.find("NO_CHANGE").unwrap_or(remaining.len())]
            .split_whitespace()
            .collect::<Vec<_>>();
        let value = if before.len() >= 2 {
            Some(before[1].to_string())
        } else {
            None
        };
        (Some(first.to_string()), value, Some("NO_CHANGE".to_string()))
    } else if remaining.contains("OUT_OF_RANGE") {
        let second =
            second.ok_or_else(|| anyhow!("OUT_OF_RANGE record missing value: {}", remaining))?;
        let state = OUT_OF_RANGE_RE
            .find(remaining)
            .map(|m| m.as_str().to_string());
        (Some(first.to_string()), Some(second.to_string()), state)
    } else if remaining.contains("SUCCESS") {
        let second =
            second.ok_or_else(|| anyhow!("SUCCESS record missing value: {}", remaining))?;
        (
            Some(first.to_string()),
            Some(second.to_string()),
            Some("SUCCESS".to_string()),
        )
    } else if remaining.contains("FAILED") {
        let second =
            second.ok_or_else(|| anyhow!("FAILED record missing value: {}", remaining))?;
        (
            Some(first.to_string()),
            Some(second.to_string()),
            Some("FAILED".to_string()),
        )
    } else {
        (None, None, None)
    };

    data.cc_parameter_perf.push(ParamPerf {
        timestamp,
        thread_id,
        param_name,
        value,
        state,
        time_taken_ms: elapsed_ms(remaining),
    });
    Ok(Outcome::Recorded)
}

pub(crate) fn cc_parameter_db_perf(
    data: &mut LogData,
    timestamp: NaiveDateTime,
    payload: &str,
) -> Result<Outcome> {
    let perf = payload["CC_PARAMETER_DB_PERF:".len()..].trim();
    let caps = match THREAD_RE.captures(perf) {
        Some(c) => c,
        None => return Ok(Outcome::Skipped),
    };
    let thread_id: i64 = caps[1].parse()?;
    let remaining = caps[2].trim();

    let (state, description) = if let Some(rest) = remaining.strip_prefix("NO_CHANGE") {
        (Some("NO_CHANGE".to_string()), rest.trim().to_string())
    } else if let Some(idx) = remaining.rfind("SUCCESS") {
        (
            Some("SUCCESS".to_string()),
            remaining[..idx].trim().to_string(),
        )
    } else if remaining.starts_with("ERROR") {
        (
            Some("ERROR".to_string()),
            remaining["ERROR".len()..].trim().to_string(),
        )
    } else if remaining.contains("ERROR in") {
        (Some("ERROR".to_string()), remaining.to_string())
    } else {
        (None, remaining.to_string())
    };

    data.cc_parameter_db_perf.push(ParamDbPerf {
        timestamp,
        thread_id,
        state,
        description,
    });
    Ok(Outcome::Recorded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_milli_opt(10, 0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_kv_value_kept_as_raw_string() {
        let mut data = LogData::new();
        cc_parameter(&mut data, ts(), "CC_PARAMETER, speed_limit, 5.0").unwrap();
        cc_parameter(&mut data, ts(), "CC_PARAMETER, auto_resume, True").unwrap();
        assert_eq!(data.cc_parameter[0].value.as_deref(), Some("5.0"));
        assert_eq!(data.cc_parameter[1].value.as_deref(), Some("True"));
    }

    #[test]
    fn test_kv_value_preserves_embedded_commas() {
        let mut data = LogData::new();
        cc_parameter(&mut data, ts(), "CC_PARAMETER, home, [18.52, 73.85]").unwrap();
        assert_eq!(data.cc_parameter[0].key, "home");
        assert_eq!(data.cc_parameter[0].value.as_deref(), Some("[18.52, 73.85]"));
    }

    #[test]
    fn test_cc_parameter_bootstrap_race_flagged_not_recorded() {
        let mut data = LogData::new();
        let payload = "CC_PARAMETER, Created missing shelve key during startup race: spray_rate";
        let outcome = cc_parameter(&mut data, ts(), payload).unwrap();
        assert_eq!(outcome, Outcome::Flagged(payload.to_string()));
        assert!(data.cc_parameter.is_empty());
    }

    #[test]
    fn test_ap_parameter_tiny_joined_key() {
        let mut data = LogData::new();
        ap_parameter_tiny(&mut data, ts(), "AP_PARAMETER_TINY, VERSION, ARDUPILOT, 4_1_1_v11")
            .unwrap();
        assert_eq!(data.ap_parameter_tiny[0].key, "VERSION_ARDUPILOT");
        assert_eq!(data.ap_parameter_tiny[0].value.as_deref(), Some("4_1_1_v11"));

        ap_parameter_tiny(&mut data, ts(), "AP_PARAMETER_TINY, WPNAV_SPEED, 500").unwrap();
        assert_eq!(data.ap_parameter_tiny[1].key, "WPNAV_SPEED");
    }

    #[test]
    fn test_ga_get_param_has_no_value() {
        let mut data = LogData::new();
        ga_get_param(&mut data, ts(), "GA_GET_PARAM, spray_rate").unwrap();
        assert_eq!(data.ga_get_param[0].key, "spray_rate");
        assert!(data.ga_get_param[0].value.is_none());
    }

    #[test]
    fn test_perf_success_outcome() {
        let mut data = LogData::new();
        cc_parameter_perf(&mut data, ts(), "CC_PARAMETER_PERF: T140 speed_limit 5.0 12.3ms SUCCESS")
            .unwrap();
        let rec = &data.cc_parameter_perf[0];
        assert_eq!(rec.thread_id, 140);
        assert_eq!(rec.param_name.as_deref(), Some("speed_limit"));
        assert_eq!(rec.value.as_deref(), Some("5.0"));
        assert_eq!(rec.state.as_deref(), Some("SUCCESS"));
        assert_eq!(rec.time_taken_ms, Some(12.3));
    }

    #[test]
    fn test_perf_not_found_outcome() {
        let mut data = LogData::new();
        cc_parameter_perf(&mut data, ts(), "CC_PARAMETER_PERF: T7 missing_key NOT_FOUND 0.8ms")
            .unwrap();
        let rec = &data.cc_parameter_perf[0];
        assert_eq!(rec.state.as_deref(), Some("NOT_FOUND"));
        assert!(rec.value.is_none());
        assert_eq!(rec.time_taken_ms, Some(0.8));
    }

    #[test]
    fn test_perf_out_of_range_keeps_bounds() {
        let mut data = LogData::new();
        cc_parameter_perf(
            &mut data,
            ts(),
            "CC_PARAMETER_PERF: T2 climb_rate 9.9 OUT_OF_RANGE(0-5) 1.1ms",
        )
        .unwrap();
        assert_eq!(
            data.cc_parameter_perf[0].state.as_deref(),
            Some("OUT_OF_RANGE(0-5)")
        );
    }

    #[test]
    fn test_perf_no_change_extracts_value() {
        let mut data = LogData::new();
        cc_parameter_perf(&mut data, ts(), "CC_PARAMETER_PERF: T3 height 12 4.2ms NO_CHANGE")
            .unwrap();
        let rec = &data.cc_parameter_perf[0];
        assert_eq!(rec.state.as_deref(), Some("NO_CHANGE"));
        assert_eq!(rec.value.as_deref(), Some("12"));
    }

    #[test]
    fn test_db_perf_success_state_trailing() {
        let mut data = LogData::new();
        cc_parameter_db_perf(
            &mut data,
            ts(),
            "CC_PARAMETER_DB_PERF: T9 wrote shelve batch SUCCESS",
        )
        .unwrap();
        let rec = &data.cc_parameter_db_perf[0];
        assert_eq!(rec.state.as_deref(), Some("SUCCESS"));
        assert_eq!(rec.description, "wrote shelve batch");
    }

    #[test]
    fn test_db_perf_error_in_middle() {
        let mut data = LogData::new();
        cc_parameter_db_perf(&mut data, ts(), "CC_PARAMETER_DB_PERF: T9 write ERROR in tinydb")
            .unwrap();
        let rec = &data.cc_parameter_db_perf[0];
        assert_eq!(rec.state.as_deref(), Some("ERROR"));
        assert_eq!(rec.description, "write ERROR in tinydb");
    }
}
