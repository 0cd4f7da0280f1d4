//! Category dispatch: an ordered rule table, first match wins
//!
//! Each rule pairs a payload predicate with a decoder. The order mirrors
//! the controller firmware's emission grammar and is load-bearing where
//! tags share prefixes; a payload matching no rule is the caller's cue to
//! store a catch-all record.

use anyhow::Result;
use chrono::NaiveDateTime;

use crate::parser::{mission, params, sna, system, telemetry};
use crate::types::store::LogData;

/// Payload predicate for one dispatch rule
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Payload starts with the literal tag
    Prefix(&'static str),
    /// Payload starts with any of a small fixed set of tags
    AnyPrefix(&'static [&'static str]),
    /// Payload contains the literal anywhere (loosely-tagged categories)
    Contains(&'static str),
    /// Payload contains every one of the literals
    AllContains(&'static [&'static str]),
    /// Payload starts with the tag and contains the literal
    PrefixAndContains(&'static str, &'static str),
}

impl Rule {
    pub fn matches(&self, payload: &str) -> bool {
        match self {
            Rule::Prefix(tag) => payload.starts_with(tag),
            Rule::AnyPrefix(tags) => tags.iter().any(|t| payload.starts_with(t)),
            Rule::Contains(lit) => payload.contains(lit),
            Rule::AllContains(lits) => lits.iter().all(|l| payload.contains(l)),
            Rule::PrefixAndContains(tag, lit) => {
                payload.starts_with(tag) && payload.contains(lit)
            }
        }
    }
}

/// What one decoder did with a payload
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A record was stored
    Recorded,
    /// Recognized header/status noise, no record
    Skipped,
    /// Error-shaped content for the error stream (a record may or may
    /// not also have been stored)
    Flagged(String),
}

pub type Handler = fn(&mut LogData, NaiveDateTime, &str) -> Result<Outcome>;

/// Ordered dispatch table; first matching rule wins
pub const RULES: &[(Rule, Handler)] = &[
    (Rule::Prefix("MISSION_INFO"), telemetry::mission_info),
    (Rule::Prefix("RC_CHANNELS"), telemetry::rc_channels),
    (Rule::Prefix("RESUME_STATE"), telemetry::resume_state),
    (Rule::Prefix("SERIAL_TCP_CON"), telemetry::serial_tcp),
    (Rule::Prefix("VEHICLE_COMMAND"), mission::vehicle_command),
    (Rule::Prefix("SCHEDULERTASK,"), telemetry::scheduler_task),
    (Rule::Prefix("CC_PARAMETER,"), params::cc_parameter),
    (Rule::Prefix("CC_PARAMETER_SHELVE,"), params::cc_parameter_shelve),
    (Rule::Prefix("CC_PARAMETER_TINY,"), params::cc_parameter_tiny),
    (Rule::Prefix("AP_PARAMETER,"), params::ap_parameter),
    (Rule::Prefix("AP_PARAMETER_TINY,"), params::ap_parameter_tiny),
    (Rule::Prefix("GA_SET_PARAM,"), params::ga_set_param),
    (Rule::Prefix("GA_GET_PARAM,"), params::ga_get_param),
    (Rule::Prefix("GA_PARAM,"), params::ga_param),
    (Rule::Prefix("MAVLINK_INFO"), telemetry::mavlink_info),
    (
        Rule::AllContains(&["MAX_SPEED_ESTI", "Calculated max speed"]),
        system::max_speed,
    ),
    (
        Rule::Contains("MAVLINK ACTIVE_MAVLINK_PORT is :"),
        system::active_port,
    ),
    (Rule::Prefix("CPU,"), system::cpu_stats),
    (Rule::Prefix("VERSION,"), system::version),
    (
        Rule::PrefixAndContains("SnAInfo,", "SnA version:"),
        system::sna_version,
    ),
    (Rule::Prefix("SnA:Receiving data,"), telemetry::sna_receiving),
    (Rule::Prefix("SnAInfo"), mission::sna_info),
    (
        Rule::AnyPrefix(&["GUIDED_MISSION,", "GUIDED_INFO,"]),
        mission::guided,
    ),
    (
        Rule::AnyPrefix(&["RESUME_MISSION_STATUS,", "RESUME_INFO,", "RESUME,"]),
        mission::resume,
    ),
    (Rule::Prefix("CC_PARAMETER_PERF:"), params::cc_parameter_perf),
    (
        Rule::Prefix("CC_PARAMETER_DB_PERF:"),
        params::cc_parameter_db_perf,
    ),
    (Rule::Prefix("SnALogging,"), sna::sna_logging),
    (
        Rule::Prefix("MISSION_STATE_CHANGED,"),
        telemetry::mission_state_changed,
    ),
    (Rule::Prefix("SPRAY_INFO"), telemetry::spray_info),
    (
        Rule::AnyPrefix(&["FlOWMETER,", "FLOWMETER,"]),
        telemetry::flowmeter,
    ),
    (Rule::Prefix("FLOWMETER_INFO,"), telemetry::flowmeter_info),
    (Rule::Prefix("PUMP,"), telemetry::pump),
    (Rule::Prefix("NOZZLE,"), telemetry::nozzle),
    (Rule::Prefix("BOUNDARY_INTR"), mission::boundary_intr),
];

/// Route one payload to its decoder.
///
/// Returns `None` when no rule matched, leaving the catch-all path to
/// the caller.
pub fn dispatch(
    data: &mut LogData,
    timestamp: NaiveDateTime,
    payload: &str,
) -> Option<Result<Outcome>> {
    for (rule, handler) in RULES {
        if rule.matches(payload) {
            return Some(handler(data, timestamp, payload));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_disambiguation_by_delimiter() {
        // The trailing comma keeps the plain parameter rule from
        // swallowing its suffixed siblings
        let plain = Rule::Prefix("CC_PARAMETER,");
        assert!(plain.matches("CC_PARAMETER, key, value"));
        assert!(!plain.matches("CC_PARAMETER_SHELVE, key, value"));
        assert!(!plain.matches("CC_PARAMETER_PERF: T1 x 1 2ms SUCCESS"));
    }

    #[test]
    fn test_containment_rules() {
        let rule = Rule::AllContains(&["MAX_SPEED_ESTI", "Calculated max speed"]);
        assert!(rule.matches("blah MAX_SPEED_ESTI, Calculated max speed 4.5"));
        assert!(!rule.matches("MAX_SPEED_ESTI starting up"));
    }

    #[test]
    fn test_first_match_wins_for_sna_version() {
        // The version rule precedes the generic SnAInfo rule
        let payload = "SnAInfo, SnA version: abc123";
        let idx_version = RULES
            .iter()
            .position(|(r, _)| r.matches(payload))
            .unwrap();
        assert!(matches!(
            RULES[idx_version].0,
            Rule::PrefixAndContains("SnAInfo,", "SnA version:")
        ));
    }
}
