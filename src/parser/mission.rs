//! Free-text classifier decoders for operational narration
//!
//! These categories carry prose emitted by the guidance, resume, and
//! sense-and-avoid subsystems. A priority-ordered table of literal
//! patterns maps known message shapes to a symbolic state key, extracting
//! embedded data (coordinates, indices, elapsed times) where the shape
//! carries any. Unrecognized messages still produce a record with the raw
//! text preserved, so novel firmware messages are never lost.

use anyhow::Result;
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::parser::dispatch::Outcome;
use crate::types::records::{BoundaryIntrusion, GuidedEvent, ResumeEvent, SnaInfo, VehicleCommand};
use crate::types::store::LogData;

static BRACKET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(.*?)\]").unwrap());
static TRAILING_INT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r": (\d+)").unwrap());
static YAW_DIFF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"yaw_diff=([\d.]+)").unwrap());
static TIME_ELAPSED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"time elapsed (\d+)").unwrap());
static HEIGHT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r": ([\d.]+)").unwrap());

/// Known guided-mission message shapes, checked exact-first then by
/// containment, in priority order
const GUIDED_PATTERNS: &[(&str, &str)] = &[
    ("START MISSION RECEIVED", "START_MISSION_RECEIVED"),
    ("RTL COMMAND RECEIVED", "RTL_COMMAND_RECEIVED"),
    ("RESUME COMMAND RECEIVED", "RESUME_COMMAND_RECEIVED"),
    ("GOTO COMMAND RECEIVED", "GOTO_COMMAND_RECEIVED"),
    ("STOPPING GUIDED CONTROLLER", "STOPPING_CONTROLLER"),
    ("RESTART FROM SNA", "RESTART_FROM_SNA"),
    ("Mode changed to guided", "MODE_CHANGE_GUIDED"),
    ("guided take_off", "TAKEOFF"),
    ("taking done", "TAKEOFF_COMPLETE"),
    ("Turning Yaw", "SET_YAW"),
    ("Checking HDNG", "CHECK_HEADING"),
    ("Checking Yaw", "CHECK_YAW"),
    ("No obstacle in front", "NO_OBSTACLE"),
    ("following guided path.", "FOLLOWING_PATH"),
    ("Smart_Path updated", "PATH_UPDATED"),
    ("Resume Triggered, Guided Mode.", "RESUME_TRIGGERED"),
    ("RTL Mode, Guided Mode", "RTL_TRIGGERED"),
    ("Starting spray", "START_SPRAY"),
    ("change_mode_to_auto", "MODE_CHANGE_AUTO"),
    (
        "Resetting smart path index and sending resume waypoint message",
        "RESET_PATH_INDEX",
    ),
    ("starting scheduler_update_mission task.", "START_SCHEDULER"),
];

/// Known resume-sequence message shapes, in priority order
const RESUME_PATTERNS: &[(&str, &str)] = &[
    ("setting resume height", "SET_RESUME_HEIGHT"),
    ("Resume mission aborted", "MISSION_ABORTED"),
    ("TAKEOFF, taking off", "TAKEOFF_OPERATION"),
    ("taking done", "TAKEOFF_COMPLETE"),
    ("climb_to_clearance_alt", "CLIMB_CLEARANCE"),
    ("change_mode_to_guided", "MODE_CHANGE_GUIDED"),
    ("change_mode_to_auto", "MODE_CHANGE_AUTO"),
    ("Turning Yaw", "TURNING_YAW"),
    ("Checking Yaw", "CHECKING_YAW"),
    ("Setting YAW", "SETTING_YAW"),
    ("No obstacle in front", "NO_OBSTACLE"),
    ("Starting spray", "START_SPRAY"),
    ("goto_rtl_loc", "GOTO_RTL_LOCATION"),
    ("descent_msn_alt", "DESCENT_MISSION_ALT"),
    ("flight_mode, resume_state", "INFO_HEADER"),
];

/// Resume state-machine names scanned (uppercased) when no message
/// pattern matched
const RESUME_STATES: &[&str] = &[
    "NONE",
    "INITIATE",
    "MODE_CHANGE_GUIDED",
    "TAKE_OFF",
    "CLIMB_CLR_ALT",
    "SET_HDNG",
    "CHECK_HDNG",
    "OBST_IN_FRONT",
    "GOTO_RTL_LOC",
    "DESCENT_MSN_ALT",
    "START_SPRAY",
    "SET_NEXT_WP",
    "MODE_CHANGE_AUTO",
    "ABORT",
    "OBST_DETECTED",
    "RTL",
    "STOP_YAW",
    "AUTO_OBS_INFRONT",
    "START_AUTO",
];

/// Statustext severity number to MAVLink severity name
fn statustext_severity_name(level: i64) -> String {
    let name = match level {
        0 => "EMERGENCY",
        1 => "ALERT",
        2 => "CRITICAL",
        3 => "ERROR",
        4 => "WARNING",
        5 => "NOTICE",
        6 => "INFO",
        7 => "DEBUG",
        8 => "NONE",
        _ => return format!("UNKNOWN_{}", level),
    };
    name.to_string()
}

/// Strip a category tag followed by optional separator punctuation
fn strip_tag<'a>(payload: &'a str, tag: &str, separators: &[&str]) -> Option<&'a str> {
    for sep in separators {
        let prefix = format!("{}{}", tag, sep);
        if let Some(rest) = payload.strip_prefix(&prefix) {
            return Some(rest.trim());
        }
    }
    payload.strip_prefix(tag).map(str::trim)
}

pub(crate) fn vehicle_command(
    data: &mut LogData,
    timestamp: NaiveDateTime,
    payload: &str,
) -> Result<Outcome> {
    let message = match strip_tag(payload, "VEHICLE_COMMAND", &[", ", ","]) {
        Some(m) if !m.is_empty() => m,
        _ => return Ok(Outcome::Skipped),
    };

    let mut message_type = String::new();
    let mut body = message.to_string();

    if let Some(status_part) = message.strip_prefix("Sent statustext: ") {
        if let Some((severity_str, rest)) = status_part.split_once(':') {
            match severity_str.trim().parse::<i64>() {
                Ok(level) => {
                    message_type = format!("STATUS_TEXT_{}", statustext_severity_name(level));
                    body = rest.trim().to_string();
                }
                Err(_) => {
                    message_type = "STATUS_TEXT_UNKNOWN".to_string();
                }
            }
        }
    }

    data.vehicle_command.push(VehicleCommand {
        timestamp,
        message_type,
        message: body,
    });
    Ok(Outcome::Recorded)
}

pub(crate) fn sna_info(
    data: &mut LogData,
    timestamp: NaiveDateTime,
    payload: &str,
) -> Result<Outcome> {
    let message = match strip_tag(payload, "SnAInfo", &[", ", ": ", " : ", ","]) {
        Some(m) if !m.is_empty() => m,
        _ => return Ok(Outcome::Skipped),
    };

    let guided_nav_markers = [
        "Guided GOTO_LAT_LON_CHANGED:",
        "Guided ALT_CHANGED:",
        "Ignoring radar data marker",
        "Checking obstacle in",
        "Ignore and Ignoring radar data markers",
    ];

    let category = if message.starts_with("BOUNDARY_DATA") {
        "BOUNDARY DATA"
    } else if message.starts_with("BOUNDARY_ITEM_INT") {
        "BOUNDARY ITEM"
    } else if message.starts_with("BOUNDARY_COUNT") {
        "BOUNDARY COUNT"
    } else if message.contains("Grid obstacle details:") {
        "GRID OBSTACLE"
    } else if message.contains("Real time obstacle details:") {
        "REAL-TIME OBSTACLE"
    } else if guided_nav_markers.iter().any(|m| message.contains(m)) {
        "GUIDED/NAVIGATION INFO"
    } else if message.contains("Grid data updated with") && message.contains("data's in logs/sna/")
    {
        "GRID UPDATE"
    } else {
        ""
    };

    data.sna_info.push(SnaInfo {
        timestamp,
        category: category.to_string(),
        message: message.to_string(),
    });
    Ok(Outcome::Recorded)
}

/// Classify one guided-mission message into (state_key, description)
fn classify_guided(message: &str) -> (String, String) {
    // Exact matches take priority over containment
    for (pattern, key) in GUIDED_PATTERNS {
        if message == *pattern {
            return (key.to_string(), message.to_string());
        }
    }
    for (pattern, key) in GUIDED_PATTERNS {
        if message.contains(pattern) {
            return (key.to_string(), message.to_string());
        }
    }

    // Structured shapes with embedded data
    if message.starts_with("home_point :") {
        let coords = BRACKET_RE
            .captures(message)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| message.to_string());
        return ("HOME_POINT".to_string(), coords);
    }
    if let Some(rest) = message.strip_prefix("GOTO_TEST,") {
        return ("GOTO_TEST".to_string(), rest.trim().to_string());
    }
    if message.contains("new_path_updated :") {
        let desc = message
            .split(':')
            .nth(1)
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| message.to_string());
        return ("NEW_PATH_UPDATED".to_string(), desc);
    }
    if message.contains("Going to waypoint") {
        return ("GOTO_WAYPOINT".to_string(), message.to_string());
    }
    if message.contains("Next waypoint set to:") {
        let desc = message
            .splitn(2, ':')
            .nth(1)
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| message.to_string());
        return ("NEXT_WAYPOINT_SET".to_string(), desc);
    }
    if message.contains("increased smart_path_index + 1 :") {
        let desc = capture_or(&TRAILING_INT_RE, message);
        return ("INCREMENT_PATH_INDEX".to_string(), desc);
    }
    if message.contains("time taken for calculation :") {
        let desc = capture_or(&TRAILING_INT_RE, message);
        return ("CALCULATION_TIME".to_string(), desc);
    }
    if message.contains("Yaw is not within tolerance") {
        let desc = capture_or(&YAW_DIFF_RE, message);
        return ("YAW_TOLERANCE_FAILED".to_string(), desc);
    }
    if message.contains("State change failed") {
        let desc = capture_or(&TIME_ELAPSED_RE, message);
        return ("STATE_CHANGE_FAILED".to_string(), desc);
    }

    // Generic/new message: keep the raw text, unclassified
    (String::new(), message.to_string())
}

fn capture_or(re: &Regex, message: &str) -> String {
    re.captures(message)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| message.to_string())
}

pub(crate) fn guided(
    data: &mut LogData,
    timestamp: NaiveDateTime,
    payload: &str,
) -> Result<Outcome> {
    let (message_type, message) = if let Some(rest) = payload.strip_prefix("GUIDED_MISSION,") {
        ("GUIDED_MISSION", rest.trim())
    } else if let Some(rest) = payload.strip_prefix("GUIDED_INFO,") {
        ("GUIDED_INFO", rest.trim())
    } else {
        return Ok(Outcome::Skipped);
    };

    let (state_key, description) = if message_type == "GUIDED_INFO" {
        // GUIDED_INFO carries "FLIGHT_MODE, STATE" (e.g. "GUIDED, TAKE_OFF")
        match message.split_once(", ") {
            Some((flight_mode, state)) => (
                state.trim().to_string(),
                format!("{}, {}", flight_mode.trim(), state.trim()),
            ),
            None => (message.to_string(), message.to_string()),
        }
    } else {
        classify_guided(message)
    };

    data.guided_mission.push(GuidedEvent {
        timestamp,
        message_type: message_type.to_string(),
        state_key,
        description,
    });
    Ok(Outcome::Recorded)
}

pub(crate) fn resume(
    data: &mut LogData,
    timestamp: NaiveDateTime,
    payload: &str,
) -> Result<Outcome> {
    let (message_type, message) = if let Some(rest) = payload.strip_prefix("RESUME_MISSION_STATUS,")
    {
        ("RESUME_MISSION_STATUS", rest.trim())
    } else if let Some(rest) = payload.strip_prefix("RESUME_INFO,") {
        ("RESUME_INFO", rest.trim())
    } else if let Some(rest) = payload.strip_prefix("RESUME,") {
        ("RESUME", rest.trim())
    } else {
        return Ok(Outcome::Skipped);
    };

    let mut state_key = None;
    let mut description = message.to_string();

    for (pattern, key) in RESUME_PATTERNS {
        if message.contains(pattern) {
            state_key = Some(key.to_string());
            if *pattern == "setting resume height" {
                description = capture_or(&HEIGHT_RE, message);
            }
            break;
        }
    }

    if state_key.is_none() {
        let upper = message.to_ascii_uppercase();
        for state in RESUME_STATES {
            if upper.contains(state) {
                state_key = Some(format!("STATE_{}", state));
                break;
            }
        }
    }

    let state_key = state_key.unwrap_or_else(|| "UNKNOWN_MESSAGE".to_string());

    data.resume_mission.push(ResumeEvent {
        timestamp,
        message_type: message_type.to_string(),
        state_key,
        description,
    });

    let lower = message.to_ascii_lowercase();
    if lower.contains("aborted") || lower.contains("failed") {
        return Ok(Outcome::Flagged(format!("RESUME ERROR: {}", message)));
    }
    Ok(Outcome::Recorded)
}

pub(crate) fn boundary_intr(
    data: &mut LogData,
    timestamp: NaiveDateTime,
    payload: &str,
) -> Result<Outcome> {
    let message = match strip_tag(payload, "BOUNDARY_INTR", &[", ", ","]) {
        Some(m) if !m.is_empty() => m,
        _ => return Ok(Outcome::Skipped),
    };

    data.boundary_intr.push(BoundaryIntrusion {
        timestamp,
        message: message.to_string(),
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
    fn test_guided_known_message() {
        let mut data = LogData::new();
        guided(&mut data, ts(), "GUIDED_MISSION, START MISSION RECEIVED").unwrap();
        let rec = &data.guided_mission[0];
        assert_eq!(rec.state_key, "START_MISSION_RECEIVED");
        assert_eq!(rec.description, "START MISSION RECEIVED");
    }

    #[test]
    fn test_guided_home_point_extracts_coordinates() {
        let mut data = LogData::new();
        guided(&mut data, ts(), "GUIDED_MISSION, home_point : [18.52, 73.85]").unwrap();
        let rec = &data.guided_mission[0];
        assert_eq!(rec.state_key, "HOME_POINT");
        assert_eq!(rec.description, "18.52, 73.85");
    }

    #[test]
    fn test_guided_yaw_tolerance_extracts_diff() {
        let mut data = LogData::new();
        guided(
            &mut data,
            ts(),
            "GUIDED_MISSION, Yaw is not within tolerance yaw_diff=12.7",
        )
        .unwrap();
        let rec = &data.guided_mission[0];
        assert_eq!(rec.state_key, "YAW_TOLERANCE_FAILED");
        assert_eq!(rec.description, "12.7");
    }

    #[test]
    fn test_guided_unknown_message_preserved() {
        let mut data = LogData::new();
        guided(&mut data, ts(), "GUIDED_MISSION, totally new firmware text").unwrap();
        let rec = &data.guided_mission[0];
        assert_eq!(rec.state_key, "");
        assert_eq!(rec.description, "totally new firmware text");
    }

    #[test]
    fn test_guided_info_mode_and_state() {
        let mut data = LogData::new();
        guided(&mut data, ts(), "GUIDED_INFO, GUIDED, TAKE_OFF").unwrap();
        let rec = &data.guided_mission[0];
        assert_eq!(rec.message_type, "GUIDED_INFO");
        assert_eq!(rec.state_key, "TAKE_OFF");
        assert_eq!(rec.description, "GUIDED, TAKE_OFF");
    }

    #[test]
    fn test_resume_height_extraction() {
        let mut data = LogData::new();
        resume(&mut data, ts(), "RESUME_INFO, setting resume height : 14.5").unwrap();
        let rec = &data.resume_mission[0];
        assert_eq!(rec.state_key, "SET_RESUME_HEIGHT");
        assert_eq!(rec.description, "14.5");
    }

    #[test]
    fn test_resume_aborted_is_flagged() {
        let mut data = LogData::new();
        let outcome = resume(&mut data, ts(), "RESUME, Resume mission aborted").unwrap();
        assert_eq!(data.resume_mission.len(), 1);
        assert_eq!(
            outcome,
            Outcome::Flagged("RESUME ERROR: Resume mission aborted".to_string())
        );
    }

    #[test]
    fn test_resume_state_enum_scan() {
        let mut data = LogData::new();
        resume(&mut data, ts(), "RESUME, now in climb_clr_alt").unwrap();
        assert_eq!(data.resume_mission[0].state_key, "STATE_CLIMB_CLR_ALT");
    }

    #[test]
    fn test_resume_unknown_message() {
        let mut data = LogData::new();
        resume(&mut data, ts(), "RESUME, some new text").unwrap();
        assert_eq!(data.resume_mission[0].state_key, "UNKNOWN_MESSAGE");
    }

    #[test]
    fn test_vehicle_command_statustext() {
        let mut data = LogData::new();
        vehicle_command(
            &mut data,
            ts(),
            "VEHICLE_COMMAND, Sent statustext: 4: low battery",
        )
        .unwrap();
        let rec = &data.vehicle_command[0];
        assert_eq!(rec.message_type, "STATUS_TEXT_WARNING");
        assert_eq!(rec.message, "low battery");
    }

    #[test]
    fn test_vehicle_command_plain_message() {
        let mut data = LogData::new();
        vehicle_command(&mut data, ts(), "VEHICLE_COMMAND, mission upload complete").unwrap();
        let rec = &data.vehicle_command[0];
        assert_eq!(rec.message_type, "");
        assert_eq!(rec.message, "mission upload complete");
    }

    #[test]
    fn test_vehicle_command_empty_skipped() {
        let mut data = LogData::new();
        assert_eq!(
            vehicle_command(&mut data, ts(), "VEHICLE_COMMAND,").unwrap(),
            Outcome::Skipped
        );
    }

    #[test]
    fn test_sna_info_classification() {
        let mut data = LogData::new();
        sna_info(&mut data, ts(), "SnAInfo, BOUNDARY_COUNT 14").unwrap();
        sna_info(&mut data, ts(), "SnAInfo: Grid obstacle details: 3 sectors").unwrap();
        sna_info(&mut data, ts(), "SnAInfo, radar warming up").unwrap();
        assert_eq!(data.sna_info[0].category, "BOUNDARY COUNT");
        assert_eq!(data.sna_info[1].category, "GRID OBSTACLE");
        assert_eq!(data.sna_info[2].category, "");
    }

    #[test]
    fn test_boundary_intrusion_message() {
        let mut data = LogData::new();
        boundary_intr(&mut data, ts(), "BOUNDARY_INTR, vehicle outside boundary").unwrap();
        assert_eq!(data.boundary_intr[0].message, "vehicle outside boundary");
        assert_eq!(
            boundary_intr(&mut data, ts(), "BOUNDARY_INTR,").unwrap(),
            Outcome::Skipped
        );
    }
}
