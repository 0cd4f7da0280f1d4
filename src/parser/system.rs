//! Decoders for system health and identification lines
//!
//! CPU statistics, component version announcements, the sense-and-avoid
//! version banner, the estimated max speed, and the active MAVLink port.

use anyhow::Result;
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::parser::dispatch::Outcome;
use crate::types::records::{ActivePort, CpuStats, MaxSpeedEstimate, VersionInfo};
use crate::types::store::LogData;

static CPU_USAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"CPU usage: ([\d.]+)%").unwrap());
static RAM_USAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"RAM usage: (\d+) MB").unwrap());
static LOAD_AVG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Load : \(([\d., ]+)\)").unwrap());
static TEMP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Temp: ([\d.]+)").unwrap());
static AP_VERSION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"GA ArduCopter V([^(]+)").unwrap());
static SNA_VERSION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"SnA version: (\w+)").unwrap());
static MAX_SPEED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Calculated max speed ([\d.]+)").unwrap());
static ACTIVE_PORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"MAVLINK ACTIVE_MAVLINK_PORT is : (\d+)").unwrap());

fn capture_f64(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn capture_i64(re: &Regex, text: &str) -> Option<i64> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// CPU statistics line. Every field is optional so that a damaged or
/// truncated line (or a "Temp: N/A" sensor) still yields a record.
pub(crate) fn cpu_stats(
    data: &mut LogData,
    timestamp: NaiveDateTime,
    payload: &str,
) -> Result<Outcome> {
    let mut loads: [Option<f64>; 3] = [None, None, None];
    if let Some(caps) = LOAD_AVG_RE.captures(payload) {
        for (slot, part) in loads.iter_mut().zip(caps[1].split(',')) {
            *slot = part.trim().parse().ok();
        }
    }

    data.cpu.push(CpuStats {
        timestamp,
        cpu_usage_percent: capture_f64(&CPU_USAGE_RE, payload),
        ram_usage_mb: capture_i64(&RAM_USAGE_RE, payload),
        load_avg_1min: loads[0],
        load_avg_5min: loads[1],
        load_avg_15min: loads[2],
        temp_celsius: capture_f64(&TEMP_RE, payload),
    });
    Ok(Outcome::Recorded)
}

/// VERSION lines announce one of three components. The shape of the
/// text after the tag identifies which.
pub(crate) fn version(
    data: &mut LogData,
    timestamp: NaiveDateTime,
    payload: &str,
) -> Result<Outcome> {
    let info = match payload.split_once("VERSION,") {
        Some((_, rest)) => rest.trim(),
        None => return Ok(Outcome::Skipped),
    };
    if info.is_empty() {
        return Ok(Outcome::Skipped);
    }

    let (component, version, component_type) =
        if info.starts_with('v') && !info.contains(char::is_whitespace) {
            ("CC", info.to_string(), "Companion Computer")
        } else if info.contains("AP/FCS version") {
            let version = AP_VERSION_RE
                .captures(info)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().trim().to_string())
                .or_else(|| {
                    info.split_once(':')
                        .map(|(_, v)| v.trim().to_string())
                })
                .unwrap_or_else(|| info.to_string());
            ("AP/FCS", version, "Flight Controller")
        } else if info.contains("GCS App version") {
            let version = info
                .split(':')
                .nth(1)
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|| info.to_string());
            ("GCS App", version, "Ground Station")
        } else {
            ("Unknown", info.to_string(), "unknown")
        };

    data.version.push(VersionInfo {
        timestamp,
        component: component.to_string(),
        version,
        component_type: component_type.to_string(),
        raw_data: payload.to_string(),
    });
    Ok(Outcome::Recorded)
}

/// Sense-and-avoid version banner, reported through the SnAInfo channel
pub(crate) fn sna_version(
    data: &mut LogData,
    timestamp: NaiveDateTime,
    payload: &str,
) -> Result<Outcome> {
    let caps = match SNA_VERSION_RE.captures(payload) {
        Some(caps) => caps,
        None => return Ok(Outcome::Skipped),
    };

    data.version.push(VersionInfo {
        timestamp,
        component: "SnA".to_string(),
        version: caps[1].to_string(),
        component_type: "Sense & Avoid".to_string(),
        raw_data: payload.to_string(),
    });
    Ok(Outcome::Recorded)
}

pub(crate) fn max_speed(
    data: &mut LogData,
    timestamp: NaiveDateTime,
    payload: &str,
) -> Result<Outcome> {
    let speed = match capture_f64(&MAX_SPEED_RE, payload) {
        Some(speed) => speed,
        None => return Ok(Outcome::Skipped),
    };

    data.max_speed_esti.push(MaxSpeedEstimate {
        timestamp,
        max_speed: speed,
    });
    Ok(Outcome::Recorded)
}

pub(crate) fn active_port(
    data: &mut LogData,
    timestamp: NaiveDateTime,
    payload: &str,
) -> Result<Outcome> {
    let port = match capture_i64(&ACTIVE_PORT_RE, payload) {
        Some(port) => port,
        None => return Ok(Outcome::Skipped),
    };

    data.mavlink_active_port.push(ActivePort {
        timestamp,
        active_port: port,
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
    fn test_cpu_stats_full_line() {
        let mut data = LogData::new();
        cpu_stats(
            &mut data,
            ts(),
            "CPU, CPU usage: 42.5% RAM usage: 512 MB Load : (0.8, 1.1, 0.9) Temp: 55.2",
        )
        .unwrap();
        let rec = &data.cpu[0];
        assert_eq!(rec.cpu_usage_percent, Some(42.5));
        assert_eq!(rec.ram_usage_mb, Some(512));
        assert_eq!(rec.load_avg_1min, Some(0.8));
        assert_eq!(rec.load_avg_5min, Some(1.1));
        assert_eq!(rec.load_avg_15min, Some(0.9));
        assert_eq!(rec.temp_celsius, Some(55.2));
    }

    #[test]
    fn test_cpu_stats_temp_unavailable() {
        let mut data = LogData::new();
        cpu_stats(&mut data, ts(), "CPU, CPU usage: 10.0% Temp: N/A").unwrap();
        let rec = &data.cpu[0];
        assert_eq!(rec.cpu_usage_percent, Some(10.0));
        assert_eq!(rec.temp_celsius, None);
        assert_eq!(rec.ram_usage_mb, None);
    }

    #[test]
    fn test_version_companion_computer() {
        let mut data = LogData::new();
        version(&mut data, ts(), "VERSION, v3.2.1").unwrap();
        let rec = &data.version[0];
        assert_eq!(rec.component, "CC");
        assert_eq!(rec.version, "v3.2.1");
        assert_eq!(rec.component_type, "Companion Computer");
    }

    #[test]
    fn test_version_flight_controller() {
        let mut data = LogData::new();
        version(
            &mut data,
            ts(),
            "VERSION, AP/FCS version : GA ArduCopter V4.3.6 (abc123)",
        )
        .unwrap();
        let rec = &data.version[0];
        assert_eq!(rec.component, "AP/FCS");
        assert_eq!(rec.version, "4.3.6");
        assert_eq!(rec.component_type, "Flight Controller");
    }

    #[test]
    fn test_version_ground_station() {
        let mut data = LogData::new();
        version(&mut data, ts(), "VERSION, GCS App version : 2.14.0").unwrap();
        let rec = &data.version[0];
        assert_eq!(rec.component, "GCS App");
        assert_eq!(rec.version, "2.14.0");
    }

    #[test]
    fn test_version_unknown_component() {
        let mut data = LogData::new();
        version(&mut data, ts(), "VERSION, something unexpected").unwrap();
        let rec = &data.version[0];
        assert_eq!(rec.component, "Unknown");
        assert_eq!(rec.component_type, "unknown");
    }

    #[test]
    fn test_sna_version_banner() {
        let mut data = LogData::new();
        sna_version(&mut data, ts(), "SnAInfo, SnA version: a1b2c3d").unwrap();
        let rec = &data.version[0];
        assert_eq!(rec.component, "SnA");
        assert_eq!(rec.version, "a1b2c3d");
        assert_eq!(
            sna_version(&mut data, ts(), "SnAInfo, no banner here").unwrap(),
            Outcome::Skipped
        );
    }

    #[test]
    fn test_max_speed_and_active_port() {
        let mut data = LogData::new();
        max_speed(&mut data, ts(), "MAX_SPEED, Calculated max speed 8.5 m/s").unwrap();
        assert_eq!(data.max_speed_esti[0].max_speed, 8.5);

        active_port(&mut data, ts(), "MAVLINK ACTIVE_MAVLINK_PORT is : 14550").unwrap();
        assert_eq!(data.mavlink_active_port[0].active_port, 14550);

        assert_eq!(
            max_speed(&mut data, ts(), "MAX_SPEED, nothing numeric").unwrap(),
            Outcome::Skipped
        );
    }
}
