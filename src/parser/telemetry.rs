//! Fixed-arity positional decoders
//!
//! These categories carry comma-separated fields after their tag. A line
//! with fewer than the category's minimum field count is dropped as noise
//! (typically a stray or duplicated header row), never an error.

use anyhow::Result;
use chrono::NaiveDateTime;

use crate::coerce::{coerce_f64, coerce_i64, coerce_str};
use crate::parser::dispatch::Outcome;
use crate::types::records::*;
use crate::types::store::LogData;

/// Comma fields after the leading category tag, trimmed
fn tag_fields(payload: &str) -> Vec<&str> {
    payload.split(',').skip(1).map(str::trim).collect()
}

/// ArduCopter flight mode name to mode number
fn flight_mode_code(mode: &str) -> Option<i64> {
    let code = match mode {
        "STABILIZE" => 0,
        "ACRO" => 1,
        "ALT_HOLD" => 2,
        "AUTO" => 3,
        "GUIDED" => 4,
        "LOITER" => 5,
        "RTL" => 6,
        "CIRCLE" => 7,
        "LAND" => 9,
        "DRIFT" => 11,
        "SPORT" => 13,
        "FLIP" => 14,
        "AUTOTUNE" => 15,
        "POSHOLD" => 16,
        "BRAKE" => 17,
        "THROW" => 18,
        "AVOID_ADSB" => 19,
        "GUIDED_NOGPS" => 20,
        "SMART_RTL" => 21,
        "FLOWHOLD" => 22,
        "FOLLOW" => 23,
        "ZIGZAG" => 24,
        "SYSTEMID" => 25,
        "AUTOROTATE" => 26,
        _ => return None,
    };
    Some(code)
}

pub(crate) fn mission_info(
    data: &mut LogData,
    timestamp: NaiveDateTime,
    payload: &str,
) -> Result<Outcome> {
    if payload.contains("mode, armed, flying") {
        return Ok(Outcome::Skipped);
    }
    let parts = tag_fields(payload);
    if parts.len() < 9 {
        return Ok(Outcome::Skipped);
    }

    let flight_mode = coerce_str(parts[0]);
    let armed = coerce_str(parts[1]);
    let flying = coerce_str(parts[2]);

    let flight_mode_val = flight_mode
        .as_deref()
        .and_then(|m| flight_mode_code(&m.to_ascii_uppercase()));
    let armed_val = armed.as_deref().and_then(|a| match a.to_ascii_lowercase().as_str() {
        "armed" => Some(1),
        "disarmed" => Some(0),
        _ => None,
    });
    let flying_val = flying
        .as_deref()
        .and_then(|f| match f.to_ascii_lowercase().as_str() {
            "flying" => Some(1),
            "not-flying" => Some(0),
            _ => None,
        });

    data.mission_info.push(MissionInfo {
        timestamp,
        flight_mode,
        flight_mode_val,
        armed,
        armed_val,
        flying,
        flying_val,
        height_m: coerce_f64(parts[3]),
        speed_ms: coerce_f64(parts[4]),
        climb_rate_ms: coerce_f64(parts[5]),
        heading_deg: coerce_f64(parts[6]),
        lat_deg: coerce_f64(parts[7]),
        lon_deg: coerce_f64(parts[8]),
    });
    Ok(Outcome::Recorded)
}

pub(crate) fn rc_channels(
    data: &mut LogData,
    timestamp: NaiveDateTime,
    payload: &str,
) -> Result<Outcome> {
    if payload.contains("rc1, rc2, rc3") {
        return Ok(Outcome::Skipped);
    }
    let parts = tag_fields(payload);
    if parts.len() < 9 {
        return Ok(Outcome::Skipped);
    }

    // Some firmware writes channels as c6=1101
    let mut channels: [Option<i64>; 10] = Default::default();
    for (i, part) in parts.iter().take(10).enumerate() {
        let raw = match part.split_once('=') {
            Some((_, v)) => v,
            None => part,
        };
        channels[i] = coerce_i64(raw);
    }

    data.rc_channels.push(RcChannels {
        timestamp,
        channels,
    });
    Ok(Outcome::Recorded)
}

pub(crate) fn resume_state(
    data: &mut LogData,
    timestamp: NaiveDateTime,
    payload: &str,
) -> Result<Outcome> {
    if payload.contains("lat, lon, height") {
        return Ok(Outcome::Skipped);
    }
    let parts = tag_fields(payload);
    if parts.len() < 6 {
        return Ok(Outcome::Skipped);
    }

    data.resume_state.push(ResumePoint {
        timestamp,
        lat: coerce_f64(parts[0]),
        lon: coerce_f64(parts[1]),
        height: coerce_f64(parts[2]),
        yaw: coerce_f64(parts[3]),
        wp: coerce_i64(parts[4]),
        spray: coerce_i64(parts[5]),
    });
    Ok(Outcome::Recorded)
}

pub(crate) fn serial_tcp(
    data: &mut LogData,
    timestamp: NaiveDateTime,
    payload: &str,
) -> Result<Outcome> {
    // Header row and connection status chatter carry no counters
    if payload.contains("serial_recv_bytes")
        || payload.contains("Waiting for connection")
        || payload.contains("Connecting with tcp")
    {
        return Ok(Outcome::Skipped);
    }
    let parts = tag_fields(payload);
    if parts.len() < 2 {
        return Ok(Outcome::Skipped);
    }

    data.serial_tcp_con.push(SerialTcpStats {
        timestamp,
        serial_recv_bytes: coerce_i64(parts[0]),
        serial_send_bytes: coerce_i64(parts[1]),
    });
    Ok(Outcome::Recorded)
}

pub(crate) fn scheduler_task(
    data: &mut LogData,
    timestamp: NaiveDateTime,
    payload: &str,
) -> Result<Outcome> {
    let parts = tag_fields(payload);
    if parts.len() < 3 {
        return Ok(Outcome::Skipped);
    }

    data.scheduler_task.push(SchedulerTask {
        timestamp,
        task_name: parts[0].to_string(),
        parameter: parts[1].to_string(),
        task_id: coerce_i64(parts[2]),
    });
    Ok(Outcome::Recorded)
}

pub(crate) fn mavlink_info(
    data: &mut LogData,
    timestamp: NaiveDateTime,
    payload: &str,
) -> Result<Outcome> {
    if payload.contains("name, messages_count") {
        return Ok(Outcome::Skipped);
    }
    let parts = tag_fields(payload);
    if parts.len() < 3 {
        return Ok(Outcome::Skipped);
    }

    data.mavlink_info.push(MavlinkInfo {
        timestamp,
        name: parts[0].to_string(),
        messages_count: coerce_i64(parts[1]),
        last_message: parts[2].to_string(),
        status: parts.get(3).map(|s| s.to_string()),
    });
    Ok(Outcome::Recorded)
}

pub(crate) fn sna_receiving(
    data: &mut LogData,
    timestamp: NaiveDateTime,
    payload: &str,
) -> Result<Outcome> {
    let rest = payload["SnA:Receiving data,".len()..].trim();
    let parts: Vec<&str> = rest.split(',').map(str::trim).collect();
    if parts.len() < 9 {
        return Ok(Outcome::Skipped);
    }

    data.sna_receiving_data.push(SnaReceiving {
        timestamp,
        data_val1: coerce_f64(parts[0]),
        data_val2: coerce_f64(parts[1]),
        data_val3: coerce_f64(parts[2]),
        data_val4: coerce_f64(parts[3]),
        data_val5: coerce_f64(parts[4]),
        data_val6: coerce_f64(parts[5]),
        data_val7: coerce_f64(parts[6]),
        data_val8: coerce_i64(parts[7]),
        data_val9: coerce_i64(parts[8]),
    });
    Ok(Outcome::Recorded)
}

pub(crate) fn mission_state_changed(
    data: &mut LogData,
    timestamp: NaiveDateTime,
    payload: &str,
) -> Result<Outcome> {
    let value = payload["MISSION_STATE_CHANGED,".len()..].trim();
    data.mission_state_changed.push(MissionStateChanged {
        timestamp,
        value: coerce_i64(value),
    });
    Ok(Outcome::Recorded)
}

pub(crate) fn spray_info(
    data: &mut LogData,
    timestamp: NaiveDateTime,
    payload: &str,
) -> Result<Outcome> {
    if payload.contains("spray_status, pump_pwm") {
        return Ok(Outcome::Skipped);
    }
    let parts = tag_fields(payload);
    if parts.len() < 12 {
        return Ok(Outcome::Skipped);
    }

    data.spray_info.push(SprayInfo {
        timestamp,
        spray_status: coerce_i64(parts[0]),
        pump_pwm: coerce_i64(parts[1]),
        nozzle_pwm: coerce_i64(parts[2]),
        req_flowrate_lpm: coerce_f64(parts[3]),
        actual_flowrate_lpm: coerce_f64(parts[4]),
        flowmeter_pulse: coerce_i64(parts[5]),
        payload_rem_l: coerce_f64(parts[6]),
        area_sprayed_acre: coerce_f64(parts[7]),
        req_dosage_l_acre: coerce_f64(parts[8]),
        actual_dosage_l_acre: coerce_f64(parts[9]),
        prv_wp: coerce_i64(parts[10]),
        next_wp: coerce_i64(parts[11]),
    });
    Ok(Outcome::Recorded)
}

pub(crate) fn flowmeter(
    data: &mut LogData,
    timestamp: NaiveDateTime,
    payload: &str,
) -> Result<Outcome> {
    if payload.contains("Flowrate(l/m), Signal_Count") {
        return Ok(Outcome::Skipped);
    }
    let parts = tag_fields(payload);
    if parts.len() < 2 {
        return Ok(Outcome::Skipped);
    }

    data.flowmeter.push(FlowmeterReading {
        timestamp,
        flowrate_lpm: coerce_f64(parts[0]),
        signal_count: coerce_i64(parts[1]),
    });
    Ok(Outcome::Recorded)
}

pub(crate) fn flowmeter_info(
    data: &mut LogData,
    timestamp: NaiveDateTime,
    payload: &str,
) -> Result<Outcome> {
    let parts = tag_fields(payload);
    data.flowmeter_info.push(FlowmeterInfo {
        timestamp,
        flow_sensor_info: parts.join(" ").trim().to_string(),
    });
    Ok(Outcome::Recorded)
}

pub(crate) fn pump(
    data: &mut LogData,
    timestamp: NaiveDateTime,
    payload: &str,
) -> Result<Outcome> {
    let parts = tag_fields(payload);
    data.pump.push(PumpInfo {
        timestamp,
        pump_info: parts.join(" ").trim().to_string(),
    });
    Ok(Outcome::Recorded)
}

pub(crate) fn nozzle(
    data: &mut LogData,
    timestamp: NaiveDateTime,
    payload: &str,
) -> Result<Outcome> {
    let state = payload["NOZZLE,".len()..].trim();
    let value = match state {
        "Stopped" => Some(0.0),
        "Stop triggered" => Some(0.5),
        "Start" => Some(1.0),
        _ => None,
    };

    data.nozzle.push(NozzleState {
        timestamp,
        value,
        raw_value: state.to_string(),
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
    fn test_mission_info_mode_mapping() {
        let mut data = LogData::new();
        let payload = "MISSION_INFO,GUIDED,armed,flying,12.5,3.2,0.1,90.0,18.52,73.85";
        assert_eq!(
            mission_info(&mut data, ts(), payload).unwrap(),
            Outcome::Recorded
        );
        let rec = &data.mission_info[0];
        assert_eq!(rec.flight_mode.as_deref(), Some("GUIDED"));
        assert_eq!(rec.flight_mode_val, Some(4));
        assert_eq!(rec.armed_val, Some(1));
        assert_eq!(rec.flying_val, Some(1));
        assert_eq!(rec.height_m, Some(12.5));
        assert_eq!(rec.lon_deg, Some(73.85));
    }

    #[test]
    fn test_mission_info_header_skipped() {
        let mut data = LogData::new();
        let payload = "MISSION_INFO, mode, armed, flying, height_m";
        assert_eq!(
            mission_info(&mut data, ts(), payload).unwrap(),
            Outcome::Skipped
        );
        assert!(data.mission_info.is_empty());
    }

    #[test]
    fn test_mission_info_short_line_dropped() {
        let mut data = LogData::new();
        assert_eq!(
            mission_info(&mut data, ts(), "MISSION_INFO,GUIDED,armed").unwrap(),
            Outcome::Skipped
        );
        assert!(data.mission_info.is_empty());
    }

    #[test]
    fn test_rc_channels_equals_notation() {
        let mut data = LogData::new();
        let payload = "RC_CHANNELS,1500,1500,1000,1500,1800,c6=1101,1000,1000,1500,1500";
        rc_channels(&mut data, ts(), payload).unwrap();
        let rec = &data.rc_channels[0];
        assert_eq!(rec.channels[5], Some(1101));
        assert_eq!(rec.channels[0], Some(1500));
    }

    #[test]
    fn test_rc_channels_nine_fields_pads_tenth() {
        let mut data = LogData::new();
        let payload = "RC_CHANNELS,1,2,3,4,5,6,7,8,9";
        rc_channels(&mut data, ts(), payload).unwrap();
        assert_eq!(data.rc_channels[0].channels[8], Some(9));
        assert_eq!(data.rc_channels[0].channels[9], None);
    }

    #[test]
    fn test_serial_tcp_status_chatter_skipped() {
        let mut data = LogData::new();
        assert_eq!(
            serial_tcp(&mut data, ts(), "SERIAL_TCP_CON, Waiting for connection").unwrap(),
            Outcome::Skipped
        );
        serial_tcp(&mut data, ts(), "SERIAL_TCP_CON, 1024, 2048").unwrap();
        assert_eq!(data.serial_tcp_con[0].serial_recv_bytes, Some(1024));
    }

    #[test]
    fn test_nozzle_state_mapping() {
        let mut data = LogData::new();
        nozzle(&mut data, ts(), "NOZZLE, Stop triggered").unwrap();
        nozzle(&mut data, ts(), "NOZZLE, Start").unwrap();
        nozzle(&mut data, ts(), "NOZZLE, Whirring").unwrap();
        assert_eq!(data.nozzle[0].value, Some(0.5));
        assert_eq!(data.nozzle[1].value, Some(1.0));
        assert_eq!(data.nozzle[2].value, None);
        assert_eq!(data.nozzle[2].raw_value, "Whirring");
    }

    #[test]
    fn test_spray_info_full_row() {
        let mut data = LogData::new();
        let payload = "SPRAY_INFO,1,1500,1600,2.0,1.9,345,8.5,1.2,2.5,2.4,3,4";
        spray_info(&mut data, ts(), payload).unwrap();
        let rec = &data.spray_info[0];
        assert_eq!(rec.spray_status, Some(1));
        assert_eq!(rec.actual_dosage_l_acre, Some(2.4));
        assert_eq!(rec.next_wp, Some(4));
    }
}
