//! Typed records, one fixed shape per category
//!
//! Fields that may be absent on the wire are `Option<T>`; a field that
//! fails its declared coercion is `None`, never a decode failure. Every
//! record carries its (offset-adjusted) timestamp, which is always the
//! first output column.

use chrono::NaiveDateTime;

use crate::types::store::{Cell, Tabular};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Mission telemetry: flight mode, arming/flying state, and kinematics
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MissionInfo {
    pub timestamp: NaiveDateTime,
    pub flight_mode: Option<String>,
    pub flight_mode_val: Option<i64>,
    pub armed: Option<String>,
    pub armed_val: Option<i64>,
    pub flying: Option<String>,
    pub flying_val: Option<i64>,
    pub height_m: Option<f64>,
    pub speed_ms: Option<f64>,
    pub climb_rate_ms: Option<f64>,
    pub heading_deg: Option<f64>,
    pub lat_deg: Option<f64>,
    pub lon_deg: Option<f64>,
}

impl Tabular for MissionInfo {
    fn columns() -> Vec<String> {
        named(&[
            "timestamp",
            "flight_mode",
            "flight_mode_val",
            "armed",
            "armed_val",
            "flying",
            "flying_val",
            "height_m",
            "speed_ms",
            "climb_rate_ms",
            "heading_deg",
            "lat_deg",
            "lon_deg",
        ])
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::from(self.timestamp),
            Cell::from(self.flight_mode.clone()),
            Cell::from(self.flight_mode_val),
            Cell::from(self.armed.clone()),
            Cell::from(self.armed_val),
            Cell::from(self.flying.clone()),
            Cell::from(self.flying_val),
            Cell::from(self.height_m),
            Cell::from(self.speed_ms),
            Cell::from(self.climb_rate_ms),
            Cell::from(self.heading_deg),
            Cell::from(self.lat_deg),
            Cell::from(self.lon_deg),
        ]
    }
}

/// Raw RC transmitter channel values, up to ten channels
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RcChannels {
    pub timestamp: NaiveDateTime,
    pub channels: [Option<i64>; 10],
}

impl Tabular for RcChannels {
    fn columns() -> Vec<String> {
        let mut cols = vec!["timestamp".to_string()];
        cols.extend((1..=10).map(|i| format!("rc{}", i)));
        cols
    }

    fn row(&self) -> Vec<Cell> {
        let mut row = vec![Cell::from(self.timestamp)];
        row.extend(self.channels.iter().map(|c| Cell::from(*c)));
        row
    }
}

/// Saved resume point: position, heading, waypoint index, spray flag
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResumePoint {
    pub timestamp: NaiveDateTime,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub height: Option<f64>,
    pub yaw: Option<f64>,
    pub wp: Option<i64>,
    pub spray: Option<i64>,
}

impl Tabular for ResumePoint {
    fn columns() -> Vec<String> {
        named(&["timestamp", "lat", "lon", "height", "yaw", "wp", "spray"])
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::from(self.timestamp),
            Cell::from(self.lat),
            Cell::from(self.lon),
            Cell::from(self.height),
            Cell::from(self.yaw),
            Cell::from(self.wp),
            Cell::from(self.spray),
        ]
    }
}

/// Serial/TCP bridge byte counters
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SerialTcpStats {
    pub timestamp: NaiveDateTime,
    pub serial_recv_bytes: Option<i64>,
    pub serial_send_bytes: Option<i64>,
}

impl Tabular for SerialTcpStats {
    fn columns() -> Vec<String> {
        named(&["timestamp", "serial_recv_bytes", "serial_send_bytes"])
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::from(self.timestamp),
            Cell::from(self.serial_recv_bytes),
            Cell::from(self.serial_send_bytes),
        ]
    }
}

/// Vehicle command / statustext message with classified type
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VehicleCommand {
    pub timestamp: NaiveDateTime,
    pub message_type: String,
    pub message: String,
}

impl Tabular for VehicleCommand {
    fn columns() -> Vec<String> {
        named(&["timestamp", "message_type", "message"])
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::from(self.timestamp),
            Cell::from(self.message_type.clone()),
            Cell::from(self.message.clone()),
        ]
    }
}

/// Scheduler task registration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SchedulerTask {
    pub timestamp: NaiveDateTime,
    pub task_name: String,
    pub parameter: String,
    pub task_id: Option<i64>,
}

impl Tabular for SchedulerTask {
    fn columns() -> Vec<String> {
        named(&["timestamp", "task_name", "parameter", "task_id"])
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::from(self.timestamp),
            Cell::from(self.task_name.clone()),
            Cell::from(self.parameter.clone()),
            Cell::from(self.task_id),
        ]
    }
}

/// Key/value parameter record.
///
/// The value is kept as the raw string, never boolean-coerced, so the
/// original text survives for audit. GET requests carry no value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Parameter {
    pub timestamp: NaiveDateTime,
    pub key: String,
    pub value: Option<String>,
}

impl Tabular for Parameter {
    fn columns() -> Vec<String> {
        named(&["timestamp", "key", "value"])
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::from(self.timestamp),
            Cell::from(self.key.clone()),
            Cell::from(self.value.clone()),
        ]
    }
}

/// MAVLink link health summary per message stream
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MavlinkInfo {
    pub timestamp: NaiveDateTime,
    pub name: String,
    pub messages_count: Option<i64>,
    pub last_message: String,
    pub status: Option<String>,
}

impl Tabular for MavlinkInfo {
    fn columns() -> Vec<String> {
        named(&["timestamp", "name", "messages_count", "last_message", "status"])
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::from(self.timestamp),
            Cell::from(self.name.clone()),
            Cell::from(self.messages_count),
            Cell::from(self.last_message.clone()),
            Cell::from(self.status.clone()),
        ]
    }
}

/// Estimated maximum speed announcement
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MaxSpeedEstimate {
    pub timestamp: NaiveDateTime,
    pub max_speed: f64,
}

impl Tabular for MaxSpeedEstimate {
    fn columns() -> Vec<String> {
        named(&["timestamp", "max_speed"])
    }

    fn row(&self) -> Vec<Cell> {
        vec![Cell::from(self.timestamp), Cell::from(self.max_speed)]
    }
}

/// Active MAVLink port announcement
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActivePort {
    pub timestamp: NaiveDateTime,
    pub active_port: i64,
}

impl Tabular for ActivePort {
    fn columns() -> Vec<String> {
        named(&["timestamp", "active_port"])
    }

    fn row(&self) -> Vec<Cell> {
        vec![Cell::from(self.timestamp), Cell::from(self.active_port)]
    }
}

/// Companion-computer resource usage.
///
/// Temperature is `None` both when the field is absent (older firmware)
/// and when it reads `N/A`; neither is a parse failure.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CpuStats {
    pub timestamp: NaiveDateTime,
    pub cpu_usage_percent: Option<f64>,
    pub ram_usage_mb: Option<i64>,
    pub load_avg_1min: Option<f64>,
    pub load_avg_5min: Option<f64>,
    pub load_avg_15min: Option<f64>,
    pub temp_celsius: Option<f64>,
}

impl Tabular for CpuStats {
    fn columns() -> Vec<String> {
        named(&[
            "timestamp",
            "cpu_usage_percent",
            "ram_usage_mb",
            "load_avg_1min",
            "load_avg_5min",
            "load_avg_15min",
            "temp_celsius",
        ])
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::from(self.timestamp),
            Cell::from(self.cpu_usage_percent),
            Cell::from(self.ram_usage_mb),
            Cell::from(self.load_avg_1min),
            Cell::from(self.load_avg_5min),
            Cell::from(self.load_avg_15min),
            Cell::from(self.temp_celsius),
        ]
    }
}

/// Software version announcement from one of the known components
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VersionInfo {
    pub timestamp: NaiveDateTime,
    pub component: String,
    pub version: String,
    pub component_type: String,
    pub raw_data: String,
}

impl Tabular for VersionInfo {
    fn columns() -> Vec<String> {
        named(&["timestamp", "component", "version", "component_type", "raw_data"])
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::from(self.timestamp),
            Cell::from(self.component.clone()),
            Cell::from(self.version.clone()),
            Cell::from(self.component_type.clone()),
            Cell::from(self.raw_data.clone()),
        ]
    }
}

/// Raw sense-and-avoid receiver sample
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SnaReceiving {
    pub timestamp: NaiveDateTime,
    pub data_val1: Option<f64>,
    pub data_val2: Option<f64>,
    pub data_val3: Option<f64>,
    pub data_val4: Option<f64>,
    pub data_val5: Option<f64>,
    pub data_val6: Option<f64>,
    pub data_val7: Option<f64>,
    pub data_val8: Option<i64>,
    pub data_val9: Option<i64>,
}

impl Tabular for SnaReceiving {
    fn columns() -> Vec<String> {
        let mut cols = vec!["timestamp".to_string()];
        cols.extend((1..=9).map(|i| format!("data_val{}", i)));
        cols
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::from(self.timestamp),
            Cell::from(self.data_val1),
            Cell::from(self.data_val2),
            Cell::from(self.data_val3),
            Cell::from(self.data_val4),
            Cell::from(self.data_val5),
            Cell::from(self.data_val6),
            Cell::from(self.data_val7),
            Cell::from(self.data_val8),
            Cell::from(self.data_val9),
        ]
    }
}

/// Classified sense-and-avoid informational message
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SnaInfo {
    pub timestamp: NaiveDateTime,
    pub category: String,
    pub message: String,
}

impl Tabular for SnaInfo {
    fn columns() -> Vec<String> {
        named(&["timestamp", "category", "message"])
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::from(self.timestamp),
            Cell::from(self.category.clone()),
            Cell::from(self.message.clone()),
        ]
    }
}

/// Guided-mission narration event with a symbolic state key.
///
/// Messages matching no known pattern keep an empty state key and the
/// raw text in `description`, so novel firmware messages are never lost.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GuidedEvent {
    pub timestamp: NaiveDateTime,
    pub message_type: String,
    pub state_key: String,
    pub description: String,
}

impl Tabular for GuidedEvent {
    fn columns() -> Vec<String> {
        named(&["timestamp", "message_type", "state_key", "description"])
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::from(self.timestamp),
            Cell::from(self.message_type.clone()),
            Cell::from(self.state_key.clone()),
            Cell::from(self.description.clone()),
        ]
    }
}

/// Resume-sequence narration event with a symbolic state key
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResumeEvent {
    pub timestamp: NaiveDateTime,
    pub message_type: String,
    pub state_key: String,
    pub description: String,
}

impl Tabular for ResumeEvent {
    fn columns() -> Vec<String> {
        named(&["timestamp", "message_type", "state_key", "description"])
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::from(self.timestamp),
            Cell::from(self.message_type.clone()),
            Cell::from(self.state_key.clone()),
            Cell::from(self.description.clone()),
        ]
    }
}

/// Thread-tagged parameter-store performance record
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParamPerf {
    pub timestamp: NaiveDateTime,
    pub thread_id: i64,
    pub param_name: Option<String>,
    pub value: Option<String>,
    pub state: Option<String>,
    pub time_taken_ms: Option<f64>,
}

impl Tabular for ParamPerf {
    fn columns() -> Vec<String> {
        named(&["timestamp", "thread_id", "param_name", "value", "state", "time_taken_ms"])
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::from(self.timestamp),
            Cell::from(self.thread_id),
            Cell::from(self.param_name.clone()),
            Cell::from(self.value.clone()),
            Cell::from(self.state.clone()),
            Cell::from(self.time_taken_ms),
        ]
    }
}

/// Thread-tagged parameter database write record
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParamDbPerf {
    pub timestamp: NaiveDateTime,
    pub thread_id: i64,
    pub state: Option<String>,
    pub description: String,
}

impl Tabular for ParamDbPerf {
    fn columns() -> Vec<String> {
        named(&["timestamp", "thread_id", "state", "description"])
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::from(self.timestamp),
            Cell::from(self.thread_id),
            Cell::from(self.state.clone()),
            Cell::from(self.description.clone()),
        ]
    }
}

/// Mission state machine transition
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MissionStateChanged {
    pub timestamp: NaiveDateTime,
    pub value: Option<i64>,
}

impl Tabular for MissionStateChanged {
    fn columns() -> Vec<String> {
        named(&["timestamp", "value"])
    }

    fn row(&self) -> Vec<Cell> {
        vec![Cell::from(self.timestamp), Cell::from(self.value)]
    }
}

/// Spray system telemetry
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SprayInfo {
    pub timestamp: NaiveDateTime,
    pub spray_status: Option<i64>,
    pub pump_pwm: Option<i64>,
    pub nozzle_pwm: Option<i64>,
    pub req_flowrate_lpm: Option<f64>,
    pub actual_flowrate_lpm: Option<f64>,
    pub flowmeter_pulse: Option<i64>,
    pub payload_rem_l: Option<f64>,
    pub area_sprayed_acre: Option<f64>,
    pub req_dosage_l_acre: Option<f64>,
    pub actual_dosage_l_acre: Option<f64>,
    pub prv_wp: Option<i64>,
    pub next_wp: Option<i64>,
}

impl Tabular for SprayInfo {
    fn columns() -> Vec<String> {
        named(&[
            "timestamp",
            "spray_status",
            "pump_pwm",
            "nozzle_pwm",
            "req_flowrate_lpm",
            "actual_flowrate_lpm",
            "flowmeter_pulse",
            "payload_rem_l",
            "area_sprayed_acre",
            "req_dosage_l_acre",
            "actual_dosage_l_acre",
            "prv_wp",
            "next_wp",
        ])
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::from(self.timestamp),
            Cell::from(self.spray_status),
            Cell::from(self.pump_pwm),
            Cell::from(self.nozzle_pwm),
            Cell::from(self.req_flowrate_lpm),
            Cell::from(self.actual_flowrate_lpm),
            Cell::from(self.flowmeter_pulse),
            Cell::from(self.payload_rem_l),
            Cell::from(self.area_sprayed_acre),
            Cell::from(self.req_dosage_l_acre),
            Cell::from(self.actual_dosage_l_acre),
            Cell::from(self.prv_wp),
            Cell::from(self.next_wp),
        ]
    }
}

/// Flowmeter reading
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FlowmeterReading {
    pub timestamp: NaiveDateTime,
    pub flowrate_lpm: Option<f64>,
    pub signal_count: Option<i64>,
}

impl Tabular for FlowmeterReading {
    fn columns() -> Vec<String> {
        named(&["timestamp", "flowrate_lpm", "signal_count"])
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::from(self.timestamp),
            Cell::from(self.flowrate_lpm),
            Cell::from(self.signal_count),
        ]
    }
}

/// Free-text flow-sensor status
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FlowmeterInfo {
    pub timestamp: NaiveDateTime,
    pub flow_sensor_info: String,
}

impl Tabular for FlowmeterInfo {
    fn columns() -> Vec<String> {
        named(&["timestamp", "flow_sensor_info"])
    }

    fn row(&self) -> Vec<Cell> {
        vec![Cell::from(self.timestamp), Cell::from(self.flow_sensor_info.clone())]
    }
}

/// Free-text pump status
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PumpInfo {
    pub timestamp: NaiveDateTime,
    pub pump_info: String,
}

impl Tabular for PumpInfo {
    fn columns() -> Vec<String> {
        named(&["timestamp", "pump_info"])
    }

    fn row(&self) -> Vec<Cell> {
        vec![Cell::from(self.timestamp), Cell::from(self.pump_info.clone())]
    }
}

/// Nozzle state with a numeric mapping (Stopped 0, Stop triggered 0.5,
/// Start 1); unknown states keep only the raw text
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NozzleState {
    pub timestamp: NaiveDateTime,
    pub value: Option<f64>,
    pub raw_value: String,
}

impl Tabular for NozzleState {
    fn columns() -> Vec<String> {
        named(&["timestamp", "value", "raw_value"])
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::from(self.timestamp),
            Cell::from(self.value),
            Cell::from(self.raw_value.clone()),
        ]
    }
}

/// Field-boundary intrusion message
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundaryIntrusion {
    pub timestamp: NaiveDateTime,
    pub message: String,
}

impl Tabular for BoundaryIntrusion {
    fn columns() -> Vec<String> {
        named(&["timestamp", "message"])
    }

    fn row(&self) -> Vec<Cell> {
        vec![Cell::from(self.timestamp), Cell::from(self.message.clone())]
    }
}

/// Catch-all record for payloads matching no category rule
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OtherRecord {
    pub timestamp: NaiveDateTime,
    pub log_content: String,
}

impl Tabular for OtherRecord {
    fn columns() -> Vec<String> {
        named(&["timestamp", "log_content"])
    }

    fn row(&self) -> Vec<Cell> {
        vec![Cell::from(self.timestamp), Cell::from(self.log_content.clone())]
    }
}

fn named(cols: &[&str]) -> Vec<String> {
    cols.iter().map(|c| c.to_string()).collect()
}
