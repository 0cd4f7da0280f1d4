//! Per-decode record store and tabular finalization
//!
//! One [`LogData`] is created per decode call, populated monotonically in
//! log-line order, and owned exclusively by the caller afterward.
//! [`LogData::tables`] turns it into column-ordered tables (timestamp
//! first, empty categories omitted) for the presentation layer.

use std::fmt;

use chrono::NaiveDateTime;

use crate::coerce::Value;
use crate::types::category::Category;
use crate::types::records::*;
use crate::types::sna::SnaLogging;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One presentation-layer cell of a finalized table
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Cell {
    Null,
    Time(NaiveDateTime),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
}

impl From<NaiveDateTime> for Cell {
    fn from(t: NaiveDateTime) -> Self {
        Cell::Time(t)
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Int(i)
    }
}

impl From<f64> for Cell {
    fn from(f: f64) -> Self {
        Cell::Float(f)
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Str(s)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Str(s.to_string())
    }
}

impl From<Vec<Value>> for Cell {
    fn from(list: Vec<Value>) -> Self {
        Cell::List(list)
    }
}

impl From<Value> for Cell {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => Cell::Null,
            Value::Int(i) => Cell::Int(i),
            Value::Float(f) => Cell::Float(f),
            Value::Str(s) => Cell::Str(s),
        }
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Cell::Null,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Time(t) => write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S%.3f")),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Str(s) => write!(f, "{}", s),
            Cell::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Column/row view of one record type
pub trait Tabular {
    /// Output column names, `timestamp` first
    fn columns() -> Vec<String>;
    /// One output row, aligned to [`Tabular::columns`]
    fn row(&self) -> Vec<Cell>;
}

/// One entry of the chronological error stream.
///
/// The first two entries are synthetic header/separator rows with no
/// timestamp; they are not real log events.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ErrorEntry {
    pub timestamp: Option<NaiveDateTime>,
    pub log_content: String,
}

impl Tabular for ErrorEntry {
    fn columns() -> Vec<String> {
        vec!["timestamp".to_string(), "log_content".to_string()]
    }

    fn row(&self) -> Vec<Cell> {
        vec![Cell::from(self.timestamp), Cell::from(self.log_content.clone())]
    }
}

/// A finalized per-category table
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Table {
    pub category: Category,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub const ERROR_STREAM_HEADER: &str =
    "::  This is a list of ERROR/FAILURE items extracted from logs  ::";
pub const ERROR_STREAM_SEPARATOR: &str =
    "---------------------------------------------------------------------------------";

/// All records decoded from one pass over a log, one ordered sequence per
/// category
#[derive(Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LogData {
    pub mission_info: Vec<MissionInfo>,
    pub mission_state_changed: Vec<MissionStateChanged>,
    pub rc_channels: Vec<RcChannels>,
    pub serial_tcp_con: Vec<SerialTcpStats>,
    pub cc_parameter: Vec<Parameter>,
    pub cc_parameter_shelve: Vec<Parameter>,
    pub cc_parameter_tiny: Vec<Parameter>,
    pub ap_parameter: Vec<Parameter>,
    pub ap_parameter_tiny: Vec<Parameter>,
    pub mavlink_info: Vec<MavlinkInfo>,
    pub ga_set_param: Vec<Parameter>,
    pub ga_get_param: Vec<Parameter>,
    pub ga_param: Vec<Parameter>,
    pub max_speed_esti: Vec<MaxSpeedEstimate>,
    pub mavlink_active_port: Vec<ActivePort>,
    pub cpu: Vec<CpuStats>,
    pub version: Vec<VersionInfo>,
    pub boundary_intr: Vec<BoundaryIntrusion>,
    pub vehicle_command: Vec<VehicleCommand>,
    pub guided_mission: Vec<GuidedEvent>,
    pub resume_mission: Vec<ResumeEvent>,
    pub resume_state: Vec<ResumePoint>,
    pub cc_parameter_perf: Vec<ParamPerf>,
    pub cc_parameter_db_perf: Vec<ParamDbPerf>,
    pub sna_receiving_data: Vec<SnaReceiving>,
    pub sna_logging: Vec<SnaLogging>,
    pub sna_info: Vec<SnaInfo>,
    pub spray_info: Vec<SprayInfo>,
    pub scheduler_task: Vec<SchedulerTask>,
    pub flowmeter: Vec<FlowmeterReading>,
    pub flowmeter_info: Vec<FlowmeterInfo>,
    pub pump: Vec<PumpInfo>,
    pub nozzle: Vec<NozzleState>,
    pub errors: Vec<ErrorEntry>,
    pub other: Vec<OtherRecord>,
}

impl LogData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry to the error stream, inserting the synthetic
    /// header and separator rows on first insertion
    pub fn push_error(&mut self, timestamp: Option<NaiveDateTime>, log_content: String) {
        if self.errors.is_empty() {
            self.errors.push(ErrorEntry {
                timestamp: None,
                log_content: ERROR_STREAM_HEADER.to_string(),
            });
            self.errors.push(ErrorEntry {
                timestamp: None,
                log_content: ERROR_STREAM_SEPARATOR.to_string(),
            });
        }
        self.errors.push(ErrorEntry {
            timestamp,
            log_content,
        });
    }

    /// Record count per category, empty categories omitted, in output
    /// order
    pub fn summary(&self) -> Vec<(Category, usize)> {
        self.counts()
            .into_iter()
            .filter(|(_, n)| *n > 0)
            .collect()
    }

    /// Total number of records across all categories
    pub fn total_records(&self) -> usize {
        self.counts().iter().map(|(_, n)| n).sum()
    }

    fn counts(&self) -> Vec<(Category, usize)> {
        Category::ALL
            .iter()
            .map(|cat| {
                let n = match cat {
                    Category::MissionInfo => self.mission_info.len(),
                    Category::MissionStateChanged => self.mission_state_changed.len(),
                    Category::RcChannels => self.rc_channels.len(),
                    Category::SerialTcpCon => self.serial_tcp_con.len(),
                    Category::CcParameter => self.cc_parameter.len(),
                    Category::CcParameterShelve => self.cc_parameter_shelve.len(),
                    Category::CcParameterTiny => self.cc_parameter_tiny.len(),
                    Category::ApParameter => self.ap_parameter.len(),
                    Category::ApParameterTiny => self.ap_parameter_tiny.len(),
                    Category::MavlinkInfo => self.mavlink_info.len(),
                    Category::GaSetParam => self.ga_set_param.len(),
                    Category::GaGetParam => self.ga_get_param.len(),
                    Category::GaParam => self.ga_param.len(),
                    Category::MaxSpeedEsti => self.max_speed_esti.len(),
                    Category::MavlinkActivePort => self.mavlink_active_port.len(),
                    Category::Cpu => self.cpu.len(),
                    Category::Version => self.version.len(),
                    Category::BoundaryIntr => self.boundary_intr.len(),
                    Category::VehicleCommand => self.vehicle_command.len(),
                    Category::GuidedMission => self.guided_mission.len(),
                    Category::ResumeMission => self.resume_mission.len(),
                    Category::ResumeState => self.resume_state.len(),
                    Category::CcParameterPerf => self.cc_parameter_perf.len(),
                    Category::CcParameterDbPerf => self.cc_parameter_db_perf.len(),
                    Category::SnaReceivingData => self.sna_receiving_data.len(),
                    Category::SnaLogging => self.sna_logging.len(),
                    Category::SnaInfo => self.sna_info.len(),
                    Category::SprayInfo => self.spray_info.len(),
                    Category::SchedulerTask => self.scheduler_task.len(),
                    Category::Flowmeter => self.flowmeter.len(),
                    Category::FlowmeterInfo => self.flowmeter_info.len(),
                    Category::Pump => self.pump.len(),
                    Category::Nozzle => self.nozzle.len(),
                    Category::Error => self.errors.len(),
                    Category::Other => self.other.len(),
                };
                (*cat, n)
            })
            .collect()
    }

    /// Finalize into column-ordered tables, skipping empty categories
    pub fn tables(&self) -> Vec<Table> {
        let mut tables = Vec::new();
        push_table(&mut tables, Category::MissionInfo, &self.mission_info);
        push_table(
            &mut tables,
            Category::MissionStateChanged,
            &self.mission_state_changed,
        );
        push_table(&mut tables, Category::RcChannels, &self.rc_channels);
        push_table(&mut tables, Category::SerialTcpCon, &self.serial_tcp_con);
        push_table(&mut tables, Category::CcParameter, &self.cc_parameter);
        push_table(
            &mut tables,
            Category::CcParameterShelve,
            &self.cc_parameter_shelve,
        );
        push_table(
            &mut tables,
            Category::CcParameterTiny,
            &self.cc_parameter_tiny,
        );
        push_table(&mut tables, Category::ApParameter, &self.ap_parameter);
        push_table(
            &mut tables,
            Category::ApParameterTiny,
            &self.ap_parameter_tiny,
        );
        push_table(&mut tables, Category::MavlinkInfo, &self.mavlink_info);
        push_table(&mut tables, Category::GaSetParam, &self.ga_set_param);
        push_table(&mut tables, Category::GaGetParam, &self.ga_get_param);
        push_table(&mut tables, Category::GaParam, &self.ga_param);
        push_table(&mut tables, Category::MaxSpeedEsti, &self.max_speed_esti);
        push_table(
            &mut tables,
            Category::MavlinkActivePort,
            &self.mavlink_active_port,
        );
        push_table(&mut tables, Category::Cpu, &self.cpu);
        push_table(&mut tables, Category::Version, &self.version);
        push_table(&mut tables, Category::BoundaryIntr, &self.boundary_intr);
        push_table(&mut tables, Category::VehicleCommand, &self.vehicle_command);
        push_table(&mut tables, Category::GuidedMission, &self.guided_mission);
        push_table(&mut tables, Category::ResumeMission, &self.resume_mission);
        push_table(&mut tables, Category::ResumeState, &self.resume_state);
        push_table(
            &mut tables,
            Category::CcParameterPerf,
            &self.cc_parameter_perf,
        );
        push_table(
            &mut tables,
            Category::CcParameterDbPerf,
            &self.cc_parameter_db_perf,
        );
        push_table(
            &mut tables,
            Category::SnaReceivingData,
            &self.sna_receiving_data,
        );
        push_table(&mut tables, Category::SnaLogging, &self.sna_logging);
        push_table(&mut tables, Category::SnaInfo, &self.sna_info);
        push_table(&mut tables, Category::SprayInfo, &self.spray_info);
        push_table(&mut tables, Category::SchedulerTask, &self.scheduler_task);
        push_table(&mut tables, Category::Flowmeter, &self.flowmeter);
        push_table(&mut tables, Category::FlowmeterInfo, &self.flowmeter_info);
        push_table(&mut tables, Category::Pump, &self.pump);
        push_table(&mut tables, Category::Nozzle, &self.nozzle);
        push_table(&mut tables, Category::Error, &self.errors);
        push_table(&mut tables, Category::Other, &self.other);
        tables
    }
}

fn push_table<T: Tabular>(tables: &mut Vec<Table>, category: Category, records: &[T]) {
    if records.is_empty() {
        return;
    }
    tables.push(Table {
        category,
        columns: T::columns(),
        rows: records.iter().map(Tabular::row).collect(),
    });
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
    fn test_error_stream_header_inserted_once() {
        let mut data = LogData::new();
        data.push_error(Some(ts()), "first".to_string());
        data.push_error(Some(ts()), "second".to_string());
        assert_eq!(data.errors.len(), 4);
        assert!(data.errors[0].log_content.contains("ERROR/FAILURE"));
        assert!(data.errors[0].timestamp.is_none());
        assert!(data.errors[1].timestamp.is_none());
        assert_eq!(data.errors[2].log_content, "first");
        assert_eq!(data.errors[3].log_content, "second");
    }

    #[test]
    fn test_empty_categories_omitted_from_tables() {
        let mut data = LogData::new();
        data.other.push(OtherRecord {
            timestamp: ts(),
            log_content: "FOO".to_string(),
        });
        let tables = data.tables();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].category, Category::Other);
        assert_eq!(tables[0].columns[0], "timestamp");
    }

    #[test]
    fn test_rows_align_to_columns() {
        let mut data = LogData::new();
        data.mission_info.push(MissionInfo {
            timestamp: ts(),
            flight_mode: Some("GUIDED".to_string()),
            flight_mode_val: Some(4),
            armed: None,
            armed_val: None,
            flying: None,
            flying_val: None,
            height_m: Some(12.5),
            speed_ms: None,
            climb_rate_ms: None,
            heading_deg: None,
            lat_deg: None,
            lon_deg: None,
        });
        let tables = data.tables();
        assert_eq!(tables[0].columns.len(), tables[0].rows[0].len());
    }
}
