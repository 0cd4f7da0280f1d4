#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The closed set of log-message categories the decoder recognizes.
///
/// Declaration order is the output order of the finalized tables. New
/// wire formats must classify into one of these or fall through to
/// [`Category::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Category {
    MissionInfo,
    MissionStateChanged,
    RcChannels,
    SerialTcpCon,
    CcParameter,
    CcParameterShelve,
    CcParameterTiny,
    ApParameter,
    ApParameterTiny,
    MavlinkInfo,
    GaSetParam,
    GaGetParam,
    GaParam,
    MaxSpeedEsti,
    MavlinkActivePort,
    Cpu,
    Version,
    BoundaryIntr,
    VehicleCommand,
    GuidedMission,
    ResumeMission,
    ResumeState,
    CcParameterPerf,
    CcParameterDbPerf,
    SnaReceivingData,
    SnaLogging,
    SnaInfo,
    SprayInfo,
    SchedulerTask,
    Flowmeter,
    FlowmeterInfo,
    Pump,
    Nozzle,
    Error,
    Other,
}

impl Category {
    /// All categories in output order
    pub const ALL: [Category; 35] = [
        Category::MissionInfo,
        Category::MissionStateChanged,
        Category::RcChannels,
        Category::SerialTcpCon,
        Category::CcParameter,
        Category::CcParameterShelve,
        Category::CcParameterTiny,
        Category::ApParameter,
        Category::ApParameterTiny,
        Category::MavlinkInfo,
        Category::GaSetParam,
        Category::GaGetParam,
        Category::GaParam,
        Category::MaxSpeedEsti,
        Category::MavlinkActivePort,
        Category::Cpu,
        Category::Version,
        Category::BoundaryIntr,
        Category::VehicleCommand,
        Category::GuidedMission,
        Category::ResumeMission,
        Category::ResumeState,
        Category::CcParameterPerf,
        Category::CcParameterDbPerf,
        Category::SnaReceivingData,
        Category::SnaLogging,
        Category::SnaInfo,
        Category::SprayInfo,
        Category::SchedulerTask,
        Category::Flowmeter,
        Category::FlowmeterInfo,
        Category::Pump,
        Category::Nozzle,
        Category::Error,
        Category::Other,
    ];

    /// The category's wire/output tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::MissionInfo => "MISSION_INFO",
            Category::MissionStateChanged => "MISSION_STATE_CHANGED",
            Category::RcChannels => "RC_CHANNELS",
            Category::SerialTcpCon => "SERIAL_TCP_CON",
            Category::CcParameter => "CC_PARAMETER",
            Category::CcParameterShelve => "CC_PARAMETER_SHELVE",
            Category::CcParameterTiny => "CC_PARAMETER_TINY",
            Category::ApParameter => "AP_PARAMETER",
            Category::ApParameterTiny => "AP_PARAMETER_TINY",
            Category::MavlinkInfo => "MAVLINK_INFO",
            Category::GaSetParam => "GA_SET_PARAM",
            Category::GaGetParam => "GA_GET_PARAM",
            Category::GaParam => "GA_PARAM",
            Category::MaxSpeedEsti => "MAX_SPEED_ESTI",
            Category::MavlinkActivePort => "MAVLINK_ACTIVE_PORT",
            Category::Cpu => "CPU",
            Category::Version => "VERSION",
            Category::BoundaryIntr => "BOUNDARY_INTR",
            Category::VehicleCommand => "VEHICLE_COMMAND",
            Category::GuidedMission => "GUIDED_MISSION",
            Category::ResumeMission => "RESUME_MISSION",
            Category::ResumeState => "RESUME_STATE",
            Category::CcParameterPerf => "CC_PARAMETER_PERF",
            Category::CcParameterDbPerf => "CC_PARAMETER_DB_PERF",
            Category::SnaReceivingData => "SnA_RECEIVING_DATA",
            Category::SnaLogging => "SnA_LOGGING",
            Category::SnaInfo => "SnA_INFO",
            Category::SprayInfo => "SPRAY_INFO",
            Category::SchedulerTask => "SCHEDULERTASK",
            Category::Flowmeter => "FLOWMETER",
            Category::FlowmeterInfo => "FLOWMETER_INFO",
            Category::Pump => "PUMP",
            Category::Nozzle => "NOZZLE",
            Category::Error => "ERROR",
            Category::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
