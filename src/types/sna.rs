//! Fixed schema for the pipe-delimited sense-and-avoid logging record
//!
//! The record carries ~40 positional fields separated by `|`. Every field
//! is assigned an explicit role controlling how its raw text becomes one
//! or more output columns. Missing trailing fields backfill with nulls or
//! empty lists rather than failing the record.

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;

use crate::types::store::{Cell, Tabular};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How one pipe-delimited field is decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    /// Inferred numeric/string scalar
    Auto,
    /// Kept as a string (flight mode name)
    Text,
    /// Numeric-but-textual: enumerated states that normally carry a
    /// number but may regress to a symbolic name across firmware
    NumericText,
    /// Parsed as a list and stored as one array-valued column
    Array,
    /// Parsed as a list and exploded into N individually named scalar
    /// columns, null-padded when fewer values are present
    Expand(usize),
    /// True/False converted to 1/0, anything else null
    BoolNumeric,
}

/// Positional field table for the sense-and-avoid record.
///
/// Order is the wire order; names are the output column stems.
pub const SNA_FIELDS: &[(&str, FieldRole)] = &[
    ("flight_mode", FieldRole::Text),
    ("guided_mission_state", FieldRole::NumericText),
    ("guided_controller_type", FieldRole::NumericText),
    ("obstacle_x", FieldRole::Array),
    ("obstacle_y", FieldRole::Array),
    ("obstacle_x_rot", FieldRole::Array),
    ("obstacle_y_rot", FieldRole::Array),
    ("obstacle_sector", FieldRole::Expand(6)),
    ("roll", FieldRole::Auto),
    ("pitch", FieldRole::Auto),
    ("yaw", FieldRole::Auto),
    ("px", FieldRole::Auto),
    ("py", FieldRole::Auto),
    ("pz", FieldRole::Auto),
    ("vx", FieldRole::Auto),
    ("vy", FieldRole::Auto),
    ("speed", FieldRole::Auto),
    ("speed_rate", FieldRole::Auto),
    ("terrain_alt", FieldRole::Auto),
    ("mission_height", FieldRole::Auto),
    ("target_altitude", FieldRole::Auto),
    ("clearance_altitude", FieldRole::Auto),
    ("course_over_ground", FieldRole::Auto),
    ("course_over_ground_wVelocity", FieldRole::Auto),
    ("COG_heading_angle_diff", FieldRole::Auto),
    ("stopping_distance", FieldRole::Auto),
    ("critical_stopping_distance", FieldRole::Auto),
    ("heading_available", FieldRole::BoolNumeric),
    ("horizontal_movement", FieldRole::BoolNumeric),
    ("ignore_radar_data_near_waypoint", FieldRole::BoolNumeric),
    ("ignoring_radar_data_near_waypoint", FieldRole::BoolNumeric),
    ("ignore_radar_data_till", FieldRole::Auto),
    ("braked_in_sna", FieldRole::BoolNumeric),
    ("avoidance_state", FieldRole::NumericText),
    ("edge_avoidance_state", FieldRole::NumericText),
    ("false_trigger_restart_state", FieldRole::NumericText),
    ("obstacle_msg_delay_ms", FieldRole::Auto),
    ("radar_delay", FieldRole::Auto),
    ("grid_update_loop_time", FieldRole::Auto),
    ("loop_time", FieldRole::Auto),
    ("obstacle_buffer", FieldRole::Expand(2)),
];

/// Minimum pipe-field count for a line to be accepted
pub const SNA_MIN_FIELDS: usize = 10;

/// Output columns with expanded fields flattened, `timestamp` first
pub static SNA_COLUMNS: Lazy<Vec<String>> = Lazy::new(|| {
    let mut cols = vec!["timestamp".to_string()];
    for (name, role) in SNA_FIELDS {
        match role {
            FieldRole::Expand(n) => {
                for j in 1..=*n {
                    cols.push(format!("{}{}", name, j));
                }
            }
            _ => cols.push(name.to_string()),
        }
    }
    cols
});

/// One decoded sense-and-avoid logging record.
///
/// `cells` is aligned to [`SNA_COLUMNS`] minus the timestamp column.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SnaLogging {
    pub timestamp: NaiveDateTime,
    pub cells: Vec<Cell>,
}

impl SnaLogging {
    /// Look up one output column by name
    pub fn cell(&self, column: &str) -> Option<&Cell> {
        SNA_COLUMNS
            .iter()
            .position(|c| c == column)
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| self.cells.get(i))
    }
}

impl Tabular for SnaLogging {
    fn columns() -> Vec<String> {
        SNA_COLUMNS.clone()
    }

    fn row(&self) -> Vec<Cell> {
        let mut row = Vec::with_capacity(1 + self.cells.len());
        row.push(Cell::from(self.timestamp));
        row.extend(self.cells.iter().cloned());
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_expansion() {
        assert_eq!(SNA_COLUMNS[0], "timestamp");
        assert!(SNA_COLUMNS.iter().any(|c| c == "obstacle_sector3"));
        assert!(SNA_COLUMNS.iter().any(|c| c == "obstacle_buffer2"));
        assert!(!SNA_COLUMNS.iter().any(|c| c == "obstacle_sector"));
        // 41 wire fields, two of them expanded into 6 + 2 columns
        assert_eq!(SNA_COLUMNS.len(), 1 + SNA_FIELDS.len() - 2 + 6 + 2);
    }
}
