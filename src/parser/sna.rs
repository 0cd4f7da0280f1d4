//! Decoder for the pipe-delimited sense-and-avoid logging record
//!
//! Walks the positional schema in [`SNA_FIELDS`], converting each raw
//! field per its role and emitting one cell per output column. Short
//! records backfill missing trailing fields with nulls so every row is
//! column-aligned.

use anyhow::Result;
use chrono::NaiveDateTime;

use crate::coerce::{boolean_to_numeric, coerce, parse_delimited_list, Kind, Value};
use crate::parser::dispatch::Outcome;
use crate::types::sna::{FieldRole, SnaLogging, SNA_FIELDS, SNA_MIN_FIELDS};
use crate::types::store::{Cell, LogData};

/// Push role-appropriate null cells for one missing or NONE field
fn push_nulls(cells: &mut Vec<Cell>, role: FieldRole) {
    match role {
        FieldRole::Expand(n) => cells.extend(std::iter::repeat(Cell::Null).take(n)),
        FieldRole::Array => cells.push(Cell::List(Vec::new())),
        _ => cells.push(Cell::Null),
    }
}

fn decode_field(cells: &mut Vec<Cell>, role: FieldRole, raw: &str) {
    match role {
        FieldRole::Array => cells.push(Cell::from(parse_delimited_list(raw))),
        FieldRole::Expand(n) => {
            let values = parse_delimited_list(raw);
            for i in 0..n {
                match values.get(i) {
                    Some(v) => cells.push(Cell::from(v.clone())),
                    None => cells.push(Cell::Null),
                }
            }
        }
        FieldRole::BoolNumeric => cells.push(Cell::from(boolean_to_numeric(raw))),
        FieldRole::NumericText => match raw.parse::<f64>() {
            Ok(f) if f.fract() == 0.0 && f.is_finite() => cells.push(Cell::Int(f as i64)),
            Ok(f) => cells.push(Cell::Float(f)),
            Err(_) => cells.push(Cell::from(raw)),
        },
        FieldRole::Text => cells.push(Cell::from(raw)),
        FieldRole::Auto => cells.push(Cell::from(coerce(raw, Kind::Auto))),
    }
}

pub(crate) fn sna_logging(
    data: &mut LogData,
    timestamp: NaiveDateTime,
    payload: &str,
) -> Result<Outcome> {
    let body = match payload.strip_prefix("SnALogging,") {
        Some(body) => body.trim(),
        None => return Ok(Outcome::Skipped),
    };

    // Column-name header line repeated by the firmware
    if body.contains("flight_mode |") {
        return Ok(Outcome::Skipped);
    }

    let fields: Vec<&str> = body.split('|').map(str::trim).collect();
    if fields.len() < SNA_MIN_FIELDS {
        return Ok(Outcome::Skipped);
    }

    let mut cells = Vec::new();
    for (i, (_, role)) in SNA_FIELDS.iter().enumerate() {
        match fields.get(i) {
            Some(raw) if !raw.is_empty() && !raw.eq_ignore_ascii_case("none") => {
                decode_field(&mut cells, *role, raw);
            }
            _ => push_nulls(&mut cells, *role),
        }
    }

    data.sna_logging.push(SnaLogging { timestamp, cells });
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

    fn line(fields: &[&str]) -> String {
        format!("SnALogging,{}", fields.join(" | "))
    }

    #[test]
    fn test_short_record_dropped() {
        let mut data = LogData::new();
        let payload = line(&["GUIDED", "1", "2", "[]", "[]"]);
        assert_eq!(
            sna_logging(&mut data, ts(), &payload).unwrap(),
            Outcome::Skipped
        );
        assert!(data.sna_logging.is_empty());
    }

    #[test]
    fn test_header_line_dropped() {
        let mut data = LogData::new();
        let payload = "SnALogging, flight_mode | guided_mission_state | obstacle_x";
        assert_eq!(
            sna_logging(&mut data, ts(), payload).unwrap(),
            Outcome::Skipped
        );
    }

    #[test]
    fn test_typical_record() {
        let mut data = LogData::new();
        let payload = line(&[
            "GUIDED",
            "3",
            "1",
            "[1.5, 2.5]",
            "[0.5]",
            "[]",
            "[]",
            "[1, 0, 1]",
            "0.02",
            "-0.01",
            "91.4",
            "True",
        ]);
        sna_logging(&mut data, ts(), &payload).unwrap();
        let rec = &data.sna_logging[0];
        assert_eq!(rec.cell("flight_mode"), Some(&Cell::Str("GUIDED".into())));
        assert_eq!(rec.cell("guided_mission_state"), Some(&Cell::Int(3)));
        assert_eq!(
            rec.cell("obstacle_x"),
            Some(&Cell::List(vec![Value::Float(1.5), Value::Float(2.5)]))
        );
        // Expanded sector values, null-padded to six columns
        assert_eq!(rec.cell("obstacle_sector1"), Some(&Cell::Float(1.0)));
        assert_eq!(rec.cell("obstacle_sector3"), Some(&Cell::Float(1.0)));
        assert_eq!(rec.cell("obstacle_sector4"), Some(&Cell::Null));
        assert_eq!(rec.cell("roll"), Some(&Cell::Float(0.02)));
    }

    #[test]
    fn test_missing_trailing_fields_backfilled() {
        let mut data = LogData::new();
        let payload = line(&[
            "AUTO", "0", "0", "[]", "[]", "[]", "[]", "", "0.0", "0.0",
        ]);
        sna_logging(&mut data, ts(), &payload).unwrap();
        let rec = &data.sna_logging[0];
        // Empty sector field expands to six nulls
        for j in 1..=6 {
            assert_eq!(
                rec.cell(&format!("obstacle_sector{}", j)),
                Some(&Cell::Null)
            );
        }
        // Fields past the end of the record
        assert_eq!(rec.cell("loop_time"), Some(&Cell::Null));
        assert_eq!(rec.cell("obstacle_x_rot"), Some(&Cell::List(Vec::new())));
        assert_eq!(rec.cell("obstacle_buffer1"), Some(&Cell::Null));
        assert_eq!(rec.cell("obstacle_buffer2"), Some(&Cell::Null));
    }

    #[test]
    fn test_bool_and_numeric_text_roles() {
        let mut data = LogData::new();
        let mut fields = vec!["GUIDED"; 41];
        fields[1] = "NOT_A_NUMBER"; // guided_mission_state regressed to a name
        fields[27] = "True"; // heading_available
        fields[28] = "False"; // horizontal_movement
        let payload = line(&fields);
        sna_logging(&mut data, ts(), &payload).unwrap();
        let rec = &data.sna_logging[0];
        assert_eq!(
            rec.cell("guided_mission_state"),
            Some(&Cell::Str("NOT_A_NUMBER".into()))
        );
        assert_eq!(rec.cell("heading_available"), Some(&Cell::Int(1)));
        assert_eq!(rec.cell("horizontal_movement"), Some(&Cell::Int(0)));
    }
}
