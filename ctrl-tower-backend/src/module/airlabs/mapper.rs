///! Schedule mapper
///!
///! Second stage of payload handling: turns decoded `RawSchedule` records into
///! `Flight`s. Records without a designator, destination code or parsable
///! scheduled time are dropped and counted. No I/O and no timezone conversion
///! happens here.

use ctrl_tower_common::time::parse_utc_time;
use ctrl_tower_common::{Flight, FlightStatus};

use super::schema::{parse_schedules, RawSchedule};
use crate::error::TowerError;

/// Result of mapping one `/schedules` response
#[derive(Debug, Default)]
pub struct MappedSchedules {
    /// Valid flights in upstream order
    pub flights: Vec<Flight>,
    /// Records dropped for missing or malformed critical fields
    pub rejected: usize,
}

/// Validate a raw `/schedules` body and map it to flights.
///
/// Fails only when the envelope itself is wrong; bad records are filtered.
pub fn validate_and_map(body: &[u8]) -> Result<MappedSchedules, TowerError> {
    let batch = parse_schedules(body)?;

    let mut mapped = MappedSchedules {
        flights: Vec::with_capacity(batch.records.len()),
        rejected: batch.malformed,
    };

    for raw in &batch.records {
        match map_schedule(raw) {
            Some(flight) => mapped.flights.push(flight),
            None => mapped.rejected += 1,
        }
    }

    if mapped.rejected > 0 {
        tracing::info!(
            "Mapped {} flights, dropped {} incomplete schedule records",
            mapped.flights.len(),
            mapped.rejected
        );
    }

    Ok(mapped)
}

/// Map one schedule record. Returns `None` when a critical field is missing.
pub fn map_schedule(raw: &RawSchedule) -> Option<Flight> {
    let Some(flight_number) = raw.flight_iata.as_deref() else {
        tracing::debug!("Dropping schedule without flight_iata: {:?}", raw.flight_icao);
        return None;
    };
    let Some(destination_code) = raw.arr_iata.as_deref() else {
        tracing::debug!("Dropping {}: no arr_iata", flight_number);
        return None;
    };
    let Some(scheduled_time) = raw.scheduled_departure().and_then(parse_utc_time) else {
        tracing::debug!(
            "Dropping {}: missing or unparsable dep_time {:?}",
            flight_number,
            raw.scheduled_departure()
        );
        return None;
    };

    // Equal estimates carry no information
    let estimated_time = raw
        .estimated_departure()
        .and_then(parse_utc_time)
        .filter(|estimate| *estimate != scheduled_time);

    let id_stamp = match raw.dep_time_ts {
        Some(ts) => ts,
        None => {
            tracing::debug!(
                "{} has no dep_time_ts, deriving id from scheduled time",
                flight_number
            );
            scheduled_time.timestamp()
        }
    };

    let status = raw.status.as_deref().and_then(|s| match s.parse::<FlightStatus>() {
        Ok(status) => Some(status),
        Err(_) => {
            tracing::debug!("{} has unrecognised status '{}'", flight_number, s);
            None
        }
    });

    Some(Flight {
        id: format!("{}-{}", flight_number, id_stamp),
        flight_number: flight_number.to_string(),
        airline: raw
            .airline_iata
            .clone()
            .unwrap_or_else(|| "Unknown".to_string()),
        destination: destination_code.to_string(),
        destination_code: destination_code.to_string(),
        scheduled_time,
        estimated_time,
        gate: raw.dep_gate.clone(),
        terminal: raw.dep_terminal.clone(),
        status,
        delay_minutes: delay_minutes(raw.dep_delayed),
    })
}

/// Positive minutes only; zero, negative and missing delays all mean "no delay"
fn delay_minutes(raw: Option<i64>) -> Option<u32> {
    raw.filter(|minutes| *minutes > 0)
        .and_then(|minutes| u32::try_from(minutes).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn complete_record() -> serde_json::Value {
        json!({
            "airline_iata": "UA",
            "flight_iata": "UA1234",
            "flight_icao": "UAL1234",
            "dep_iata": "SFO",
            "dep_terminal": "3",
            "dep_gate": "F12",
            "dep_time": "2024-01-04 19:30",
            "dep_time_ts": 1704396600,
            "dep_estimated": "2024-01-04 19:45",
            "dep_delayed": 15,
            "arr_iata": "JFK",
            "status": "scheduled"
        })
    }

    fn body(records: Vec<serde_json::Value>) -> Vec<u8> {
        serde_json::to_vec(&json!({ "response": records })).unwrap()
    }

    #[test]
    fn test_complete_record() {
        let mapped = validate_and_map(&body(vec![complete_record()])).unwrap();
        assert_eq!(mapped.rejected, 0);
        assert_eq!(mapped.flights.len(), 1);

        let flight = &mapped.flights[0];
        assert_eq!(flight.id, "UA1234-1704396600");
        assert_eq!(flight.flight_number, "UA1234");
        assert_eq!(flight.airline, "UA");
        assert_eq!(flight.destination_code, "JFK");
        assert_eq!(flight.destination, "JFK");
        assert_eq!(flight.scheduled_time, Utc.with_ymd_and_hms(2024, 1, 4, 19, 30, 0).unwrap());
        assert_eq!(
            flight.estimated_time,
            Some(Utc.with_ymd_and_hms(2024, 1, 4, 19, 45, 0).unwrap())
        );
        assert_eq!(flight.gate.as_deref(), Some("F12"));
        assert_eq!(flight.terminal.as_deref(), Some("3"));
        assert_eq!(flight.status, Some(FlightStatus::Scheduled));
        assert_eq!(flight.delay_minutes, Some(15));
    }

    #[test]
    fn test_each_missing_critical_field_rejects_exactly_one() {
        for field in ["flight_iata", "arr_iata", "dep_time"] {
            let mut missing = complete_record();
            missing.as_object_mut().unwrap().remove(field);
            let mut nulled = complete_record();
            nulled[field] = serde_json::Value::Null;

            let mapped =
                validate_and_map(&body(vec![complete_record(), missing, nulled])).unwrap();
            assert_eq!(mapped.flights.len(), 1, "field {}", field);
            assert_eq!(mapped.rejected, 2, "field {}", field);
        }
    }

    #[test]
    fn test_garbage_records_never_fail_the_batch() {
        let mut bad_time = complete_record();
        bad_time["dep_time"] = json!("soon");
        let mut numeric_designator = complete_record();
        numeric_designator["flight_iata"] = json!(1234);

        let mapped = validate_and_map(&body(vec![
            json!("string record"),
            json!(null),
            json!({}),
            bad_time,
            numeric_designator,
            complete_record(),
        ]))
        .unwrap();

        assert_eq!(mapped.flights.len(), 1);
        assert_eq!(mapped.rejected, 5);
    }

    #[test]
    fn test_optional_fields_default() {
        let record = json!({
            "flight_iata": "XX1",
            "arr_iata": "LAX",
            "dep_time": "2024-01-04 19:30"
        });
        let mapped = validate_and_map(&body(vec![record])).unwrap();
        let flight = &mapped.flights[0];

        assert_eq!(flight.airline, "Unknown");
        assert_eq!(flight.gate, None);
        assert_eq!(flight.terminal, None);
        assert_eq!(flight.estimated_time, None);
        assert_eq!(flight.delay_minutes, None);
        // unknown stays unknown in storage
        assert_eq!(flight.status, None);
    }

    #[test]
    fn test_id_fallback_uses_scheduled_time() {
        let mut record = complete_record();
        record["dep_time_ts"] = serde_json::Value::Null;

        let first = validate_and_map(&body(vec![record.clone()])).unwrap();
        let second = validate_and_map(&body(vec![record])).unwrap();

        assert_eq!(first.flights[0].id, "UA1234-1704396600");
        assert_eq!(first.flights[0].id, second.flights[0].id);
    }

    #[test]
    fn test_delay_rules() {
        assert_eq!(delay_minutes(Some(20)), Some(20));
        assert_eq!(delay_minutes(Some(0)), None);
        assert_eq!(delay_minutes(Some(-5)), None);
        assert_eq!(delay_minutes(None), None);

        let mut record = complete_record();
        record["dep_delayed"] = json!("late");
        let mapped = validate_and_map(&body(vec![record])).unwrap();
        assert_eq!(mapped.flights[0].delay_minutes, None);
        assert_eq!(mapped.rejected, 0);
    }

    #[test]
    fn test_estimate_equal_to_schedule_is_dropped() {
        let mut record = complete_record();
        record["dep_estimated"] = json!("2024-01-04 19:30");
        let mapped = validate_and_map(&body(vec![record])).unwrap();
        assert_eq!(mapped.flights[0].estimated_time, None);
    }

    #[test]
    fn test_unknown_status_is_none() {
        let mut record = complete_record();
        record["status"] = json!("diverted");
        let mapped = validate_and_map(&body(vec![record])).unwrap();
        assert_eq!(mapped.flights[0].status, None);
    }

    #[test]
    fn test_upstream_order_preserved() {
        let mut later = complete_record();
        later["flight_iata"] = json!("UA2");
        later["dep_time"] = json!("2024-01-04 23:00");
        let mut earlier = complete_record();
        earlier["flight_iata"] = json!("UA1");
        earlier["dep_time"] = json!("2024-01-04 08:00");

        let mapped = validate_and_map(&body(vec![later, earlier])).unwrap();
        let numbers: Vec<_> = mapped.flights.iter().map(|f| f.flight_number.as_str()).collect();
        assert_eq!(numbers, ["UA2", "UA1"]);
    }

    #[test]
    fn test_bad_envelope_fails_whole_fetch() {
        assert!(matches!(
            validate_and_map(br#"{"response":"nope"}"#),
            Err(TowerError::Format(_))
        ));
    }
}
