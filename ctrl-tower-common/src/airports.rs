///! Static airport reference data
///!
///! Maps well-known IATA codes to display names and IANA time zones. Airports
///! outside this table still work: they are named by their code and shown in UTC.

/// One row of the airport table
#[derive(Debug, Clone, Copy)]
pub struct AirportInfoEntry {
    pub code: &'static str,
    pub name: &'static str,
    pub timezone: &'static str,
}

const fn entry(code: &'static str, name: &'static str, timezone: &'static str) -> AirportInfoEntry {
    AirportInfoEntry { code, name, timezone }
}

pub const KNOWN_AIRPORTS: &[AirportInfoEntry] = &[
    // United States
    entry("SFO", "San Francisco International", "America/Los_Angeles"),
    entry("LAX", "Los Angeles International", "America/Los_Angeles"),
    entry("SEA", "Seattle-Tacoma International", "America/Los_Angeles"),
    entry("DEN", "Denver International", "America/Denver"),
    entry("ORD", "Chicago O'Hare International", "America/Chicago"),
    entry("DFW", "Dallas/Fort Worth International", "America/Chicago"),
    entry("ATL", "Hartsfield-Jackson Atlanta International", "America/New_York"),
    entry("JFK", "John F. Kennedy International", "America/New_York"),
    entry("BOS", "Boston Logan International", "America/New_York"),
    entry("MIA", "Miami International", "America/New_York"),
    // International
    entry("YYZ", "Toronto Pearson International", "America/Toronto"),
    entry("LHR", "London Heathrow", "Europe/London"),
    entry("CDG", "Paris Charles de Gaulle", "Europe/Paris"),
    entry("FRA", "Frankfurt Airport", "Europe/Berlin"),
    entry("AMS", "Amsterdam Airport Schiphol", "Europe/Amsterdam"),
    entry("DXB", "Dubai International", "Asia/Dubai"),
    entry("SIN", "Singapore Changi Airport", "Asia/Singapore"),
    entry("HKG", "Hong Kong International", "Asia/Hong_Kong"),
    entry("NRT", "Tokyo Narita International", "Asia/Tokyo"),
    entry("SYD", "Sydney Airport", "Australia/Sydney"),
];

/// Look up an airport by IATA code (case-insensitive)
pub fn find_airport(code: &str) -> Option<&'static AirportInfoEntry> {
    let code = code.trim();
    KNOWN_AIRPORTS
        .iter()
        .find(|airport| airport.code.eq_ignore_ascii_case(code))
}

pub fn airport_name(code: &str) -> Option<&'static str> {
    find_airport(code).map(|airport| airport.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_airport_case_insensitive() {
        let lhr = find_airport("lhr").unwrap();
        assert_eq!(lhr.name, "London Heathrow");
        assert_eq!(lhr.timezone, "Europe/London");
        assert!(find_airport("ZZZ").is_none());
    }

    #[test]
    fn test_all_timezones_are_valid() {
        for airport in KNOWN_AIRPORTS {
            assert!(
                airport.timezone.parse::<chrono_tz::Tz>().is_ok(),
                "invalid zone for {}",
                airport.code
            );
        }
    }

    #[test]
    fn test_codes_are_unique() {
        let mut codes: Vec<_> = KNOWN_AIRPORTS.iter().map(|a| a.code).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), KNOWN_AIRPORTS.len());
    }
}
