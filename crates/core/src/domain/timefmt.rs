use anyhow::Context;
use chrono::NaiveTime;

pub const HH_MM: &str = "%H:%M";

pub fn parse_hh_mm(value: &str) -> anyhow::Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), HH_MM)
        .with_context(|| format!("invalid HH:MM time: {value:?}"))
}

pub fn format_hh_mm(time: NaiveTime) -> String {
    time.format(HH_MM).to_string()
}

/// Serde adapter for the wire format ("09:30" instead of chrono's "09:30:00").
pub mod hh_mm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_hh_mm(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(raw.trim(), super::HH_MM).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "hh_mm")]
        at: NaiveTime,
    }

    #[test]
    fn parses_and_formats_hh_mm() {
        let t = parse_hh_mm("09:30").unwrap();
        assert_eq!(format_hh_mm(t), "09:30");
        assert_eq!(format_hh_mm(parse_hh_mm(" 18:05 ").unwrap()), "18:05");
    }

    #[test]
    fn rejects_out_of_range_times() {
        assert!(parse_hh_mm("25:00").is_err());
        assert!(parse_hh_mm("12:61").is_err());
        assert!(parse_hh_mm("noon").is_err());
    }

    #[test]
    fn serde_round_trips_without_seconds() {
        let w: Wrapper = serde_json::from_str(r#"{"at":"07:05"}"#).unwrap();
        assert_eq!(format_hh_mm(w.at), "07:05");
        assert_eq!(serde_json::to_string(&w).unwrap(), r#"{"at":"07:05"}"#);
    }

    #[test]
    fn serde_rejects_seconds_suffix() {
        assert!(serde_json::from_str::<Wrapper>(r#"{"at":"07:05:30"}"#).is_err());
    }
}
