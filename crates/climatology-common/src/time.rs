//! Time grouping keys for climatologies.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Meteorological season.
///
/// December belongs to the DJF season of its own calendar year; no sample is
/// shifted across years when grouping.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Season {
    /// December, January, February
    #[default]
    #[serde(rename = "DJF")]
    Djf,
    /// March, April, May
    #[serde(rename = "MAM")]
    Mam,
    /// June, July, August
    #[serde(rename = "JJA")]
    Jja,
    /// September, October, November
    #[serde(rename = "SON")]
    Son,
}

impl Season {
    /// All seasons in canonical order.
    pub const ALL: [Season; 4] = [Season::Djf, Season::Mam, Season::Jja, Season::Son];

    /// Season containing a calendar month (1-12).
    pub fn from_month(month: u32) -> Option<Self> {
        match month {
            12 | 1 | 2 => Some(Season::Djf),
            3..=5 => Some(Season::Mam),
            6..=8 => Some(Season::Jja),
            9..=11 => Some(Season::Son),
            _ => None,
        }
    }

    /// Season of a timestamp.
    pub fn of(time: &DateTime<Utc>) -> Self {
        // chrono months are always 1-12
        Self::from_month(time.month()).unwrap_or(Season::Son)
    }

    /// Three-letter code, e.g. "DJF".
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Djf => "DJF",
            Season::Mam => "MAM",
            Season::Jja => "JJA",
            Season::Son => "SON",
        }
    }

    /// Calendar months of this season, in seasonal order.
    pub fn months(&self) -> [u32; 3] {
        match self {
            Season::Djf => [12, 1, 2],
            Season::Mam => [3, 4, 5],
            Season::Jja => [6, 7, 8],
            Season::Son => [9, 10, 11],
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Season {
    type Err = SeasonParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DJF" => Ok(Season::Djf),
            "MAM" => Ok(Season::Mam),
            "JJA" => Ok(Season::Jja),
            "SON" => Ok(Season::Son),
            _ => Err(SeasonParseError::Unknown(s.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SeasonParseError {
    #[error("Unknown season '{0}' (expected one of DJF, MAM, JJA, SON)")]
    Unknown(String),
}

/// Calendar year of a timestamp.
pub fn year_of(time: &DateTime<Utc>) -> i32 {
    time.year()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_season_from_month() {
        assert_eq!(Season::from_month(12), Some(Season::Djf));
        assert_eq!(Season::from_month(1), Some(Season::Djf));
        assert_eq!(Season::from_month(4), Some(Season::Mam));
        assert_eq!(Season::from_month(8), Some(Season::Jja));
        assert_eq!(Season::from_month(11), Some(Season::Son));
        assert_eq!(Season::from_month(0), None);
        assert_eq!(Season::from_month(13), None);
    }

    #[test]
    fn test_season_of_timestamp() {
        let dec = Utc.with_ymd_and_hms(2010, 12, 16, 12, 0, 0).unwrap();
        assert_eq!(Season::of(&dec), Season::Djf);
        assert_eq!(year_of(&dec), 2010);

        let sep = Utc.with_ymd_and_hms(2011, 9, 1, 0, 0, 0).unwrap();
        assert_eq!(Season::of(&sep), Season::Son);
    }

    #[test]
    fn test_season_of_agrees_with_from_month() {
        for month in 1..=12 {
            let time = Utc.with_ymd_and_hms(2000, month, 1, 0, 0, 0).unwrap();
            assert_eq!(Some(Season::of(&time)), Season::from_month(month));
            assert!(Season::of(&time).months().contains(&month));
        }
    }

    #[test]
    fn test_season_parse_and_display() {
        assert_eq!("jja".parse::<Season>().unwrap(), Season::Jja);
        assert_eq!(" SON ".parse::<Season>().unwrap(), Season::Son);
        assert!("winter".parse::<Season>().is_err());
        for season in Season::ALL {
            assert_eq!(season.to_string().parse::<Season>().unwrap(), season);
        }
    }

    #[test]
    fn test_season_serde_names() {
        let json = serde_json::to_string(&Season::Mam).unwrap();
        assert_eq!(json, "\"MAM\"");
        let parsed: Season = serde_json::from_str("\"DJF\"").unwrap();
        assert_eq!(parsed, Season::Djf);
    }

    #[test]
    fn test_months_cover_year_once() {
        let mut months: Vec<u32> = Season::ALL.iter().flat_map(|s| s.months()).collect();
        months.sort_unstable();
        assert_eq!(months, (1..=12).collect::<Vec<_>>());
    }
}
