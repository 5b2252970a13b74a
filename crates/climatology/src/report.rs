//! Per-country annual average report.
//!
//! Text layout, one line per year with a blank line after each country:
//!
//! ```text
//! United Kingdom            2010 : 2.134 mm/day
//! United Kingdom            2011 : 2.301 mm/day
//!
//! ```

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use climatology_common::ClimateResult;

use crate::types::CountryCode;

/// File name used when the report is written to a directory.
pub const DEFAULT_REPORT_FILE: &str = "annual_average_precipitation_by_country.txt";

/// Width the country name is padded to.
const NAME_WIDTH: usize = 25;

/// Annual averages for one country, in year order.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryBlock {
    pub name: String,
    pub code: CountryCode,
    rows: Vec<(i32, f64)>,
}

impl CountryBlock {
    pub fn new(name: impl Into<String>, code: CountryCode) -> Self {
        Self {
            name: name.into(),
            code,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, year: i32, value: f64) {
        self.rows.push((year, value));
    }

    /// `(year, mm/day)` rows.
    pub fn rows(&self) -> &[(i32, f64)] {
        &self.rows
    }
}

impl fmt::Display for CountryBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (year, value) in &self.rows {
            write!(f, "{:<width$} {} : ", self.name, year, width = NAME_WIDTH)?;
            // Countries with every cell missing print as "nan"
            if value.is_nan() {
                f.write_str("nan")?;
            } else {
                write!(f, "{:.3}", value)?;
            }
            writeln!(f, " mm/day")?;
        }
        writeln!(f)
    }
}

/// Country blocks in caller order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClimatologyReport {
    blocks: Vec<CountryBlock>,
}

impl ClimatologyReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: CountryBlock) {
        self.blocks.push(block);
    }

    pub fn blocks(&self) -> &[CountryBlock] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Flattened `(country name, year, mm/day)` rows in report order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, i32, f64)> + '_ {
        self.blocks.iter().flat_map(|block| {
            block
                .rows
                .iter()
                .map(move |&(year, value)| (block.name.as_str(), year, value))
        })
    }

    /// Average for one country and year, if present.
    pub fn value(&self, name: &str, year: i32) -> Option<f64> {
        self.entries()
            .find(|&(n, y, _)| n == name && y == year)
            .map(|(_, _, v)| v)
    }

    /// Write the text report to any sink.
    pub fn write_to<W: Write>(&self, mut sink: W) -> ClimateResult<()> {
        write!(sink, "{}", self)?;
        sink.flush()?;
        Ok(())
    }

    /// Write the text report to `path`, replacing any existing file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> ClimateResult<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))?;
        tracing::info!(
            path = %path.display(),
            countries = self.blocks.len(),
            "Wrote country report"
        );
        Ok(())
    }
}

impl fmt::Display for ClimatologyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in &self.blocks {
            write!(f, "{}", block)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use climatology_common::{ClimateError, ErrorKind};

    fn uk(rows: &[(i32, f64)]) -> CountryBlock {
        let mut block = CountryBlock::new("United Kingdom", "GB".into());
        for &(year, value) in rows {
            block.push(year, value);
        }
        block
    }

    #[test]
    fn test_line_format() {
        let mut report = ClimatologyReport::new();
        report.push(uk(&[(2010, 2.0)]));
        assert_eq!(
            report.to_string(),
            "United Kingdom            2010 : 2.000 mm/day\n\n"
        );
    }

    #[test]
    fn test_long_names_not_truncated() {
        let mut block = CountryBlock::new("The United Kingdom of Great Britain", "GB".into());
        block.push(2011, 2.1346);
        assert_eq!(
            block.to_string(),
            "The United Kingdom of Great Britain 2011 : 2.135 mm/day\n\n"
        );
    }

    #[test]
    fn test_missing_value_prints_nan() {
        let block = uk(&[(2010, f64::NAN), (2011, 1.0)]);
        assert_eq!(
            block.to_string(),
            "United Kingdom            2010 : nan mm/day\n\
             United Kingdom            2011 : 1.000 mm/day\n\n"
        );
    }

    #[test]
    fn test_blocks_and_entries_keep_order() {
        let mut report = ClimatologyReport::new();
        report.push(uk(&[(2010, 1.0), (2011, 2.0)]));
        let mut fr = CountryBlock::new("France", "FR".into());
        fr.push(2010, 3.0);
        report.push(fr);

        let entries: Vec<_> = report.entries().collect();
        assert_eq!(
            entries,
            vec![
                ("United Kingdom", 2010, 1.0),
                ("United Kingdom", 2011, 2.0),
                ("France", 2010, 3.0),
            ]
        );
        assert_eq!(report.value("France", 2010), Some(3.0));
        assert_eq!(report.value("France", 2011), None);

        let text = report.to_string();
        assert_eq!(text.lines().count(), 5);
        assert!(text.lines().nth(2).unwrap().is_empty());
    }

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sink_failure_is_io_error() {
        let mut report = ClimatologyReport::new();
        report.push(uk(&[(2010, 2.0)]));
        let err = report.write_to(FailingSink).unwrap_err();
        assert!(matches!(err, ClimateError::Io(_)));
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
