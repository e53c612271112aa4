use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// A parsed data response: rows indexed by the first CSV column as timestamps,
/// remaining columns as numeric fields.
///
/// No ordering or duplicate-index invariants are enforced; the table holds
/// whatever the portal returned.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    time_column: String,
    columns: Vec<String>,
    timestamps: Vec<NaiveDateTime>,
    values: Vec<Vec<f64>>,
}

impl TimeSeries {
    /// Parses a CSV response body.
    ///
    /// Empty fields and `NaN` literals become `f64::NAN`, matching how the
    /// portal encodes missing values.
    pub fn from_csv(text: &str) -> Result<Self> {
        Self::from_reader(text.as_bytes())
    }

    /// Parses a previously saved dataset file, using the same
    /// first-column-as-timestamp convention as [`from_csv`](Self::from_csv).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_reader(text.as_bytes())
    }

    fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        if headers.is_empty() {
            return Err(Error::EmptyResponse);
        }

        let time_column = headers[0].to_string();
        let columns: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

        let mut timestamps = Vec::new();
        let mut values = Vec::new();

        for record in rdr.records() {
            let record = record?;
            let raw = record.get(0).unwrap_or("");
            timestamps.push(parse_timestamp(&time_column, raw)?);

            let mut row = Vec::with_capacity(columns.len());
            for (column, field) in columns.iter().zip(record.iter().skip(1)) {
                row.push(parse_field(column, field)?);
            }
            values.push(row);
        }

        Ok(Self {
            time_column,
            columns,
            timestamps,
            values,
        })
    }

    /// Name of the timestamp index column.
    pub fn time_column(&self) -> &str {
        &self.time_column
    }

    /// Names of the data columns, excluding the timestamp index.
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Parsed timestamp index, in response order.
    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    /// All values of a named data column, or `None` if the column is absent.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.values.iter().map(|row| row[idx]).collect())
    }

    /// One row of data values, aligned with [`column_names`](Self::column_names).
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.values.get(index).map(Vec::as_slice)
    }

    /// Iterates `(timestamp, data row)` pairs in response order.
    pub fn rows(&self) -> impl Iterator<Item = (NaiveDateTime, &[f64])> {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values.iter().map(Vec::as_slice))
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Parses a `last()` response: header line plus one data row, all columns
/// zipped into a name-to-value map.
pub(crate) fn parse_last_record(text: &str) -> Result<BTreeMap<String, String>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(Error::EmptyResponse);
    }

    let record = match rdr.records().next() {
        Some(record) => record?,
        None => return Err(Error::EmptyResponse),
    };

    Ok(headers
        .iter()
        .map(str::to_string)
        .zip(record.iter().map(str::to_string))
        .collect())
}

fn parse_timestamp(column: &str, raw: &str) -> Result<NaiveDateTime> {
    // The portal emits `yyyy-MM-ddTHH:mm:ss.SSS`; saved files and other LaTiS
    // outputs may carry a space separator or a bare date.
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN)))
        .map_err(|_| Error::Timestamp {
            column: column.to_string(),
            value: raw.to_string(),
        })
}

fn parse_field(column: &str, raw: &str) -> Result<f64> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }
    raw.parse::<f64>().map_err(|_| Error::Numeric {
        column: column.to_string(),
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn parses_two_row_response() {
        let body = "time,value\n2020-01-01T00:00:00,1.0\n2020-01-01T01:00:00,2.0\n";
        let table = TimeSeries::from_csv(body).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.time_column(), "time");
        assert_eq!(table.column_names(), ["value"]);
        assert_eq!(
            table.timestamps(),
            [ts(2020, 1, 1, 0, 0, 0), ts(2020, 1, 1, 1, 0, 0)]
        );
        assert_eq!(table.column("value"), Some(vec![1.0, 2.0]));
        assert_eq!(table.column("missing"), None);
    }

    #[test]
    fn parses_fractional_seconds_and_bare_dates() {
        let body = "time (UTC),irradiance (W/m^2)\n\
                    2005-05-05T12:00:00.000,1361.5\n\
                    2005-05-06,1361.2\n";
        let table = TimeSeries::from_csv(body).unwrap();

        assert_eq!(table.time_column(), "time (UTC)");
        assert_eq!(
            table.timestamps(),
            [ts(2005, 5, 5, 12, 0, 0), ts(2005, 5, 6, 0, 0, 0)]
        );
    }

    #[test]
    fn missing_values_become_nan() {
        let body = "time,a,b\n2020-01-01T00:00:00,,NaN\n";
        let table = TimeSeries::from_csv(body).unwrap();
        let row = table.row(0).unwrap();
        assert!(row[0].is_nan());
        assert!(row[1].is_nan());
    }

    #[test]
    fn bad_timestamp_names_column_and_value() {
        let body = "time,value\nnot-a-time,1.0\n";
        let err = TimeSeries::from_csv(body).unwrap_err();
        match err {
            Error::Timestamp { column, value } => {
                assert_eq!(column, "time");
                assert_eq!(value, "not-a-time");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn header_only_body_yields_empty_table() {
        let table = TimeSeries::from_csv("time,value\n").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn file_round_trip_matches_in_memory_parse() {
        let body = "time,value\n2020-01-01T00:00:00,1.0\n2020-01-01T01:00:00,2.0\n";

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file.flush().unwrap();

        let from_file = TimeSeries::from_path(file.path()).unwrap();
        let from_body = TimeSeries::from_csv(body).unwrap();
        assert_eq!(from_file, from_body);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = TimeSeries::from_path("/nonexistent/data.csv").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn last_record_maps_headers_to_values() {
        let record = parse_last_record("time,value\n2020-01-01T00:00:00,3.5\n").unwrap();
        assert_eq!(record["time"], "2020-01-01T00:00:00");
        assert_eq!(record["value"], "3.5");
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn last_record_handles_quoted_commas() {
        let record = parse_last_record("time,note\n2020-01-01T00:00:00,\"a, b\"\n").unwrap();
        assert_eq!(record["note"], "a, b");
    }

    #[test]
    fn last_record_requires_a_data_row() {
        assert!(matches!(
            parse_last_record("time,value\n"),
            Err(Error::EmptyResponse)
        ));
        assert!(matches!(parse_last_record(""), Err(Error::EmptyResponse)));
    }
}
