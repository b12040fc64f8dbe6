use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;
use ahash::AHashMap;
use arrow::array::{ArrayRef, Float64Builder, Int64Builder, StringBuilder, TimestampMillisecondBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::Utc;
use csv::{ReaderBuilder, StringRecord};
use xf_core::{parse_timestamp, Dataset, ParsedTimestamp};

use crate::config::{ColumnType, DatasetConfig};
use crate::DataError;

/// Loads a CSV source into an immutable dataset according to a [`DatasetConfig`]
pub struct CsvLoader {
    config: DatasetConfig,
}

/// Column builder matching a declared column type
enum ColumnBuilder {
    Float(Float64Builder),
    Integer(Int64Builder),
    Text(StringBuilder),
    Timestamp { builder: TimestampMillisecondBuilder, utc: bool },
}

impl ColumnBuilder {
    fn new(column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::Float => ColumnBuilder::Float(Float64Builder::new()),
            ColumnType::Integer => ColumnBuilder::Integer(Int64Builder::new()),
            ColumnType::Text => ColumnBuilder::Text(StringBuilder::new()),
            ColumnType::Timestamp { utc } => ColumnBuilder::Timestamp { builder: TimestampMillisecondBuilder::new(), utc },
        }
    }

    /// Append a cell; returns false when the value could not be coerced and a null was stored
    fn append(&mut self, value: Option<&str>) -> bool {
        match (self, value) {
            (ColumnBuilder::Float(b), Some(v)) => append_parsed(b, v.trim().parse::<f64>().ok()),
            (ColumnBuilder::Integer(b), Some(v)) => append_parsed(b, v.trim().parse::<i64>().ok()),
            (ColumnBuilder::Text(b), Some(v)) => {
                b.append_value(v);
                true
            }
            (ColumnBuilder::Timestamp { builder, utc }, Some(v)) => {
                let utc = *utc;
                append_parsed(builder, parse_timestamp_millis(v, utc))
            }
            (ColumnBuilder::Float(b), None) => {
                b.append_null();
                true
            }
            (ColumnBuilder::Integer(b), None) => {
                b.append_null();
                true
            }
            (ColumnBuilder::Text(b), None) => {
                b.append_null();
                true
            }
            (ColumnBuilder::Timestamp { builder, .. }, None) => {
                builder.append_null();
                true
            }
        }
    }

    fn finish(self) -> ArrayRef {
        match self {
            ColumnBuilder::Float(mut b) => Arc::new(b.finish()),
            ColumnBuilder::Integer(mut b) => Arc::new(b.finish()),
            ColumnBuilder::Text(mut b) => Arc::new(b.finish()),
            ColumnBuilder::Timestamp { mut builder, utc: true } => Arc::new(builder.finish().with_timezone("UTC")),
            ColumnBuilder::Timestamp { mut builder, utc: false } => Arc::new(builder.finish()),
        }
    }
}

fn append_parsed<T>(builder: &mut arrow::array::PrimitiveBuilder<T>, value: Option<T::Native>) -> bool
where
    T: arrow::datatypes::ArrowPrimitiveType,
{
    builder.append_option(value);
    value.is_some()
}

impl CsvLoader {
    pub fn new(config: DatasetConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    /// Load a CSV file from disk
    pub fn load_path(&self, path: &Path) -> Result<Dataset, DataError> {
        tracing::info!("Loading dataset from {}", path.display());
        let file = File::open(path)?;
        self.load_reader(BufReader::new(file))
    }

    /// Untyped schema of a CSV file's header record, used to pick a template
    pub fn header_schema_path(&self, path: &Path) -> Result<Schema, DataError> {
        self.header_schema(BufReader::new(File::open(path)?))
    }

    pub fn header_schema<R: Read>(&self, reader: R) -> Result<Schema, DataError> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter_byte(self.config.delimiter)?)
            .from_reader(reader);
        let fields: Vec<Field> = csv_reader.headers()?.iter().map(|h| Field::new(h.trim(), DataType::Utf8, true)).collect();
        Ok(Schema::new(fields))
    }

    /// Load CSV data from any reader; the first record holds the headers
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<Dataset, DataError> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter_byte(self.config.delimiter)?)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let positions: AHashMap<&str, usize> = headers.iter().enumerate().map(|(i, h)| (h.trim(), i)).collect();

        let lookup = |header: &str| positions.get(header).copied().ok_or_else(|| DataError::MissingColumn(header.to_string()));

        let column_positions = self
            .config
            .columns
            .iter()
            .map(|c| lookup(c.source_header()))
            .collect::<Result<Vec<_>, _>>()?;
        let filters = self
            .config
            .filters
            .iter()
            .map(|f| Ok((lookup(&f.column)?, f.equals.as_str())))
            .collect::<Result<Vec<_>, DataError>>()?;

        let mut builders: Vec<ColumnBuilder> =
            self.config.columns.iter().map(|c| ColumnBuilder::new(c.column_type)).collect();
        let mut record = StringRecord::new();
        let mut kept = 0usize;
        let mut skipped = 0usize;
        let mut coerced_to_null = 0usize;

        while csv_reader.read_record(&mut record)? {
            if self.config.max_rows.is_some_and(|max| kept >= max) {
                break;
            }
            if !filters.iter().all(|(pos, equals)| record.get(*pos).map(str::trim) == Some(*equals)) {
                skipped += 1;
                continue;
            }

            for (builder, pos) in builders.iter_mut().zip(&column_positions) {
                let cell = record.get(*pos).filter(|v| !self.config.null_config.is_null(v));
                if !builder.append(cell) {
                    coerced_to_null += 1;
                }
            }
            kept += 1;
        }

        if coerced_to_null > 0 {
            tracing::warn!("{} cells could not be coerced to their column type and were loaded as null", coerced_to_null);
        }
        tracing::info!("Loaded {} rows ({} filtered out)", kept, skipped);

        let arrays: Vec<ArrayRef> = builders.into_iter().map(ColumnBuilder::finish).collect();
        let batch = RecordBatch::try_new(Arc::new(self.config.schema()), arrays)?;
        Ok(Dataset::new(batch)?)
    }
}

/// The csv reader splits on a single byte
fn delimiter_byte(delimiter: char) -> Result<u8, DataError> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(DataError::InvalidDelimiter(delimiter))
    }
}

/// Parse a timestamp cell into epoch milliseconds.
///
/// With `utc`, offsets are honored and naive values are read as UTC. Without
/// it, offset-carrying values keep their wall-clock reading.
fn parse_timestamp_millis(value: &str, utc: bool) -> Option<i64> {
    Some(match parse_timestamp(value)? {
        ParsedTimestamp::Aware(t) if utc => t.with_timezone(&Utc).timestamp_millis(),
        ParsedTimestamp::Aware(t) => t.naive_local().and_utc().timestamp_millis(),
        ParsedTimestamp::Naive(t) => t.and_utc().timestamp_millis(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnSpec;
    use arrow::array::Array;
    use chrono::DateTime;
    use xf_core::ColumnKind;

    const QUAKES: &str = "\
time,latitude,longitude,depth,mag,type
2023-06-01T10:00:00.000Z,38.1,-122.5,5.0,2.1,earthquake
2023-06-01T11:30:00.000Z,61.2,-150.1,10.0,3.4,quarry blast
2023-06-02T01:15:00.000+02:00,19.4,-155.3,1.2,,earthquake
2023-06-03 08:00:00,35.0,-117.9,7.7,oops,earthquake
";

    fn quake_config() -> DatasetConfig {
        DatasetConfig::new(vec![
            ColumnSpec::new("time", ColumnType::Timestamp { utc: true }),
            ColumnSpec::new("latitude", ColumnType::Float),
            ColumnSpec::new("longitude", ColumnType::Float),
            ColumnSpec::new("mag", ColumnType::Float),
        ])
        .with_filter("type", "earthquake")
    }

    #[test]
    fn test_filter_and_projection() {
        let dataset = CsvLoader::new(quake_config()).load_reader(QUAKES.as_bytes()).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.column_names().collect::<Vec<_>>(), vec!["time", "latitude", "longitude", "mag"]);
        assert!(matches!(dataset.column_kind("time"), Some(ColumnKind::Temporal { timezone: Some(_) })));

        let mags = dataset.numeric("mag").unwrap();
        assert_eq!(mags.value(0), 2.1);
        assert_eq!(mags.null_count(), 2);
    }

    #[test]
    fn test_timestamps_normalized_to_utc() {
        let dataset = CsvLoader::new(quake_config()).load_reader(QUAKES.as_bytes()).unwrap();
        let times = dataset.temporal("time").unwrap();

        let expected = DateTime::parse_from_rfc3339("2023-06-01T23:15:00Z").unwrap().timestamp_millis();
        assert_eq!(times.value(1), expected);
        let naive_as_utc = DateTime::parse_from_rfc3339("2023-06-03T08:00:00Z").unwrap().timestamp_millis();
        assert_eq!(times.value(2), naive_as_utc);
    }

    #[test]
    fn test_max_rows_keeps_source_order() {
        let dataset = CsvLoader::new(quake_config().with_max_rows(1))
            .load_reader(QUAKES.as_bytes())
            .unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.numeric("latitude").unwrap().value(0), 38.1);
    }

    #[test]
    fn test_missing_header() {
        let config = DatasetConfig::new(vec![ColumnSpec::new("status", ColumnType::Text)]);
        let err = CsvLoader::new(config).load_reader(QUAKES.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(name) if name == "status"));
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let mut config = quake_config();
        config.delimiter = '\u{12c}';
        let err = CsvLoader::new(config).load_reader(QUAKES.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::InvalidDelimiter('\u{12c}')));

        let mut config = quake_config();
        config.delimiter = ';';
        let dataset = CsvLoader::new(config).load_reader(QUAKES.replace(',', ";").as_bytes()).unwrap();
        assert_eq!(dataset.len(), 3);
    }

    #[test]
    fn test_naive_timestamps_with_t_separator() {
        let config = DatasetConfig::new(vec![ColumnSpec::new("time", ColumnType::Timestamp { utc: false })]);
        let dataset = CsvLoader::new(config).load_reader("time\n2023-06-03T08:00\n".as_bytes()).unwrap();
        let expected = DateTime::parse_from_rfc3339("2023-06-03T08:00:00Z").unwrap().timestamp_millis();
        assert_eq!(dataset.temporal("time").unwrap().value(0), expected);
    }

    #[test]
    fn test_header_schema() {
        let schema = CsvLoader::new(quake_config()).header_schema(QUAKES.as_bytes()).unwrap();
        let names: Vec<_> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(names, vec!["time", "latitude", "longitude", "depth", "mag", "type"]);
    }
}
