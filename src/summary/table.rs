//! Measurement table parsing
//!
//! Loads an uploaded CSV into a row/column table and resolves the four
//! recognised columns against a fixed schema. A column is either present
//! (with one cell per row) or absent; absence is never an error.

use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::errors::{IngestError, IngestResult};

/// Cell spellings that count as a missing value rather than a malformed one
const MISSING_MARKERS: [&str; 7] = ["", "NA", "N/A", "NaN", "nan", "null", "NULL"];

/// The columns the aggregator understands. Matching is exact and case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasurementColumn {
    Pressure,
    Temperature,
    Flowrate,
    Type,
}

impl MeasurementColumn {
    pub const ALL: [MeasurementColumn; 4] = [
        MeasurementColumn::Pressure,
        MeasurementColumn::Temperature,
        MeasurementColumn::Flowrate,
        MeasurementColumn::Type,
    ];

    pub fn header(self) -> &'static str {
        match self {
            MeasurementColumn::Pressure => "Pressure",
            MeasurementColumn::Temperature => "Temperature",
            MeasurementColumn::Flowrate => "Flowrate",
            MeasurementColumn::Type => "Type",
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, MeasurementColumn::Type)
    }
}

/// Parsed upload restricted to the recognised columns.
///
/// Numeric cells are `None` when the source cell was blank or a missing marker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementTable {
    row_count: usize,
    pressure: Option<Vec<Option<f64>>>,
    temperature: Option<Vec<Option<f64>>>,
    flowrate: Option<Vec<Option<f64>>>,
    kind: Option<Vec<Option<String>>>,
}

/// Header positions of the recognised columns in one particular upload
#[derive(Debug, Default)]
struct ColumnPositions {
    pressure: Option<usize>,
    temperature: Option<usize>,
    flowrate: Option<usize>,
    kind: Option<usize>,
}

impl ColumnPositions {
    fn resolve(headers: &StringRecord) -> Self {
        let find = |column: MeasurementColumn| headers.iter().position(|h| h == column.header());
        Self {
            pressure: find(MeasurementColumn::Pressure),
            temperature: find(MeasurementColumn::Temperature),
            flowrate: find(MeasurementColumn::Flowrate),
            kind: find(MeasurementColumn::Type),
        }
    }
}

impl MeasurementTable {
    /// Parse CSV bytes. An upload with no header at all is an empty table.
    pub fn from_csv_bytes(bytes: &[u8]) -> IngestResult<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let headers = reader.headers()?.clone();
        let positions = ColumnPositions::resolve(&headers);
        debug!(
            "Resolved columns: pressure={:?} temperature={:?} flowrate={:?} type={:?}",
            positions.pressure, positions.temperature, positions.flowrate, positions.kind
        );

        let mut table = MeasurementTable {
            row_count: 0,
            pressure: positions.pressure.map(|_| Vec::new()),
            temperature: positions.temperature.map(|_| Vec::new()),
            flowrate: positions.flowrate.map(|_| Vec::new()),
            kind: positions.kind.map(|_| Vec::new()),
        };

        for record in reader.records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            if record.len() > headers.len() {
                return Err(IngestError::IngestionFailure(format!(
                    "Error tokenizing data. Expected {} fields in line {}, saw {}",
                    headers.len(),
                    line,
                    record.len()
                )));
            }

            push_numeric(
                &mut table.pressure,
                &record,
                positions.pressure,
                MeasurementColumn::Pressure,
                line,
            )?;
            push_numeric(
                &mut table.temperature,
                &record,
                positions.temperature,
                MeasurementColumn::Temperature,
                line,
            )?;
            push_numeric(
                &mut table.flowrate,
                &record,
                positions.flowrate,
                MeasurementColumn::Flowrate,
                line,
            )?;

            // labels are kept verbatim: " Pump" and "Pump" are different types
            if let (Some(cells), Some(index)) = (table.kind.as_mut(), positions.kind) {
                let cell = record.get(index).unwrap_or("");
                cells.push(if is_missing(cell) {
                    None
                } else {
                    Some(cell.to_string())
                });
            }

            table.row_count += 1;
        }

        Ok(table)
    }

    /// Number of data rows, excluding the header
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn has_column(&self, column: MeasurementColumn) -> bool {
        match column {
            MeasurementColumn::Pressure => self.pressure.is_some(),
            MeasurementColumn::Temperature => self.temperature.is_some(),
            MeasurementColumn::Flowrate => self.flowrate.is_some(),
            MeasurementColumn::Type => self.kind.is_some(),
        }
    }

    /// Cells of a numeric column, or `None` if the upload did not have it
    pub fn numeric_column(&self, column: MeasurementColumn) -> Option<&[Option<f64>]> {
        match column {
            MeasurementColumn::Pressure => self.pressure.as_deref(),
            MeasurementColumn::Temperature => self.temperature.as_deref(),
            MeasurementColumn::Flowrate => self.flowrate.as_deref(),
            MeasurementColumn::Type => None,
        }
    }

    /// Cells of the categorical `Type` column, or `None` if the upload did not have it
    pub fn type_column(&self) -> Option<&[Option<String>]> {
        self.kind.as_deref()
    }
}

fn push_numeric(
    cells: &mut Option<Vec<Option<f64>>>,
    record: &StringRecord,
    position: Option<usize>,
    column: MeasurementColumn,
    line: u64,
) -> IngestResult<()> {
    let (Some(cells), Some(index)) = (cells.as_mut(), position) else {
        return Ok(());
    };
    let raw = record.get(index).map(str::trim).unwrap_or("");
    cells.push(parse_numeric(raw, column, line)?);
    Ok(())
}

fn parse_numeric(raw: &str, column: MeasurementColumn, line: u64) -> IngestResult<Option<f64>> {
    if is_missing(raw) {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        Ok(_) => Err(IngestError::IngestionFailure(format!(
            "Column '{}' has a non-finite value '{}' on line {}",
            column.header(),
            raw,
            line
        ))),
        Err(_) => Err(IngestError::IngestionFailure(format!(
            "Column '{}' has a non-numeric value '{}' on line {}",
            column.header(),
            raw,
            line
        ))),
    }
}

fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell)
}
