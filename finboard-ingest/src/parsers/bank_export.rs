//! Bank transaction export reader.
//!
//! Expected header (column order may vary, names may not):
//!   Date,Bank RTN,Account Number,Transaction Type,Description,Debit,Credit,
//!   Check Number,Account Running Balance
//!
//! Some exports write a Description containing the delimiter without quoting
//! it, which pushes every later field one position to the right. Rows that
//! are exactly one field too wide are stitched back together; anything else
//! that does not match the header width is left out and reported.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::StringRecord;
use finboard_core::{Diagnostic, FinboardError, IngestAudit, Result, RowOrigin};
use tracing::{debug, warn};

use crate::types::{COLUMN_COUNT, Column, IngestReport, RawRow};

/// Positions of each logical column in the export's header.
#[derive(Debug, Clone)]
struct HeaderLayout {
    positions: [usize; COLUMN_COUNT],
    width: usize,
}

impl HeaderLayout {
    fn from_record(record: &StringRecord) -> Result<Self> {
        let names: Vec<String> = record
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let mut positions = [0usize; COLUMN_COUNT];
        let mut missing = Vec::new();
        for column in Column::ALL {
            match names.iter().position(|n| n.eq_ignore_ascii_case(column.header())) {
                Some(pos) => positions[column.index()] = pos,
                None => missing.push(column.header()),
            }
        }

        if !missing.is_empty() {
            return Err(FinboardError::invalid_input(format!(
                "transaction export header is missing column(s): {} (found: {})",
                missing.join(", "),
                names.join(", ")
            )));
        }

        Ok(Self {
            positions,
            width: names.len(),
        })
    }

    fn description_position(&self) -> usize {
        self.positions[Column::Description.index()]
    }

    fn map(&self, fields: &[&str], line: u64, origin: RowOrigin) -> RawRow {
        let fields = std::array::from_fn(|i| fields[self.positions[i]].to_string());
        RawRow {
            line,
            origin,
            fields,
        }
    }

    /// Undo a single right shift caused by one stray delimiter in Description.
    fn recover(&self, fields: &[&str], delimiter: char, line: u64) -> RawRow {
        let desc = self.description_position();
        let joined = format!("{}{}{}", fields[desc], delimiter, fields[desc + 1]);

        let mut repaired: Vec<&str> = Vec::with_capacity(self.width);
        repaired.extend_from_slice(&fields[..desc]);
        repaired.push(&joined);
        repaired.extend_from_slice(&fields[desc + 2..]);

        self.map(&repaired, line, RowOrigin::Recovered)
    }
}

/// Parse a bank export from any reader using `,` as the delimiter.
pub fn parse_bank_export<R: Read>(reader: R) -> Result<IngestReport> {
    parse_bank_export_with(reader, b',')
}

/// Parse a bank export file from disk.
pub fn parse_bank_export_file(path: impl AsRef<Path>) -> Result<IngestReport> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        FinboardError::invalid_input(format!("opening {}: {e}", path.display()))
    })?;
    parse_bank_export(BufReader::new(file))
}

pub fn parse_bank_export_with<R: Read>(reader: R, delimiter: u8) -> Result<IngestReport> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .quote(b'"')
        .flexible(true)
        .has_headers(false)
        .from_reader(reader);

    let mut records = rdr.records();
    let header = match records.next() {
        Some(Ok(record)) => record,
        Some(Err(e)) => {
            return Err(FinboardError::invalid_input(format!(
                "transaction export header is unreadable: {e}"
            )));
        }
        None => return Err(FinboardError::invalid_input("transaction export is empty")),
    };
    let layout = HeaderLayout::from_record(&header)?;

    let mut original = Vec::new();
    let mut recovered = Vec::new();
    let mut diagnostics = Vec::new();

    for result in records {
        let record = result.map_err(|e| {
            FinboardError::invalid_input(format!("transaction export is unreadable: {e}"))
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let fields: Vec<&str> = record.iter().collect();

        if fields.len() == layout.width {
            original.push(layout.map(&fields, line, RowOrigin::Original));
        } else if fields.len() == layout.width + 1 {
            debug!(line, "recovering row split inside Description");
            recovered.push(layout.recover(&fields, char::from(delimiter), line));
        } else {
            let separator = char::from(delimiter).to_string();
            let raw = fields.join(separator.as_str());
            let diagnostic = Diagnostic::malformed_row(line, fields.len(), layout.width, &raw);
            warn!("{diagnostic}");
            diagnostics.push(diagnostic);
        }
    }

    let audit = IngestAudit {
        original: original.len(),
        recovered: recovered.len(),
        unrecoverable: diagnostics.len(),
    };
    debug!(
        original = audit.original,
        recovered = audit.recovered,
        unrecoverable = audit.unrecoverable,
        "ingested transaction export"
    );

    original.extend(recovered);
    Ok(IngestReport {
        rows: original,
        diagnostics,
        audit,
    })
}
