//! Account lookup readers (CSV, and XLSX with the `xlsx` feature).
//!
//! Both formats need an "Account Number" and an "Account Name" column; any
//! other columns are ignored.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use finboard_core::{AccountLookup, Diagnostic, FinboardError, Insert, Result};
use tracing::{debug, warn};

const NUMBER_HEADER: &str = "Account Number";
const NAME_HEADER: &str = "Account Name";

/// Lookup table plus anything odd found while reading it
#[derive(Debug, Clone, Default)]
pub struct LookupReport {
    pub lookup: AccountLookup,
    pub diagnostics: Vec<Diagnostic>,
}

/// Load a lookup file, choosing the reader from the file extension.
pub fn load_account_lookup(path: impl AsRef<Path>) -> Result<LookupReport> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "xlsx" | "xlsm" | "xls" | "ods" => read_spreadsheet(path),
        _ => {
            let file = File::open(path).map_err(|e| {
                FinboardError::invalid_input(format!("opening {}: {e}", path.display()))
            })?;
            parse_account_lookup_csv(BufReader::new(file))
        }
    }
}

#[cfg(feature = "xlsx")]
fn read_spreadsheet(path: &Path) -> Result<LookupReport> {
    parse_account_lookup_xlsx(path)
}

#[cfg(not(feature = "xlsx"))]
fn read_spreadsheet(path: &Path) -> Result<LookupReport> {
    Err(FinboardError::invalid_input(format!(
        "{}: spreadsheet lookups need the `xlsx` feature",
        path.display()
    )))
}

pub fn parse_account_lookup_csv<R: Read>(reader: R) -> Result<LookupReport> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| {
            FinboardError::invalid_input(format!("account lookup is unreadable: {e}"))
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        rows.push((line, record.iter().map(str::to_string).collect::<Vec<_>>()));
    }

    build_lookup(rows)
}

#[cfg(feature = "xlsx")]
pub fn parse_account_lookup_xlsx(path: &Path) -> Result<LookupReport> {
    use calamine::{Data, Reader};

    let mut workbook = calamine::open_workbook_auto(path).map_err(|e| {
        FinboardError::invalid_input(format!("opening {}: {e}", path.display()))
    })?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| FinboardError::invalid_input(format!("{} has no worksheets", path.display())))?
        .map_err(|e| FinboardError::invalid_input(format!("reading {}: {e}", path.display())))?;

    let rows = range
        .rows()
        .enumerate()
        .map(|(i, row)| {
            let cells = row
                .iter()
                .map(|cell| match cell {
                    Data::Empty => String::new(),
                    Data::String(s) => s.clone(),
                    Data::Int(n) => n.to_string(),
                    // account numbers stored as numbers come back as floats
                    Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>();
            (i as u64 + 1, cells)
        })
        .collect();

    build_lookup(rows)
}

fn build_lookup(rows: Vec<(u64, Vec<String>)>) -> Result<LookupReport> {
    let mut rows = rows
        .into_iter()
        .filter(|(_, cells)| cells.iter().any(|c| !c.trim().is_empty()));

    let Some((_, header)) = rows.next() else {
        return Err(FinboardError::invalid_input("account lookup is empty"));
    };
    let position = |name: &str| {
        header
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim().eq_ignore_ascii_case(name))
    };
    let (Some(number_idx), Some(name_idx)) = (position(NUMBER_HEADER), position(NAME_HEADER)) else {
        return Err(FinboardError::invalid_input(format!(
            "account lookup needs '{NUMBER_HEADER}' and '{NAME_HEADER}' columns (found: {})",
            header.join(", ")
        )));
    };

    let mut report = LookupReport::default();
    for (line, cells) in rows {
        let number = cells.get(number_idx).map(|s| s.trim()).unwrap_or("");
        let name = cells.get(name_idx).map(|s| s.trim()).unwrap_or("");
        if number.is_empty() || name.is_empty() {
            continue;
        }
        if let Insert::Conflict { kept } = report.lookup.insert(number, name) {
            let diagnostic = Diagnostic::duplicate_account(line, number, &kept, name);
            warn!("{diagnostic}");
            report.diagnostics.push(diagnostic);
        }
    }

    debug!(accounts = report.lookup.len(), "loaded account lookup");
    Ok(report)
}
