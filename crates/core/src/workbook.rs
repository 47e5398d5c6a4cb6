//! Spreadsheet ingestion
//!
//! Wraps the calamine readers behind a single `Workbook` type that locates
//! the requested sheet and yields the two designated columns as `Row`s,
//! with missing cells normalized to empty strings. Format detection goes by
//! file extension.

use crate::config::ExtractConfig;
use crate::models::Row;
use calamine::{open_workbook, Data, Ods, Range, Reader, Xls, Xlsb, Xlsx};
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkbookError {
    #[error("invalid xlsx file: {0}")]
    Xlsx(#[from] calamine::XlsxError),

    #[error("invalid xlsb file: {0}")]
    Xlsb(#[from] calamine::XlsbError),

    #[error("invalid xls file: {0}")]
    Xls(#[from] calamine::XlsError),

    #[error("invalid ods file: {0}")]
    Ods(#[from] calamine::OdsError),

    #[error("cannot detect spreadsheet format for '{name}'")]
    UnknownFormat { name: String },

    #[error("sheet '{name}' not found")]
    SheetNotFound { name: String },

    #[error("workbook has no sheets")]
    NoSheets,
}

type FileReader = BufReader<File>;

/// Unified reader over the supported spreadsheet formats.
pub enum Workbook {
    /// Excel 2007+ (.xlsx, .xlsm, .xlam)
    Xlsx(Xlsx<FileReader>),
    /// Excel binary (.xlsb)
    Xlsb(Xlsb<FileReader>),
    /// Legacy Excel (.xls, .xla)
    Xls(Xls<FileReader>),
    /// OpenDocument (.ods)
    Ods(Ods<FileReader>),
}

impl Workbook {
    /// Open a workbook, picking the reader from the file extension.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Workbook, WorkbookError> {
        match path.as_ref().extension().and_then(OsStr::to_str) {
            Some("xlsx") | Some("xlsm") | Some("xlam") => Ok(Self::Xlsx(open_workbook(path)?)),
            Some("xlsb") => Ok(Self::Xlsb(open_workbook(path)?)),
            Some("xls") | Some("xla") => Ok(Self::Xls(open_workbook(path)?)),
            Some("ods") => Ok(Self::Ods(open_workbook(path)?)),
            _ => Err(WorkbookError::UnknownFormat {
                name: path.as_ref().to_string_lossy().to_string(),
            }),
        }
    }

    /// Names of all sheets in the workbook.
    pub fn sheet_names(&self) -> Vec<String> {
        match self {
            Self::Xlsx(xlsx) => xlsx.sheet_names(),
            Self::Xlsb(xlsb) => xlsb.sheet_names(),
            Self::Xls(xls) => xls.sheet_names(),
            Self::Ods(ods) => ods.sheet_names(),
        }
    }

    /// Resolve the sheet to read: the requested name, or the first sheet
    /// when no name is configured.
    pub fn resolve_sheet(&self, requested: Option<&str>) -> Result<String, WorkbookError> {
        let names = self.sheet_names();
        match requested {
            Some(name) => names
                .iter()
                .find(|candidate| candidate.as_str() == name)
                .cloned()
                .ok_or_else(|| WorkbookError::SheetNotFound {
                    name: name.to_string(),
                }),
            None => names.first().cloned().ok_or(WorkbookError::NoSheets),
        }
    }

    fn range(&mut self, sheet: &str) -> Result<Range<Data>, WorkbookError> {
        match self {
            Self::Xlsx(xlsx) => Ok(xlsx.worksheet_range(sheet)?),
            Self::Xlsb(xlsb) => Ok(xlsb.worksheet_range(sheet)?),
            Self::Xls(xls) => Ok(xls.worksheet_range(sheet)?),
            Self::Ods(ods) => Ok(ods.worksheet_range(sheet)?),
        }
    }

    /// Read the configured name/type columns of `sheet` top-to-bottom,
    /// starting after the header offset. Cells outside the used range come
    /// back as empty strings.
    pub fn read_rows(
        &mut self,
        sheet: &str,
        config: &ExtractConfig,
    ) -> Result<Vec<Row>, WorkbookError> {
        let range = self.range(sheet)?;
        let mut rows = Vec::new();
        if let Some((last_row, _)) = range.end() {
            for row_index in (config.skip_rows as u32)..=last_row {
                let name = cell_at(&range, row_index, config.name_column as u32);
                let ty = cell_at(&range, row_index, config.type_column as u32);
                rows.push(Row::new(name, ty));
            }
        }
        Ok(rows)
    }
}

fn cell_at(range: &Range<Data>, row: u32, column: u32) -> String {
    range
        .get_value((row, column))
        .map(cell_to_string)
        .unwrap_or_default()
}

/// String content of a cell. Error cells count as missing, everything else
/// renders the way the sheet shows it.
fn cell_to_string(value: &Data) -> String {
    match value {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        Data::Bool(b) => b.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

/// Parse a column designator: a 0-based index ("1") or an Excel-style
/// letter ("B").
pub fn parse_column(designator: &str) -> Option<usize> {
    let designator = designator.trim();
    if designator.is_empty() {
        return None;
    }
    if let Ok(index) = designator.parse::<usize>() {
        return Some(index);
    }
    let mut index: usize = 0;
    for c in designator.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        index = index * 26 + digit;
    }
    Some(index - 1)
}
