use crate::error::{ConversionError, Result};
use crate::models::Table;
use crate::utils::constants::UTF8_BOM;
use encoding_rs::{UTF_8, WINDOWS_1252};
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Character encodings tried when loading a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SourceEncoding {
    /// UTF-8 starting with a byte-order mark
    Utf8Bom,
    Utf8,
    Windows1252,
    /// ISO-8859-1. Windows-1252 decodes every byte, so this is only reached
    /// when listed before it through `TableLoader::with_encodings`.
    Latin1,
}

impl SourceEncoding {
    pub const PROBE_ORDER: [SourceEncoding; 4] = [
        SourceEncoding::Utf8Bom,
        SourceEncoding::Utf8,
        SourceEncoding::Windows1252,
        SourceEncoding::Latin1,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SourceEncoding::Utf8Bom => "utf-8-sig",
            SourceEncoding::Utf8 => "utf-8",
            SourceEncoding::Windows1252 => "cp1252",
            SourceEncoding::Latin1 => "latin-1",
        }
    }

    /// Decode the whole input, or `None` if the bytes are not valid in this encoding.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
        match self {
            SourceEncoding::Utf8Bom => {
                let body = bytes.strip_prefix(UTF8_BOM)?;
                UTF_8.decode_without_bom_handling_and_without_replacement(body)
            }
            SourceEncoding::Utf8 => UTF_8.decode_without_bom_handling_and_without_replacement(bytes),
            SourceEncoding::Windows1252 => {
                WINDOWS_1252.decode_without_bom_handling_and_without_replacement(bytes)
            }
            SourceEncoding::Latin1 => Some(encoding_rs::mem::decode_latin1(bytes)),
        }
    }
}

impl fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Field separators tried when loading a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Separator {
    Semicolon,
    Comma,
    Tab,
}

impl Separator {
    pub const PROBE_ORDER: [Separator; 3] = [Separator::Semicolon, Separator::Comma, Separator::Tab];

    pub fn as_byte(&self) -> u8 {
        match self {
            Separator::Semicolon => b';',
            Separator::Comma => b',',
            Separator::Tab => b'\t',
        }
    }

    pub fn as_char(&self) -> char {
        char::from(self.as_byte())
    }

    pub fn from_char(c: char) -> Option<Self> {
        Self::PROBE_ORDER.into_iter().find(|s| s.as_char() == c)
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Separator::Tab => write!(f, "\\t"),
            other => write!(f, "{}", other.as_char()),
        }
    }
}

/// A table together with the encoding and separator that produced it.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: Table,
    pub encoding: SourceEncoding,
    pub separator: Separator,
}

/// Loads delimited text tables of unknown encoding and separator by trying
/// each (encoding, separator) pair in priority order.
pub struct TableLoader {
    encodings: Vec<SourceEncoding>,
    separators: Vec<Separator>,
}

impl TableLoader {
    pub fn new() -> Self {
        Self {
            encodings: SourceEncoding::PROBE_ORDER.to_vec(),
            separators: Separator::PROBE_ORDER.to_vec(),
        }
    }

    pub fn with_encodings(mut self, encodings: Vec<SourceEncoding>) -> Self {
        self.encodings = encodings;
        self
    }

    pub fn with_separators(mut self, separators: Vec<Separator>) -> Self {
        self.separators = separators;
        self
    }

    /// Read a file and accept the first combination that decodes cleanly and
    /// yields more than one column.
    pub fn load(&self, path: &Path) -> Result<LoadedTable> {
        let bytes = std::fs::read(path).map_err(|e| ConversionError::TableLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        self.load_bytes(&bytes).ok_or_else(|| ConversionError::TableLoad {
            path: path.to_path_buf(),
            message: format!(
                "no combination of encodings [{}] and separators [{}] produced a table with more than one column",
                join_display(&self.encodings),
                join_display(&self.separators)
            ),
        })
    }

    pub fn load_bytes(&self, bytes: &[u8]) -> Option<LoadedTable> {
        for &encoding in &self.encodings {
            let text = match encoding.decode(bytes) {
                Some(text) => text,
                None => {
                    debug!("Encoding {} rejected", encoding);
                    continue;
                }
            };

            for &separator in &self.separators {
                match parse_table(&text, separator) {
                    Ok(table) => {
                        debug!(
                            "Accepted encoding {} with separator '{}' ({} columns, {} rows)",
                            encoding,
                            separator,
                            table.column_count(),
                            table.row_count()
                        );
                        return Some(LoadedTable {
                            table,
                            encoding,
                            separator,
                        });
                    }
                    Err(reason) => {
                        debug!("Encoding {} with separator '{}': {}", encoding, separator, reason);
                    }
                }
            }
        }

        None
    }
}

impl Default for TableLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse decoded text with one separator. Rows wider than the header are
/// rejected; shorter rows are padded with empty cells.
fn parse_table(text: &str, separator: Separator) -> std::result::Result<Table, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(separator.as_byte())
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| e.to_string())?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.len() <= 1 {
        return Err(format!("only {} column(s)", headers.len()));
    }

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| e.to_string())?;
        if record.len() > headers.len() {
            return Err(format!(
                "row {} has {} fields, header has {}",
                index + 1,
                record.len(),
                headers.len()
            ));
        }

        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    Ok(Table::new(headers, rows))
}

fn join_display<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
