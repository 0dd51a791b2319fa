use crate::error::{ConversionError, Result};
use crate::models::Table;
use crate::utils::constants::{DEFAULT_OUTPUT_DELIMITER, UTF8_BOM};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

#[cfg(unix)]
const OUTPUT_FILE_MODE: u32 = 0o644;

/// Writes tables as UTF-8 delimited text, by default with a byte-order mark
/// so spreadsheet programs pick the right encoding.
pub struct TableWriter {
    delimiter: u8,
    write_bom: bool,
}

impl TableWriter {
    pub fn new() -> Self {
        Self {
            delimiter: DEFAULT_OUTPUT_DELIMITER,
            write_bom: true,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_bom(mut self, write_bom: bool) -> Self {
        self.write_bom = write_bom;
        self
    }

    /// Serialize a table to bytes
    pub fn to_bytes(&self, table: &Table) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        if self.write_bom {
            buffer.extend_from_slice(UTF8_BOM);
        }

        {
            let mut writer = csv::WriterBuilder::new()
                .delimiter(self.delimiter)
                .from_writer(&mut buffer);
            writer.write_record(&table.headers)?;
            for row in &table.rows {
                writer.write_record(row)?;
            }
            writer.flush()?;
        }

        Ok(buffer)
    }

    /// Write to `path` through a temporary file in the same directory, so the
    /// destination only ever holds a complete table. Creates the directory.
    pub fn write(&self, table: &Table, path: &Path) -> Result<()> {
        let bytes = self
            .to_bytes(table)
            .map_err(|e| ConversionError::output_write(path, e))?;

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent).map_err(|e| ConversionError::output_write(path, e))?;

        let mut temp_file =
            NamedTempFile::new_in(parent).map_err(|e| ConversionError::output_write(path, e))?;
        temp_file
            .write_all(&bytes)
            .and_then(|_| temp_file.flush())
            .map_err(|e| ConversionError::output_write(path, e))?;
        set_readable_permissions(temp_file.as_file())
            .map_err(|e| ConversionError::output_write(path, e))?;
        temp_file
            .persist(path)
            .map_err(|e| ConversionError::output_write(path, e.error))?;

        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

/// Temporary files are created owner-only (0600); outputs get 0644.
#[cfg(unix)]
fn set_readable_permissions(file: &std::fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(OUTPUT_FILE_MODE))
}

#[cfg(not(unix))]
fn set_readable_permissions(_file: &std::fs::File) -> std::io::Result<()> {
    Ok(())
}

impl Default for TableWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn table() -> Table {
        Table::new(
            vec!["Nome".into(), "Longitude_DMS".into()],
            vec![vec!["P1".into(), "-45° 00' 00.00\"".into()]],
        )
    }

    #[test]
    fn test_bytes_start_with_bom_and_quote_dms() {
        let bytes = TableWriter::new().to_bytes(&table()).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));

        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(text, "Nome;Longitude_DMS\nP1;\"-45° 00' 00.00\"\"\"\n");
    }

    #[test]
    fn test_custom_delimiter_without_bom() {
        let bytes = TableWriter::new()
            .with_delimiter(b'\t')
            .with_bom(false)
            .to_bytes(&table())
            .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("Nome\tLongitude_DMS\n"));
    }

    #[test]
    fn test_write_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("out.csv");

        TableWriter::new().write(&table(), &path).unwrap();

        assert!(path.exists());
        let written = std::fs::read(&path).unwrap();
        assert!(written.starts_with(UTF8_BOM));
        // Only the output itself remains in the directory
        let entries = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_write_into_file_path_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let result = TableWriter::new().write(&table(), &blocker.join("out.csv"));
        assert!(matches!(result, Err(ConversionError::OutputWrite { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_written_file_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.csv");
        TableWriter::new().write(&table(), &path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }
}
