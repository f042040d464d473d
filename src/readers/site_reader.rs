use crate::error::{ProcessingError, Result};
use crate::models::{RawRecord, RawTable};
use crate::utils::constants::DEFAULT_BUFFER_SIZE;
use encoding_rs::{Encoding, WINDOWS_1252};
use memmap2::Mmap;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Reads a site CSV export into a [`RawTable`] without interpreting any column.
pub struct SiteReader {
    use_mmap: bool,
}

impl SiteReader {
    pub fn new() -> Self {
        Self { use_mmap: false }
    }

    pub fn with_mmap(use_mmap: bool) -> Self {
        Self { use_mmap }
    }

    pub fn read_table(&self, path: &Path) -> Result<RawTable> {
        let table = if self.use_mmap {
            let file = File::open(path)?;
            let mmap = unsafe { Mmap::map(&file)? };
            Self::parse_bytes(&mmap)?
        } else {
            let file = File::open(path)?;
            let mut reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes)?;
            Self::parse_bytes(&bytes)?
        };

        debug!(
            file = %path.display(),
            columns = table.headers.len(),
            rows = table.len(),
            "Read site file"
        );
        Ok(table)
    }

    pub fn parse_bytes(bytes: &[u8]) -> Result<RawTable> {
        let text = decode(bytes);
        let mut csv_reader = Self::csv_builder().from_reader(text.as_bytes());

        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(ProcessingError::InvalidFormat(
                "File has no header row".to_string(),
            ));
        }

        let mut records = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            // Skip blank lines
            if record.iter().all(str::is_empty) {
                continue;
            }
            records.push(RawRecord::new(record.iter().map(str::to_string).collect()));
        }

        Ok(RawTable::new(headers, records))
    }

    fn csv_builder() -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All);
        builder
    }
}

impl Default for SiteReader {
    fn default() -> Self {
        Self::new()
    }
}

/// UTF-8 (BOM stripped) when valid, otherwise the BOM's encoding, otherwise Windows-1252.
fn decode(bytes: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return text;
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            let (text, _, _) = WINDOWS_1252.decode(bytes);
            text
        }
    }
}
