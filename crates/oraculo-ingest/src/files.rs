//! Uploaded-file loaders (CSV, PDF, TXT).
//!
//! The underlying parsers want a path, not a buffer, so uploads are
//! spilled to a named temp file with the matching extension. The temp
//! file is removed on every exit path when the guard drops.

use std::io::Write;

use tempfile::NamedTempFile;

use crate::IngestError;

fn spill_to_temp(bytes: &[u8], extension: &str) -> Result<NamedTempFile, IngestError> {
    let mut temp = tempfile::Builder::new()
        .prefix("oraculo-upload-")
        .suffix(&format!(".{extension}"))
        .tempfile()?;
    temp.write_all(bytes)?;
    temp.flush()?;
    Ok(temp)
}

/// Render each CSV record as `header: value` lines, one fragment per
/// row, fragments joined with blank lines.
pub fn load_csv(bytes: &[u8]) -> Result<String, IngestError> {
    let temp = spill_to_temp(bytes, "csv")?;
    let mut reader =
        csv::Reader::from_path(temp.path()).map_err(|e| IngestError::Parse(e.to_string()))?;

    let headers = reader
        .headers()
        .map_err(|e| IngestError::Parse(e.to_string()))?
        .clone();

    let mut fragments = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::Parse(e.to_string()))?;
        let lines: Vec<String> = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| format!("{header}: {value}"))
            .collect();
        fragments.push(lines.join("\n"));
    }

    Ok(fragments.join("\n\n"))
}

/// Extract the text content of a PDF upload.
pub fn load_pdf(bytes: &[u8]) -> Result<String, IngestError> {
    let temp = spill_to_temp(bytes, "pdf")?;
    pdf_extract::extract_text(temp.path()).map_err(|e| IngestError::Parse(e.to_string()))
}

/// Read a plain-text upload as UTF-8.
pub fn load_txt(bytes: &[u8]) -> Result<String, IngestError> {
    let temp = spill_to_temp(bytes, "txt")?;
    std::fs::read_to_string(temp.path()).map_err(IngestError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_rows_become_labeled_fragments() {
        let csv = b"nome,idade\nAna,30\nBruno,25\n";
        let text = load_csv(csv).unwrap();
        assert_eq!(text, "nome: Ana\nidade: 30\n\nnome: Bruno\nidade: 25");
    }

    #[test]
    fn csv_with_ragged_rows_fails_cleanly() {
        let csv = b"a,b\n1,2,3\n";
        assert!(matches!(load_csv(csv), Err(IngestError::Parse(_))));
    }

    #[test]
    fn txt_roundtrips_utf8() {
        let text = load_txt("hello world\ncom acentuação".as_bytes()).unwrap();
        assert_eq!(text, "hello world\ncom acentuação");
    }

    #[test]
    fn txt_rejects_invalid_utf8() {
        assert!(load_txt(&[0xff, 0xfe, 0x00]).is_err());
    }

    #[test]
    fn pdf_garbage_fails_cleanly() {
        assert!(matches!(
            load_pdf(b"definitely not a pdf"),
            Err(IngestError::Parse(_))
        ));
    }

    #[test]
    fn temp_file_is_removed_after_load() {
        let temp_path = {
            let temp = spill_to_temp(b"abc", "txt").unwrap();
            temp.path().to_path_buf()
        };
        assert!(!temp_path.exists());
    }
}
