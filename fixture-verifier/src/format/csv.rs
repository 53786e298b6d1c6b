//! CSV decoder: every record, header included, as a list of string rows.

use ::csv::ReaderBuilder;

use crate::error::VerifyError;
use crate::format::FormatKind;

/// Read all records without treating the first row as a header.
///
/// Rows may have differing lengths.
///
/// # Errors
///
/// Returns a decode error on malformed quoting or invalid UTF-8.
pub fn decode_csv(bytes: &[u8], resource: &str) -> Result<Vec<Vec<String>>, VerifyError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| VerifyError::decode(resource, FormatKind::Csv, e))?;
        rows.push(record.iter().map(str::to_owned).collect());
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_csv_keeps_header_row() {
        let rows = decode_csv(b"Name,Surname\nIvan,Ivanov\nPetr,Petrov\n", "student.csv").unwrap();
        assert_eq!(
            rows,
            vec![
                vec!["Name", "Surname"],
                vec!["Ivan", "Ivanov"],
                vec!["Petr", "Petrov"],
            ]
        );
    }

    #[test]
    fn test_decode_csv_flexible_and_quoted() {
        let rows = decode_csv(b"a,\"b,c\"\nsingle\n", "mixed.csv").unwrap();
        assert_eq!(rows[0], vec!["a", "b,c"]);
        assert_eq!(rows[1], vec!["single"]);
    }

    #[test]
    fn test_decode_csv_invalid_utf8_is_decode_error() {
        let err = decode_csv(b"ok,\xff\xfe\n", "bad.csv").unwrap_err();
        assert!(matches!(
            err,
            VerifyError::Decode {
                kind: FormatKind::Csv,
                ..
            }
        ));
    }
}
