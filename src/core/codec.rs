use crate::domain::model::{Book, Borrower};
use crate::domain::ports::RecordFormat;
use crate::utils::error::{LibraryError, Result};

/// Splits persisted data into rows of fields.
///
/// Legacy rows follow plain comma splitting: no quoting, and trailing empty
/// fields are dropped, so `"Ana,"` yields a single field. Csv rows are read
/// with full quoting support and keep empty fields.
pub fn read_rows(format: RecordFormat, data: &[u8]) -> Result<Vec<Vec<String>>> {
    match format {
        RecordFormat::Legacy => {
            let text = String::from_utf8_lossy(data);
            Ok(text.lines().map(split_legacy).collect())
        }
        RecordFormat::Csv => {
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_reader(data);
            let mut rows = Vec::new();
            for record in reader.records() {
                let record = record?;
                rows.push(record.iter().map(str::to_string).collect());
            }
            Ok(rows)
        }
    }
}

pub fn write_rows(format: RecordFormat, rows: &[Vec<String>]) -> Result<Vec<u8>> {
    match format {
        RecordFormat::Legacy => {
            let mut out = String::new();
            for row in rows {
                out.push_str(&row.join(","));
                out.push('\n');
            }
            Ok(out.into_bytes())
        }
        RecordFormat::Csv => {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_writer(Vec::new());
            for row in rows {
                writer.write_record(row)?;
            }
            writer
                .into_inner()
                .map_err(|e| LibraryError::IoError(e.into_error()))
        }
    }
}

fn split_legacy(line: &str) -> Vec<String> {
    let mut fields: Vec<String> = line.split(',').map(str::to_string).collect();
    while fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    fields
}

pub fn book_fields(book: &Book) -> Vec<String> {
    vec![
        book.title().to_string(),
        book.author().to_string(),
        book.year().to_string(),
        book.genre().to_string(),
        book.is_available().to_string(),
    ]
}

/// `Ok(None)` for rows with fewer than five fields; extra fields are ignored.
pub fn book_from_fields(fields: &[String], file: &str, line: usize) -> Result<Option<Book>> {
    let [title, author, year, genre, available, ..] = fields else {
        return Ok(None);
    };
    let year: i32 = year.parse().map_err(|e| LibraryError::RecordParse {
        file: file.to_string(),
        line,
        message: format!("invalid year '{}': {}", year, e),
    })?;

    let mut book = Book::new(title.as_str(), author.as_str(), year, genre.as_str());
    book.set_available(available.eq_ignore_ascii_case("true"));
    Ok(Some(book))
}

pub fn borrower_fields(borrower: &Borrower) -> Vec<String> {
    vec![
        borrower.name().to_string(),
        borrower.identifier().to_string(),
    ]
}

pub fn borrower_from_fields(fields: &[String]) -> Option<Borrower> {
    match fields {
        [name, identifier, ..] => Some(Borrower::new(name.as_str(), identifier.as_str())),
        _ => None,
    }
}

pub fn loan_fields(identifier: &str, title: &str) -> Vec<String> {
    vec![identifier.to_string(), title.to_string()]
}

/// Returns `(borrower identifier, book title)`.
pub fn loan_from_fields(fields: &[String]) -> Option<(&str, &str)> {
    match fields {
        [identifier, title, ..] => Some((identifier.as_str(), title.as_str())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_legacy_rows_drop_trailing_empty_fields() {
        let rows = read_rows(RecordFormat::Legacy, b"Ana,U1\nBea,\n\nCarl,U3,extra\r\n").unwrap();
        assert_eq!(rows[0], row(&["Ana", "U1"]));
        assert_eq!(rows[1], row(&["Bea"]));
        assert!(rows[2].is_empty());
        assert_eq!(rows[3], row(&["Carl", "U3", "extra"]));
    }

    #[test]
    fn test_legacy_keeps_inner_empty_fields() {
        let rows = read_rows(RecordFormat::Legacy, b"Title,Author,1999,,true").unwrap();
        assert_eq!(rows[0].len(), 5);
        let book = book_from_fields(&rows[0], "books.txt", 1).unwrap().unwrap();
        assert_eq!(book.genre(), "");
    }

    #[test]
    fn test_legacy_writer_does_not_escape() {
        let data = write_rows(RecordFormat::Legacy, &[row(&["Smith, John", "U9"])]).unwrap();
        assert_eq!(data, b"Smith, John,U9\n");
    }

    #[test]
    fn test_csv_preserves_commas_and_quotes() {
        let rows = vec![row(&["Smith, John", "U9"]), row(&["Say \"hi\"", "U10"])];
        let data = write_rows(RecordFormat::Csv, &rows).unwrap();
        assert_eq!(read_rows(RecordFormat::Csv, &data).unwrap(), rows);
    }

    #[test]
    fn test_book_from_fields() {
        let fields = row(&["Dune", "Herbert", "1965", "Sci-Fi", "FALSE"]);
        let book = book_from_fields(&fields, "books.txt", 1).unwrap().unwrap();
        assert_eq!(book.title(), "Dune");
        assert!(!book.is_available());

        let fields = row(&["Dune", "Herbert", "1965", "Sci-Fi", "TRUE"]);
        assert!(book_from_fields(&fields, "books.txt", 1).unwrap().unwrap().is_available());

        let fields = row(&["Dune", "Herbert", "1965", "Sci-Fi", "yes"]);
        assert!(!book_from_fields(&fields, "books.txt", 1).unwrap().unwrap().is_available());
    }

    #[test]
    fn test_book_from_fields_short_row_is_skipped() {
        let fields = row(&["Dune", "Herbert", "1965"]);
        assert!(book_from_fields(&fields, "books.txt", 1).unwrap().is_none());
    }

    #[test]
    fn test_book_from_fields_bad_year() {
        let fields = row(&["Dune", "Herbert", "mid-sixties", "Sci-Fi", "true"]);
        let err = book_from_fields(&fields, "books.txt", 4).unwrap_err();
        match err {
            LibraryError::RecordParse { file, line, .. } => {
                assert_eq!(file, "books.txt");
                assert_eq!(line, 4);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_borrower_and_loan_rows() {
        let borrower = borrower_from_fields(&row(&["Ana", "U1"])).unwrap();
        assert_eq!(borrower_fields(&borrower), row(&["Ana", "U1"]));
        assert!(borrower_from_fields(&row(&["Ana"])).is_none());

        let fields = loan_fields("U1", "1984");
        assert_eq!(loan_from_fields(&fields), Some(("U1", "1984")));
        assert!(loan_from_fields(&row(&["U1"])).is_none());
    }
}
