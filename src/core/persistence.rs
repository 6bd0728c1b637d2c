use crate::core::catalog::Catalog;
use crate::core::codec;
use crate::domain::ports::{RecordFormat, Storage};
use crate::utils::error::{LoanError, Result};

/// Why a line of the loans file did not turn into a loan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    UnknownBorrower,
    UnknownBook,
    /// Another loan line already re-attached this book.
    AlreadyHeld,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLoan {
    pub line: usize,
    pub identifier: String,
    pub title: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub books: usize,
    pub borrowers: usize,
    pub loans: usize,
    /// Lines with too few fields, in any of the three files.
    pub malformed_lines: usize,
    pub skipped_loans: Vec<SkippedLoan>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub books: usize,
    pub borrowers: usize,
    pub loans: usize,
}

pub struct FileRepository<S: Storage> {
    storage: S,
    format: RecordFormat,
}

impl<S: Storage> FileRepository<S> {
    pub fn new(storage: S, format: RecordFormat) -> Self {
        Self { storage, format }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Loads books, then borrowers, then replays loans into `catalog`.
    ///
    /// Missing files count as empty. On error `catalog` keeps whatever was
    /// added before the failing line.
    pub fn load(&self, catalog: &mut Catalog) -> Result<LoadReport> {
        let mut report = LoadReport::default();
        tracing::info!("Loading catalog ({} format)", self.format);

        let books_file = self.format.books_file();
        for (index, fields) in self.rows(books_file)?.iter().enumerate() {
            match codec::book_from_fields(fields, books_file, index + 1)? {
                Some(book) => {
                    catalog.add_book(book);
                    report.books += 1;
                }
                None => self.skip_malformed(&mut report, books_file, index + 1),
            }
        }

        let borrowers_file = self.format.borrowers_file();
        for (index, fields) in self.rows(borrowers_file)?.iter().enumerate() {
            match codec::borrower_from_fields(fields) {
                Some(borrower) => {
                    catalog.add_borrower(borrower);
                    report.borrowers += 1;
                }
                None => self.skip_malformed(&mut report, borrowers_file, index + 1),
            }
        }

        let loans_file = self.format.loans_file();
        for (index, fields) in self.rows(loans_file)?.iter().enumerate() {
            let Some((identifier, title)) = codec::loan_from_fields(fields) else {
                self.skip_malformed(&mut report, loans_file, index + 1);
                continue;
            };
            match replay_loan(catalog, identifier, title) {
                Ok(()) => report.loans += 1,
                Err(reason) => {
                    tracing::debug!(
                        "Skipping loan line {} ({} -> '{}'): {:?}",
                        index + 1,
                        identifier,
                        title,
                        reason
                    );
                    report.skipped_loans.push(SkippedLoan {
                        line: index + 1,
                        identifier: identifier.to_string(),
                        title: title.to_string(),
                        reason,
                    });
                }
            }
        }

        tracing::info!(
            "Loaded {} books, {} borrowers, {} loans ({} loan lines skipped)",
            report.books,
            report.borrowers,
            report.loans,
            report.skipped_loans.len()
        );
        Ok(report)
    }

    /// Overwrites the books, borrowers and loans files, in that order.
    pub fn save(&self, catalog: &Catalog) -> Result<SaveReport> {
        let books: Vec<Vec<String>> = catalog.books().iter().map(codec::book_fields).collect();
        self.write(self.format.books_file(), &books)?;

        let borrowers: Vec<Vec<String>> = catalog
            .borrowers()
            .iter()
            .map(codec::borrower_fields)
            .collect();
        self.write(self.format.borrowers_file(), &borrowers)?;

        let loans: Vec<Vec<String>> = catalog
            .loans()
            .into_iter()
            .map(|(identifier, title)| codec::loan_fields(identifier, title))
            .collect();
        self.write(self.format.loans_file(), &loans)?;

        let report = SaveReport {
            books: books.len(),
            borrowers: borrowers.len(),
            loans: loans.len(),
        };
        tracing::info!(
            "Saved {} books, {} borrowers, {} loans",
            report.books,
            report.borrowers,
            report.loans
        );
        Ok(report)
    }

    fn rows(&self, file: &str) -> Result<Vec<Vec<String>>> {
        if !self.storage.exists(file) {
            tracing::debug!("{} not found, starting empty", file);
            return Ok(Vec::new());
        }
        let data = self.storage.read_file(file)?;
        codec::read_rows(self.format, &data)
    }

    fn write(&self, file: &str, rows: &[Vec<String>]) -> Result<()> {
        let data = codec::write_rows(self.format, rows)?;
        tracing::debug!("Writing {} ({} rows, {} bytes)", file, rows.len(), data.len());
        self.storage.write_file(file, &data)
    }

    fn skip_malformed(&self, report: &mut LoadReport, file: &str, line: usize) {
        tracing::debug!("Skipping malformed line {} of {}", line, file);
        report.malformed_lines += 1;
    }
}

/// Re-attaches one persisted loan.
///
/// An on-loan book is stored with `available == false`, so it is put back on
/// the shelf before the ordinary borrow transition runs. A book stored as
/// available is lent directly.
fn replay_loan(
    catalog: &mut Catalog,
    identifier: &str,
    title: &str,
) -> std::result::Result<(), SkipReason> {
    let borrower = catalog.find_borrower_by_id(identifier);
    let book = catalog.find_book_by_title(title);
    let (Some(borrower), Some(book)) = (borrower, book) else {
        return Err(if borrower.is_none() {
            SkipReason::UnknownBorrower
        } else {
            SkipReason::UnknownBook
        });
    };

    if catalog.is_held(book) {
        return Err(SkipReason::AlreadyHeld);
    }
    if let Some(entry) = catalog.book_mut(book) {
        entry.set_available(true);
    }
    catalog.borrow(borrower, book).map_err(|e| match e {
        LoanError::UnknownBorrower => SkipReason::UnknownBorrower,
        _ => SkipReason::UnknownBook,
    })
}
