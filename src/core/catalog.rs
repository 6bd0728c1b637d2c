use crate::domain::model::{Book, BookRef, Borrower, BorrowerRef};
use crate::utils::error::LoanError;

/// In-memory owner of every book and borrower for one session.
///
/// Books live in an insertion-ordered arena and are never removed, so a
/// [`BookRef`] stays valid for the lifetime of the catalog. Borrowers keep
/// handles rather than copies; every transition goes through the catalog,
/// which keeps `available == false` exactly when some borrower holds the book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    books: Vec<Book>,
    borrowers: Vec<Borrower>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_book(&mut self, book: Book) -> BookRef {
        self.books.push(book);
        BookRef(self.books.len() - 1)
    }

    pub fn add_borrower(&mut self, borrower: Borrower) -> BorrowerRef {
        self.borrowers.push(borrower);
        BorrowerRef(self.borrowers.len() - 1)
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn borrowers(&self) -> &[Borrower] {
        &self.borrowers
    }

    pub fn book(&self, book: BookRef) -> Option<&Book> {
        self.books.get(book.0)
    }

    pub fn borrower(&self, borrower: BorrowerRef) -> Option<&Borrower> {
        self.borrowers.get(borrower.0)
    }

    /// Case-insensitive exact match; the first registered book wins.
    pub fn find_book_by_title(&self, title: &str) -> Option<BookRef> {
        self.books
            .iter()
            .position(|book| eq_ignore_case(book.title(), title))
            .map(BookRef)
    }

    pub fn find_borrower_by_id(&self, identifier: &str) -> Option<BorrowerRef> {
        self.borrowers
            .iter()
            .position(|borrower| borrower.identifier() == identifier)
            .map(BorrowerRef)
    }

    pub fn filter_books_by_genre(&self, genre: &str) -> Vec<&Book> {
        self.books
            .iter()
            .filter(|book| eq_ignore_case(book.genre(), genre))
            .collect()
    }

    pub fn filter_books_by_author(&self, author: &str) -> Vec<&Book> {
        self.books
            .iter()
            .filter(|book| eq_ignore_case(book.author(), author))
            .collect()
    }

    pub fn filter_books_by_availability(&self, available: bool) -> Vec<&Book> {
        self.books
            .iter()
            .filter(|book| book.is_available() == available)
            .collect()
    }

    /// Books currently held by `borrower`, in the order they were lent.
    pub fn held_books(&self, borrower: BorrowerRef) -> Vec<&Book> {
        self.borrower(borrower)
            .map(|b| {
                b.held_books()
                    .iter()
                    .filter_map(|book| self.book(*book))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every (borrower identifier, book title) pair, borrowers in catalog order.
    pub fn loans(&self) -> Vec<(&str, &str)> {
        self.borrowers
            .iter()
            .flat_map(|borrower| {
                borrower.held_books().iter().filter_map(move |book| {
                    self.book(*book)
                        .map(|b| (borrower.identifier(), b.title()))
                })
            })
            .collect()
    }

    pub fn is_held(&self, book: BookRef) -> bool {
        self.borrowers.iter().any(|borrower| borrower.holds(book))
    }

    /// Lends `book` to `borrower`. Availability is the only precondition.
    pub fn borrow(&mut self, borrower: BorrowerRef, book: BookRef) -> Result<(), LoanError> {
        if borrower.0 >= self.borrowers.len() {
            return Err(LoanError::UnknownBorrower);
        }
        let entry = self.books.get_mut(book.0).ok_or(LoanError::UnknownBook)?;
        if !entry.is_available() {
            return Err(LoanError::Unavailable {
                title: entry.title().to_string(),
            });
        }

        entry.set_available(false);
        self.borrowers[borrower.0].push_held(book);
        tracing::debug!(
            "Lent '{}' to {}",
            entry.title(),
            self.borrowers[borrower.0].identifier()
        );
        Ok(())
    }

    /// Takes `book` back from `borrower`; fails unless that borrower holds it.
    pub fn return_book(&mut self, borrower: BorrowerRef, book: BookRef) -> Result<(), LoanError> {
        let holder = self
            .borrowers
            .get_mut(borrower.0)
            .ok_or(LoanError::UnknownBorrower)?;
        let entry = self.books.get_mut(book.0).ok_or(LoanError::UnknownBook)?;
        if !holder.remove_held(book) {
            return Err(LoanError::NotHeld {
                title: entry.title().to_string(),
                borrower: holder.name().to_string(),
            });
        }

        entry.set_available(true);
        tracing::debug!("'{}' returned by {}", entry.title(), holder.identifier());
        Ok(())
    }

    pub(crate) fn book_mut(&mut self, book: BookRef) -> Option<&mut Book> {
        self.books.get_mut(book.0)
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
