use std::fmt;

/// Stable handle of a book inside a [`Catalog`](crate::core::catalog::Catalog).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BookRef(pub(crate) usize);

/// Stable handle of a borrower inside a [`Catalog`](crate::core::catalog::Catalog).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BorrowerRef(pub(crate) usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    title: String,
    author: String,
    year: i32,
    genre: String,
    available: bool,
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        genre: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year,
            genre: genre.into(),
            available: true,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    // Only the loan transitions and the loader flip availability.
    pub(crate) fn set_available(&mut self, available: bool) {
        self.available = available;
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Title: {}", self.title)?;
        writeln!(f, "Author: {}", self.author)?;
        writeln!(f, "Year: {}", self.year)?;
        writeln!(f, "Genre: {}", self.genre)?;
        writeln!(f, "Available: {}", if self.available { "Yes" } else { "No" })?;
        write!(f, "------------------------")
    }
}

/// A registered library user. Held books are stored as handles into the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Borrower {
    name: String,
    identifier: String,
    held_books: Vec<BookRef>,
}

impl Borrower {
    pub fn new(name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identifier: identifier.into(),
            held_books: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn held_books(&self) -> &[BookRef] {
        &self.held_books
    }

    pub fn holds(&self, book: BookRef) -> bool {
        self.held_books.contains(&book)
    }

    pub(crate) fn push_held(&mut self, book: BookRef) {
        self.held_books.push(book);
    }

    /// Removes the first occurrence of `book`; returns whether it was held.
    pub(crate) fn remove_held(&mut self, book: BookRef) -> bool {
        match self.held_books.iter().position(|held| *held == book) {
            Some(index) => {
                self.held_books.remove(index);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_book_is_available() {
        let book = Book::new("Dune", "Herbert", 1965, "Sci-Fi");
        assert!(book.is_available());
        assert_eq!(book.year(), 1965);
    }

    #[test]
    fn test_book_display_renders_availability() {
        let mut book = Book::new("1984", "Orwell", 1949, "Dystopian");
        let shown = book.to_string();
        assert!(shown.contains("Title: 1984"));
        assert!(shown.contains("Available: Yes"));

        book.set_available(false);
        assert!(book.to_string().contains("Available: No"));
    }

    #[test]
    fn test_remove_held_only_first_match() {
        let mut borrower = Borrower::new("Ana", "U1");
        borrower.push_held(BookRef(0));
        borrower.push_held(BookRef(3));

        assert!(borrower.remove_held(BookRef(0)));
        assert!(!borrower.remove_held(BookRef(0)));
        assert_eq!(borrower.held_books(), &[BookRef(3)]);
    }
}
