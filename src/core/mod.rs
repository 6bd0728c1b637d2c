pub mod catalog;
pub mod codec;
pub mod persistence;
pub mod shell;

pub use crate::domain::model::{Book, BookRef, Borrower, BorrowerRef};
pub use crate::domain::ports::{ConfigProvider, RecordFormat, Storage};
pub use crate::utils::error::Result;
