pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::storage::LocalStorage;
pub use config::{toml_config::TomlConfig, Settings};
pub use core::{
    catalog::Catalog,
    persistence::{FileRepository, LoadReport, SaveReport, SkipReason, SkippedLoan},
    shell::Shell,
};
pub use domain::model::{Book, BookRef, Borrower, BorrowerRef};
pub use domain::ports::{ConfigProvider, RecordFormat, Storage};
pub use utils::error::{LibraryError, LoanError, Result};
