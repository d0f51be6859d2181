//! # filesync
//!
//! Keeps versioned copies of changed files in a `saves` subdirectory.
//!
//! ## How it works
//!
//! - **Scanner**: lists files matching a glob directly inside a directory and
//!   inside its `saves` subdirectory, hashing each with SHA-256
//! - **Versioner**: skips files whose content is already saved and copies the
//!   rest to `saves/{stem}__saved_{NNN}{ext}`, continuing each file's
//!   version sequence without collisions
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use filesync::scanner::Scanner;
//! use filesync::versioner::diff_and_save;
//!
//! # fn main() -> filesync::Result<()> {
//! let scan = Scanner::new("*.txt")?.scan("./notes")?;
//! let created = diff_and_save(&scan.current, &scan.saved, &scan.saves_dir, false)?;
//! println!("Saved {} files", created.len());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod hash;
pub mod logging;
pub mod record;
pub mod report;
pub mod scanner;
pub mod versioned;
pub mod versioner;

// Re-export commonly used types
pub use error::{Error, Result};
pub use hash::ContentHash;
pub use record::FileRecord;
pub use scanner::{scan, ScanResult, Scanner};
pub use versioned::VersionedName;
pub use versioner::{diff_and_save, VersionPlan};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
