//! Shell automation provider: open file-browsing surfaces and their selection.
//!
//! Platform implementations:
//! - Windows: COM shell windows collection (`com.rs`)
//! - Other platforms: Always unavailable (`unsupported.rs`)

#[cfg(windows)]
mod com;

#[cfg(not(windows))]
mod unsupported;

#[cfg(windows)]
pub use self::com::{ComApartment, ShellAutomation};

#[cfg(not(windows))]
pub use self::unsupported::Unsupported as ShellAutomation;
