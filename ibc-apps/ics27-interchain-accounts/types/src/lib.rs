//! Domain types for the Interchain Accounts (ICS27) application.
//!
//! Note: to be consistent with the naming convention used across the
//! workspace, we use the following terminology:
//! + We call "chain A" the chain that runs as the controller chain for the
//!   interchain account application
//! + We call "chain B" the chain that runs as the host chain for the interchain
//!   account application
//!
//! In variable names:
//! + `_a` implies "belongs to chain A"
//! + `on_a` implies "stored on chain A"
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]

pub mod error;
pub mod metadata;
pub mod owner;
pub mod port;

pub use error::InterchainAccountError;
pub use metadata::{Metadata, SupportedEncoding, SupportedTxType};
pub use owner::AccountOwner;

/// Module identifier for the ICS27 application.
pub const MODULE_ID_STR: &str = "interchainaccounts";

/// ICS27 application current version.
pub const VERSION: &str = "ics27-1";
