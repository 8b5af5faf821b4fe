#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(
    warnings,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]
//! In-memory controller and host chains, a relayer that drives IBC
//! handshakes between them, and [`IbcSetup`], which opens transfer and
//! interchain-account channels over a shared client and connection.

pub mod config;
pub mod context;
pub mod fixtures;
pub mod hosts;
pub mod relayer;
pub mod testapp;

pub use context::IbcSetup;
