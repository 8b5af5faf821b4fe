//! Message types and codec registry for the Stride liquid-staking (stakeibc)
//! module.
//!
//! Two registries are exposed, both as the closed [`StakeibcMsg`] sum type:
//! + the service registry, keyed by protobuf `Any` type URL
//!   (`/stride.stakeibc.Msg*`), which accepts every message
//! + the legacy JSON registry, keyed by `stakeibc/*` tags, which accepts
//!   every message except [`msgs::MsgClearBalance`]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    rust_2018_idioms
)]

pub mod codec;
pub mod error;
pub mod msgs;

pub use codec::StakeibcMsg;
pub use error::CodecError;
pub use msgs::StakeibcMessage;

/// Module identifier for the stakeibc application.
pub const MODULE_ID_STR: &str = "stakeibc";
