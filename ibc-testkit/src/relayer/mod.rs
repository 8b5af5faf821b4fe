pub mod builder;
pub mod driver;
pub mod error;
pub mod ops;
pub mod path;
pub mod registry;
pub mod reuse;
