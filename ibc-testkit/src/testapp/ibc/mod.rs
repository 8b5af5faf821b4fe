pub mod applications;
pub mod core;
