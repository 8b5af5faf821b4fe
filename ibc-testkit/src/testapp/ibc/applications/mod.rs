pub mod ica_controller;
pub mod ica_host;
pub mod transfer;
