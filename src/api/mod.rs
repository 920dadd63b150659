//! REST client for the Opalite backend

pub mod client;
pub mod types;
pub mod worker;
