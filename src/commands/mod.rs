//! Command implementations for the CLI
//!
//! - start: Start the HTTP server
//! - test: Test configuration validity
//! - quote: Price a shipment from the command line

pub mod quote;
pub mod start;
