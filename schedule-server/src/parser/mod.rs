//! Publication parser client.
//!
//! Turning an EPUB or JWPUB file into schedule records is done by a separate
//! parser service. This module is the client side of that boundary.

mod client;
mod error;

pub use client::{ParserConfig, RemoteParser, ScheduleParser};
pub use error::ParserError;
