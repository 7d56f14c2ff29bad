//! Meeting schedule server.
//!
//! Resolves a publication reference (language, publication, issue or an
//! explicit file URL) to a downloadable file, has it parsed, caches the
//! result for a week and returns the schedule, optionally narrowed to the
//! week containing a given date.

pub mod cache;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod domain;
pub mod parser;
pub mod service;
pub mod web;
