//! Command-line tools for MEDS schemas: schema listing, table conversion, and
//! dataset metadata validation.

pub mod cli;
pub mod commands;
pub mod io;
pub mod logging;
pub mod summary;
