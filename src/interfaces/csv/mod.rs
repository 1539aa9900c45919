//! CSV batch input and output for quotes.

pub mod quote_reader;
pub mod quote_writer;
