//! Save-then-load tests for cellbook-xlsx.
//!
//! Every test builds the workbook it needs in memory, writes it with
//! `XlsxWriter`, reads the bytes back with `XlsxReader` and checks that
//! the model survived the trip.

mod cells;
mod common;
mod sheet_features;
mod workbook;

pub use common::*;
