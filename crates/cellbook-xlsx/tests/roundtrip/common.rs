//! Shared helpers for the round-trip tests.

use std::io::Cursor;

use cellbook_core::Workbook;
use cellbook_xlsx::{XlsxReader, XlsxWriter};

/// Write `workbook` to an in-memory package and read it back.
pub fn roundtrip(workbook: &Workbook) -> Workbook {
    let mut cursor = Cursor::new(Vec::new());
    XlsxWriter::write(workbook, &mut cursor).expect("write package");
    cursor.set_position(0);
    XlsxReader::read(cursor).expect("read package")
}

/// Write `workbook` to a file in a temporary directory and read it back.
pub fn roundtrip_file(workbook: &Workbook) -> Workbook {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("roundtrip.xlsx");
    XlsxWriter::write_file(workbook, &path).expect("write file");
    XlsxReader::read_file(&path).expect("read file")
}
