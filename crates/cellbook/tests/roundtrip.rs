//! End-to-end load/edit/save cycles through real files

use cellbook::prelude::*;
use cellbook::SheetProtection;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;

#[test]
fn test_text_cell_survives_save_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hello.xlsx");

    let mut workbook = Workbook::new();
    workbook
        .worksheet_mut(0)
        .unwrap()
        .set_value("A1", "aaa A1")
        .unwrap();
    workbook.save(&path).unwrap();

    let loaded = Workbook::open(&path).unwrap();
    let value = loaded.worksheet(0).unwrap().get_value("A1").unwrap();
    assert_eq!(value, CellValue::text("aaa A1"));
    assert!(matches!(value, CellValue::Text(_)));
}

#[test]
fn test_document_edit_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.xlsx");

    let mut doc = Document::new();
    {
        let sheet = doc.worksheet_mut(0).unwrap();
        sheet.set_value("A1", "Region").unwrap();
        sheet.set_value("B1", "Total").unwrap();
        sheet.set_value("A2", "North").unwrap();
        sheet.set_value("B2", 1250.5).unwrap();
        sheet.put_formula("B3", "SUM(B2:B2)").unwrap();
    }
    doc.save_as(&path).unwrap();
    assert_eq!(doc.path(), Some(path.as_path()));

    let mut doc = Document::open(&path).unwrap();
    {
        let sheet = doc.worksheet_mut(0).unwrap();
        sheet.insert_rows(2, 1).unwrap();
        sheet.set_value("A2", "East").unwrap();
        sheet.set_value("B2", 80).unwrap();
    }
    doc.add_sheet("Notes").unwrap();
    doc.save().unwrap();

    let workbook = Document::open(&path).unwrap().into_workbook();
    assert_eq!(workbook.sheet_names(), vec!["Sheet1", "Notes"]);
    let sheet = workbook.worksheet(0).unwrap();
    assert_eq!(sheet.get_value("A3").unwrap(), CellValue::text("North"));
    assert_eq!(sheet.get_value("B3").unwrap(), CellValue::Number(1250.5));
    assert_eq!(sheet.get_value("B2").unwrap(), CellValue::Number(80.0));
    assert_eq!(sheet.get_formula("B4").unwrap(), Some("SUM(B2:B2)"));
}

#[test]
fn test_full_sheet_survives_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("full.xlsx");

    let mut workbook = Workbook::new();
    let header = workbook
        .create_style(
            "Arial",
            14.0,
            "#1F4E79",
            Some(HorizontalAlignment::Center),
            None,
        )
        .unwrap();
    {
        let sheet = workbook.worksheet_mut(0).unwrap();
        sheet.set_value("A1", "Quarterly figures").unwrap();
        sheet.merge_cells("A1", "D1").unwrap();
        sheet.freeze_pane(1, 1).unwrap();
        sheet.set_column_width(1, 30.0).unwrap();
        sheet.set_row_height(1, 24.0).unwrap();
        sheet
            .set_value("A2", NaiveDate::from_ymd_opt(2024, 3, 31).unwrap())
            .unwrap();
        sheet
            .get_range_mut("B2", "D2")
            .unwrap()
            .add_dropdown_list_validation(["Yes", "No"])
            .unwrap();
        sheet.add_comment("A2", "Ann", "quarter end").unwrap();
        sheet.protect("pw");
    }
    workbook.set_cell_style("Sheet1", "A1", header).unwrap();
    workbook.save(&path).unwrap();

    let loaded = Workbook::open(&path).unwrap();
    let sheet = loaded.worksheet(0).unwrap();
    assert_eq!(sheet.merged_regions(), &[CellRange::parse("A1:D1").unwrap()]);
    assert!(sheet.freeze_state().is_frozen());
    assert_eq!(sheet.column_width(1), 30.0);
    assert_eq!(sheet.row_height(1), 24.0);
    assert_eq!(
        sheet.get_value("A2").unwrap().as_datetime().map(|d| d.date()),
        NaiveDate::from_ymd_opt(2024, 3, 31)
    );
    assert_eq!(
        sheet.get_validation_rule("C2").unwrap(),
        workbook.worksheet(0).unwrap().get_validation_rule("C2").unwrap()
    );
    assert_eq!(sheet.comment("A2").unwrap().map(|c| c.text.as_str()), Some("quarter end"));
    assert_eq!(
        sheet.protection().map(SheetProtection::password),
        Some(Some("pw".to_string()))
    );
    assert_eq!(sheet.cell_style_index("A1").unwrap(), header);
    assert_eq!(loaded.styles().get(header), workbook.styles().get(header));
}

#[test]
fn test_unsupported_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.csv");

    let workbook = Workbook::new();
    assert!(matches!(
        workbook.save(&path),
        Err(Error::UnsupportedFormat(_))
    ));
    assert!(!path.exists());
    assert!(matches!(
        Workbook::open(&path),
        Err(Error::UnsupportedFormat(_))
    ));
}

#[test]
fn test_opening_garbage_reports_package_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.xlsx");
    std::fs::write(&path, b"not a zip archive").unwrap();

    assert!(matches!(Document::open(&path), Err(Error::Xlsx(_))));
    // the file handle is released, so the path can be replaced right away
    std::fs::remove_file(&path).unwrap();
    Workbook::new().save(&path).unwrap();
    assert!(Workbook::open(&path).is_ok());
}
