//! Workbook-level state: sheet order, identities, visibility, the active
//! tab and document properties.

use crate::roundtrip;
use cellbook_core::{CellValue, DocumentProperties, SheetId, SheetVisibility, Workbook};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;

#[test]
fn test_sheet_order_ids_and_visibility() {
    let mut workbook = Workbook::new();
    workbook.add_sheet("Data").unwrap();
    workbook.add_sheet("Scratch").unwrap();
    workbook.copy_sheet("Data", "Data (2)").unwrap();
    workbook.remove_sheet("Scratch").unwrap();
    workbook.reorder_sheets("Data (2)", 0).unwrap();
    workbook.rename_sheet("Sheet1", "Summary").unwrap();
    workbook
        .set_visibility("Data", SheetVisibility::VeryHidden)
        .unwrap();
    workbook.set_active_sheet(1).unwrap();

    let loaded = roundtrip(&workbook);
    assert_eq!(loaded.sheet_names(), vec!["Data (2)", "Summary", "Data"]);
    let ids: Vec<SheetId> = loaded.worksheets().map(|s| s.id()).collect();
    assert_eq!(ids, vec![SheetId(4), SheetId(1), SheetId(2)]);
    assert_eq!(
        loaded.worksheet_by_name("Data").unwrap().visibility(),
        SheetVisibility::VeryHidden
    );
    assert_eq!(loaded.active_sheet(), 1);
}

#[test]
fn test_ids_keep_growing_after_load() {
    let mut workbook = Workbook::new();
    workbook.add_sheet("Two").unwrap();
    workbook.add_sheet("Three").unwrap();
    workbook.remove_sheet("Three").unwrap();

    let mut loaded = roundtrip(&workbook);
    let index = loaded.add_sheet("Four").unwrap();
    let id = loaded.worksheet(index).unwrap().id();
    assert!(id > SheetId(2), "fresh id {} must not reuse an existing one", id);
}

#[test]
fn test_document_properties_roundtrip() {
    let created = NaiveDate::from_ymd_opt(2022, 2, 3)
        .unwrap()
        .and_hms_opt(4, 5, 6)
        .unwrap();
    let mut workbook = Workbook::new();
    workbook.set_properties(DocumentProperties {
        author: Some("Ann Example".into()),
        title: Some("Quarterly & Annual".into()),
        created_date: Some(created),
        modified_by: Some("Bob".into()),
        modified_date: Some(created),
        subject: Some("Numbers".into()),
    });

    let loaded = roundtrip(&workbook);
    assert_eq!(loaded.properties(), workbook.properties());
}

#[test]
fn test_copied_sheet_is_independent() {
    let mut workbook = Workbook::new();
    workbook
        .worksheet_mut(0)
        .unwrap()
        .set_value("A1", "original")
        .unwrap();
    workbook.copy_sheet("Sheet1", "Copy").unwrap();
    workbook
        .worksheet_by_name_mut("Copy")
        .unwrap()
        .set_value("A1", "changed")
        .unwrap();

    let loaded = roundtrip(&workbook);
    assert_eq!(
        loaded.worksheet_by_name("Sheet1").unwrap().get_value("A1").unwrap(),
        CellValue::text("original")
    );
    assert_eq!(
        loaded.worksheet_by_name("Copy").unwrap().get_value("A1").unwrap(),
        CellValue::text("changed")
    );
}
