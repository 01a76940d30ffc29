//! Per-sheet features: layout, merges, validation, protection,
//! comments and images.

use crate::roundtrip;
use cellbook_core::{CellRange, ValidationRule, ValidationType, Workbook};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3];

#[test]
fn test_row_and_column_metadata() {
    let mut workbook = Workbook::new();
    let sheet = workbook.worksheet_mut(0).unwrap();
    sheet.set_row_height(2, 42.5).unwrap();
    sheet.hide_rows(5, 2).unwrap();
    sheet.set_column_width(3, 25.0).unwrap();
    sheet.hide_column(4).unwrap();
    sheet.set_value("A5", "hidden row with data").unwrap();

    let loaded = roundtrip(&workbook);
    let sheet = loaded.worksheet(0).unwrap();
    assert_eq!(sheet.row_height(2), 42.5);
    assert!(sheet.is_row_hidden(5));
    assert!(sheet.is_row_hidden(6));
    assert!(!sheet.is_row_hidden(7));
    assert_eq!(sheet.column_width(3), 25.0);
    assert!(sheet.is_column_hidden(4));
    assert!(!sheet.is_column_hidden(3));
}

#[test]
fn test_merges_and_freeze() {
    let mut workbook = Workbook::new();
    let sheet = workbook.worksheet_mut(0).unwrap();
    sheet.merge_cells("A1", "C1").unwrap();
    sheet.merge_cells("B3", "B6").unwrap();
    assert_eq!(sheet.freeze_pane(1, 2).unwrap(), "C2");

    let loaded = roundtrip(&workbook);
    let sheet = loaded.worksheet(0).unwrap();
    assert_eq!(
        sheet.merged_regions(),
        &[
            CellRange::parse("A1:C1").unwrap(),
            CellRange::parse("B3:B6").unwrap()
        ]
    );
    let freeze = sheet.freeze_state();
    assert_eq!((freeze.frozen_rows, freeze.frozen_columns), (1, 2));
}

#[test]
fn test_validations_roundtrip() {
    let mut workbook = Workbook::new();
    let sheet = workbook.worksheet_mut(0).unwrap();
    sheet
        .add_dropdown_list_validation("B2:B5", ["Low", "Medium", "High"])
        .unwrap();
    sheet
        .apply_validation(
            "C2",
            ValidationRule::range(ValidationType::Decimal, 0.5, 99.5)
                .unwrap()
                .with_error("Out of range", "Use 0.5 to 99.5"),
        )
        .unwrap();
    sheet
        .apply_validation(
            "D2:D3",
            ValidationRule::date_between(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            ),
        )
        .unwrap();
    sheet
        .apply_validation("E1", ValidationRule::custom_formula("=E1>0").unwrap())
        .unwrap();

    let loaded = roundtrip(&workbook);
    let sheet = loaded.worksheet(0).unwrap();
    assert_eq!(
        sheet.validations(),
        workbook.worksheet(0).unwrap().validations()
    );
    let rule = sheet.get_validation_rule("C2").unwrap().unwrap();
    assert_eq!(rule.error_title, "Out of range");
    assert_eq!(sheet.get_validation_rule("B4").unwrap().unwrap().options().map(|o| o.len()), Some(3));
}

#[test]
fn test_list_options_with_quotes_roundtrip() {
    let mut workbook = Workbook::new();
    let sheet = workbook.worksheet_mut(0).unwrap();
    sheet
        .add_dropdown_list_validation("A1", ["say \"hi\"", "plain", "\"\""])
        .unwrap();
    assert!(sheet
        .add_dropdown_list_validation("A2", ["Smith, J"])
        .is_err());

    let loaded = roundtrip(&workbook);
    let rule = loaded
        .worksheet(0)
        .unwrap()
        .get_validation_rule("A1")
        .unwrap()
        .unwrap();
    assert_eq!(
        rule.options().unwrap(),
        &["say \"hi\"".to_string(), "plain".to_string(), "\"\"".to_string()]
    );
}

#[test]
fn test_protection_roundtrip() {
    let mut workbook = Workbook::new();
    workbook.add_sheet("Open").unwrap();
    let sheet = workbook.worksheet_mut(0).unwrap();
    sheet.protect("s3cret");

    let loaded = roundtrip(&workbook);
    let protected = loaded.worksheet(0).unwrap();
    assert!(protected.is_protected());
    assert_eq!(
        protected.protection(),
        workbook.worksheet(0).unwrap().protection()
    );
    assert_eq!(
        protected.protection().unwrap().password().as_deref(),
        Some("s3cret")
    );
    assert!(!loaded.worksheet(1).unwrap().is_protected());
}

#[test]
fn test_comments_roundtrip() {
    let mut workbook = Workbook::new();
    let sheet = workbook.worksheet_mut(0).unwrap();
    sheet.add_comment("A1", "Ann", "first note").unwrap();
    sheet.add_comment("C7", "Bob", "multi\nline & <escaped>").unwrap();

    let loaded = roundtrip(&workbook);
    let sheet = loaded.worksheet(0).unwrap();
    let comments: Vec<_> = sheet.comments().map(|(a, c)| (a.to_string(), c.clone())).collect();
    let expected: Vec<_> = workbook
        .worksheet(0)
        .unwrap()
        .comments()
        .map(|(a, c)| (a.to_string(), c.clone()))
        .collect();
    assert_eq!(comments, expected);
}

#[test]
fn test_images_roundtrip_across_sheets() {
    let mut workbook = Workbook::new();
    workbook.add_sheet("Gallery").unwrap();
    workbook
        .worksheet_mut(0)
        .unwrap()
        .add_image(PNG_BYTES.to_vec(), "png", 2, 2, 5, 4)
        .unwrap();
    let gallery = workbook.worksheet_mut(1).unwrap();
    gallery.add_image(vec![0xFF, 0xD8, 0xFF], ".JPEG", 1, 1, 1, 1).unwrap();
    gallery.add_image(PNG_BYTES.to_vec(), "png", 10, 3, 12, 6).unwrap();

    let loaded = roundtrip(&workbook);
    for index in 0..2 {
        assert_eq!(
            loaded.worksheet(index).unwrap().images(),
            workbook.worksheet(index).unwrap().images(),
            "images of sheet {}",
            index
        );
    }
    let extracted = loaded.worksheet(1).unwrap().extract_images();
    assert_eq!(extracted[0], (vec![0xFF, 0xD8, 0xFF], "jpeg".to_string()));
}
