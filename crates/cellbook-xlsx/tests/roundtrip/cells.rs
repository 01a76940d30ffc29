//! Cell values, formulas and styles.

use crate::{roundtrip, roundtrip_file};
use cellbook_core::{
    BorderLineStyle, CellValue, Color, HorizontalAlignment, Style, VerticalAlignment, Workbook,
};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;

#[test]
fn test_text_survives_file_roundtrip() {
    let mut workbook = Workbook::new();
    workbook
        .worksheet_mut(0)
        .unwrap()
        .set_value("A1", "aaa A1")
        .unwrap();

    let loaded = roundtrip_file(&workbook);
    assert_eq!(
        loaded.worksheet(0).unwrap().get_value("A1").unwrap(),
        CellValue::text("aaa A1")
    );
}

#[test]
fn test_value_kinds() {
    let mut workbook = Workbook::new();
    let sheet = workbook.worksheet_mut(0).unwrap();
    sheet.set_value("A1", 3.25).unwrap();
    sheet.set_value("A2", -17).unwrap();
    sheet.set_value("A3", "  leading and trailing  ").unwrap();
    sheet.set_value("A4", "line one\nline two\ttabbed").unwrap();
    sheet.set_value("A5", "ctrl\u{1}char and _x0041_ lookalike").unwrap();
    sheet.set_value("A6", "<tag> & \"quotes\"").unwrap();
    let when = NaiveDate::from_ymd_opt(2023, 11, 5)
        .unwrap()
        .and_hms_opt(8, 30, 15)
        .unwrap();
    sheet.set_value("B1", when).unwrap();
    sheet
        .set_value("B2", NaiveDate::from_ymd_opt(1900, 1, 15).unwrap())
        .unwrap();

    let loaded = roundtrip(&workbook);
    let sheet = loaded.worksheet(0).unwrap();
    for addr in ["A1", "A2", "A3", "A4", "A5", "A6", "B1", "B2"] {
        assert_eq!(
            sheet.get_value(addr).unwrap(),
            workbook.worksheet(0).unwrap().get_value(addr).unwrap(),
            "value at {}",
            addr
        );
    }
    assert_eq!(sheet.get_value("B1").unwrap().as_datetime(), Some(when));
}

#[test]
fn test_shared_strings_keep_indices() {
    let mut workbook = Workbook::new();
    let first = workbook.shared_strings_mut().intern("alpha");
    let second = workbook.shared_strings_mut().intern("beta");
    assert_eq!(workbook.shared_strings_mut().intern("alpha"), first);

    let sheet = workbook.worksheet_mut(0).unwrap();
    sheet.set_value("A1", CellValue::SharedTextRef(second)).unwrap();
    sheet.set_value("A2", CellValue::SharedTextRef(first)).unwrap();

    let loaded = roundtrip(&workbook);
    assert_eq!(loaded.shared_strings().len(), 2);
    let sheet = loaded.worksheet(0).unwrap();
    assert_eq!(
        sheet.get_value("A1").unwrap(),
        CellValue::SharedTextRef(second)
    );
    assert_eq!(
        loaded.resolve_text(&sheet.get_value("A2").unwrap()),
        Some("alpha")
    );
}

#[test]
fn test_formulas_keep_text_and_cached_value() {
    let mut workbook = Workbook::new();
    let sheet = workbook.worksheet_mut(0).unwrap();
    sheet.set_value("A1", 2).unwrap();
    sheet.put_formula("B1", "=A1*2").unwrap();
    sheet.set_value("C1", "HI").unwrap();
    sheet.put_formula("C1", "UPPER(\"hi\")").unwrap();

    let loaded = roundtrip(&workbook);
    let sheet = loaded.worksheet(0).unwrap();
    assert_eq!(sheet.get_formula("B1").unwrap(), Some("A1*2"));
    assert_eq!(sheet.get_value("B1").unwrap(), CellValue::Empty);
    assert_eq!(sheet.get_formula("C1").unwrap(), Some("UPPER(\"hi\")"));
    assert_eq!(sheet.get_value("C1").unwrap(), CellValue::text("HI"));
}

#[test]
fn test_style_indices_roundtrip() {
    let mut workbook = Workbook::new();
    workbook
        .update_default_style("Calibri", 11.0, "#333333", None, None)
        .unwrap();
    let title = workbook
        .create_style(
            "Georgia",
            18.0,
            "#F00",
            Some(HorizontalAlignment::Center),
            Some(VerticalAlignment::Center),
        )
        .unwrap();
    let boxed = workbook
        .styles_mut()
        .push(
            Style::new()
                .fill_color(Color::YELLOW)
                .border(BorderLineStyle::Medium),
        )
        .unwrap();

    workbook.worksheet_mut(0).unwrap().set_value("A1", "Title").unwrap();
    workbook.set_cell_style("Sheet1", "A1", title).unwrap();
    workbook.set_cell_style("Sheet1", "B2", boxed).unwrap();

    let loaded = roundtrip(&workbook);
    assert_eq!(loaded.styles().len(), 3);
    for (index, style) in workbook.styles().iter() {
        assert_eq!(loaded.styles().get(index), Some(style), "style {}", index);
    }

    let sheet = loaded.worksheet(0).unwrap();
    assert_eq!(sheet.cell_style_index("A1").unwrap(), title);
    assert_eq!(sheet.cell_style_index("B2").unwrap(), boxed);
    assert_eq!(sheet.get_value("B2").unwrap(), CellValue::Empty);
}

#[test]
fn test_structural_edit_before_save() {
    let mut workbook = Workbook::new();
    let sheet = workbook.worksheet_mut(0).unwrap();
    sheet.set_value("A10", "moves").unwrap();
    sheet.set_value("C1", "shifts left").unwrap();
    sheet.insert_rows(5, 3).unwrap();
    sheet.delete_columns(2, 1).unwrap();

    let loaded = roundtrip(&workbook);
    let sheet = loaded.worksheet(0).unwrap();
    assert_eq!(sheet.get_value("A13").unwrap(), CellValue::text("moves"));
    assert_eq!(sheet.get_value("B1").unwrap(), CellValue::text("shifts left"));
    assert_eq!(sheet.cell_count(), 2);
}
