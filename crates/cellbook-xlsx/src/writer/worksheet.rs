//! Worksheet and comments part generation

use cellbook_core::{
    serial_to_datetime, Cell, CellValue, SharedStrings, ValidationCriteria, ValidationEntry,
    Worksheet, DEFAULT_COLUMN_WIDTH,
};

use crate::xml::{encode_excel_escapes, escape_xml, REL_NS, XML_HEADER};

/// Format used for `t="d"` cells
pub(crate) const ISO_DATETIME: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Relationship ids a sheet part refers to
#[derive(Debug, Default)]
pub(crate) struct SheetRels {
    pub drawing: Option<String>,
}

/// Generate `xl/worksheets/sheetN.xml`
pub(crate) fn write_sheet_xml(
    sheet: &Worksheet,
    shared_strings: &SharedStrings,
    tab_selected: bool,
    rels: &SheetRels,
) -> String {
    let mut content = String::from(XML_HEADER);
    content.push_str(&format!(
        "\n<worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" xmlns:r=\"{}\">",
        REL_NS
    ));

    write_sheet_views(&mut content, sheet, tab_selected);
    write_columns(&mut content, sheet);
    write_sheet_data(&mut content, sheet, shared_strings);
    write_protection(&mut content, sheet);

    let merged_regions = sheet.merged_regions();
    if !merged_regions.is_empty() {
        content.push_str(&format!(
            "\n    <mergeCells count=\"{}\">",
            merged_regions.len()
        ));
        for range in merged_regions {
            content.push_str(&format!("\n        <mergeCell ref=\"{}\"/>", range));
        }
        content.push_str("\n    </mergeCells>");
    }

    write_data_validations(&mut content, sheet.validations());

    if let Some(rid) = &rels.drawing {
        content.push_str(&format!("\n    <drawing r:id=\"{}\"/>", rid));
    }

    content.push_str("\n</worksheet>");
    content
}

fn write_sheet_views(content: &mut String, sheet: &Worksheet, tab_selected: bool) {
    let freeze = sheet.freeze_state();
    content.push_str("\n    <sheetViews>\n        <sheetView workbookViewId=\"0\"");
    if tab_selected {
        content.push_str(" tabSelected=\"1\"");
    }
    if !freeze.is_frozen() {
        content.push_str("/>\n    </sheetViews>");
        return;
    }
    content.push_str(">\n            <pane");
    if freeze.frozen_columns > 0 {
        content.push_str(&format!(" xSplit=\"{}\"", freeze.frozen_columns));
    }
    if freeze.frozen_rows > 0 {
        content.push_str(&format!(" ySplit=\"{}\"", freeze.frozen_rows));
    }
    let active_pane = match (freeze.frozen_rows > 0, freeze.frozen_columns > 0) {
        (true, true) => "bottomRight",
        (true, false) => "bottomLeft",
        _ => "topRight",
    };
    content.push_str(&format!(
        " topLeftCell=\"{}\" activePane=\"{}\" state=\"frozen\"/>",
        freeze.top_left_cell(),
        active_pane
    ));
    content.push_str("\n        </sheetView>\n    </sheetViews>");
}

fn write_columns(content: &mut String, sheet: &Worksheet) {
    let columns: Vec<_> = sheet
        .columns()
        .filter(|c| c.has_custom_settings())
        .collect();
    if columns.is_empty() {
        return;
    }
    content.push_str("\n    <cols>");
    for column in columns {
        let width = column.width.unwrap_or(DEFAULT_COLUMN_WIDTH);
        content.push_str(&format!(
            "\n        <col min=\"{0}\" max=\"{0}\" width=\"{1}\"",
            column.index(),
            width
        ));
        if column.width.is_some() {
            content.push_str(" customWidth=\"1\"");
        }
        if column.hidden {
            content.push_str(" hidden=\"1\"");
        }
        content.push_str("/>");
    }
    content.push_str("\n    </cols>");
}

fn write_sheet_data(content: &mut String, sheet: &Worksheet, shared_strings: &SharedStrings) {
    content.push_str("\n    <sheetData>");
    for row in sheet.rows() {
        if row.is_empty() && !row.has_custom_settings() {
            continue;
        }
        content.push_str(&format!("\n        <row r=\"{}\"", row.index()));
        if let Some(height) = row.height {
            content.push_str(&format!(" ht=\"{}\" customHeight=\"1\"", height));
        }
        if row.hidden {
            content.push_str(" hidden=\"1\"");
        }
        if row.is_empty() {
            content.push_str("/>");
            continue;
        }
        content.push('>');
        for (column, cell) in row.cells() {
            let Some(addr) = row.address_of(column) else {
                continue;
            };
            write_cell(content, &addr.to_string(), cell, shared_strings);
        }
        content.push_str("\n        </row>");
    }
    content.push_str("\n    </sheetData>");
}

fn write_cell(content: &mut String, cell_ref: &str, cell: &Cell, shared_strings: &SharedStrings) {
    let style_attr = if cell.style_index != 0 {
        format!(" s=\"{}\"", cell.style_index)
    } else {
        String::new()
    };
    let formula = cell
        .formula
        .as_deref()
        .map(|f| format!("<f>{}</f>", escape_xml(f)))
        .unwrap_or_default();

    let (type_attr, value) = match &cell.value {
        CellValue::Empty => (None, None),
        CellValue::Number(n) if n.is_finite() => (None, Some(n.to_string())),
        CellValue::Number(n) => {
            log::warn!("{}: writing non-finite number {} as an empty cell", cell_ref, n);
            (None, None)
        }
        CellValue::Text(s) if cell.formula.is_some() => (Some("str"), Some(text_xml(s))),
        CellValue::Text(s) => {
            content.push_str(&format!(
                "\n            <c r=\"{}\"{} t=\"inlineStr\"><is><t xml:space=\"preserve\">{}</t></is></c>",
                cell_ref,
                style_attr,
                text_xml(s)
            ));
            return;
        }
        CellValue::Date(serial) => match serial_to_datetime(*serial) {
            Some(dt) => (Some("d"), Some(dt.format(ISO_DATETIME).to_string())),
            None => {
                log::warn!(
                    "{}: date serial {} has no calendar date; writing it as a number",
                    cell_ref,
                    serial
                );
                (None, Some(serial.to_string()))
            }
        },
        CellValue::SharedTextRef(idx) => {
            if shared_strings.get(*idx).is_some() {
                (Some("s"), Some(idx.to_string()))
            } else {
                log::warn!(
                    "{}: shared string {} is outside the table; writing an empty cell",
                    cell_ref,
                    idx
                );
                (None, None)
            }
        }
    };

    if value.is_none() && formula.is_empty() {
        if cell.style_index != 0 {
            content.push_str(&format!("\n            <c r=\"{}\"{}/>", cell_ref, style_attr));
        }
        return;
    }

    let type_attr = type_attr
        .map(|t| format!(" t=\"{}\"", t))
        .unwrap_or_default();
    let value = value.map(|v| format!("<v>{}</v>", v)).unwrap_or_default();
    content.push_str(&format!(
        "\n            <c r=\"{}\"{}{}>{}{}</c>",
        cell_ref, style_attr, type_attr, formula, value
    ));
}

fn text_xml(s: &str) -> String {
    escape_xml(&encode_excel_escapes(s))
}

fn write_protection(content: &mut String, sheet: &Worksheet) {
    let Some(protection) = sheet.protection() else {
        return;
    };
    let flag = |b: bool| if b { "1" } else { "0" };

    content.push_str("\n    <sheetProtection");
    if !protection.password_token().is_empty() {
        content.push_str(&format!(
            " password=\"{}\"",
            escape_xml(protection.password_token())
        ));
    }
    for (name, value) in [
        ("sheet", protection.sheet),
        ("objects", protection.objects),
        ("scenarios", protection.scenarios),
        ("formatCells", protection.format_cells),
        ("formatColumns", protection.format_columns),
        ("formatRows", protection.format_rows),
        ("insertColumns", protection.insert_columns),
        ("insertRows", protection.insert_rows),
        ("deleteColumns", protection.delete_columns),
        ("deleteRows", protection.delete_rows),
        ("sort", protection.sort),
        ("autoFilter", protection.auto_filter),
    ] {
        content.push_str(&format!(" {}=\"{}\"", name, flag(value)));
    }
    content.push_str("/>");
}

fn write_data_validations(content: &mut String, validations: &[ValidationEntry]) {
    if validations.is_empty() {
        return;
    }

    content.push_str(&format!(
        "\n    <dataValidations count=\"{}\">",
        validations.len()
    ));

    for entry in validations {
        let rule = &entry.rule;
        let sqref = entry
            .ranges
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(" ");

        content.push_str(&format!(
            "\n        <dataValidation type=\"{}\"",
            rule.validation_type().xlsx_type()
        ));
        if matches!(rule.criteria(), ValidationCriteria::Range { .. }) {
            content.push_str(" operator=\"between\"");
        }
        content.push_str(" allowBlank=\"1\"");
        if let ValidationCriteria::List(_) = rule.criteria() {
            content.push_str(" showDropDown=\"0\"");
        }
        content.push_str(" showErrorMessage=\"1\"");
        if !rule.error_title.is_empty() {
            content.push_str(&format!(" errorTitle=\"{}\"", escape_xml(&rule.error_title)));
        }
        if !rule.error_message.is_empty() {
            content.push_str(&format!(" error=\"{}\"", escape_xml(&rule.error_message)));
        }
        content.push_str(&format!(" sqref=\"{}\">", sqref));

        match rule.criteria() {
            ValidationCriteria::List(options) => {
                let list = format!("\"{}\"", options.join(",").replace('"', "\"\""));
                content.push_str(&format!("<formula1>{}</formula1>", escape_xml(&list)));
            }
            ValidationCriteria::Range { min, max, .. } => {
                content.push_str(&format!(
                    "<formula1>{}</formula1><formula2>{}</formula2>",
                    min, max
                ));
            }
            ValidationCriteria::CustomFormula(formula) => {
                content.push_str(&format!("<formula1>{}</formula1>", escape_xml(formula)));
            }
        }
        content.push_str("</dataValidation>");
    }

    content.push_str("\n    </dataValidations>");
}

/// Generate `xl/commentsN.xml`, or `None` when the sheet has no comments
pub(crate) fn write_comments_xml(sheet: &Worksheet) -> Option<String> {
    let comments: Vec<_> = sheet.comments().collect();
    if comments.is_empty() {
        return None;
    }

    let mut authors: Vec<&str> = Vec::new();
    for (_, comment) in &comments {
        if !authors.contains(&comment.author.as_str()) {
            authors.push(&comment.author);
        }
    }

    let mut content = String::from(XML_HEADER);
    content.push_str(
        "\n<comments xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">\n    <authors>",
    );
    for author in &authors {
        content.push_str(&format!("\n        <author>{}</author>", escape_xml(author)));
    }
    content.push_str("\n    </authors>\n    <commentList>");

    for (addr, comment) in &comments {
        let author_id = authors
            .iter()
            .position(|a| *a == comment.author)
            .unwrap_or(0);
        content.push_str(&format!(
            "\n        <comment ref=\"{}\" authorId=\"{}\"><text><r><t xml:space=\"preserve\">{}</t></r></text></comment>",
            addr,
            author_id,
            text_xml(&comment.text)
        ));
    }

    content.push_str("\n    </commentList>\n</comments>");
    Some(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellbook_core::{ValidationRule, ValidationType};

    fn sheet_xml(sheet: &Worksheet) -> String {
        write_sheet_xml(sheet, &SharedStrings::new(), false, &SheetRels::default())
    }

    #[test]
    fn test_cells_written_by_kind() {
        let mut ws = Worksheet::new("Data").unwrap();
        ws.set_value("A1", 1.5).unwrap();
        ws.set_value("B1", "a<b").unwrap();
        ws.put_formula("C1", "=A1*2").unwrap();

        let xml = sheet_xml(&ws);
        assert!(xml.contains("<c r=\"A1\"><v>1.5</v></c>"));
        assert!(xml.contains(
            "<c r=\"B1\" t=\"inlineStr\"><is><t xml:space=\"preserve\">a&lt;b</t></is></c>"
        ));
        assert!(xml.contains("<c r=\"C1\"><f>A1*2</f></c>"));
    }

    #[test]
    fn test_non_finite_number_written_empty() {
        let mut ws = Worksheet::new("Data").unwrap();
        ws.set_value("A1", f64::NAN).unwrap();
        let xml = sheet_xml(&ws);
        assert!(!xml.contains("NaN"));
        assert!(!xml.contains("r=\"A1\">"));
    }

    #[test]
    fn test_metadata_only_row_is_written() {
        let mut ws = Worksheet::new("Data").unwrap();
        ws.set_row_height(3, 30.0).unwrap();
        ws.hide_row(4).unwrap();
        let xml = sheet_xml(&ws);
        assert!(xml.contains("<row r=\"3\" ht=\"30\" customHeight=\"1\"/>"));
        assert!(xml.contains("<row r=\"4\" hidden=\"1\"/>"));
    }

    #[test]
    fn test_frozen_pane() {
        let mut ws = Worksheet::new("Data").unwrap();
        ws.freeze_pane(1, 2).unwrap();
        let xml = sheet_xml(&ws);
        assert!(xml.contains(
            "<pane xSplit=\"2\" ySplit=\"1\" topLeftCell=\"C2\" activePane=\"bottomRight\" state=\"frozen\"/>"
        ));
    }

    #[test]
    fn test_validations_and_protection() {
        let mut ws = Worksheet::new("Data").unwrap();
        ws.add_dropdown_list_validation("B2:B5", ["Yes", "No"]).unwrap();
        ws.apply_validation(
            "C1",
            ValidationRule::range(ValidationType::WholeNumber, 1.0, 10.0).unwrap(),
        )
        .unwrap();
        ws.protect("pw");

        let xml = sheet_xml(&ws);
        assert!(xml.contains("sqref=\"B2:B5\"><formula1>&quot;Yes,No&quot;</formula1>"));
        assert!(xml.contains("type=\"whole\" operator=\"between\""));
        assert!(xml.contains("<formula1>1</formula1><formula2>10</formula2>"));
        assert!(xml.contains("<sheetProtection password=\""));
        assert!(xml.contains(" autoFilter=\"1\"/>"));
    }

    #[test]
    fn test_comments_share_authors() {
        let mut ws = Worksheet::new("Data").unwrap();
        assert!(write_comments_xml(&ws).is_none());

        ws.add_comment("A1", "Ann", "first").unwrap();
        ws.add_comment("B2", "Bob", "second").unwrap();
        ws.add_comment("C3", "Ann", "third").unwrap();

        let xml = write_comments_xml(&ws).unwrap();
        assert_eq!(xml.matches("<author>").count(), 2);
        assert!(xml.contains("<comment ref=\"C3\" authorId=\"0\">"));
        assert!(xml.contains("<comment ref=\"B2\" authorId=\"1\">"));
    }
}
