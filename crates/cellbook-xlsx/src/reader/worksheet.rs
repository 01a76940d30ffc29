//! Worksheet and comments part parsing

use std::io::BufRead;

use cellbook_core::{
    date_to_serial, CellAddress, CellRange, CellValue, Comment, SharedStrings, SheetProtection,
    ValidationRule, ValidationType, Worksheet, MAX_COLUMNS, MAX_ROWS,
};
use chrono::{NaiveDate, NaiveDateTime};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::writer::ISO_DATETIME;
use crate::xml::{attr_flag, attr_parse, attr_str, decode_excel_escapes};

/// Workbook-level state a sheet needs while loading
pub(crate) struct SheetContext<'a> {
    pub shared_strings: &'a SharedStrings,
    pub style_count: usize,
}

/// Element whose text is being collected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextTarget {
    Value,
    Formula,
    Inline,
    Formula1,
    Formula2,
}

/// A `<c>` element being assembled
#[derive(Debug, Default)]
struct PendingCell {
    addr: Option<CellAddress>,
    cell_type: Option<String>,
    style: u32,
    value: Option<String>,
    formula: Option<String>,
    inline: Option<String>,
}

/// A `<dataValidation>` element being assembled
#[derive(Debug, Default)]
struct PendingValidation {
    kind: Option<String>,
    sqref: String,
    error_title: Option<String>,
    error_message: Option<String>,
    formula1: Option<String>,
    formula2: Option<String>,
}

/// Parse a worksheet part into `sheet`
///
/// Returns the relationship id of the sheet's drawing, if it has one.
pub(crate) fn read_sheet_xml<R: BufRead>(
    mut xml_reader: Reader<R>,
    sheet: &mut Worksheet,
    ctx: &SheetContext<'_>,
) -> XlsxResult<Option<String>> {
    let mut buf = Vec::new();
    let mut drawing_rid = None;

    let mut current_row: u32 = 0;
    let mut last_column: u32 = 0;
    let mut cell: Option<PendingCell> = None;
    let mut validation: Option<PendingValidation> = None;
    let mut target: Option<TextTarget> = None;
    let mut in_phonetic = false;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"row" => {
                    current_row = read_row(&e, sheet, current_row)?;
                    last_column = 0;
                }
                b"c" => {
                    let pending = pending_cell(&e, current_row, last_column, ctx)?;
                    if let Some(addr) = pending.addr {
                        last_column = addr.column();
                    }
                    cell = Some(pending);
                }
                b"v" if cell.is_some() => target = Some(TextTarget::Value),
                b"f" if cell.is_some() => target = Some(TextTarget::Formula),
                b"rPh" => in_phonetic = true,
                b"t" if cell.is_some() && !in_phonetic => target = Some(TextTarget::Inline),
                b"dataValidation" => validation = Some(pending_validation(&e)),
                b"formula1" if validation.is_some() => target = Some(TextTarget::Formula1),
                b"formula2" if validation.is_some() => target = Some(TextTarget::Formula2),
                _ => read_empty_element(&e, sheet, &mut drawing_rid),
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"row" => {
                    current_row = read_row(&e, sheet, current_row)?;
                    last_column = 0;
                }
                b"c" => {
                    let pending = pending_cell(&e, current_row, last_column, ctx)?;
                    if let Some(addr) = pending.addr {
                        last_column = addr.column();
                    }
                    finish_cell(pending, sheet, ctx)?;
                }
                _ => read_empty_element(&e, sheet, &mut drawing_rid),
            },
            Ok(Event::Text(t)) => {
                if let Some(target) = target {
                    let text = t.unescape().map_err(XlsxError::Xml)?;
                    append_text(target, &text, cell.as_mut(), validation.as_mut());
                }
            }
            Ok(Event::CData(t)) => {
                if let Some(target) = target {
                    let text = String::from_utf8_lossy(&t).into_owned();
                    append_text(target, &text, cell.as_mut(), validation.as_mut());
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"v" | b"f" | b"t" | b"formula1" | b"formula2" => target = None,
                b"rPh" => in_phonetic = false,
                b"c" => {
                    if let Some(pending) = cell.take() {
                        finish_cell(pending, sheet, ctx)?;
                    }
                }
                b"dataValidation" => {
                    if let Some(pending) = validation.take() {
                        finish_validation(pending, sheet)?;
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(drawing_rid)
}

fn append_text(
    target: TextTarget,
    text: &str,
    cell: Option<&mut PendingCell>,
    validation: Option<&mut PendingValidation>,
) {
    let slot = match (target, cell, validation) {
        (TextTarget::Value, Some(c), _) => &mut c.value,
        (TextTarget::Formula, Some(c), _) => &mut c.formula,
        (TextTarget::Inline, Some(c), _) => &mut c.inline,
        (TextTarget::Formula1, _, Some(v)) => &mut v.formula1,
        (TextTarget::Formula2, _, Some(v)) => &mut v.formula2,
        _ => return,
    };
    slot.get_or_insert_with(String::new).push_str(text);
}

/// Apply a `<row>` element's metadata and return its 1-based index
///
/// A row without `r` follows the previous one.
fn read_row(e: &BytesStart<'_>, sheet: &mut Worksheet, previous: u32) -> XlsxResult<u32> {
    let index = match attr_parse::<u32>(e, b"r") {
        Some(index) => Some(index),
        None => previous.checked_add(1),
    };
    let index = index
        .filter(|i| (1..=MAX_ROWS).contains(i))
        .ok_or_else(|| {
            let label = attr_str(e, b"r").unwrap_or_else(|| format!("after {}", previous));
            XlsxError::Parse(format!("row {} is outside 1..={}", label, MAX_ROWS))
        })?;
    if attr_flag(e, b"customHeight") == Some(true) {
        if let Some(height) = attr_parse::<f64>(e, b"ht") {
            sheet.set_row_height(index, height)?;
        }
    }
    if attr_flag(e, b"hidden") == Some(true) {
        sheet.hide_row(index)?;
    }
    Ok(index)
}

fn pending_cell(
    e: &BytesStart<'_>,
    row: u32,
    last_column: u32,
    ctx: &SheetContext<'_>,
) -> XlsxResult<PendingCell> {
    let addr = match attr_str(e, b"r") {
        Some(r) => match CellAddress::parse(&r) {
            Ok(addr) => Some(addr),
            Err(err) => {
                log::warn!("skipping cell with bad reference '{}': {}", r, err);
                None
            }
        },
        None => {
            let column = last_column
                .checked_add(1)
                .filter(|c| *c <= MAX_COLUMNS)
                .ok_or_else(|| {
                    XlsxError::Parse(format!(
                        "cell after column {} of row {} is outside 1..={}",
                        last_column, row, MAX_COLUMNS
                    ))
                })?;
            Some(CellAddress::new(row.max(1), column)?)
        }
    };

    let mut style = attr_parse::<u32>(e, b"s").unwrap_or(0);
    if style as usize >= ctx.style_count {
        log::warn!(
            "cell {:?} refers to style {} but only {} are defined; using the default",
            addr,
            style,
            ctx.style_count
        );
        style = 0;
    }

    Ok(PendingCell {
        addr,
        cell_type: attr_str(e, b"t"),
        style,
        ..PendingCell::default()
    })
}

fn finish_cell(
    pending: PendingCell,
    sheet: &mut Worksheet,
    ctx: &SheetContext<'_>,
) -> XlsxResult<()> {
    let Some(addr) = pending.addr else {
        return Ok(());
    };

    let value = cell_value(&pending, addr, ctx)?;
    let formula = pending.formula.filter(|f| !f.is_empty());
    if value.is_empty() && formula.is_none() && pending.style == 0 {
        return Ok(());
    }

    let cell = sheet.get_or_create_cell_at(addr)?;
    cell.value = value;
    cell.formula = formula;
    cell.style_index = pending.style;
    Ok(())
}

fn cell_value(
    pending: &PendingCell,
    addr: CellAddress,
    ctx: &SheetContext<'_>,
) -> XlsxResult<CellValue> {
    let raw = pending.value.as_deref();
    let value = match pending.cell_type.as_deref() {
        Some("s") => {
            let Some(raw) = raw else {
                return Ok(CellValue::Empty);
            };
            let idx: u32 = raw.trim().parse().map_err(|_| {
                XlsxError::Parse(format!("{}: bad shared string index '{}'", addr, raw))
            })?;
            if ctx.shared_strings.get(idx).is_none() {
                return Err(XlsxError::Parse(format!(
                    "{}: shared string {} is outside the table of {}",
                    addr,
                    idx,
                    ctx.shared_strings.len()
                )));
            }
            CellValue::SharedTextRef(idx)
        }
        Some("inlineStr") => match &pending.inline {
            Some(text) => CellValue::Text(decode_excel_escapes(text)),
            None => CellValue::Empty,
        },
        Some("str") | Some("e") => match raw {
            Some(text) => CellValue::Text(decode_excel_escapes(text)),
            None => CellValue::Empty,
        },
        Some("d") => match raw {
            Some(text) => match parse_iso_datetime(text) {
                Some(dt) => CellValue::Date(date_to_serial(dt)),
                None => {
                    log::warn!("{}: unreadable date '{}'; keeping it as text", addr, text);
                    CellValue::Text(text.to_string())
                }
            },
            None => CellValue::Empty,
        },
        Some("b") => match raw.map(str::trim) {
            Some("1") | Some("true") => CellValue::Number(1.0),
            Some(_) => CellValue::Number(0.0),
            None => CellValue::Empty,
        },
        _ => match raw.map(str::trim).filter(|s| !s.is_empty()) {
            Some(text) => CellValue::Number(text.parse().map_err(|_| {
                XlsxError::Parse(format!("{}: bad number '{}'", addr, text))
            })?),
            None => CellValue::Empty,
        },
    };
    Ok(value)
}

/// Parse the ISO 8601 text of a `t="d"` cell
pub(crate) fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    let s = s.strip_suffix('Z').unwrap_or(s);
    NaiveDateTime::parse_from_str(s, ISO_DATETIME)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Sheet-level elements that carry everything in their attributes
fn read_empty_element(e: &BytesStart<'_>, sheet: &mut Worksheet, drawing_rid: &mut Option<String>) {
    match e.local_name().as_ref() {
        b"pane" => {
            if attr_str(e, b"state").as_deref().map_or(true, |s| s.starts_with("frozen")) {
                let columns = attr_parse::<f64>(e, b"xSplit").unwrap_or(0.0) as u32;
                let rows = attr_parse::<f64>(e, b"ySplit").unwrap_or(0.0) as u32;
                if let Err(err) = sheet.freeze_pane(rows, columns) {
                    log::warn!("{}: ignoring pane: {}", sheet.name(), err);
                }
            }
        }
        b"col" => read_column(e, sheet),
        b"mergeCell" => {
            let Some(reference) = attr_str(e, b"ref") else {
                return;
            };
            let merged = CellRange::parse(&reference).and_then(|r| sheet.merge_range(r));
            if let Err(err) = merged {
                log::warn!("{}: skipping merge {}: {}", sheet.name(), reference, err);
            }
        }
        b"sheetProtection" => sheet.set_protection(Some(read_protection(e))),
        b"drawing" => *drawing_rid = attr_str(e, b"r:id"),
        _ => {}
    }
}

fn read_column(e: &BytesStart<'_>, sheet: &mut Worksheet) {
    let (Some(min), Some(max)) = (attr_parse::<u32>(e, b"min"), attr_parse::<u32>(e, b"max")) else {
        return;
    };
    let width = attr_parse::<f64>(e, b"width").filter(|_| attr_flag(e, b"customWidth") == Some(true));
    let hidden = attr_flag(e, b"hidden") == Some(true);
    if width.is_none() && !hidden {
        return;
    }

    for index in min.max(1)..=max.min(MAX_COLUMNS) {
        if let Some(width) = width {
            if let Err(err) = sheet.set_column_width(index, width) {
                log::warn!("{}: column {}: {}", sheet.name(), index, err);
                return;
            }
        }
        if hidden {
            if let Err(err) = sheet.hide_column(index) {
                log::warn!("{}: column {}: {}", sheet.name(), index, err);
                return;
            }
        }
    }
}

fn read_protection(e: &BytesStart<'_>) -> SheetProtection {
    let mut protection = SheetProtection::from_token(attr_str(e, b"password").unwrap_or_default());
    let flag = |key: &[u8], default: bool| attr_flag(e, key).unwrap_or(default);
    protection.sheet = flag(b"sheet", false);
    protection.objects = flag(b"objects", false);
    protection.scenarios = flag(b"scenarios", false);
    protection.format_cells = flag(b"formatCells", true);
    protection.format_columns = flag(b"formatColumns", true);
    protection.format_rows = flag(b"formatRows", true);
    protection.insert_columns = flag(b"insertColumns", true);
    protection.insert_rows = flag(b"insertRows", true);
    protection.delete_columns = flag(b"deleteColumns", true);
    protection.delete_rows = flag(b"deleteRows", true);
    protection.sort = flag(b"sort", true);
    protection.auto_filter = flag(b"autoFilter", true);
    protection
}

fn pending_validation(e: &BytesStart<'_>) -> PendingValidation {
    PendingValidation {
        kind: attr_str(e, b"type"),
        sqref: attr_str(e, b"sqref").unwrap_or_default(),
        error_title: attr_str(e, b"errorTitle"),
        error_message: attr_str(e, b"error"),
        ..PendingValidation::default()
    }
}

fn finish_validation(pending: PendingValidation, sheet: &mut Worksheet) -> XlsxResult<()> {
    let ranges: Vec<CellRange> = pending
        .sqref
        .split_whitespace()
        .filter_map(|r| match CellRange::parse(r) {
            Ok(range) => Some(range),
            Err(err) => {
                log::warn!("{}: skipping validation range '{}': {}", sheet.name(), r, err);
                None
            }
        })
        .collect();
    if ranges.is_empty() {
        return Ok(());
    }

    let kind = pending.kind.as_deref().and_then(ValidationType::from_xlsx);
    let formula1 = pending.formula1.as_deref().map(str::trim).unwrap_or("");
    let rule = match kind {
        Some(ValidationType::List) => {
            let Some(list) = formula1
                .strip_prefix('"')
                .and_then(|f| f.strip_suffix('"'))
            else {
                log::warn!(
                    "{}: list validation on {} uses '{}', not inline options; skipping",
                    sheet.name(),
                    pending.sqref,
                    formula1
                );
                return Ok(());
            };
            ValidationRule::list(list.split(',').map(|o| o.replace("\"\"", "\"")))
        }
        Some(ValidationType::CustomFormula) => ValidationRule::custom_formula(formula1),
        Some(kind) => {
            let formula2 = pending.formula2.as_deref().map(str::trim).unwrap_or("");
            match (formula1.parse::<f64>(), formula2.parse::<f64>()) {
                (Ok(min), Ok(max)) => ValidationRule::range(kind, min, max),
                _ => {
                    log::warn!(
                        "{}: {} validation on {} has non-numeric bounds; skipping",
                        sheet.name(),
                        kind.xlsx_type(),
                        pending.sqref
                    );
                    return Ok(());
                }
            }
        }
        None => {
            log::warn!(
                "{}: unsupported validation type {:?} on {}; skipping",
                sheet.name(),
                pending.kind,
                pending.sqref
            );
            return Ok(());
        }
    };

    let mut rule = match rule {
        Ok(rule) => rule,
        Err(err) => {
            log::warn!("{}: skipping validation on {}: {}", sheet.name(), pending.sqref, err);
            return Ok(());
        }
    };
    if let Some(title) = pending.error_title {
        rule.error_title = title;
    }
    if let Some(message) = pending.error_message {
        rule.error_message = message;
    }
    sheet.apply_validation_to(ranges, rule)?;
    Ok(())
}

/// Parse a comments part and attach every comment to `sheet`
pub(crate) fn read_comments_xml<R: BufRead>(
    mut xml_reader: Reader<R>,
    sheet: &mut Worksheet,
) -> XlsxResult<()> {
    let mut buf = Vec::new();
    let mut authors: Vec<String> = Vec::new();
    let mut author: Option<String> = None;
    let mut current: Option<(CellAddress, usize, String)> = None;
    let mut in_text = false;
    let mut in_phonetic = false;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"author" => author = Some(String::new()),
                b"comment" => {
                    let addr = attr_str(&e, b"ref").and_then(|r| CellAddress::parse(&r).ok());
                    let author_id = attr_parse(&e, b"authorId").unwrap_or(0);
                    current = addr.map(|a| (a, author_id, String::new()));
                }
                b"rPh" => in_phonetic = true,
                b"t" => in_text = current.is_some() && !in_phonetic,
                _ => {}
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"author" => {
                authors.push(String::new());
            }
            Ok(Event::Text(t)) => {
                let text = t.unescape().map_err(XlsxError::Xml)?;
                if let Some(a) = author.as_mut() {
                    a.push_str(&text);
                } else if in_text {
                    if let Some((_, _, body)) = current.as_mut() {
                        body.push_str(&text);
                    }
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"author" => {
                    if let Some(a) = author.take() {
                        authors.push(a);
                    }
                }
                b"t" => in_text = false,
                b"rPh" => in_phonetic = false,
                b"comment" => {
                    if let Some((addr, author_id, body)) = current.take() {
                        let name = authors.get(author_id).cloned().unwrap_or_default();
                        sheet.set_comment_at(addr, Comment::new(name, decode_excel_escapes(&body)))?;
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }
    Ok(())
}
