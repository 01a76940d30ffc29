//! Stylesheet (`xl/styles.xml`) reading and writing
//!
//! Style indices in the document model are written one-to-one as `cellXfs`
//! entries, so a cell's `s` attribute is its style index. Fonts, fills and
//! borders are pooled: identical records share one entry.

use std::io::BufRead;

use cellbook_core::{
    Alignment, BorderLineStyle, BorderStyle, Color, FillStyle, FontStyle, HorizontalAlignment,
    Style, StyleTable, VerticalAlignment,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::xml::{attr_parse, attr_str, escape_xml, XML_HEADER};

/// First fill id available to styles; 0 and 1 are reserved
const FIRST_CUSTOM_FILL: usize = 2;

/// Index of `item` in `pool`, appending it when absent
fn pool_index<T: PartialEq + Clone>(pool: &mut Vec<T>, item: &T) -> usize {
    match pool.iter().position(|p| p == item) {
        Some(i) => i,
        None => {
            pool.push(item.clone());
            pool.len() - 1
        }
    }
}

/// Generate styles.xml for a style table
pub(crate) fn write_styles_xml(table: &StyleTable) -> String {
    let mut fonts: Vec<FontStyle> = Vec::new();
    let mut fills: Vec<FillStyle> = Vec::new();
    let mut borders: Vec<BorderStyle> = vec![BorderStyle::default()];
    let mut xfs: Vec<(usize, usize, usize, Option<Alignment>)> = Vec::with_capacity(table.len());

    for (_, style) in table.iter() {
        let font_id = pool_index(&mut fonts, &style.font);
        let fill_id = match style.fill {
            FillStyle::None => 0,
            _ => FIRST_CUSTOM_FILL + pool_index(&mut fills, &style.fill),
        };
        let border_id = pool_index(&mut borders, &style.border);
        xfs.push((font_id, fill_id, border_id, style.alignment));
    }

    let mut xml = String::from(XML_HEADER);
    xml.push('\n');
    xml.push_str(
        r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );

    xml.push_str(&format!("<fonts count=\"{}\">", fonts.len()));
    for font in &fonts {
        xml.push_str(&write_font(font));
    }
    xml.push_str("</fonts>");

    xml.push_str(&format!("<fills count=\"{}\">", FIRST_CUSTOM_FILL + fills.len()));
    xml.push_str(r#"<fill><patternFill patternType="none"/></fill>"#);
    xml.push_str(r#"<fill><patternFill patternType="gray125"/></fill>"#);
    for fill in &fills {
        xml.push_str(&write_fill(fill));
    }
    xml.push_str("</fills>");

    xml.push_str(&format!("<borders count=\"{}\">", borders.len()));
    for border in &borders {
        xml.push_str(&write_border(border));
    }
    xml.push_str("</borders>");

    xml.push_str(r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#);

    xml.push_str(&format!("<cellXfs count=\"{}\">", xfs.len()));
    for (font_id, fill_id, border_id, alignment) in &xfs {
        xml.push_str(&format!(
            "<xf numFmtId=\"0\" fontId=\"{}\" fillId=\"{}\" borderId=\"{}\" xfId=\"0\"",
            font_id, fill_id, border_id
        ));
        if *font_id != 0 {
            xml.push_str(" applyFont=\"1\"");
        }
        if *fill_id != 0 {
            xml.push_str(" applyFill=\"1\"");
        }
        if *border_id != 0 {
            xml.push_str(" applyBorder=\"1\"");
        }
        match alignment {
            Some(align) => {
                xml.push_str(" applyAlignment=\"1\">");
                xml.push_str(&write_alignment(align));
                xml.push_str("</xf>");
            }
            None => xml.push_str("/>"),
        }
    }
    xml.push_str("</cellXfs>");

    xml.push_str(r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#);
    xml.push_str("</styleSheet>");
    xml
}

fn write_font(font: &FontStyle) -> String {
    format!(
        "<font><sz val=\"{}\"/><color rgb=\"{}\"/><name val=\"{}\"/></font>",
        font.size,
        font.color.to_argb_hex(),
        escape_xml(&font.name)
    )
}

fn write_fill(fill: &FillStyle) -> String {
    match fill {
        FillStyle::None => r#"<fill><patternFill patternType="none"/></fill>"#.to_string(),
        FillStyle::Solid { color } => format!(
            "<fill><patternFill patternType=\"solid\"><fgColor rgb=\"{}\"/><bgColor indexed=\"64\"/></patternFill></fill>",
            color.to_argb_hex()
        ),
    }
}

fn write_border(border: &BorderStyle) -> String {
    let mut xml = String::from("<border>");
    for (tag, line) in [
        ("left", border.left),
        ("right", border.right),
        ("top", border.top),
        ("bottom", border.bottom),
    ] {
        match line.as_str() {
            Some(style) => xml.push_str(&format!(
                "<{tag} style=\"{style}\"><color indexed=\"64\"/></{tag}>"
            )),
            None => xml.push_str(&format!("<{tag}/>")),
        }
    }
    xml.push_str("<diagonal/></border>");
    xml
}

fn write_alignment(align: &Alignment) -> String {
    let mut xml = String::from("<alignment");
    if let Some(h) = align.horizontal {
        xml.push_str(&format!(" horizontal=\"{}\"", h.as_str()));
    }
    if let Some(v) = align.vertical {
        xml.push_str(&format!(" vertical=\"{}\"", v.as_str()));
    }
    xml.push_str("/>");
    xml
}

/// Section of the stylesheet currently being read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Other,
    Fonts,
    Fills,
    Borders,
    CellXfs,
}

/// Pending `xf` entry: font, fill and border ids plus alignment
#[derive(Debug, Default)]
struct XfRecord {
    font_id: usize,
    fill_id: usize,
    border_id: usize,
    alignment: Option<Alignment>,
}

/// Parse styles.xml into style records ordered like `cellXfs`
///
/// Colors given as theme or indexed references fall back to black for
/// fonts and to no fill for fills; only explicit RGB survives.
pub(crate) fn read_styles_xml<R: BufRead>(mut reader: Reader<R>) -> XlsxResult<Vec<Style>> {
    reader.trim_text(true);

    let mut fonts: Vec<FontStyle> = Vec::new();
    let mut fills: Vec<FillStyle> = Vec::new();
    let mut borders: Vec<BorderStyle> = Vec::new();
    let mut xfs: Vec<XfRecord> = Vec::new();

    let mut section = Section::Other;
    let mut current_font: Option<FontStyle> = None;
    let mut current_fill: Option<(bool, Option<Color>)> = None;
    let mut current_border: Option<BorderStyle> = None;
    let mut current_xf: Option<XfRecord> = None;

    let mut buf = Vec::new();
    loop {
        let event = reader.read_event_into(&mut buf).map_err(XlsxError::Xml)?;
        match event {
            Event::Start(e) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"fonts" => section = Section::Fonts,
                    b"fills" => section = Section::Fills,
                    b"borders" => section = Section::Borders,
                    b"cellXfs" => section = Section::CellXfs,
                    b"cellStyleXfs" | b"dxfs" => section = Section::Other,
                    b"font" if section == Section::Fonts => current_font = Some(FontStyle::default()),
                    b"fill" if section == Section::Fills => current_fill = Some((false, None)),
                    b"border" if section == Section::Borders => {
                        current_border = Some(BorderStyle::default());
                    }
                    b"xf" if section == Section::CellXfs => current_xf = Some(xf_record(&e)),
                    _ => handle_leaf(
                        &e,
                        section,
                        &mut current_font,
                        &mut current_fill,
                        &mut current_border,
                        &mut current_xf,
                    ),
                }
            }
            Event::Empty(e) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"font" if section == Section::Fonts => fonts.push(FontStyle::default()),
                    b"fill" if section == Section::Fills => fills.push(FillStyle::None),
                    b"border" if section == Section::Borders => borders.push(BorderStyle::default()),
                    b"xf" if section == Section::CellXfs => xfs.push(xf_record(&e)),
                    _ => handle_leaf(
                        &e,
                        section,
                        &mut current_font,
                        &mut current_fill,
                        &mut current_border,
                        &mut current_xf,
                    ),
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"fonts" | b"fills" | b"borders" | b"cellXfs" => section = Section::Other,
                b"font" => {
                    if let Some(font) = current_font.take() {
                        fonts.push(font);
                    }
                }
                b"fill" => {
                    if let Some((solid, color)) = current_fill.take() {
                        fills.push(match (solid, color) {
                            (true, Some(color)) => FillStyle::Solid { color },
                            _ => FillStyle::None,
                        });
                    }
                }
                b"border" => {
                    if let Some(border) = current_border.take() {
                        borders.push(border);
                    }
                }
                b"xf" => {
                    if let Some(xf) = current_xf.take() {
                        xfs.push(xf);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    let styles = xfs
        .into_iter()
        .map(|xf| Style {
            font: fonts.get(xf.font_id).cloned().unwrap_or_default(),
            fill: fills.get(xf.fill_id).cloned().unwrap_or(FillStyle::None),
            border: borders.get(xf.border_id).copied().unwrap_or_default(),
            alignment: xf.alignment,
        })
        .collect();
    Ok(styles)
}

fn xf_record(e: &BytesStart<'_>) -> XfRecord {
    XfRecord {
        font_id: attr_parse(e, b"fontId").unwrap_or(0),
        fill_id: attr_parse(e, b"fillId").unwrap_or(0),
        border_id: attr_parse(e, b"borderId").unwrap_or(0),
        alignment: None,
    }
}

/// Child elements of fonts, fills, borders and xfs
fn handle_leaf(
    e: &BytesStart<'_>,
    section: Section,
    font: &mut Option<FontStyle>,
    fill: &mut Option<(bool, Option<Color>)>,
    border: &mut Option<BorderStyle>,
    xf: &mut Option<XfRecord>,
) {
    let name = e.local_name();
    match (section, name.as_ref()) {
        (Section::Fonts, b"sz") => {
            if let (Some(font), Some(size)) = (font.as_mut(), attr_parse::<f64>(e, b"val")) {
                font.size = size;
            }
        }
        (Section::Fonts, b"name") => {
            if let (Some(font), Some(name)) = (font.as_mut(), attr_str(e, b"val")) {
                font.name = name;
            }
        }
        (Section::Fonts, b"color") => {
            if let Some(font) = font.as_mut() {
                font.color = rgb_attr(e).unwrap_or(Color::BLACK);
            }
        }
        (Section::Fills, b"patternFill") => {
            if let Some(fill) = fill.as_mut() {
                fill.0 = attr_str(e, b"patternType").as_deref() == Some("solid");
            }
        }
        (Section::Fills, b"fgColor") => {
            if let Some(fill) = fill.as_mut() {
                fill.1 = rgb_attr(e);
            }
        }
        (Section::Borders, b"left" | b"right" | b"top" | b"bottom") => {
            if let Some(border) = border.as_mut() {
                let line = attr_str(e, b"style")
                    .map(|s| BorderLineStyle::parse(&s))
                    .unwrap_or_default();
                match name.as_ref() {
                    b"left" => border.left = line,
                    b"right" => border.right = line,
                    b"top" => border.top = line,
                    _ => border.bottom = line,
                }
            }
        }
        (Section::CellXfs, b"alignment") => {
            if let Some(xf) = xf.as_mut() {
                let horizontal = attr_str(e, b"horizontal")
                    .as_deref()
                    .and_then(HorizontalAlignment::parse);
                let vertical = attr_str(e, b"vertical")
                    .as_deref()
                    .and_then(VerticalAlignment::parse);
                xf.alignment = Alignment::from_parts(horizontal, vertical);
            }
        }
        _ => {}
    }
}

fn rgb_attr(e: &BytesStart<'_>) -> Option<Color> {
    attr_str(e, b"rgb").and_then(|v| Color::from_argb_hex(&v))
}
