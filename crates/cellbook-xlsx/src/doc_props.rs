//! Core document properties (`docProps/core.xml`)

use std::io::BufRead;

use cellbook_core::DocumentProperties;
use chrono::{DateTime, NaiveDateTime};
use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::xml::{escape_xml, XML_HEADER};

pub(crate) const CORE_PROPERTIES_PATH: &str = "docProps/core.xml";

pub(crate) const REL_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";

/// Timestamps are written to the second, in UTC
const W3CDTF: &str = "%Y-%m-%dT%H:%M:%SZ";

pub(crate) fn write_core_xml(props: &DocumentProperties) -> String {
    let mut xml = String::from(XML_HEADER);
    xml.push('\n');
    xml.push_str(concat!(
        r#"<cp:coreProperties"#,
        r#" xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties""#,
        r#" xmlns:dc="http://purl.org/dc/elements/1.1/""#,
        r#" xmlns:dcterms="http://purl.org/dc/terms/""#,
        r#" xmlns:dcmitype="http://purl.org/dc/dcmitype/""#,
        r#" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
    ));

    let text_fields = [
        ("dc:title", &props.title),
        ("dc:subject", &props.subject),
        ("dc:creator", &props.author),
        ("cp:lastModifiedBy", &props.modified_by),
    ];
    for (tag, value) in text_fields {
        if let Some(value) = value {
            xml.push_str(&format!("<{tag}>{}</{tag}>", escape_xml(value)));
        }
    }

    for (tag, value) in [
        ("dcterms:created", props.created_date),
        ("dcterms:modified", props.modified_date),
    ] {
        if let Some(dt) = value {
            xml.push_str(&format!(
                "<{tag} xsi:type=\"dcterms:W3CDTF\">{}</{tag}>",
                dt.format(W3CDTF)
            ));
        }
    }

    xml.push_str("</cp:coreProperties>");
    xml
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Title,
    Subject,
    Creator,
    LastModifiedBy,
    Created,
    Modified,
}

pub(crate) fn read_core_xml<R: BufRead>(mut reader: Reader<R>) -> XlsxResult<DocumentProperties> {
    let mut props = DocumentProperties::default();
    let mut field: Option<Field> = None;
    let mut text = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                field = match e.local_name().as_ref() {
                    b"title" => Some(Field::Title),
                    b"subject" => Some(Field::Subject),
                    b"creator" => Some(Field::Creator),
                    b"lastModifiedBy" => Some(Field::LastModifiedBy),
                    b"created" => Some(Field::Created),
                    b"modified" => Some(Field::Modified),
                    _ => None,
                };
                text.clear();
            }
            Ok(Event::Text(t)) if field.is_some() => {
                text.push_str(&t.unescape().map_err(XlsxError::Xml)?);
            }
            Ok(Event::End(_)) => {
                if let Some(f) = field.take() {
                    let value = std::mem::take(&mut text);
                    match f {
                        Field::Title => props.title = Some(value),
                        Field::Subject => props.subject = Some(value),
                        Field::Creator => props.author = Some(value),
                        Field::LastModifiedBy => props.modified_by = Some(value),
                        Field::Created => props.created_date = parse_w3cdtf(&value),
                        Field::Modified => props.modified_date = parse_w3cdtf(&value),
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }
    Ok(props)
}

/// Parse a W3CDTF timestamp into naive UTC; offsets are folded in
fn parse_w3cdtf(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    match NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(dt) => Some(dt),
        Err(_) => {
            log::warn!("ignoring malformed document timestamp '{}'", s);
            None
        }
    }
}
