//! Small XML and package helpers shared by the reader and the writer

use std::io::{BufReader, Read, Seek};
use std::str::FromStr;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};

pub(crate) const XML_HEADER: &str =
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

pub(crate) const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

pub(crate) const REL_WORKSHEET: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
pub(crate) const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
pub(crate) const REL_SHARED_STRINGS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings";
pub(crate) const REL_COMMENTS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/comments";
pub(crate) const REL_DRAWING: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/drawing";
pub(crate) const REL_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// Escape text for element content and attribute values
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Escape characters XML 1.0 cannot carry as `_xHHHH_`
///
/// An underscore that would otherwise read back as the start of an escape
/// is itself escaped, so [`decode_excel_escapes`] restores the input.
pub(crate) fn encode_excel_escapes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, c) in s.char_indices() {
        let needs_escape = match c {
            '\t' | '\n' | '\r' => false,
            '_' => looks_like_escape(&s[i..]),
            c => (c as u32) < 0x20 || c == '\u{FFFE}' || c == '\u{FFFF}',
        };
        if needs_escape {
            out.push_str(&format!("_x{:04X}_", c as u32));
        } else {
            out.push(c);
        }
    }
    out
}

fn looks_like_escape(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 7
        && b[1] == b'x'
        && b[2..6].iter().all(u8::is_ascii_hexdigit)
        && b[6] == b'_'
}

/// Decode `_xHHHH_` escape sequences
///
/// Anything that is not a complete sequence is kept as written.
pub(crate) fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find("_x") {
        out.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        let decoded = if looks_like_escape(candidate) {
            u32::from_str_radix(&candidate[2..6], 16)
                .ok()
                .and_then(char::from_u32)
        } else {
            None
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &candidate[7..];
            }
            None => {
                out.push('_');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Unescaped value of an attribute
pub(crate) fn attr_str(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Attribute parsed into any `FromStr` type
pub(crate) fn attr_parse<T: FromStr>(e: &BytesStart<'_>, key: &[u8]) -> Option<T> {
    attr_str(e, key).and_then(|s| s.trim().parse().ok())
}

/// Boolean attribute (`"1"` or `"true"`)
pub(crate) fn attr_flag(e: &BytesStart<'_>, key: &[u8]) -> Option<bool> {
    attr_str(e, key).map(|s| s == "1" || s.eq_ignore_ascii_case("true"))
}

/// Open a part for streaming, or `None` if the archive lacks it
pub(crate) fn part_reader<'a, R: Read + Seek>(
    archive: &'a mut zip::ZipArchive<R>,
    path: &str,
) -> Option<Reader<BufReader<impl Read + 'a>>> {
    let file = archive.by_name(path).ok()?;
    Some(Reader::from_reader(BufReader::new(file)))
}

/// Read a part's raw bytes
pub(crate) fn read_part_bytes<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
    path: &str,
) -> XlsxResult<Vec<u8>> {
    let mut file = archive
        .by_name(path)
        .map_err(|_| XlsxError::MissingPart(path.to_string()))?;
    let mut bytes = Vec::with_capacity(file.size() as usize);
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// One entry of a `.rels` part
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Relationship {
    pub id: String,
    pub rel_type: String,
    /// Target resolved to a path inside the archive
    pub target: String,
}

/// Path of the relationships part belonging to `part`
/// (`xl/worksheets/sheet1.xml` -> `xl/worksheets/_rels/sheet1.xml.rels`)
pub(crate) fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, name)) => format!("{}/_rels/{}.rels", dir, name),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target against the directory of its source part
pub(crate) fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    for segment in target.split('/') {
        match segment {
            "." | "" => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// Read the relationships of `source_part`; a missing `.rels` part means
/// no relationships
pub(crate) fn read_relationships<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
    source_part: &str,
) -> XlsxResult<Vec<Relationship>> {
    let rels_path = rels_path_for(source_part);
    let Some(mut xml_reader) = part_reader(archive, &rels_path) else {
        return Ok(Vec::new());
    };
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut rels = Vec::new();
    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let id = attr_str(&e, b"Id");
                let rel_type = attr_str(&e, b"Type");
                let target = attr_str(&e, b"Target");
                let external = attr_str(&e, b"TargetMode").as_deref() == Some("External");
                if let (Some(id), Some(rel_type), Some(target), false) =
                    (id, rel_type, target, external)
                {
                    rels.push(Relationship {
                        id,
                        rel_type,
                        target: resolve_target(source_part, &target),
                    });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }
    Ok(rels)
}
