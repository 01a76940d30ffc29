//! XLSX reader

mod drawing;
mod worksheet;

use std::fs::File;
use std::io::{BufRead, Read, Seek};
use std::path::Path;

use cellbook_core::{
    DocumentProperties, SharedStrings, SheetId, SheetVisibility, StyleTable, Workbook, Worksheet,
};
use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::doc_props::{read_core_xml, REL_CORE_PROPERTIES};
use crate::error::{XlsxError, XlsxResult};
use crate::styles::read_styles_xml;
use crate::xml::{
    attr_parse, attr_str, decode_excel_escapes, part_reader, read_relationships, Relationship,
    REL_COMMENTS, REL_DRAWING, REL_SHARED_STRINGS, REL_STYLES, REL_WORKSHEET,
};

use worksheet::SheetContext;

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

/// One `<sheet>` entry of the workbook part
#[derive(Debug)]
struct SheetEntry {
    name: String,
    id: u32,
    state: Option<String>,
    rel_id: String,
}

/// What the workbook part declares
#[derive(Debug, Default)]
struct WorkbookInfo {
    sheets: Vec<SheetEntry>,
    active_tab: usize,
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let file = File::open(path)?;
        Self::read(file)
    }

    /// Read a workbook from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        let mut archive = zip::ZipArchive::new(reader)?;

        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let root_rels = read_relationships(&mut archive, "")?;
        let workbook_path = find_rel(&root_rels, REL_OFFICE_DOCUMENT)
            .map(|r| r.target.clone())
            .unwrap_or_else(|| "xl/workbook.xml".to_string());

        let properties = match find_rel(&root_rels, REL_CORE_PROPERTIES) {
            Some(rel) => match part_reader(&mut archive, &rel.target) {
                Some(xml) => read_core_xml(xml)?,
                None => DocumentProperties::default(),
            },
            None => DocumentProperties::default(),
        };

        let info = {
            let xml = part_reader(&mut archive, &workbook_path)
                .ok_or_else(|| XlsxError::MissingPart(workbook_path.clone()))?;
            Self::read_workbook_xml(xml)?
        };
        let workbook_rels = read_relationships(&mut archive, &workbook_path)?;

        let shared_strings = match find_rel(&workbook_rels, REL_SHARED_STRINGS)
            .and_then(|rel| part_reader(&mut archive, &rel.target))
        {
            Some(xml) => Self::read_shared_strings(xml)?,
            None => SharedStrings::new(),
        };

        let styles = match find_rel(&workbook_rels, REL_STYLES)
            .and_then(|rel| part_reader(&mut archive, &rel.target))
        {
            Some(xml) => StyleTable::from_records(read_styles_xml(xml)?),
            None => StyleTable::new(),
        };

        let ctx = SheetContext {
            shared_strings: &shared_strings,
            style_count: styles.len(),
        };

        let mut sheets = Vec::with_capacity(info.sheets.len());
        for entry in &info.sheets {
            let path = workbook_rels
                .iter()
                .find(|r| r.id == entry.rel_id && r.rel_type == REL_WORKSHEET)
                .map(|r| r.target.clone())
                .ok_or_else(|| {
                    XlsxError::InvalidFormat(format!(
                        "sheet '{}' has no worksheet relationship {}",
                        entry.name, entry.rel_id
                    ))
                })?;

            let mut sheet = Worksheet::new(entry.name.as_str())?.with_id(SheetId(entry.id));
            Self::read_worksheet(&mut archive, &path, &mut sheet, &ctx)?;
            sheets.push(sheet);
        }

        if sheets.is_empty() {
            return Err(XlsxError::InvalidFormat("workbook declares no sheets".into()));
        }

        let mut workbook = Workbook::from_parts(sheets, styles, shared_strings, properties)?;

        for entry in &info.sheets {
            let Some(state) = &entry.state else {
                continue;
            };
            match SheetVisibility::from_xlsx(state) {
                Some(visibility) => workbook.set_visibility(&entry.name, visibility)?,
                None => log::warn!("sheet '{}': unknown state '{}'", entry.name, state),
            }
        }
        if workbook.set_active_sheet(info.active_tab).is_err() {
            log::warn!("activeTab {} is out of range; selecting the first sheet", info.active_tab);
        }

        log::debug!(
            "read {} sheet(s), {} style(s), {} shared string(s)",
            workbook.sheet_count(),
            workbook.styles().len(),
            workbook.shared_strings().len()
        );
        Ok(workbook)
    }

    fn read_workbook_xml<R: BufRead>(mut xml_reader: Reader<R>) -> XlsxResult<WorkbookInfo> {
        xml_reader.trim_text(true);

        let mut info = WorkbookInfo::default();
        let mut buf = Vec::new();
        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"sheet" => {
                        let name = attr_str(&e, b"name");
                        let rel_id = attr_str(&e, b"r:id");
                        if let (Some(name), Some(rel_id)) = (name, rel_id) {
                            info.sheets.push(SheetEntry {
                                name,
                                id: attr_parse(&e, b"sheetId").unwrap_or(0),
                                state: attr_str(&e, b"state"),
                                rel_id,
                            });
                        }
                    }
                    b"workbookView" => {
                        info.active_tab = attr_parse(&e, b"activeTab").unwrap_or(0);
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }
        Ok(info)
    }

    /// Read `sharedStrings.xml`, keeping every entry at its original index
    ///
    /// Rich-text runs are flattened into plain text; phonetic runs are
    /// dropped.
    fn read_shared_strings<R: BufRead>(mut xml_reader: Reader<R>) -> XlsxResult<SharedStrings> {
        let mut strings = SharedStrings::new();
        let mut buf = Vec::new();
        let mut current: Option<String> = None;
        let mut in_text = false;
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"si" => current = Some(String::new()),
                    b"rPh" => in_phonetic = true,
                    b"t" => in_text = !in_phonetic,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.local_name().as_ref() == b"si" => {
                    strings.push("");
                }
                Ok(Event::Text(t)) if in_text => {
                    if let Some(s) = current.as_mut() {
                        s.push_str(&t.unescape().map_err(XlsxError::Xml)?);
                    }
                }
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        if let Some(s) = current.take() {
                            strings.push(decode_excel_escapes(&s));
                        }
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_text = false,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }
        Ok(strings)
    }

    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        sheet: &mut Worksheet,
        ctx: &SheetContext<'_>,
    ) -> XlsxResult<()> {
        let drawing_rid = {
            let xml = part_reader(archive, path)
                .ok_or_else(|| XlsxError::MissingPart(path.to_string()))?;
            worksheet::read_sheet_xml(xml, sheet, ctx)?
        };

        let rels = read_relationships(archive, path)?;

        if let Some(rel) = find_rel(&rels, REL_COMMENTS) {
            match part_reader(archive, &rel.target) {
                Some(xml) => worksheet::read_comments_xml(xml, sheet)?,
                None => log::warn!("{}: comments part {} is missing", path, rel.target),
            }
        }

        let drawing = match drawing_rid {
            Some(rid) => rels.iter().find(|r| r.id == rid),
            None => find_rel(&rels, REL_DRAWING),
        };
        if let Some(rel) = drawing.filter(|r| r.rel_type == REL_DRAWING) {
            drawing::read_drawing(archive, &rel.target, sheet)?;
        }

        log::trace!("{}: {} cell(s)", sheet.name(), sheet.cell_count());
        Ok(())
    }
}

fn find_rel<'a>(rels: &'a [Relationship], rel_type: &str) -> Option<&'a Relationship> {
    rels.iter().find(|r| r.rel_type == rel_type)
}
