//! Images placed through a sheet's drawing part

use std::io::{BufRead, Read, Seek};

use cellbook_core::Worksheet;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::xml::{attr_str, part_reader, read_part_bytes, read_relationships, REL_IMAGE};

/// One side of a two-cell anchor, 0-based as stored
#[derive(Debug, Default, Clone, Copy)]
struct Marker {
    col: u32,
    col_off: i64,
    row: u32,
    row_off: i64,
}

/// An anchored picture found in a drawing part
#[derive(Debug, Default)]
struct AnchoredPicture {
    from: Marker,
    to: Marker,
    embed: Option<String>,
}

impl AnchoredPicture {
    /// Inclusive 1-based `(start_row, start_col, end_row, end_col)`
    ///
    /// A `to` marker sitting exactly on a cell's top-left corner ends the
    /// picture in the cell before it.
    fn cell_span(&self) -> (u32, u32, u32, u32) {
        let start_row = self.from.row + 1;
        let start_col = self.from.col + 1;
        let end_row = if self.to.row_off > 0 { self.to.row + 1 } else { self.to.row };
        let end_col = if self.to.col_off > 0 { self.to.col + 1 } else { self.to.col };
        (start_row, start_col, end_row.max(start_row), end_col.max(start_col))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerField {
    Col,
    ColOff,
    Row,
    RowOff,
}

/// Load every picture of a drawing part into `sheet`
pub(crate) fn read_drawing<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
    drawing_path: &str,
    sheet: &mut Worksheet,
) -> XlsxResult<()> {
    let pictures = match part_reader(archive, drawing_path) {
        Some(xml) => read_drawing_xml(xml)?,
        None => {
            log::warn!("{}: drawing part {} is missing", sheet.name(), drawing_path);
            return Ok(());
        }
    };
    let rels = read_relationships(archive, drawing_path)?;

    for picture in pictures {
        let Some(target) = picture.embed.as_ref().and_then(|id| {
            rels.iter()
                .find(|r| &r.id == id && r.rel_type == REL_IMAGE)
                .map(|r| r.target.clone())
        }) else {
            log::warn!("{}: picture without an image relationship", sheet.name());
            continue;
        };

        let data = read_part_bytes(archive, &target)?;
        let extension = target.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
        let (start_row, start_col, end_row, end_col) = picture.cell_span();
        if let Err(err) = sheet.add_image(data, extension, start_row, start_col, end_row, end_col) {
            log::warn!("{}: skipping image {}: {}", sheet.name(), target, err);
        }
    }
    Ok(())
}

fn read_drawing_xml<R: BufRead>(mut xml_reader: Reader<R>) -> XlsxResult<Vec<AnchoredPicture>> {
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut pictures = Vec::new();
    let mut current: Option<AnchoredPicture> = None;
    let mut in_from = false;
    let mut in_to = false;
    let mut field: Option<MarkerField> = None;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"twoCellAnchor" => current = Some(AnchoredPicture::default()),
                b"from" => in_from = true,
                b"to" => in_to = true,
                b"col" => field = Some(MarkerField::Col),
                b"colOff" => field = Some(MarkerField::ColOff),
                b"row" => field = Some(MarkerField::Row),
                b"rowOff" => field = Some(MarkerField::RowOff),
                b"blip" => {
                    if let Some(p) = current.as_mut() {
                        p.embed = attr_str(&e, b"r:embed");
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"blip" => {
                if let Some(p) = current.as_mut() {
                    p.embed = attr_str(&e, b"r:embed");
                }
            }
            Ok(Event::Text(t)) => {
                if let (Some(f), Some(p)) = (field, current.as_mut()) {
                    let marker = match (in_from, in_to) {
                        (true, _) => Some(&mut p.from),
                        (_, true) => Some(&mut p.to),
                        _ => None,
                    };
                    if let Some(marker) = marker {
                        let text = t.unescape().map_err(XlsxError::Xml)?;
                        set_marker_field(marker, f, text.trim());
                    }
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"from" => in_from = false,
                b"to" => in_to = false,
                b"col" | b"colOff" | b"row" | b"rowOff" => field = None,
                b"twoCellAnchor" => {
                    if let Some(p) = current.take() {
                        pictures.push(p);
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
    Ok(pictures)
}

fn set_marker_field(marker: &mut Marker, field: MarkerField, text: &str) {
    match field {
        MarkerField::Col => marker.col = text.parse().unwrap_or(0),
        MarkerField::ColOff => marker.col_off = text.parse().unwrap_or(0),
        MarkerField::Row => marker.row = text.parse().unwrap_or(0),
        MarkerField::RowOff => marker.row_off = text.parse().unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pictures(xml: &str) -> Vec<AnchoredPicture> {
        read_drawing_xml(Reader::from_str(xml)).unwrap()
    }

    #[test]
    fn test_anchor_on_corner_ends_in_previous_cell() {
        let xml = r#"<xdr:wsDr xmlns:xdr="x" xmlns:a="a" xmlns:r="r"><xdr:twoCellAnchor>
            <xdr:from><xdr:col>2</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>1</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from>
            <xdr:to><xdr:col>5</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>4</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:to>
            <xdr:pic><xdr:blipFill><a:blip r:embed="rId3"/></xdr:blipFill></xdr:pic>
        </xdr:twoCellAnchor></xdr:wsDr>"#;
        let found = pictures(xml);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].embed.as_deref(), Some("rId3"));
        assert_eq!(found[0].cell_span(), (2, 3, 4, 5));
    }

    #[test]
    fn test_anchor_with_offset_includes_partial_cell() {
        let xml = r#"<wsDr><twoCellAnchor>
            <from><col>0</col><colOff>0</colOff><row>0</row><rowOff>0</rowOff></from>
            <to><col>1</col><colOff>9525</colOff><row>0</row><rowOff>0</rowOff></to>
            <pic><blipFill><blip r:embed="rId1"/></blipFill></pic>
        </twoCellAnchor></wsDr>"#;
        // the row end sits on the start corner, so it is clamped to the start row
        assert_eq!(pictures(xml)[0].cell_span(), (1, 1, 1, 2));
    }
}
