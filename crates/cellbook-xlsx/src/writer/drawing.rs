//! Drawing parts for embedded images

use cellbook_core::SheetImage;

use crate::xml::{REL_IMAGE, REL_NS, XML_HEADER};

const XDR_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing";
const A_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

/// Archive path of the `n`th media file (1-based, numbered across the
/// whole package)
pub(crate) fn media_path(n: usize, extension: &str) -> String {
    format!("xl/media/image{}.{}", n, extension)
}

/// Generate `xl/drawings/drawingN.xml`; image `i` embeds `rId{i+1}`
pub(crate) fn write_drawing_xml(images: &[SheetImage]) -> String {
    let mut content = String::from(XML_HEADER);
    content.push_str(&format!(
        "\n<xdr:wsDr xmlns:xdr=\"{}\" xmlns:a=\"{}\" xmlns:r=\"{}\">",
        XDR_NS, A_NS, REL_NS
    ));

    for (i, placed) in images.iter().enumerate() {
        let start = placed.anchor.start();
        let end = placed.anchor.end();
        content.push_str("\n    <xdr:twoCellAnchor editAs=\"oneCell\">");
        // `from` is the top-left corner of the first cell, `to` the
        // top-left corner of the cell after the last one
        content.push_str(&marker("from", start.column() - 1, start.row() - 1));
        content.push_str(&marker("to", end.column(), end.row()));
        content.push_str(&format!(
            concat!(
                "<xdr:pic><xdr:nvPicPr><xdr:cNvPr id=\"{id}\" name=\"Picture {n}\"/>",
                "<xdr:cNvPicPr><a:picLocks noChangeAspect=\"1\"/></xdr:cNvPicPr></xdr:nvPicPr>",
                "<xdr:blipFill><a:blip r:embed=\"rId{n}\"/><a:stretch><a:fillRect/></a:stretch></xdr:blipFill>",
                "<xdr:spPr><a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></xdr:spPr></xdr:pic>",
                "<xdr:clientData/>"
            ),
            id = i + 2,
            n = i + 1
        ));
        content.push_str("</xdr:twoCellAnchor>");
    }

    content.push_str("\n</xdr:wsDr>");
    content
}

fn marker(tag: &str, col: u32, row: u32) -> String {
    format!(
        "<xdr:{tag}><xdr:col>{col}</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>{row}</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:{tag}>"
    )
}

/// Generate `xl/drawings/_rels/drawingN.xml.rels`
///
/// `media_numbers[i]` is the package-wide number of image `i`.
pub(crate) fn write_drawing_rels(images: &[SheetImage], media_numbers: &[usize]) -> String {
    let mut content = String::from(XML_HEADER);
    content.push_str(
        "\n<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
    );
    for (i, (placed, n)) in images.iter().zip(media_numbers).enumerate() {
        content.push_str(&format!(
            "\n    <Relationship Id=\"rId{}\" Type=\"{}\" Target=\"../media/image{}.{}\"/>",
            i + 1,
            REL_IMAGE,
            n,
            placed.image.extension()
        ));
    }
    content.push_str("\n</Relationships>");
    content
}
