//! XLSX writer

mod drawing;
mod worksheet;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use cellbook_core::{SheetVisibility, Workbook};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::doc_props::{write_core_xml, CORE_PROPERTIES_PATH, REL_CORE_PROPERTIES};
use crate::error::XlsxResult;
use crate::styles::write_styles_xml;
use crate::xml::{
    escape_xml, REL_COMMENTS, REL_DRAWING, REL_NS, REL_SHARED_STRINGS, REL_STYLES, REL_WORKSHEET,
    XML_HEADER,
};

pub(crate) use worksheet::ISO_DATETIME;
use worksheet::{write_comments_xml, write_sheet_xml, SheetRels};

/// Parts emitted for one worksheet
#[derive(Debug)]
struct SheetPlan {
    /// 1-based part number (`sheetN.xml`, `commentsN.xml`, `drawingN.xml`)
    number: usize,
    comments: Option<String>,
    comments_rid: Option<String>,
    drawing_rid: Option<String>,
    /// Package-wide media numbers of the sheet's images
    media_numbers: Vec<usize>,
}

/// XLSX file writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a workbook to a file path
    pub fn write_file<P: AsRef<Path>>(workbook: &Workbook, path: P) -> XlsxResult<()> {
        let file = File::create(path)?;
        Self::write(workbook, file)
    }

    /// Write a workbook to a writer
    pub fn write<W: Write + Seek>(workbook: &Workbook, writer: W) -> XlsxResult<()> {
        let mut zip = ZipWriter::new(writer);
        let plans = Self::plan_sheets(workbook);
        log::debug!(
            "writing {} sheet(s), {} style(s), {} shared string(s)",
            workbook.sheet_count(),
            workbook.styles().len(),
            workbook.shared_strings().len()
        );

        Self::write_content_types(&mut zip, workbook, &plans)?;
        Self::write_root_rels(&mut zip)?;
        write_part(&mut zip, CORE_PROPERTIES_PATH, &write_core_xml(workbook.properties()))?;
        Self::write_workbook_xml(&mut zip, workbook)?;
        Self::write_workbook_rels(&mut zip, workbook)?;
        write_part(&mut zip, "xl/styles.xml", &write_styles_xml(workbook.styles()))?;
        if !workbook.shared_strings().is_empty() {
            Self::write_shared_strings(&mut zip, workbook)?;
        }

        for (sheet, plan) in workbook.worksheets().zip(&plans) {
            let rels = SheetRels {
                drawing: plan.drawing_rid.clone(),
            };
            let tab_selected = plan.number - 1 == workbook.active_sheet();
            let xml = write_sheet_xml(sheet, workbook.shared_strings(), tab_selected, &rels);
            write_part(
                &mut zip,
                format!("xl/worksheets/sheet{}.xml", plan.number),
                &xml,
            )?;

            Self::write_worksheet_rels(&mut zip, plan)?;
            if let Some(comments) = &plan.comments {
                write_part(&mut zip, format!("xl/comments{}.xml", plan.number), comments)?;
            }
            if plan.drawing_rid.is_some() {
                Self::write_drawing(&mut zip, sheet, plan)?;
            }
        }

        zip.finish()?;
        Ok(())
    }

    fn plan_sheets(workbook: &Workbook) -> Vec<SheetPlan> {
        let mut next_media = 1;
        workbook
            .worksheets()
            .enumerate()
            .map(|(i, sheet)| {
                let comments = write_comments_xml(sheet);
                let mut next_rid = 1;
                let mut rid = || {
                    let id = format!("rId{}", next_rid);
                    next_rid += 1;
                    id
                };
                let comments_rid = comments.as_ref().map(|_| rid());
                let drawing_rid = (!sheet.images().is_empty()).then(|| rid());
                let media_numbers = (next_media..next_media + sheet.images().len()).collect();
                next_media += sheet.images().len();
                SheetPlan {
                    number: i + 1,
                    comments,
                    comments_rid,
                    drawing_rid,
                    media_numbers,
                }
            })
            .collect()
    }

    fn write_content_types<W: Write + Seek>(
        zip: &mut ZipWriter<W>,
        workbook: &Workbook,
        plans: &[SheetPlan],
    ) -> XlsxResult<()> {
        let mut content = String::from(XML_HEADER);
        content.push_str(
            r#"
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>"#,
        );

        let mut image_types = BTreeMap::new();
        for sheet in workbook.worksheets() {
            for placed in sheet.images() {
                image_types
                    .entry(placed.image.extension().to_string())
                    .or_insert_with(|| placed.image.content_type());
            }
        }
        for (extension, content_type) in &image_types {
            content.push_str(&format!(
                "\n    <Default Extension=\"{}\" ContentType=\"{}\"/>",
                escape_xml(extension),
                content_type
            ));
        }

        content.push_str(
            r#"
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
    <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#,
        );
        if !workbook.shared_strings().is_empty() {
            content.push_str(
                r#"
    <Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#,
            );
        }

        for plan in plans {
            content.push_str(&format!(
                r#"
    <Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                plan.number
            ));
            if plan.comments.is_some() {
                content.push_str(&format!(
                    r#"
    <Override PartName="/xl/comments{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.comments+xml"/>"#,
                    plan.number
                ));
            }
            if plan.drawing_rid.is_some() {
                content.push_str(&format!(
                    r#"
    <Override PartName="/xl/drawings/drawing{}.xml" ContentType="application/vnd.openxmlformats-officedocument.drawing+xml"/>"#,
                    plan.number
                ));
            }
        }

        content.push_str("\n</Types>");
        write_part(zip, "[Content_Types].xml", &content)
    }

    fn write_root_rels<W: Write + Seek>(zip: &mut ZipWriter<W>) -> XlsxResult<()> {
        let content = format!(
            r#"{}
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
    <Relationship Id="rId2" Type="{}" Target="{}"/>
</Relationships>"#,
            XML_HEADER, REL_CORE_PROPERTIES, CORE_PROPERTIES_PATH
        );
        write_part(zip, "_rels/.rels", &content)
    }

    fn write_workbook_xml<W: Write + Seek>(
        zip: &mut ZipWriter<W>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        let mut content = String::from(XML_HEADER);
        content.push_str(&format!(
            r#"
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="{}">
    <bookViews>
        <workbookView activeTab="{}"/>
    </bookViews>
    <sheets>"#,
            REL_NS,
            workbook.active_sheet()
        ));

        for (i, sheet) in workbook.worksheets().enumerate() {
            let state = match sheet.visibility() {
                SheetVisibility::Visible => String::new(),
                other => other
                    .xlsx_state()
                    .map(|s| format!(" state=\"{}\"", s))
                    .unwrap_or_default(),
            };
            content.push_str(&format!(
                r#"
        <sheet name="{}" sheetId="{}"{} r:id="rId{}"/>"#,
                escape_xml(sheet.name()),
                sheet.id(),
                state,
                i + 1
            ));
        }

        content.push_str(
            r#"
    </sheets>
</workbook>"#,
        );
        write_part(zip, "xl/workbook.xml", &content)
    }

    fn write_workbook_rels<W: Write + Seek>(
        zip: &mut ZipWriter<W>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        let mut content = String::from(XML_HEADER);
        content.push_str(
            r#"
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );

        let sheet_count = workbook.sheet_count();
        for i in 1..=sheet_count {
            content.push_str(&format!(
                "\n    <Relationship Id=\"rId{}\" Type=\"{}\" Target=\"worksheets/sheet{}.xml\"/>",
                i, REL_WORKSHEET, i
            ));
        }
        content.push_str(&format!(
            "\n    <Relationship Id=\"rId{}\" Type=\"{}\" Target=\"styles.xml\"/>",
            sheet_count + 1,
            REL_STYLES
        ));
        if !workbook.shared_strings().is_empty() {
            content.push_str(&format!(
                "\n    <Relationship Id=\"rId{}\" Type=\"{}\" Target=\"sharedStrings.xml\"/>",
                sheet_count + 2,
                REL_SHARED_STRINGS
            ));
        }

        content.push_str("\n</Relationships>");
        write_part(zip, "xl/_rels/workbook.xml.rels", &content)
    }

    fn write_shared_strings<W: Write + Seek>(
        zip: &mut ZipWriter<W>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        let strings = workbook.shared_strings();
        let mut content = String::from(XML_HEADER);
        content.push_str(&format!(
            "\n<sst xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" count=\"{0}\" uniqueCount=\"{0}\">",
            strings.len()
        ));
        for s in strings.iter() {
            content.push_str(&format!(
                "<si><t xml:space=\"preserve\">{}</t></si>",
                escape_xml(&crate::xml::encode_excel_escapes(s))
            ));
        }
        content.push_str("</sst>");
        write_part(zip, "xl/sharedStrings.xml", &content)
    }

    /// Relationships of a sheet part (comments and drawing)
    fn write_worksheet_rels<W: Write + Seek>(
        zip: &mut ZipWriter<W>,
        plan: &SheetPlan,
    ) -> XlsxResult<()> {
        if plan.comments_rid.is_none() && plan.drawing_rid.is_none() {
            return Ok(());
        }

        let mut content = String::from(XML_HEADER);
        content.push_str(
            "\n<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
        );
        if let Some(rid) = &plan.comments_rid {
            content.push_str(&format!(
                "\n    <Relationship Id=\"{}\" Type=\"{}\" Target=\"../comments{}.xml\"/>",
                rid, REL_COMMENTS, plan.number
            ));
        }
        if let Some(rid) = &plan.drawing_rid {
            content.push_str(&format!(
                "\n    <Relationship Id=\"{}\" Type=\"{}\" Target=\"../drawings/drawing{}.xml\"/>",
                rid, REL_DRAWING, plan.number
            ));
        }
        content.push_str("\n</Relationships>");

        write_part(
            zip,
            format!("xl/worksheets/_rels/sheet{}.xml.rels", plan.number),
            &content,
        )
    }

    fn write_drawing<W: Write + Seek>(
        zip: &mut ZipWriter<W>,
        sheet: &cellbook_core::Worksheet,
        plan: &SheetPlan,
    ) -> XlsxResult<()> {
        let images = sheet.images();
        write_part(
            zip,
            format!("xl/drawings/drawing{}.xml", plan.number),
            &drawing::write_drawing_xml(images),
        )?;
        write_part(
            zip,
            format!("xl/drawings/_rels/drawing{}.xml.rels", plan.number),
            &drawing::write_drawing_rels(images, &plan.media_numbers),
        )?;

        for (placed, n) in images.iter().zip(&plan.media_numbers) {
            zip.start_file(
                drawing::media_path(*n, placed.image.extension()),
                SimpleFileOptions::default(),
            )?;
            zip.write_all(placed.image.data())?;
        }
        Ok(())
    }
}

/// Add one XML part to the archive
fn write_part<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    path: impl Into<String>,
    content: &str,
) -> XlsxResult<()> {
    zip.start_file(path.into(), SimpleFileOptions::default())?;
    zip.write_all(content.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn archive_of(workbook: &Workbook) -> zip::ZipArchive<Cursor<Vec<u8>>> {
        let mut cursor = Cursor::new(Vec::new());
        XlsxWriter::write(workbook, &mut cursor).unwrap();
        cursor.set_position(0);
        zip::ZipArchive::new(cursor).unwrap()
    }

    fn part(archive: &mut zip::ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
        let mut s = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut s).unwrap();
        s
    }

    #[test]
    fn test_minimal_package_parts() {
        let workbook = Workbook::new();
        let mut archive = archive_of(&workbook);
        for name in [
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/core.xml",
            "xl/workbook.xml",
            "xl/_rels/workbook.xml.rels",
            "xl/styles.xml",
            "xl/worksheets/sheet1.xml",
        ] {
            assert!(archive.by_name(name).is_ok(), "missing {}", name);
        }
        assert!(archive.by_name("xl/sharedStrings.xml").is_err());
    }

    #[test]
    fn test_workbook_part_records_ids_and_state() {
        let mut workbook = Workbook::new();
        workbook.add_sheet("Second").unwrap();
        workbook.add_sheet("Third").unwrap();
        workbook.remove_sheet("Second").unwrap();
        workbook.set_visibility("Third", SheetVisibility::Hidden).unwrap();
        workbook.set_active_sheet(1).unwrap();

        let mut archive = archive_of(&workbook);
        let xml = part(&mut archive, "xl/workbook.xml");
        assert!(xml.contains("<workbookView activeTab=\"1\"/>"));
        assert!(xml.contains("<sheet name=\"Third\" sheetId=\"3\" state=\"hidden\" r:id=\"rId2\"/>"));
    }

    #[test]
    fn test_sheet_rels_only_when_needed() {
        let mut workbook = Workbook::new();
        workbook.add_sheet("Notes").unwrap();
        workbook
            .worksheet_mut(1)
            .unwrap()
            .add_comment("A1", "Ann", "hi")
            .unwrap();
        workbook
            .worksheet_mut(1)
            .unwrap()
            .add_image(vec![0x89, 0x50], "png", 1, 1, 2, 2)
            .unwrap();

        let mut archive = archive_of(&workbook);
        assert!(archive.by_name("xl/worksheets/_rels/sheet1.xml.rels").is_err());
        let rels = part(&mut archive, "xl/worksheets/_rels/sheet2.xml.rels");
        assert!(rels.contains("Target=\"../comments2.xml\""));
        assert!(rels.contains("Id=\"rId2\""));
        assert!(rels.contains("Target=\"../drawings/drawing2.xml\""));
        assert!(archive.by_name("xl/media/image1.png").is_ok());

        let types = part(&mut archive, "[Content_Types].xml");
        assert!(types.contains("<Default Extension=\"png\" ContentType=\"image/png\"/>"));
    }
}
