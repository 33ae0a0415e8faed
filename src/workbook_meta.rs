//! Workbook metadata parsing module
//! This module locates the workbook part of an OOXML package and reads its
//! sheet list and date system from workbook.xml.

use crate::error::{DecodeError, DecodeResult};
use crate::namespaces::{
    element_matches, is_workbook_relationship, DEFAULT_WORKBOOK_PATH, PACKAGE_RELS_PATH,
};
use crate::types::{DateSystem, SheetInfo, SheetState};
use crate::xml_helpers::{attr_bool, attr_string, attr_u32};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{BufReader, Read, Seek};
use zip::result::ZipError;
use zip::ZipArchive;

/// Workbook metadata parsed from workbook.xml
#[derive(Debug, Default)]
pub struct WorkbookMeta {
    pub sheets: Vec<SheetInfo>,
    pub date_system: DateSystem,
}

/// Find the workbook part through the package relationships (`_rels/.rels`).
///
/// Most writers put it at `xl/workbook.xml`, which is also the fallback when
/// the package has no relationships part or no officeDocument relationship.
pub fn find_workbook_part<R: Read + Seek>(archive: &mut ZipArchive<R>) -> DecodeResult<String> {
    let file = match archive.by_name(PACKAGE_RELS_PATH) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(DEFAULT_WORKBOOK_PATH.to_string()),
        Err(e) => return Err(e.into()),
    };

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(true);

    let mut buf = Vec::new();
    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Empty(ref e) | Event::Start(ref e) if element_matches(e, b"Relationship") => {
                let rel_type = attr_string(e, b"Type")?.unwrap_or_default();
                if is_workbook_relationship(&rel_type) {
                    if let Some(target) = attr_string(e, b"Target")? {
                        if !target.is_empty() {
                            return Ok(resolve_package_target(&target));
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(DEFAULT_WORKBOOK_PATH.to_string())
}

/// Resolve a target from the package-level relationships to an archive path
fn resolve_package_target(target: &str) -> String {
    let mut path = target.trim_start_matches('/');
    while let Some(stripped) = path.strip_prefix("./") {
        path = stripped;
    }
    path.to_string()
}

/// Parse workbook.xml for the sheet list and the date system
///
/// Parses:
/// - `<sheets><sheet name="..." sheetId="1" r:id="rId1" state="hidden"/></sheets>`
/// - `<workbookPr date1904="1"/>`
///
/// The root element must be `<workbook>`; an officeDocument part of any other
/// kind (a word-processing document, say) is not a spreadsheet.
pub fn parse_workbook_xml<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
) -> DecodeResult<WorkbookMeta> {
    let file = match archive.by_name(path) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Err(DecodeError::MissingPart(path.to_string())),
        Err(e) => return Err(e.into()),
    };

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(true);

    let mut meta = WorkbookMeta::default();
    let mut buf = Vec::new();
    let mut seen_root = false;
    let mut in_sheets = false;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                if seen_root {
                    match e.local_name().as_ref() {
                        b"sheets" => in_sheets = true,
                        b"sheet" if in_sheets => push_sheet(e, &mut meta.sheets)?,
                        b"workbookPr" => meta.date_system = parse_workbook_pr(e),
                        _ => {}
                    }
                } else {
                    check_root(e)?;
                    seen_root = true;
                }
            }
            Event::Empty(ref e) => {
                if seen_root {
                    match e.local_name().as_ref() {
                        b"sheet" if in_sheets => push_sheet(e, &mut meta.sheets)?,
                        b"workbookPr" => meta.date_system = parse_workbook_pr(e),
                        _ => {}
                    }
                } else {
                    // `<workbook/>`: a workbook with nothing in it
                    check_root(e)?;
                    seen_root = true;
                }
            }
            Event::End(ref e) => {
                if e.local_name().as_ref() == b"sheets" {
                    in_sheets = false;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !seen_root {
        return Err(DecodeError::MissingPart(format!("{path} (no root element)")));
    }

    Ok(meta)
}

fn check_root(e: &BytesStart<'_>) -> DecodeResult<()> {
    if element_matches(e, b"workbook") {
        Ok(())
    } else {
        Err(DecodeError::NotASpreadsheet)
    }
}

/// Parse a sheet element and append its SheetInfo (nameless sheets are skipped)
fn push_sheet(e: &BytesStart<'_>, sheets: &mut Vec<SheetInfo>) -> DecodeResult<()> {
    let name = attr_string(e, b"name")?.unwrap_or_default();
    if name.is_empty() {
        return Ok(());
    }
    let state = attr_string(e, b"state")?
        .map(|s| SheetState::from_attr(&s))
        .unwrap_or_default();

    sheets.push(SheetInfo {
        name,
        sheet_id: attr_u32(e, b"sheetId"),
        state,
    });
    Ok(())
}

/// Parse workbookPr element for date system
fn parse_workbook_pr(e: &BytesStart<'_>) -> DateSystem {
    if attr_bool(e, b"date1904").unwrap_or(false) {
        DateSystem::Date1904
    } else {
        DateSystem::Date1900
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn archive(parts: &[(&str, &str)]) -> ZipArchive<Cursor<Vec<u8>>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (path, body) in parts {
            zip.start_file(*path, FileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        let cursor = zip.finish().unwrap();
        ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap()
    }

    #[test]
    fn test_resolve_package_target() {
        assert_eq!(resolve_package_target("xl/workbook.xml"), "xl/workbook.xml");
        assert_eq!(resolve_package_target("/xl/workbook.xml"), "xl/workbook.xml");
        assert_eq!(resolve_package_target("./book/wb.xml"), "book/wb.xml");
    }

    #[test]
    fn test_find_workbook_part_without_rels() {
        let mut zip = archive(&[("xl/workbook.xml", "<workbook/>")]);
        assert_eq!(find_workbook_part(&mut zip).unwrap(), "xl/workbook.xml");
    }

    #[test]
    fn test_find_workbook_part_follows_office_document() {
        let mut zip = archive(&[(
            "_rels/.rels",
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
                <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
                <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="/custom/book.xml"/>
            </Relationships>"#,
        )]);
        assert_eq!(find_workbook_part(&mut zip).unwrap(), "custom/book.xml");
    }

    #[test]
    fn test_parse_workbook_xml_sheets_and_states() {
        let mut zip = archive(&[(
            "xl/workbook.xml",
            r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
                <workbookPr date1904="1"/>
                <sheets>
                    <sheet name="Q1 &amp; Q2" sheetId="1" r:id="rId1"/>
                    <sheet name="" sheetId="2" r:id="rId2"/>
                    <sheet name="Hidden" sheetId="7" state="hidden" r:id="rId3"/>
                </sheets>
                <definedNames><definedName name="sheet">Sheet1!$A$1</definedName></definedNames>
            </workbook>"#,
        )]);
        let meta = parse_workbook_xml(&mut zip, "xl/workbook.xml").unwrap();
        assert_eq!(meta.date_system, DateSystem::Date1904);
        assert_eq!(meta.sheets.len(), 2);
        assert_eq!(meta.sheets[0].name, "Q1 & Q2");
        assert_eq!(meta.sheets[0].sheet_id, Some(1));
        assert_eq!(meta.sheets[1].name, "Hidden");
        assert_eq!(meta.sheets[1].sheet_id, Some(7));
        assert_eq!(meta.sheets[1].state, SheetState::Hidden);
    }

    #[test]
    fn test_parse_workbook_xml_missing_part() {
        let mut zip = archive(&[("docProps/app.xml", "<Properties/>")]);
        let err = parse_workbook_xml(&mut zip, "xl/workbook.xml").unwrap_err();
        assert!(matches!(err, DecodeError::MissingPart(p) if p == "xl/workbook.xml"));
    }

    #[test]
    fn test_parse_workbook_xml_rejects_other_documents() {
        let mut zip = archive(&[("word/document.xml", "<w:document xmlns:w=\"x\"><w:body/></w:document>")]);
        let err = parse_workbook_xml(&mut zip, "word/document.xml").unwrap_err();
        assert!(matches!(err, DecodeError::NotASpreadsheet));
    }

    #[test]
    fn test_parse_workbook_xml_malformed() {
        let mut zip = archive(&[(
            "xl/workbook.xml",
            "<workbook><sheets><sheet name=\"A\"/></sheetz></workbook>",
        )]);
        let err = parse_workbook_xml(&mut zip, "xl/workbook.xml").unwrap_err();
        assert!(matches!(err, DecodeError::Xml(_)));
    }
}
