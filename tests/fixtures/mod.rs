//! Test fixtures for generating spreadsheet packages in memory.
//!
//! # Example
//!
//! ```rust,ignore
//! use fixtures::XlsxBuilder;
//!
//! let xlsx = XlsxBuilder::new()
//!     .add_sheet("Sheet1")
//!     .add_sheet("Sheet2")
//!     .build();
//!
//! let workbook = xlpick::decode(&xlsx).unwrap();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

// ============================================================================
// XLSX Builder
// ============================================================================

#[derive(Debug, Clone)]
struct SheetDef {
    name: String,
    state: Option<String>,
}

/// Builder for minimal but well-formed XLSX packages.
#[derive(Debug)]
pub struct XlsxBuilder {
    sheets: Vec<SheetDef>,
    date1904: bool,
    workbook_path: String,
    with_package_rels: bool,
}

impl Default for XlsxBuilder {
    fn default() -> Self {
        Self {
            sheets: Vec::new(),
            date1904: false,
            workbook_path: "xl/workbook.xml".to_string(),
            with_package_rels: true,
        }
    }
}

impl XlsxBuilder {
    /// Create a new XLSX builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a visible sheet.
    #[must_use]
    pub fn add_sheet(mut self, name: &str) -> Self {
        self.sheets.push(SheetDef {
            name: name.to_string(),
            state: None,
        });
        self
    }

    /// Add a sheet with an explicit `state` attribute (`hidden`, `veryHidden`).
    #[must_use]
    pub fn add_sheet_with_state(mut self, name: &str, state: &str) -> Self {
        self.sheets.push(SheetDef {
            name: name.to_string(),
            state: Some(state.to_string()),
        });
        self
    }

    /// Use the 1904 date system.
    #[must_use]
    pub fn date1904(mut self) -> Self {
        self.date1904 = true;
        self
    }

    /// Store the workbook part somewhere other than `xl/workbook.xml`.
    #[must_use]
    pub fn workbook_path(mut self, path: &str) -> Self {
        self.workbook_path = path.to_string();
        self
    }

    /// Leave out `_rels/.rels`.
    #[must_use]
    pub fn without_package_rels(mut self) -> Self {
        self.with_package_rels = false;
        self
    }

    /// Build the XLSX file as bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        let cursor = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(cursor);
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let (dir, _) = self
            .workbook_path
            .rsplit_once('/')
            .unwrap_or(("", self.workbook_path.as_str()));
        let dir = dir.to_string();

        let _ = zip.start_file("[Content_Types].xml", options);
        let _ = zip.write_all(generate_content_types(&self.workbook_path, self.sheets.len()).as_bytes());

        if self.with_package_rels {
            let _ = zip.start_file("_rels/.rels", options);
            let _ = zip.write_all(generate_rels(&self.workbook_path).as_bytes());
        }

        let _ = zip.start_file(format!("{dir}/_rels/workbook.xml.rels"), options);
        let _ = zip.write_all(generate_workbook_rels(self.sheets.len()).as_bytes());

        let _ = zip.start_file(self.workbook_path.as_str(), options);
        let _ = zip.write_all(generate_workbook(&self.sheets, self.date1904).as_bytes());

        for i in 1..=self.sheets.len() {
            let _ = zip.start_file(format!("{dir}/worksheets/sheet{i}.xml"), options);
            let _ = zip.write_all(minimal_sheet_xml().as_bytes());
        }

        let cursor = zip.finish().expect("Failed to finish ZIP");
        cursor.into_inner()
    }
}

/// Generate [Content_Types].xml
fn generate_content_types(workbook_path: &str, sheet_count: usize) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push_str(&format!(
        r#"<Override PartName="/{workbook_path}" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#
    ));
    for i in 1..=sheet_count {
        xml.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
        ));
    }
    xml.push_str("</Types>");
    xml
}

/// Generate _rels/.rels
fn generate_rels(workbook_path: &str) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    xml.push_str(r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#);
    xml.push_str(&format!(
        r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="{workbook_path}"/>"#
    ));
    xml.push_str("</Relationships>");
    xml
}

/// Generate the workbook relationships part
fn generate_workbook_rels(sheet_count: usize) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for i in 1..=sheet_count {
        xml.push_str(&format!(
            r#"<Relationship Id="rId{i}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{i}.xml"/>"#
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

/// Generate the workbook part
fn generate_workbook(sheets: &[SheetDef], date1904: bool) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#);
    if date1904 {
        xml.push_str(r#"<workbookPr date1904="1"/>"#);
    } else {
        xml.push_str(r#"<workbookPr defaultThemeVersion="124226"/>"#);
    }
    xml.push_str(r#"<bookViews><workbookView xWindow="0" yWindow="0" windowWidth="28800" windowHeight="12300"/></bookViews>"#);

    if sheets.is_empty() {
        xml.push_str("<sheets/>");
    } else {
        xml.push_str("<sheets>");
        for (i, sheet) in sheets.iter().enumerate() {
            let state = sheet
                .state
                .as_ref()
                .map(|s| format!(r#" state="{s}""#))
                .unwrap_or_default();
            xml.push_str(&format!(
                r#"<sheet name="{}" sheetId="{}"{} r:id="rId{}"/>"#,
                escape_xml(&sheet.name),
                i + 1,
                state,
                i + 1
            ));
        }
        xml.push_str("</sheets>");
    }

    xml.push_str("<calcPr calcId=\"191029\"/>");
    xml.push_str("</workbook>");
    xml
}

fn minimal_sheet_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData/></worksheet>"#
}

// ============================================================================
// ODS Builder
// ============================================================================

/// Builder for minimal OpenDocument spreadsheets.
#[derive(Debug, Default)]
pub struct OdsBuilder {
    tables: Vec<(String, bool)>,
}

impl OdsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn add_table(mut self, name: &str) -> Self {
        self.tables.push((name.to_string(), false));
        self
    }

    /// Add a table whose style hides it (`table:display="false"`).
    #[must_use]
    pub fn add_hidden_table(mut self, name: &str) -> Self {
        self.tables.push((name.to_string(), true));
        self
    }

    /// The content.xml body alone, for hand-assembled packages.
    #[must_use]
    pub fn content(&self) -> String {
        generate_ods_content(&self.tables)
    }

    #[must_use]
    pub fn build(self) -> Vec<u8> {
        build_opendocument(
            "application/vnd.oasis.opendocument.spreadsheet",
            &generate_ods_content(&self.tables),
        )
    }
}

/// Package `content` as an OpenDocument with the given `mimetype`.
#[must_use]
pub fn build_opendocument(mimetype: &str, content: &str) -> Vec<u8> {
    let cursor = Cursor::new(Vec::new());
    let mut zip = ZipWriter::new(cursor);
    let stored = FileOptions::default().compression_method(zip::CompressionMethod::Stored);
    let deflated = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    // The mimetype entry must come first and be stored uncompressed
    let _ = zip.start_file("mimetype", stored);
    let _ = zip.write_all(mimetype.as_bytes());

    let _ = zip.start_file("META-INF/manifest.xml", deflated);
    let _ = zip.write_all(
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><manifest:manifest xmlns:manifest="urn:oasis:names:tc:opendocument:xmlns:manifest:1.0" manifest:version="1.3"><manifest:file-entry manifest:full-path="/" manifest:media-type="{mimetype}"/><manifest:file-entry manifest:full-path="content.xml" manifest:media-type="text/xml"/></manifest:manifest>"#
        )
        .as_bytes(),
    );

    let _ = zip.start_file("content.xml", deflated);
    let _ = zip.write_all(content.as_bytes());

    let cursor = zip.finish().expect("Failed to finish ZIP");
    cursor.into_inner()
}

fn generate_ods_content(tables: &[(String, bool)]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push_str(r#"<office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:style="urn:oasis:names:tc:opendocument:xmlns:style:1.0" xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" office:version="1.3">"#);
    xml.push_str("<office:automatic-styles>");
    xml.push_str(r#"<style:style style:name="ta1" style:family="table" style:master-page-name="Default"><style:table-properties table:display="true" style:writing-mode="lr-tb"/></style:style>"#);
    xml.push_str(r#"<style:style style:name="ta2" style:family="table" style:master-page-name="Default"><style:table-properties table:display="false" style:writing-mode="lr-tb"/></style:style>"#);
    xml.push_str("</office:automatic-styles>");
    xml.push_str("<office:body><office:spreadsheet>");
    for (name, hidden) in tables {
        let style = if *hidden { "ta2" } else { "ta1" };
        xml.push_str(&format!(
            r#"<table:table table:name="{}" table:style-name="{style}"><table:table-column/><table:table-row><table:table-cell office:value-type="string"><text:p>x</text:p></table:table-cell></table:table-row></table:table>"#,
            escape_xml(name)
        ));
    }
    xml.push_str("</office:spreadsheet></office:body></office:document-content>");
    xml
}

// ============================================================================
// Helpers
// ============================================================================

/// Wrap arbitrary parts into a ZIP archive.
#[must_use]
pub fn zip_parts(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (path, body) in parts {
        let _ = zip.start_file(*path, FileOptions::default());
        let _ = zip.write_all(body.as_bytes());
    }
    zip.finish().expect("Failed to finish ZIP").into_inner()
}

/// Escape XML special characters.
#[must_use]
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
