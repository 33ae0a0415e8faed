//! Namespace, relationship and signature constants for workbook decoding
//!
//! Spreadsheet packages come in transitional and strict OOXML flavours and in
//! OpenDocument form. The decoder only needs enough of each to find the sheet
//! list, so only those constants live here.

use quick_xml::events::BytesStart;

// =============================================================================
// Container signatures
// =============================================================================

/// ZIP local file header (`PK\x03\x04`)
pub const ZIP_LOCAL_HEADER: &[u8] = b"PK\x03\x04";

/// ZIP end-of-central-directory record, the first bytes of an empty archive
pub const ZIP_EMPTY_ARCHIVE: &[u8] = b"PK\x05\x06";

/// OLE2 compound document header (legacy `.xls`, encrypted OOXML)
pub const OLE2_HEADER: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

// =============================================================================
// Office document relationship types
// =============================================================================

/// Relationship type for workbook (from root .rels)
pub const REL_WORKBOOK: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

/// Strict relationship type for workbook
pub const REL_WORKBOOK_STRICT: &str =
    "http://purl.oclc.org/ooxml/officeDocument/relationships/officeDocument";

/// Package-level relationships part
pub const PACKAGE_RELS_PATH: &str = "_rels/.rels";

/// Where Excel writes the workbook part when nothing says otherwise
pub const DEFAULT_WORKBOOK_PATH: &str = "xl/workbook.xml";

/// Content-types part present in every OOXML package
pub const OOXML_CONTENT_TYPES_PATH: &str = "[Content_Types].xml";

// =============================================================================
// OpenDocument
// =============================================================================

/// Contents of the `mimetype` entry of an OpenDocument spreadsheet
pub const ODS_MIMETYPE: &str = "application/vnd.oasis.opendocument.spreadsheet";

/// OpenDocument template variant (`.ots`)
pub const ODS_TEMPLATE_MIMETYPE: &str = "application/vnd.oasis.opendocument.spreadsheet-template";

/// Stored first in every OpenDocument package
pub const ODS_MIMETYPE_PATH: &str = "mimetype";

/// Part holding the spreadsheet body
pub const ODS_CONTENT_PATH: &str = "content.xml";

// =============================================================================
// Helper functions for namespace-aware parsing
// =============================================================================

/// Check if an element matches a local name, ignoring namespace prefix.
///
/// "x:sheet" and "sheet" both match when checking for "sheet".
#[inline]
pub fn element_matches(e: &BytesStart, local_name: &[u8]) -> bool {
    e.local_name().as_ref() == local_name
}

/// Check if a relationship type points at the main workbook part, handling
/// both transitional and strict OOXML variants.
pub fn is_workbook_relationship(rel_type: &str) -> bool {
    rel_type == REL_WORKBOOK
        || rel_type == REL_WORKBOOK_STRICT
        || rel_type.ends_with("/officeDocument")
}
