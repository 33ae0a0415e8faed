//! Workbook decoder
//!
//! Sniffs the container format from the leading bytes and reads the sheet
//! list out of the ZIP package. Cell data is never touched.

mod ods;
mod xlsx;

use std::io::{Cursor, Read, Seek};
use zip::ZipArchive;

use crate::error::{DecodeError, DecodeResult};
use crate::namespaces::{
    ODS_CONTENT_PATH, ODS_MIMETYPE, ODS_MIMETYPE_PATH, ODS_TEMPLATE_MIMETYPE, OLE2_HEADER,
    OOXML_CONTENT_TYPES_PATH, ZIP_EMPTY_ARCHIVE, ZIP_LOCAL_HEADER,
};
use crate::types::{SelectedFile, Workbook, WorkbookFormat};

/// Container family recognised from the first bytes of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Zip,
    Ole2,
    Unknown,
}

/// Identify the container from its signature.
#[must_use]
pub fn sniff(data: &[u8]) -> Container {
    if data.starts_with(ZIP_LOCAL_HEADER) || data.starts_with(ZIP_EMPTY_ARCHIVE) {
        Container::Zip
    } else if data.starts_with(OLE2_HEADER) {
        Container::Ole2
    } else {
        Container::Unknown
    }
}

/// Decode spreadsheet bytes into a [`Workbook`] (sheet list only).
///
/// # Errors
/// Fails when the bytes are empty, are not a spreadsheet package, or the
/// package is damaged.
pub fn decode(data: &[u8]) -> DecodeResult<Workbook> {
    if data.is_empty() {
        return Err(DecodeError::Empty);
    }

    let workbook = match sniff(data) {
        Container::Zip => {
            let mut archive = ZipArchive::new(Cursor::new(data))?;
            match package_format(&mut archive)? {
                WorkbookFormat::Ods => ods::decode(&mut archive)?,
                WorkbookFormat::Xlsx => xlsx::decode(&mut archive)?,
            }
        }
        Container::Ole2 => {
            return Err(DecodeError::Unsupported(
                "legacy binary (.xls) or encrypted workbook",
            ))
        }
        Container::Unknown => return Err(DecodeError::NotASpreadsheet),
    };

    log::debug!(
        "decoded {:?} workbook with {} sheet(s)",
        workbook.format,
        workbook.sheets.len()
    );
    Ok(workbook)
}

/// Decode the bytes of a selected file.
///
/// The file name and MIME type are ignored: browsers report whatever the
/// operating system guessed, so only the bytes decide.
///
/// # Errors
/// See [`decode`].
pub fn decode_file(file: &SelectedFile) -> DecodeResult<Workbook> {
    decode(&file.bytes)
}

/// OpenDocument packages announce themselves through a stored `mimetype`
/// entry. Some writers leave it out, so a package with `content.xml` and no
/// OOXML content types is read as OpenDocument too; everything else is OOXML.
fn package_format<R: Read + Seek>(archive: &mut ZipArchive<R>) -> DecodeResult<WorkbookFormat> {
    let has = |archive: &ZipArchive<R>, path: &str| archive.file_names().any(|name| name == path);

    if !has(archive, ODS_MIMETYPE_PATH) {
        let opendocument =
            has(archive, ODS_CONTENT_PATH) && !has(archive, OOXML_CONTENT_TYPES_PATH);
        let format = if opendocument {
            WorkbookFormat::Ods
        } else {
            WorkbookFormat::Xlsx
        };
        return Ok(format);
    }

    let mut entry = archive.by_name(ODS_MIMETYPE_PATH)?;

    let mut mimetype = String::new();
    entry.read_to_string(&mut mimetype)?;
    let mimetype = mimetype.trim();

    if mimetype == ODS_MIMETYPE || mimetype == ODS_TEMPLATE_MIMETYPE {
        Ok(WorkbookFormat::Ods)
    } else if mimetype.starts_with("application/vnd.oasis.opendocument.") {
        // Text documents, presentations, drawings
        Err(DecodeError::NotASpreadsheet)
    } else {
        Ok(WorkbookFormat::Xlsx)
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

    #[test]
    fn test_sniff() {
        assert_eq!(sniff(b"PK\x03\x04rest"), Container::Zip);
        assert_eq!(sniff(b"PK\x05\x06"), Container::Zip);
        assert_eq!(sniff(OLE2_HEADER), Container::Ole2);
        assert_eq!(sniff(b"Name,Age\n"), Container::Unknown);
        assert_eq!(sniff(b"PK"), Container::Unknown);
    }

    #[test]
    fn test_decode_empty() {
        assert!(matches!(decode(b""), Err(DecodeError::Empty)));
    }

    #[test]
    fn test_decode_ole2_is_unsupported() {
        let mut data = OLE2_HEADER.to_vec();
        data.extend_from_slice(&[0u8; 504]);
        assert!(matches!(decode(&data), Err(DecodeError::Unsupported(_))));
    }

    #[test]
    fn test_decode_text_is_not_a_spreadsheet() {
        assert!(matches!(
            decode(b"just some text"),
            Err(DecodeError::NotASpreadsheet)
        ));
    }

    #[test]
    fn test_decode_truncated_zip() {
        // Valid signature, garbage after it
        let data = b"PK\x03\x04\x14\x00\x00\x00\x08\x00garbage";
        assert!(matches!(decode(data), Err(DecodeError::Zip(_))));
    }
}
