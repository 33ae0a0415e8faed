//! OOXML (SpreadsheetML) packages

use std::io::{Read, Seek};
use zip::ZipArchive;

use crate::error::DecodeResult;
use crate::types::{Workbook, WorkbookFormat};
use crate::workbook_meta::{find_workbook_part, parse_workbook_xml};

pub(super) fn decode<R: Read + Seek>(archive: &mut ZipArchive<R>) -> DecodeResult<Workbook> {
    let path = find_workbook_part(archive)?;
    let meta = parse_workbook_xml(archive, &path)?;

    Ok(Workbook {
        format: WorkbookFormat::Xlsx,
        sheets: meta.sheets,
        date_system: meta.date_system,
    })
}
