//! OpenDocument spreadsheets
//!
//! Sheet names live on the `table:table` children of `office:spreadsheet` in
//! content.xml. A table whose automatic style sets `table:display="false"` is
//! hidden.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashSet;
use std::io::{BufReader, Read, Seek};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::{DecodeError, DecodeResult};
use crate::namespaces::ODS_CONTENT_PATH;
use crate::types::{DateSystem, SheetInfo, SheetState, Workbook, WorkbookFormat};
use crate::xml_helpers::attr_string_local;

pub(super) fn decode<R: Read + Seek>(archive: &mut ZipArchive<R>) -> DecodeResult<Workbook> {
    let file = match archive.by_name(ODS_CONTENT_PATH) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => {
            return Err(DecodeError::MissingPart(ODS_CONTENT_PATH.to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(true);

    let mut sheets = Vec::new();
    let mut hidden_styles: HashSet<String> = HashSet::new();
    let mut table_style: Option<String> = None;
    let mut depth = 0usize;
    let mut spreadsheet_depth: Option<usize> = None;
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                match e.local_name().as_ref() {
                    b"style" => table_style = table_style_name(e)?,
                    b"table-properties" => note_hidden_style(e, &table_style, &mut hidden_styles)?,
                    b"table" if is_sheet_level(spreadsheet_depth, depth) => {
                        push_table(e, &hidden_styles, &mut sheets)?;
                    }
                    b"spreadsheet" => spreadsheet_depth = Some(depth),
                    _ => {}
                }
                depth += 1;
            }
            Event::Empty(ref e) => match e.local_name().as_ref() {
                b"table-properties" => note_hidden_style(e, &table_style, &mut hidden_styles)?,
                b"table" if is_sheet_level(spreadsheet_depth, depth) => {
                    push_table(e, &hidden_styles, &mut sheets)?;
                }
                _ => {}
            },
            Event::End(ref e) => {
                depth = depth.saturating_sub(1);
                match e.local_name().as_ref() {
                    b"style" => table_style = None,
                    b"spreadsheet" if spreadsheet_depth == Some(depth) => spreadsheet_depth = None,
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(Workbook {
        format: WorkbookFormat::Ods,
        sheets,
        date_system: DateSystem::Date1900,
    })
}

/// A table is a sheet only when it sits directly under `office:spreadsheet`.
fn is_sheet_level(spreadsheet_depth: Option<usize>, depth: usize) -> bool {
    spreadsheet_depth.is_some_and(|d| d + 1 == depth)
}

/// Name of a `style:style` element of the `table` family.
fn table_style_name(e: &BytesStart<'_>) -> DecodeResult<Option<String>> {
    if attr_string_local(e, b"family")?.as_deref() == Some("table") {
        attr_string_local(e, b"name")
    } else {
        Ok(None)
    }
}

fn note_hidden_style(
    e: &BytesStart<'_>,
    table_style: &Option<String>,
    hidden_styles: &mut HashSet<String>,
) -> DecodeResult<()> {
    if let Some(style) = table_style {
        if attr_string_local(e, b"display")?.as_deref() == Some("false") {
            hidden_styles.insert(style.clone());
        }
    }
    Ok(())
}

fn push_table(
    e: &BytesStart<'_>,
    hidden_styles: &HashSet<String>,
    sheets: &mut Vec<SheetInfo>,
) -> DecodeResult<()> {
    let Some(name) = attr_string_local(e, b"name")? else {
        return Ok(());
    };
    if name.is_empty() {
        return Ok(());
    }
    let hidden = attr_string_local(e, b"style-name")?
        .is_some_and(|style| hidden_styles.contains(&style));

    sheets.push(SheetInfo {
        name,
        sheet_id: None,
        state: if hidden {
            SheetState::Hidden
        } else {
            SheetState::Visible
        },
    });
    Ok(())
}
