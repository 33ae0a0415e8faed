use serde::{Deserialize, Serialize};

/// Container format a workbook was decoded from
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum WorkbookFormat {
    /// Office Open XML SpreadsheetML (`.xlsx`, `.xlsm`)
    Xlsx,
    /// OpenDocument spreadsheet (`.ods`)
    Ods,
}

/// Excel date system - determines how serial dates are interpreted
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum DateSystem {
    /// Windows 1900 date system (default) - serial date 1 = January 1, 1900
    #[default]
    Date1900,
    /// Mac 1904 date system - serial date 0 = January 1, 1904
    Date1904,
}

/// Sheet visibility state
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SheetState {
    #[default]
    Visible,
    Hidden,
    VeryHidden,
}

impl SheetState {
    /// Map the `state` attribute of a `<sheet>` element.
    pub fn from_attr(value: &str) -> Self {
        match value {
            "hidden" => Self::Hidden,
            "veryHidden" => Self::VeryHidden,
            _ => Self::Visible,
        }
    }

    #[must_use]
    pub fn is_visible(self) -> bool {
        matches!(self, Self::Visible)
    }
}

/// One entry of the workbook's sheet list
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SheetInfo {
    pub name: String,
    /// `sheetId` from workbook.xml (OOXML only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_id: Option<u32>,
    pub state: SheetState,
}

impl SheetInfo {
    #[must_use]
    pub fn visible(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sheet_id: None,
            state: SheetState::Visible,
        }
    }
}

/// A decoded workbook: its structure only, never cell contents.
///
/// Sheets are kept in the order the source file lists them.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Workbook {
    pub format: WorkbookFormat,
    pub sheets: Vec<SheetInfo>,
    pub date_system: DateSystem,
}

impl Workbook {
    /// All sheet names, hidden ones included, in file order.
    #[must_use]
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    /// Names of the sheets a user would see as tabs.
    #[must_use]
    pub fn visible_sheet_names(&self) -> Vec<String> {
        self.sheets
            .iter()
            .filter(|s| s.state.is_visible())
            .map(|s| s.name.clone())
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
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

    fn workbook() -> Workbook {
        Workbook {
            format: WorkbookFormat::Xlsx,
            sheets: vec![
                SheetInfo::visible("Data"),
                SheetInfo {
                    name: "Lookup".to_string(),
                    sheet_id: Some(2),
                    state: SheetState::Hidden,
                },
                SheetInfo {
                    name: "Macros".to_string(),
                    sheet_id: Some(3),
                    state: SheetState::VeryHidden,
                },
                SheetInfo::visible("Summary"),
            ],
            date_system: DateSystem::Date1900,
        }
    }

    #[test]
    fn sheet_names_keep_file_order() {
        assert_eq!(
            workbook().sheet_names(),
            vec!["Data", "Lookup", "Macros", "Summary"]
        );
    }

    #[test]
    fn visible_names_skip_hidden_states() {
        assert_eq!(workbook().visible_sheet_names(), vec!["Data", "Summary"]);
    }

    #[test]
    fn sheet_state_from_attr() {
        assert_eq!(SheetState::from_attr("hidden"), SheetState::Hidden);
        assert_eq!(SheetState::from_attr("veryHidden"), SheetState::VeryHidden);
        assert_eq!(SheetState::from_attr("visible"), SheetState::Visible);
        assert_eq!(SheetState::from_attr(""), SheetState::Visible);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(workbook()).unwrap();
        assert_eq!(json["dateSystem"], "date1900");
        assert_eq!(json["sheets"][2]["state"], "veryHidden");
        assert_eq!(json["sheets"][1]["sheetId"], 2);
        assert!(json["sheets"][0].get("sheetId").is_none());
    }
}
