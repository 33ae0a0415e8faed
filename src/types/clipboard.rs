use serde::Serialize;

/// Which platform mechanism carried out a copy
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CopyMethod {
    /// `navigator.clipboard.writeText`
    AsyncClipboard,
    /// Select the node's text and run the `copy` command
    LegacySelection,
}

/// Result of a successful copy request
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CopyOutcome {
    /// The clipboard payload: the element's text at call time.
    pub text: String,
    pub method: CopyMethod,
}
