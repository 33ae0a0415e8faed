//! Data types shared by the decoder, the upload observer and the copier.

mod clipboard;
mod file;
mod report;
mod workbook;

pub use clipboard::*;
pub use file::*;
pub use report::*;
pub use workbook::*;
