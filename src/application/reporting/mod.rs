//! Export formats: spreadsheet CSV and printable PDF.

pub mod csv;
pub mod pdf;
