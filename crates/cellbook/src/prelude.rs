//! Prelude module - common imports for cellbook users
//!
//! ```rust
//! use cellbook::prelude::*;
//! ```

pub use crate::{
    // Addressing
    CellAddress,
    CellRange,
    // Cell types
    CellValue,
    Comment,
    // Style types
    BorderLineStyle,
    Color,
    HorizontalAlignment,
    Style,
    VerticalAlignment,
    // Sheet features
    SheetVisibility,
    ValidationRule,
    ValidationType,
    // Main types
    Document,
    Workbook,
    Worksheet,
    // Extension traits
    WorkbookExt,
    // Error types
    Error,
    Result,
};
