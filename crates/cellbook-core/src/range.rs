//! Rectangular views over a worksheet
//!
//! A range owns no storage. Every operation calls back into the
//! worksheet's own cell accessors, so anything a range does could also be
//! done cell by cell.

use crate::cell::{CellAddress, CellRange, CellValue};
use crate::error::Result;
use crate::validation::ValidationRule;
use crate::worksheet::Worksheet;

/// A read-only view of a rectangle of cells
#[derive(Debug, Clone, Copy)]
pub struct Range<'a> {
    worksheet: &'a Worksheet,
    range: CellRange,
}

impl<'a> Range<'a> {
    pub(crate) fn new(worksheet: &'a Worksheet, range: CellRange) -> Self {
        Self { worksheet, range }
    }

    /// The underlying cell range
    pub fn range(&self) -> CellRange {
        self.range
    }

    /// Get the start address
    pub fn start(&self) -> CellAddress {
        self.range.start()
    }

    /// Get the end address
    pub fn end(&self) -> CellAddress {
        self.range.end()
    }

    /// Get the number of rows
    pub fn row_count(&self) -> u32 {
        self.range.row_count()
    }

    /// Get the number of columns
    pub fn column_count(&self) -> u32 {
        self.range.column_count()
    }

    /// Get the total number of cells
    pub fn cell_count(&self) -> u64 {
        self.range.cell_count()
    }

    /// Reference text, e.g. `"A1:B10"`
    pub fn address(&self) -> String {
        self.range.to_string()
    }

    /// Value at a 0-based offset from the top-left corner
    pub fn value(&self, row_offset: u32, column_offset: u32) -> Option<CellValue> {
        if row_offset >= self.row_count() || column_offset >= self.column_count() {
            return None;
        }
        let addr = CellAddress::from_parts(
            self.start().row() + row_offset,
            self.start().column() + column_offset,
        );
        Some(self.worksheet.get_value_at(addr))
    }

    /// Values row by row; absent cells read as `Empty`
    pub fn values(&self) -> Vec<Vec<CellValue>> {
        let start = self.start();
        let end = self.end();
        (start.row()..=end.row())
            .map(|r| {
                (start.column()..=end.column())
                    .map(|c| self.worksheet.get_value_at(CellAddress::from_parts(r, c)))
                    .collect()
            })
            .collect()
    }
}

/// A mutable view of a rectangle of cells
#[derive(Debug)]
pub struct RangeMut<'a> {
    worksheet: &'a mut Worksheet,
    range: CellRange,
}

impl<'a> RangeMut<'a> {
    pub(crate) fn new(worksheet: &'a mut Worksheet, range: CellRange) -> Self {
        Self { worksheet, range }
    }

    /// The underlying cell range
    pub fn range(&self) -> CellRange {
        self.range
    }

    /// Reference text, e.g. `"A1:B10"`
    pub fn address(&self) -> String {
        self.range.to_string()
    }

    /// Read-only view of the same rectangle
    pub fn as_range(&self) -> Range<'_> {
        Range::new(self.worksheet, self.range)
    }

    /// Write the same value into every cell
    pub fn set_value<V: Into<CellValue>>(&mut self, value: V) -> Result<()> {
        let value = value.into();
        for addr in self.range.cells() {
            self.worksheet.set_value_at(addr, value.clone())?;
        }
        Ok(())
    }

    /// Reset every cell to empty with the default style
    pub fn clear(&mut self) {
        for addr in self.range.cells() {
            self.worksheet.clear_cell_at(addr);
        }
    }

    /// Point every cell at a style record
    ///
    /// Like `Worksheet::set_cell_style`, the index is not checked against
    /// the workbook's style table here.
    pub fn set_style(&mut self, style_index: u32) -> Result<()> {
        for addr in self.range.cells() {
            self.worksheet.get_or_create_cell_at(addr)?.style_index = style_index;
        }
        Ok(())
    }

    /// Merge the rectangle into one region
    pub fn merge(&mut self) -> Result<()> {
        self.worksheet.merge_range(self.range)
    }

    /// Attach a validation rule to the whole rectangle
    pub fn apply_validation(&mut self, rule: ValidationRule) -> Result<()> {
        self.worksheet.apply_validation_to(vec![self.range], rule)
    }

    /// Attach a dropdown list to the whole rectangle
    pub fn add_dropdown_list_validation<I, S>(&mut self, options: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.apply_validation(ValidationRule::list(options)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;

    fn sheet() -> Worksheet {
        Worksheet::new("Sheet1").unwrap()
    }

    #[test]
    fn test_range_dimensions() {
        let ws = sheet();
        let range = ws.get_range("A1", "B10").unwrap();
        assert_eq!(range.row_count(), 10);
        assert_eq!(range.column_count(), 2);
        assert_eq!(range.cell_count(), 20);
        assert_eq!(range.address(), "A1:B10");
    }

    #[test]
    fn test_inverted_range_rejected() {
        let ws = sheet();
        assert!(matches!(ws.get_range("B10", "A1"), Err(Error::InvalidRange(_))));
        assert!(matches!(ws.get_range("B1", "A10"), Err(Error::InvalidRange(_))));
    }

    #[test]
    fn test_set_value_and_values() {
        let mut ws = sheet();
        ws.get_range_mut("A1", "B2").unwrap().set_value(7).unwrap();
        ws.set_value("B2", "x").unwrap();

        let range = ws.get_range("A1", "C2").unwrap();
        assert_eq!(
            range.values(),
            vec![
                vec![CellValue::Number(7.0), CellValue::Number(7.0), CellValue::Empty],
                vec![CellValue::Number(7.0), CellValue::text("x"), CellValue::Empty],
            ]
        );
        assert_eq!(range.value(1, 1), Some(CellValue::text("x")));
        assert_eq!(range.value(2, 0), None);
    }

    #[test]
    fn test_clear_resets_value_and_style() {
        let mut ws = sheet();
        {
            let mut range = ws.get_range_mut("A1", "A3").unwrap();
            range.set_value("v").unwrap();
            range.set_style(2).unwrap();
        }
        assert_eq!(ws.cell_style_index("A2").unwrap(), 2);

        ws.get_range_mut("A1", "A3").unwrap().clear();
        assert_eq!(ws.get_value("A2").unwrap(), CellValue::Empty);
        assert_eq!(ws.cell_style_index("A2").unwrap(), 0);
        assert!(ws.is_empty());
    }

    #[test]
    fn test_merge_through_range() {
        let mut ws = sheet();
        ws.get_range_mut("A1", "C1").unwrap().merge().unwrap();
        let err = ws.get_range_mut("C1", "C5").unwrap().merge().unwrap_err();
        assert_eq!(err, Error::OverlappingMergeRegion("C1:C5".into()));
    }

    #[test]
    fn test_validation_through_range() {
        let mut ws = sheet();
        ws.get_range_mut("B2", "B5")
            .unwrap()
            .add_dropdown_list_validation(["Yes", "No"])
            .unwrap();

        let rule = ws.get_validation_rule("B4").unwrap().unwrap();
        assert_eq!(rule.options(), Some(&["Yes".to_string(), "No".to_string()][..]));
        assert!(ws.get_validation_rule("B6").unwrap().is_none());
    }
}
