//! Workbook type - the main document structure

use log::debug;

use crate::cell::{CellValue, SharedStrings};
use crate::error::{Error, Result};
use crate::properties::DocumentProperties;
use crate::style::{HorizontalAlignment, StyleTable, VerticalAlignment};
use crate::worksheet::{validate_sheet_name, SheetId, SheetVisibility, Worksheet};

/// A workbook (spreadsheet document)
///
/// A workbook always holds at least one worksheet. The order of the
/// `sheets` vector is the tab order; nothing else records it.
#[derive(Debug, Clone)]
pub struct Workbook {
    sheets: Vec<Worksheet>,
    styles: StyleTable,
    shared_strings: SharedStrings,
    properties: DocumentProperties,
    /// Next identity to hand out; never decreases. Wider than `SheetId` so
    /// that a loaded `u32::MAX` id leaves the counter past the end.
    next_sheet_id: u64,
    active_sheet: usize,
}

impl Workbook {
    /// Create a workbook with a single empty "Sheet1"
    pub fn new() -> Self {
        let sheet = Worksheet::from_valid_name("Sheet1").with_id(SheetId(1));
        Self {
            sheets: vec![sheet],
            styles: StyleTable::new(),
            shared_strings: SharedStrings::new(),
            properties: DocumentProperties::now(),
            next_sheet_id: 2,
            active_sheet: 0,
        }
    }

    /// Assemble a workbook from loaded parts
    ///
    /// Sheets keep any non-zero id they carry; sheets without one (or with
    /// an id already taken) receive fresh ids after the largest seen.
    pub fn from_parts(
        sheets: Vec<Worksheet>,
        styles: StyleTable,
        shared_strings: SharedStrings,
        properties: DocumentProperties,
    ) -> Result<Self> {
        if sheets.is_empty() {
            return Err(Error::ArgumentRequired("sheets"));
        }

        let mut wb = Self {
            sheets: Vec::with_capacity(sheets.len()),
            styles,
            shared_strings,
            properties,
            next_sheet_id: 1,
            active_sheet: 0,
        };
        wb.next_sheet_id = sheets.iter().map(|s| u64::from(s.id().0)).max().unwrap_or(0) + 1;

        for mut sheet in sheets {
            if wb.sheet_index(sheet.name()).is_some() {
                return Err(Error::DuplicateSheetName(sheet.name().to_string()));
            }
            let id = sheet.id();
            if id.0 == 0 || wb.sheets.iter().any(|s| s.id() == id) {
                sheet.set_id(wb.allocate_id()?);
            }
            wb.sheets.push(sheet);
        }
        Ok(wb)
    }

    // === Sheet Access ===

    /// Get the number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Sheet names in tab order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(Worksheet::name).collect()
    }

    /// Get a worksheet by index
    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.sheets.get(index)
    }

    /// Get a mutable worksheet by index
    pub fn worksheet_mut(&mut self, index: usize) -> Option<&mut Worksheet> {
        self.sheets.get_mut(index)
    }

    /// Get a worksheet by name
    pub fn worksheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        self.sheets.iter().find(|ws| ws.name() == name)
    }

    /// Get a mutable worksheet by name
    pub fn worksheet_by_name_mut(&mut self, name: &str) -> Option<&mut Worksheet> {
        self.sheets.iter_mut().find(|ws| ws.name() == name)
    }

    /// Get a worksheet by identity
    pub fn worksheet_by_id(&self, id: SheetId) -> Option<&Worksheet> {
        self.sheets.iter().find(|ws| ws.id() == id)
    }

    /// Get the index of a worksheet by name
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.sheets.iter().position(|ws| ws.name() == name)
    }

    /// Iterate over all worksheets in tab order
    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.sheets.iter()
    }

    /// Iterate over all worksheets mutably
    pub fn worksheets_mut(&mut self) -> impl Iterator<Item = &mut Worksheet> {
        self.sheets.iter_mut()
    }

    // === Sheet Lifecycle ===

    /// Append a new empty sheet and return its index
    pub fn add_sheet(&mut self, name: &str) -> Result<usize> {
        self.check_new_name(name, None)?;
        let sheet = Worksheet::new(name)?.with_id(self.allocate_id()?);
        debug!("add sheet '{}' ({})", name, sheet.id());
        self.sheets.push(sheet);
        Ok(self.sheets.len() - 1)
    }

    /// Remove a sheet by name, returning it
    ///
    /// The last remaining sheet cannot be removed.
    pub fn remove_sheet(&mut self, name: &str) -> Result<Worksheet> {
        let index = self.require_index(name)?;
        if self.sheets.len() == 1 {
            return Err(Error::CannotRemoveLastSheet);
        }

        let removed = self.sheets.remove(index);
        if self.active_sheet > index || self.active_sheet >= self.sheets.len() {
            self.active_sheet = self.active_sheet.saturating_sub(1);
        }
        debug!("remove sheet '{}' ({})", name, removed.id());
        Ok(removed)
    }

    /// Rename a sheet; renaming to its current name is a no-op
    pub fn rename_sheet(&mut self, name: &str, new_name: &str) -> Result<()> {
        let index = self.require_index(name)?;
        self.check_new_name(new_name, Some(index))?;
        debug!("rename sheet '{}' -> '{}'", name, new_name);
        self.sheets[index].set_name(new_name.to_string());
        Ok(())
    }

    /// Deep-copy a sheet under a new name, appending it at the end
    ///
    /// The copy gets a fresh identity and keeps everything else: cells,
    /// metadata, merges, validations, freeze state, protection, comments,
    /// images and visibility.
    pub fn copy_sheet(&mut self, name: &str, new_name: &str) -> Result<usize> {
        let index = self.require_index(name)?;
        self.check_new_name(new_name, None)?;

        let mut copy = self.sheets[index].clone();
        copy.set_name(new_name.to_string());
        copy.set_id(self.allocate_id()?);
        debug!("copy sheet '{}' -> '{}' ({})", name, new_name, copy.id());
        self.sheets.push(copy);
        Ok(self.sheets.len() - 1)
    }

    /// Move a sheet to `position`, clamped to the last slot
    pub fn reorder_sheets(&mut self, name: &str, position: usize) -> Result<()> {
        let from = self.require_index(name)?;
        let to = position.min(self.sheets.len() - 1);
        if from == to {
            return Ok(());
        }

        let active_id = self.sheets[self.active_sheet].id();
        let sheet = self.sheets.remove(from);
        self.sheets.insert(to, sheet);
        self.active_sheet = self
            .sheets
            .iter()
            .position(|s| s.id() == active_id)
            .unwrap_or(0);
        debug!("move sheet '{}' {} -> {}", name, from, to);
        Ok(())
    }

    /// Change a sheet's tab visibility
    pub fn set_visibility(&mut self, name: &str, visibility: SheetVisibility) -> Result<()> {
        let index = self.require_index(name)?;
        self.sheets[index].set_visibility(visibility);
        Ok(())
    }

    /// Index of the selected tab
    pub fn active_sheet(&self) -> usize {
        self.active_sheet
    }

    /// Select a tab by index
    pub fn set_active_sheet(&mut self, index: usize) -> Result<()> {
        if index >= self.sheets.len() {
            return Err(Error::SheetNotFound(format!("index {}", index)));
        }
        self.active_sheet = index;
        Ok(())
    }

    // === Styles ===

    /// Append a style record and return its index
    pub fn create_style(
        &mut self,
        font_name: &str,
        font_size: f64,
        color: &str,
        horizontal: Option<HorizontalAlignment>,
        vertical: Option<VerticalAlignment>,
    ) -> Result<u32> {
        self.styles
            .create_style(font_name, font_size, color, horizontal, vertical)
    }

    /// Replace the default style (index 0) in place
    pub fn update_default_style(
        &mut self,
        font_name: &str,
        font_size: f64,
        color: &str,
        horizontal: Option<HorizontalAlignment>,
        vertical: Option<VerticalAlignment>,
    ) -> Result<()> {
        self.styles
            .update_default_style(font_name, font_size, color, horizontal, vertical)
    }

    /// The style table
    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    /// Mutable access to the style table (records can only be appended)
    pub fn styles_mut(&mut self) -> &mut StyleTable {
        &mut self.styles
    }

    /// Point a cell at a style record, checking the index exists
    pub fn set_cell_style(&mut self, sheet: &str, address: &str, style_index: u32) -> Result<()> {
        if !self.styles.contains(style_index) {
            return Err(Error::InvalidStyleParameter(format!(
                "style index {} is not defined ({} styles)",
                style_index,
                self.styles.len()
            )));
        }
        let index = self.require_index(sheet)?;
        self.sheets[index].set_cell_style(address, style_index)
    }

    // === Properties ===

    /// Document properties
    pub fn properties(&self) -> &DocumentProperties {
        &self.properties
    }

    /// Mutable document properties
    pub fn properties_mut(&mut self) -> &mut DocumentProperties {
        &mut self.properties
    }

    /// Replace document properties
    pub fn set_properties(&mut self, properties: DocumentProperties) {
        self.properties = properties;
    }

    // === Shared Strings ===

    /// The shared-string table
    pub fn shared_strings(&self) -> &SharedStrings {
        &self.shared_strings
    }

    /// Mutable shared-string table
    pub fn shared_strings_mut(&mut self) -> &mut SharedStrings {
        &mut self.shared_strings
    }

    /// Look up a shared string by index
    pub fn shared_string(&self, index: u32) -> Option<&str> {
        self.shared_strings.get(index)
    }

    /// Text of a Text or SharedTextRef value
    pub fn resolve_text<'a>(&'a self, value: &'a CellValue) -> Option<&'a str> {
        match value {
            CellValue::Text(s) => Some(s),
            CellValue::SharedTextRef(i) => self.shared_strings.get(*i),
            _ => None,
        }
    }

    // === Internal ===

    fn allocate_id(&mut self) -> Result<SheetId> {
        let id = u32::try_from(self.next_sheet_id).map_err(|_| Error::SheetIdsExhausted)?;
        self.next_sheet_id += 1;
        Ok(SheetId(id))
    }

    fn require_index(&self, name: &str) -> Result<usize> {
        self.sheet_index(name)
            .ok_or_else(|| Error::SheetNotFound(name.to_string()))
    }

    /// Validate a name for a new or renamed sheet, ignoring the sheet at
    /// `exclude` in the duplicate check (case-sensitive)
    fn check_new_name(&self, name: &str, exclude: Option<usize>) -> Result<()> {
        validate_sheet_name(name)?;
        let taken = self
            .sheets
            .iter()
            .enumerate()
            .any(|(i, ws)| Some(i) != exclude && ws.name() == name);
        if taken {
            return Err(Error::DuplicateSheetName(name.to_string()));
        }
        Ok(())
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_workbook() {
        let wb = Workbook::new();
        assert_eq!(wb.sheet_names(), vec!["Sheet1"]);
        assert_eq!(wb.worksheet(0).unwrap().id(), SheetId(1));
        assert_eq!(wb.styles().len(), 1);
        assert!(wb.properties().created_date.is_some());
    }

    #[test]
    fn test_add_and_remove_sheets() {
        let mut wb = Workbook::new();
        wb.add_sheet("Sheet2").unwrap();
        wb.add_sheet("Sheet3").unwrap();

        wb.remove_sheet("Sheet2").unwrap();
        assert_eq!(wb.sheet_names(), vec!["Sheet1", "Sheet3"]);
    }

    #[test]
    fn test_sheet_errors() {
        let mut wb = Workbook::new();
        assert_eq!(
            wb.add_sheet("Sheet1"),
            Err(Error::DuplicateSheetName("Sheet1".into()))
        );
        // duplicate check is case-sensitive
        assert!(wb.add_sheet("sheet1").is_ok());
        assert_eq!(
            wb.remove_sheet("Missing").unwrap_err(),
            Error::SheetNotFound("Missing".into())
        );
        assert!(matches!(wb.add_sheet("a?b"), Err(Error::InvalidSheetName(_))));

        wb.remove_sheet("sheet1").unwrap();
        assert_eq!(
            wb.remove_sheet("Sheet1").unwrap_err(),
            Error::CannotRemoveLastSheet
        );
        // the failed call leaves the workbook usable
        assert_eq!(wb.sheet_count(), 1);
    }

    #[test]
    fn test_ids_never_reused() {
        let mut wb = Workbook::new();
        wb.add_sheet("B").unwrap();
        wb.remove_sheet("B").unwrap();
        wb.add_sheet("C").unwrap();

        let c = wb.worksheet_by_name("C").unwrap();
        assert_eq!(c.id(), SheetId(3));
        assert!(wb.worksheet_by_id(SheetId(2)).is_none());
    }

    #[test]
    fn test_rename_sheet() {
        let mut wb = Workbook::new();
        wb.add_sheet("Data").unwrap();

        wb.rename_sheet("Sheet1", "Sheet1").unwrap();
        assert_eq!(
            wb.rename_sheet("Sheet1", "Data"),
            Err(Error::DuplicateSheetName("Data".into()))
        );
        wb.rename_sheet("Sheet1", "Summary").unwrap();
        assert_eq!(wb.sheet_names(), vec!["Summary", "Data"]);
    }

    #[test]
    fn test_copy_sheet_is_deep() {
        let mut wb = Workbook::new();
        {
            let ws = wb.worksheet_mut(0).unwrap();
            ws.set_value("A1", "original").unwrap();
            ws.merge_cells("B1", "C1").unwrap();
            ws.freeze_pane(1, 0).unwrap();
        }
        let idx = wb.copy_sheet("Sheet1", "Copy").unwrap();
        wb.worksheet_mut(0).unwrap().set_value("A1", "changed").unwrap();

        let copy = wb.worksheet(idx).unwrap();
        assert_eq!(copy.get_value("A1").unwrap(), CellValue::text("original"));
        assert_eq!(copy.merged_regions().len(), 1);
        assert!(copy.freeze_state().is_frozen());
        assert_ne!(copy.id(), wb.worksheet(0).unwrap().id());
    }

    #[test]
    fn test_reorder_sheets_clamps() {
        let mut wb = Workbook::new();
        wb.add_sheet("A").unwrap();
        wb.add_sheet("B").unwrap();
        wb.set_active_sheet(2).unwrap();

        wb.reorder_sheets("B", 0).unwrap();
        assert_eq!(wb.sheet_names(), vec!["B", "Sheet1", "A"]);
        assert_eq!(wb.active_sheet(), 0);

        wb.reorder_sheets("B", 99).unwrap();
        assert_eq!(wb.sheet_names(), vec!["Sheet1", "A", "B"]);
        assert_eq!(wb.active_sheet(), 2);
    }

    #[test]
    fn test_active_sheet_follows_removal() {
        let mut wb = Workbook::new();
        wb.add_sheet("A").unwrap();
        wb.add_sheet("B").unwrap();
        wb.set_active_sheet(2).unwrap();

        wb.remove_sheet("Sheet1").unwrap();
        assert_eq!(wb.active_sheet(), 1);
        wb.remove_sheet("B").unwrap();
        assert_eq!(wb.active_sheet(), 0);
        assert!(wb.set_active_sheet(5).is_err());
    }

    #[test]
    fn test_visibility() {
        let mut wb = Workbook::new();
        wb.set_visibility("Sheet1", SheetVisibility::VeryHidden).unwrap();
        assert_eq!(
            wb.worksheet(0).unwrap().visibility(),
            SheetVisibility::VeryHidden
        );
        assert!(wb.set_visibility("Nope", SheetVisibility::Hidden).is_err());
    }

    #[test]
    fn test_set_cell_style_checks_index() {
        let mut wb = Workbook::new();
        let idx = wb.create_style("Calibri", 11.0, "00F", None, None).unwrap();

        wb.set_cell_style("Sheet1", "A1", idx).unwrap();
        assert_eq!(wb.worksheet(0).unwrap().cell_style_index("A1").unwrap(), idx);
        assert!(matches!(
            wb.set_cell_style("Sheet1", "A1", 99),
            Err(Error::InvalidStyleParameter(_))
        ));
    }

    #[test]
    fn test_style_indices_stable() {
        let mut wb = Workbook::new();
        let a = wb.create_style("Arial", 10.0, "#000000", None, None).unwrap();
        let b = wb.create_style("Arial", 10.0, "#000000", None, None).unwrap();
        wb.update_default_style("Verdana", 9.0, "333", None, None).unwrap();

        assert_eq!((a, b), (1, 2));
        assert_eq!(wb.styles().get(a).unwrap().font.name, "Arial");
        assert_eq!(wb.styles().default_style().font.name, "Verdana");
    }

    #[test]
    fn test_shared_text_resolution() {
        let mut wb = Workbook::new();
        let i = wb.shared_strings_mut().intern("shared");
        let value = CellValue::SharedTextRef(i);

        assert_eq!(wb.resolve_text(&value), Some("shared"));
        assert_eq!(wb.resolve_text(&CellValue::text("inline")), Some("inline"));
        assert_eq!(wb.resolve_text(&CellValue::Number(1.0)), None);
        assert_eq!(wb.shared_string(i + 1), None);
    }

    #[test]
    fn test_from_parts_assigns_missing_ids() {
        let sheets = vec![
            Worksheet::new("Loaded").unwrap().with_id(SheetId(7)),
            Worksheet::new("Fresh").unwrap(),
        ];
        let mut wb = Workbook::from_parts(
            sheets,
            StyleTable::new(),
            SharedStrings::new(),
            DocumentProperties::default(),
        )
        .unwrap();

        assert_eq!(wb.worksheet(0).unwrap().id(), SheetId(7));
        assert_eq!(wb.worksheet(1).unwrap().id(), SheetId(8));
        wb.add_sheet("Next").unwrap();
        assert_eq!(wb.worksheet(2).unwrap().id(), SheetId(9));

        let err = Workbook::from_parts(
            vec![],
            StyleTable::new(),
            SharedStrings::new(),
            DocumentProperties::default(),
        )
        .unwrap_err();
        assert_eq!(err, Error::ArgumentRequired("sheets"));
    }

    #[test]
    fn test_max_sheet_id_does_not_wrap() {
        let mut wb = Workbook::from_parts(
            vec![Worksheet::new("Last").unwrap().with_id(SheetId(u32::MAX))],
            StyleTable::new(),
            SharedStrings::new(),
            DocumentProperties::default(),
        )
        .unwrap();
        assert_eq!(wb.worksheet(0).unwrap().id(), SheetId(u32::MAX));

        assert_eq!(wb.add_sheet("More"), Err(Error::SheetIdsExhausted));
        assert_eq!(wb.copy_sheet("Last", "Copy"), Err(Error::SheetIdsExhausted));
        assert_eq!(wb.sheet_names(), vec!["Last"]);

        let err = Workbook::from_parts(
            vec![
                Worksheet::new("Last").unwrap().with_id(SheetId(u32::MAX)),
                Worksheet::new("Unnumbered").unwrap(),
            ],
            StyleTable::new(),
            SharedStrings::new(),
            DocumentProperties::default(),
        )
        .unwrap_err();
        assert_eq!(err, Error::SheetIdsExhausted);
    }
}
