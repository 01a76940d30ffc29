//! Worksheet type

use std::collections::BTreeMap;
use std::fmt;

use log::debug;

use crate::cell::{index_to_column_letters, Cell, CellAddress, CellRange, CellStore, CellValue};
use crate::column::Column;
use crate::comment::Comment;
use crate::error::{Error, Result};
use crate::image::{Image, ImageAnchor, SheetImage};
use crate::protection::SheetProtection;
use crate::range::{Range, RangeMut};
use crate::row::Row;
use crate::shift::{shift_address, shift_range, Axis, AxisEdit};
use crate::validation::{ValidationEntry, ValidationRule};
use crate::{MAX_COLUMNS, MAX_ROWS, MAX_SHEET_NAME_LEN};

/// Stable identity of a sheet within its workbook
///
/// Ids are handed out by the workbook in increasing order and never
/// reused, even after the sheet that held one is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetId(pub u32);

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a sheet tab is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SheetVisibility {
    #[default]
    Visible,
    /// Hidden, but the user can unhide it
    Hidden,
    /// Hidden and only reachable programmatically
    VeryHidden,
}

impl SheetVisibility {
    /// Package `state` attribute value (`None` for visible)
    pub fn xlsx_state(&self) -> Option<&'static str> {
        match self {
            SheetVisibility::Visible => None,
            SheetVisibility::Hidden => Some("hidden"),
            SheetVisibility::VeryHidden => Some("veryHidden"),
        }
    }

    /// Parse a package `state` attribute value; `None` for unknown states
    pub fn from_xlsx(s: &str) -> Option<Self> {
        match s {
            "visible" => Some(SheetVisibility::Visible),
            "hidden" => Some(SheetVisibility::Hidden),
            "veryHidden" => Some(SheetVisibility::VeryHidden),
            _ => None,
        }
    }
}

/// Frozen leading rows and columns; 0 means not frozen on that axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FreezePaneState {
    pub frozen_rows: u32,
    pub frozen_columns: u32,
}

impl FreezePaneState {
    /// Check if either axis is frozen
    pub fn is_frozen(&self) -> bool {
        self.frozen_rows > 0 || self.frozen_columns > 0
    }

    /// First cell below and right of the frozen area
    pub fn top_left_cell(&self) -> CellAddress {
        CellAddress::from_parts(
            self.frozen_rows.saturating_add(1),
            self.frozen_columns.saturating_add(1),
        )
    }
}

/// A worksheet (single sheet in a workbook)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Worksheet {
    id: SheetId,
    name: String,
    visibility: SheetVisibility,
    cells: CellStore,
    merges: Vec<CellRange>,
    validations: Vec<ValidationEntry>,
    freeze: FreezePaneState,
    protection: Option<SheetProtection>,
    comments: BTreeMap<CellAddress, Comment>,
    images: Vec<SheetImage>,
}

impl Worksheet {
    /// Create a detached worksheet
    ///
    /// The sheet has no identity until a workbook adopts it (see
    /// `Workbook::from_parts`).
    pub fn new<S: Into<String>>(name: S) -> Result<Self> {
        let name = name.into();
        validate_sheet_name(&name)?;
        Ok(Self::from_valid_name(name))
    }

    /// Build a sheet whose name the caller has already validated
    pub(crate) fn from_valid_name<S: Into<String>>(name: S) -> Self {
        Self {
            id: SheetId::default(),
            name: name.into(),
            visibility: SheetVisibility::Visible,
            cells: CellStore::new(),
            merges: Vec::new(),
            validations: Vec::new(),
            freeze: FreezePaneState::default(),
            protection: None,
            comments: BTreeMap::new(),
            images: Vec::new(),
        }
    }

    /// Set the identity recorded in a package (used when loading)
    pub fn with_id(mut self, id: SheetId) -> Self {
        self.id = id;
        self
    }

    /// Sheet identity
    pub fn id(&self) -> SheetId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: SheetId) {
        self.id = id;
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Tab visibility
    pub fn visibility(&self) -> SheetVisibility {
        self.visibility
    }

    pub(crate) fn set_visibility(&mut self, visibility: SheetVisibility) {
        self.visibility = visibility;
    }

    // === Cell Access ===

    /// Get a cell by address string (e.g., "A1")
    pub fn cell(&self, address: &str) -> Result<Option<&Cell>> {
        let addr = self.address(address)?;
        Ok(self.cells.get_cell(addr))
    }

    /// Get a cell by address
    pub fn cell_at(&self, addr: CellAddress) -> Option<&Cell> {
        self.cells.get_cell(addr)
    }

    /// Get a cell, creating it and its row if absent
    pub fn get_or_create_cell(&mut self, address: &str) -> Result<&mut Cell> {
        let addr = self.address(address)?;
        Ok(self.cells.get_or_create_cell(addr))
    }

    /// Get a cell by address, creating it and its row if absent
    pub fn get_or_create_cell_at(&mut self, addr: CellAddress) -> Result<&mut Cell> {
        check_bounds(addr)?;
        Ok(self.cells.get_or_create_cell(addr))
    }

    /// Remove a cell entirely
    pub fn remove_cell(&mut self, address: &str) -> Result<Option<Cell>> {
        let addr = self.address(address)?;
        Ok(self.cells.remove_cell(addr))
    }

    /// Get a cell's value (`Empty` for absent cells)
    pub fn get_value(&self, address: &str) -> Result<CellValue> {
        let addr = self.address(address)?;
        Ok(self.get_value_at(addr))
    }

    /// Get a cell's value by address
    pub fn get_value_at(&self, addr: CellAddress) -> CellValue {
        self.cells
            .get_cell(addr)
            .map(|c| c.value.clone())
            .unwrap_or_default()
    }

    /// Get a cell's formula text, without the leading `=`
    pub fn get_formula(&self, address: &str) -> Result<Option<&str>> {
        let addr = self.address(address)?;
        Ok(self
            .cells
            .get_cell(addr)
            .and_then(|c| c.formula.as_deref()))
    }

    /// Get a cell's style index (0 for absent cells)
    pub fn cell_style_index(&self, address: &str) -> Result<u32> {
        let addr = self.address(address)?;
        Ok(self.cells.get_cell(addr).map_or(0, |c| c.style_index))
    }

    // === Cell Modification ===

    /// Set a cell's value
    ///
    /// The value tag follows from the argument's type: `&str`/`String` give
    /// Text, integers and `f64` give Number, chrono dates give Date. Any
    /// formula on the cell is dropped; its style is kept.
    ///
    /// ```
    /// use cellbook_core::{CellValue, Workbook};
    ///
    /// let mut wb = Workbook::new();
    /// let ws = wb.worksheet_mut(0).unwrap();
    /// ws.set_value("A1", "aaa A1").unwrap();
    /// ws.set_value("B1", 42).unwrap();
    /// assert_eq!(ws.get_value("A1").unwrap(), CellValue::Text("aaa A1".into()));
    /// assert_eq!(ws.get_value("B1").unwrap(), CellValue::Number(42.0));
    /// ```
    pub fn set_value<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr = self.address(address)?;
        self.set_value_at(addr, value)
    }

    /// Set a cell's value by address
    pub fn set_value_at<V: Into<CellValue>>(&mut self, addr: CellAddress, value: V) -> Result<()> {
        check_bounds(addr)?;
        let cell = self.cells.get_or_create_cell(addr);
        cell.value = value.into();
        cell.formula = None;
        Ok(())
    }

    /// Store formula text on a cell; a leading `=` is dropped
    ///
    /// The cached value is left as it is. Formulas are never evaluated.
    pub fn put_formula(&mut self, address: &str, formula: &str) -> Result<()> {
        let addr = self.address(address)?;
        let text = formula.strip_prefix('=').unwrap_or(formula);
        if text.trim().is_empty() {
            return Err(Error::ArgumentRequired("formula"));
        }
        self.cells.get_or_create_cell(addr).formula = Some(text.to_string());
        Ok(())
    }

    /// Point a cell at a style record
    ///
    /// The index is not checked here because the style table lives in the
    /// workbook; `Workbook::set_cell_style` checks it.
    pub fn set_cell_style(&mut self, address: &str, style_index: u32) -> Result<()> {
        let addr = self.address(address)?;
        self.cells.get_or_create_cell(addr).style_index = style_index;
        Ok(())
    }

    /// Reset a cell to empty with the default style
    pub fn clear_cell_at(&mut self, addr: CellAddress) {
        self.cells.remove_cell(addr);
    }

    // === Range Operations ===

    /// Read-only view over `start:end`
    ///
    /// Fails with [`Error::InvalidRange`] when `end` lies before `start`.
    pub fn get_range(&self, start: &str, end: &str) -> Result<Range<'_>> {
        let range = self.range_of(start, end)?;
        Ok(Range::new(self, range))
    }

    /// Mutable view over `start:end`
    pub fn get_range_mut(&mut self, start: &str, end: &str) -> Result<RangeMut<'_>> {
        let range = self.range_of(start, end)?;
        Ok(RangeMut::new(self, range))
    }

    /// Mutable view over an already-built range
    pub fn range_mut(&mut self, range: CellRange) -> Result<RangeMut<'_>> {
        check_bounds(range.end())?;
        Ok(RangeMut::new(self, range))
    }

    /// Smallest range covering every materialized cell
    pub fn used_range(&self) -> Option<CellRange> {
        self.cells.used_range()
    }

    /// Number of materialized rows
    pub fn get_row_count(&self) -> usize {
        self.cells.row_count()
    }

    /// Cell count of the widest row
    pub fn get_column_count(&self) -> usize {
        self.cells.widest_row()
    }

    /// Number of materialized cells
    pub fn cell_count(&self) -> usize {
        self.cells.cell_count()
    }

    /// Check if the sheet has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.cell_count() == 0
    }

    /// Iterate all cells in row-major order
    pub fn iter_cells(&self) -> impl Iterator<Item = (CellAddress, &Cell)> {
        self.cells.iter()
    }

    /// Iterate rows (cells plus metadata) in ascending order
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.cells.rows()
    }

    /// Iterate column metadata in ascending order
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.cells.columns()
    }

    /// Copy values, formulas and styles of `source` so that its top-left
    /// cell lands on `target`
    ///
    /// Blank source cells clear their targets. Overlapping source and
    /// target are handled by reading everything before writing.
    pub fn copy_range(&mut self, source: &str, target: &str) -> Result<()> {
        let source = CellRange::parse(source)?;
        check_bounds(source.end())?;
        let target = self.address(target)?;

        let row_offset = target.row() as i64 - source.start().row() as i64;
        let col_offset = target.column() as i64 - source.start().column() as i64;
        let end = offset(source.end(), row_offset, col_offset)?;
        check_bounds(end)?;

        let snapshot: Vec<(CellAddress, Option<Cell>)> = source
            .cells()
            .map(|a| (a, self.cells.get_cell(a).cloned()))
            .collect();

        for (src, cell) in snapshot {
            let dst = offset(src, row_offset, col_offset)?;
            match cell {
                Some(cell) => *self.cells.get_or_create_cell(dst) = cell,
                None => {
                    self.cells.remove_cell(dst);
                }
            }
        }
        Ok(())
    }

    // === Structural Edits ===

    /// Insert `count` empty rows before row `start`
    ///
    /// Every row at or below `start` moves down by `count`, together with
    /// merges, validations, comments and images. Rows pushed past the
    /// last sheet row are dropped.
    pub fn insert_rows(&mut self, start: u32, count: u32) -> Result<()> {
        check_row(start)?;
        self.apply_edit(
            Axis::Row,
            AxisEdit::Insert {
                start,
                count,
                limit: MAX_ROWS,
            },
        );
        Ok(())
    }

    /// Delete `count` rows starting at row `start`
    pub fn delete_rows(&mut self, start: u32, count: u32) -> Result<()> {
        check_row(start)?;
        self.apply_edit(Axis::Row, AxisEdit::Delete { start, count });
        Ok(())
    }

    /// Insert `count` empty columns before column `start`
    pub fn insert_columns(&mut self, start: u32, count: u32) -> Result<()> {
        check_column(start)?;
        self.apply_edit(
            Axis::Column,
            AxisEdit::Insert {
                start,
                count,
                limit: MAX_COLUMNS,
            },
        );
        Ok(())
    }

    /// Delete `count` columns starting at column `start`
    pub fn delete_columns(&mut self, start: u32, count: u32) -> Result<()> {
        check_column(start)?;
        self.apply_edit(Axis::Column, AxisEdit::Delete { start, count });
        Ok(())
    }

    fn apply_edit(&mut self, axis: Axis, edit: AxisEdit) {
        if edit.is_noop() {
            return;
        }
        debug!("sheet '{}': {:?} {:?}", self.name, axis, edit);

        match axis {
            Axis::Row => self.cells.shift_rows(edit),
            Axis::Column => self.cells.shift_columns(edit),
        }

        self.merges = self
            .merges
            .iter()
            .filter_map(|r| shift_range(*r, axis, edit))
            .collect();

        for entry in &mut self.validations {
            entry.ranges = entry
                .ranges
                .iter()
                .filter_map(|r| shift_range(*r, axis, edit))
                .collect();
        }
        self.validations.retain(|e| !e.ranges.is_empty());

        self.comments = std::mem::take(&mut self.comments)
            .into_iter()
            .filter_map(|(a, c)| shift_address(a, axis, edit).map(|a| (a, c)))
            .collect();

        self.images = std::mem::take(&mut self.images)
            .into_iter()
            .filter_map(|mut img| {
                let range = shift_range(img.anchor.range(), axis, edit)?;
                img.anchor = ImageAnchor::from_range(range);
                Some(img)
            })
            .collect();
    }

    // === Row/Column Metadata ===

    /// Hide a row, creating its metadata if needed
    pub fn hide_row(&mut self, index: u32) -> Result<()> {
        check_row(index)?;
        self.cells.row_or_create(index).hidden = true;
        Ok(())
    }

    /// Unhide a row, creating its metadata if needed
    pub fn unhide_row(&mut self, index: u32) -> Result<()> {
        check_row(index)?;
        self.cells.row_or_create(index).hidden = false;
        Ok(())
    }

    /// Hide `count` rows starting at `start`
    pub fn hide_rows(&mut self, start: u32, count: u32) -> Result<()> {
        for index in span(start, count, MAX_ROWS)? {
            self.cells.row_or_create(index).hidden = true;
        }
        Ok(())
    }

    /// Unhide `count` rows starting at `start`
    pub fn unhide_rows(&mut self, start: u32, count: u32) -> Result<()> {
        for index in span(start, count, MAX_ROWS)? {
            self.cells.row_or_create(index).hidden = false;
        }
        Ok(())
    }

    /// Check if a row is hidden
    pub fn is_row_hidden(&self, index: u32) -> bool {
        self.cells.is_row_hidden(index)
    }

    /// Hide a column, creating its metadata if needed
    pub fn hide_column(&mut self, index: u32) -> Result<()> {
        check_column(index)?;
        self.cells.column_or_create(index).hidden = true;
        Ok(())
    }

    /// Unhide a column, creating its metadata if needed
    pub fn unhide_column(&mut self, index: u32) -> Result<()> {
        check_column(index)?;
        self.cells.column_or_create(index).hidden = false;
        Ok(())
    }

    /// Hide `count` columns starting at `start`
    pub fn hide_columns(&mut self, start: u32, count: u32) -> Result<()> {
        for index in span(start, count, MAX_COLUMNS)? {
            self.cells.column_or_create(index).hidden = true;
        }
        Ok(())
    }

    /// Unhide `count` columns starting at `start`
    pub fn unhide_columns(&mut self, start: u32, count: u32) -> Result<()> {
        for index in span(start, count, MAX_COLUMNS)? {
            self.cells.column_or_create(index).hidden = false;
        }
        Ok(())
    }

    /// Check if a column is hidden
    pub fn is_column_hidden(&self, index: u32) -> bool {
        self.cells.is_column_hidden(index)
    }

    /// Row height in points (default 15.0)
    pub fn row_height(&self, index: u32) -> f64 {
        self.cells.row_height(index)
    }

    /// Set a custom row height in points
    pub fn set_row_height(&mut self, index: u32, height: f64) -> Result<()> {
        check_row(index)?;
        check_dimension(height)?;
        self.cells.row_or_create(index).height = Some(height);
        Ok(())
    }

    /// Column width in characters (default 8.43)
    pub fn column_width(&self, index: u32) -> f64 {
        self.cells.column_width(index)
    }

    /// Set a custom column width in characters
    pub fn set_column_width(&mut self, index: u32, width: f64) -> Result<()> {
        check_column(index)?;
        check_dimension(width)?;
        self.cells.column_or_create(index).width = Some(width);
        Ok(())
    }

    // === Merged Cells ===

    /// Merged regions in registration order
    pub fn merged_regions(&self) -> &[CellRange] {
        &self.merges
    }

    /// Merge `start:end` into one region
    pub fn merge_cells(&mut self, start: &str, end: &str) -> Result<()> {
        let range = self.range_of(start, end)?;
        self.merge_range(range)
    }

    /// Merge a range; fails if it overlaps an existing region
    pub fn merge_range(&mut self, range: CellRange) -> Result<()> {
        check_bounds(range.end())?;
        if self.merges.iter().any(|m| m.overlaps(&range)) {
            return Err(Error::OverlappingMergeRegion(range.to_string()));
        }
        self.merges.push(range);
        Ok(())
    }

    /// Remove the merge region equal to `range`; returns whether one existed
    pub fn unmerge(&mut self, range: &CellRange) -> bool {
        let before = self.merges.len();
        self.merges.retain(|m| m != range);
        self.merges.len() != before
    }

    // === Freeze Panes ===

    /// Freeze the first `rows` rows and `columns` columns
    ///
    /// Returns the reference of the first unfrozen cell. `(0, 0)` clears
    /// the freeze and returns `"A1"`.
    pub fn freeze_pane(&mut self, rows: u32, columns: u32) -> Result<String> {
        if rows >= MAX_ROWS || columns >= MAX_COLUMNS {
            return Err(Error::reference(format!(
                "cannot freeze {} rows and {} columns",
                rows, columns
            )));
        }
        self.freeze = FreezePaneState {
            frozen_rows: rows,
            frozen_columns: columns,
        };
        Ok(format!(
            "{}{}",
            index_to_column_letters(columns + 1)?,
            rows + 1
        ))
    }

    /// Current freeze state
    pub fn freeze_state(&self) -> FreezePaneState {
        self.freeze
    }

    // === Data Validation ===

    /// Attach a rule to a cell or range reference ("B2" or "B2:B9")
    pub fn apply_validation(&mut self, reference: &str, rule: ValidationRule) -> Result<()> {
        let range = CellRange::parse(reference)?;
        self.apply_validation_to(vec![range], rule)
    }

    /// Attach a rule to a set of ranges
    pub fn apply_validation_to(&mut self, ranges: Vec<CellRange>, rule: ValidationRule) -> Result<()> {
        if ranges.is_empty() {
            return Err(Error::ArgumentRequired("ranges"));
        }
        for range in &ranges {
            check_bounds(range.end())?;
        }
        self.validations.push(ValidationEntry { ranges, rule });
        Ok(())
    }

    /// Attach a dropdown list to a cell or range reference
    pub fn add_dropdown_list_validation<I, S>(&mut self, reference: &str, options: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rule = ValidationRule::list(options)?;
        self.apply_validation(reference, rule)
    }

    /// The rule governing a cell
    ///
    /// When several rules cover the same cell the one registered first
    /// wins.
    pub fn get_validation_rule(&self, address: &str) -> Result<Option<&ValidationRule>> {
        let addr = self.address(address)?;
        Ok(self.validation_rule_at(addr))
    }

    /// The rule governing a cell, by address
    pub fn validation_rule_at(&self, addr: CellAddress) -> Option<&ValidationRule> {
        self.validations
            .iter()
            .find(|e| e.applies_to(&addr))
            .map(|e| &e.rule)
    }

    /// Registered rules in registration order
    pub fn validations(&self) -> &[ValidationEntry] {
        &self.validations
    }

    // === Cell Comments ===

    /// Attach a comment to a cell, replacing any existing one
    pub fn add_comment(&mut self, address: &str, author: &str, text: &str) -> Result<()> {
        let addr = self.address(address)?;
        self.comments.insert(addr, Comment::new(author, text));
        Ok(())
    }

    /// Attach a comment by address (used when loading)
    pub fn set_comment_at(&mut self, addr: CellAddress, comment: Comment) -> Result<()> {
        check_bounds(addr)?;
        self.comments.insert(addr, comment);
        Ok(())
    }

    /// Get the comment on a cell
    pub fn comment(&self, address: &str) -> Result<Option<&Comment>> {
        let addr = self.address(address)?;
        Ok(self.comments.get(&addr))
    }

    /// Remove the comment on a cell
    pub fn remove_comment(&mut self, address: &str) -> Result<Option<Comment>> {
        let addr = self.address(address)?;
        Ok(self.comments.remove(&addr))
    }

    /// Comments in address order
    pub fn comments(&self) -> impl Iterator<Item = (CellAddress, &Comment)> {
        self.comments.iter().map(|(a, c)| (*a, c))
    }

    // === Protection ===

    /// Protect the sheet
    ///
    /// The password is stored in a reversible form and is not checked by
    /// [`Worksheet::unprotect`]. See [`crate::protection`].
    pub fn protect(&mut self, password: &str) {
        self.protection = Some(SheetProtection::new(password));
    }

    /// Remove protection unconditionally
    pub fn unprotect(&mut self) {
        self.protection = None;
    }

    /// Check if the sheet is protected
    pub fn is_protected(&self) -> bool {
        self.protection.is_some()
    }

    /// Protection state, if protected
    pub fn protection(&self) -> Option<&SheetProtection> {
        self.protection.as_ref()
    }

    /// Replace protection state (used when loading)
    pub fn set_protection(&mut self, protection: Option<SheetProtection>) {
        self.protection = protection;
    }

    // === Images ===

    /// Place an image over a cell rectangle (1-based, inclusive)
    pub fn add_image(
        &mut self,
        data: Vec<u8>,
        extension: &str,
        start_row: u32,
        start_col: u32,
        end_row: u32,
        end_col: u32,
    ) -> Result<()> {
        let anchor = ImageAnchor::new(start_row, start_col, end_row, end_col)?;
        check_bounds(anchor.end())?;
        let image = Image::new(data, extension)?;
        self.images.push(SheetImage { image, anchor });
        Ok(())
    }

    /// Images with their anchors, in insertion order
    pub fn images(&self) -> &[SheetImage] {
        &self.images
    }

    /// Copies of every image's bytes and extension
    pub fn extract_images(&self) -> Vec<(Vec<u8>, String)> {
        self.images
            .iter()
            .map(|i| (i.image.data().to_vec(), i.image.extension().to_string()))
            .collect()
    }

    // === Internal ===

    fn address(&self, address: &str) -> Result<CellAddress> {
        let addr = CellAddress::parse(address)?;
        check_bounds(addr)?;
        Ok(addr)
    }

    fn range_of(&self, start: &str, end: &str) -> Result<CellRange> {
        let start = self.address(start)?;
        let end = self.address(end)?;
        CellRange::new(start, end)
    }
}

/// Validate a sheet name: non-empty, at most 31 characters, none of
/// `: \ / ? * [ ]`
pub fn validate_sheet_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::ArgumentRequired("name"));
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(Error::InvalidSheetName(format!(
            "'{}' is longer than {} characters",
            name, MAX_SHEET_NAME_LEN
        )));
    }

    const INVALID_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];
    if let Some(c) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
        return Err(Error::InvalidSheetName(format!(
            "'{}' contains '{}'",
            name, c
        )));
    }
    Ok(())
}

fn check_bounds(addr: CellAddress) -> Result<()> {
    check_row(addr.row())?;
    check_column(addr.column())
}

fn check_row(index: u32) -> Result<()> {
    if index == 0 || index > MAX_ROWS {
        return Err(Error::reference(format!(
            "row {} is outside 1..={}",
            index, MAX_ROWS
        )));
    }
    Ok(())
}

fn check_column(index: u32) -> Result<()> {
    if index == 0 || index > MAX_COLUMNS {
        return Err(Error::reference(format!(
            "column {} is outside 1..={}",
            index, MAX_COLUMNS
        )));
    }
    Ok(())
}

fn check_dimension(value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidStyleParameter(format!(
            "dimension must be a non-negative number, got {}",
            value
        )));
    }
    Ok(())
}

fn span(start: u32, count: u32, limit: u32) -> Result<std::ops::RangeInclusive<u32>> {
    if start == 0 || start > limit {
        return Err(Error::reference(format!("index {} is outside 1..={}", start, limit)));
    }
    let last = start.saturating_add(count.saturating_sub(1)).min(limit);
    if count == 0 {
        // empty range
        return Ok(1..=0);
    }
    Ok(start..=last)
}

fn offset(addr: CellAddress, rows: i64, cols: i64) -> Result<CellAddress> {
    let row = u32::try_from(addr.row() as i64 + rows)
        .map_err(|_| Error::reference("copy target falls outside the sheet"))?;
    let col = u32::try_from(addr.column() as i64 + cols)
        .map_err(|_| Error::reference("copy target falls outside the sheet"))?;
    CellAddress::new(row, col)
}
