//! A workbook bound to the file it was loaded from

use std::io::{Seek, Write};
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use cellbook_core::Workbook;
use cellbook_xlsx::XlsxWriter;

use crate::error::{Error, Result};
use crate::WorkbookExt;

/// Load, mutate and save a workbook in one scope
///
/// The package is read fully into memory by [`Document::open`] and its
/// archive handle is closed before `open` returns, whether it succeeds or
/// fails. Nothing stays open between edits; each save writes a fresh
/// archive.
///
/// ```no_run
/// use cellbook::Document;
///
/// let mut doc = Document::open("report.xlsx")?;
/// doc.worksheet_mut(0).unwrap().set_value("A1", "updated")?;
/// doc.save()?;
/// # Ok::<(), cellbook::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Document {
    workbook: Workbook,
    path: Option<PathBuf>,
}

impl Document {
    /// A new document holding the default one-sheet workbook, not yet bound to a path
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a document, remembering `path` as its save target
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let workbook = Workbook::open(path)?;
        log::debug!("opened {} ({} sheet(s))", path.display(), workbook.sheet_count());
        Ok(Self {
            workbook,
            path: Some(path.to_path_buf()),
        })
    }

    /// The path `save` writes to, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    pub fn workbook_mut(&mut self) -> &mut Workbook {
        &mut self.workbook
    }

    /// Write back to the path the document was opened from or last saved as
    pub fn save(&self) -> Result<()> {
        let path = self.path.as_deref().ok_or(Error::NoPath)?;
        self.workbook.save(path)
    }

    /// Write to `path` and make it the target of later `save` calls
    ///
    /// The target is only rebound once the write succeeds.
    pub fn save_as<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.workbook.save(path)?;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Write the package to an arbitrary stream
    pub fn save_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        XlsxWriter::write(&self.workbook, writer)?;
        Ok(())
    }

    /// Release the path binding and hand back the workbook
    pub fn into_workbook(self) -> Workbook {
        self.workbook
    }
}

impl From<Workbook> for Document {
    fn from(workbook: Workbook) -> Self {
        Self {
            workbook,
            path: None,
        }
    }
}

impl Deref for Document {
    type Target = Workbook;

    fn deref(&self) -> &Workbook {
        &self.workbook
    }
}

impl DerefMut for Document {
    fn deref_mut(&mut self) -> &mut Workbook {
        &mut self.workbook
    }
}
