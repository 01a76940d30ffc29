//! Sheet protection flags
//!
//! This is **not** access control. The password is stored as a reversible
//! hex encoding of its UTF-8 bytes and anyone holding the workbook can read
//! it back with [`SheetProtection::password`]. `Worksheet::unprotect`
//! clears protection without checking any password. The flags only tell a
//! spreadsheet application which edits to refuse in its UI.

/// Protection state of a sheet: an obfuscated password plus the
/// capabilities that are locked while it is in force
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetProtection {
    password_token: String,
    /// Cell contents cannot be edited
    pub sheet: bool,
    /// Drawing objects cannot be edited
    pub objects: bool,
    /// Scenarios cannot be edited
    pub scenarios: bool,
    pub format_cells: bool,
    pub format_columns: bool,
    pub format_rows: bool,
    pub insert_columns: bool,
    pub insert_rows: bool,
    pub delete_columns: bool,
    pub delete_rows: bool,
    pub sort: bool,
    pub auto_filter: bool,
}

impl SheetProtection {
    /// Protection with every capability locked
    pub fn new(password: &str) -> Self {
        Self::from_token(encode_password(password))
    }

    /// Protection from an already-encoded token (used when loading)
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            password_token: token.into(),
            sheet: true,
            objects: true,
            scenarios: true,
            format_cells: true,
            format_columns: true,
            format_rows: true,
            insert_columns: true,
            insert_rows: true,
            delete_columns: true,
            delete_rows: true,
            sort: true,
            auto_filter: true,
        }
    }

    /// The stored token (upper-case hex)
    pub fn password_token(&self) -> &str {
        &self.password_token
    }

    /// Decode the stored password; `None` if the token is not ours
    pub fn password(&self) -> Option<String> {
        decode_password(&self.password_token)
    }
}

/// Hex-encode the UTF-8 bytes of `password`
pub fn encode_password(password: &str) -> String {
    password.bytes().map(|b| format!("{:02X}", b)).collect()
}

/// Reverse [`encode_password`]
pub fn decode_password(token: &str) -> Option<String> {
    if token.len() % 2 != 0 {
        return None;
    }
    let bytes = (0..token.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(token.get(i..i + 2)?, 16).ok())
        .collect::<Option<Vec<u8>>>()?;
    String::from_utf8(bytes).ok()
}
