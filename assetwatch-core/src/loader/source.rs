use std::path::Path;

use super::LedgerError;
use crate::types::AssetLedger;

/// LedgerSource trait - decodes asset ledgers into AssetRows
///
/// This is the key abstraction boundary in assetwatch. Sources handle:
/// - File format decoding (delimited text today; a spreadsheet decoder
///   would slot in here)
/// - Header discovery and whitespace trimming
/// - Cell typing into RawDate variants
///
/// Everything after this point works with AssetLedger and is
/// format-agnostic. Missing tracked columns are recorded on the ledger,
/// not rejected; strictness is the column mapper's concern.
pub trait LedgerSource {
    /// Decode raw file bytes into a ledger.
    fn load_bytes(&self, bytes: &[u8]) -> Result<AssetLedger, LedgerError>;

    /// Convenience method: read a file and decode the bytes.
    ///
    /// This is the main entry point for ledger loading. Unreadable input
    /// maps to FileRead with the cause attached.
    fn load_file(&self, input: &Path) -> Result<AssetLedger, LedgerError> {
        let bytes = std::fs::read(input).map_err(|e| LedgerError::FileRead {
            path: input.display().to_string(),
            cause: e.to_string(),
        })?;
        self.load_bytes(&bytes)
    }

    /// Get source name for status output.
    fn name(&self) -> &str;

    /// Check if this source supports the given file type.
    fn supports_file_type(&self, path: &Path) -> bool;
}
