//! File kind dispatch shared by reading and writing.

use std::fmt;
use std::path::Path;

use crate::error::{OutputError, Result};

/// On-disk cluster file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// `.hdf5` or `.h5`.
    Hdf5,
    /// `.fits`.
    Fits,
}

impl FileKind {
    /// Select the format from the file extension, ignoring ASCII case.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("hdf5" | "h5") => Ok(Self::Hdf5),
            Some("fits") => Ok(Self::Fits),
            _ => Err(OutputError::UnrecognizedExtension {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Whether this build can read and write the format.
    #[must_use]
    pub const fn is_available(self) -> bool {
        match self {
            Self::Fits => true,
            Self::Hdf5 => cfg!(feature = "hdf5"),
        }
    }

    pub(crate) fn ensure_available(self) -> Result<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(OutputError::Hdf5Unavailable)
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hdf5 => f.write_str("HDF5"),
            Self::Fits => f.write_str("FITS"),
        }
    }
}
