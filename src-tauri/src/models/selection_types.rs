use serde::{Deserialize, Serialize};

/// A file offered to the widget by a drop or a picker change.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FileCandidate {
    pub name: String,
    /// Declared MIME type, possibly empty when the source could not tell.
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl FileCandidate {
    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }
}

/// The single image currently held by the widget.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl From<FileCandidate> for SelectedFile {
    fn from(candidate: FileCandidate) -> Self {
        SelectedFile {
            name: candidate.name,
            mime: candidate.mime,
            bytes: candidate.bytes,
        }
    }
}
