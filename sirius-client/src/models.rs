//! Values returned by the Sirius service

use serde::Serialize;
use sirius_core::{Result, SiriusError};
use sirius_protocol::services::FilesListResponse;
use sirius_protocol::{types, FileKind};
use std::fmt;

/// A storage mount visible to a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mount {
    /// The id of the mount
    pub id: String,
    /// The name of the mount
    pub name: String,
    /// The mount root path
    pub mount_location: String,
    /// The id of the group the mount belongs to
    pub group_id: String,
}

impl From<types::Mount> for Mount {
    fn from(mount: types::Mount) -> Self {
        Self {
            id: mount.id,
            name: mount.name,
            mount_location: mount.mount_location,
            group_id: mount.group_id,
        }
    }
}

/// Kind of a file system entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Unknown,
    Directory,
    File,
    /// A logical group of related files, e.g. an image sequence
    Sequence,
}

impl From<FileKind> for FileType {
    fn from(kind: FileKind) -> Self {
        match kind {
            FileKind::Unknown => FileType::Unknown,
            FileKind::Directory => FileType::Directory,
            FileKind::File => FileType::File,
            FileKind::Sequence => FileType::Sequence,
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileType::Unknown => "unknown",
            FileType::Directory => "directory",
            FileType::File => "file",
            FileType::Sequence => "sequence",
        };
        f.write_str(name)
    }
}

/// A file or directory inside a mount
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    /// Full path, relative to the mount root
    pub path: String,
    pub name: String,
    pub mount_id: String,
    /// Size in bytes
    pub size: u64,
    pub file_type: FileType,
}

impl FileEntry {
    pub fn is_dir(&self) -> bool {
        self.file_type == FileType::Directory
    }
}

impl From<types::File> for FileEntry {
    fn from(file: types::File) -> Self {
        // Unrecognised enum values decode as Unknown
        let file_type = FileType::from(file.r#type());
        Self {
            path: file.path,
            name: file.name,
            mount_id: file.mount_id,
            size: file.size,
            file_type,
        }
    }
}

impl TryFrom<FilesListResponse> for FileEntry {
    type Error = SiriusError;

    fn try_from(response: FilesListResponse) -> Result<Self> {
        response.file.map(FileEntry::from).ok_or_else(|| {
            SiriusError::Shape(format!(
                "FilesList message for '{}' in mount '{}' has no file",
                response.path, response.mount_id
            ))
        })
    }
}
