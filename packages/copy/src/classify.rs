//! Entry classification from `lstat`-style metadata.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs::{FileType, Metadata};

/// The kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A directory.
    Directory,
    /// A regular file.
    RegularFile,
    /// A symbolic link (never followed).
    SymbolicLink,
    /// A character device.
    CharDevice,
    /// A block device.
    BlockDevice,
    /// A named pipe.
    Fifo,
    /// A unix domain socket.
    Socket,
    /// Anything else.
    Unknown,
}

impl EntryKind {
    /// Whether this entry is skipped rather than copied.
    ///
    /// Devices, FIFOs, sockets and unrecognised nodes are all skipped.
    #[must_use]
    pub const fn is_special(self) -> bool {
        matches!(
            self,
            Self::CharDevice | Self::BlockDevice | Self::Fifo | Self::Socket | Self::Unknown
        )
    }

    /// Human-readable name used in log output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Directory => "Directory",
            Self::RegularFile => "RegularFile",
            Self::SymbolicLink => "SymbolicLink",
            Self::CharDevice => "CharacterDevice",
            Self::BlockDevice => "BlockDevice",
            Self::Fifo => "Fifo",
            Self::Socket => "Socket",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify an entry from metadata obtained without following symlinks.
#[must_use]
pub fn classify(metadata: &Metadata) -> EntryKind {
    classify_file_type(metadata.file_type())
}

/// Classify a raw [`FileType`].
#[must_use]
pub fn classify_file_type(file_type: FileType) -> EntryKind {
    if file_type.is_symlink() {
        return EntryKind::SymbolicLink;
    }
    if file_type.is_dir() {
        return EntryKind::Directory;
    }
    if file_type.is_file() {
        return EntryKind::RegularFile;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::FileTypeExt;

        if file_type.is_char_device() {
            return EntryKind::CharDevice;
        }
        if file_type.is_block_device() {
            return EntryKind::BlockDevice;
        }
        if file_type.is_fifo() {
            return EntryKind::Fifo;
        }
        if file_type.is_socket() {
            return EntryKind::Socket;
        }
    }

    EntryKind::Unknown
}
