//! Error types for copy operations.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

/// Errors that can occur while copying a tree.
///
/// Every variant is contained to the smallest scope it affects: a file or
/// link error fails that entry only, a directory error fails that subtree.
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    /// Failed to create the destination directory.
    #[error("Failed to create directory {}: {io_error}", path.display())]
    DirectoryCreateError {
        /// The directory path.
        path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// Failed to open the source directory for listing.
    #[error("Failed to open directory {}: {io_error}", path.display())]
    DirectoryOpenError {
        /// The directory path.
        path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// Failed to get metadata for a source entry.
    #[error("Failed to get metadata for {}: {io_error}", path.display())]
    MetadataError {
        /// The entry path.
        path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// Failed to open the source file for reading.
    #[error("Failed to open source file {}: {io_error}", path.display())]
    OpenSourceError {
        /// The source file path.
        path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// Failed to create the destination file.
    #[error("Failed to open destination file {}: {io_error}", path.display())]
    OpenDestinationError {
        /// The destination file path.
        path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// Reading from the source or writing to the destination failed mid-stream.
    #[error("Failed to stream {} to {}: {io_error}", source_path.display(), target_path.display())]
    StreamError {
        /// Source file path.
        source_path: PathBuf,
        /// Target file path.
        target_path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// The destination accepted fewer bytes than were read for a chunk.
    #[error(
        "Short write to {}: wrote {written} of {expected} bytes at offset {offset}",
        path.display()
    )]
    ShortWriteError {
        /// The destination file path.
        path: PathBuf,
        /// Byte offset of the chunk within the file.
        offset: u64,
        /// Bytes read from the source for this chunk.
        expected: usize,
        /// Bytes the destination accepted.
        written: usize,
    },

    /// Failed to apply permission bits to a destination entry.
    #[error("Failed to set permissions {mode:o} on {}: {io_error}", path.display())]
    PermissionsError {
        /// The destination path.
        path: PathBuf,
        /// The mode that could not be applied.
        mode: u32,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// Failed to read symlink target.
    #[error("Failed to read symlink {}: {io_error}", path.display())]
    ReadLinkError {
        /// The symlink path.
        path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// The symlink target grew between being stat'ed and being read.
    #[error(
        "Symlink {} changed while being copied: target is {actual} bytes, expected at most {expected}",
        path.display()
    )]
    LinkRaceError {
        /// The symlink path.
        path: PathBuf,
        /// Target length reported by the link's metadata.
        expected: u64,
        /// Length of the target actually read.
        actual: u64,
    },

    /// Failed to create symlink.
    #[error("Failed to create symlink {} ({reason}): {io_error}", path.display())]
    LinkCreateError {
        /// The symlink path.
        path: PathBuf,
        /// Short description of the OS-reported cause.
        reason: &'static str,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// A child unit could not be started.
    #[error("Failed to dispatch copy of {}: {io_error}", path.display())]
    DispatchError {
        /// The subdirectory the unit was meant to copy.
        path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// The outcome of a child unit could not be determined.
    #[error("Failed to join copy of {}: {message}", path.display())]
    JoinError {
        /// The subdirectory the unit was copying.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },
}

impl CopyError {
    /// Classify this error for inclusion in a [`CopyOutcome`](crate::CopyOutcome).
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::DirectoryCreateError { .. } => FailureKind::DirectoryCreate,
            Self::DirectoryOpenError { .. } => FailureKind::DirectoryOpen,
            Self::MetadataError { .. } => FailureKind::Metadata,
            Self::OpenSourceError { .. } => FailureKind::OpenSource,
            Self::OpenDestinationError { .. } => FailureKind::OpenDestination,
            Self::StreamError { .. } => FailureKind::Read,
            Self::ShortWriteError { .. } => FailureKind::ShortWrite,
            Self::PermissionsError { .. } => FailureKind::Permissions,
            Self::ReadLinkError { .. } => FailureKind::LinkRead,
            Self::LinkRaceError { .. } => FailureKind::LinkRace,
            Self::LinkCreateError { .. } => FailureKind::LinkCreate,
            Self::DispatchError { .. } => FailureKind::Dispatch,
            Self::JoinError { .. } => FailureKind::Join,
        }
    }
}

/// Coarse classification of a copy failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// A destination directory could not be created.
    DirectoryCreate,
    /// A source directory could not be listed.
    DirectoryOpen,
    /// An entry could not be stat'ed.
    Metadata,
    /// A source file could not be opened.
    OpenSource,
    /// A destination file could not be created.
    OpenDestination,
    /// I/O failed while streaming file contents.
    Read,
    /// A chunk was only partially written.
    ShortWrite,
    /// Permission bits could not be applied.
    Permissions,
    /// A link target could not be read.
    LinkRead,
    /// A link changed while being copied.
    LinkRace,
    /// A link could not be created.
    LinkCreate,
    /// A child unit could not be started.
    Dispatch,
    /// A child unit's outcome could not be determined.
    Join,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::DirectoryCreate => "directory create",
            Self::DirectoryOpen => "directory open",
            Self::Metadata => "metadata",
            Self::OpenSource => "open source",
            Self::OpenDestination => "open destination",
            Self::Read => "read",
            Self::ShortWrite => "short write",
            Self::Permissions => "permissions",
            Self::LinkRead => "link read",
            Self::LinkRace => "link race",
            Self::LinkCreate => "link create",
            Self::Dispatch => "dispatch",
            Self::Join => "join",
        };
        f.write_str(name)
    }
}
