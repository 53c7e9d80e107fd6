//! Per-entry copy: regular files, symlinks and special nodes.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs::{self, File, Metadata, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use crate::classify::EntryKind;
use crate::error::CopyError;

/// Default chunk size for streaming file contents.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Permission bits of an entry, without the file type bits.
#[must_use]
pub fn permission_bits(metadata: &Metadata) -> u32 {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o7777
    }
    #[cfg(not(unix))]
    {
        if metadata.permissions().readonly() {
            0o444
        } else {
            0o644
        }
    }
}

/// Copy a regular file using the default chunk size.
///
/// See [`copy_regular_file_with_buffer`].
///
/// # Errors
///
/// * If the copy fails
pub fn copy_regular_file(source: &Path, target: &Path, mode: u32) -> Result<u64, CopyError> {
    copy_regular_file_with_buffer(source, target, mode, DEFAULT_BUFFER_SIZE)
}

/// Stream a regular file's bytes from `source` into a new file at `target`.
///
/// The destination is created with `mode` and then has exactly `mode` applied,
/// independent of the process umask. Every chunk must be written in full;
/// the first short write aborts the copy of this file.
///
/// Returns the number of bytes copied.
///
/// # Arguments
///
/// * `source` - Source file path
/// * `target` - Target file path
/// * `mode` - Permission bits for the new file
/// * `buffer_size` - Chunk size in bytes (must be non-zero)
///
/// # Errors
///
/// * If the source cannot be opened
/// * If the target cannot be created
/// * If reading or writing fails mid-stream
/// * If a chunk is only partially written
pub fn copy_regular_file_with_buffer(
    source: &Path,
    target: &Path,
    mode: u32,
    buffer_size: usize,
) -> Result<u64, CopyError> {
    let mut reader = File::open(source).map_err(|e| CopyError::OpenSourceError {
        path: source.to_path_buf(),
        io_error: e,
    })?;
    advise_sequential(&reader);

    let mut writer = open_destination(target, mode)?;

    let copied = stream_contents(&mut reader, &mut writer, buffer_size, source, target)?;
    set_file_mode(&writer, target, mode)?;

    Ok(copied)
}

/// Copy everything `reader` yields into `writer`, one chunk at a time.
///
/// Each chunk is handed to a single `write` call; a writer that accepts fewer
/// bytes than offered fails the copy with [`CopyError::ShortWriteError`].
fn stream_contents<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    buffer_size: usize,
    source: &Path,
    target: &Path,
) -> Result<u64, CopyError> {
    let mut buffer = vec![0_u8; buffer_size.max(1)];
    let mut offset: u64 = 0;

    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(stream_error(source, target, e)),
        };

        let written =
            write_chunk(writer, &buffer[..read]).map_err(|e| stream_error(source, target, e))?;

        if written != read {
            return Err(CopyError::ShortWriteError {
                path: target.to_path_buf(),
                offset,
                expected: read,
                written,
            });
        }

        offset += read as u64;
    }

    Ok(offset)
}

/// Recreate a symlink at `target` pointing at the same target string as `source`.
///
/// The target string is copied verbatim: it is neither resolved nor validated,
/// so dangling links and links leaving the tree are preserved as-is.
///
/// `metadata` is the link's own metadata. If the target read back is longer than
/// the size it reported, the link changed underneath us and the copy is refused.
/// A link that shrank is not detected.
///
/// # Errors
///
/// * If the link target cannot be read
/// * If the link grew since it was stat'ed
/// * If the new link cannot be created
pub fn copy_symlink(source: &Path, target: &Path, metadata: &Metadata) -> Result<(), CopyError> {
    let link_target = fs::read_link(source).map_err(|e| CopyError::ReadLinkError {
        path: source.to_path_buf(),
        io_error: e,
    })?;

    // Some filesystems report a zero size for links; nothing to compare against.
    let expected = metadata.len();
    let actual = link_target.as_os_str().len() as u64;
    if expected != 0 && actual > expected {
        return Err(CopyError::LinkRaceError {
            path: source.to_path_buf(),
            expected,
            actual,
        });
    }

    create_symlink(&link_target, target).map_err(|e| CopyError::LinkCreateError {
        path: target.to_path_buf(),
        reason: link_failure_reason(&e),
        io_error: e,
    })?;

    Ok(())
}

/// Skip a device, FIFO, socket or unrecognised node.
///
/// Skipping is not a failure. The warning is logged under `scope`, the label
/// of the unit that found the entry.
pub fn copy_special(scope: &str, source: &Path, kind: EntryKind) {
    log::warn!("[{scope}] Skipping {kind} {}", source.display());
}

#[cfg(unix)]
fn create_symlink(link_target: &Path, target: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(link_target, target)
}

#[cfg(windows)]
fn create_symlink(link_target: &Path, target: &Path) -> std::io::Result<()> {
    let resolved = target
        .parent()
        .map_or_else(|| link_target.to_path_buf(), |p| p.join(link_target));
    if resolved.is_dir() {
        std::os::windows::fs::symlink_dir(link_target, target)
    } else {
        std::os::windows::fs::symlink_file(link_target, target)
    }
}

fn open_destination(target: &Path, mode: u32) -> Result<File, CopyError> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    options
        .open(target)
        .map_err(|e| CopyError::OpenDestinationError {
            path: target.to_path_buf(),
            io_error: e,
        })
}

fn set_file_mode(file: &File, target: &Path, mode: u32) -> Result<(), CopyError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        file.set_permissions(fs::Permissions::from_mode(mode))
            .map_err(|e| CopyError::PermissionsError {
                path: target.to_path_buf(),
                mode,
                io_error: e,
            })?;
    }
    #[cfg(not(unix))]
    let _ = (file, target, mode);

    Ok(())
}

/// Write one chunk with a single `write` call, retrying only on EINTR.
fn write_chunk<W: Write>(writer: &mut W, chunk: &[u8]) -> std::io::Result<usize> {
    loop {
        match writer.write(chunk) {
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            other => return other,
        }
    }
}

fn stream_error(source: &Path, target: &Path, io_error: std::io::Error) -> CopyError {
    CopyError::StreamError {
        source_path: source.to_path_buf(),
        target_path: target.to_path_buf(),
        io_error,
    }
}

/// Hint the kernel that `file` will be read once, front to back.
#[cfg(target_os = "linux")]
fn advise_sequential(file: &File) {
    use std::os::unix::io::AsRawFd;

    // SAFETY: the descriptor is owned by `file` and stays open for the call.
    // Advisory only; a failure changes nothing about the copy.
    let _ = unsafe { libc::posix_fadvise(file.as_raw_fd(), 0, 0, libc::POSIX_FADV_SEQUENTIAL) };
}

#[cfg(not(target_os = "linux"))]
const fn advise_sequential(_file: &File) {}

/// Describe why creating a symlink failed, from the OS error code.
#[cfg(unix)]
fn link_failure_reason(error: &std::io::Error) -> &'static str {
    match error.raw_os_error() {
        Some(libc::EACCES) => "permission denied",
        Some(libc::EPERM) => "operation not permitted",
        Some(libc::EDQUOT) => "disk quota exhausted",
        Some(libc::EEXIST) => "path already exists",
        Some(libc::EFAULT) => "path outside accessible address space",
        Some(libc::EIO) => "I/O error",
        Some(libc::ELOOP) => "too many symbolic links in path",
        Some(libc::ENAMETOOLONG) => "name too long",
        Some(libc::ENOENT) => "directory component missing",
        Some(libc::ENOMEM) => "out of kernel memory",
        Some(libc::ENOSPC) => "no space left on device",
        Some(libc::ENOTDIR) => "path component is not a directory",
        Some(libc::EROFS) => "read-only filesystem",
        Some(libc::ESTALE) => "stale file handle",
        _ => "unexpected error",
    }
}

#[cfg(not(unix))]
fn link_failure_reason(error: &std::io::Error) -> &'static str {
    match error.kind() {
        ErrorKind::PermissionDenied => "permission denied",
        ErrorKind::AlreadyExists => "path already exists",
        ErrorKind::NotFound => "directory component missing",
        _ => "unexpected error",
    }
}
