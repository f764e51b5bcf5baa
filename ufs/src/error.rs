//! Error taxonomy for the filesystem engine.

use std::error::Error as StdError;
use std::fmt;

/// An error returned by a [`crate::fs::FileSystem`] operation.
///
/// Each variant carries a stable negative numeric code, retrievable through
/// [`FsError::code`], for tools and tests that want to assert on it
/// directly. The specific values are this crate's own invented ordering,
/// not figures drawn from any original source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
	/// Referenced inode is absent, out of range, corrupt, or of the wrong
	/// kind for the operation's preconditions on existence.
	InvalidInode,
	/// Operation's kind constraint violated (write to a directory, `create`
	/// into a non-directory parent, name collides with an entry of another
	/// type).
	InvalidType,
	/// Name is empty or longer than 28 bytes.
	InvalidName,
	/// Negative size passed to `write`.
	InvalidSize,
	/// No free inode or data slot when one is required, or the parent
	/// directory is at capacity.
	NotEnoughSpace,
	/// `unlink` target is a directory with children.
	DirNotEmpty,
	/// Attempt to unlink `.` or `..`.
	UnlinkNotAllowed,
	/// `lookup` found no matching entry.
	NotFound,
}

impl FsError {
	/// Returns this error's stable negative numeric code.
	pub fn code(self) -> i32 {
		match self {
			Self::InvalidInode => -1,
			Self::InvalidType => -2,
			Self::InvalidName => -3,
			Self::InvalidSize => -4,
			Self::NotEnoughSpace => -5,
			Self::DirNotEmpty => -6,
			Self::UnlinkNotAllowed => -7,
			Self::NotFound => -8,
		}
	}
}

impl fmt::Display for FsError {
	fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
		let msg = match self {
			Self::InvalidInode => "invalid inode",
			Self::InvalidType => "invalid type",
			Self::InvalidName => "invalid name",
			Self::InvalidSize => "invalid size",
			Self::NotEnoughSpace => "not enough space",
			Self::DirNotEmpty => "directory not empty",
			Self::UnlinkNotAllowed => "unlink not allowed on `.` or `..`",
			Self::NotFound => "not found",
		};
		write!(fmt, "{}", msg)
	}
}

impl StdError for FsError {}

/// The engine's top-level error type, combining protocol failures (see
/// [`FsError`]) with raw device I/O failures.
///
/// The distilled spec only ever discusses the eight protocol errors of
/// [`FsError`], on the assumption that the block device never fails. A real
/// `File`-backed `Disk` can fail (a truncated image, a permissions error),
/// so every fallible engine method returns `Result<T, Error>` rather than
/// `Result<T, FsError>` directly.
#[derive(Debug)]
pub enum Error {
	/// A filesystem protocol error.
	Fs(FsError),
	/// An I/O error from the underlying device or host filesystem.
	Io(std::io::Error),
}

impl fmt::Display for Error {
	fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Fs(e) => write!(fmt, "{}", e),
			Self::Io(e) => write!(fmt, "{}", e),
		}
	}
}

impl StdError for Error {}

impl From<FsError> for Error {
	fn from(e: FsError) -> Self {
		Self::Fs(e)
	}
}

impl From<std::io::Error> for Error {
	fn from(e: std::io::Error) -> Self {
		Self::Io(e)
	}
}
