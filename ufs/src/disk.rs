//! The block device abstraction the engine reads and writes through.

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::io::Write;
use std::path::Path;

/// The size in bytes of a single block, and the engine's unit of addressing.
pub const BLOCK_SIZE: usize = 4096;

/// A fixed-size-block device backed by a disk image file.
///
/// `Disk` only ever does whole-block I/O: `read_block`/`write_block` always
/// move exactly [`BLOCK_SIZE`] bytes, seeking to the block's absolute offset
/// first.
pub struct Disk {
	file: File,
}

impl Disk {
	/// Opens the disk image at `path` for reading and writing.
	pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
		let file = OpenOptions::new().read(true).write(true).open(path)?;
		Ok(Self { file })
	}

	/// Creates a new disk image at `path`, truncating it if it already
	/// exists.
	pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
		let file = OpenOptions::new()
			.read(true)
			.write(true)
			.create(true)
			.truncate(true)
			.open(path)?;
		Ok(Self { file })
	}

	/// Reads block number `n` into `buf`, which must be exactly
	/// [`BLOCK_SIZE`] bytes long.
	pub fn read_block(&mut self, n: u32, buf: &mut [u8]) -> io::Result<()> {
		debug_assert_eq!(buf.len(), BLOCK_SIZE);
		self.file.seek(SeekFrom::Start(n as u64 * BLOCK_SIZE as u64))?;
		self.file.read_exact(buf)
	}

	/// Writes `buf`, which must be exactly [`BLOCK_SIZE`] bytes long, to
	/// block number `n`.
	pub fn write_block(&mut self, n: u32, buf: &[u8]) -> io::Result<()> {
		debug_assert_eq!(buf.len(), BLOCK_SIZE);
		self.file.seek(SeekFrom::Start(n as u64 * BLOCK_SIZE as u64))?;
		self.file.write_all(buf)
	}

	/// Extends the backing file to hold `blocks` blocks, zero-filling it.
	///
	/// Used only by the test-only formatter (see [`crate::format`]); normal
	/// operation never resizes the image.
	pub fn set_len(&mut self, blocks: u32) -> io::Result<()> {
		self.file.set_len(blocks as u64 * BLOCK_SIZE as u64)
	}
}
