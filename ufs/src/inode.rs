//! Inode records and directory entries.

use crate::disk::BLOCK_SIZE;
use crate::disk::Disk;
use crate::raw::bytes_of;
use crate::raw::bytes_of_mut;
use crate::superblock::Superblock;
use crate::util::ceil_division;
use std::io;
use std::mem::size_of;

/// The inode type tag for a directory.
pub const TYPE_DIRECTORY: i32 = 0;
/// The inode type tag for a regular file.
pub const TYPE_REGULAR_FILE: i32 = 1;

/// Number of absolute block pointers an inode carries directly. No indirect
/// blocks exist, so this is also the maximum number of blocks a file or
/// directory can ever use.
pub const DIRECT_PTRS: usize = 30;

/// The maximum size in bytes of a file or directory.
pub const MAX_FILE_SIZE: i64 = DIRECT_PTRS as i64 * BLOCK_SIZE as i64;

/// The on-disk size in bytes of one inode record.
pub const INODE_SIZE: usize = size_of::<Inode>();

/// The on-disk size in bytes of one directory entry.
pub const DIR_ENT_SIZE: usize = size_of::<DirEntry>();

/// Maximum length in bytes of a directory entry name (including any `\0`
/// padding, so the usable length is strictly less).
pub const DIR_ENT_NAME_SIZE: usize = 28;

/// A 128-byte on-disk inode record: a file or directory's type, size, and
/// block pointers.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Inode {
	/// `TYPE_DIRECTORY` or `TYPE_REGULAR_FILE`.
	pub type_: i32,
	/// Logical size in bytes. For directories this is always a multiple of
	/// [`DIR_ENT_SIZE`].
	pub size: i32,
	/// Absolute block numbers. Entries at index `>= ceil(size / BLOCK_SIZE)`
	/// are unused and must not be trusted by readers.
	pub direct: [u32; DIRECT_PTRS],
}

const _: () = assert!(size_of::<Inode>() == 128);

impl Inode {
	/// Returns a zeroed inode of the given type.
	pub fn new(type_: i32) -> Self {
		Self {
			type_,
			size: 0,
			direct: [0; DIRECT_PTRS],
		}
	}

	/// Tells whether this inode describes a directory.
	pub fn is_dir(&self) -> bool {
		self.type_ == TYPE_DIRECTORY
	}

	/// The number of blocks this inode currently occupies, `ceil(size /
	/// BLOCK_SIZE)`.
	pub fn blocks_used(&self) -> usize {
		ceil_division(self.size as i64, BLOCK_SIZE as i64) as usize
	}
}

const _: () = assert!(size_of::<DirEntry>() == 32);

/// A 32-byte directory entry: a NUL-padded name and the entry's inode
/// number.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct DirEntry {
	/// NUL-padded name, up to [`DIR_ENT_NAME_SIZE`] bytes.
	pub name: [u8; DIR_ENT_NAME_SIZE],
	/// The inode number this entry refers to.
	pub inum: i32,
}

impl DirEntry {
	/// Builds an entry for `name` pointing at `inum`.
	///
	/// `name` must already have been validated to be non-empty and at most
	/// [`DIR_ENT_NAME_SIZE`] bytes long.
	pub fn new(name: &str, inum: i32) -> Self {
		let mut buf = [0u8; DIR_ENT_NAME_SIZE];
		let bytes = name.as_bytes();
		buf[..bytes.len()].copy_from_slice(bytes);
		Self { name: buf, inum }
	}

	/// Returns the entry's name, stopping at the first NUL byte.
	pub fn name(&self) -> &[u8] {
		let len = self
			.name
			.iter()
			.position(|&b| b == 0)
			.unwrap_or(self.name.len());
		&self.name[..len]
	}
}

/// Decodes the directory entry at slot `i` of a buffer holding one or more
/// concatenated directory blocks.
pub fn entry_at(buf: &[u8], i: usize) -> DirEntry {
	let off = i * DIR_ENT_SIZE;
	let mut entry = DirEntry {
		name: [0; DIR_ENT_NAME_SIZE],
		inum: 0,
	};
	bytes_of_mut(&mut entry).copy_from_slice(&buf[off..off + DIR_ENT_SIZE]);
	entry
}

/// Encodes `entry` into slot `i` of a buffer holding one or more
/// concatenated directory blocks.
pub fn set_entry_at(buf: &mut [u8], i: usize, entry: &DirEntry) {
	let off = i * DIR_ENT_SIZE;
	buf[off..off + DIR_ENT_SIZE].copy_from_slice(bytes_of(entry));
}

/// The number of inode slots one block holds.
pub fn inodes_per_block() -> usize {
	BLOCK_SIZE / INODE_SIZE
}

/// Reads the single inode record `inode_number`, touching only the one
/// block that contains it.
pub fn read_one(disk: &mut Disk, super_: &Superblock, inode_number: i32) -> io::Result<Inode> {
	let per_block = inodes_per_block();
	let block_idx = inode_number as usize / per_block;
	let offset_in_block = inode_number as usize % per_block;

	let mut block = [0u8; BLOCK_SIZE];
	disk.read_block((super_.inode_region_addr + block_idx as i32) as u32, &mut block)?;

	let mut inode = Inode::new(0);
	let off = offset_in_block * INODE_SIZE;
	bytes_of_mut(&mut inode).copy_from_slice(&block[off..off + INODE_SIZE]);
	Ok(inode)
}

/// Reads the entire inode region into a packed `Vec<Inode>` of length
/// `inode_region_len * (BLOCK_SIZE / INODE_SIZE)`.
pub fn read_region(disk: &mut Disk, super_: &Superblock) -> io::Result<Vec<Inode>> {
	let per_block = inodes_per_block();
	let total = super_.inode_region_len as usize * per_block;
	let mut inodes = vec![Inode::new(0); total];

	let mut block = [0u8; BLOCK_SIZE];
	for i in 0..super_.inode_region_len {
		disk.read_block((super_.inode_region_addr + i) as u32, &mut block)?;
		for (j, inode) in inodes[i as usize * per_block..(i as usize + 1) * per_block]
			.iter_mut()
			.enumerate()
		{
			let off = j * INODE_SIZE;
			bytes_of_mut(inode).copy_from_slice(&block[off..off + INODE_SIZE]);
		}
	}
	Ok(inodes)
}

/// Writes back the entire inode region from a packed `Vec<Inode>` built by
/// [`read_region`].
pub fn write_region(disk: &mut Disk, super_: &Superblock, inodes: &[Inode]) -> io::Result<()> {
	let per_block = inodes_per_block();

	let mut block = [0u8; BLOCK_SIZE];
	for i in 0..super_.inode_region_len {
		for (j, inode) in inodes[i as usize * per_block..(i as usize + 1) * per_block]
			.iter()
			.enumerate()
		{
			let off = j * INODE_SIZE;
			block[off..off + INODE_SIZE].copy_from_slice(bytes_of(inode));
		}
		disk.write_block((super_.inode_region_addr + i) as u32, &block)?;
	}
	Ok(())
}

impl Default for Inode {
	fn default() -> Self {
		Self::new(0)
	}
}
