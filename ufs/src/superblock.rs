//! The layout descriptor stored in block 0 of the image.

use crate::disk::BLOCK_SIZE;
use crate::disk::Disk;
use crate::raw::bytes_of;
use crate::raw::bytes_of_mut;
use std::io;
use std::mem::size_of;

/// Block number of the superblock. Always 0.
pub const SUPERBLOCK_BLOCK: u32 = 0;

/// The filesystem's layout descriptor, decoded from block 0.
///
/// Immutable after formatting: nothing in the engine ever rewrites the
/// superblock once an image has been created.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Superblock {
	pub inode_bitmap_addr: i32,
	pub inode_bitmap_len: i32,
	pub data_bitmap_addr: i32,
	pub data_bitmap_len: i32,
	pub inode_region_addr: i32,
	pub inode_region_len: i32,
	pub data_region_addr: i32,
	pub data_region_len: i32,
	pub num_inodes: i32,
	pub num_data: i32,
}

impl Superblock {
	/// Reads and decodes the superblock from block 0 of `disk`.
	pub fn read(disk: &mut Disk) -> io::Result<Self> {
		let mut block = [0u8; BLOCK_SIZE];
		disk.read_block(SUPERBLOCK_BLOCK, &mut block)?;

		let mut super_: Self = Default::default();
		bytes_of_mut(&mut super_).copy_from_slice(&block[..size_of::<Self>()]);
		Ok(super_)
	}

	/// Writes the superblock to block 0 of `disk`. Used only by the
	/// test-only formatter; normal operation never rewrites it.
	pub fn write(&self, disk: &mut Disk) -> io::Result<()> {
		let mut block = [0u8; BLOCK_SIZE];
		block[..size_of::<Self>()].copy_from_slice(bytes_of(self));
		disk.write_block(SUPERBLOCK_BLOCK, &block)
	}
}
