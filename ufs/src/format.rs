//! Builds fresh disk images for tests.
//!
//! There is no `mkfs`-equivalent binary in this workspace: the reference
//! tools only ever operate on images that already exist. This module stands
//! in for that missing collaborator so tests have something to point a
//! [`FileSystem`] at.

#![cfg(test)]

use crate::bitmap;
use crate::disk::Disk;
use crate::disk::BLOCK_SIZE;
use crate::fs::FileSystem;
use crate::inode::DirEntry;
use crate::inode::Inode;
use crate::inode::DIR_ENT_SIZE;
use crate::inode::INODE_SIZE;
use crate::inode::TYPE_DIRECTORY;
use crate::superblock::Superblock;
use crate::util::ceil_division;
use std::io;
use std::path::Path;

const BITS_PER_BLOCK: i64 = BLOCK_SIZE as i64 * 8;

/// Creates a disk image at `path` with `num_inodes` inode slots and
/// `num_data` data blocks, formats it with a root directory at inode 0, and
/// returns a [`FileSystem`] open on it.
pub fn format<P: AsRef<Path>>(path: P, num_inodes: i32, num_data: i32) -> io::Result<FileSystem> {
	let inodes_per_block = (BLOCK_SIZE / INODE_SIZE) as i64;

	let inode_bitmap_len = ceil_division(num_inodes as i64, BITS_PER_BLOCK) as i32;
	let data_bitmap_len = ceil_division(num_data as i64, BITS_PER_BLOCK) as i32;
	let inode_region_len = ceil_division(num_inodes as i64, inodes_per_block) as i32;
	let data_region_len = num_data;

	let inode_bitmap_addr = 1;
	let data_bitmap_addr = inode_bitmap_addr + inode_bitmap_len;
	let inode_region_addr = data_bitmap_addr + data_bitmap_len;
	let data_region_addr = inode_region_addr + inode_region_len;
	let total_blocks = (data_region_addr + data_region_len) as u32;

	let mut disk = Disk::create(path)?;
	disk.set_len(total_blocks)?;

	let super_ = Superblock {
		inode_bitmap_addr,
		inode_bitmap_len,
		data_bitmap_addr,
		data_bitmap_len,
		inode_region_addr,
		inode_region_len,
		data_region_addr,
		data_region_len,
		num_inodes,
		num_data,
	};
	super_.write(&mut disk)?;

	let zero_block = vec![0u8; BLOCK_SIZE];
	for i in 0..(total_blocks - 1) {
		disk.write_block(i + 1, &zero_block)?;
	}

	let mut inode_bitmap = vec![0u8; inode_bitmap_len as usize * BLOCK_SIZE];
	bitmap::set(&mut inode_bitmap, 0);
	bitmap::write(&mut disk, inode_bitmap_addr, inode_bitmap_len, &inode_bitmap)?;

	let mut data_bitmap = vec![0u8; data_bitmap_len as usize * BLOCK_SIZE];
	bitmap::set(&mut data_bitmap, 0);
	bitmap::write(&mut disk, data_bitmap_addr, data_bitmap_len, &data_bitmap)?;

	let mut root = Inode::new(TYPE_DIRECTORY);
	root.direct[0] = data_region_addr as u32;
	root.size = 2 * DIR_ENT_SIZE as i32;

	let mut root_block = [0u8; BLOCK_SIZE];
	root_block[..DIR_ENT_SIZE].copy_from_slice(crate::raw::bytes_of(&DirEntry::new(".", 0)));
	root_block[DIR_ENT_SIZE..2 * DIR_ENT_SIZE]
		.copy_from_slice(crate::raw::bytes_of(&DirEntry::new("..", 0)));
	disk.write_block(data_region_addr as u32, &root_block)?;

	let mut inodes = vec![Inode::new(0); inode_region_len as usize * (BLOCK_SIZE / INODE_SIZE)];
	inodes[0] = root;
	crate::inode::write_region(&mut disk, &super_, &inodes)?;

	Ok(FileSystem::new(disk))
}
