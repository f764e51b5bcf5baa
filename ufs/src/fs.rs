//! The filesystem engine: `stat`, `lookup`, `read`, `write`, `create` and
//! `unlink` over the on-disk layout described by the superblock.

use crate::bitmap;
use crate::disk::BLOCK_SIZE;
use crate::disk::Disk;
use crate::error::Error;
use crate::error::FsError;
use crate::inode;
use crate::inode::DIRECT_PTRS;
use crate::inode::DIR_ENT_NAME_SIZE;
use crate::inode::DIR_ENT_SIZE;
use crate::inode::DirEntry;
use crate::inode::Inode;
use crate::inode::MAX_FILE_SIZE;
use crate::inode::TYPE_DIRECTORY;
use crate::inode::TYPE_REGULAR_FILE;
use crate::superblock::Superblock;
use crate::util::ceil_division;
use std::io;

/// The filesystem engine. Owns the block device exclusively for its
/// lifetime; see the crate's concurrency notes.
pub struct FileSystem {
	disk: Disk,
}

impl FileSystem {
	/// Wraps `disk` as a filesystem engine.
	pub fn new(disk: Disk) -> Self {
		Self { disk }
	}

	/// Gives back the underlying device.
	pub fn into_disk(self) -> Disk {
		self.disk
	}

	/// Decodes the layout descriptor from block 0.
	pub fn read_superblock(&mut self) -> io::Result<Superblock> {
		Superblock::read(&mut self.disk)
	}

	/// Reads the inode-allocation bitmap.
	pub fn read_inode_bitmap(&mut self, super_: &Superblock) -> io::Result<Vec<u8>> {
		bitmap::read(&mut self.disk, super_.inode_bitmap_addr, super_.inode_bitmap_len)
	}

	/// Writes the inode-allocation bitmap.
	pub fn write_inode_bitmap(&mut self, super_: &Superblock, bm: &[u8]) -> io::Result<()> {
		bitmap::write(&mut self.disk, super_.inode_bitmap_addr, super_.inode_bitmap_len, bm)
	}

	/// Reads the data-allocation bitmap.
	pub fn read_data_bitmap(&mut self, super_: &Superblock) -> io::Result<Vec<u8>> {
		bitmap::read(&mut self.disk, super_.data_bitmap_addr, super_.data_bitmap_len)
	}

	/// Writes the data-allocation bitmap.
	pub fn write_data_bitmap(&mut self, super_: &Superblock, bm: &[u8]) -> io::Result<()> {
		bitmap::write(&mut self.disk, super_.data_bitmap_addr, super_.data_bitmap_len, bm)
	}

	/// Reads the whole inode region.
	pub fn read_inode_region(&mut self, super_: &Superblock) -> io::Result<Vec<Inode>> {
		inode::read_region(&mut self.disk, super_)
	}

	/// Writes the whole inode region.
	pub fn write_inode_region(&mut self, super_: &Superblock, inodes: &[Inode]) -> io::Result<()> {
		inode::write_region(&mut self.disk, super_, inodes)
	}

	/// Reads a single inode's record.
	///
	/// Fails with `EInvalidInode` if `inode_number` is out of range or its
	/// inode-bitmap bit is clear.
	pub fn stat(&mut self, inode_number: i32) -> Result<Inode, Error> {
		let super_ = self.read_superblock()?;
		if inode_number < 0 || inode_number >= super_.num_inodes {
			return Err(FsError::InvalidInode.into());
		}

		let inode_bitmap = self.read_inode_bitmap(&super_)?;
		if !bitmap::is_set(&inode_bitmap, inode_number) {
			return Err(FsError::InvalidInode.into());
		}

		Ok(inode::read_one(&mut self.disk, &super_, inode_number)?)
	}

	/// Resolves `name` within the directory `parent`.
	pub fn lookup(&mut self, parent: i32, name: &str) -> Result<i32, Error> {
		let parent_inode = self.stat(parent).map_err(|_| FsError::InvalidInode)?;
		if !parent_inode.is_dir() {
			return Err(FsError::InvalidInode.into());
		}

		let mut buf = vec![0u8; parent_inode.size as usize];
		self.read(parent, &mut buf, parent_inode.size)?;

		let entries = parent_inode.size as usize / DIR_ENT_SIZE;
		for i in 0..entries {
			let entry = inode::entry_at(&buf, i);
			if entry.name() == name.as_bytes() {
				return Ok(entry.inum);
			}
		}
		Err(FsError::NotFound.into())
	}

	/// Reads up to `size` bytes from the start of the file or directory
	/// `inode_number` into `buffer`.
	///
	/// `buffer` must be at least `min(size, inode.size)` bytes long; the
	/// caller is expected to size it from a prior `stat`.
	pub fn read(&mut self, inode_number: i32, buffer: &mut [u8], size: i32) -> Result<i32, Error> {
		let inode = self.stat(inode_number).map_err(|_| FsError::InvalidInode)?;

		let n = if size <= 0 || size > inode.size {
			inode.size
		} else {
			size
		};

		let blocks_used = inode.blocks_used();
		let mut copied = 0i32;
		let mut block_index = 0usize;
		let mut block = [0u8; BLOCK_SIZE];

		while copied < n && block_index < blocks_used {
			self.disk.read_block(inode.direct[block_index], &mut block)?;

			let to_copy = ((n - copied) as usize).min(BLOCK_SIZE);
			let start = copied as usize;
			buffer[start..start + to_copy].copy_from_slice(&block[..to_copy]);

			copied += to_copy as i32;
			block_index += 1;
		}

		Ok(copied)
	}

	/// Creates a file or directory named `name` inside `parent`.
	///
	/// Idempotent: calling again with the same `(parent, type, name)`
	/// returns the existing inode number without mutating anything.
	pub fn create(&mut self, parent: i32, type_: i32, name: &str) -> Result<i32, Error> {
		let super_ = self.read_superblock()?;

		let parent_inode = self.stat(parent).map_err(|_| FsError::InvalidInode)?;
		if !parent_inode.is_dir() {
			return Err(FsError::InvalidType.into());
		}
		if name.is_empty() || name.len() > DIR_ENT_NAME_SIZE {
			return Err(FsError::InvalidName.into());
		}

		let mut parent_block = [0u8; BLOCK_SIZE];
		self.disk.read_block(parent_inode.direct[0], &mut parent_block)?;

		let entry_count = parent_inode.size as usize / DIR_ENT_SIZE;
		for i in 0..entry_count {
			let entry = inode::entry_at(&parent_block, i);
			if entry.name() == name.as_bytes() {
				let existing = self.stat(entry.inum).map_err(|_| FsError::InvalidInode)?;
				return if existing.type_ == type_ {
					Ok(entry.inum)
				} else {
					Err(FsError::InvalidType.into())
				};
			}
		}

		let mut inode_bitmap = self.read_inode_bitmap(&super_)?;
		if !bitmap::is_set(&inode_bitmap, parent) {
			return Err(FsError::InvalidInode.into());
		}

		let new_inode_number = bitmap::first_free(&inode_bitmap, super_.num_inodes);
		let mut data_bitmap = self.read_data_bitmap(&super_)?;
		let new_data_block = if type_ == TYPE_DIRECTORY {
			bitmap::first_free(&data_bitmap, super_.num_data)
		} else {
			None
		};

		let entries_per_block = BLOCK_SIZE / DIR_ENT_SIZE;
		let entry_index = entry_count;
		let space_available = new_inode_number.is_some()
			&& (type_ != TYPE_DIRECTORY || new_data_block.is_some())
			&& entry_index < entries_per_block;
		if !space_available {
			return Err(FsError::NotEnoughSpace.into());
		}
		let ni = new_inode_number.unwrap();

		let mut inodes = self.read_inode_region(&super_)?;
		let mut new_inode = Inode::new(type_);

		if type_ == TYPE_DIRECTORY {
			let nd = new_data_block.unwrap();
			let abs = super_.data_region_addr + nd;
			new_inode.direct[0] = abs as u32;

			let mut dir_block = [0u8; BLOCK_SIZE];
			inode::set_entry_at(&mut dir_block, 0, &DirEntry::new(".", ni));
			inode::set_entry_at(&mut dir_block, 1, &DirEntry::new("..", parent));
			new_inode.size = 2 * DIR_ENT_SIZE as i32;

			self.disk.write_block(abs as u32, &dir_block)?;
			bitmap::set(&mut data_bitmap, nd);
		}

		inode::set_entry_at(&mut parent_block, entry_index, &DirEntry::new(name, ni));
		bitmap::set(&mut inode_bitmap, ni);

		inodes[ni as usize] = new_inode;
		let mut parent_inode = parent_inode;
		parent_inode.size += DIR_ENT_SIZE as i32;
		inodes[parent as usize] = parent_inode;

		self.disk.write_block(parent_inode.direct[0], &parent_block)?;
		self.write_inode_region(&super_, &inodes)?;
		self.write_inode_bitmap(&super_, &inode_bitmap)?;
		self.write_data_bitmap(&super_, &data_bitmap)?;

		Ok(ni)
	}

	/// Replaces the contents of the regular file `inode_number` with
	/// `buffer[..size]`, writing as many bytes as blocks are available.
	pub fn write(&mut self, inode_number: i32, buffer: &[u8], size: i32) -> Result<i32, Error> {
		let super_ = self.read_superblock()?;
		let mut inode = self.stat(inode_number).map_err(|_| FsError::InvalidInode)?;
		if inode.type_ != TYPE_REGULAR_FILE {
			return Err(FsError::InvalidType.into());
		}
		if size < 0 {
			return Err(FsError::InvalidSize.into());
		}

		let size = size.min(MAX_FILE_SIZE as i32);

		let mut inodes = self.read_inode_region(&super_)?;
		let mut data_bitmap = self.read_data_bitmap(&super_)?;

		let need = (ceil_division(size as i64, BLOCK_SIZE as i64) as usize).min(DIRECT_PTRS);
		let mut bytes_written = 0i32;
		let mut block = [0u8; BLOCK_SIZE];

		for slot in inode.direct.iter_mut().take(need) {
			if bytes_written >= size {
				break;
			}

			let mut abs = *slot as i32;
			let rel = abs - super_.data_region_addr;
			let already_valid =
				rel >= 0 && rel < super_.data_region_len && bitmap::is_set(&data_bitmap, rel);

			if !already_valid {
				match bitmap::first_free(&data_bitmap, super_.num_data) {
					Some(j) => {
						abs = super_.data_region_addr + j;
						*slot = abs as u32;
						bitmap::set(&mut data_bitmap, j);
					}
					None => break,
				}
			}

			let to_write = ((size - bytes_written) as usize).min(BLOCK_SIZE);
			block[..to_write]
				.copy_from_slice(&buffer[bytes_written as usize..bytes_written as usize + to_write]);
			self.disk.write_block(abs as u32, &block)?;
			bytes_written += to_write as i32;
		}

		inode.size = bytes_written;
		let blocks_used = inode.blocks_used();
		for slot in inode.direct.iter().skip(blocks_used) {
			let rel = *slot as i32 - super_.data_region_addr;
			if rel >= 0 && rel < super_.data_region_len {
				bitmap::clear(&mut data_bitmap, rel);
			}
		}

		inodes[inode_number as usize] = inode;
		self.write_inode_region(&super_, &inodes)?;
		self.write_data_bitmap(&super_, &data_bitmap)?;

		Ok(bytes_written)
	}

	/// Removes the entry `name` from the directory `parent`.
	///
	/// Absent names are not an error: the function returns `Ok(())` whether
	/// or not `name` existed.
	pub fn unlink(&mut self, parent: i32, name: &str) -> Result<(), Error> {
		let super_ = self.read_superblock()?;

		let mut parent_inode = self.stat(parent).map_err(|_| FsError::InvalidInode)?;
		if !parent_inode.is_dir() {
			return Err(FsError::InvalidType.into());
		}
		if parent_inode.size < 64 {
			return Err(FsError::InvalidInode.into());
		}
		if name.is_empty() || name.len() > DIR_ENT_NAME_SIZE {
			return Err(FsError::InvalidName.into());
		}
		if name == "." || name == ".." {
			return Err(FsError::UnlinkNotAllowed.into());
		}

		let dir_blocks = parent_inode.blocks_used();
		let mut buf = vec![0u8; dir_blocks * BLOCK_SIZE];
		for (i, slot) in parent_inode.direct.iter().take(dir_blocks).enumerate() {
			self.disk.read_block(*slot, &mut buf[i * BLOCK_SIZE..(i + 1) * BLOCK_SIZE])?;
		}

		let total_entries = parent_inode.size as usize / DIR_ENT_SIZE;
		let entry_idx = (0..total_entries)
			.find(|&i| inode::entry_at(&buf, i).name() == name.as_bytes());
		let Some(entry_idx) = entry_idx else {
			return Ok(());
		};

		let removed = inode::entry_at(&buf, entry_idx);
		let target_inode_number = removed.inum;
		let target = self.stat(target_inode_number).map_err(|_| FsError::InvalidInode)?;

		if target.is_dir() && target.size > 64 {
			return Err(FsError::DirNotEmpty.into());
		}

		for i in entry_idx..total_entries.saturating_sub(1) {
			let next = inode::entry_at(&buf, i + 1);
			inode::set_entry_at(&mut buf, i, &next);
		}

		let mut inode_bitmap = self.read_inode_bitmap(&super_)?;
		let mut data_bitmap = self.read_data_bitmap(&super_)?;

		let target_blocks = target.blocks_used();
		for slot in target.direct.iter().take(target_blocks) {
			let rel = *slot as i32 - super_.data_region_addr;
			bitmap::clear(&mut data_bitmap, rel);
		}
		bitmap::clear(&mut inode_bitmap, target_inode_number);

		let original_block_count = dir_blocks;
		parent_inode.size -= DIR_ENT_SIZE as i32;
		let new_block_count = parent_inode.blocks_used();
		if new_block_count < original_block_count {
			let rel = parent_inode.direct[original_block_count - 1] as i32 - super_.data_region_addr;
			bitmap::clear(&mut data_bitmap, rel);
		}

		for i in 0..new_block_count {
			self.disk
				.write_block(parent_inode.direct[i], &buf[i * BLOCK_SIZE..(i + 1) * BLOCK_SIZE])?;
		}

		let mut inodes = self.read_inode_region(&super_)?;
		inodes[parent as usize] = parent_inode;
		self.write_inode_region(&super_, &inodes)?;
		self.write_inode_bitmap(&super_, &inode_bitmap)?;
		self.write_data_bitmap(&super_, &data_bitmap)?;

		Ok(())
	}
}
