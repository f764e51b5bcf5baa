//! The on-disk filesystem engine: layout decoding, block allocation, and
//! the six core operations the CLI tools drive.

pub mod bitmap;
pub mod disk;
pub mod error;
pub mod fs;
pub mod inode;
mod raw;
pub mod superblock;
pub mod util;

#[cfg(test)]
mod format;

pub use disk::Disk;
pub use error::Error;
pub use error::FsError;
pub use fs::FileSystem;
pub use inode::Inode;
pub use superblock::Superblock;

#[cfg(test)]
mod tests {
	use super::format::format;
	use crate::error::Error;
	use crate::error::FsError;
	use crate::inode::TYPE_DIRECTORY;
	use crate::inode::TYPE_REGULAR_FILE;

	fn temp_path(name: &str) -> std::path::PathBuf {
		let mut p = std::env::temp_dir();
		p.push(format!("ufs-test-{}-{}.img", std::process::id(), name));
		p
	}

	#[test]
	fn root_directory_exists_and_is_self_contained() {
		let path = temp_path("root");
		let mut fs = format(&path, 32, 32).unwrap();

		let root = fs.stat(0).unwrap();
		assert!(root.is_dir());
		assert_eq!(root.size, 64);

		assert_eq!(fs.lookup(0, ".").unwrap(), 0);
		assert_eq!(fs.lookup(0, "..").unwrap(), 0);

		std::fs::remove_file(path).ok();
	}

	#[test]
	fn stat_rejects_out_of_range_and_unallocated_inodes() {
		let path = temp_path("stat-range");
		let mut fs = format(&path, 8, 8).unwrap();

		assert_eq!(fs.stat(-1).unwrap_err().code(), FsError::InvalidInode.code());
		assert_eq!(fs.stat(8).unwrap_err().code(), FsError::InvalidInode.code());
		assert_eq!(fs.stat(1).unwrap_err().code(), FsError::InvalidInode.code());

		std::fs::remove_file(path).ok();
	}

	#[test]
	fn create_then_lookup_round_trips() {
		let path = temp_path("create-lookup");
		let mut fs = format(&path, 16, 16).unwrap();

		let file = fs.create(0, TYPE_REGULAR_FILE, "hello.txt").unwrap();
		assert_eq!(fs.lookup(0, "hello.txt").unwrap(), file);

		let dir = fs.create(0, TYPE_DIRECTORY, "sub").unwrap();
		assert_eq!(fs.lookup(0, "sub").unwrap(), dir);
		assert_eq!(fs.lookup(dir, "..").unwrap(), 0);
	}

	#[test]
	fn create_is_idempotent_for_matching_type() {
		let path = temp_path("create-idempotent");
		let mut fs = format(&path, 16, 16).unwrap();

		let a = fs.create(0, TYPE_REGULAR_FILE, "x").unwrap();
		let b = fs.create(0, TYPE_REGULAR_FILE, "x").unwrap();
		assert_eq!(a, b);
	}

	#[test]
	fn create_rejects_mismatched_type_on_existing_name() {
		let path = temp_path("create-mismatch");
		let mut fs = format(&path, 16, 16).unwrap();

		fs.create(0, TYPE_REGULAR_FILE, "x").unwrap();
		let err = fs.create(0, TYPE_DIRECTORY, "x").unwrap_err();
		assert_eq!(err.code(), FsError::InvalidType.code());
	}

	#[test]
	fn write_then_read_round_trips_and_truncates_extra_blocks() {
		let path = temp_path("write-read");
		let mut fs = format(&path, 16, 16).unwrap();
		let file = fs.create(0, TYPE_REGULAR_FILE, "data").unwrap();

		let payload = vec![0xABu8; 9000];
		let n = fs.write(file, &payload, payload.len() as i32).unwrap();
		assert_eq!(n, 9000);

		let mut buf = vec![0u8; 9000];
		let read_n = fs.read(file, &mut buf, 9000).unwrap();
		assert_eq!(read_n, 9000);
		assert_eq!(buf, payload);

		let shrunk = fs.write(file, &[1, 2, 3], 3).unwrap();
		assert_eq!(shrunk, 3);
		let stat = fs.stat(file).unwrap();
		assert_eq!(stat.size, 3);
		assert_eq!(stat.blocks_used(), 1);
	}

	#[test]
	fn write_oversized_payload_clamps_to_max_file_size() {
		let path = temp_path("write-oversized");
		let mut fs = format(&path, 8, 40).unwrap();
		let file = fs.create(0, TYPE_REGULAR_FILE, "big").unwrap();

		let payload = vec![7u8; crate::inode::MAX_FILE_SIZE as usize + 4096];
		let n = fs.write(file, &payload, payload.len() as i32).unwrap();
		assert_eq!(n as i64, crate::inode::MAX_FILE_SIZE);
	}

	#[test]
	fn write_stops_when_data_region_is_exhausted() {
		let path = temp_path("write-no-space");
		let mut fs = format(&path, 8, 2).unwrap();
		let file = fs.create(0, TYPE_REGULAR_FILE, "small").unwrap();

		let payload = vec![9u8; 4096 * 4];
		let n = fs.write(file, &payload, payload.len() as i32).unwrap();
		assert!(n < payload.len() as i32);
		assert!(n > 0);
	}

	#[test]
	fn write_rejects_negative_size_and_directories() {
		let path = temp_path("write-reject");
		let mut fs = format(&path, 8, 8).unwrap();
		let dir = fs.create(0, TYPE_DIRECTORY, "d").unwrap();

		let err = fs.write(dir, &[1], 1).unwrap_err();
		assert_eq!(err.code(), FsError::InvalidType.code());

		let file = fs.create(0, TYPE_REGULAR_FILE, "f").unwrap();
		let err = fs.write(file, &[1], -1).unwrap_err();
		assert_eq!(err.code(), FsError::InvalidSize.code());
	}

	#[test]
	fn unlink_removes_entry_and_frees_inode_and_blocks() {
		let path = temp_path("unlink-basic");
		let mut fs = format(&path, 8, 8).unwrap();
		let file = fs.create(0, TYPE_REGULAR_FILE, "gone").unwrap();
		fs.write(file, &[1, 2, 3, 4], 4).unwrap();

		fs.unlink(0, "gone").unwrap();
		assert_eq!(fs.lookup(0, "gone").unwrap_err().code(), FsError::NotFound.code());
		assert_eq!(fs.stat(file).unwrap_err().code(), FsError::InvalidInode.code());
	}

	#[test]
	fn unlink_missing_name_is_success() {
		let path = temp_path("unlink-missing");
		let mut fs = format(&path, 8, 8).unwrap();
		fs.unlink(0, "nope").unwrap();
	}

	#[test]
	fn unlink_refuses_dot_and_dotdot() {
		let path = temp_path("unlink-dotdot");
		let mut fs = format(&path, 8, 8).unwrap();

		assert_eq!(fs.unlink(0, ".").unwrap_err().code(), FsError::UnlinkNotAllowed.code());
		assert_eq!(fs.unlink(0, "..").unwrap_err().code(), FsError::UnlinkNotAllowed.code());
	}

	#[test]
	fn unlink_refuses_nonempty_directory() {
		let path = temp_path("unlink-nonempty");
		let mut fs = format(&path, 8, 8).unwrap();
		fs.create(0, TYPE_DIRECTORY, "d").unwrap();
		fs.create(fs.lookup(0, "d").unwrap(), TYPE_REGULAR_FILE, "child")
			.unwrap();

		let err = fs.unlink(0, "d").unwrap_err();
		assert_eq!(err.code(), FsError::DirNotEmpty.code());
	}

	#[test]
	fn unlink_compacts_directory_entries() {
		let path = temp_path("unlink-compact");
		let mut fs = format(&path, 8, 8).unwrap();
		fs.create(0, TYPE_REGULAR_FILE, "a").unwrap();
		let b = fs.create(0, TYPE_REGULAR_FILE, "b").unwrap();
		fs.create(0, TYPE_REGULAR_FILE, "c").unwrap();

		fs.unlink(0, "a").unwrap();

		assert_eq!(fs.lookup(0, "b").unwrap(), b);
		assert_eq!(fs.lookup(0, "c").is_ok(), true);
		assert_eq!(fs.stat(0).unwrap().size, 4 * crate::inode::DIR_ENT_SIZE as i32);
	}

	#[test]
	fn create_rejects_invalid_names() {
		let path = temp_path("create-names");
		let mut fs = format(&path, 8, 8).unwrap();

		let err = fs.create(0, TYPE_REGULAR_FILE, "").unwrap_err();
		assert_eq!(err.code(), FsError::InvalidName.code());

		let long_name = "x".repeat(29);
		let err = fs.create(0, TYPE_REGULAR_FILE, &long_name).unwrap_err();
		assert_eq!(err.code(), FsError::InvalidName.code());
	}

	#[test]
	fn error_codes_are_stable() {
		assert_eq!(FsError::InvalidInode.code(), -1);
		assert_eq!(FsError::InvalidType.code(), -2);
		assert_eq!(FsError::InvalidName.code(), -3);
		assert_eq!(FsError::InvalidSize.code(), -4);
		assert_eq!(FsError::NotEnoughSpace.code(), -5);
		assert_eq!(FsError::DirNotEmpty.code(), -6);
		assert_eq!(FsError::UnlinkNotAllowed.code(), -7);
		assert_eq!(FsError::NotFound.code(), -8);
	}

	trait ErrCode {
		fn code(&self) -> i32;
	}

	impl ErrCode for Error {
		fn code(&self) -> i32 {
			match self {
				Error::Fs(e) => e.code(),
				Error::Io(_) => panic!("unexpected io error in test"),
			}
		}
	}
}
