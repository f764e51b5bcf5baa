//! `cat` prints the allocated blocks and raw contents of a regular file.

use std::env;
use std::io::Write;
use std::process::exit;
use ufs::disk::Disk;
use ufs::error::Error;
use ufs::FileSystem;

struct Args {
	prog: String,
	image: Option<String>,
	inode: Option<i32>,
}

fn parse_args() -> Args {
	let mut iter = env::args();
	let prog = iter.next().unwrap_or_else(|| "cat".to_owned());
	let image = iter.next();
	let inode = iter.next().and_then(|s| s.parse().ok());
	Args { prog, image, inode }
}

fn print_usage(prog: &str) {
	eprintln!("{}: bad usage", prog);
	eprintln!("Usage: {} <image> <inode>", prog);
}

fn die(prog: &str, e: impl std::fmt::Display) -> ! {
	eprintln!("{}: {}", prog, e);
	exit(1);
}

fn main() {
	let args = parse_args();
	let (Some(image), Some(inode_number)) = (args.image.as_ref(), args.inode) else {
		print_usage(&args.prog);
		exit(1);
	};

	let disk = match Disk::open(image) {
		Ok(disk) => disk,
		Err(e) => die(&args.prog, e),
	};
	let mut fs = FileSystem::new(disk);

	let inode = match fs.stat(inode_number) {
		Ok(inode) => inode,
		Err(e) => die(&args.prog, e),
	};
	if inode.is_dir() {
		die(&args.prog, "not a regular file");
	}

	let super_ = match fs.read_superblock() {
		Ok(s) => s,
		Err(e) => die(&args.prog, Error::from(e)),
	};
	let data_bitmap = match fs.read_data_bitmap(&super_) {
		Ok(bm) => bm,
		Err(e) => die(&args.prog, Error::from(e)),
	};

	println!("File blocks");
	for i in 0..inode.blocks_used() {
		let abs = inode.direct[i] as i32;
		let rel = abs - super_.data_region_addr;
		let confirmed = rel >= 0 && rel < super_.data_region_len && ufs::bitmap::is_set(&data_bitmap, rel);
		if confirmed {
			println!("{}", abs);
		}
	}
	println!();

	let mut buf = vec![0u8; inode.size as usize];
	if let Err(e) = fs.read(inode_number, &mut buf, inode.size) {
		die(&args.prog, e);
	}

	println!("File data");
	if let Err(e) = std::io::stdout().write_all(&buf) {
		die(&args.prog, e);
	}
}
