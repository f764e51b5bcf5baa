//! `cp` copies a host file's contents into an inode already present in the
//! image.

use std::env;
use std::process::exit;
use ufs::disk::Disk;
use ufs::FileSystem;

struct Args {
	prog: String,
	image: Option<String>,
	src: Option<String>,
	dst_inode: Option<i32>,
}

fn parse_args() -> Args {
	let mut iter = env::args();
	let prog = iter.next().unwrap_or_else(|| "cp".to_owned());
	let image = iter.next();
	let src = iter.next();
	let dst_inode = iter.next().and_then(|s| s.parse().ok());
	Args { prog, image, src, dst_inode }
}

fn print_usage(prog: &str) {
	eprintln!("{}: bad usage", prog);
	eprintln!("Usage: {} <image> <src_path> <dst_inode>", prog);
}

fn die(prog: &str, e: impl std::fmt::Display) -> ! {
	eprintln!("{}: {}", prog, e);
	exit(1);
}

fn main() {
	let args = parse_args();
	let (Some(image), Some(src), Some(dst_inode)) =
		(args.image.as_ref(), args.src.as_ref(), args.dst_inode)
	else {
		print_usage(&args.prog);
		exit(1);
	};

	let data = match std::fs::read(src) {
		Ok(data) => data,
		Err(e) => die(&args.prog, e),
	};

	let disk = match Disk::open(image) {
		Ok(disk) => disk,
		Err(e) => die(&args.prog, e),
	};
	let mut fs = FileSystem::new(disk);

	if let Err(e) = fs.write(dst_inode, &data, data.len() as i32) {
		die(&args.prog, e);
	}
}
