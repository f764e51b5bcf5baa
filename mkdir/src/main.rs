//! `mkdir` creates a directory entry under a parent inode.

use std::env;
use std::process::exit;
use ufs::disk::Disk;
use ufs::inode::TYPE_DIRECTORY;
use ufs::FileSystem;

struct Args {
	prog: String,
	image: Option<String>,
	parent: Option<i32>,
	name: Option<String>,
}

fn parse_args() -> Args {
	let mut iter = env::args();
	let prog = iter.next().unwrap_or_else(|| "mkdir".to_owned());
	let image = iter.next();
	let parent = iter.next().and_then(|s| s.parse().ok());
	let name = iter.next();
	Args { prog, image, parent, name }
}

fn print_usage(prog: &str) {
	eprintln!("{}: bad usage", prog);
	eprintln!("Usage: {} <image> <parent_inode> <name>", prog);
}

fn die(prog: &str, e: impl std::fmt::Display) -> ! {
	eprintln!("{}: {}", prog, e);
	exit(1);
}

fn main() {
	let args = parse_args();
	let (Some(image), Some(parent), Some(name)) =
		(args.image.as_ref(), args.parent, args.name.as_ref())
	else {
		print_usage(&args.prog);
		exit(1);
	};

	let disk = match Disk::open(image) {
		Ok(disk) => disk,
		Err(e) => die(&args.prog, e),
	};
	let mut fs = FileSystem::new(disk);

	match fs.create(parent, TYPE_DIRECTORY, name) {
		Ok(_) => {}
		Err(e) => die(&args.prog, e),
	}
}
