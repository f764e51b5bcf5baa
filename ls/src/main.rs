//! `ls` resolves a `/`-delimited path from the root and lists it.

use std::env;
use std::process::exit;
use ufs::disk::Disk;
use ufs::inode;
use ufs::FileSystem;

struct Args {
	prog: String,
	image: Option<String>,
	path: Option<String>,
}

fn parse_args() -> Args {
	let mut iter = env::args();
	let prog = iter.next().unwrap_or_else(|| "ls".to_owned());
	let image = iter.next();
	let path = iter.next();
	Args { prog, image, path }
}

fn print_usage(prog: &str) {
	eprintln!("{}: bad usage", prog);
	eprintln!("Usage: {} <image> <path>", prog);
}

fn die(prog: &str, e: impl std::fmt::Display) -> ! {
	eprintln!("{}: {}", prog, e);
	exit(1);
}

/// Resolves a `/`-delimited path from the root (inode 0), returning the
/// target's inode number and the last path component's name.
fn resolve(fs: &mut FileSystem, path: &str) -> Result<(i32, String), ufs::error::Error> {
	let mut current = 0i32;
	let mut name = ".".to_owned();

	for component in path.split('/').filter(|c| !c.is_empty()) {
		current = fs.lookup(current, component)?;
		name = component.to_owned();
	}
	Ok((current, name))
}

fn main() {
	let args = parse_args();
	let (Some(image), Some(path)) = (args.image.as_ref(), args.path.as_ref()) else {
		print_usage(&args.prog);
		exit(1);
	};

	let disk = match Disk::open(image) {
		Ok(disk) => disk,
		Err(e) => die(&args.prog, e),
	};
	let mut fs = FileSystem::new(disk);

	let (target, name) = match resolve(&mut fs, path) {
		Ok(r) => r,
		Err(e) => die(&args.prog, e),
	};

	let stat = match fs.stat(target) {
		Ok(s) => s,
		Err(e) => die(&args.prog, e),
	};

	if !stat.is_dir() {
		println!("{}\t{}", target, name);
		return;
	}

	let mut buf = vec![0u8; stat.size as usize];
	if let Err(e) = fs.read(target, &mut buf, stat.size) {
		die(&args.prog, e);
	}

	let count = stat.size as usize / inode::DIR_ENT_SIZE;
	let mut entries: Vec<(String, i32)> = (0..count)
		.map(|i| {
			let entry = inode::entry_at(&buf, i);
			(String::from_utf8_lossy(entry.name()).into_owned(), entry.inum)
		})
		.collect();
	entries.sort_by(|a, b| a.0.cmp(&b.0));

	for (name, inum) in entries {
		println!("{}\t{}", inum, name);
	}
}
