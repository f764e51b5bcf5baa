//! `bits` prints the superblock's layout fields and the two allocation
//! bitmaps of a disk image.

use std::env;
use std::process::exit;
use ufs::disk::Disk;
use ufs::util::ceil_division;
use ufs::FileSystem;

struct Args {
	prog: String,
	image: Option<String>,
}

fn parse_args() -> Args {
	let mut iter = env::args();
	let prog = iter.next().unwrap_or_else(|| "bits".to_owned());
	let image = iter.next();
	Args { prog, image }
}

fn print_usage(prog: &str) {
	eprintln!("{}: bad usage", prog);
	eprintln!("Usage: {} <image>", prog);
}

fn main() {
	let args = parse_args();
	let Some(image) = args.image else {
		print_usage(&args.prog);
		exit(1);
	};

	let disk = match Disk::open(&image) {
		Ok(disk) => disk,
		Err(e) => {
			eprintln!("{}: cannot open {}: {}", args.prog, image, e);
			exit(1);
		}
	};
	let mut fs = FileSystem::new(disk);

	let super_ = match fs.read_superblock() {
		Ok(s) => s,
		Err(e) => {
			eprintln!("{}: {}: {}", args.prog, image, e);
			exit(1);
		}
	};

	println!("Super");
	println!("inode_region_addr {}", super_.inode_region_addr);
	println!("inode_region_len {}", super_.inode_region_len);
	println!("num_inodes {}", super_.num_inodes);
	println!("data_region_addr {}", super_.data_region_addr);
	println!("data_region_len {}", super_.data_region_len);
	println!("num_data {}", super_.num_data);
	println!();

	let inode_bitmap = match fs.read_inode_bitmap(&super_) {
		Ok(bm) => bm,
		Err(e) => {
			eprintln!("{}: {}: {}", args.prog, image, e);
			exit(1);
		}
	};
	let inode_bytes = ceil_division(super_.num_inodes as i64, 8) as usize;
	println!("Inode bitmap");
	print_bytes(&inode_bitmap[..inode_bytes]);
	println!();

	let data_bitmap = match fs.read_data_bitmap(&super_) {
		Ok(bm) => bm,
		Err(e) => {
			eprintln!("{}: {}: {}", args.prog, image, e);
			exit(1);
		}
	};
	let data_bytes = ceil_division(super_.num_data as i64, 8) as usize;
	println!("Data bitmap");
	print_bytes(&data_bitmap[..data_bytes]);
}

fn print_bytes(bytes: &[u8]) {
	let line: Vec<String> = bytes.iter().map(|b| b.to_string()).collect();
	println!("{}", line.join(" "));
}
