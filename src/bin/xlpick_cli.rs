//! CLI tool for xlpick - runs the upload observer over a file on disk
//!
//! Usage:
//!   xlpick_cli <workbook>                  # Print the upload report as JSON
//!   xlpick_cli <workbook> --visible-only   # Leave hidden sheets out

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::rc::Rc;
use xlpick::{LogReporter, MemoryUrls, SelectedFile, UploadObserver, UploadOptions};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: xlpick_cli <workbook> [--visible-only]");
        std::process::exit(1);
    }

    let input_path = &args[1];
    let options = UploadOptions {
        include_hidden: !args[2..].iter().any(|a| a == "--visible-only"),
        ..UploadOptions::default()
    };

    // Read input file
    let data = match fs::read(input_path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    let name = Path::new(input_path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input_path.clone());
    let file = SelectedFile::new(name, "application/octet-stream", data);

    let mut observer = UploadObserver::new(Rc::new(MemoryUrls::default()), LogReporter, options);
    let report = match observer.handle(vec![file]) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let json = match serde_json::to_string_pretty(&report) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    };

    io::stdout().write_all(json.as_bytes()).unwrap();
    println!();
}
