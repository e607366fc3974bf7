use std::path::PathBuf;
use std::process;

use scmap_tool::commands::{self, ToolError};

fn usage() {
    eprintln!("Usage: scmap-tool <COMMAND>");
    eprintln!("  info <map.scmap> [--json <path>]   Print a summary, optionally save it as JSON");
    eprintln!("  create <args.ron> <out.scmap>      Create a blank map from map args");
    eprintln!("  roundtrip <map.scmap>              Load, save and reload, comparing sections");
    eprintln!("  preview <map.scmap> <out.dds>      Extract the preview image");
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        usage();
        process::exit(1);
    };

    let mut positional: Vec<PathBuf> = Vec::new();
    let mut json_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--json" => {
                i += 1;
                let Some(path) = args.get(i) else {
                    eprintln!("--json needs a path");
                    process::exit(1);
                };
                json_path = Some(PathBuf::from(path));
            }
            "--help" | "-h" => {
                usage();
                process::exit(0);
            }
            other if other.starts_with("--") => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
            other => positional.push(PathBuf::from(other)),
        }
        i += 1;
    }

    let result: Result<(), ToolError> = match (command.as_str(), positional.as_slice()) {
        ("info", [map]) => commands::info(map, json_path.as_deref()),
        ("create", [args, out]) => commands::create(args, out),
        ("roundtrip", [map]) => commands::roundtrip(map),
        ("preview", [map, out]) => commands::preview(map, out),
        ("--help" | "-h", _) => {
            usage();
            return;
        }
        _ => {
            usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        log::error!("{e}");
        process::exit(1);
    }
}
