use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::{fs, process};

use clap::Parser;
use nestkv_cli::{App, Command, RunOptions};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let app = App::parse();
    match &app.command {
        Command::Run(args) => run(args),
        Command::Generate(args) => generate(args),
        Command::Verify(args) => verify(args),
        Command::Fmt(args) => fmt(args),
    }
}

fn run(args: &nestkv_cli::RunArgs) {
    let options = RunOptions::from(args);
    let stdout = io::stdout().lock();

    let result = match &args.input {
        Some(path) => {
            let file = fs::File::open(path).unwrap_or_else(|e| {
                eprintln!("Failed to open {}: {e}", path.display());
                process::exit(1);
            });
            nestkv_cli::run_session(BufReader::new(file), stdout, options)
        }
        None => nestkv_cli::run_session(io::stdin().lock(), stdout, options),
    };

    if let Err(e) = result {
        eprintln!("I/O error: {e}");
        process::exit(1);
    }
}

fn generate(args: &nestkv_cli::GenerateArgs) {
    if args.n_variable == 0 || args.n_value == 0 {
        eprintln!("--n-variable and --n-value must be at least 1");
        process::exit(1);
    }

    fs::create_dir_all(&args.output_dir).unwrap_or_else(|e| {
        eprintln!("Failed to create output directory: {e}");
        process::exit(1);
    });

    let scripts = nestkv_testgen::generate_mult_scripts(
        args.n_script,
        args.n_command,
        args.n_variable,
        args.n_value,
        args.max_depth,
    );

    for script in &scripts {
        let path = args.output_dir.join(format!("{}.json", script.get_id()));
        let file = fs::File::create(&path).unwrap_or_else(|e| {
            eprintln!("Failed to create {}: {e}", path.display());
            process::exit(1);
        });
        serde_json::to_writer_pretty(file, script).unwrap_or_else(|e| {
            eprintln!("Failed to write {}: {e}", path.display());
            process::exit(1);
        });
    }

    println!(
        "Generated {} scripts to {}",
        scripts.len(),
        args.output_dir.display()
    );
}

fn verify(args: &nestkv_cli::VerifyArgs) {
    let mut any_failed = false;

    let mut entries: Vec<_> = fs::read_dir(&args.input_dir)
        .unwrap_or_else(|e| {
            eprintln!("Failed to read input directory: {e}");
            process::exit(1);
        })
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
        .collect();

    entries.sort_by_key(fs::DirEntry::path);

    if entries.is_empty() {
        eprintln!("No .json files found in {}", args.input_dir.display());
        process::exit(1);
    }

    for entry in entries {
        let path = entry.path();
        let filename = path.file_name().unwrap_or_default().to_string_lossy();

        let file = fs::File::open(&path).unwrap_or_else(|e| {
            eprintln!("Failed to open {filename}: {e}");
            process::exit(1);
        });

        let script: nestkv_testgen::Script = serde_json::from_reader(BufReader::new(file))
            .unwrap_or_else(|e| {
                eprintln!("Failed to parse {filename}: {e}");
                process::exit(1);
            });

        match script.verify() {
            Ok(()) => {
                if args.json {
                    let result = serde_json::json!({
                        "file": filename,
                        "ok": true,
                        "commands": script.get_commands().len(),
                    });
                    println!("{result}");
                } else {
                    println!("{filename}: PASS");
                }
            }
            Err(mismatch) => {
                any_failed = true;
                if args.json {
                    let result = serde_json::json!({
                        "file": filename,
                        "ok": false,
                        "mismatch": mismatch,
                    });
                    println!("{result}");
                } else if args.verbose {
                    println!("{filename}: FAIL");
                    println!("  at command {}: {}", mismatch.index, mismatch.command);
                    println!("  expected: {:?}", mismatch.expected);
                    println!("  actual:   {:?}", mismatch.actual);
                } else {
                    println!("{filename}: FAIL (command {})", mismatch.index);
                }
            }
        }
    }

    if any_failed {
        process::exit(1);
    }
}

/// Expand directories to the `.kv` files directly inside them.
fn script_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut inner: Vec<_> = fs::read_dir(path)
                .unwrap_or_else(|e| {
                    eprintln!("Failed to read {}: {e}", path.display());
                    process::exit(1);
                })
                .filter_map(Result::ok)
                .map(|e| e.path())
                .filter(|p| p.extension().is_some_and(|ext| ext == "kv"))
                .collect();
            inner.sort();
            files.extend(inner);
        } else {
            files.push(path.clone());
        }
    }
    files
}

fn fmt(args: &nestkv_cli::FmtArgs) {
    let mut unformatted = false;

    for path in script_files(&args.paths) {
        let input = read_to_string(&path);
        if nestkv_parser::is_formatted(&input) {
            continue;
        }
        if args.check {
            println!("would reformat {}", path.display());
            unformatted = true;
        } else {
            fs::write(&path, nestkv_parser::format_script(&input)).unwrap_or_else(|e| {
                eprintln!("Failed to write {}: {e}", path.display());
                process::exit(1);
            });
            println!("formatted {}", path.display());
        }
    }

    if unformatted {
        process::exit(1);
    }
}

fn read_to_string(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Failed to read {}: {e}", path.display());
        process::exit(1);
    })
}
