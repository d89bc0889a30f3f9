// Standalone replay tool for decision logs
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]
//
// Options:
//   --all                    Replay every logged decision
//   --entries <s1,s2>        Replay specific sequence numbers (comma-separated)
//   --validate <s:M|M,...>   Check logged moves against expectations
//   --verbose                Show detailed output for each decision
//   --config <path>          Path to Toroid.toml (default: Toroid.toml)

use std::env;
use std::process;

use toroid_bot::config::Config;
use toroid_bot::moves::Move;
use toroid_bot::replay::ReplayEngine;

fn print_usage() {
    eprintln!("Decision Log Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --all                   Replay every decision in the log");
    eprintln!("  --entries <S1,S2,...>   Replay specific sequence numbers (comma-separated)");
    eprintln!("  --validate <S:M,...>    Validate logged moves (format: sequence:move|move,...)");
    eprintln!("  --verbose               Show detailed output for each decision");
    eprintln!("  --config <path>         Path to Toroid.toml (default: Toroid.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  replay toroid_decisions.jsonl --all");
    eprintln!("  replay toroid_decisions.jsonl --entries 5,10,15 --verbose");
    eprintln!("  replay toroid_decisions.jsonl --validate 5:L|LU,10:R");
}

fn parse_sequences(s: &str) -> Result<Vec<u64>, String> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<u64>()
                .map_err(|e| format!("Invalid sequence number '{}': {}", t, e))
        })
        .collect()
}

fn parse_expected_moves(s: &str) -> Result<Vec<(u64, Vec<Move>)>, String> {
    s.split(',')
        .map(|pair| {
            let (sequence, moves) = pair
                .trim()
                .split_once(':')
                .ok_or_else(|| format!("Invalid format '{}'. Expected 'sequence:move'", pair))?;

            let sequence = sequence
                .parse::<u64>()
                .map_err(|e| format!("Invalid sequence number '{}': {}", sequence, e))?;

            // Several acceptable moves separated by '|'
            let moves = moves
                .split('|')
                .map(|m| m.parse::<Move>().map_err(|e| e.to_string()))
                .collect::<Result<Vec<_>, String>>()?;

            Ok((sequence, moves))
        })
        .collect()
}

enum Mode {
    All,
    Entries(String),
    Validate(String),
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.iter().any(|a| a == "--help") {
        print_usage();
        process::exit(if args.iter().any(|a| a == "--help") { 0 } else { 1 });
    }

    let log_file = &args[1];
    let mut config_path = "Toroid.toml".to_string();
    let mut verbose = false;
    let mut mode = None;

    let mut rest = args[2..].iter();
    while let Some(arg) = rest.next() {
        let mut value = |name: &str| -> String {
            rest.next().cloned().unwrap_or_else(|| {
                eprintln!("Error: {} requires an argument", name);
                process::exit(1);
            })
        };

        match arg.as_str() {
            "--all" => mode = Some(Mode::All),
            "--entries" => mode = Some(Mode::Entries(value("--entries"))),
            "--validate" => mode = Some(Mode::Validate(value("--validate"))),
            "--config" => config_path = value("--config"),
            "--verbose" => verbose = true,
            other => {
                eprintln!("Error: Unknown option '{}'", other);
                print_usage();
                process::exit(1);
            }
        }
    }

    let Some(mode) = mode else {
        eprintln!("Error: Must specify --all, --entries, or --validate");
        print_usage();
        process::exit(1);
    };

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    println!("Loaded configuration from: {}", config_path);
    println!("Replay log file: {}", log_file);
    println!();

    let engine = ReplayEngine::new(config, verbose);

    let entries = match engine.load_log_file(log_file) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error loading log file: {}", e);
            process::exit(1);
        }
    };

    if entries.is_empty() {
        eprintln!("Error: Log file is empty");
        process::exit(1);
    }

    println!("Loaded {} log entries\n", entries.len());

    match mode {
        Mode::All => {
            println!("Replaying all {} decisions...\n", entries.len());
            let results = engine.replay_all(&entries);
            engine.print_report(&results);
        }
        Mode::Entries(arg) => {
            let sequences = parse_sequences(&arg).unwrap_or_else(|e| {
                eprintln!("Error parsing entries: {}", e);
                process::exit(1);
            });

            println!("Replaying {} specific decision(s)...\n", sequences.len());
            match engine.replay_sequences(&entries, &sequences) {
                Ok(results) => engine.print_report(&results),
                Err(e) => {
                    eprintln!("Error during replay: {}", e);
                    process::exit(1);
                }
            }
        }
        Mode::Validate(arg) => {
            let expected_moves = parse_expected_moves(&arg).unwrap_or_else(|e| {
                eprintln!("Error parsing expected moves: {}", e);
                process::exit(1);
            });

            println!("Validating {} expected move(s)...\n", expected_moves.len());
            match engine.validate_expected_moves(&entries, &expected_moves) {
                Ok(()) => println!("✓ All expected moves validated successfully!"),
                Err(e) => {
                    eprintln!("✗ Validation failed: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}
