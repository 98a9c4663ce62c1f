//! loan-amortization CLI
//!
//! # Usage
//!
//! ```bash
//! # Amortize a loan described by a JSON form
//! loan-amortization calc --input loan.json
//!
//! # Output as JSON
//! loan-amortization calc --input loan.json --format json
//!
//! # Show more fraction digits
//! loan-amortization calc --input loan.json --config engine.json
//! ```

use std::fs;
use std::process;

use log::{debug, error};
use loan_amortization_rs::{AmortizationEngine, AmortizationReport, EngineConfig, LoanError, LoanForm};

fn print_usage() {
    eprintln!(
        r#"loan-amortization: fixed-rate loan amortization schedules

USAGE:
    loan-amortization <COMMAND> [OPTIONS]

COMMANDS:
    calc        Compute the payment, totals and schedule for a loan
    help        Show this message

OPTIONS (calc):
    --input <FILE>      Path to JSON loan form
    --format <FORMAT>   Output format: text (default) or json
    --config <FILE>     Path to JSON engine settings

ENVIRONMENT:
    RUST_LOG            Log filter, e.g. RUST_LOG=debug

EXAMPLES:
    loan-amortization calc --input loan.json
    loan-amortization calc --input loan.json --format json"#
    );
}

fn read_file(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    })
}

fn load_form(path: &str) -> LoanForm {
    serde_json::from_str(&read_file(path)).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "loanBalance": "250000",
  "interestRate": "5",
  "downPayment": "25000",
  "arrangementFeeRate": "1",
  "propertyInsuranceRate": "0.5",
  "loanTerm": {{ "years": "30", "months": "0" }},
  "paymentFrequency": "Monthly",
  "firstPaymentDate": "2025-01-01"
}}"#
        );
        process::exit(1);
    })
}

fn load_config(path: Option<&str>) -> EngineConfig {
    match path {
        Some(path) => serde_json::from_str(&read_file(path)).unwrap_or_else(|e| {
            eprintln!("Error parsing config '{}': {}", path, e);
            process::exit(1);
        }),
        None => EngineConfig::default(),
    }
}

fn cmd_calc(args: &[String]) {
    let mut input_path = None;
    let mut config_path = None;
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--config" => {
                i += 1;
                config_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--config requires a file path");
                    process::exit(1);
                }));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    if format != "text" && format != "json" {
        eprintln!("Unknown format '{}': expected 'text' or 'json'", format);
        process::exit(1);
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let form = load_form(&path);
    let config = load_config(config_path.as_deref());
    debug!("loaded form from {} with {:?}", path, config);

    let input = form.to_input().unwrap_or_else(|errors| {
        eprintln!("Invalid loan details:");
        for (field, message) in errors.iter() {
            eprintln!("  {}: {}", field, message);
        }
        process::exit(1);
    });

    let result = match AmortizationEngine::new(config).calculate(input.clone()) {
        Ok(result) => result,
        Err(LoanError::Validation(errors)) => {
            eprintln!("Invalid loan details: {}", errors);
            process::exit(1);
        }
        Err(err) => {
            if let LoanError::Computation { reason } = &err {
                error!("calculation failed: {}", reason);
            }
            eprintln!("{}", err);
            process::exit(2);
        }
    };

    let report = AmortizationReport::new(&input, &result);

    if format == "json" {
        match report.to_json_pretty() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error writing JSON: {}", e);
                process::exit(1);
            }
        }
    } else {
        print!("{}", report.render_text());
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("calc") => cmd_calc(&args[1..]),
        Some("help") | Some("--help") | Some("-h") | None => print_usage(),
        Some(other) => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            process::exit(1);
        }
    }
}
