use std::env;
use std::io::{self, Read};
use std::path::Path;

use chrono::Local;
use ingest::{IngestOptions, load_payload, parse_payload};
use mileage_core::{Period, compute_snapshot};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("usage: ingest_cli <path|->");
        std::process::exit(2);
    }

    let path = &args[1];
    let data = if path == "-" {
        let mut data = String::new();
        io::stdin().read_to_string(&mut data).unwrap_or_else(|err| {
            eprintln!("failed to read stdin: {}", err);
            std::process::exit(1);
        });
        data
    } else {
        load_payload(Path::new(path)).unwrap_or_else(|err| {
            eprintln!("failed to read {}: {}", path, err);
            std::process::exit(1);
        })
    };

    let parsed = parse_payload(&data, &IngestOptions::default()).unwrap_or_else(|err| {
        eprintln!("failed to parse payload: {}", err);
        std::process::exit(3);
    });

    println!("rows_scanned {}", parsed.stats.rows_scanned);
    println!("rows_skipped {}", parsed.stats.rows_skipped);
    println!("records_parsed {}", parsed.stats.records_parsed);
    println!("payload_sha256 {}", parsed.stats.payload_sha256);
    for issue in &parsed.stats.issues {
        println!("issue row={} {}", issue.row, issue.message);
    }

    match compute_snapshot(&parsed.records, Period::AllTime, &Local::now()) {
        Some(snapshot) => {
            println!("total_fuel_cost {:.2}", snapshot.total_fuel_cost);
            println!("total_miles {:.0}", snapshot.total_miles);
            println!("avg_mpg {:.1}", snapshot.avg_mpg);
            println!("avg_cost_per_gallon {:.2}", snapshot.avg_cost_per_gallon);
        }
        None => {
            eprintln!("no fill-ups found");
            std::process::exit(4);
        }
    }
}
