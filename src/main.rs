// Park Admission Simulator - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/park-admission-simulator
// ```
//
// Or with an explicit capacity limit:
//
// ```console
// $ ./target/release/park-admission-simulator 200
// ```

use clap::Parser;
use park_admission_simulator::simulation::{LoggingConfig, Simulation, SimulationReport};
use park_admission_simulator::types::{CliArgs, SimulationConfig};
use std::process;
use tracing::{error, info, Level};

fn main() {
    let args = CliArgs::parse();

    // Diagnostics stay on stderr at WARN unless RUST_LOG overrides; the
    // event and report lines below go to stdout untouched.
    if let Err(e) = LoggingConfig::new().with_level(Level::WARN).init() {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    let config = SimulationConfig::from_cli_args(args);

    // Validate before any worker thread is started.
    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    info!(capacity = config.capacity, "starting park admission simulator");

    let simulation = match Simulation::new(config) {
        Ok(simulation) => simulation,
        Err(e) => {
            error!("Failed to initialize simulation: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    match simulation.run() {
        Ok(report) => print_final_report(&report),
        Err(e) => {
            error!("Simulation failed: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Print the shutdown report: one line per door with the visitors still waiting
fn print_final_report(report: &SimulationReport) {
    for line in report.waiting_report_lines() {
        println!("{}", line);
    }
    info!(
        admitted = report.total_admitted,
        waiting = report.total_waiting(),
        "park admission simulator completed"
    );
}
