//! fiscal-tracker - Municipal fiscal incentive tracker CLI
//!
//! Command-line front-end for the SEMDEC incentive API.
//!
//! ## Quick Start
//!
//! ```bash
//! # Log in to the backend
//! fiscal-tracker login admin
//!
//! # List companies, filtered
//! fiscal-tracker empresas --setor Tecnologia --porte ME
//!
//! # Export the filtered list as CSV
//! fiscal-tracker export --setor Tecnologia --output-dir reports/
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
