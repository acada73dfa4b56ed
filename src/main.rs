mod cli;
mod config;
mod emit;
mod git;
mod resolver;
#[cfg(test)]
mod testutil;
mod version;

use std::process;

fn main() {
    let matches = cli::build_cli().get_matches();

    if let Err(err) = cli::run(&matches) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}
