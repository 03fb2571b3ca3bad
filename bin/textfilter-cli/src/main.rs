mod cli;
mod logging;
mod service;

use clap::Parser;

fn main() {
    if let Err(e) = cli::Root::parse().run() {
        // Downstream closed stdout, nothing left to print.
        if cli::is_broken_pipe(&e) {
            return;
        }
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
