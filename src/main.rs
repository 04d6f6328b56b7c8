use std::process;

use epidemic::run_with_args;

fn main() {
    if let Err(error) = run_with_args() {
        eprintln!("{error}");
        process::exit(1);
    }
}
