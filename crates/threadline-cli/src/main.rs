//! threadline - threaded discussion CLI
//!
//! ## Quick Start
//!
//! ```bash
//! # Register a post and comment on it
//! threadline post register launch
//! threadline comment add launch "Congrats!" --as alice
//!
//! # Reply, like and read the thread
//! threadline comment add launch "Thanks" --as bob --reply-to <id>
//! threadline comment like <id> --as carol
//! threadline thread launch
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
