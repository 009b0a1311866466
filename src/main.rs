mod app;
mod cli;

use mkvconv::engine::{DEBUG_LOG_FILE, init_logging};
use std::path::Path;

fn main() {
    let cli = cli::parse();

    if let Err(e) = init_logging(Path::new(DEBUG_LOG_FILE), cli.verbose) {
        eprintln!("Warning: logging disabled: {:#}", e);
    }

    app::run(cli);
}
