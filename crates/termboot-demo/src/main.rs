#![forbid(unsafe_code)]

use std::process;

use termboot_demo::app::{self, App};
use termboot_demo::cli::Opts;
use termboot_demo::logging;

fn main() {
    let opts = Opts::parse();

    if let Some(path) = &opts.log_file
        && let Err(e) = logging::init_file_logging(path)
    {
        eprintln!("Failed to open log file {}: {e}", path.display());
    }

    let app = match App::new(&opts) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = app::run(app) {
        eprintln!("Runtime error: {e}");
        process::exit(1);
    }
}
