//! The tsukiwm binary.
//!
//! All configuration is compiled in through [`Config::default`].
//! Log verbosity is taken from `RUST_LOG` and defaults to `info`.

use std::process;

use tracing::{error, info};
use tracing_subscriber::{fmt as logger, EnvFilter};

use tsukiwm::{util, Config};

pub fn main() {
    // set up the logger
    logger::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        // don't use timestamps
        .without_time()
        // don't show source filename
        .with_file(false)
        // don't show source code line
        .with_line_number(false)
        .init();

    if let Err(e) = util::install_child_reaper() {
        error!("{}", e);
        process::exit(1);
    }

    let mut manager = match tsukiwm::x11rb_backed_wm(Config::default()) {
        Ok(wm) => wm,
        Err(e) => {
            error!("could not start: {}", e);
            process::exit(1);
        }
    };
    info!("started");

    if let Err(e) = manager.run() {
        error!("{}", e);
        process::exit(1);
    }
}
