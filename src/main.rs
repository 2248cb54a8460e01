use std::{io, process};

use clap::Parser;
use log::{error, LevelFilter};
use sql2gorm::{
    cli::{Args, CliApp},
    util::SimpleLogger,
};

static LOGGER: SimpleLogger = SimpleLogger;

fn main() {
    let args = Args::parse();

    if let Err(e) = log::set_logger(&LOGGER) {
        eprintln!("failed to install logger: {}", e);
    }
    log::set_max_level(LevelFilter::Info);

    let result = CliApp::from_args(&args, io::stdout()).and_then(|mut app| {
        let level = if args.verbose {
            LevelFilter::Debug
        } else {
            app.config().level_filter()?
        };
        log::set_max_level(level);
        app.run()
    });

    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}
