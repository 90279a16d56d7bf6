// Copyright 2016-2022 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::process;

use log::LevelFilter;
use structopt::StructOpt;

use readmodel::cli;

fn main() {
    let opt = cli::Opt::from_args();
    let level = if opt.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    fern::Dispatch::new()
        .format(|out, message, record| out.finish(format_args!("[{}] {}", record.level(), message)))
        .level(level)
        .chain(std::io::stderr())
        .apply()
        .expect("failed to set up logging");

    if let Err(err) = cli::run(opt.command) {
        log::error!("{:#}", err);
        process::exit(1);
    }
}
