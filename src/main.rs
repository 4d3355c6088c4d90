use anchor_words::Run;
use log::error;
use std::process;

fn main() {
    anchor_words::init();

    if let Err(e) = Run::run() {
        error!("{}", e);
        process::exit(1);
    }
}
