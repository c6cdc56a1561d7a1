use clap::Parser;

use gfonts_selfhost::{Args, Config, UnwrapOrDie};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = Config::from_args(&args).unwrap_or_die(|e| eprintln!("{e}"));
    gfonts_selfhost::run(&config).unwrap_or_die(|e| eprintln!("{e}"));
}
