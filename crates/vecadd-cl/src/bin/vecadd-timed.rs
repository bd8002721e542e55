// 2025 Thomas Bicanic – MIT License
//
// vecadd-timed [vector_size]: Kernel aus Datei, Zufallseingaben, Zeitmessung.

use std::{io, process::ExitCode};
use vecadd_cl::{cli, runner};

fn main() -> ExitCode {
    let cfg = cli::parse_or_exit::<cli::TimedCli>().into_config();
    cli::init_logging();

    let stdout = io::stdout();
    cli::exit_code(runner::run(&cfg, &mut stdout.lock()))
}
