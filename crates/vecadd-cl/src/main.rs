// 2025 Thomas Bicanic – MIT License
//
// vecadd <vector_size>: eingebetteter Kernel, sequentielle Eingaben.

use std::{io, process::ExitCode};
use vecadd_cl::{cli, runner};

fn main() -> ExitCode {
    // Argumente zuerst: ohne gültige Größe keine Gerätearbeit
    let cfg = cli::parse_or_exit::<cli::AddCli>().into_config();
    cli::init_logging();

    let stdout = io::stdout();
    cli::exit_code(runner::run(&cfg, &mut stdout.lock()))
}
