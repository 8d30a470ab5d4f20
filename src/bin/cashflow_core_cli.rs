use std::{env, process};

use cashflow_core::{
    cli::{output, run_cli, CliError},
    init,
};

fn main() {
    init();

    if let Err(err) = run_cli(env::args().skip(1)) {
        output::error(&err);
        let code = match err {
            CliError::Usage(_) => 2,
            _ => 1,
        };
        process::exit(code);
    }
}
