use std::process::ExitCode;

use corepub::ui::output;

fn main() -> ExitCode {
    match corepub::cli::run() {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}
