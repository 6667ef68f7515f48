mod platform;

use std::process::ExitCode;

fn main() -> ExitCode {
    match platform::run_app() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("visplain: {err:#}");
            ExitCode::FAILURE
        }
    }
}
