use std::process::ExitCode;

fn main() -> ExitCode {
    match stampede::entry::run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("stampede: {err}");
            ExitCode::FAILURE
        }
    }
}
