use std::process::ExitCode;

fn main() -> ExitCode {
    das_util_lib::run()
}
