use std::process::ExitCode;

fn main() -> ExitCode {
    partnerfit_cli::run()
}
