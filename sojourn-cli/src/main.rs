//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use sojourn_cli::CliError;

fn main() {
    match sojourn_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => report(&err),
    }
}

#[expect(clippy::print_stderr, reason = "the binary reports fatal errors on stderr")]
fn report(err: &CliError) -> ! {
    eprintln!("sojourn: {err}");
    std::process::exit(1);
}
