fn main() {
    if let Err(err) = bucketnote::cli::run() {
        bucketnote::cli::print_error(&err);
        std::process::exit(bucketnote::exit::exit_code(&err));
    }
}
