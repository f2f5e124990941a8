fn main() {
    if let Err(e) = rqlup::run_cli() {
        std::process::exit(rqlup::report_error(&e));
    }
}
