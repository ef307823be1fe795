fn main() {
    if let Err(err) = bikeshare_explorer::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
