fn main() {
    if let Err(e) = swirl::window::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
