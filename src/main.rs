fn main() {
    if let Err(err) = tempconv::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
