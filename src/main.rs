fn main() {
    if let Err(err) = weathermap_renderer::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
