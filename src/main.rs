fn main() {
    if let Err(err) = org_dashboard::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
