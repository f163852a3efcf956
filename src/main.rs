fn main() {
    if let Err(err) = studyplan_lib::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
