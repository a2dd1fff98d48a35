fn main() {
    if let Err(err) = note_index::entry() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
