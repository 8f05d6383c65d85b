use dirpush::ui::output;

fn main() {
    if let Err(err) = dirpush::cli::run() {
        output::error(format!("{:#}", err));
        std::process::exit(1);
    }
}
