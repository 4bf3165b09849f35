use benchlens::run_benchlens;

fn main() {
    if let Err(e) = run_benchlens(std::env::args_os().skip(1)) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}
