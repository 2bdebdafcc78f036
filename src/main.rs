use doctrine::core::error::DoctrineError;

fn main() {
    match doctrine::run() {
        Ok(()) => {}
        // Every command lists the individual errors before returning.
        Err(DoctrineError::Load(failure)) => {
            eprintln!("Error: content load failed with {} error(s)", failure.len());
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
