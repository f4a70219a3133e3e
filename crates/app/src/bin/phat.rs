use ptac::browser::{open_url, DEFAULT_URL};

fn main() {
    tracing_subscriber::fmt::init();

    match open_url(DEFAULT_URL) {
        Ok(()) => println!("Opening {DEFAULT_URL} in your default web browser."),
        Err(e) => println!("An error occurred: {e}"),
    }
}
