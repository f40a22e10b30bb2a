//! Payload benchmarks for the modbench harness.
//!
//! ```bash
//! cargo run --release -p modbench-demos
//! cargo run --release -p modbench-demos -- fibonacci n=5000
//! cargo run --release -p modbench-demos -- --format json -m 2
//! ```

mod bubble_sort;
mod factorial;
mod fibonacci;
mod smoothing;

fn main() {
    if let Err(e) = modbench::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
