//! Iterative Fibonacci

use modbench::prelude::*;
use serde::{Deserialize, Serialize};
use std::hint::black_box;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FibConfig {
    pub iterations: i64,
    /// Index of the Fibonacci number to compute
    pub n: u64,
}

/// Wrapping arithmetic: large `n` overflow u64, only the work matters.
pub fn fib(n: u64) -> u64 {
    let (mut last, mut penult) = (0u64, 1u64);
    for _ in 0..n {
        let current = last.wrapping_add(penult);
        penult = last;
        last = current;
    }
    last
}

pub struct Fibonacci;

impl BenchModule for Fibonacci {
    type Config = FibConfig;
    type Fixture = ();

    fn init() -> Result<FibConfig, ModuleError> {
        Ok(FibConfig {
            iterations: 50,
            n: 1000,
        })
    }

    fn get_iterations(config: &FibConfig) -> Result<i64, ModuleError> {
        Ok(config.iterations)
    }

    fn setup(_config: &FibConfig) -> Result<(), ModuleError> {
        Ok(())
    }

    fn run(config: &FibConfig, _fixture: &mut ()) -> Result<Option<String>, ModuleError> {
        black_box(fib(black_box(config.n)));
        Ok(Some("fib()".to_string()))
    }
}

register_module!(Fibonacci, "fibonacci");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fib_values() {
        let expected = [0, 1, 1, 2, 3, 5, 8, 13, 21, 34];
        for (n, want) in expected.iter().enumerate() {
            assert_eq!(fib(n as u64), *want);
        }
        assert_eq!(fib(90), 2_880_067_194_370_816_120);
    }
}
