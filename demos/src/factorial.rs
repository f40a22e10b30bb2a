//! Iterative factorial

use modbench::prelude::*;
use serde::{Deserialize, Serialize};
use std::hint::black_box;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorialConfig {
    pub iterations: i64,
    pub n: u64,
}

/// n! modulo 2^64
pub fn factorial(n: u64) -> u64 {
    (1..=n).fold(1u64, |total, i| total.wrapping_mul(i))
}

pub struct Factorial;

impl BenchModule for Factorial {
    type Config = FactorialConfig;
    type Fixture = ();

    fn init() -> Result<FactorialConfig, ModuleError> {
        Ok(FactorialConfig {
            iterations: 50,
            n: 1000,
        })
    }

    fn get_iterations(config: &FactorialConfig) -> Result<i64, ModuleError> {
        Ok(config.iterations)
    }

    fn setup(_config: &FactorialConfig) -> Result<(), ModuleError> {
        Ok(())
    }

    fn run(config: &FactorialConfig, _fixture: &mut ()) -> Result<Option<String>, ModuleError> {
        black_box(factorial(black_box(config.n)));
        Ok(Some("factorial()".to_string()))
    }
}

register_module!(Factorial, "factorial");
