//! Exchange sort over random floats
//!
//! The fixture is sorted in place. With the default shared fixture every
//! iteration after the first sorts an already sorted array; run with
//! `--fixture fresh` to measure unsorted input each time.

use modbench::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::hint::black_box;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortConfig {
    pub iterations: i64,
    pub elements: usize,
    pub seed: u64,
}

pub fn sort(array: &mut [f64]) {
    let len = array.len();
    for i in 0..len.saturating_sub(1) {
        for j in i + 1..len {
            if array[i] > array[j] {
                array.swap(i, j);
            }
        }
    }
}

pub struct BubbleSort;

impl BenchModule for BubbleSort {
    type Config = SortConfig;
    type Fixture = Vec<f64>;

    fn init() -> Result<SortConfig, ModuleError> {
        Ok(SortConfig {
            iterations: 30,
            elements: 500,
            seed: 0x5eed,
        })
    }

    fn get_iterations(config: &SortConfig) -> Result<i64, ModuleError> {
        Ok(config.iterations)
    }

    fn setup(config: &SortConfig) -> Result<Vec<f64>, ModuleError> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        Ok((0..config.elements).map(|_| rng.r#gen::<f64>()).collect())
    }

    fn run(_config: &SortConfig, array: &mut Vec<f64>) -> Result<Option<String>, ModuleError> {
        sort(black_box(array.as_mut_slice()));
        Ok(Some("sort()".to_string()))
    }
}

register_module!(BubbleSort, "bubble_sort");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_orders_values() {
        let mut values = vec![3.0, -1.0, 2.5, 0.0, 2.5];
        sort(&mut values);
        assert_eq!(values, vec![-1.0, 0.0, 2.5, 2.5, 3.0]);

        let mut empty: Vec<f64> = Vec::new();
        sort(&mut empty);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_setup_is_seeded() {
        let config = BubbleSort::init().unwrap();
        let a = BubbleSort::setup(&config).unwrap();
        let b = BubbleSort::setup(&config).unwrap();
        assert_eq!(a.len(), 500);
        assert_eq!(a, b);
    }
}
