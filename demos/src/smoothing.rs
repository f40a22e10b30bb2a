//! Naive 3×3 box blur over a synthetic grayscale image

use modbench::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::hint::black_box;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmoothingConfig {
    pub iterations: i64,
    pub width: usize,
    pub height: usize,
    pub seed: u64,
}

/// Source image and output buffer
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<f32>,
    output: Vec<f32>,
}

/// Average each pixel with its in-bounds neighbours
pub fn box_blur(width: usize, height: usize, src: &[f32], dst: &mut [f32]) {
    for y in 0..height {
        for x in 0..width {
            let mut sum = 0.0;
            let mut count = 0u32;
            for ny in y.saturating_sub(1)..=(y + 1).min(height - 1) {
                for nx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                    sum += src[ny * width + nx];
                    count += 1;
                }
            }
            dst[y * width + x] = sum / count as f32;
        }
    }
}

pub struct Smoothing;

impl BenchModule for Smoothing {
    type Config = SmoothingConfig;
    type Fixture = Image;

    fn init() -> Result<SmoothingConfig, ModuleError> {
        Ok(SmoothingConfig {
            iterations: 20,
            width: 64,
            height: 64,
            seed: 7,
        })
    }

    fn get_iterations(config: &SmoothingConfig) -> Result<i64, ModuleError> {
        Ok(config.iterations)
    }

    fn setup(config: &SmoothingConfig) -> Result<Image, ModuleError> {
        if config.width == 0 || config.height == 0 {
            return Err(ModuleError::new(format!(
                "image must not be empty, got {}x{}",
                config.width, config.height
            )));
        }
        let size = config.width * config.height;
        let mut rng = StdRng::seed_from_u64(config.seed);
        Ok(Image {
            width: config.width,
            height: config.height,
            pixels: (0..size).map(|_| rng.gen_range(0.0..255.0)).collect(),
            output: vec![0.0; size],
        })
    }

    fn run(_config: &SmoothingConfig, image: &mut Image) -> Result<Option<String>, ModuleError> {
        box_blur(image.width, image.height, &image.pixels, &mut image.output);
        black_box(&image.output);
        Ok(Some("smooth()".to_string()))
    }
}

register_module!(Smoothing, "smoothing");
