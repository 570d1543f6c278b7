//! Shared helpers for the integration tests.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Textbook C += A * B with a separately rounded multiply and add.
pub fn naive_multiply_accumulate(n: usize, a: &[f64], b: &[f64], c: &mut [f64]) {
    for i in 0..n {
        for p in 0..n {
            for j in 0..n {
                c[i * n + j] += a[i * n + p] * b[p * n + j];
            }
        }
    }
}

/// C += A * B with one fused multiply-add per term, reduction in order.
/// The blocked kernels must match this bit for bit.
pub fn fused_multiply_accumulate(n: usize, a: &[f64], b: &[f64], c: &mut [f64]) {
    for i in 0..n {
        for j in 0..n {
            let mut acc = c[i * n + j];
            for p in 0..n {
                acc = a[i * n + p].mul_add(b[p * n + j], acc);
            }
            c[i * n + j] = acc;
        }
    }
}

pub fn random_matrix(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n * n).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

pub fn identity(n: usize) -> Vec<f64> {
    let mut m = vec![0.0; n * n];
    for i in 0..n {
        m[i * n + i] = 1.0;
    }
    m
}

pub fn assert_close(expected: &[f64], actual: &[f64], name: &str) {
    assert_eq!(expected.len(), actual.len(), "{}: length mismatch", name);
    for i in 0..expected.len() {
        let tol = 1e-9 * expected[i].abs().max(1.0);
        assert!(
            (expected[i] - actual[i]).abs() <= tol,
            "{}: mismatch at index {}: expected {}, got {}",
            name,
            i,
            expected[i],
            actual[i]
        );
    }
}

pub fn assert_bit_exact(expected: &[f64], actual: &[f64], name: &str) {
    assert_eq!(expected.len(), actual.len(), "{}: length mismatch", name);
    for i in 0..expected.len() {
        assert!(
            expected[i] == actual[i],
            "{}: mismatch at index {}: expected {:e}, got {:e}",
            name,
            i,
            expected[i],
            actual[i]
        );
    }
}
