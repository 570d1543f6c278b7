mod common;

use blockgemm::{
    BlockParams, Config, KernelKind, PaddingPolicy, ParamSet, multiply_accumulate,
    multiply_accumulate_with,
};
use common::{fused_multiply_accumulate, naive_multiply_accumulate};
use proptest::prelude::*;

/// `n` followed by A, B and C.
type Operands = (usize, Vec<f64>, Vec<f64>, Vec<f64>);

/// n and three n×n matrices with entries in [-1, 1).
fn square_operands(max_n: usize) -> impl Strategy<Value = Operands> {
    (0..=max_n).prop_flat_map(|n| {
        let m = || prop::collection::vec(-1.0f64..1.0, n * n);
        (Just(n), m(), m(), m())
    })
}

fn param_set() -> impl Strategy<Value = ParamSet> {
    prop::sample::select(vec![ParamSet::Small, ParamSet::Large, ParamSet::Auto])
}

fn available_kernels() -> impl Iterator<Item = KernelKind> {
    KernelKind::ALL.into_iter().filter(|k| k.is_available())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn close_to_naive((n, a, b, c) in square_operands(60)) {
        let mut expected = c.clone();
        let mut actual = c;
        naive_multiply_accumulate(n, &a, &b, &mut expected);
        multiply_accumulate(n, &a, &b, &mut actual);

        for (e, x) in expected.iter().zip(&actual) {
            let tol = 1e-9 * e.abs().max(1.0);
            prop_assert!((e - x).abs() <= tol, "expected {}, got {}", e, x);
        }
    }

    #[test]
    fn bit_exact_with_fused_reference(
        (n, a, b, c) in square_operands(60),
        params in param_set(),
        zero_fill in any::<bool>(),
    ) {
        let padding = if zero_fill { PaddingPolicy::ZeroFill } else { PaddingPolicy::Reuse };
        let mut expected = c.clone();
        fused_multiply_accumulate(n, &a, &b, &mut expected);

        for kind in available_kernels() {
            let config = Config::default()
                .with_kernel(kind)
                .with_param_set(params)
                .with_padding(padding);
            let mut actual = c.clone();
            multiply_accumulate_with(&config, n, &a, &b, &mut actual).unwrap();
            prop_assert_eq!(&actual, &expected, "kernel {}", kind);
        }
    }

    #[test]
    fn any_valid_custom_params_agree(
        (n, a, b, c) in square_operands(40),
        tile_units in 1usize..=4,
        l1_m_units in 1usize..=16,
        l1_n_units in 1usize..=4,
        l1_k in 1usize..=48,
        reg_k in 1usize..=48,
    ) {
        // tile a multiple of 48 is a multiple of both 3 and 16
        let tile = 48 * tile_units;
        let params = BlockParams {
            tile,
            l1_m: (3 * l1_m_units).min(tile),
            l1_n: (16 * l1_n_units).min(tile),
            l1_k: l1_k.min(tile),
            reg_k,
        };
        let shape = KernelKind::best_available().shape();
        prop_assume!(params.validate(shape).is_ok());

        let config = Config::default().with_params(params);
        let mut expected = c.clone();
        let mut actual = c;
        fused_multiply_accumulate(n, &a, &b, &mut expected);
        multiply_accumulate_with(&config, n, &a, &b, &mut actual).unwrap();

        prop_assert_eq!(actual, expected);
    }
}
