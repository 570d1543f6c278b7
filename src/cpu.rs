//! One-time hardware probe.
//!
//! The probe runs on first use and is cached for the life of the process,
//! so kernel selection costs a pointer load on every call after the first.

use once_cell::sync::Lazy;

/// Instruction-set features the micro-kernels care about.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CpuFeatures {
    /// 256-bit integer and float vectors
    pub avx2: bool,
    /// Fused multiply-add on 128/256-bit vectors
    pub fma: bool,
    /// 512-bit foundation, includes FMA on ZMM
    pub avx512f: bool,
    /// aarch64 advanced SIMD
    pub neon: bool,
}

/// What we know about the machine we are running on.
#[derive(Clone, Debug)]
pub struct HwInfo {
    /// Usable instruction-set extensions.
    pub features: CpuFeatures,
}

impl HwInfo {
    /// Widest f64 vector the CPU can execute, in lanes.
    pub fn f64_lanes(&self) -> usize {
        let ft = self.features;
        if ft.avx512f {
            8
        } else if ft.avx2 && ft.fma {
            4
        } else if ft.neon {
            2
        } else {
            1
        }
    }
}

#[cfg(target_arch = "x86_64")]
fn detect() -> HwInfo {
    let cpuid = raw_cpuid::CpuId::new();

    let fma = cpuid.get_feature_info().is_some_and(|fi| fi.has_fma());
    let (avx2, avx512f) = match cpuid.get_extended_feature_info() {
        Some(ef) => (ef.has_avx2(), ef.has_avx512f()),
        None => (false, false),
    };

    // CPUID reports what the silicon has; the std probe additionally checks
    // that the OS saves the wide register state.
    let features = CpuFeatures {
        avx2: avx2 && std::arch::is_x86_feature_detected!("avx2"),
        fma: fma && std::arch::is_x86_feature_detected!("fma"),
        avx512f: avx512f && std::arch::is_x86_feature_detected!("avx512f"),
        neon: false,
    };

    HwInfo { features }
}

#[cfg(target_arch = "aarch64")]
fn detect() -> HwInfo {
    let neon = std::arch::is_aarch64_feature_detected!("neon");
    HwInfo {
        features: CpuFeatures {
            neon,
            ..CpuFeatures::default()
        },
    }
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn detect() -> HwInfo {
    HwInfo {
        features: CpuFeatures::default(),
    }
}

/// Hardware probe result, computed on first access.
pub static RUNTIME_HW_INFO: Lazy<HwInfo> = Lazy::new(|| {
    let hw = detect();
    log::debug!(
        "cpu probe: features={:?} f64 lanes={}",
        hw.features,
        hw.f64_lanes()
    );
    hw
});

/// Features of the running CPU, probed once.
#[inline]
pub fn cpu_features() -> CpuFeatures {
    RUNTIME_HW_INFO.features
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_is_consistent_with_std_detection() {
        let ft = cpu_features();
        #[cfg(target_arch = "x86_64")]
        {
            if ft.avx2 {
                assert!(is_x86_feature_detected!("avx2"));
            }
            if ft.avx512f {
                assert!(is_x86_feature_detected!("avx512f"));
            }
            assert!(!ft.neon);
        }
        assert!(RUNTIME_HW_INFO.f64_lanes() >= 1);
    }

    #[test]
    fn lanes_follow_the_widest_usable_unit() {
        let lanes = |features| HwInfo { features }.f64_lanes();
        let avx2_only = CpuFeatures {
            avx2: true,
            ..CpuFeatures::default()
        };
        let avx2_fma = CpuFeatures {
            fma: true,
            ..avx2_only
        };
        let avx512 = CpuFeatures {
            avx512f: true,
            ..avx2_fma
        };
        let neon = CpuFeatures {
            neon: true,
            ..CpuFeatures::default()
        };

        assert_eq!(lanes(CpuFeatures::default()), 1);
        // AVX2 without FMA cannot run the 4-lane kernel
        assert_eq!(lanes(avx2_only), 1);
        assert_eq!(lanes(avx2_fma), 4);
        assert_eq!(lanes(avx512), 8);
        assert_eq!(lanes(neon), 2);
    }
}
