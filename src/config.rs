//! Runtime configuration.
//!
//! [`multiply_accumulate`](crate::multiply_accumulate) uses a process-wide
//! [`Config`] read once from the environment:
//!
//! | Variable            | Values                                      | Default |
//! |---------------------|---------------------------------------------|---------|
//! | `BLOCKGEMM_PARAMS`  | `large`, `small`, `auto`                    | `auto`  |
//! | `BLOCKGEMM_KERNEL`  | `scalar`, `avx2`, `avx512`, `neon`, `auto`  | `auto`  |
//! | `BLOCKGEMM_PADDING` | `reuse`, `zero`                             | `reuse` |
//!
//! Bad values and kernels the CPU cannot run are logged and replaced by the
//! default, so the global config is always runnable.

use crate::error::{Error, Result};
use crate::kernels::KernelKind;
use crate::params::{BlockParams, ParamSet};
use crate::scratch::PaddingPolicy;
use once_cell::sync::Lazy;

/// Selects the block parameter set.
pub const PARAMS_VAR: &str = "BLOCKGEMM_PARAMS";
/// Forces a micro-kernel.
pub const KERNEL_VAR: &str = "BLOCKGEMM_KERNEL";
/// Selects the padding policy.
pub const PADDING_VAR: &str = "BLOCKGEMM_PADDING";

/// How a multiply is carried out.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Block sizes, or how to pick them.
    pub params: ParamSet,
    /// `None` picks the best kernel the CPU supports.
    pub kernel: Option<KernelKind>,
    /// Scratch padding handling.
    pub padding: PaddingPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            params: ParamSet::Auto,
            kernel: None,
            padding: PaddingPolicy::Reuse,
        }
    }
}

impl Config {
    /// Uses custom block sizes.
    pub fn with_params(mut self, params: BlockParams) -> Self {
        self.params = ParamSet::Custom(params);
        self
    }

    /// Uses a preset or the size heuristic.
    pub fn with_param_set(mut self, params: ParamSet) -> Self {
        self.params = params;
        self
    }

    /// Forces one kernel instead of the best available.
    pub fn with_kernel(mut self, kernel: KernelKind) -> Self {
        self.kernel = Some(kernel);
        self
    }

    /// Sets what happens to scratch padding between blocks.
    pub fn with_padding(mut self, padding: PaddingPolicy) -> Self {
        self.padding = padding;
        self
    }

    /// The kernel this config will run, if the CPU supports it.
    pub fn kernel_kind(&self) -> Result<KernelKind> {
        match self.kernel {
            None => Ok(KernelKind::best_available()),
            Some(kind) if kind.is_available() => Ok(kind),
            Some(kind) => Err(Error::KernelUnavailable(kind)),
        }
    }

    /// Reads the `BLOCKGEMM_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds a config from `lookup`, falling back to defaults on bad input.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(value) = lookup(PARAMS_VAR) {
            match parse_param_set(&value) {
                Ok(params) => config.params = params,
                Err(err) => log::warn!("{err}, using {:?}", config.params),
            }
        }

        if let Some(value) = lookup(KERNEL_VAR) {
            match parse_kernel(&value) {
                Ok(Some(kind)) if !kind.is_available() => {
                    let best = KernelKind::best_available();
                    log::warn!("{}, using {best}", Error::KernelUnavailable(kind));
                }
                Ok(kernel) => config.kernel = kernel,
                Err(err) => log::warn!("{err}, using {}", KernelKind::best_available()),
            }
        }

        if let Some(value) = lookup(PADDING_VAR) {
            match parse_padding(&value) {
                Ok(padding) => config.padding = padding,
                Err(err) => log::warn!("{err}, using {:?}", config.padding),
            }
        }

        config
    }
}

fn unknown(var: &'static str, value: &str) -> Error {
    Error::UnknownSetting {
        var,
        value: value.to_string(),
    }
}

/// Parses a `BLOCKGEMM_PARAMS` value.
pub fn parse_param_set(value: &str) -> Result<ParamSet> {
    match value.trim().to_ascii_lowercase().as_str() {
        "large" => Ok(ParamSet::Large),
        "small" => Ok(ParamSet::Small),
        "auto" | "" => Ok(ParamSet::Auto),
        _ => Err(unknown(PARAMS_VAR, value)),
    }
}

/// Parses a `BLOCKGEMM_KERNEL` value; `Ok(None)` means "auto".
pub fn parse_kernel(value: &str) -> Result<Option<KernelKind>> {
    let value_lc = value.trim().to_ascii_lowercase();
    if value_lc == "auto" || value_lc.is_empty() {
        return Ok(None);
    }
    KernelKind::ALL
        .into_iter()
        .find(|k| k.name() == value_lc)
        .map(Some)
        .ok_or_else(|| unknown(KERNEL_VAR, value))
}

/// Parses a `BLOCKGEMM_PADDING` value.
pub fn parse_padding(value: &str) -> Result<PaddingPolicy> {
    match value.trim().to_ascii_lowercase().as_str() {
        "reuse" | "" => Ok(PaddingPolicy::Reuse),
        "zero" | "zerofill" | "zero-fill" => Ok(PaddingPolicy::ZeroFill),
        _ => Err(unknown(PADDING_VAR, value)),
    }
}

/// Configuration used by [`multiply_accumulate`](crate::multiply_accumulate).
pub static GLOBAL_CONFIG: Lazy<Config> = Lazy::new(|| {
    let config = Config::from_env();
    log::debug!(
        "blockgemm config: params={:?} kernel={} padding={:?}",
        config.params,
        config.kernel.unwrap_or_else(KernelKind::best_available),
        config.padding
    );
    config
});
