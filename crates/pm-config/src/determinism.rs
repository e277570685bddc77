use rand::{rngs::StdRng, SeedableRng};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

/// Unified deterministic runtime configuration.
#[derive(Clone, Debug)]
pub struct DeterminismConfig {
    /// Whether deterministic execution is enabled globally.
    pub enabled: bool,
    /// Base seed used to derive per-component seeds.
    pub base_seed: u64,
    /// If true the apply loop runs on the calling thread only.
    pub fix_reduction: bool,
}

impl DeterminismConfig {
    /// Builds a configuration snapshot from environment variables.
    fn from_env() -> Self {
        let enabled = std::env::var("PHASEMAP_DETERMINISTIC")
            .ok()
            .map(|v| !matches!(v.as_str(), "0" | "false" | "False" | "off" | "OFF"))
            .unwrap_or(false);

        let base_seed = std::env::var("PHASEMAP_DETERMINISTIC_SEED")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(42);

        let fix_reduction = std::env::var("PHASEMAP_DETERMINISTIC_REDUCTION")
            .ok()
            .map(|v| matches!(v.as_str(), "1" | "true" | "True" | "on" | "ON"))
            .unwrap_or(enabled);

        Self {
            enabled,
            base_seed,
            fix_reduction,
        }
    }

    /// Derives a deterministic seed for a given component label.
    pub fn seed_for<L: Hash>(&self, label: L) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.base_seed.hash(&mut hasher);
        label.hash(&mut hasher);
        hasher.finish()
    }
}

static CONFIG: OnceLock<DeterminismConfig> = OnceLock::new();

/// Returns the lazily initialised deterministic configuration.
pub fn config() -> &'static DeterminismConfig {
    CONFIG.get_or_init(DeterminismConfig::from_env)
}

/// Returns a RNG derived from the provided label. When determinism is disabled
/// this falls back to a random seed from the operating system.
pub fn rng_from_label(label: &str) -> StdRng {
    let cfg = config();
    if cfg.enabled {
        StdRng::seed_from_u64(cfg.seed_for(label))
    } else {
        StdRng::from_entropy()
    }
}

/// Returns a RNG seeded from an optional explicit seed, respecting deterministic
/// overrides when the seed is not provided.
pub fn rng_from_optional(seed: Option<u64>, label: &str) -> StdRng {
    match seed {
        Some(value) => StdRng::seed_from_u64(value),
        None => rng_from_label(label),
    }
}

/// Returns whether the apply loop must stay on a single thread.
pub fn lock_reduction_order() -> bool {
    config().enabled && config().fix_reduction
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe};
    use std::sync::{Mutex, OnceLock};

    fn with_env(vars: &[(&str, Option<&str>)], test: impl FnOnce()) {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        let _lock = GUARD.get_or_init(|| Mutex::new(())).lock().unwrap();

        let snapshot: Vec<(String, Option<String>)> = vars
            .iter()
            .map(|(key, value)| {
                let previous = std::env::var(key).ok();
                match value {
                    Some(val) => std::env::set_var(key, val),
                    None => std::env::remove_var(key),
                }
                ((*key).to_string(), previous)
            })
            .collect();

        let result = catch_unwind(AssertUnwindSafe(test));

        for (key, value) in snapshot {
            match value {
                Some(val) => std::env::set_var(&key, val),
                None => std::env::remove_var(&key),
            }
        }

        if let Err(err) = result {
            resume_unwind(err);
        }
    }

    #[test]
    fn defaults_disable_determinism() {
        with_env(
            &[
                ("PHASEMAP_DETERMINISTIC", None),
                ("PHASEMAP_DETERMINISTIC_SEED", None),
                ("PHASEMAP_DETERMINISTIC_REDUCTION", None),
            ],
            || {
                let cfg = DeterminismConfig::from_env();
                assert!(!cfg.enabled);
                assert_eq!(cfg.base_seed, 42);
                assert!(!cfg.fix_reduction);
            },
        );
    }

    #[test]
    fn reduction_follows_enabled_flag_when_unspecified() {
        with_env(
            &[
                ("PHASEMAP_DETERMINISTIC", Some("1")),
                ("PHASEMAP_DETERMINISTIC_SEED", Some("1337")),
                ("PHASEMAP_DETERMINISTIC_REDUCTION", None),
            ],
            || {
                let cfg = DeterminismConfig::from_env();
                assert!(cfg.enabled);
                assert_eq!(cfg.base_seed, 1337);
                assert!(cfg.fix_reduction);
            },
        );
    }

    #[test]
    fn textual_false_values_disable_flags() {
        with_env(&[("PHASEMAP_DETERMINISTIC", Some("off"))], || {
            let cfg = DeterminismConfig::from_env();
            assert!(!cfg.enabled);
        });
    }

    #[test]
    fn explicit_seeds_reproduce_streams() {
        let mut a = rng_from_optional(Some(7), "field");
        let mut b = rng_from_optional(Some(7), "other-label");
        let xs: Vec<f32> = (0..4).map(|_| a.gen()).collect();
        let ys: Vec<f32> = (0..4).map(|_| b.gen()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn derived_seeds_are_stable_per_label() {
        let cfg = DeterminismConfig {
            enabled: true,
            base_seed: 99,
            fix_reduction: true,
        };
        assert_eq!(cfg.seed_for("alpha"), cfg.seed_for("alpha"));
        assert_ne!(cfg.seed_for("alpha"), cfg.seed_for("beta"));
    }
}
