//! Engine configuration
//!
//! All weights, thresholds and rating parameters live here and are passed to
//! the engine at construction. Defaults match the values the leaderboards
//! have historically been computed with.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::entities::DEFAULT_RATING;
use crate::error::AppError;

/// Per-metric weighting
#[derive(Debug, Clone, PartialEq)]
pub struct MetricWeights {
    /// Score per bit spent
    pub bits: f64,
    /// Score per gifted sub
    pub subs: f64,
    /// Weight of the message-length reward curve
    pub text: f64,
    /// Message length that the reward curve peaks around
    pub text_target_length: usize,
    /// Score per emote
    pub emotes: f64,
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            bits: 0.02,
            subs: 0.1,
            text: 0.02,
            text_target_length: 20,
            emotes: 0.02,
        }
    }
}

/// Copypasta chain detection parameters
#[derive(Debug, Clone, PartialEq)]
pub struct CopypastaConfig {
    /// Score per sequence number a chain stayed alive
    pub weight: f64,
    /// Max sequence gap before an inactive chain is evicted
    pub chain_grace: u64,
    /// Minimum similarity for a message to join an existing chain
    pub matching_threshold: f64,
    /// Upper bound on simultaneously active chains
    pub max_active_chains: usize,
}

impl Default for CopypastaConfig {
    fn default() -> Self {
        Self {
            weight: 0.3,
            chain_grace: 10,
            matching_threshold: 0.6,
            max_active_chains: 512,
        }
    }
}

/// Which rating update to run on save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingStrategyKind {
    /// Every pair of entries competes once. O(n²).
    Pairwise,
    /// Every entry competes against synthetic opponents drawn from the
    /// population's score distribution. O(n · samples).
    Sampled { samples: usize },
}

impl Default for RatingStrategyKind {
    fn default() -> Self {
        RatingStrategyKind::Sampled { samples: 500 }
    }
}

/// Rating engine parameters
#[derive(Debug, Clone, PartialEq)]
pub struct RatingConfig {
    pub k_factor: f64,
    pub initial_rating: f64,
    pub strategy: RatingStrategyKind,
    /// Fixed seed for the sampled strategy; entropy when unset
    pub seed: Option<u64>,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            k_factor: 2.0,
            initial_rating: DEFAULT_RATING,
            strategy: RatingStrategyKind::default(),
            seed: None,
        }
    }
}

/// Locations of inputs and outputs used by the command line runner
#[derive(Debug, Clone, PartialEq)]
pub struct PathsConfig {
    pub leaderboard_dir: PathBuf,
    pub badge_catalog: Option<PathBuf>,
    pub emote_list: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            leaderboard_dir: PathBuf::from("."),
            badge_catalog: None,
            emote_list: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub weights: MetricWeights,
    pub copypasta: CopypastaConfig,
    pub rating: RatingConfig,
    /// Badge ids that mark a user as holding a privileged role
    pub privileged_roles: Vec<String>,
    pub paths: PathsConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: MetricWeights::default(),
            copypasta: CopypastaConfig::default(),
            rating: RatingConfig::default(),
            privileged_roles: vec![
                "moderator".to_string(),
                "vip".to_string(),
                "broadcaster".to_string(),
            ],
            paths: PathsConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load from the environment (and `.env` if present), falling back to defaults
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup
    pub fn from_vars<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let weights = MetricWeights {
            bits: parse_or(&get, "CHATELO_WEIGHT_BITS", defaults.weights.bits)?,
            subs: parse_or(&get, "CHATELO_WEIGHT_SUBS", defaults.weights.subs)?,
            text: parse_or(&get, "CHATELO_WEIGHT_TEXT", defaults.weights.text)?,
            text_target_length: parse_or(
                &get,
                "CHATELO_TEXT_TARGET_LENGTH",
                defaults.weights.text_target_length,
            )?,
            emotes: parse_or(&get, "CHATELO_WEIGHT_EMOTES", defaults.weights.emotes)?,
        };

        let copypasta = CopypastaConfig {
            weight: parse_or(&get, "CHATELO_WEIGHT_COPYPASTA", defaults.copypasta.weight)?,
            chain_grace: parse_or(&get, "CHATELO_CHAIN_GRACE", defaults.copypasta.chain_grace)?,
            matching_threshold: parse_or(
                &get,
                "CHATELO_MATCHING_THRESHOLD",
                defaults.copypasta.matching_threshold,
            )?,
            max_active_chains: parse_or(
                &get,
                "CHATELO_MAX_ACTIVE_CHAINS",
                defaults.copypasta.max_active_chains,
            )?,
        };

        let samples = match defaults.rating.strategy {
            RatingStrategyKind::Sampled { samples } => samples,
            RatingStrategyKind::Pairwise => 500,
        };
        let samples = parse_or(&get, "CHATELO_SAMPLE_COUNT", samples)?;
        let strategy = match get("CHATELO_RATING_STRATEGY").as_deref().map(str::trim) {
            None => RatingStrategyKind::Sampled { samples },
            Some(s) if s.eq_ignore_ascii_case("sampled") => RatingStrategyKind::Sampled { samples },
            Some(s) if s.eq_ignore_ascii_case("pairwise") => RatingStrategyKind::Pairwise,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "CHATELO_RATING_STRATEGY must be 'pairwise' or 'sampled', got '{}'",
                    other
                )))
            }
        };

        let rating = RatingConfig {
            k_factor: parse_or(&get, "CHATELO_K_FACTOR", defaults.rating.k_factor)?,
            initial_rating: parse_or(
                &get,
                "CHATELO_INITIAL_RATING",
                defaults.rating.initial_rating,
            )?,
            strategy,
            seed: get("CHATELO_RATING_SEED")
                .map(|raw| parse_value("CHATELO_RATING_SEED", &raw))
                .transpose()?,
        };

        let paths = PathsConfig {
            leaderboard_dir: get("CHATELO_LEADERBOARD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.paths.leaderboard_dir),
            badge_catalog: get("CHATELO_BADGE_CATALOG").map(PathBuf::from),
            emote_list: get("CHATELO_EMOTE_LIST").map(PathBuf::from),
        };

        let config = Self {
            weights,
            copypasta,
            rating,
            privileged_roles: defaults.privileged_roles,
            paths,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), AppError> {
        if !(0.0..=1.0).contains(&self.copypasta.matching_threshold) {
            return Err(AppError::Config(format!(
                "matching threshold must be within [0, 1], got {}",
                self.copypasta.matching_threshold
            )));
        }
        if self.copypasta.max_active_chains == 0 {
            return Err(AppError::Config(
                "max active chains must be at least 1".to_string(),
            ));
        }
        if let RatingStrategyKind::Sampled { samples: 0 } = self.rating.strategy {
            return Err(AppError::Config(
                "sample count must be at least 1".to_string(),
            ));
        }
        if !self.rating.k_factor.is_finite() || !self.rating.initial_rating.is_finite() {
            return Err(AppError::Config(
                "K-factor and initial rating must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{} has an invalid value: '{}'", key, raw)))
}
