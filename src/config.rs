//! Command-line configuration for the `klondike` binary.
//!
//! A very small hand-rolled argument parser; the surface is four flags:
//!
//! - `--seed=<u64>`   reproducible ChaCha8 shuffle
//! - `--deal=<game>`  PySolFC game number (`12345`, `ms12345`, ...)
//! - `--deck=<list>`  explicit deal order, e.g. `--deck=[51,32,3,...]`
//! - `--no-colour`    plain output (`--no-color` also accepted)
//!
//! At most one of `--seed`, `--deal` and `--deck` may be given. Without any,
//! the deal is shuffled from OS entropy.

use log::warn;
use thiserror::Error;

use crate::pysol::{PysolDeal, SeedError};
use crate::shuffle::{DeckError, FixedDeck, SeededShuffler, Shuffler};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("could not parse seed {0:?}; expected an unsigned integer")]
    BadSeed(String),
    #[error("bad --deal value: {0}")]
    BadDeal(#[from] SeedError),
    #[error("bad --deck value: {0}")]
    BadDeck(#[from] DeckError),
    #[error("--seed, --deal and --deck are mutually exclusive")]
    ConflictingDeals,
}

/// Where the starting order of the deck comes from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DealSource {
    #[default]
    Entropy,
    Seed(u64),
    Pysol(PysolDeal),
    Fixed(FixedDeck),
}

impl DealSource {
    /// Build the shuffler this source describes.
    pub fn shuffler(&self) -> Box<dyn Shuffler> {
        match self {
            DealSource::Entropy => Box::new(SeededShuffler::from_entropy()),
            DealSource::Seed(seed) => Box::new(SeededShuffler::new(*seed)),
            DealSource::Pysol(deal) => Box::new(deal.clone()),
            DealSource::Fixed(deck) => Box::new(deck.clone()),
        }
    }

    /// A short description for the start-up banner.
    pub fn describe(&self) -> String {
        match self {
            DealSource::Entropy => "random deal".to_string(),
            DealSource::Seed(seed) => format!("seed {seed}"),
            DealSource::Pysol(deal) => format!("PySol game {}", deal.label()),
            DealSource::Fixed(_) => "fixed deck".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub deal: DealSource,
    pub colour: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            deal: DealSource::Entropy,
            colour: true,
        }
    }
}

impl Config {
    /// Parse arguments (without the program name). Unrecognised arguments are
    /// logged and skipped.
    pub fn from_args<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Config::default();
        let mut deal_given = false;

        for arg in args {
            let arg = arg.as_ref();
            let deal = if let Some(rest) = arg.strip_prefix("--seed=") {
                let seed = rest
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::BadSeed(rest.to_string()))?;
                Some(DealSource::Seed(seed))
            } else if let Some(rest) = arg.strip_prefix("--deal=") {
                Some(DealSource::Pysol(PysolDeal::parse(rest)?))
            } else if let Some(rest) = arg.strip_prefix("--deck=") {
                Some(DealSource::Fixed(FixedDeck::parse(rest)?))
            } else if arg == "--no-colour" || arg == "--no-color" {
                config.colour = false;
                None
            } else {
                warn!(
                    "unrecognized argument '{arg}'; supported: --seed=<u64>, --deal=<game>, --deck=[...], --no-colour"
                );
                None
            };

            if let Some(deal) = deal {
                if std::mem::replace(&mut deal_given, true) {
                    return Err(ConfigError::ConflictingDeals);
                }
                config.deal = deal;
            }
        }

        Ok(config)
    }
}
