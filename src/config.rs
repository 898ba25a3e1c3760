//! Configuration for memory size, cache geometry, and predictor table
//! sizes. Parsed from a TOML file when `--config` is given; every field
//! has a default matching the machine's standard geometry, so a missing
//! or partial config file still produces a fully specified machine.

use serde::Deserialize;

const DEFAULT_MEMSIZE: usize = 1_048_576;

const DEFAULT_ASSOCIATIVITY: usize = 4;
const DEFAULT_BLOCK_SIZE: usize = 16;
const DEFAULT_SETS: usize = 8;

const DEFAULT_BTB_SIZE: usize = 16;
const DEFAULT_LAP_SIZE: usize = 16;
const DEFAULT_LVF_CAPACITY: usize = 5200;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_memsize")]
    pub memsize: usize,

    #[serde(default)]
    pub trace: bool,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub predictors: PredictorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            memsize: default_memsize(),
            trace: false,
            cache: CacheConfig::default(),
            predictors: PredictorConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_associativity")]
    pub associativity: usize,

    #[serde(default = "default_block_size")]
    pub block_size: usize,

    #[serde(default = "default_sets")]
    pub sets: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            associativity: default_associativity(),
            block_size: default_block_size(),
            sets: default_sets(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PredictorConfig {
    #[serde(default = "default_btb_size")]
    pub btb_size: usize,

    #[serde(default = "default_lap_size")]
    pub lap_size: usize,

    #[serde(default = "default_lvf_capacity")]
    pub lvf_capacity: usize,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            btb_size: default_btb_size(),
            lap_size: default_lap_size(),
            lvf_capacity: default_lvf_capacity(),
        }
    }
}

fn default_memsize() -> usize {
    DEFAULT_MEMSIZE
}

fn default_associativity() -> usize {
    DEFAULT_ASSOCIATIVITY
}

fn default_block_size() -> usize {
    DEFAULT_BLOCK_SIZE
}

fn default_sets() -> usize {
    DEFAULT_SETS
}

fn default_btb_size() -> usize {
    DEFAULT_BTB_SIZE
}

fn default_lap_size() -> usize {
    DEFAULT_LAP_SIZE
}

fn default_lvf_capacity() -> usize {
    DEFAULT_LVF_CAPACITY
}
