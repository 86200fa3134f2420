//! cli component of the romcorrupt project.
//!
//! `$exename` stands for the executable name, which is `romcorrupt` in linux or `romcorrupt.exe` on
//! windows. `<description>` denotes a required argument, while `[description]` denotes an optional one.
//!
//! > `$exename <file path> <start offset> <end offset> <corruption chance> <method>
//! >   [--pattern <method>...]
//! >   [--chunk_size <n>]
//! >   [--save_original]
//! >   [--log_file <path>]
//! >   [--seed <n>]`
//!
//! offsets may be negative or past the end of the file, they are clamped into the file. the end offset
//! is inclusive and never smaller than the start offset. `method` is one of `flip_bit`, `increment`,
//! `decrement` or `randomize`.
//!
//! the corruption chance is rolled once per chunk of `--chunk_size` bytes (default 1). a chunk that wins
//! the roll is corrupted entirely, so bigger chunks give fewer but denser bursts of damage.
//!
//! `--pattern` replaces `method` with a list of methods, picked by `absolute offset % pattern length`:
//! > `$exename game.nes 16 1000000 1.0 increment --pattern flip_bit increment`
//! corrupts even offsets with `flip_bit` and odd ones with `increment`. note that `method` must still be
//! given, it is simply ignored.
//!
//! `--save_original` copies the file to `<file path>.bak` before anything is written, and the copy is
//! complete before the original is opened for writing.
//!
//! `--log_file` writes every corrupted offset as json:
//! > `[{"offset": 16, "original_byte": 17}, ...]`
//! `original_byte` is the value *after* corruption. the name is kept so existing logs and tooling stay
//! compatible.
//!
//! `--seed` makes a run reproducible. without it a seed is drawn from os entropy (or the clock, if the os
//! refuses) and printed at `info` level (`RUST_LOG=romcorrupt=info`).
use clap::Parser;
use std::path::PathBuf;

use crate::method::{CorruptionMethod, RuleSelector};

pub mod backup;
pub mod corrupt;
pub mod log;

/// Corrupt a file by randomly modifying bytes.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, allow_negative_numbers = true)]
pub struct Cli {
    /// Path to the file.
    pub file_path: PathBuf,

    /// Start offset (in bytes) for corruption.
    pub start_offset: i64,

    /// End offset (in bytes, inclusive) for corruption.
    pub end_offset: i64,

    /// Chance (between 0 and 1) to corrupt each chunk.
    pub corruption_chance: f64,

    /// Method of corruption.
    #[arg(value_enum)]
    pub method: CorruptionMethod,

    /// Pattern of corruption methods, cycled by offset. Overrides `method`.
    #[arg(long, value_enum, num_args = 1..)]
    pub pattern: Vec<CorruptionMethod>,

    /// Size of data chunks to corrupt at a time.
    #[arg(long = "chunk_size", visible_alias = "chunk-size", default_value_t = 1)]
    pub chunk_size: usize,

    /// Save a backup of the original file as `<file_path>.bak`.
    #[arg(long = "save_original", visible_alias = "save-original")]
    pub save_original: bool,

    /// Path to save the corruption log.
    #[arg(long = "log_file", visible_alias = "log-file")]
    pub log_file: Option<PathBuf>,

    /// Seed for the random generator, for reproducible runs.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Cli {
    pub fn rule_selector(&self) -> RuleSelector {
        RuleSelector::from_args(self.method, self.pattern.clone())
    }
}
