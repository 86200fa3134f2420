use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::{
    cli::{Cli, backup, log},
    engine::{self, CorruptionRun, RunResult},
    rng::SeededRng,
    store::FileStore,
};

/// What a finished corruption did, for the summary line.
#[derive(Debug)]
pub struct RunReport {
    pub result: RunResult,
    pub seed: u64,
    pub backup: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn corruption_run(&self) -> CorruptionRun {
        let mut run = CorruptionRun::new(self.start_offset, self.end_offset, self.corruption_chance, self.rule_selector())
            .with_chunk_size(self.chunk_size);
        if self.log_file.is_some() {
            run = run.with_change_record();
        }
        run
    }
}

/// Backs up, corrupts and logs `args.file_path`, in that order.
///
/// Arguments are validated before the backup is taken, and the backup is complete before the
/// target is opened for writing.
pub fn corrupt(args: &Cli) -> Result<RunReport> {
    let params = args.corruption_run();
    params.validate()?;

    let backup = if args.save_original {
        let saved = backup::save_original(&args.file_path)
            .with_context(|| format!("couldn't back up {}", args.file_path.display()))?;
        Some(saved)
    } else {
        None
    };

    let mut rng = match args.seed {
        Some(seed) => SeededRng::new(seed),
        None => SeededRng::from_entropy().context("couldn't seed the random generator")?,
    };
    tracing::info!(event = "rng_seeded", seed = rng.seed(), "random generator seeded");

    let mut store =
        FileStore::open(&args.file_path).with_context(|| format!("couldn't open {}", args.file_path.display()))?;
    let result = engine::run(&mut store, &mut rng, &params)
        .with_context(|| format!("corrupting {} failed", store.path().display()))?;
    store
        .flush()
        .with_context(|| format!("couldn't flush {}", store.path().display()))?;

    if let (Some(path), Some(record)) = (&args.log_file, &result.changes) {
        log::write_change_log(path, record)?;
    }

    Ok(RunReport {
        result,
        seed: rng.seed(),
        backup,
        log_file: args.log_file.clone(),
    })
}
