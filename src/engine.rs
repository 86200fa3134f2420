//! The corruption engine.
//!
//! A run walks a clamped, inclusive offset range in strides of `chunk_size` bytes. One random
//! draw per stride decides whether the whole stride is corrupted, so `chunk_size` trades an even
//! spread of damage for bursts of it. Inside a selected stride every byte gets the rule the
//! [`RuleSelector`] picks for its absolute offset.

use serde::Serialize;

use crate::error::{CorruptError, Result};
use crate::method::RuleSelector;
use crate::rng::RandomSource;
use crate::store::ByteStore;

/// Parameters of a single pass over a store.
#[derive(Clone, Debug)]
pub struct CorruptionRun {
    /// Requested first offset. Clamped into the store, may be negative.
    pub start: i64,
    /// Requested last offset, inclusive. Clamped to at least `start`.
    pub end: i64,
    /// Chance per stride. `<= 0` never corrupts, `>= 1` always does.
    pub probability: f64,
    pub chunk_size: usize,
    pub selector: RuleSelector,
    /// Keep a [`ChangeRecord`] of every mutated byte.
    pub record_changes: bool,
}

impl CorruptionRun {
    pub fn new(start: i64, end: i64, probability: f64, selector: RuleSelector) -> Self {
        Self {
            start,
            end,
            probability,
            chunk_size: 1,
            selector,
            record_changes: false,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_change_record(mut self) -> Self {
        self.record_changes = true;
        self
    }

    /// Checks the parameters that can be rejected without looking at the store.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size < 1 {
            return Err(CorruptError::InvalidArgument(format!(
                "chunk size must be at least 1, got {}",
                self.chunk_size
            )));
        }
        self.selector.check()
    }
}

/// An inclusive offset range known to lie inside the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub start: u64,
    pub end: u64,
}

impl Span {
    /// Clamps a requested range into a store of `len` bytes. `None` when the store is empty.
    pub fn clamp(start: i64, end: i64, len: u64) -> Option<Self> {
        let last = len.checked_sub(1)?;
        let clamp_one = |v: i64| if v <= 0 { 0 } else { (v as u64).min(last) };
        Some(Self {
            start: clamp_one(start),
            end: clamp_one(start.max(end)),
        })
    }

    pub const fn len(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// One mutated byte.
///
/// Serializes as `{"offset": .., "original_byte": ..}`. Despite its name, `original_byte` holds the
/// value written by the corruption, which keeps logs readable by tools built for the classic
/// corruptor log format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Change {
    pub offset: u64,
    #[serde(rename = "original_byte")]
    pub new_value: u8,
}

/// Every byte a run mutated, in ascending offset order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChangeRecord {
    changes: Vec<Change>,
}

impl ChangeRecord {
    pub const fn new() -> Self {
        Self { changes: Vec::new() }
    }

    pub fn push(&mut self, change: Change) {
        self.changes.push(change);
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &Change> {
        self.changes.iter()
    }
}

/// Outcome of a completed run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunResult {
    pub span: Span,
    /// Strides evaluated.
    pub strides: u64,
    /// Strides that won the random draw.
    pub strides_selected: u64,
    pub bytes_mutated: u64,
    /// Present only when the run asked for it.
    pub changes: Option<ChangeRecord>,
}

/// Corrupts `store` in place according to `params`.
///
/// Parameters are validated before the store is touched. A store error aborts the run and leaves
/// whatever was already written in place.
pub fn run<S, R>(store: &mut S, rng: &mut R, params: &CorruptionRun) -> Result<RunResult>
where
    S: ByteStore + ?Sized,
    R: RandomSource + ?Sized,
{
    params.validate()?;
    let span = Span::clamp(params.start, params.end, store.len()).ok_or(CorruptError::EmptyStore)?;
    let run_span = tracing::info_span!("corruption_run", start = span.start, end = span.end, selector = %params.selector);
    let _enter = run_span.enter();

    if span.start as i64 != params.start || span.end as i64 != params.end {
        tracing::debug!(
            event = "range_clamped",
            requested_start = params.start,
            requested_end = params.end,
            start = span.start,
            end = span.end,
            "requested range clamped to store"
        );
    }

    let chunk = params.chunk_size as u64;
    let mut changes = params.record_changes.then(ChangeRecord::new);
    let mut strides = 0u64;
    let mut strides_selected = 0u64;
    let mut bytes_mutated = 0u64;

    let mut stride_start = span.start;
    loop {
        strides += 1;
        // one draw per stride, never per byte
        if rng.next_unit() < params.probability {
            strides_selected += 1;
            let stride_end = stride_start.saturating_add(chunk - 1).min(span.end);
            tracing::debug!(event = "stride_selected", start = stride_start, end = stride_end);

            for offset in stride_start..=stride_end {
                let byte = store.read(offset)?;
                let corrupted = params.selector.method_for(offset).apply(byte, rng);
                store.write(offset, corrupted)?;
                bytes_mutated += 1;
                if let Some(record) = changes.as_mut() {
                    record.push(Change {
                        offset,
                        new_value: corrupted,
                    });
                }
            }
        }

        match stride_start.checked_add(chunk) {
            Some(next) if next <= span.end => stride_start = next,
            _ => break,
        }
    }

    tracing::info!(
        event = "run_complete",
        strides,
        strides_selected,
        bytes_mutated,
        "corruption run finished"
    );

    Ok(RunResult {
        span,
        strides,
        strides_selected,
        bytes_mutated,
        changes,
    })
}
