//! Boundary to the system that consumes verdicts.
//!
//! The verifier emits exactly one verdict per candidate; the sink decides what
//! persistence and reporting mean. A candidate is persisted only on a valid
//! verdict, and an invalid verdict never touches stored state or the
//! watermark.

use crate::{
    error::KeyshareError,
    verification::{verify_key_shares, CandidateKeyShare, InvalidityReason, VerificationVerdict},
};
use ark_ec::pairing::Pairing;
use ark_std::rand::RngCore;
use core::sync::atomic::{AtomicU64, Ordering};
use digest::Digest;

/// Highest height for which a valid key share has been confirmed so far.
/// Monotonically non-decreasing; concurrent advances serialize through
/// `fetch_max`, so out-of-order application of a lower height after a higher
/// one never regresses it.
#[derive(Debug, Default)]
pub struct LatestHeightWatermark(AtomicU64);

impl LatestHeightWatermark {
    pub fn new(height: u64) -> Self {
        Self(AtomicU64::new(height))
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    /// Advance to `height`; no-op unless strictly greater than the current
    /// value. Returns whether the watermark moved.
    pub fn advance_if_greater(&self, height: u64) -> bool {
        self.0.fetch_max(height, Ordering::AcqRel) < height
    }
}

/// Operations the surrounding system provides for verification outcomes.
/// `persist` and `advance_watermark_if_greater` are called only on valid
/// verdicts, `report_failure` only on invalid ones and it must not affect
/// stored state.
pub trait VerificationOutcomeSink {
    fn persist(&self, share: &CandidateKeyShare);

    fn advance_watermark_if_greater(&self, height: u64);

    fn report_failure(&self, submitter: &str, height: u64, reason: InvalidityReason);
}

/// Verify every candidate of a scanned batch and route each verdict to the
/// sink. A malformed or wrong candidate produces one failure report and the
/// batch continues; only an internal defect (probe encryption failing on a
/// well-formed key) aborts with `Err`.
pub fn process_key_shares<E: Pairing, D: Digest, R: RngCore, S: VerificationOutcomeSink>(
    rng: &mut R,
    candidates: &[CandidateKeyShare],
    sink: &S,
) -> Result<(), KeyshareError> {
    let verdicts = verify_key_shares::<E, D, _>(rng, candidates)?;
    for (candidate, verdict) in candidates.iter().zip(verdicts) {
        match verdict {
            VerificationVerdict::Valid => {
                sink.persist(candidate);
                sink.advance_watermark_if_greater(candidate.height);
            }
            VerificationVerdict::Invalid(reason) => {
                sink.report_failure(&candidate.submitter, candidate.height, reason);
            }
        }
    }
    Ok(())
}

/// Reference sink keeping everything in memory: key shares by height, the
/// watermark and a failure log. Intended for tests and as a template for real
/// sink implementations.
#[cfg(feature = "std")]
pub mod in_memory {
    use super::*;
    use std::{collections::BTreeMap, string::String, sync::Mutex, vec::Vec};

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ReportedFailure {
        pub submitter: String,
        pub height: u64,
        pub reason: InvalidityReason,
    }

    #[derive(Debug, Default)]
    pub struct InMemoryOutcomeSink {
        pub store: Mutex<BTreeMap<u64, CandidateKeyShare>>,
        pub watermark: LatestHeightWatermark,
        pub failures: Mutex<Vec<ReportedFailure>>,
    }

    impl VerificationOutcomeSink for InMemoryOutcomeSink {
        fn persist(&self, share: &CandidateKeyShare) {
            self.store
                .lock()
                .unwrap()
                .insert(share.height, share.clone());
        }

        fn advance_watermark_if_greater(&self, height: u64) {
            self.watermark.advance_if_greater(height);
        }

        fn report_failure(&self, submitter: &str, height: u64, reason: InvalidityReason) {
            self.failures.lock().unwrap().push(ReportedFailure {
                submitter: submitter.into(),
                height,
                reason,
            });
        }
    }
}
