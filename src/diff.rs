//! Set-algebraic signature diff and the severity merge policy.

use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;

use crate::core::{Bump, ChangeKind, Signature, SignatureChange};

/// Everything the diff step derives from two sealed signature sets.
#[derive(Clone, Debug)]
pub struct DiffOutcome {
    pub added: Vec<SignatureChange>,
    pub removed: Vec<SignatureChange>,
    pub required: Bump,
}

/// Compare current signatures against baseline ones and derive the required
/// severity.
///
/// Signature equality is structural over name, file and the full ordered
/// argument list, so a changed default or a reordered argument surfaces as
/// one removal plus one addition and therefore demands MAJOR. From a
/// caller's point of view the old shape is gone; the policy is deliberately
/// conservative about that.
pub fn diff_signatures(
    these: &[Signature],
    those: &[Signature],
    changed: &BTreeSet<PathBuf>,
) -> DiffOutcome {
    let this_set: HashSet<&Signature> = these.iter().collect();
    let that_set: HashSet<&Signature> = those.iter().collect();

    let added: Vec<SignatureChange> = these
        .iter()
        .filter(|signature| !that_set.contains(*signature))
        .map(|signature| SignatureChange {
            kind: ChangeKind::Added,
            signature: signature.clone(),
        })
        .collect();

    let removed: Vec<SignatureChange> = those
        .iter()
        .filter(|signature| !this_set.contains(*signature))
        .map(|signature| SignatureChange {
            kind: ChangeKind::Removed,
            signature: signature.clone(),
        })
        .collect();

    let mut required = Bump::None;
    if !changed.is_empty() {
        required = required.merge(Bump::Patch);
    }
    if !added.is_empty() {
        required = required.merge(Bump::Minor);
    }
    if !removed.is_empty() {
        required = required.merge(Bump::Major);
    }

    DiffOutcome {
        added,
        removed,
        required,
    }
}
