//! Declared-version analysis.
//!
//! A version string splits at the first pre-release or build separator into
//! a dotted numeric core and an optional suffix. Only the numeric component
//! matching the required bump granularity is compared; suffixes themselves
//! are never interpreted beyond marking the version as a non-release.

use thiserror::Error;

use super::Bump;

/// A version string whose numeric core cannot be analyzed. Configuration
/// level, not recoverable.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("version {version:?} has no {component} component")]
    MissingComponent {
        version: String,
        component: &'static str,
    },
    #[error("version {version:?} has a non-numeric {component} component {found:?}")]
    NonNumericComponent {
        version: String,
        component: &'static str,
        found: String,
    },
}

/// Whether `this` advances enough over `that` for the required bump.
///
/// When both strings are releases the baseline component must be strictly
/// exceeded. A pre-release or build-tagged version on either side relaxes
/// the check to "no regression".
pub fn is_acceptable(this: &str, that: &str, required: Bump) -> Result<bool, VersionError> {
    if required == Bump::None {
        return Ok(true);
    }

    let (actual, actual_is_release) = extract(this, required)?;
    let (mut baseline, baseline_is_release) = extract(that, required)?;

    if actual_is_release && baseline_is_release {
        baseline += 1;
    }

    Ok(actual >= baseline)
}

/// The numeric component of `version` at the granularity of `required`,
/// plus whether the string denotes a release.
fn extract(version: &str, required: Bump) -> Result<(u64, bool), VersionError> {
    debug_assert!(required != Bump::None, "NONE requires no version analysis");

    let (core, is_release) = match version.split_once(['-', '+']) {
        Some((core, _)) => (core, false),
        None => (version, true),
    };

    let component = match required {
        Bump::Major => "major",
        Bump::Minor => "minor",
        _ => "patch",
    };
    let index = 3 - required.value() as usize;

    let found = core
        .split('.')
        .nth(index)
        .ok_or_else(|| VersionError::MissingComponent {
            version: version.to_string(),
            component,
        })?;

    let number = found
        .parse::<u64>()
        .map_err(|_| VersionError::NonNumericComponent {
            version: version.to_string(),
            component,
            found: found.to_string(),
        })?;

    Ok((number, is_release))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_releases_do_not_cover_a_patch() {
        assert_eq!(is_acceptable("1.2.3", "1.2.3", Bump::Patch), Ok(false));
    }

    #[test]
    fn the_next_patch_release_does() {
        assert_eq!(is_acceptable("1.2.4", "1.2.3", Bump::Patch), Ok(true));
    }

    #[test]
    fn a_pre_release_skips_the_increment() {
        assert_eq!(is_acceptable("1.2.3-rc.1", "1.2.3", Bump::Patch), Ok(true));
    }

    #[test]
    fn build_metadata_also_counts_as_non_release() {
        assert_eq!(is_acceptable("2.0.0", "2.0.0-asdf+1234", Bump::Major), Ok(true));
    }

    #[test]
    fn each_granularity_reads_its_own_component() {
        assert_eq!(is_acceptable("2.0.0", "1.9.9", Bump::Major), Ok(true));
        assert_eq!(is_acceptable("1.3.0", "1.2.9", Bump::Minor), Ok(true));
        assert_eq!(is_acceptable("1.2.9", "1.2.9", Bump::Minor), Ok(false));
    }

    #[test]
    fn none_is_always_acceptable() {
        assert_eq!(is_acceptable("junk", "also junk", Bump::None), Ok(true));
    }

    #[test]
    fn a_non_numeric_component_is_fatal() {
        let err = is_acceptable("1.2.x", "1.2.3", Bump::Patch).unwrap_err();
        assert_eq!(
            err,
            VersionError::NonNumericComponent {
                version: "1.2.x".to_string(),
                component: "patch",
                found: "x".to_string(),
            }
        );
    }

    #[test]
    fn a_short_core_is_fatal() {
        let err = is_acceptable("1.2", "1.2.3", Bump::Patch).unwrap_err();
        assert_eq!(
            err,
            VersionError::MissingComponent {
                version: "1.2".to_string(),
                component: "patch",
            }
        );
    }
}
