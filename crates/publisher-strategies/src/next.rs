//! Next version computation and validation

use std::cmp::Ordering;

use publisher_core::config::VersioningConfig;
use publisher_core::error::{Result, VersionError};
use publisher_core::types::{ReleaseLevel, VersionInfo, VersionSystem};
use tracing::{debug, info, instrument, warn};

use crate::registry::StrategyRegistry;
use crate::traits::VersionStrategy;

/// Version system in effect: forced by config, else the last release's
fn effective_system(last: Option<&VersionInfo>, versioning: &VersioningConfig) -> VersionSystem {
    versioning
        .forced_system()
        .or(last.map(|l| l.version_system))
        .unwrap_or(VersionSystem::Semver)
}

fn strategy(system: VersionSystem) -> Result<std::sync::Arc<dyn VersionStrategy>> {
    StrategyRegistry::new().get(system).ok_or_else(|| {
        VersionError::InvalidFormat(format!("no strategy numbers '{}' versions", system)).into()
    })
}

/// Compute the next version.
///
/// `level` is the classifier verdict; `None` aborts with
/// [`VersionError::NoBumpRequired`] unless `patch_on_undetermined` is set.
/// An explicit `next_version` wins over computation but is still validated.
#[instrument(skip(last, versioning), fields(last = last.map(|l| l.version.as_str())))]
pub fn next_version(
    last: Option<&VersionInfo>,
    level: Option<ReleaseLevel>,
    versioning: &VersioningConfig,
) -> Result<String> {
    let system = effective_system(last, versioning);

    if let Some(explicit) = versioning.next_version.as_deref().filter(|v| !v.trim().is_empty()) {
        info!(next = explicit, "using configured next version");
        validate_next_version(last, explicit, system)?;
        return Ok(explicit.trim().to_string());
    }

    if system == VersionSystem::Manual {
        return Err(VersionError::ManualVersionRequired.into());
    }
    let strategy = strategy(system)?;

    let Some(last) = last else {
        let first = strategy.first_release();
        info!(next = first, system = %system, "first release");
        return Ok(first.to_string());
    };

    let level = match level {
        Some(level) => level,
        None if versioning.patch_on_undetermined => {
            warn!("no releasable commits, releasing a patch");
            ReleaseLevel::Patch
        }
        None => return Err(VersionError::NoBumpRequired.into()),
    };

    let next = strategy.next(&last.version, level, versioning.prerelease_id.as_deref())?;
    debug!(last = %last.version, next = %next, level = %level, "next version computed");
    Ok(next)
}

/// Check that `next` is valid for `system` and strictly greater than `last`
pub fn validate_next_version(
    last: Option<&VersionInfo>,
    next: &str,
    system: VersionSystem,
) -> Result<()> {
    let system = match system {
        VersionSystem::Manual => VersionSystem::infer(next),
        other => other,
    };
    let strategy = strategy(system)?;

    if !strategy.is_valid(next) {
        return Err(VersionError::InvalidFormat(format!(
            "'{}' is not a valid {} version",
            next, system
        ))
        .into());
    }

    if let Some(last) = last {
        if strategy.compare(next, &last.version)? != Ordering::Greater {
            return Err(VersionError::NotGreater {
                last: last.version.clone(),
                next: next.to_string(),
            }
            .into());
        }
    }
    Ok(())
}
