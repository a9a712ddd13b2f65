use std::fmt;

use regex::Regex;
use semver::Version;
use tracing::trace;

use crate::{
    classify::is_deployment,
    error::Result,
    types::{ContextSide, Event},
};

/// A release version ordered by semver precedence.
///
/// Directors report some releases with a bare major (`"123"`); those are read
/// as `123.0.0`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReleaseVersion(Version);

impl ReleaseVersion {
    pub fn parse(raw: &str) -> Option<Self> {
        Version::parse(raw)
            .or_else(|_| Version::parse(&format!("{raw}.0.0")))
            .ok()
            .map(Self)
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Detects events where `release` moved up to exactly `version`.
///
/// The target on the after side is compared literally, while the before side
/// is reduced to its highest semver. An event matches only when the target
/// is strictly newer than everything the deployment ran before.
#[derive(Debug, Clone)]
pub struct ReleaseTransition {
    release: String,
    version: String,
    pattern: Regex,
}

impl ReleaseTransition {
    pub fn new(release: impl Into<String>, version: impl Into<String>) -> Result<Self> {
        let release = release.into();
        let pattern = Regex::new(&format!("^{}/(.*)$", regex::escape(&release)))?;
        Ok(Self {
            release,
            version: version.into(),
            pattern,
        })
    }

    pub fn release(&self) -> &str {
        &self.release
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Version suffix of a `<name>/<version>` entry belonging to this release.
    fn captured_version<'a>(&self, entry: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(entry)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Context-only check; ignores action, error and user.
    pub fn matches(&self, event: &Event) -> bool {
        let (Some(before), Some(after)) = (
            event.releases(ContextSide::Before),
            event.releases(ContextSide::After),
        ) else {
            trace!(event_id = %event.id, "context has no before/after release lists");
            return false;
        };

        let mut latest_before = None;
        for raw in before.iter().filter_map(|entry| self.captured_version(entry)) {
            let Some(parsed) = ReleaseVersion::parse(raw) else {
                trace!(event_id = %event.id, version = raw, "unparsable release version");
                return false;
            };
            latest_before = latest_before.max(Some(parsed));
        }
        let Some(latest_before) = latest_before else {
            return false;
        };

        let target_present = after
            .iter()
            .filter_map(|entry| self.captured_version(entry))
            .any(|raw| raw == self.version);
        if !target_present {
            return false;
        }

        ReleaseVersion::parse(&self.version).is_some_and(|target| target > latest_before)
    }

    /// A successful deployment event whose context shows this transition.
    pub fn is_transition_event(&self, event: &Event) -> bool {
        is_deployment(event) && self.matches(event)
    }
}

/// One-shot form of [`ReleaseTransition::matches`]. A release name whose
/// pattern cannot be compiled matches nothing; use [`ReleaseTransition::new`]
/// to see that error.
pub fn is_release_transition(event: &Event, release: &str, version: &str) -> bool {
    ReleaseTransition::new(release, version).is_ok_and(|transition| transition.matches(event))
}
