//! Backward pagination over director events.
//!
//! Both reductions walk the event history newest to oldest, one page at a
//! time, and move the `before_id` cursor to the oldest event of each page.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::{
    calendar::CalendarWindow,
    classify::{is_countable_user, is_deployment},
    error::{BoshStatsError, Result},
    release::ReleaseTransition,
    source::EventSource,
    types::{Event, EventsFilter, RunningCount},
};

/// Fold one page of events into the running count.
pub fn fold_page(
    mut counts: RunningCount,
    events: &[Event],
    excluded_user: Option<&str>,
) -> RunningCount {
    for event in events
        .iter()
        .filter(|e| is_deployment(e) && is_countable_user(e, excluded_user))
    {
        *counts.entry(event.deployment_name.clone()).or_insert(0) += 1;
    }
    counts
}

/// Count successful deploys per deployment, starting from `filter`.
///
/// Stops on an empty page, or after folding a page shorter than `page_size`,
/// so `page_size` must not exceed what the source returns per page.
/// A failed fetch aborts the walk with [`BoshStatsError::Incomplete`].
pub async fn count_successful_deploys<S>(
    source: &S,
    filter: EventsFilter,
    page_size: usize,
    excluded_user: Option<&str>,
) -> Result<RunningCount>
where
    S: EventSource + ?Sized,
{
    let mut counts = RunningCount::new();
    let mut filter = filter;
    let mut pages = 0usize;

    loop {
        let events = match source.fetch_events(&filter).await {
            Ok(events) => events,
            Err(err) => {
                return Err(BoshStatsError::Incomplete {
                    partial: counts,
                    source: Box::new(err),
                });
            }
        };
        pages += 1;
        debug!(
            page = pages,
            len = events.len(),
            before_id = filter.before_id.as_deref(),
            "fetched events page"
        );

        let Some(oldest) = events.last() else {
            break;
        };
        let next = filter.with_before_id(oldest.id.clone());

        counts = fold_page(counts, &events, excluded_user);

        if events.len() < page_size {
            break;
        }
        filter = next;
    }

    info!(pages, deployments = counts.len(), "deploy count complete");
    Ok(counts)
}

/// Find the timestamp of the newest deployment that moved `transition`'s
/// release up to its target version.
///
/// Walks back until a page holds a match or the director returns an empty
/// page. Short pages are not a stop signal here.
pub async fn find_transition_timestamp<S>(
    source: &S,
    transition: &ReleaseTransition,
    page_size: usize,
) -> Result<DateTime<Utc>>
where
    S: EventSource + ?Sized,
{
    let mut filter = EventsFilter::default();
    let mut pages = 0usize;

    loop {
        let events = source.fetch_events(&filter).await?;
        pages += 1;
        debug!(
            page = pages,
            len = events.len(),
            short = events.len() < page_size,
            before_id = filter.before_id.as_deref(),
            "scanning events page"
        );

        let Some(oldest) = events.last() else {
            return Err(BoshStatsError::ReleaseNotFound {
                release: transition.release().to_string(),
                version: transition.version().to_string(),
            });
        };

        if let Some(event) = events.iter().find(|e| transition.is_transition_event(e)) {
            info!(pages, event_id = %event.id, "release transition found");
            return event
                .timestamp
                .ok_or_else(|| BoshStatsError::MissingTimestamp {
                    id: event.id.clone(),
                });
        }

        filter = filter.with_before_id(oldest.id.clone());
    }
}

/// Count successful deploys in the calendar month `calendar_month` (`YYYY/MM`).
pub async fn count_deploys<S>(
    source: &S,
    calendar_month: &str,
    page_size: usize,
    excluded_user: Option<&str>,
) -> Result<RunningCount>
where
    S: EventSource + ?Sized,
{
    let window = CalendarWindow::parse(calendar_month)?;
    count_successful_deploys(source, window.filter(), page_size, excluded_user).await
}

/// When did `release` first reach `version` across the fleet's history.
pub async fn find_release_transition_time<S>(
    source: &S,
    release: &str,
    version: &str,
    page_size: usize,
) -> Result<DateTime<Utc>>
where
    S: EventSource + ?Sized,
{
    let transition = ReleaseTransition::new(release, version)?;
    find_transition_timestamp(source, &transition, page_size).await
}
