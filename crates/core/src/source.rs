use async_trait::async_trait;

use crate::{
    error::Result,
    types::{Event, EventsFilter},
};

/// Anything that can hand out pages of director events, newest first.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn fetch_events(&self, filter: &EventsFilter) -> Result<Vec<Event>>;
}

