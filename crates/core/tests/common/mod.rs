//! Shared fixtures for reducer and director client tests.

#![allow(dead_code)]

pub mod stub_server;

use std::{collections::VecDeque, sync::Mutex};

use async_trait::async_trait;
use bosh_stats_core::{BoshStatsError, Event, EventSource, EventsFilter, Result};
use reqwest::StatusCode;
use serde_json::Value;

/// Event source that replays a fixed list of page results and records the
/// filters it was asked for.
pub struct ScriptedSource {
    pages: Mutex<VecDeque<Result<Vec<Event>>>>,
    requests: Mutex<Vec<EventsFilter>>,
}

impl ScriptedSource {
    pub fn new(pages: Vec<Result<Vec<Event>>>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn from_json(pages: Vec<Value>) -> Self {
        Self::new(pages.into_iter().map(|page| Ok(events(page))).collect())
    }

    pub fn requests(&self) -> Vec<EventsFilter> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventSource for ScriptedSource {
    async fn fetch_events(&self, filter: &EventsFilter) -> Result<Vec<Event>> {
        self.requests.lock().unwrap().push(filter.clone());
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected fetch with {filter:?}"))
    }
}

pub fn events(page: Value) -> Vec<Event> {
    serde_json::from_value(page).unwrap()
}

pub fn director_failure() -> BoshStatsError {
    BoshStatsError::Director {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: "sorry bro".to_string(),
    }
}

/// Six events covering every classification branch; two are countable.
pub fn one_page() -> Value {
    serde_json::json!([
        {
            "id": "6", "action": "create", "error": "", "object_type": "deployment",
            "object_name": "depl1_that_shouldnt_be_counted_with_no_context",
            "deployment": "bla1", "task": "6"
        },
        {
            "id": "5", "action": "create", "error": "", "object_type": "deployment",
            "object_name": "depl1", "deployment": "bla1", "task": "6",
            "context": {"new name": "depl2"}
        },
        {
            "id": "4", "action": "create", "error": "didn't go well",
            "object_type": "deployment", "object_name": "failed_deployment",
            "deployment": "bla1", "task": "7", "context": {"new name": "depl2"}
        },
        {
            "id": "3", "action": "delete", "error": "", "object_type": "deployment",
            "object_name": "depl1", "deployment": "bla2", "task": "8",
            "context": {"new name": "depl2"}
        },
        {
            "id": "2", "action": "update", "timestamp": 1448000000, "error": "",
            "object_type": "deployment", "object_name": "depl1", "deployment": "bla2",
            "task": "9",
            "context": {
                "before": {
                    "releases": ["cf/122"],
                    "stemcells": ["bosh-aws-xen-hvm-ubuntu-trusty-go_agent/3312.12"]
                },
                "after": {
                    "releases": ["cf/123"],
                    "stemcells": ["bosh-aws-xen-hvm-ubuntu-trusty-go_agent/3312.12"]
                }
            }
        },
        {
            "id": "1", "action": "create", "error": "", "object_type": "spleloymnt",
            "object_name": "depl1", "deployment": "bla1", "task": "9",
            "context": {"new name": "depl2"}
        }
    ])
}

/// First of two pages for a page size of three.
pub fn first_of_many() -> Value {
    serde_json::json!([
        {
            "id": "4", "action": "create", "error": "", "user": "not-repave",
            "object_type": "deployment", "object_name": "depl1", "deployment": "bla1",
            "task": "6", "context": {"new name": "depl1"}
        },
        {
            "id": "3", "action": "create", "error": "FAAAAAAAAAAILED", "user": "not-repave",
            "object_type": "deployment", "object_name": "failed_deployment",
            "deployment": "bla1", "task": "6"
        },
        {
            "id": "2", "action": "create", "error": "", "user": "MyCustomRepaveUserInProd",
            "object_type": "deployment", "object_name": "", "deployment": "bla1",
            "task": "6", "context": {"new name": "depl1"}
        }
    ])
}

/// A single release update on deployment `bla2`.
pub fn release_update(before: Value, after: Value) -> Value {
    serde_json::json!([
        {
            "id": "1", "action": "update", "timestamp": 1448000000, "error": "",
            "user": "not-repave", "object_type": "deployment", "object_name": "depl1",
            "deployment": "bla2", "task": "7",
            "context": {
                "before": {"releases": before},
                "after": {"releases": after}
            }
        }
    ])
}
