use crate::types::Event;

pub const DEPLOYMENT_OBJECT_TYPE: &str = "deployment";

/// A successful create/update of a deployment that carries a context payload.
pub fn is_deployment(event: &Event) -> bool {
    event.object_type == DEPLOYMENT_OBJECT_TYPE
        && matches!(event.action.as_str(), "create" | "update")
        && event.error.is_empty()
        && event.context_map().is_some_and(|context| !context.is_empty())
}

/// Whether the event's user should count toward deploy totals.
/// With no excluded user every event counts.
pub fn is_countable_user(event: &Event, excluded_user: Option<&str>) -> bool {
    excluded_user.is_none_or(|excluded| event.user != excluded)
}
