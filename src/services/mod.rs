//! HTTP service modules, one per routed resource.

pub mod feedback;
