//! Use cases (application services)

pub mod research_session;
