use crate::recruiter::Recruiter;

/// Shared application state injected into all route handlers via Axum extractors.
/// Cloning is cheap: the recruiter holds its index and clients behind `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub recruiter: Recruiter,
}
