// CV matching: retrieval over the startup-built index plus recruiter-style synthesis.
// All generation calls go through llm_client via the ChatModel trait.

pub mod handlers;
pub mod prompts;
pub mod retrieval;
pub mod service;

#[cfg(test)]
pub mod testing;

pub use service::Recruiter;
