/// Maps domain errors onto HTTP responses
pub mod error_handling;
/// Resolves the signed-in user from the request
pub mod session;
