// Resume upload API: multipart intake, extraction, analysis.
// Parsing runs on the blocking pool; the completion call is awaited after it.

pub mod handlers;
pub mod upload;
