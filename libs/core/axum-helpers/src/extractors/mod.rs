pub mod bearer;
pub mod validated_json;

pub use bearer::CallerIdentity;
pub use validated_json::ValidatedJson;
