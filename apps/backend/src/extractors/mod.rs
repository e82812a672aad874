pub mod current_user;
pub mod if_match;
pub mod match_id;
pub mod validated_json;

pub use current_user::CurrentUser;
pub use if_match::ExpectedVersion;
pub use match_id::MatchId;
pub use validated_json::ValidatedJson;
