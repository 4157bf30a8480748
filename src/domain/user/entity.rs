use serde::{Deserialize, Serialize};

/// A registered account. Immutable after registration except deletion,
/// which cascades to the user's reviews.
///
/// The credential hash is produced by the auth collaborator and stored
/// opaquely; this crate never hashes or compares passwords.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,

    #[serde(skip_serializing)]
    pub password_hash: String,
}
