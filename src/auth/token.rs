//! Defines the token struct stored in the auth cookie.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::user::UserID;

/// A token for authorization and authentication.
///
/// The token is stored as JSON inside a private (encrypted and signed)
/// cookie, so the client can neither read nor forge it.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Token {
    /// The ID of the authenticated user.
    pub user_id: UserID,

    /// When the token stops being valid, as a unix timestamp to avoid
    /// date-time string formatting issues.
    #[serde(with = "time::serde::timestamp")]
    pub expires_at: OffsetDateTime,
}
