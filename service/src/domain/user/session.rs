//! [`Session`] definitions.

use std::time::Duration;

use common::{datetime::of, DateTime, DateTimeOf};
use derive_more::{AsRef, Display, FromStr};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::domain::User;
use crate::domain::user;

/// Authenticated session of a [`User`], carried in [JWT] claims.
///
/// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct Session {
    /// ID of the [`User`] this [`Session`] belongs to.
    pub user_id: user::Id,

    /// [`DateTime`] when this [`Session`] expires.
    #[serde(rename = "exp", with = "common::datetime::serde::unix_timestamp")]
    pub expires_at: ExpirationDateTime,
}

impl Session {
    /// Starts a new [`Session`] of the [`User`] with the provided ID, lasting
    /// for the provided `ttl` from now.
    #[must_use]
    pub fn start(user_id: user::Id, ttl: Duration) -> Self {
        Self {
            user_id,
            expires_at: (DateTime::now() + ttl).coerce(),
        }
    }

    /// Signs this [`Session`] into a [`Token`] with the provided `key`.
    ///
    /// # Errors
    ///
    /// If the `key` is unsuitable for signing.
    pub fn sign(
        &self,
        key: &EncodingKey,
    ) -> Result<Token, jsonwebtoken::errors::Error> {
        jsonwebtoken::encode(&Header::default(), self, key).map(Token)
    }
}

/// Signed [`Session`], handed to its [`User`] as an access token.
#[derive(AsRef, Clone, Debug, Display, FromStr)]
pub struct Token(String);

impl Token {
    /// Creates a new [`Token`] without checking its contents.
    ///
    /// # Safety
    ///
    /// The provided `token` must be a valid [`Token`] representation.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(token: String) -> Self {
        Self(token)
    }

    /// Verifies this [`Token`] with the provided `key`, returning the
    /// [`Session`] it carries.
    ///
    /// # Errors
    ///
    /// If this [`Token`] is malformed, forged or expired.
    pub fn verify(
        &self,
        key: &DecodingKey,
    ) -> Result<Session, jsonwebtoken::errors::Error> {
        jsonwebtoken::decode(&self.0, key, &Validation::default())
            .map(|data| data.claims)
    }
}

/// [`DateTime`] of a [`Session`] expiration.
pub type ExpirationDateTime = DateTimeOf<(Session, of::Expiration)>;

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::DateTimeOf;
    use jsonwebtoken::{errors::ErrorKind, DecodingKey, EncodingKey};

    use super::Session;
    use crate::domain::user;

    const SECRET: &[u8] = b"session-secret";

    #[test]
    fn verifies_signed_session() {
        let session = Session::start(user::Id::new(), Duration::from_secs(60));

        let token = session.sign(&EncodingKey::from_secret(SECRET)).unwrap();
        let verified = token
            .verify(&DecodingKey::from_secret(SECRET))
            .unwrap();

        assert_eq!(verified.user_id, session.user_id);
        assert_eq!(
            verified.expires_at.unix_timestamp(),
            session.expires_at.unix_timestamp(),
        );
    }

    #[test]
    fn rejects_foreign_signature() {
        let session = Session::start(user::Id::new(), Duration::from_secs(60));

        let token = session.sign(&EncodingKey::from_secret(SECRET)).unwrap();

        assert_eq!(
            token
                .verify(&DecodingKey::from_secret(b"another-secret"))
                .unwrap_err()
                .kind(),
            &ErrorKind::InvalidSignature,
        );
    }

    #[test]
    fn rejects_expired_session() {
        let session = Session {
            user_id: user::Id::new(),
            expires_at: DateTimeOf::from_unix_timestamp(1_000).unwrap(),
        };

        let token = session.sign(&EncodingKey::from_secret(SECRET)).unwrap();

        assert_eq!(
            token
                .verify(&DecodingKey::from_secret(SECRET))
                .unwrap_err()
                .kind(),
            &ErrorKind::ExpiredSignature,
        );
    }
}
