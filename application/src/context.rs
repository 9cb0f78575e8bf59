//! [`Context`]-related definitions.

use std::{
    future,
    sync::atomic::{self, AtomicU16},
};

use axum::{async_trait, extract::FromRequestParts, RequestPartsExt as _};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use common::DateTime;
use juniper::{
    http::{GraphQLBatchResponse, GraphQLResponse},
    IntoFieldError as _,
};
use service::{
    command::{self, Command as _},
    domain::{self, user::session},
};
use tokio::sync::OnceCell;

#[cfg(doc)]
use crate::api::User;
use crate::{api, define_error, AsError, Error, JuniperResponse, Service};

/// Context of a single GraphQL request.
#[derive(Debug)]
pub struct Context {
    /// [`Service`] executing the request.
    service: Service,

    /// HTTP status code to respond with on error.
    error_status_code: AtomicU16,

    /// Parts of the HTTP request.
    parts: http::request::Parts,

    /// [`Session`] the request is performed in.
    session: OnceCell<Session>,

    /// [`Error`] of resolving the [`Session`] out of the request.
    auth_error: OnceCell<Error>,
}

impl Context {
    /// Returns the [`Service`] executing the request.
    #[must_use]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Returns the HTTP status code to respond with on error.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn error_status_code(&self) -> http::StatusCode {
        http::StatusCode::from_u16(
            self.error_status_code.load(atomic::Ordering::Relaxed),
        )
        .expect("invalid status code")
    }

    /// Overrides the HTTP status code to respond with on error.
    pub fn set_error_status_code(&self, status_code: http::StatusCode) {
        self.error_status_code
            .store(status_code.as_u16(), atomic::Ordering::Relaxed);
    }

    /// Returns a [`Result::map_err()`] closure, recording the status code of
    /// the passed [`Error`] in this [`Context`].
    pub fn error(&self) -> impl FnOnce(Error) -> Error + '_ {
        move |err| {
            self.set_error_status_code(err.status_code);
            err
        }
    }

    /// Binds the provided [`Session`] to the rest of the request.
    ///
    /// No-op if a [`Session`] has been resolved already.
    pub async fn set_current_session(&self, session: Session) {
        _ = self.session.get_or_init(|| future::ready(session)).await;
    }

    /// Returns the [`Session`] the request is performed in, if any.
    ///
    /// # Errors
    ///
    /// Errors if the provided access token is invalid.
    pub async fn try_current_session(&self) -> Result<Option<Session>, Error> {
        let unauthorized = Error::from(AuthError::AuthorizationRequired);
        match self.current_session().await {
            Ok(session) => Ok(Some(session)),
            Err(e) if e.code == unauthorized.code => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Returns the [`Session`] the request is performed in.
    ///
    /// # Errors
    ///
    /// Errors if:
    /// - the request carries no access token;
    /// - the provided access token is invalid.
    pub async fn current_session(&self) -> Result<Session, Error> {
        if let Some(session) = self.session.get() {
            return Ok(session.clone());
        }
        if let Some(e) = self.auth_error.get() {
            return Err(e.clone());
        }

        match self.authenticate().await {
            Ok(session) => Ok(self
                .session
                .get_or_init(|| future::ready(session))
                .await
                .clone()),
            Err(e) => Err(self
                .auth_error
                .get_or_init(|| future::ready(e))
                .await
                .clone()),
        }
    }

    /// Returns ID of the authenticated [`User`].
    ///
    /// # Errors
    ///
    /// See [`Context::current_session()`].
    pub async fn my_id(&self) -> Result<domain::user::Id, Error> {
        self.current_session().await.map(|s| s.user_id.into())
    }

    /// Resolves the [`Session`] out of the `Authorization` header.
    ///
    /// # Errors
    ///
    /// Errors if the header is absent or invalid.
    async fn authenticate(&self) -> Result<Session, Error> {
        let TypedHeader(Authorization(bearer)) = self
            .parts
            .clone()
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|e| {
                if e.is_missing() {
                    Error::from(AuthError::AuthorizationRequired)
                } else {
                    e.into_error()
                }
            })
            .map_err(self.error())?;

        #[expect(unsafe_code, reason = "specified in correct header")]
        let token =
            unsafe { session::Token::new_unchecked(bearer.token().to_owned()) };
        self.service
            .execute(command::AuthorizeUserSession {
                token: token.clone(),
            })
            .await
            .map(|s| Session {
                user_id: s.user_id.into(),
                token,
                expires_at: s.expires_at.coerce(),
            })
            .map_err(AsError::into_error)
            .map_err(self.error())
    }
}

impl juniper::Context for Context {}

#[async_trait]
impl<S> FromRequestParts<S> for Context
where
    S: Send + Sync,
{
    type Rejection = JuniperResponse;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        let Some(service) = parts.extensions.get::<Service>().cloned() else {
            let err = Error::internal(&"missing `Service` extension");
            return Err(JuniperResponse {
                status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
                response: GraphQLBatchResponse::Single(GraphQLResponse::error(
                    err.into_field_error(),
                )),
            });
        };

        Ok(Self {
            service,
            error_status_code: AtomicU16::new(
                http::StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            ),
            parts: parts.clone(),
            session: OnceCell::new(),
            auth_error: OnceCell::new(),
        })
    }
}

/// Authenticated session of a [`User`].
#[derive(Clone, Debug)]
pub struct Session {
    /// ID of the [`User`] this [`Session`] belongs to.
    pub user_id: api::user::Id,

    /// Access token of this [`Session`].
    pub token: session::Token,

    /// [`DateTime`] when this [`Session`] expires.
    pub expires_at: DateTime,
}

impl From<&command::create_user_session::Output> for Session {
    fn from(output: &command::create_user_session::Output) -> Self {
        Self {
            user_id: output.user.id.into(),
            token: output.token.clone(),
            expires_at: output.expires_at.coerce(),
        }
    }
}

impl AsError for command::authorize_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InvalidToken(_) | Self::UserNotExists(_) => {
                Some(AuthError::AuthorizationRequired.into())
            }
        }
    }
}

define_error! {
    enum AuthError {
        #[code = "AUTHORIZATION_REQUIRED"]
        #[status = UNAUTHORIZED]
        #[message = "Authorization required"]
        AuthorizationRequired,
    }
}

#[cfg(test)]
mod spec {
    use jsonwebtoken::errors::ErrorKind;
    use service::{command::authorize_user_session::ExecutionError, domain};

    use crate::AsError as _;

    #[test]
    fn rejects_unusable_tokens() {
        let errors = [
            ExecutionError::InvalidToken(ErrorKind::ExpiredSignature.into()),
            ExecutionError::InvalidToken(ErrorKind::InvalidSignature.into()),
            ExecutionError::UserNotExists(domain::user::Id::new()),
        ];

        for e in errors {
            let e = e.try_as_error().unwrap();
            assert_eq!(e.code, "AUTHORIZATION_REQUIRED");
            assert_eq!(e.status_code, http::StatusCode::UNAUTHORIZED);
        }
    }
}
