//! [`Error`]-related definitions.

use std::{fmt, num::TryFromIntError};

use axum_extra::typed_header::TypedHeaderRejection;
use derive_more::Error as StdError;
use itertools::Itertools as _;
use juniper::IntoFieldError;
use service::infra::database;
use tracerr::{Trace, Traced};

/// Defines a new error type.
///
/// Variants rejecting a particular input argument name it with an optional
/// `#[field = "..."]` attribute.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[status = $status_code:ident]
                $( #[field = $field:literal] )?
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        #[repr(u16)]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                match err {
                    $(
                        $name::$variant => Self {
                            code: $code,
                            status_code: ::http::StatusCode::$status_code,
                            field: None $( .or(Some($field)) )?,
                            message: $message.to_string(),
                            backtrace: None,
                        },
                    )*
                }
            }
        }
    };
}

/// GraphQL API [`Error`].
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// [`http::StatusCode`] of this [`Error`].
    pub status_code: http::StatusCode,

    /// Name of the input argument this [`Error`] is caused by, if any.
    pub field: Option<Field>,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// [`Error`] message.
    pub message: String,
}

impl Error {
    /// Create a new [`Error`] representing an internal server error.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self {
            code: "INTERNAL_SERVER_ERROR",
            status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
            field: None,
            message: msg.to_string(),
            backtrace: None,
        }
    }

    /// Replaces the message of this [`Error`] with the provided one.
    #[must_use]
    pub fn with_message(mut self, msg: &impl ToString) -> Self {
        self.message = msg.to_string();
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            status_code: _,
            field,
            backtrace,
            message,
        } = self;

        write!(f, "[{code}]")?;
        if let Some(field) = field {
            write!(f, "({field})")?;
        }
        write!(
            f,
            ": {message}{}",
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("{trace}"))),
        )
    }
}

impl<S> IntoFieldError<S> for Error
where
    S: From<String>,
{
    fn into_field_error(self) -> juniper::FieldError<S> {
        let mut ext = juniper::Object::with_capacity(3);
        drop(
            ext.add_field("code", juniper::Value::scalar(self.code.to_owned())),
        );
        if let Some(field) = self.field {
            drop(ext.add_field(
                "field",
                juniper::Value::scalar(field.to_owned()),
            ));
        }
        drop(
            ext.add_field(
                "backtrace",
                juniper::Value::list(
                    self.backtrace
                        .iter()
                        .flat_map(|trace| trace.iter())
                        .map(|frame| juniper::Value::scalar(frame.to_string()))
                        .collect(),
                ),
            ),
        );
        juniper::FieldError::new(self.message, juniper::Value::object(ext))
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Name of an input argument.
pub type Field = &'static str;

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }
}

impl AsError for TypedHeaderRejection {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error {
            code: "BAD_REQUEST",
            status_code: http::StatusCode::BAD_REQUEST,
            field: None,
            message: self.to_string(),
            backtrace: None,
        })
    }
}

impl AsError for database::Error {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

impl AsError for TryFromIntError {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

#[cfg(test)]
mod spec {
    use juniper::{DefaultScalarValue, IntoFieldError as _};

    use super::Error;

    crate::define_error! {
        enum TestError {
            #[code = "PLAIN"]
            #[status = CONFLICT]
            #[message = "Plain error"]
            Plain,

            #[code = "WITH_FIELD"]
            #[status = BAD_REQUEST]
            #[field = "numGuests"]
            #[message = "Error of a field"]
            WithField,
        }
    }

    #[test]
    fn defines_errors_with_optional_field() {
        let plain = Error::from(TestError::Plain);
        assert_eq!(plain.code, "PLAIN");
        assert_eq!(plain.status_code, http::StatusCode::CONFLICT);
        assert_eq!(plain.field, None);
        assert_eq!(plain.message, "Plain error");

        let field = Error::from(TestError::WithField);
        assert_eq!(field.code, "WITH_FIELD");
        assert_eq!(field.status_code, http::StatusCode::BAD_REQUEST);
        assert_eq!(field.field, Some("numGuests"));
    }

    #[test]
    fn displays_field() {
        assert_eq!(
            Error::from(TestError::WithField).to_string(),
            "[WITH_FIELD](numGuests): Error of a field",
        );
        assert_eq!(
            Error::from(TestError::Plain).to_string(),
            "[PLAIN]: Plain error",
        );
    }

    #[test]
    fn exposes_field_in_extensions() {
        let err: juniper::FieldError<DefaultScalarValue> =
            Error::from(TestError::WithField).into_field_error();
        let ext = err.extensions().as_object_value().unwrap();

        assert_eq!(
            ext.get_field_value("code").and_then(|v| v.as_string_value()),
            Some("WITH_FIELD"),
        );
        assert_eq!(
            ext.get_field_value("field").and_then(|v| v.as_string_value()),
            Some("numGuests"),
        );

        let err: juniper::FieldError<DefaultScalarValue> =
            Error::from(TestError::Plain).into_field_error();
        let ext = err.extensions().as_object_value().unwrap();
        assert!(ext.get_field_value("field").is_none());
    }
}
