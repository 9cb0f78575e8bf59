//! [`Command`] for signing a new [`User`] up.

use common::{
    operations::{By, Insert, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret, SecretBox};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::user::{Email, Name, Password, Username};
use crate::{
    domain::{user, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// Name of the constraint keeping [`Username`]s unique.
const UNIQUE_USERNAME_CONSTRAINT: &str = "unique_username";

/// [`Command`] for signing a new [`User`] up.
#[derive(Clone, Debug)]
pub struct CreateUser {
    /// [`Username`] to sign up with.
    pub username: user::Username,

    /// [`Password`] to sign in with later.
    pub password: SecretBox<user::Password>,

    /// First [`Name`] of the [`User`], if shared.
    pub first_name: Option<user::Name>,

    /// Last [`Name`] of the [`User`], if shared.
    pub last_name: Option<user::Name>,

    /// [`Email`] of the [`User`], if shared.
    pub email: Option<user::Email>,
}

impl<Db> Command<CreateUser> for Service<Db>
where
    Db: for<'l> Database<
            Select<By<Option<User>, &'l user::Username>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Insert<User>, Err = Traced<database::Error>>,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateUser) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateUser {
            username,
            password,
            first_name,
            last_name,
            email,
        } = cmd;

        let existing = self
            .database()
            .execute(Select(By::new(&username)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::UsernameOccupied(username)));
        }

        let user = User {
            id: user::Id::new(),
            username,
            first_name,
            last_name,
            password_hash: user::PasswordHash::new(password.expose_secret()),
            email,
            created_at: DateTime::now().coerce(),
        };

        match self.database().execute(Insert(user.clone())).await {
            Ok(_) => Ok(user),
            Err(e)
                if e.as_ref().violated_constraint()
                    == Some(UNIQUE_USERNAME_CONSTRAINT) =>
            {
                Err(tracerr::new!(E::UsernameOccupied(user.username)))
            }
            Err(e) => Err(tracerr::map_from_and_wrap!(=> E)(e)),
        }
    }
}

/// Error of [`CreateUser`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Username`] is taken by another [`User`].
    #[display("`{_0}` username is occupied")]
    UsernameOccupied(#[error(not(source))] user::Username),
}
