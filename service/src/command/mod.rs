//! [`Command`] definition.

pub mod authorize_user_session;
pub mod create_booking;
pub mod create_listing;
pub mod create_review;
pub mod create_user;
pub mod create_user_session;
pub mod delete_listing;
pub mod seed_database;
pub mod update_booking_status;
pub mod update_listing;

use tracerr::Traced;

use crate::infra::database;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_user_session::AuthorizeUserSession,
    create_booking::CreateBooking, create_listing::CreateListing,
    create_review::CreateReview, create_user::CreateUser,
    create_user_session::CreateUserSession, delete_listing::DeleteListing,
    seed_database::SeedDatabase, update_booking_status::UpdateBookingStatus,
    update_listing::UpdateListing,
};

/// Converts a failed [`database`] write into an error of `E`, reporting
/// violated integrity constraints via the provided `conflict` constructor.
fn conflict_or<E>(
    conflict: impl FnOnce(String) -> E,
) -> impl FnOnce(Traced<database::Error>) -> Traced<E>
where
    E: From<database::Error>,
{
    move |e| match e.as_ref().violated_constraint() {
        Some(constraint) => tracerr::new!(conflict(constraint.to_owned())),
        None => tracerr::map_from_and_wrap!(=> E)(e),
    }
}
