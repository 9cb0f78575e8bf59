//! Domain definitions.

pub mod booking;
pub mod listing;
pub mod review;
pub mod user;

pub use self::{
    booking::Booking, listing::Listing, review::Review, user::User,
};
