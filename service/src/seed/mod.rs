//! Sample data generation.
//!
//! [`Generator`] produces a [`Plan`] of [`Listing`]s, [`Booking`]s and
//! [`Review`]s for the provided [`User`]s. Generated data skips the rules
//! applied to bookings made through the API (check-in in the past, listing
//! availability), but always satisfies the ones enforced by the database:
//! - every [`Stay`] ends after it starts;
//! - active [`Booking`]s of the same [`Listing`] never overlap;
//! - every [`Review`] references a completed [`Booking`] of its author;
//! - no [`User`] reviews the same [`Listing`] twice.

mod data;

use std::collections::{HashMap, HashSet};

use common::{Date, DateTime, Price};
use rand::{seq::IndexedRandom as _, Rng};
use rust_decimal::Decimal;
use smart_default::SmartDefault;

use crate::domain::{
    booking::{self, NumGuests, SpecialRequests, Status, Stay},
    listing::{self, MaxGuests, RoomCount},
    review::{self, Comment, Rating},
    user, Booking, Listing, Review, User,
};

/// Requested amounts of generated entities.
#[derive(Clone, Copy, Debug, Eq, PartialEq, SmartDefault)]
pub struct Counts {
    /// Number of [`Listing`]s to generate.
    #[default = 20]
    pub listings: usize,

    /// Number of [`Booking`]s to generate.
    #[default = 50]
    pub bookings: usize,

    /// Maximum number of [`Review`]s to generate.
    #[default = 30]
    pub reviews: usize,
}

/// Generated entities ready to be persisted in the declared order.
#[derive(Clone, Debug, Default)]
pub struct Plan {
    /// Generated [`Listing`]s.
    pub listings: Vec<Listing>,

    /// Generated [`Booking`]s of the [`Plan::listings`].
    pub bookings: Vec<Booking>,

    /// Generated [`Review`]s of the [`Plan::bookings`].
    pub reviews: Vec<Review>,
}

/// Creates the sample [`User`] roster.
///
/// All the [`User`]s share the same sample password.
#[must_use]
pub fn roster() -> Vec<User> {
    let password = user::Password::new(data::PASSWORD);
    data::MEMBERS
        .iter()
        .filter_map(|m| {
            Some(User {
                id: user::Id::new(),
                username: user::Username::new(m.username)?,
                first_name: user::Name::new(m.first_name),
                last_name: user::Name::new(m.last_name),
                password_hash: user::PasswordHash::new(password.as_ref()?),
                email: user::Email::new(m.email),
                created_at: DateTime::now().coerce(),
            })
        })
        .collect()
}

/// Generator of sample data.
#[derive(Debug)]
pub struct Generator<R> {
    /// Source of randomness.
    rng: R,

    /// [`Date`] the generated [`Stay`]s are relative to.
    today: Date,
}

impl<R: Rng> Generator<R> {
    /// Maximum number of past completed [`Booking`]s generated when no
    /// [`Review`] can be created otherwise.
    pub const PAST_BOOKINGS_LIMIT: usize = 10;

    /// Creates a new [`Generator`] drawing from the provided `rng`.
    #[must_use]
    pub const fn new(rng: R, today: Date) -> Self {
        Self { rng, today }
    }

    /// Generates a complete [`Plan`] for the provided [`User`]s.
    ///
    /// If no completed [`Booking`] has been generated while [`Review`]s are
    /// requested, then some past completed [`Booking`]s are generated first.
    pub fn plan(&mut self, users: &[user::Id], counts: Counts) -> Plan {
        let listings = self.listings(users, counts.listings);
        let mut bookings = self.bookings(&listings, users, counts.bookings);
        if counts.reviews > 0
            && !bookings.iter().any(|b| b.status == Status::Completed)
        {
            tracing::info!(
                "No completed bookings generated, creating past ones first",
            );
            let past = self.past_bookings(
                &listings,
                users,
                counts.reviews.min(Self::PAST_BOOKINGS_LIMIT),
            );
            bookings.extend(past);
        }
        let reviews = self.reviews(&bookings, counts.reviews);

        Plan {
            listings,
            bookings,
            reviews,
        }
    }

    /// Generates `count` [`Listing`]s hosted by random `hosts`.
    ///
    /// Curated [`Listing`]s go first, the rest is random.
    pub fn listings(
        &mut self,
        hosts: &[user::Id],
        count: usize,
    ) -> Vec<Listing> {
        (0..count)
            .filter_map(|i| {
                let listing = match data::CURATED.get(i) {
                    Some(c) => self.curated_listing(c, hosts),
                    None => self.random_listing(i, hosts),
                };
                if listing.is_none() {
                    tracing::debug!("Skipped sample listing #{}", i + 1);
                }
                listing
            })
            .collect()
    }

    /// Generates `count` [`Booking`]s of random `listings` made by random
    /// `guests`.
    ///
    /// An active [`Booking`] overlapping a previously generated active one of
    /// the same [`Listing`] is [`Status::Cancelled`].
    pub fn bookings(
        &mut self,
        listings: &[Listing],
        guests: &[user::Id],
        count: usize,
    ) -> Vec<Booking> {
        let mut held = HashMap::<listing::Id, Vec<Stay>>::new();
        let mut bookings = Vec::with_capacity(count);
        for i in 0..count {
            let Some(mut booking) = self.random_booking(listings, guests)
            else {
                tracing::debug!("Skipped sample booking #{}", i + 1);
                continue;
            };
            if booking.status.is_active() {
                let stays = held.entry(booking.listing_id).or_default();
                if stays.iter().any(|s| s.overlaps(&booking.stay)) {
                    booking.status = Status::Cancelled;
                } else {
                    stays.push(booking.stay);
                }
            }
            bookings.push(booking);
        }
        bookings
    }

    /// Generates `count` [`Status::Completed`] [`Booking`]s of random
    /// `listings` that took place in the past.
    pub fn past_bookings(
        &mut self,
        listings: &[Listing],
        guests: &[user::Id],
        count: usize,
    ) -> Vec<Booking> {
        (0..count)
            .filter_map(|_| self.past_booking(listings, guests))
            .collect()
    }

    /// Generates up to `count` [`Review`]s of the completed `bookings`.
    ///
    /// Each [`User`] reviews each [`Listing`] at most once.
    pub fn reviews(
        &mut self,
        bookings: &[Booking],
        count: usize,
    ) -> Vec<Review> {
        let mut reviewed = HashSet::new();
        let mut reviews = Vec::with_capacity(count);
        for b in bookings.iter().filter(|b| b.status == Status::Completed) {
            if reviews.len() >= count {
                break;
            }
            if !reviewed.insert((b.user_id, b.listing_id)) {
                continue;
            }
            if let Some(review) = self.random_review(b) {
                reviews.push(review);
            }
        }
        reviews
    }

    /// Builds a [`Listing`] out of the [`data::Curated`] one.
    fn curated_listing(
        &mut self,
        c: &data::Curated,
        hosts: &[user::Id],
    ) -> Option<Listing> {
        let now = DateTime::now();
        Some(Listing {
            id: listing::Id::new(),
            host_id: *hosts.choose(&mut self.rng)?,
            title: listing::Title::new(c.title)?,
            description: listing::Description::new(c.description)?,
            location: listing::Location::new(c.location)?,
            price_per_night: Price::new(Decimal::from(c.price_per_night))?,
            max_guests: MaxGuests::new(c.max_guests)?,
            bedrooms: RoomCount::from(c.bedrooms),
            bathrooms: RoomCount::from(c.bathrooms),
            amenities: c.amenities,
            is_available: true,
            category: c.category,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        })
    }

    /// Generates a random [`Listing`] with the provided index.
    fn random_listing(
        &mut self,
        i: usize,
        hosts: &[user::Id],
    ) -> Option<Listing> {
        let category = *data::CATEGORIES.choose(&mut self.rng)?;
        let location = *data::LOCATIONS.choose(&mut self.rng)?;
        let now = DateTime::now();
        Some(Listing {
            id: listing::Id::new(),
            host_id: *hosts.choose(&mut self.rng)?,
            title: listing::Title::new(format!(
                "Amazing {} #{}",
                category.title(),
                i + 1,
            ))?,
            description: listing::Description::new(format!(
                "A wonderful place to stay in {location}.",
            ))?,
            location: listing::Location::new(location)?,
            price_per_night: Price::new(Decimal::from(
                self.rng.random_range(50..=300_u32),
            ))?,
            max_guests: MaxGuests::new(self.rng.random_range(1..=8))?,
            bedrooms: RoomCount::from(self.rng.random_range(1..=4_u16)),
            bathrooms: RoomCount::from(self.rng.random_range(1..=3_u16)),
            amenities: listing::Amenities {
                wifi: self.rng.random_bool(0.5),
                parking: self.rng.random_bool(0.5),
                pool: self.rng.random_bool(0.5),
                kitchen: self.rng.random_bool(0.5),
                air_conditioning: self.rng.random_bool(0.5),
            },
            is_available: true,
            category,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        })
    }

    /// Picks a random [`Listing`] and a random guest not hosting it.
    fn pick<'l>(
        &mut self,
        listings: &'l [Listing],
        guests: &[user::Id],
    ) -> Option<(&'l Listing, user::Id)> {
        let listing = listings.choose(&mut self.rng)?;
        let guests = guests
            .iter()
            .filter(|id| **id != listing.host_id)
            .collect::<Vec<_>>();
        Some((listing, **guests.choose(&mut self.rng)?))
    }

    /// Generates a random [`Booking`] of one of the `listings`.
    fn random_booking(
        &mut self,
        listings: &[Listing],
        guests: &[user::Id],
    ) -> Option<Booking> {
        let (listing, user_id) = self.pick(listings, guests)?;

        let check_in = self.today.add_days(self.rng.random_range(-30..=60))?;
        let stay = Stay {
            check_in,
            check_out: check_in.add_days(self.rng.random_range(1..=14))?,
        };
        let num_guests = NumGuests::new(
            self.rng.random_range(1..=listing.max_guests.get().min(6)),
        )?;
        let (status, _) =
            *data::STATUSES.choose_weighted(&mut self.rng, |s| s.1).ok()?;
        let special_requests = data::SPECIAL_REQUESTS
            .choose(&mut self.rng)
            .copied()
            .flatten()
            .and_then(SpecialRequests::new);

        let now = DateTime::now();
        Some(Booking {
            id: booking::Id::new(),
            listing_id: listing.id,
            user_id,
            stay,
            num_guests,
            total_price: booking::quote(listing.price_per_night, stay)?,
            status,
            special_requests,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        })
    }

    /// Generates a [`Status::Completed`] [`Booking`] of one of the `listings`
    /// that took place in the past.
    fn past_booking(
        &mut self,
        listings: &[Listing],
        guests: &[user::Id],
    ) -> Option<Booking> {
        let (listing, user_id) = self.pick(listings, guests)?;

        let days_ago = self.rng.random_range(30..=90_i64);
        let check_in = self.today.add_days(-days_ago)?;
        let stay = Stay {
            check_in,
            check_out: check_in.add_days(self.rng.random_range(1..=7))?,
        };
        let num_guests = NumGuests::new(
            self.rng.random_range(1..=listing.max_guests.get().min(4)),
        )?;

        let now = DateTime::now();
        Some(Booking {
            id: booking::Id::new(),
            listing_id: listing.id,
            user_id,
            stay,
            num_guests,
            total_price: booking::quote(listing.price_per_night, stay)?,
            status: Status::Completed,
            special_requests: None,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        })
    }

    /// Generates a random [`Review`] of the provided completed [`Booking`].
    fn random_review(&mut self, booking: &Booking) -> Option<Review> {
        let (stars, _) =
            *data::RATINGS.choose_weighted(&mut self.rng, |r| r.1).ok()?;
        let rating = Rating::new(stars)?;
        let pool: &[&str] = match rating.stars() {
            4.. => &data::POSITIVE_COMMENTS,
            3 => &data::NEUTRAL_COMMENTS,
            _ => &data::NEGATIVE_COMMENTS,
        };

        let now = DateTime::now();
        Some(Review {
            id: review::Id::new(),
            listing_id: booking.listing_id,
            user_id: booking.user_id,
            booking_id: Some(booking.id),
            rating,
            comment: Comment::new(*pool.choose(&mut self.rng)?)?,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        })
    }
}

#[cfg(test)]
mod spec {
    use std::collections::HashSet;

    use common::Date;
    use rand::{rngs::StdRng, SeedableRng as _};

    use crate::domain::{booking::Status, user};

    use super::{data, roster, Counts, Generator};

    fn generator(seed: u64) -> Generator<StdRng> {
        Generator::new(
            StdRng::seed_from_u64(seed),
            Date::from_calendar(2025, 6, 1).unwrap(),
        )
    }

    fn users() -> Vec<user::Id> {
        roster().into_iter().map(|u| u.id).collect()
    }

    #[test]
    fn builds_whole_roster() {
        let roster = roster();

        assert_eq!(roster.len(), data::MEMBERS.len());
        assert_eq!(roster[0].username.as_ref(), "alice_host");
        assert!(roster.iter().all(|u| u.email.is_some()));
    }

    #[test]
    fn curated_listings_go_first() {
        let listings = generator(1).listings(&users(), 3);

        assert_eq!(listings.len(), 3);
        assert_eq!(listings[0].title.to_string(), "Cozy Downtown Apartment");
        assert_eq!(listings[2].title.to_string(), "Mountain Cabin Retreat");
    }

    #[test]
    fn generates_random_listings_beyond_curated() {
        let users = users();
        let listings = generator(2).listings(&users, 20);

        assert_eq!(listings.len(), 20);
        for (i, l) in listings.iter().enumerate().skip(data::CURATED.len()) {
            assert!(l.title.to_string().ends_with(&format!("#{}", i + 1)));
            assert!(data::LOCATIONS.contains(&l.location.to_string().as_str()));
            assert!((1..=8).contains(&l.max_guests.get()));
            assert!(data::CATEGORIES.contains(&l.category));
            assert!(users.contains(&l.host_id));
        }
    }

    #[test]
    fn bookings_respect_invariants() {
        let users = users();
        let mut g = generator(3);
        let listings = g.listings(&users, 5);
        let bookings = g.bookings(&listings, &users, 200);

        assert_eq!(bookings.len(), 200);
        for b in &bookings {
            let listing =
                listings.iter().find(|l| l.id == b.listing_id).unwrap();

            assert!(b.stay.is_ordered());
            assert!(b.num_guests.get() <= listing.max_guests.get());
            assert_ne!(b.user_id, listing.host_id);
            assert_eq!(
                Some(b.total_price),
                listing.price_per_night.times(
                    u32::try_from(b.duration_days()).unwrap(),
                ),
            );
        }

        let active = bookings
            .iter()
            .filter(|b| b.status.is_active())
            .collect::<Vec<_>>();
        for (i, a) in active.iter().enumerate() {
            for b in &active[i + 1..] {
                assert!(
                    a.listing_id != b.listing_id || !a.stay.overlaps(&b.stay),
                    "active bookings overlap: {a:?} and {b:?}",
                );
            }
        }
    }

    #[test]
    fn reviews_respect_invariants() {
        let users = users();
        let plan = generator(4).plan(&users, Counts::default());

        assert!(plan.reviews.len() <= Counts::default().reviews);

        let mut pairs = HashSet::new();
        for r in &plan.reviews {
            assert!((1..=5).contains(&r.rating.stars()));
            assert!(pairs.insert((r.user_id, r.listing_id)));

            let booking = plan
                .bookings
                .iter()
                .find(|b| Some(b.id) == r.booking_id)
                .unwrap();
            assert_eq!(booking.status, Status::Completed);
            assert_eq!(booking.user_id, r.user_id);
            assert_eq!(booking.listing_id, r.listing_id);
        }
    }

    #[test]
    fn falls_back_to_past_bookings() {
        let users = users();
        let plan = generator(5).plan(
            &users,
            Counts {
                listings: 4,
                bookings: 0,
                reviews: 25,
            },
        );
        let today = Date::from_calendar(2025, 6, 1).unwrap();

        assert_eq!(plan.bookings.len(), 10);
        assert!(plan.bookings.iter().all(|b| {
            b.status == Status::Completed && b.stay.check_out < today
        }));
        assert!(!plan.reviews.is_empty());
    }

    #[test]
    fn is_deterministic_for_same_seed() {
        let users = users();
        let a = generator(6).plan(&users, Counts::default());
        let b = generator(6).plan(&users, Counts::default());

        let stays = |p: &super::Plan| {
            p.bookings
                .iter()
                .map(|b| (b.stay, b.status, b.num_guests))
                .collect::<Vec<_>>()
        };
        assert_eq!(stays(&a), stays(&b));
        assert_eq!(a.reviews.len(), b.reviews.len());
    }
}
