//! Static sample data the [`Generator`] draws from.
//!
//! [`Generator`]: super::Generator

use crate::domain::{
    booking::Status,
    listing::{Amenities, Category},
};

/// Member of the sample [`User`] roster.
///
/// [`User`]: crate::domain::User
pub(super) struct Member {
    pub(super) username: &'static str,
    pub(super) email: &'static str,
    pub(super) first_name: &'static str,
    pub(super) last_name: &'static str,
}

/// Password of every sample [`User`].
///
/// [`User`]: crate::domain::User
pub(super) const PASSWORD: &str = "password123";

pub(super) const MEMBERS: [Member; 8] = [
    Member {
        username: "alice_host",
        email: "alice@example.com",
        first_name: "Alice",
        last_name: "Johnson",
    },
    Member {
        username: "bob_traveler",
        email: "bob@example.com",
        first_name: "Bob",
        last_name: "Smith",
    },
    Member {
        username: "charlie_host",
        email: "charlie@example.com",
        first_name: "Charlie",
        last_name: "Brown",
    },
    Member {
        username: "diana_guest",
        email: "diana@example.com",
        first_name: "Diana",
        last_name: "Wilson",
    },
    Member {
        username: "eve_explorer",
        email: "eve@example.com",
        first_name: "Eve",
        last_name: "Davis",
    },
    Member {
        username: "frank_host",
        email: "frank@example.com",
        first_name: "Frank",
        last_name: "Miller",
    },
    Member {
        username: "grace_nomad",
        email: "grace@example.com",
        first_name: "Grace",
        last_name: "Taylor",
    },
    Member {
        username: "henry_backpacker",
        email: "henry@example.com",
        first_name: "Henry",
        last_name: "Anderson",
    },
];

/// Hand-written sample [`Listing`].
///
/// [`Listing`]: crate::domain::Listing
pub(super) struct Curated {
    pub(super) title: &'static str,
    pub(super) description: &'static str,
    pub(super) location: &'static str,
    pub(super) price_per_night: u32,
    pub(super) category: Category,
    pub(super) bedrooms: u16,
    pub(super) bathrooms: u16,
    pub(super) max_guests: u16,
    pub(super) amenities: Amenities,
}

pub(super) const CURATED: [Curated; 8] = [
    Curated {
        title: "Cozy Downtown Apartment",
        description: "A beautiful apartment in the heart of the city with \
                      modern amenities and stunning views.",
        location: "New York, NY",
        price_per_night: 120,
        category: Category::Apartment,
        bedrooms: 2,
        bathrooms: 1,
        max_guests: 4,
        amenities: Amenities {
            wifi: true,
            parking: false,
            pool: false,
            kitchen: true,
            air_conditioning: true,
        },
    },
    Curated {
        title: "Beachfront Villa Paradise",
        description: "Luxury villa with direct beach access, perfect for a \
                      relaxing getaway.",
        location: "Miami, FL",
        price_per_night: 350,
        category: Category::Villa,
        bedrooms: 4,
        bathrooms: 3,
        max_guests: 8,
        amenities: Amenities {
            wifi: true,
            parking: true,
            pool: true,
            kitchen: true,
            air_conditioning: false,
        },
    },
    Curated {
        title: "Mountain Cabin Retreat",
        description: "Rustic cabin surrounded by nature, ideal for hiking and \
                      outdoor activities.",
        location: "Aspen, CO",
        price_per_night: 180,
        category: Category::Cabin,
        bedrooms: 3,
        bathrooms: 2,
        max_guests: 6,
        amenities: Amenities {
            wifi: true,
            parking: true,
            pool: false,
            kitchen: true,
            air_conditioning: false,
        },
    },
    Curated {
        title: "Modern Studio Loft",
        description: "Stylish studio perfect for solo travelers or couples.",
        location: "San Francisco, CA",
        price_per_night: 95,
        category: Category::Studio,
        bedrooms: 1,
        bathrooms: 1,
        max_guests: 2,
        amenities: Amenities {
            wifi: true,
            parking: false,
            pool: false,
            kitchen: true,
            air_conditioning: true,
        },
    },
    Curated {
        title: "Historic Townhouse",
        description: "Charming historic home with modern updates in a quiet \
                      neighborhood.",
        location: "Boston, MA",
        price_per_night: 160,
        category: Category::House,
        bedrooms: 3,
        bathrooms: 2,
        max_guests: 6,
        amenities: Amenities {
            wifi: true,
            parking: true,
            pool: false,
            kitchen: true,
            air_conditioning: false,
        },
    },
    Curated {
        title: "Luxury Penthouse Suite",
        description: "High-end penthouse with panoramic city views and \
                      premium amenities.",
        location: "Chicago, IL",
        price_per_night: 275,
        category: Category::Apartment,
        bedrooms: 3,
        bathrooms: 2,
        max_guests: 6,
        amenities: Amenities {
            wifi: true,
            parking: true,
            pool: true,
            kitchen: false,
            air_conditioning: true,
        },
    },
    Curated {
        title: "Seaside Cottage",
        description: "Quaint cottage just steps from the beach with ocean \
                      views.",
        location: "Myrtle Beach, SC",
        price_per_night: 140,
        category: Category::House,
        bedrooms: 2,
        bathrooms: 1,
        max_guests: 4,
        amenities: Amenities {
            wifi: true,
            parking: true,
            pool: false,
            kitchen: true,
            air_conditioning: false,
        },
    },
    Curated {
        title: "Urban Condo with City Views",
        description: "Modern condo in the financial district with great city \
                      views.",
        location: "Seattle, WA",
        price_per_night: 110,
        category: Category::Condo,
        bedrooms: 2,
        bathrooms: 1,
        max_guests: 4,
        amenities: Amenities {
            wifi: true,
            parking: false,
            pool: false,
            kitchen: true,
            air_conditioning: true,
        },
    },
];

/// Locations of randomly generated [`Listing`]s.
///
/// [`Listing`]: crate::domain::Listing
pub(super) const LOCATIONS: [&str; 12] = [
    "Austin, TX",
    "Portland, OR",
    "Denver, CO",
    "Nashville, TN",
    "Las Vegas, NV",
    "Phoenix, AZ",
    "San Diego, CA",
    "Atlanta, GA",
    "New Orleans, LA",
    "Orlando, FL",
    "Minneapolis, MN",
    "Detroit, MI",
];

/// [`Category`]s of randomly generated [`Listing`]s.
///
/// [`Listing`]: crate::domain::Listing
pub(super) const CATEGORIES: [Category; 6] = [
    Category::Apartment,
    Category::House,
    Category::Villa,
    Category::Condo,
    Category::Cabin,
    Category::Studio,
];

/// [`Status`]es of generated [`Booking`]s with their relative weights.
///
/// [`Booking`]: crate::domain::Booking
pub(super) const STATUSES: [(Status, u32); 4] = [
    (Status::Pending, 25),
    (Status::Confirmed, 30),
    (Status::Cancelled, 15),
    (Status::Completed, 30),
];

pub(super) const SPECIAL_REQUESTS: [Option<&str>; 7] = [
    None,
    Some("Early check-in please"),
    Some("Late checkout requested"),
    Some("Ground floor preferred"),
    Some("Quiet room please"),
    Some("Extra towels needed"),
    Some("Vegetarian breakfast"),
];

/// Stars of generated [`Review`]s with their relative weights.
///
/// [`Review`]: crate::domain::Review
pub(super) const RATINGS: [(i32, u32); 5] =
    [(1, 5), (2, 10), (3, 20), (4, 35), (5, 30)];

pub(super) const POSITIVE_COMMENTS: [&str; 8] = [
    "Amazing place! The host was very welcoming and the location was perfect.",
    "Beautiful property with all the amenities we needed. Would definitely \
     stay again!",
    "Clean, comfortable, and exactly as described. Great value for money.",
    "Perfect for our family vacation. The kids loved the space and amenities.",
    "Fantastic location and the host provided excellent recommendations for \
     local attractions.",
    "The property exceeded our expectations. Everything was spotless and \
     well-maintained.",
    "Great communication from the host and seamless check-in process.",
    "Lovely place with stunning views. We had a wonderful time here.",
];

pub(super) const NEUTRAL_COMMENTS: [&str; 6] = [
    "Nice place overall. A few minor issues but nothing major.",
    "Good location and decent amenities. Pretty much what we expected.",
    "Clean and comfortable. Could use some updates but served our needs.",
    "Average experience. The place was fine for our short stay.",
    "Decent value for the price. Some areas could be improved.",
    "Acceptable accommodation. Met our basic needs for the trip.",
];

pub(super) const NEGATIVE_COMMENTS: [&str; 5] = [
    "Place was not as clean as expected and some amenities weren't working.",
    "Location was good but the property needs maintenance and updates.",
    "Had some issues with the booking but the host was responsive.",
    "The place was smaller than expected and could use better cleaning.",
    "Some inconveniences during our stay but manageable overall.",
];
