//! [`Listing`]-related read definitions.

use rust_decimal::Decimal;

#[cfg(doc)]
use crate::domain::{Listing, Review};

/// Aggregated [`Review`] ratings of a [`Listing`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RatingSummary {
    /// Number of [`Review`]s of the [`Listing`].
    pub total_reviews: u32,

    /// Sum of all the [`Review`] ratings of the [`Listing`].
    pub rating_sum: u32,
}

impl RatingSummary {
    /// Returns the mean [`Review`] rating rounded to one decimal place.
    ///
    /// Zero if the [`Listing`] has no [`Review`]s.
    #[must_use]
    pub fn average_rating(&self) -> Decimal {
        if self.total_reviews == 0 {
            return Decimal::ZERO;
        }
        (Decimal::from(self.rating_sum) / Decimal::from(self.total_reviews))
            .round_dp(1)
    }
}

pub mod list {
    //! [`Listing`] list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::{listing, user};
    #[cfg(doc)]
    use crate::domain::{Listing, User};

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = listing::Id;

    /// Cursor pointing to a specific [`Listing`] in a list.
    pub type Cursor = listing::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`listing::Location`] (or its part) to fuzzy search for.
        pub location: Option<listing::Location>,

        /// [`listing::Category`] to select only.
        pub category: Option<listing::Category>,

        /// ID of the hosting [`User`] to select [`Listing`]s of.
        pub host_id: Option<user::Id>,

        /// Indicator whether only available [`Listing`]s are selected.
        pub available_only: bool,
    }

    /// Total count of [`Listing`] list items.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use super::RatingSummary;

    fn summary(ratings: &[u32]) -> RatingSummary {
        RatingSummary {
            total_reviews: u32::try_from(ratings.len()).unwrap(),
            rating_sum: ratings.iter().sum(),
        }
    }

    #[test]
    fn zero_without_reviews() {
        assert_eq!(RatingSummary::default().average_rating(), Decimal::ZERO);
    }

    #[test]
    fn averages_ratings() {
        assert_eq!(summary(&[5, 3]).average_rating(), Decimal::new(40, 1));
        assert_eq!(summary(&[5]).average_rating(), Decimal::new(5, 0));
        assert_eq!(summary(&[5, 4]).average_rating(), Decimal::new(45, 1));
    }

    #[test]
    fn rounds_to_one_decimal() {
        assert_eq!(summary(&[5, 4, 4]).average_rating(), Decimal::new(43, 1));
        assert_eq!(summary(&[5, 5, 4]).average_rating(), Decimal::new(47, 1));
        assert_eq!(summary(&[1, 2, 2]).average_rating(), Decimal::new(17, 1));
    }
}
