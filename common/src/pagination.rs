//! Cursor-based pagination of lists.
//!
//! A list is traversed page by page, either forward (`first` items `after`
//! a cursor) or backward (`last` items `before` a cursor). Either way, the
//! [`Edge`]s of a [`Page`] go in the list order.

/// Page of a cursor-paginated list.
#[derive(Clone, Debug)]
pub struct Connection<C, I> {
    /// [`Edge`]s on this page, in the list order.
    pub edges: Vec<Edge<C, I>>,

    /// [`Direction`] this page was selected in.
    pub direction: Direction,

    /// Indicator whether the list continues past this page in its
    /// [`Direction`].
    pub has_more: bool,
}

/// A page of a list.
pub type Page<C, I> = Connection<C, I>;

impl<C, I> Connection<C, I> {
    /// Creates a new [`Connection`] out of the [`Edge`]s selected with the
    /// provided [`Arguments`].
    ///
    /// Backward pages are selected from their end, so their [`Edge`]s are
    /// put back into the list order here.
    #[must_use]
    pub fn new(
        args: &Arguments<C>,
        edges: impl IntoIterator<Item = impl Into<Edge<C, I>>>,
        has_more: bool,
    ) -> Self {
        let mut edges = edges.into_iter().map(Into::into).collect::<Vec<_>>();
        if args.direction == Direction::Backward {
            edges.reverse();
        }
        Self {
            edges,
            direction: args.direction,
            has_more,
        }
    }

    /// Returns [`PageInfo`] of this [`Connection`].
    #[must_use]
    pub const fn page_info(&self) -> PageInfo {
        PageInfo {
            has_next_page: self.has_more
                && matches!(self.direction, Direction::Forward),
            has_previous_page: self.has_more
                && matches!(self.direction, Direction::Backward),
        }
    }
}

/// Neighbours of a [`Page`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PageInfo {
    /// Indicator whether there are more items after the [`Page`].
    pub has_next_page: bool,

    /// Indicator whether there are more items before the [`Page`].
    pub has_previous_page: bool,
}

/// Item of a [`Page`] along with its cursor.
#[derive(Clone, Copy, Debug)]
pub struct Edge<C, I> {
    /// Position of the item in the list.
    pub cursor: C,

    /// The item itself.
    pub node: I,
}

impl<C, I> From<(C, I)> for Edge<C, I> {
    fn from((cursor, node): (C, I)) -> Self {
        Self { cursor, node }
    }
}

/// Arguments selecting a [`Page`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Arguments<C> {
    /// [`Direction`] to select the [`Page`] in.
    direction: Direction,

    /// Maximum number of items on the [`Page`].
    limit: usize,

    /// Cursor the [`Page`] starts past, if any.
    cursor: Option<C>,
}

impl<C> Arguments<C> {
    /// Parses [`Arguments`] out of the `first`/`after` and `last`/`before`
    /// pairs, falling back to the first `default` items of the list when
    /// neither is given.
    ///
    /// Returns [`None`] if both pairs are mixed, or the requested number of
    /// items is negative.
    pub fn new<Num>(
        first: Option<Num>,
        after: Option<C>,
        last: Option<Num>,
        before: Option<C>,
        default: Num,
    ) -> Option<Self>
    where
        Num: TryInto<usize>,
    {
        let (direction, limit, cursor) = match (first, after, last, before) {
            (first, after, None, None) => {
                (Direction::Forward, first.unwrap_or(default), after)
            }
            (None, None, Some(last), before) => {
                (Direction::Backward, last, before)
            }
            (None, None, None, Some(before)) => {
                (Direction::Backward, default, Some(before))
            }
            _ => return None,
        };
        Some(Self {
            direction,
            limit: limit.try_into().ok()?,
            cursor,
        })
    }

    /// Returns the cursor the requested [`Page`] starts past, if any.
    #[must_use]
    pub const fn cursor(&self) -> Option<&C> {
        self.cursor.as_ref()
    }

    /// Returns [`Direction`] the [`Page`] is requested in.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the maximum number of items on the requested [`Page`].
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }
}

/// [`Arguments`] of a [`Page`] along with a filter of the list.
#[derive(Clone, Copy, Debug)]
pub struct Selector<C, F> {
    /// [`Arguments`] selecting the [`Page`].
    pub arguments: Arguments<C>,

    /// Filter narrowing the list down.
    pub filter: F,
}

/// Direction of a list traversal.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Direction {
    /// From the start of the list to its end.
    Forward,

    /// From the end of the list to its start.
    Backward,
}

impl Direction {
    /// Returns comparison operator selecting the items past a cursor in this
    /// [`Direction`].
    #[must_use]
    pub const fn operator(&self) -> &'static str {
        match self {
            Self::Forward => ">",
            Self::Backward => "<",
        }
    }

    /// Returns [`Order`] the items are fetched in this [`Direction`].
    #[must_use]
    pub const fn order(&self) -> Order {
        match self {
            Self::Forward => Order::Ascending,
            Self::Backward => Order::Descending,
        }
    }
}

/// Sorting order.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Order {
    /// Smallest first.
    Ascending,

    /// Largest first.
    Descending,
}

impl Order {
    #[cfg(feature = "postgres")]
    /// Returns SQL keyword of this [`Order`].
    #[must_use]
    pub const fn sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Defines pagination types of a list of `$node`s positioned by `$cursor`s
/// and narrowed down by a `$filter`.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_pagination {
    ($cursor:ty, $node:ty, $filter:ty) => {
        pub use $crate::pagination::PageInfo;

        #[doc = "Item of a [`Page`] along with its cursor."]
        pub type Edge = $crate::pagination::Edge<$cursor, $node>;

        #[doc = "Page of the list."]
        pub type Connection = $crate::pagination::Connection<$cursor, $node>;

        #[doc = "Page of the list."]
        pub type Page = $crate::pagination::Page<$cursor, $node>;

        #[doc = "Arguments selecting a [`Page`]."]
        pub type Arguments = $crate::pagination::Arguments<$cursor>;

        #[doc = "[`Arguments`] along with a filter of the list."]
        pub type Selector = $crate::pagination::Selector<$cursor, $filter>;
    };
}

#[cfg(test)]
mod spec {
    use super::{Arguments, Connection, Direction, PageInfo};

    #[test]
    fn defaults_to_first_items() {
        let args = Arguments::<u32>::new(None, None, None, None, 10).unwrap();

        assert_eq!(args.direction(), Direction::Forward);
        assert_eq!(args.limit(), 10);
        assert_eq!(args.cursor(), None);
    }

    #[test]
    fn pages_after_cursor() {
        let args = Arguments::new(Some(2), Some(5_u32), None, None, 10);

        let args = args.unwrap();
        assert_eq!(args.direction().operator(), ">");
        assert_eq!(args.limit(), 2);
        assert_eq!(args.cursor(), Some(&5));
    }

    #[test]
    fn pages_before_cursor() {
        let args = Arguments::new(None, None, Some(3), Some(7_u32), 10);

        let args = args.unwrap();
        assert_eq!(args.direction(), Direction::Backward);
        assert_eq!(args.direction().operator(), "<");
        assert_eq!(args.limit(), 3);

        let args = Arguments::new(None, None, None, Some(7_u32), 10);
        assert_eq!(args.unwrap().limit(), 10);
    }

    #[test]
    fn rejects_mixed_directions() {
        assert!(Arguments::new(Some(1), None, Some(1), None::<u32>, 10)
            .is_none());
        assert!(Arguments::new(None, Some(1), None, Some(2_u32), 10)
            .is_none());
        assert!(Arguments::new(Some(-1), None, None, None::<u32>, 10)
            .is_none());
    }

    #[test]
    fn keeps_backward_page_in_list_order() {
        let args = Arguments::new(None, None, Some(3), Some(9_u32), 10);

        let page: Connection<u32, u32> =
            Connection::new(&args.unwrap(), [(8, 8), (7, 7), (6, 6)], true);

        let cursors = page.edges.iter().map(|e| e.cursor).collect::<Vec<_>>();
        assert_eq!(cursors, [6, 7, 8]);
        assert_eq!(
            page.page_info(),
            PageInfo {
                has_next_page: false,
                has_previous_page: true,
            },
        );
    }
}
