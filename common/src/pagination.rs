//! Abstractions for offset-based pagination.

use std::fmt;

/// A page of nodes.
#[derive(Clone, Debug)]
pub struct Page<I> {
    /// Nodes on this [`Page`].
    pub nodes: Vec<I>,

    /// Total number of nodes matching the filter, regardless of pagination.
    pub total: u64,
}

impl<I> Page<I> {
    /// Creates a new [`Page`] from the provided nodes.
    #[must_use]
    pub fn new(nodes: impl IntoIterator<Item = impl Into<I>>, total: u64) -> Self {
        Self {
            nodes: nodes.into_iter().map(Into::into).collect(),
            total,
        }
    }

    /// Creates a new empty [`Page`].
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            total: 0,
        }
    }

    /// Maps nodes of this [`Page`] preserving its total.
    #[must_use]
    pub fn map<T>(self, f: impl FnMut(I) -> T) -> Page<T> {
        Page {
            nodes: self.nodes.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

/// Pagination arguments.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Arguments {
    /// Maximum number of nodes to return. Always positive.
    limit: usize,

    /// Number of nodes to skip.
    offset: usize,
}

impl Arguments {
    /// Creates new [`Arguments`].
    ///
    /// Absent `limit` falls back to the `default` one, absent `offset` is
    /// zero. [`None`] is returned if the `limit` is not positive or any of the
    /// numbers cannot be represented.
    pub fn new<Num>(
        limit: Option<Num>,
        offset: Option<Num>,
        default: Num,
    ) -> Option<Self>
    where
        Num: TryInto<usize> + fmt::Debug,
    {
        let limit = limit.unwrap_or(default).try_into().ok()?;
        if limit == 0 {
            return None;
        }
        let offset = match offset {
            Some(o) => o.try_into().ok()?,
            None => 0,
        };
        Some(Self { limit, offset })
    }

    /// Returns the limit requested by these [`Arguments`].
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the offset requested by these [`Arguments`].
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Creates new [`Arguments`] selecting the first `limit` nodes.
    ///
    /// The `limit` is clamped to be at least `1`.
    #[must_use]
    pub fn first(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            offset: 0,
        }
    }
}

/// Pagination selector.
#[derive(Clone, Debug)]
pub struct Selector<F, S = ()> {
    /// Pagination [`Arguments`].
    pub arguments: Arguments,

    /// Additional filter being applied to the result.
    pub filter: F,

    /// Sorting of the result.
    pub sort: S,
}

/// Order of a sorting key.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Order {
    /// Ascending order.
    Ascending,

    /// Descending order.
    Descending,
}

impl Order {
    /// Returns SQL keyword representing this [`Order`].
    #[cfg(feature = "postgres")]
    #[must_use]
    pub const fn sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }

    /// Applies this [`Order`] to the provided ascending [`Ordering`].
    ///
    /// [`Ordering`]: std::cmp::Ordering
    #[must_use]
    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Defines pagination types.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_pagination {
    ($node:ty, $filter:ty $(, $sort:ty)?) => {
        #[doc = "A [`Page`] of nodes."]
        pub type Page = $crate::pagination::Page<$node>;

        #[doc = "Arguments for selecting a [`Page`]."]
        pub type Arguments = $crate::pagination::Arguments;

        #[doc = "[`Page`] selector."]
        pub type Selector = $crate::pagination::Selector<$filter $(, $sort)?>;
    };
}

#[cfg(test)]
mod spec {
    use std::cmp::Ordering;

    use super::{Arguments, Order, Page};

    #[test]
    fn arguments_use_defaults() {
        let args = Arguments::new(None, None, 50).unwrap();

        assert_eq!(args.limit(), 50);
        assert_eq!(args.offset(), 0);
    }

    #[test]
    fn arguments_reject_invalid_numbers() {
        assert!(Arguments::new(Some(0), None, 50).is_none());
        assert!(Arguments::new(Some(-1), None, 50).is_none());
        assert!(Arguments::new(Some(10), Some(-5), 50).is_none());
        assert_eq!(
            Arguments::new(Some(10_i64), Some(20), 50),
            Some(Arguments {
                limit: 10,
                offset: 20,
            }),
        );
    }

    #[test]
    fn first_clamps_limit() {
        assert_eq!(Arguments::first(4), Arguments::new(Some(4), None, 1).unwrap());
        assert_eq!(Arguments::first(0).limit(), 1);
    }

    #[test]
    fn page_map_keeps_total() {
        let page = Page::<u8>::new([1_u8, 2], 10).map(u16::from);

        assert_eq!(page.nodes, vec![1_u16, 2]);
        assert_eq!(page.total, 10);
    }

    #[test]
    fn order_reverses_descending() {
        assert_eq!(Order::Ascending.apply(Ordering::Less), Ordering::Less);
        assert_eq!(Order::Descending.apply(Ordering::Less), Ordering::Greater);
    }
}
