//! [`Inquiry`] read model definition.
//!
//! [`Inquiry`]: crate::domain::Inquiry

pub mod list {
    //! [`Inquiry`]s list definitions.

    use common::define_pagination;

    use crate::domain::{inquiry, Inquiry};

    define_pagination!(Inquiry, Filter);

    /// Filter for [`Selector`].
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// [`inquiry::Status`] to match exactly.
        pub status: Option<inquiry::Status>,
    }

    impl Filter {
        /// Checks whether the provided [`Inquiry`] matches this [`Filter`].
        #[must_use]
        pub fn matches(&self, inquiry: &Inquiry) -> bool {
            self.status.map_or(true, |s| inquiry.status == s)
        }
    }

    /// Total count of [`Inquiry`] list items matching a [`Filter`].
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct TotalCount(pub u64);

    impl From<TotalCount> for u64 {
        fn from(count: TotalCount) -> Self {
            count.0
        }
    }
}
