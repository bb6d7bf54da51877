//! [`Dashboard`] read model definition.

use serde::Serialize;

#[cfg(doc)]
use crate::domain::{Property, User};

/// Back-office overview numbers.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// Number of [`Property`]s in any status.
    pub total_properties: u64,

    /// Sum of views over all the [`Property`]s.
    pub total_views: u64,

    /// Number of administrator [`User`]s.
    pub admins: u64,
}
