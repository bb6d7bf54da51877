//! [`Command`] definition.

pub mod authorize_user_session;
pub mod create_inquiry;
pub mod create_user;
pub mod create_user_session;
pub mod increment_property_views;
pub mod update_inquiry;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_user_session::AuthorizeUserSession,
    create_inquiry::CreateInquiry, create_user::CreateUser,
    create_user_session::CreateUserSession,
    increment_property_views::IncrementPropertyViews,
    update_inquiry::UpdateInquiry,
};
