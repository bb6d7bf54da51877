//! Marker types.

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing an entity publication.
#[derive(Clone, Copy, Debug)]
pub struct Publication;

/// Marker type describing an entity update.
#[derive(Clone, Copy, Debug)]
pub struct Update;

/// Marker type describing a contact with a client.
#[derive(Clone, Copy, Debug)]
pub struct Contact;

/// Marker type describing an expiration.
#[derive(Clone, Copy, Debug)]
pub struct Expiration;

/// Marker type describing a view of an entity.
#[derive(Clone, Copy, Debug)]
pub struct View;
