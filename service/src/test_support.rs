//! Fixtures shared by unit tests.

use std::time::Duration;

use common::{DateTime, Price};

use crate::{
    domain::{property, Property},
    infra::Memory,
    Config, Service,
};

/// Creates a new [`Service`] over the provided [`Memory`] database.
pub(crate) fn service(db: Memory) -> Service<Memory> {
    Service::new(
        Config::with_secret(b"test secret", Duration::from_secs(60 * 60)),
        db,
    )
}

/// Creates a published and available [`Property`] for sale.
pub(crate) fn property(id: i32, slug: &str, published_at: DateTime) -> Property {
    Property {
        id: id.into(),
        slug: property::Slug::new(slug).unwrap(),
        title: property::Title::new(format!("Propiedad {slug}")).unwrap(),
        description: property::Description::new("Luminosa").unwrap(),
        price: Price::from(100_000),
        operation: property::Operation::Sale,
        kind: property::Kind::House,
        address: property::Address::new("Av. Siempre Viva 742").unwrap(),
        city: property::City::new("Palermo").unwrap(),
        state: None,
        country: None,
        gps_location: None,
        area: 120,
        land_area: None,
        rooms: 3,
        bathrooms: 2,
        parking_spaces: 1,
        floors: 1,
        year_built: None,
        featured_image: None,
        gallery: vec![],
        agent_id: 1.into(),
        status: property::Status::Published,
        views_count: 0,
        is_featured: false,
        is_available: true,
        rental_prices: None,
        published_at: Some(published_at.coerce()),
        created_at: published_at.coerce(),
        updated_at: published_at.coerce(),
    }
}

/// Returns a [`DateTime`] the provided number of `minutes` after the epoch.
pub(crate) fn minutes(minutes: u64) -> DateTime {
    DateTime::UNIX_EPOCH + Duration::from_secs(minutes * 60)
}
