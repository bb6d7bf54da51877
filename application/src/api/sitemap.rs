//! [Sitemap] endpoint.
//!
//! [Sitemap]: https://www.sitemaps.org/protocol.html

use std::fmt::Write as _;

use axum::{response::IntoResponse, Extension};
use service::{domain::property, query, read};

use super::{execute_or, Settings};
use crate::Service;

/// Page listed in a sitemap.
#[derive(Clone, Copy, Debug)]
struct Page<'p> {
    /// Path of the page, relative to the site URL.
    path: &'p str,

    /// Expected frequency of the page changes.
    change_frequency: &'static str,

    /// Priority of the page relative to the other ones.
    priority: &'static str,
}

/// Pages of the website which don't depend on the stored data.
const STATIC_PAGES: &[Page<'static>] = &[
    Page {
        path: "/",
        change_frequency: "weekly",
        priority: "1.0",
    },
    Page {
        path: "/propiedades",
        change_frequency: "daily",
        priority: "0.9",
    },
    Page {
        path: "/propiedades?operation=sale",
        change_frequency: "daily",
        priority: "0.8",
    },
    Page {
        path: "/propiedades?operation=rent",
        change_frequency: "daily",
        priority: "0.8",
    },
];

/// Renders the sitemap of the website.
///
/// Unavailable storage results in listing the static pages only.
#[tracing::instrument(skip_all, fields(api.name = "sitemap"))]
pub async fn sitemap(
    Extension(service): Extension<Service>,
    Extension(settings): Extension<Settings>,
) -> impl IntoResponse {
    let read::property::Slugs(slugs) = execute_or(
        &service,
        query::properties::Slugs::by(()),
        read::property::Slugs::default(),
    )
    .await;

    (
        [(http::header::CONTENT_TYPE, "application/xml")],
        render(&settings.site_url, &slugs),
    )
}

/// Renders the sitemap XML of the static pages and the provided
/// [`property::Slug`]s.
#[must_use]
pub fn render(site_url: &str, slugs: &[property::Slug]) -> String {
    let site_url = site_url.trim_end_matches('/');
    let paths = slugs
        .iter()
        .map(|slug| format!("/propiedad/{slug}"))
        .collect::<Vec<_>>();
    let pages = STATIC_PAGES.iter().copied().chain(paths.iter().map(|path| {
        Page {
            path,
            change_frequency: "weekly",
            priority: "0.7",
        }
    }));

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for page in pages {
        // Writing into a `String` never fails.
        _ = write!(
            xml,
            "  <url>\n    <loc>{}</loc>\n    <changefreq>{}</changefreq>\n    \
             <priority>{}</priority>\n  </url>\n",
            escape(&format!("{site_url}{}", page.path)),
            page.change_frequency,
            page.priority,
        );
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Escapes the provided `text` for an XML element.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod spec {
    use service::domain::property;

    use super::render;

    #[test]
    fn lists_static_pages_and_properties() {
        let xml = render(
            "https://example.com/",
            &[property::Slug::new("casa-palermo").unwrap()],
        );

        for loc in [
            "https://example.com/",
            "https://example.com/propiedades",
            "https://example.com/propiedades?operation=sale",
            "https://example.com/propiedades?operation=rent",
            "https://example.com/propiedad/casa-palermo",
        ] {
            assert!(xml.contains(&format!("<loc>{loc}</loc>")), "{loc}");
        }
        assert_eq!(xml.matches("<url>").count(), 5);
    }

    #[test]
    fn lists_only_static_pages_without_properties() {
        let xml = render("https://example.com", &[]);

        assert_eq!(xml.matches("<url>").count(), 4);
        assert!(!xml.contains("/propiedad/"));
    }
}
