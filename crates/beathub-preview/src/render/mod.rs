//! Share metadata rendering.
//!
//! Builds the Open Graph / Twitter Card tags for a beat and splices them into
//! the app's entry document. Tags are generated with
//! [maud](https://maud.lambda.xyz/), so every dynamic value (beat titles,
//! cover URLs, slugs) is HTML-escaped before it reaches the page.

pub mod head;

use std::borrow::Cow;

use maud::{Markup, html};
use reqwest::Url;

use crate::config::SiteConfig;
use crate::store::Record;

/// Path prefix of share links, without the trailing slug.
pub const SHARE_PATH: &str = "/addToCart";

/// `og:title` for beats that no longer exist.
pub const NOT_FOUND_TITLE: &str = "Beat Not Found";

/// `og:description` for beats that no longer exist.
pub const NOT_FOUND_DESCRIPTION: &str = "This beat may have been removed.";

/// `og:type` for a found beat.
pub const SONG_OG_TYPE: &str = "music.song";

/// Recommended Open Graph image size, advertised for beat artwork.
const OG_IMAGE_WIDTH: u32 = 1200;
const OG_IMAGE_HEIGHT: u32 = 630;

/// The metadata injected into a share page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaTags {
    /// Contents of the `<title>` element.
    pub document_title: String,
    /// `og:title` / `twitter:title`.
    pub title: String,
    /// `og:description` / `twitter:description` / `description`.
    pub description: String,
    /// `og:image` / `twitter:image`.
    pub image: String,
    /// `og:image:width` and `og:image:height`, when known.
    pub image_size: Option<(u32, u32)>,
    /// `og:url` and the canonical link.
    pub url: Option<String>,
    /// `og:type`.
    pub og_type: Option<&'static str>,
    /// `og:site_name`.
    pub site_name: String,
    /// `twitter:card`.
    pub twitter_card: &'static str,
}

impl MetaTags {
    /// Tags for a beat that exists.
    pub fn for_record(record: &Record, slug: &str, site: &SiteConfig) -> Self {
        let cover = record
            .cover_url
            .as_deref()
            .map(str::trim)
            .filter(|url| is_safe_url(url));

        if cover.is_none() {
            tracing::warn!(slug = %slug, "beat has no usable cover, using default image");
        }

        Self {
            document_title: format!("{} | {}", record.title, site.site_name),
            title: record.title.clone(),
            description: format!("Buy & download {}", record.title),
            image: cover.unwrap_or(&site.default_image_url).to_string(),
            image_size: cover.map(|_| (OG_IMAGE_WIDTH, OG_IMAGE_HEIGHT)),
            url: Some(canonical_url(&site.site_host, slug)),
            og_type: Some(SONG_OG_TYPE),
            site_name: site.site_name.clone(),
            twitter_card: "summary_large_image",
        }
    }

    /// Tags for a slug whose beat does not exist.
    ///
    /// Identical for every slug unless `include_url_on_not_found` is set, in
    /// which case the canonical URL and a generic `website` type are added.
    pub fn not_found(slug: &str, site: &SiteConfig) -> Self {
        let (url, og_type) = if site.include_url_on_not_found {
            (Some(canonical_url(&site.site_host, slug)), Some("website"))
        } else {
            (None, None)
        };

        Self {
            document_title: format!("{NOT_FOUND_TITLE} | {}", site.site_name),
            title: NOT_FOUND_TITLE.to_string(),
            description: NOT_FOUND_DESCRIPTION.to_string(),
            image: site.default_image_url.clone(),
            image_size: None,
            url,
            og_type,
            site_name: site.site_name.clone(),
            twitter_card: "summary_large_image",
        }
    }

    /// Render the tags as an HTML fragment for the document head.
    pub fn render(&self) -> Markup {
        html! {
            title { (self.document_title) }
            meta name="description" content=(self.description);
            @if let Some(url) = &self.url {
                link rel="canonical" href=(url);
            }

            // Open Graph
            meta property="og:site_name" content=(self.site_name);
            meta property="og:title" content=(self.title);
            meta property="og:description" content=(self.description);
            meta property="og:image" content=(self.image);
            @if let Some((width, height)) = self.image_size {
                meta property="og:image:width" content=(width);
                meta property="og:image:height" content=(height);
            }
            @if let Some(url) = &self.url {
                meta property="og:url" content=(url);
            }
            @if let Some(og_type) = self.og_type {
                meta property="og:type" content=(og_type);
            }

            // Twitter Card
            meta name="twitter:card" content=(self.twitter_card);
            meta name="twitter:title" content=(self.title);
            meta name="twitter:description" content=(self.description);
            meta name="twitter:image" content=(self.image);
        }
    }
}

/// Build the share page for `slug`: the base document with metadata for
/// `record` (or the not-found fallback) inserted into its head.
pub fn build_document(
    record: Option<&Record>,
    slug: &str,
    site: &SiteConfig,
    base_document: &str,
) -> String {
    let tags = match record {
        Some(record) => MetaTags::for_record(record, slug, site),
        None => MetaTags::not_found(slug, site),
    };
    // Browsers show the first `<title>`; the entry document's own title
    // precedes ours unless it is removed here.
    let base_document = if site.replace_title {
        head::remove_title(base_document)
    } else {
        Cow::Borrowed(base_document)
    };
    head::inject(&base_document, &tags.render().into_string())
}

/// Canonical share URL: `https://{site_host}/addToCart/{slug}`.
///
/// The slug is percent-encoded as a single path segment.
pub fn canonical_url(site_host: &str, slug: &str) -> String {
    let base = format!("https://{site_host}{SHARE_PATH}");
    match Url::parse(&base) {
        Ok(mut url) => {
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.pop_if_empty().push(slug);
            }
            String::from(url)
        }
        Err(_) => format!("{base}/{slug}"),
    }
}

/// Check if a URL is safe to use in `content` or `href` attributes.
pub fn is_safe_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}
