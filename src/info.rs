//! Read-only package overview.

use std::fmt::Write;

use crate::store::{ImageCategory, ListingStore, Result};

/// What: Describe a package as the store currently sees it.
///
/// Inputs:
/// - `store`: Remote listing store.
/// - `package`: Package name.
/// - `locales`: Listing filter; empty shows every listing.
///
/// Output:
/// - Text block with details, tracks, images of the base locale and listings.
///
/// # Errors
/// - Any failed store read.
///
/// Details:
/// - Opens an edit but never commits it; the store expires it.
pub async fn package_info(
    store: &dyn ListingStore,
    package: &str,
    locales: &[String],
) -> Result<String> {
    let edit = store.open_session(package).await?;
    let details = store.app_details(&edit).await?;
    let mut out = String::new();
    let _ = writeln!(out, "{package} {}", details.default_language);
    let _ = writeln!(out, "{}", details.contact_email);
    let _ = writeln!(out, "{}", details.contact_website);

    let tracks = store.list_tracks(&edit).await?;
    let _ = writeln!(out, "tracks:");
    for track in &tracks {
        let _ = writeln!(out, "\t{}", track.track);
    }

    for category in ImageCategory::ALL {
        let _ = writeln!(out, "imageType: {category}");
        let images = store
            .list_images(&edit, &details.default_language, category)
            .await?;
        if images.is_empty() {
            let _ = writeln!(out, "\tno images");
        }
        for image in &images {
            let _ = writeln!(out, "\timage.Id: {}", image.id);
        }
    }

    for listing in store.list_listings(&edit).await? {
        if !locales.is_empty() && !locales.contains(&listing.language) {
            continue;
        }
        let _ = writeln!(out, "{} {}", listing.language, listing.title);
        let _ = writeln!(out, "{}", listing.short_description);
        let _ = writeln!(out, "{}", listing.full_description);
    }
    Ok(out)
}
