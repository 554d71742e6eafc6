//! Content-addressed image reconciliation for one locale and category.
//!
//! # Overview
//!
//! Local files live under `<images>/<category>/` and are picked by file name
//! prefix: the distribution locale first (`pt-BR*.png`), then the base
//! language (`pt*.png`). Only the more specific non-empty set is used.
//!
//! Identity is the SHA-256 of the bytes. A remote image whose hash matches a
//! local file is left alone; the rest is a symmetric difference:
//!
//! ```text
//! local  {A:h1, B:h2, C:h3}      upload {A}
//! remote {h2, h3, h4}        =>  delete {h4}
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use super::session::{CommitCoordinator, EditSession};
use super::{SyncError, ensure_not_cancelled, run_blocking};
use crate::locale::{self, Locale, Resolved, distribution};
use crate::store::{ImageCategory, ListingStore, RemoteImage};

/// SHA-256 of an asset's bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash `bytes`.
    #[must_use]
    pub fn of(bytes: &[u8]) -> Self {
        let mut out = [0u8; 32];
        out.copy_from_slice(&Sha256::digest(bytes));
        Self(out)
    }

    /// Whether a hex digest reported by the store names this content.
    #[must_use]
    pub fn matches_hex(&self, hex_digest: &str) -> bool {
        hex::decode(hex_digest.trim()).is_ok_and(|raw| raw.as_slice() == self.0.as_slice())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// A local image file with its content identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalImage {
    /// File on disk.
    pub path: PathBuf,
    /// SHA-256 of the file bytes.
    pub hash: ContentHash,
    /// MIME type derived from the extension.
    pub content_type: &'static str,
}

/// What: Map an image path to its upload content type.
///
/// Inputs:
/// - `path`: Local file.
///
/// Output:
/// - `image/png` or `image/jpeg`; `None` for any other extension.
#[must_use]
pub fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        _ => None,
    }
}

/// What: Decide whether a file name belongs to a locale or language prefix.
///
/// Inputs:
/// - `file_name`: Bare file name (`pt_icon.png`).
/// - `prefix`: Candidate from the fallback chain (`pt-BR` or `pt`).
///
/// Output:
/// - `true` when the name starts with `prefix` and does not continue into a
///   longer language code or a region of that language.
///
/// Details:
/// - For a bare language, `fil_icon.png` is not `fi`, and `pt-BR_1.png` /
///   `pt_BR_1.png` / `es-419_1.png` are not `pt` / `es`.
/// - A region tag is two uppercase letters, three digits, or any code of the
///   distribution table.
fn name_has_prefix(file_name: &str, prefix: &str) -> bool {
    let Some(rest) = file_name.strip_prefix(prefix) else {
        return false;
    };
    if prefix.contains(['-', '_']) {
        return true;
    }
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => false,
        Some('-' | '_') => {
            let tag: String = chars.take_while(char::is_ascii_alphanumeric).collect();
            let is_region = (tag.len() == 2 && tag.chars().all(|c| c.is_ascii_uppercase()))
                || (tag.len() == 3 && tag.chars().all(|c| c.is_ascii_digit()))
                || (!tag.is_empty() && distribution::find(&format!("{prefix}-{tag}")).is_some());
            !is_region
        }
        _ => true,
    }
}

/// Image files in `dir` whose name belongs to `prefix`, sorted by name.
fn files_with_prefix(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>, SyncError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(SyncError::Io {
                path: dir.to_path_buf(),
                source,
            });
        }
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && content_type_for(p).is_some())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| name_has_prefix(n, prefix))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// What: Find the local files for `locale` in one category.
///
/// Inputs:
/// - `images_dir`: Root of the image tree.
/// - `category`: Category subdirectory to search.
/// - `locale`: Distribution locale.
///
/// Output:
/// - Files of the first candidate prefix (locale, then base language) that has any,
///   or `None` when neither prefix matches a file.
///
/// # Errors
/// - `SyncError::Io` when the category directory exists but cannot be read.
///
/// Details:
/// - A missing category directory means no local files.
pub fn discover(
    images_dir: &Path,
    category: ImageCategory,
    locale: &Locale,
) -> Result<Option<Resolved<Vec<PathBuf>>>, SyncError> {
    let dir = images_dir.join(category.as_str());
    let mut failure = None;
    let found = locale::resolve_first(locale, |prefix| {
        if failure.is_some() {
            return None;
        }
        match files_with_prefix(&dir, prefix) {
            Ok(files) if !files.is_empty() => Some(files),
            Ok(_) => None,
            Err(e) => {
                failure = Some(e);
                None
            }
        }
    });
    match failure {
        Some(e) => Err(e),
        None => Ok(found),
    }
}

/// What: Read and hash local image files.
///
/// Inputs:
/// - `paths`: Files returned by [`discover`].
///
/// Output:
/// - One [`LocalImage`] per path, same order.
///
/// # Errors
/// - `SyncError::Io` when a file cannot be read.
pub fn load_local(paths: &[PathBuf]) -> Result<Vec<LocalImage>, SyncError> {
    paths
        .iter()
        .filter_map(|path| content_type_for(path).map(|ct| (path, ct)))
        .map(|(path, content_type)| {
            let bytes = std::fs::read(path).map_err(|source| SyncError::Io {
                path: path.clone(),
                source,
            })?;
            Ok(LocalImage {
                path: path.clone(),
                hash: ContentHash::of(&bytes),
                content_type,
            })
        })
        .collect()
}

/// Mutations needed to bring one remote category in line with local files.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImagePlan<'a> {
    /// Local files with no remote counterpart.
    pub to_upload: Vec<&'a LocalImage>,
    /// Remote images with no local counterpart.
    pub to_delete: Vec<&'a RemoteImage>,
}

impl ImagePlan<'_> {
    /// Whether nothing needs to change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_upload.is_empty() && self.to_delete.is_empty()
    }
}

/// What: Compute the symmetric difference of local and remote images by content.
///
/// Inputs:
/// - `local`: Hashed local files.
/// - `remote`: Images currently in the store.
///
/// Output:
/// - Uploads for unmatched local files and deletions for unmatched remote images.
///
/// Details:
/// - Names and remote ids never take part in matching.
/// - Local files with identical bytes are uploaded once.
#[must_use]
pub fn plan<'a>(local: &'a [LocalImage], remote: &'a [RemoteImage]) -> ImagePlan<'a> {
    let to_delete = remote
        .iter()
        .filter(|r| !local.iter().any(|l| l.hash.matches_hex(&r.sha256)))
        .collect();
    let mut to_upload: Vec<&LocalImage> = Vec::new();
    for image in local {
        let present = remote.iter().any(|r| image.hash.matches_hex(&r.sha256));
        let queued = to_upload.iter().any(|u| u.hash == image.hash);
        if !present && !queued {
            to_upload.push(image);
        }
    }
    ImagePlan {
        to_upload,
        to_delete,
    }
}

/// What: Reconcile one category of one locale.
///
/// Inputs:
/// - `store`, `session`, `coordinator`: Remote store, edit and change signal.
/// - `images_dir`: Root of the local image tree.
/// - `locale`, `category`: What to reconcile.
/// - `cancel`: Stops before the next remote call when set.
///
/// Output:
/// - `Ok(true)` when at least one delete or upload succeeded.
///
/// # Errors
/// - `SyncError::Store` on the first failed remote call; earlier mutations stay staged.
/// - `SyncError::Io` for unreadable local files.
/// - `SyncError::Cancelled` when `cancel` is set.
///
/// Details:
/// - Directory scans, reads and hashing run on the blocking pool.
/// - Deletions go out before uploads so uploads never hit the category limit
///   because of stale images.
pub async fn reconcile_category(
    store: &dyn ListingStore,
    session: &EditSession,
    coordinator: &CommitCoordinator,
    images_dir: &Path,
    locale: &Locale,
    category: ImageCategory,
    cancel: &AtomicBool,
) -> Result<bool, SyncError> {
    let local = {
        let images_dir = images_dir.to_path_buf();
        let target = locale.clone();
        run_blocking(move || {
            let Some(found) = discover(&images_dir, category, &target)? else {
                return Ok(Vec::new());
            };
            debug!(
                locale = %target,
                category = %category,
                prefix = %found.name,
                fallback = found.fallback,
                files = found.value.len(),
                "local images resolved"
            );
            load_local(&found.value)
        })
        .await?
    };
    if local.len() > category.max_images() {
        warn!(
            locale = %locale,
            category = %category,
            files = local.len(),
            max = category.max_images(),
            expected = category.description(),
            "more local images than the store accepts"
        );
    }

    ensure_not_cancelled(cancel)?;
    let remote = store
        .list_images(session.key(), locale.code(), category)
        .await?;
    let plan = plan(&local, &remote);
    if plan.is_empty() {
        return Ok(false);
    }

    let mut changed = false;
    for doomed in &plan.to_delete {
        ensure_not_cancelled(cancel)?;
        info!(locale = %locale, category = %category, remote_id = %doomed.id, "delete image");
        store
            .delete_image(session.key(), locale.code(), category, &doomed.id)
            .await?;
        coordinator.note_change();
        changed = true;
    }
    for image in &plan.to_upload {
        ensure_not_cancelled(cancel)?;
        let path = image.path.clone();
        let bytes = run_blocking(move || {
            std::fs::read(&path).map_err(|source| SyncError::Io { path, source })
        })
        .await?;
        info!(
            locale = %locale,
            category = %category,
            file = %image.path.display(),
            "upload image"
        );
        store
            .upload_image(
                session.key(),
                locale.code(),
                category,
                &bytes,
                image.content_type,
            )
            .await?;
        coordinator.note_change();
        changed = true;
    }
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Local image with the identity of `bytes`.
    fn local(name: &str, bytes: &[u8]) -> LocalImage {
        LocalImage {
            path: PathBuf::from(name),
            hash: ContentHash::of(bytes),
            content_type: "image/png",
        }
    }

    /// Remote image with the identity of `bytes`.
    fn remote(id: &str, bytes: &[u8]) -> RemoteImage {
        RemoteImage {
            id: id.to_string(),
            sha256: ContentHash::of(bytes).to_string(),
            ..RemoteImage::default()
        }
    }

    #[test]
    /// What: Hashes render as lowercase hex and match store digests in any case.
    ///
    /// Inputs:
    /// - The bytes `abc`.
    ///
    /// Output:
    /// - The well-known SHA-256 of `abc`; uppercase digest still matches.
    fn content_hash_hex() {
        let h = ContentHash::of(b"abc");
        let hex = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
        assert_eq!(h.to_string(), hex);
        assert!(h.matches_hex(&hex.to_ascii_uppercase()));
        assert!(!h.matches_hex("not-hex"));
    }

    #[test]
    /// What: Plan is the symmetric difference by content.
    ///
    /// Inputs:
    /// - Local {A:h1, B:h2, C:h3}, remote {h2, h3, h4}.
    ///
    /// Output:
    /// - Upload {A}, delete the image with h4.
    fn plan_symmetric_difference() {
        let locals = [local("A.png", b"1"), local("B.png", b"2"), local("C.png", b"3")];
        let remotes = [remote("r2", b"2"), remote("r3", b"3"), remote("r4", b"4")];
        let p = plan(&locals, &remotes);
        assert_eq!(p.to_upload.len(), 1);
        assert_eq!(p.to_upload[0].path, PathBuf::from("A.png"));
        assert_eq!(p.to_delete.len(), 1);
        assert_eq!(p.to_delete[0].id, "r4");
    }

    #[test]
    /// What: Renaming a file does not produce mutations and duplicates upload once.
    ///
    /// Inputs:
    /// - Renamed local copy of a remote image; two new local files with equal bytes.
    ///
    /// Output:
    /// - Only one upload, no deletions.
    fn plan_ignores_names_and_dedupes() {
        let locals = [
            local("renamed.png", b"same"),
            local("new1.png", b"new"),
            local("new2.png", b"new"),
        ];
        let remotes = [remote("r1", b"same")];
        let p = plan(&locals, &remotes);
        assert!(p.to_delete.is_empty());
        assert_eq!(p.to_upload.len(), 1);
    }

    #[test]
    /// What: Empty local and remote sets plan nothing.
    ///
    /// Inputs:
    /// - No files anywhere.
    ///
    /// Output:
    /// - Empty plan.
    fn plan_empty_is_noop() {
        assert!(plan(&[], &[]).is_empty());
    }

    #[test]
    /// What: Discovery prefers locale-prefixed files over base-language files.
    ///
    /// Inputs:
    /// - `phoneScreenshots/` with `pt-BR_1.png`, `pt_1.png`, `pt_2.jpg`, `pt_notes.txt`.
    ///
    /// Output:
    /// - `pt-BR` picks only `pt-BR_1.png`; `pt-PT` falls back to the `pt` files (no txt).
    fn discover_prefers_locale_prefix() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cat = dir.path().join("phoneScreenshots");
        std::fs::create_dir_all(&cat).expect("mkdir");
        for name in ["pt-BR_1.png", "pt_1.png", "pt_2.jpg", "pt_notes.txt"] {
            std::fs::write(cat.join(name), name).expect("write");
        }

        let br = discover(dir.path(), ImageCategory::PhoneScreenshots, &"pt-BR".into())
            .expect("discover")
            .expect("pt-BR files");
        assert!(!br.fallback);
        assert_eq!(br.value, vec![cat.join("pt-BR_1.png")]);

        let pt = discover(dir.path(), ImageCategory::PhoneScreenshots, &"pt-PT".into())
            .expect("discover")
            .expect("pt files");
        assert!(pt.fallback);
        assert_eq!(pt.name, "pt");
        assert!(pt.value.contains(&cat.join("pt_1.png")));
        assert!(pt.value.contains(&cat.join("pt_2.jpg")));
        assert!(!pt.value.iter().any(|p| p.ends_with("pt_notes.txt")));
        assert!(!pt.value.contains(&cat.join("pt-BR_1.png")));
    }

    #[test]
    /// What: Base-language fallback ignores sibling regions and longer language codes.
    ///
    /// Inputs:
    /// - `icon/` with `pt-BR_icon.png`, `pt_icon.png`, `fil_icon.png`.
    ///
    /// Output:
    /// - `pt-PT` gets only `pt_icon.png`; `fi-FI` finds nothing.
    fn discover_fallback_respects_language_boundaries() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cat = dir.path().join("icon");
        std::fs::create_dir_all(&cat).expect("mkdir");
        for name in ["pt-BR_icon.png", "pt_icon.png", "fil_icon.png"] {
            std::fs::write(cat.join(name), name).expect("write");
        }

        let pt = discover(dir.path(), ImageCategory::Icon, &"pt-PT".into())
            .expect("discover")
            .expect("pt files");
        assert_eq!(pt.value, vec![cat.join("pt_icon.png")]);

        let fi = discover(dir.path(), ImageCategory::Icon, &"fi-FI".into()).expect("discover");
        assert!(fi.is_none());
    }

    #[test]
    /// What: Prefix matching stops at language and region boundaries.
    ///
    /// Inputs:
    /// - File names against bare languages and full codes.
    ///
    /// Output:
    /// - Separators, digits and free-form suffixes belong to the language;
    ///   region tags and longer codes do not.
    fn name_prefix_boundaries() {
        assert!(name_has_prefix("pt_icon.png", "pt"));
        assert!(name_has_prefix("pt_1.png", "pt"));
        assert!(name_has_prefix("pt1.png", "pt"));
        assert!(name_has_prefix("pt.png", "pt"));
        assert!(name_has_prefix("pt-BR_1.png", "pt-BR"));
        assert!(!name_has_prefix("pt-BR_1.png", "pt"));
        assert!(!name_has_prefix("pt_BR_1.png", "pt"));
        assert!(!name_has_prefix("pt-br_1.png", "pt"));
        assert!(!name_has_prefix("es-419_1.png", "es"));
        assert!(!name_has_prefix("fil_icon.png", "fi"));
        assert!(!name_has_prefix("en-US_1.png", "de"));
    }

    #[test]
    /// What: A missing category directory means no local files.
    ///
    /// Inputs:
    /// - Empty images root.
    ///
    /// Output:
    /// - `Ok(None)`.
    fn discover_missing_category_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let found = discover(dir.path(), ImageCategory::TvBanner, &"de-DE".into()).expect("ok");
        assert!(found.is_none());
    }

    #[test]
    /// What: Content types follow the extension, case-insensitively.
    ///
    /// Inputs:
    /// - `a.PNG`, `b.jpeg`, `c.gif`.
    ///
    /// Output:
    /// - png, jpeg, none.
    fn content_type_by_extension() {
        assert_eq!(content_type_for(Path::new("a.PNG")), Some("image/png"));
        assert_eq!(content_type_for(Path::new("b.jpeg")), Some("image/jpeg"));
        assert_eq!(content_type_for(Path::new("c.gif")), None);
    }
}
