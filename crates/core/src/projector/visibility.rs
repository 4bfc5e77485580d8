//! Who may see what.

use crate::auth::Viewer;

/// Deleted torrents are visible to superadmins only.
pub fn can_view(deleted: bool, viewer: Option<&Viewer>) -> bool {
    !deleted || viewer.is_some_and(|v| v.is_superadmin)
}

/// Whether the uploader may be shown to this viewer.
///
/// `anonymous` is `None` when the source did not record the flag; the
/// uploader is then treated as anonymous.
pub fn can_see_submitter(anonymous: Option<bool>, uploader_id: i64, viewer: Option<&Viewer>) -> bool {
    if anonymous == Some(false) {
        return true;
    }
    viewer.is_some_and(|v| v.is_user(uploader_id) || v.is_moderator)
}
