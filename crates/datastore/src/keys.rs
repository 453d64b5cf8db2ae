//! Folder namespacing and well-known storage names.

/// Separator between a folder and the path within it. Part of the persisted format.
pub const FOLDER_SEPARATOR: &str = "/";

/// Folder holding cached headers of downloaded titles.
pub const DOWNLOAD_HEADER_CACHE: &str = "download_header_cache";
/// Folder holding cached episode metadata of downloads.
pub const DOWNLOAD_EPISODE_CACHE: &str = "download_episode_cache";
/// Last brightness used by the video player.
pub const VIDEO_PLAYER_BRIGHTNESS: &str = "video_player_alpha_key";
/// Provider shown on the home page.
pub const HOMEPAGE_API: &str = "home_api_used";
/// User supplied provider sites.
pub const USER_PROVIDER_API: &str = "user_custom_sites";

/// Builds the namespaced key `"<folder>/<path>"`.
///
/// This is a pure string convention: the backend has no notion of folders, so enumeration by
/// folder is prefix matching over these keys.
pub fn folder_name(folder: &str, path: &str) -> String {
    format!("{folder}{FOLDER_SEPARATOR}{path}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_name() {
        assert_eq!(folder_name("prefs", "theme"), "prefs/theme");
        assert_eq!(folder_name("", "theme"), "/theme");
        assert_eq!(folder_name("a/b", "c"), "a/b/c");
    }
}
