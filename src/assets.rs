use anyhow::{Context, Result};
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};

/// Bump when the shell asset set changes; activation sweeps every cache
/// directory carrying another version name.
pub const CACHE_VERSION: &str = "focus-cache-v1";

pub const ENTRY_ASSET: &str = "index.html";
pub const START_CUE_ASSET: &str = "sounds/start.mp3";

/// The fixed shell manifest: entry page, web manifest, logo, and the six
/// audio cues.
pub const SHELL_MANIFEST: &[&str] = &[
    "index.html",
    "manifest.json",
    "images/logo.png",
    "sounds/start.mp3",
    "sounds/tone1.mp3",
    "sounds/tone2.mp3",
    "sounds/tone3.mp3",
    "sounds/tone4.mp3",
    "sounds/tone5.mp3",
];

pub fn tone_asset_name(tone: u8) -> String {
    format!("sounds/tone{tone}.mp3")
}

/// Cache-first store for the shell assets, populated from the bundled
/// resources. Lookups never fail the caller: a miss is logged and the
/// bundled copy (or nothing) is served instead.
pub struct AssetCache {
    source_dir: PathBuf,
    cache_root: PathBuf,
    cache_dir: PathBuf,
}

impl AssetCache {
    pub fn new(source_dir: PathBuf, cache_root: PathBuf) -> Self {
        let cache_dir = cache_root.join(CACHE_VERSION);
        Self {
            source_dir,
            cache_root,
            cache_dir,
        }
    }

    /// Populate the current-version cache and delete caches left behind by
    /// other versions. Individual asset failures are logged and skipped so
    /// a partial bundle never blocks activation.
    pub fn activate(&self) -> Result<()> {
        self.sweep_stale_versions();

        fs::create_dir_all(&self.cache_dir).with_context(|| {
            format!("Failed to create asset cache at {}", self.cache_dir.display())
        })?;

        for name in SHELL_MANIFEST {
            let source = self.source_dir.join(name);
            if !source.is_file() {
                warn!("Shell asset {name} missing from bundle, skipping");
                continue;
            }
            if let Err(err) = copy_into(&source, &self.cache_dir.join(name)) {
                warn!("Failed to cache shell asset {name}: {err:#}");
            }
        }
        Ok(())
    }

    /// Resolve an asset path, serving the cached copy first and falling
    /// back to populating from the bundle. Returns None only when the
    /// asset exists in neither place.
    pub fn fetch(&self, name: &str) -> Option<PathBuf> {
        let cached = self.cache_dir.join(name);
        if cached.is_file() {
            return Some(cached);
        }

        let source = self.source_dir.join(name);
        if !source.is_file() {
            warn!("Asset {name} not found in cache or bundle");
            return None;
        }
        match copy_into(&source, &cached) {
            Ok(()) => Some(cached),
            Err(err) => {
                warn!("Failed to repopulate cached asset {name}: {err:#}");
                Some(source)
            }
        }
    }

    /// Navigation-style lookup: an unknown asset falls back to the entry
    /// page instead of nothing.
    pub fn fetch_or_entry(&self, name: &str) -> Option<PathBuf> {
        self.fetch(name).or_else(|| self.fetch(ENTRY_ASSET))
    }

    fn sweep_stale_versions(&self) {
        let entries = match fs::read_dir(&self.cache_root) {
            Ok(entries) => entries,
            Err(_) => return, // nothing cached yet
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() || entry.file_name() == CACHE_VERSION {
                continue;
            }
            if let Err(err) = fs::remove_dir_all(&path) {
                warn!("Failed to delete stale cache {}: {err}", path.display());
            }
        }
    }
}

fn copy_into(source: &Path, destination: &Path) -> Result<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, destination)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{tone_asset_name, AssetCache, CACHE_VERSION, SHELL_MANIFEST};
    use std::fs;
    use tempfile::tempdir;

    fn seeded_cache(dir: &tempfile::TempDir) -> AssetCache {
        let source = dir.path().join("bundle");
        for name in ["index.html", "sounds/tone1.mp3"] {
            let path = source.join(name);
            fs::create_dir_all(path.parent().unwrap()).expect("mkdir");
            fs::write(&path, name).expect("seed asset");
        }
        AssetCache::new(source, dir.path().join("cache"))
    }

    #[test]
    fn activation_caches_present_assets_and_skips_missing_ones() {
        let dir = tempdir().expect("tempdir");
        let cache = seeded_cache(&dir);
        cache.activate().expect("activate");

        let cached_entry = dir.path().join("cache").join(CACHE_VERSION).join("index.html");
        assert!(cached_entry.is_file());
        // The rest of the manifest was missing from the bundle; activation
        // still succeeded.
        let cached_logo = dir
            .path()
            .join("cache")
            .join(CACHE_VERSION)
            .join("images/logo.png");
        assert!(!cached_logo.exists());
    }

    #[test]
    fn activation_sweeps_other_cache_versions() {
        let dir = tempdir().expect("tempdir");
        let stale = dir.path().join("cache").join("focus-cache-v0");
        fs::create_dir_all(&stale).expect("stale dir");
        fs::write(stale.join("index.html"), "old").expect("stale file");

        let cache = seeded_cache(&dir);
        cache.activate().expect("activate");

        assert!(!stale.exists());
        assert!(dir.path().join("cache").join(CACHE_VERSION).is_dir());
    }

    #[test]
    fn fetch_prefers_the_cached_copy() {
        let dir = tempdir().expect("tempdir");
        let cache = seeded_cache(&dir);
        cache.activate().expect("activate");

        // Change the bundle after activation; fetch must keep serving the
        // cached copy.
        fs::write(dir.path().join("bundle/index.html"), "changed").expect("mutate bundle");
        let served = cache.fetch("index.html").expect("fetch");
        assert_eq!(fs::read_to_string(served).expect("read"), "index.html");
    }

    #[test]
    fn fetch_repopulates_from_the_bundle_on_a_cache_miss() {
        let dir = tempdir().expect("tempdir");
        let cache = seeded_cache(&dir);
        // No activate(): the cache starts empty.
        let served = cache.fetch(&tone_asset_name(1)).expect("fetch");
        assert!(served.starts_with(dir.path().join("cache")));
        assert_eq!(
            fs::read_to_string(served).expect("read"),
            "sounds/tone1.mp3"
        );
    }

    #[test]
    fn unknown_assets_fall_back_to_the_entry_page() {
        let dir = tempdir().expect("tempdir");
        let cache = seeded_cache(&dir);
        cache.activate().expect("activate");

        assert_eq!(cache.fetch("sounds/tone4.mp3"), None);
        let fallback = cache.fetch_or_entry("sounds/tone4.mp3").expect("fallback");
        assert!(fallback.ends_with("index.html"));
    }

    #[test]
    fn manifest_covers_every_tone() {
        for tone in 1u8..=5 {
            assert!(SHELL_MANIFEST.contains(&tone_asset_name(tone).as_str()));
        }
    }
}
