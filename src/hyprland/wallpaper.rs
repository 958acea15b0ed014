// src/hyprland/wallpaper.rs

//! Random wallpaper selection applied through hyprpaper.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::seq::SliceRandom;
use tracing::{debug, error, info};

use crate::errors::{DeskError, Result};
use crate::exec::{CommandRunner, ExecutionRequest};
use crate::fs::{FileSystem, walk_files};

use super::{HYPRCTL, monitor_name};

/// Extensions (lowercase) considered wallpaper images.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

pub struct WallpaperChanger {
    runner: Arc<dyn CommandRunner>,
    fs: Arc<dyn FileSystem>,
}

impl fmt::Debug for WallpaperChanger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WallpaperChanger")
            .field("fs", &self.fs)
            .finish_non_exhaustive()
    }
}

impl WallpaperChanger {
    pub fn new(runner: Arc<dyn CommandRunner>, fs: Arc<dyn FileSystem>) -> Self {
        Self { runner, fs }
    }

    /// Pick a random image below `source` (or `source` itself when it is an
    /// image file) and show it on the current monitor. Returns the image.
    pub async fn set_random_wallpaper(&self, source: &Path) -> Result<PathBuf> {
        let monitor = monitor_name(self.runner.as_ref()).await?;

        let images = self.find_images(source)?;
        let image = images
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| no_images(source))?;

        self.apply(&monitor, &image).await?;
        info!(monitor = %monitor, image = %image.display(), "wallpaper changed");
        Ok(image)
    }

    /// All images below `source`, or `source` alone when it is an image.
    pub fn find_images(&self, source: &Path) -> Result<Vec<PathBuf>> {
        if self.fs.is_file(source) {
            return if is_image(source) {
                Ok(vec![source.to_path_buf()])
            } else {
                Err(no_images(source))
            };
        }

        let images: Vec<PathBuf> = walk_files(self.fs.as_ref(), source)
            .map_err(|e| {
                error!(path = %source.display(), error = %e, "error finding image files");
                DeskError::Other(e)
            })?
            .into_iter()
            .filter(|p| is_image(p))
            .collect();

        if images.is_empty() {
            error!(path = %source.display(), "no image files found");
            return Err(no_images(source));
        }

        debug!(path = %source.display(), count = images.len(), "found wallpaper candidates");
        Ok(images)
    }

    async fn apply(&self, monitor: &str, image: &Path) -> Result<()> {
        let image = image.to_string_lossy();
        let steps = [
            vec!["hyprpaper".to_string(), "unload".to_string(), "all".to_string()],
            vec!["hyprpaper".to_string(), "preload".to_string(), image.to_string()],
            vec![
                "hyprpaper".to_string(),
                "wallpaper".to_string(),
                format!("{monitor},{image}"),
            ],
        ];

        for args in steps {
            self.runner
                .run(ExecutionRequest::new(HYPRCTL).args(args))
                .await?;
        }
        Ok(())
    }
}

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn no_images(source: &Path) -> DeskError {
    DeskError::Other(anyhow::anyhow!("no image files found in {}", source.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_extensions_match_case_insensitively() {
        assert!(is_image(Path::new("/w/a.PNG")));
        assert!(is_image(Path::new("/w/b.jpeg")));
        assert!(!is_image(Path::new("/w/c.gif")));
        assert!(!is_image(Path::new("/w/README")));
    }
}
