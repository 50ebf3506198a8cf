use std::path::Path;

use anyhow::{Context, Result};
use image::RgbaImage;

/// Decode an image file into an RGBA8 buffer.
pub fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).with_context(|| {
        if !path.exists() {
            format!("file not found: {}", path.display())
        } else {
            format!(
                "unsupported or corrupt image: {}. Supported formats: PNG, JPEG, WebP, BMP, TIFF, GIF",
                path.display()
            )
        }
    })?;
    Ok(img.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }

    fn create_test_image_solid(path: &Path, width: u32, height: u32, rgb: [u8; 3]) {
        let img = image::RgbImage::from_fn(width, height, |_, _| image::Rgb(rgb));
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        img.save(path).unwrap();
    }

    #[test]
    fn load_4x4_png() {
        let path = fixture_path("loader_4x4.png");
        create_test_image_solid(&path, 4, 4, [128, 64, 32]);

        let img = load_rgba(&path).unwrap();
        assert_eq!(img.dimensions(), (4, 4));
        assert_eq!(img.get_pixel(0, 0).0, [128, 64, 32, 255]);
    }

    #[test]
    fn load_file_not_found() {
        let err = load_rgba(Path::new("/nonexistent/image.png"))
            .unwrap_err()
            .to_string();
        assert!(
            err.contains("file not found"),
            "expected file-not-found error, got: {err}"
        );
    }

    #[test]
    fn load_unsupported_format() {
        let path = fixture_path("loader_not_an_image.txt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "this is not an image").unwrap();

        let err = load_rgba(&path).unwrap_err().to_string();
        assert!(
            err.contains("unsupported"),
            "expected unsupported format error, got: {err}"
        );
    }
}
