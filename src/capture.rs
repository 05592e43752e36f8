//! 画像ファイルの読み込み（CLI版のファイル選択）

use crate::error::{Back2woError, Result};
use crate::scanner::ImageInfo;
use back2wo_common::{CaptureError, CapturedImage};
use image::ImageReader;
use std::io::Cursor;
use std::path::Path;

/// 読み込み済み画像
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub image: CapturedImage,
}

/// 中身から形式を判定してData URLにする
///
/// 画像でないファイルはドロップと同じく `NotAnImage` になる。
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    if !path.is_file() {
        return Err(Back2woError::FileNotFound(path.display().to_string()));
    }
    let bytes = std::fs::read(path)?;

    let format = image::guess_format(&bytes)
        .map_err(|_| CaptureError::NotAnImage(path.display().to_string()))?;
    let mime = format.to_mime_type();

    let (width, height) = ImageReader::with_format(Cursor::new(&bytes), format)
        .into_dimensions()
        .map_err(|e| Back2woError::ImageLoad(format!("{}: {}", path.display(), e)))?;

    let image = CapturedImage::from_bytes(mime, &bytes)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    tracing::debug!(file = %file_name, mime, width, height, "image loaded");
    Ok(LoadedImage { file_name, width, height, image })
}

/// 順に読み込む
///
/// フォルダから展開した画像が実は画像でなければ、ドロップと同じく黙って飛ばす。
/// 直接指定したファイルはエラーにする。
pub fn load_all(images: &[ImageInfo]) -> Result<Vec<LoadedImage>> {
    let mut loaded = Vec::with_capacity(images.len());

    for info in images {
        match load_image(&info.path) {
            Ok(image) => loaded.push(image),
            Err(Back2woError::Capture(err @ CaptureError::NotAnImage(_))) if !info.explicit => {
                tracing::debug!(file = %info.file_name, %err, "skipped non-image in folder");
            }
            Err(err) => return Err(err),
        }
    }

    if loaded.is_empty() && !images.is_empty() {
        let folder = images[0]
            .path
            .parent()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        return Err(Back2woError::NoImagesFound(folder));
    }

    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_image_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shirt.png");
        image::RgbImage::new(4, 3).save(&path).unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded.file_name, "shirt.png");
        assert_eq!((loaded.width, loaded.height), (4, 3));
        assert_eq!(loaded.image.mime_type(), "image/png");
    }

    #[test]
    fn test_load_image_rejects_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.png");
        std::fs::write(&path, "not really a png").unwrap();

        let err = load_image(&path).unwrap_err();
        assert!(matches!(err, Back2woError::Capture(CaptureError::NotAnImage(_))));
    }

    #[test]
    fn test_load_all_skips_disguised_file_in_folder() {
        let dir = tempdir().unwrap();
        image::RgbImage::new(2, 2).save(dir.path().join("a.png")).unwrap();
        std::fs::write(dir.path().join("b.jpg"), "not really a jpeg").unwrap();
        image::RgbImage::new(2, 2).save(dir.path().join("c.png")).unwrap();

        let found = crate::scanner::collect_images(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(found.len(), 3);

        let loaded = load_all(&found).unwrap();
        let names: Vec<&str> = loaded.iter().map(|l| l.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "c.png"]);
    }

    #[test]
    fn test_load_all_folder_without_real_images() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("b.jpg"), "not really a jpeg").unwrap();

        let found = crate::scanner::collect_images(&[dir.path().to_path_buf()]).unwrap();
        let err = load_all(&found).unwrap_err();
        assert!(matches!(err, Back2woError::NoImagesFound(_)));
    }

    #[test]
    fn test_load_image_missing() {
        let err = load_image(Path::new("/nonexistent/shirt.png")).unwrap_err();
        assert!(matches!(err, Back2woError::FileNotFound(_)));
    }
}
