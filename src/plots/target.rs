//! File-format dispatch for the `save_*` entry points.

use std::path::Path;

use super::PlotError;

/// Backend family implied by an output path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Vector output via `SVGBackend`.
    Svg,
    /// Raster output via `BitMapBackend`.
    Bitmap,
}

/// Pick the backend from a path extension.
///
/// # Errors
///
/// Returns [`PlotError::UnsupportedFormat`] when the extension is missing
/// or not one of `svg`, `png`, `bmp`.
pub fn image_format(path: &Path) -> Result<ImageFormat, PlotError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("svg") => Ok(ImageFormat::Svg),
        Some("png" | "bmp") => Ok(ImageFormat::Bitmap),
        _ => Err(PlotError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_supported_extensions() {
        assert_eq!(
            image_format(Path::new("trace.svg")).unwrap(),
            ImageFormat::Svg
        );
        assert_eq!(
            image_format(Path::new("trace.PNG")).unwrap(),
            ImageFormat::Bitmap
        );
        assert_eq!(
            image_format(Path::new("trace.bmp")).unwrap(),
            ImageFormat::Bitmap
        );
    }

    #[test]
    fn rejects_missing_or_unknown_extensions() {
        assert!(matches!(
            image_format(Path::new("trace")),
            Err(PlotError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            image_format(Path::new("trace.pdf")),
            Err(PlotError::UnsupportedFormat { .. })
        ));
    }
}
