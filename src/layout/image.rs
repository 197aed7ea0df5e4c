//! Raster image leaf. Decoding happens on first measure and is cached.

use std::path::PathBuf;
use std::rc::Rc;

use crate::error::{LayoutError, Result};
use crate::geometry::Size;
use crate::image_loader::{load_image, ImageSource, LoadedImage};
use crate::layout::Element;
use crate::renderer::DocumentRenderer;

pub struct Image {
    source: ImageSource,
    authored: Size,
    size: Size,
    loaded: Option<Rc<LoadedImage>>,
}

impl Image {
    pub fn new(source: impl Into<ImageSource>) -> Self {
        Self {
            source: source.into(),
            authored: Size::ZERO,
            size: Size::ZERO,
            loaded: None,
        }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::new(ImageSource::Path(path.into()))
    }

    /// A data URI or bare base64 string.
    pub fn from_encoded(data: impl Into<String>) -> Self {
        Self::new(ImageSource::Encoded(data.into()))
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.authored = size;
        self
    }

    fn loaded(&mut self) -> Result<Rc<LoadedImage>> {
        if let Some(image) = &self.loaded {
            return Ok(Rc::clone(image));
        }
        let image = Rc::new(load_image(&self.source)?);
        self.loaded = Some(Rc::clone(&image));
        Ok(image)
    }
}

impl Element for Image {
    fn kind(&self) -> &'static str {
        "Image"
    }

    fn size(&self) -> Size {
        self.size
    }

    fn authored_size(&self) -> Size {
        self.authored
    }

    /// A missing dimension keeps the pixel aspect ratio; with both missing
    /// the image takes the boundary, or its pixel size if that is empty too.
    fn measure(&mut self, boundary: Size, _renderer: &DocumentRenderer) -> Result<()> {
        let (px_width, px_height) = self.loaded()?.natural_size();
        let mut size = self.authored.merge(boundary);
        if size.is_zero() {
            size = Size::new(px_width, px_height);
        } else if size.width == 0.0 && px_height > 0.0 {
            size.width = size.height * px_width / px_height;
        } else if size.height == 0.0 && px_width > 0.0 {
            size.height = size.width * px_height / px_width;
        }
        self.size = size;
        Ok(())
    }

    fn render(&mut self, renderer: &mut DocumentRenderer) -> Result<()> {
        self.size.ensure_drawable("Image")?;
        let image = self
            .loaded
            .clone()
            .ok_or_else(|| LayoutError::backend("draw image", "image was never measured"))?;
        renderer.draw_image(image, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::DrawOp;
    use crate::geometry::Offset;
    use crate::image_loader::tests::png_bytes;
    use crate::layout::testing::renderer;

    #[test]
    fn missing_dimension_keeps_aspect_ratio() {
        let r = renderer();
        let mut image = Image::new(png_bytes(4, 2, 255)).with_size(Size::width(40.0));
        image.measure(Size::new(100.0, 0.0), &r).unwrap();
        assert_eq!(image.size(), Size::new(40.0, 20.0));

        let mut image = Image::new(png_bytes(4, 2, 255));
        image.measure(Size::ZERO, &r).unwrap();
        assert_eq!(image.size(), Size::new(4.0, 2.0));
    }

    #[test]
    fn draws_at_cursor() {
        let mut r = renderer();
        let mut image = Image::new(png_bytes(2, 2, 255)).with_size(Size::square(30.0));
        image.measure(Size::new(100.0, 100.0), &r).unwrap();
        image.render(&mut r).unwrap();

        let op = &r.pages().unwrap()[0].ops[0];
        match op {
            DrawOp::Image { origin, size, .. } => {
                assert_eq!(*origin, Offset::new(54.0, 54.0));
                assert_eq!(*size, Size::square(30.0));
            }
            other => panic!("expected an image, got {:?}", other),
        }
    }

    #[test]
    fn bad_source_is_a_backend_error() {
        let r = renderer();
        let mut image = Image::from_encoded("not base64 at all!");
        assert!(matches!(
            image.measure(Size::new(10.0, 10.0), &r),
            Err(LayoutError::Backend { .. })
        ));
    }
}
