use std::io::Cursor;

use exif::{In, Tag};
use image::DynamicImage;

/// EXIF orientation of a camera photo
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Normal,
    MirroredHorizontal,
    CW180,
    MirroredVertical,
    MirroredHorizontalAnd270CW,
    CW90,
    MirroredHorizontalAnd90CW,
    CW270,
}

impl Orientation {
    /// Orientation tag of the primary image. Photos without EXIF data, or
    /// with an unreadable block, are treated as upright.
    pub fn from_bytes(data: &[u8]) -> Self {
        exif::Reader::new()
            .read_from_container(&mut Cursor::new(data))
            .ok()
            .and_then(|exif| {
                exif.get_field(Tag::Orientation, In::PRIMARY)
                    .and_then(|field| field.value.get_uint(0))
            })
            .map(Into::into)
            .unwrap_or_default()
    }

    /// Turn the decoded pixels upright
    #[must_use]
    pub fn apply(self, img: DynamicImage) -> DynamicImage {
        match self {
            Self::Normal => img,
            Self::CW180 => img.rotate180(),
            Self::CW270 => img.rotate270(),
            Self::CW90 => img.rotate90(),
            Self::MirroredHorizontal => img.fliph(),
            Self::MirroredVertical => img.flipv(),
            Self::MirroredHorizontalAnd90CW => img.fliph().rotate90(),
            Self::MirroredHorizontalAnd270CW => img.fliph().rotate270(),
        }
    }
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Self::MirroredHorizontal,
            3 => Self::CW180,
            4 => Self::MirroredVertical,
            5 => Self::MirroredHorizontalAnd270CW,
            6 => Self::CW90,
            7 => Self::MirroredHorizontalAnd90CW,
            8 => Self::CW270,
            _ => Self::Normal,
        }
    }
}
