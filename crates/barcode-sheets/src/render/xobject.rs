//! Image XObject creation
//!
//! Source images are embedded once per identifier as RGB
//! image XObjects compressed with Flate.

use crate::types::Result;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::DynamicImage;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::io::Write;

/// Add a decoded image to the output as an image XObject.
///
/// Transparent pixels are composited onto white, since the XObject carries
/// no soft mask.
pub fn embed_image(output: &mut Document, image: &DynamicImage) -> Result<ObjectId> {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut raw = Vec::with_capacity(width as usize * height as usize * 3);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        raw.extend([r, g, b].map(|channel| over_white(channel, a)));
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&raw)?;
    let compressed = encoder.finish()?;

    let image_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"XObject".to_vec())),
        ("Subtype", Object::Name(b"Image".to_vec())),
        ("Width", Object::Integer(i64::from(width))),
        ("Height", Object::Integer(i64::from(height))),
        ("ColorSpace", Object::Name(b"DeviceRGB".to_vec())),
        ("BitsPerComponent", Object::Integer(8)),
        ("Filter", Object::Name(b"FlateDecode".to_vec())),
    ]);

    Ok(output.add_object(Stream::new(image_dict, compressed)))
}

fn over_white(channel: u8, alpha: u8) -> u8 {
    let (channel, alpha) = (u16::from(channel), u16::from(alpha));
    ((channel * alpha + 255 * (255 - alpha)) / 255) as u8
}
