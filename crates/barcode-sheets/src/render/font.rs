//! Title fonts
//!
//! Titles made of printable ASCII use the standard Helvetica font. Any other
//! title is drawn with an embedded DejaVu Sans program, addressed by glyph id
//! through a Type0 font with Identity-H encoding.

use crate::constants::{HELVETICA_CHAR_WIDTH_RATIO, TITLE_FONT_SIZE};
use crate::types::{LayoutError, Result};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use log::warn;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::Write;
use ttf_parser::{Face, GlyphId};

static DEJAVU_SANS: &[u8] = include_bytes!("../../fonts/DejaVuSans.ttf");
const EMBEDDED_FONT_NAME: &[u8] = b"DejaVuSans";

/// The title encoded for its font, shared by every page
pub(crate) struct TitleText {
    pub font_id: ObjectId,
    /// Operand for `Tj`, delimiters included
    pub operand: String,
    /// Advance width in points at the title font size
    pub width_pt: f32,
}

/// Add the font the title needs and encode the title for it.
pub(crate) fn prepare_title(output: &mut Document, title: &str) -> Result<TitleText> {
    if title.chars().all(|ch| matches!(ch, ' '..='~')) {
        Ok(standard_title(output, title))
    } else {
        embedded_title(output, title)
    }
}

fn standard_title(output: &mut Document, title: &str) -> TitleText {
    let font_id = output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]));
    TitleText {
        font_id,
        operand: format!("({})", escape_pdf_text(title)),
        width_pt: title.chars().count() as f32 * TITLE_FONT_SIZE * HELVETICA_CHAR_WIDTH_RATIO,
    }
}

/// Glyph id to (character, width in 1/1000 em) for every glyph the title uses
type GlyphUsage = BTreeMap<u16, (char, i64)>;

fn embedded_title(output: &mut Document, title: &str) -> Result<TitleText> {
    let face = Face::parse(DEJAVU_SANS, 0).map_err(|e| LayoutError::Font(e.to_string()))?;
    let scale = 1000.0 / f32::from(face.units_per_em().max(1));

    let mut operand = String::from("<");
    let mut used = GlyphUsage::new();
    let mut advance = 0;
    for ch in title.chars() {
        let glyph = face.glyph_index(ch).unwrap_or_else(|| {
            warn!("No glyph for {:?} in the title font", ch);
            GlyphId(0)
        });
        let width = face
            .glyph_hor_advance(glyph)
            .map(|units| (f32::from(units) * scale).round() as i64)
            .unwrap_or(0);
        let _ = write!(operand, "{:04X}", glyph.0);
        advance += width;
        used.entry(glyph.0).or_insert((ch, width));
    }
    operand.push('>');

    let font_file_id = output.add_object(font_file_stream(DEJAVU_SANS)?);
    let descriptor_id = output.add_object(font_descriptor(&face, scale, font_file_id));

    let widths = used
        .iter()
        .flat_map(|(glyph, (_, width))| {
            [
                Object::Integer(i64::from(*glyph)),
                Object::Array(vec![Object::Integer(*width)]),
            ]
        })
        .collect();
    let system_info = Dictionary::from_iter(vec![
        ("Registry", Object::String(b"Adobe".to_vec(), StringFormat::Literal)),
        ("Ordering", Object::String(b"Identity".to_vec(), StringFormat::Literal)),
        ("Supplement", Object::Integer(0)),
    ]);
    let cid_font_id = output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"CIDFontType2".to_vec())),
        ("BaseFont", Object::Name(EMBEDDED_FONT_NAME.to_vec())),
        ("CIDSystemInfo", Object::Dictionary(system_info)),
        ("FontDescriptor", Object::Reference(descriptor_id)),
        ("W", Object::Array(widths)),
        ("CIDToGIDMap", Object::Name(b"Identity".to_vec())),
    ]));

    let to_unicode_id = output.add_object(Stream::new(
        Dictionary::new(),
        to_unicode_cmap(&used).into_bytes(),
    ));

    let font_id = output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type0".to_vec())),
        ("BaseFont", Object::Name(EMBEDDED_FONT_NAME.to_vec())),
        ("Encoding", Object::Name(b"Identity-H".to_vec())),
        (
            "DescendantFonts",
            Object::Array(vec![Object::Reference(cid_font_id)]),
        ),
        ("ToUnicode", Object::Reference(to_unicode_id)),
    ]));

    Ok(TitleText {
        font_id,
        operand,
        width_pt: advance as f32 / 1000.0 * TITLE_FONT_SIZE,
    })
}

fn font_file_stream(program: &[u8]) -> Result<Stream> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(program)?;
    let compressed = encoder.finish()?;

    let dict = Dictionary::from_iter(vec![
        ("Length1", Object::Integer(program.len() as i64)),
        ("Filter", Object::Name(b"FlateDecode".to_vec())),
    ]);
    Ok(Stream::new(dict, compressed))
}

fn font_descriptor(face: &Face, scale: f32, font_file_id: ObjectId) -> Dictionary {
    let scaled = |units: i16| Object::Integer((f32::from(units) * scale).round() as i64);
    let bbox = face.global_bounding_box();
    let cap_height = face.capital_height().unwrap_or(face.ascender());

    Dictionary::from_iter(vec![
        ("Type", Object::Name(b"FontDescriptor".to_vec())),
        ("FontName", Object::Name(EMBEDDED_FONT_NAME.to_vec())),
        // Nonsymbolic
        ("Flags", Object::Integer(32)),
        (
            "FontBBox",
            Object::Array(vec![
                scaled(bbox.x_min),
                scaled(bbox.y_min),
                scaled(bbox.x_max),
                scaled(bbox.y_max),
            ]),
        ),
        ("ItalicAngle", Object::Integer(0)),
        ("Ascent", scaled(face.ascender())),
        ("Descent", scaled(face.descender())),
        ("CapHeight", scaled(cap_height)),
        ("StemV", Object::Integer(80)),
        ("FontFile2", Object::Reference(font_file_id)),
    ])
}

/// CMap that maps glyph ids back to text for copy and search
fn to_unicode_cmap(used: &GlyphUsage) -> String {
    let mut cmap = String::new();
    cmap.push_str("/CIDInit /ProcSet findresource begin\n12 dict begin\nbegincmap\n");
    cmap.push_str("/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n");
    cmap.push_str("/CMapName /Adobe-Identity-UCS def\n/CMapType 2 def\n");
    cmap.push_str("1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n");

    let entries: Vec<_> = used.iter().collect();
    // At most 100 mappings per bfchar block
    for chunk in entries.chunks(100) {
        let _ = writeln!(cmap, "{} beginbfchar", chunk.len());
        for (glyph, (ch, _)) in chunk {
            let mut units = [0u16; 2];
            let unicode: String = ch
                .encode_utf16(&mut units)
                .iter()
                .map(|unit| format!("{:04X}", unit))
                .collect();
            let _ = writeln!(cmap, "<{:04X}> <{}>", glyph, unicode);
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
    cmap
}

/// Escape text for a PDF literal string
fn escape_pdf_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '(' | ')') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
