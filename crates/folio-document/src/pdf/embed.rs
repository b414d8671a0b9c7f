// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Font embedding — builds the font resource objects for a `Font`.

use folio_core::error::FolioError;
use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use ttf_parser::GlyphId;

use crate::font::{Font, parse_face};

/// Symbolic font flag; required for Identity-H encoded TrueType fonts.
const FLAG_SYMBOLIC: i64 = 4;

/// Add the objects describing `font` to `document` and return the font
/// dictionary to reference from a page's `/Font` resources.
pub(crate) fn font_object(document: &mut Document, font: &Font) -> Result<Object, FolioError> {
    match font.custom_data() {
        None => Ok(Object::Dictionary(dictionary! {
            "Type" => Object::Name(b"Font".to_vec()),
            "Subtype" => Object::Name(b"Type1".to_vec()),
            "BaseFont" => Object::Name(font.key().as_bytes().to_vec()),
            "Encoding" => Object::Name(b"WinAnsiEncoding".to_vec()),
        })),
        Some(data) => {
            let face = parse_face(data)?;
            let scale = 1000.0 / face.units_per_em() as f64;
            let scaled = |v: i16| Object::Integer((v as f64 * scale).round() as i64);
            let base_font = Object::Name(font.key().as_bytes().to_vec());

            let widths: Vec<Object> = (0..face.number_of_glyphs())
                .map(|gid| {
                    let advance = face.glyph_hor_advance(GlyphId(gid)).unwrap_or(0);
                    Object::Integer((advance as f64 * scale).round() as i64)
                })
                .collect();

            let bbox = face.global_bounding_box();
            let file = Stream::new(
                dictionary! { "Length1" => Object::Integer(data.len() as i64) },
                data.as_slice().to_vec(),
            );
            let file_id = document.add_object(file);

            let descriptor_id = document.add_object(dictionary! {
                "Type" => Object::Name(b"FontDescriptor".to_vec()),
                "FontName" => base_font.clone(),
                "Flags" => Object::Integer(FLAG_SYMBOLIC),
                "FontBBox" => Object::Array(vec![
                    scaled(bbox.x_min),
                    scaled(bbox.y_min),
                    scaled(bbox.x_max),
                    scaled(bbox.y_max),
                ]),
                "ItalicAngle" => Object::Integer(0),
                "Ascent" => scaled(face.ascender()),
                "Descent" => scaled(face.descender()),
                "CapHeight" => scaled(face.capital_height().unwrap_or(face.ascender())),
                "StemV" => Object::Integer(80),
                "FontFile2" => Object::Reference(file_id),
            });

            let cid_font_id = document.add_object(dictionary! {
                "Type" => Object::Name(b"Font".to_vec()),
                "Subtype" => Object::Name(b"CIDFontType2".to_vec()),
                "BaseFont" => base_font.clone(),
                "CIDSystemInfo" => cid_system_info(),
                "FontDescriptor" => Object::Reference(descriptor_id),
                "W" => Object::Array(vec![Object::Integer(0), Object::Array(widths)]),
                "CIDToGIDMap" => Object::Name(b"Identity".to_vec()),
            });

            Ok(Object::Dictionary(dictionary! {
                "Type" => Object::Name(b"Font".to_vec()),
                "Subtype" => Object::Name(b"Type0".to_vec()),
                "BaseFont" => base_font,
                "Encoding" => Object::Name(b"Identity-H".to_vec()),
                "DescendantFonts" => Object::Array(vec![Object::Reference(cid_font_id)]),
            }))
        }
    }
}

fn cid_system_info() -> Dictionary {
    dictionary! {
        "Registry" => Object::string_literal("Adobe"),
        "Ordering" => Object::string_literal("Identity"),
        "Supplement" => Object::Integer(0),
    }
}
