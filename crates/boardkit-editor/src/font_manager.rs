//! System font lookup for glyph measurement and rasterising.
//!
//! A [`FontSpec`] is resolved against the system font database once and the
//! outcome, hit or miss, is remembered. A missing family falls back to the
//! generic monospace face and then to sans-serif; `None` means the machine
//! has no usable outline font at all, and callers degrade to fixed metrics.

use crate::surface::FontSpec;
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use parking_lot::Mutex;
use rusttype::Font;
use std::collections::HashMap;
use std::sync::OnceLock;

type Face = &'static Font<'static>;

/// Tried in order after the requested family.
const FALLBACK_FAMILIES: [&str; 2] = ["monospace", "sans-serif"];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FaceKey {
    family: String,
    bold: bool,
    italic: bool,
}

impl FaceKey {
    fn of(spec: &FontSpec) -> Self {
        Self {
            family: spec.family.trim().to_string(),
            bold: spec.bold,
            italic: spec.italic,
        }
    }

    fn with_family(&self, family: &str) -> Self {
        Self {
            family: family.to_string(),
            ..self.clone()
        }
    }

    fn query_family(&self) -> Family<'_> {
        generic_family(&self.family).unwrap_or(Family::Name(&self.family))
    }
}

/// CSS-style generic names map onto fontdb's generic families.
fn generic_family(name: &str) -> Option<Family<'static>> {
    match name.to_ascii_lowercase().as_str() {
        "" | "sans" | "sans-serif" => Some(Family::SansSerif),
        "serif" => Some(Family::Serif),
        "mono" | "monospace" => Some(Family::Monospace),
        "cursive" => Some(Family::Cursive),
        "fantasy" => Some(Family::Fantasy),
        _ => None,
    }
}

fn system() -> &'static Database {
    static SYSTEM: OnceLock<Database> = OnceLock::new();
    SYSTEM.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        tracing::debug!("Loaded {} system font faces", db.len());
        db
    })
}

fn cache() -> &'static Mutex<HashMap<FaceKey, Option<Face>>> {
    static CACHE: OnceLock<Mutex<HashMap<FaceKey, Option<Face>>>> = OnceLock::new();
    CACHE.get_or_init(Default::default)
}

/// The outline face for `spec`, or `None` when no system font can stand in.
pub fn font_for(spec: &FontSpec) -> Option<Face> {
    let key = FaceKey::of(spec);
    if let Some(known) = cache().lock().get(&key) {
        return *known;
    }

    let face = std::iter::once(key.clone())
        .chain(FALLBACK_FAMILIES.iter().map(|f| key.with_family(f)))
        .find_map(|candidate| load(&candidate))
        .map(|font| -> Face { Box::leak(Box::new(font)) });

    if face.is_none() {
        tracing::warn!("No usable font found for family '{}'", key.family);
    }
    cache().lock().insert(key, face);
    face
}

fn load(key: &FaceKey) -> Option<Font<'static>> {
    let db = system();
    let families = [key.query_family()];
    let id = db.query(&Query {
        families: &families,
        weight: if key.bold { Weight::BOLD } else { Weight::NORMAL },
        stretch: Stretch::Normal,
        style: if key.italic { Style::Italic } else { Style::Normal },
    })?;
    db.with_face_data(id, |data, index| Font::try_from_vec_and_index(data.to_vec(), index))
        .flatten()
}
