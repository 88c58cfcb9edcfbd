//! Where family names become font files
//!
//! [`SystemFontResolver`] answers "which face draws `sans-serif`, bold,
//! italic?" using a [`fontdb::Database`]. Results are memoised per
//! family list, weight and slant, so repeated lookups for the same style
//! never touch the database again.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use fontdb::{Database, Family, Query, Source, Stretch, Style, Weight};
use parking_lot::Mutex;

use richtext_core::{
    types::FontSource, FontLoadError, FontResolver, Result, RichTextError, TextStyle,
};

/// Generic CSS-style family names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenericFamily {
    Serif,
    SansSerif,
    Monospace,
    Cursive,
    Fantasy,
}

impl GenericFamily {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "serif" => Some(Self::Serif),
            "sans-serif" | "sans" => Some(Self::SansSerif),
            "monospace" | "mono" => Some(Self::Monospace),
            "cursive" => Some(Self::Cursive),
            "fantasy" => Some(Self::Fantasy),
            _ => None,
        }
    }

    fn family(self) -> Family<'static> {
        match self {
            Self::Serif => Family::Serif,
            Self::SansSerif => Family::SansSerif,
            Self::Monospace => Family::Monospace,
            Self::Cursive => Family::Cursive,
            Self::Fantasy => Family::Fantasy,
        }
    }
}

fn fontdb_style(name: &str) -> Style {
    match name.trim().to_ascii_lowercase().as_str() {
        "italic" => Style::Italic,
        "oblique" => Style::Oblique,
        _ => Style::Normal,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct LookupKey {
    families: String,
    weight: u16,
    style: String,
}

/// Font lookup backed by fontdb
pub struct SystemFontResolver {
    db: Database,
    lookups: Mutex<HashMap<LookupKey, Option<FontSource>>>,
}

impl SystemFontResolver {
    /// An empty database; add fonts with the `load_*` methods
    pub fn new() -> Self {
        Self {
            db: Database::new(),
            lookups: Mutex::new(HashMap::new()),
        }
    }

    /// Every font the operating system knows about
    pub fn system() -> Self {
        let mut resolver = Self::new();
        resolver.db.load_system_fonts();
        log::debug!("Loaded {} system font faces", resolver.db.len());
        resolver
    }

    pub fn load_font_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.db.load_font_file(path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                RichTextError::FontLoad(FontLoadError::FileNotFound(path.display().to_string()))
            } else {
                RichTextError::Io(err)
            }
        })?;
        self.lookups.lock().clear();
        Ok(())
    }

    pub fn load_font_data(&mut self, data: Vec<u8>) {
        self.db.load_font_data(data);
        self.lookups.lock().clear();
    }

    pub fn load_fonts_dir(&mut self, dir: impl AsRef<Path>) {
        self.db.load_fonts_dir(dir);
        self.lookups.lock().clear();
    }

    /// Choose the concrete family behind a generic name
    pub fn set_generic_family(&mut self, generic: GenericFamily, name: impl Into<String>) {
        let name = name.into();
        match generic {
            GenericFamily::Serif => self.db.set_serif_family(name),
            GenericFamily::SansSerif => self.db.set_sans_serif_family(name),
            GenericFamily::Monospace => self.db.set_monospace_family(name),
            GenericFamily::Cursive => self.db.set_cursive_family(name),
            GenericFamily::Fantasy => self.db.set_fantasy_family(name),
        }
        self.lookups.lock().clear();
    }

    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    fn query(&self, style: &TextStyle) -> Option<FontSource> {
        let families: Vec<Family<'_>> = style
            .families()
            .into_iter()
            .map(|name| match GenericFamily::parse(name) {
                Some(generic) => generic.family(),
                None => Family::Name(name),
            })
            .collect();

        let query = Query {
            families: &families,
            weight: Weight(style.weight_value()),
            stretch: Stretch::Normal,
            style: fontdb_style(&style.fontstyle),
        };

        let id = self.db.query(&query)?;
        let face = self.db.face(id)?;
        let source = match &face.source {
            Source::File(path) | Source::SharedFile(path, _) => FontSource::File {
                path: path.clone(),
                index: face.index,
            },
            Source::Binary(data) => FontSource::Memory {
                name: face
                    .families
                    .first()
                    .map(|(name, _)| name.clone())
                    .unwrap_or_else(|| face.post_script_name.clone()),
                data: Arc::new((**data).as_ref().to_vec()),
                index: face.index,
            },
        };
        Some(source)
    }
}

impl Default for SystemFontResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl FontResolver for SystemFontResolver {
    fn name(&self) -> &'static str {
        "fontdb"
    }

    fn resolve(&self, style: &TextStyle) -> Option<FontSource> {
        let key = LookupKey {
            families: style.fontfamily.clone(),
            weight: style.weight_value(),
            style: style.fontstyle.clone(),
        };

        if let Some(hit) = self.lookups.lock().get(&key) {
            return hit.clone();
        }

        let found = self.query(style);
        match &found {
            Some(source) => log::debug!("Font {:?} resolved to {}", key.families, source.cache_key()),
            None => log::debug!("No face for font family {:?}", key.families),
        }
        self.lookups.lock().insert(key, found.clone());
        found
    }
}
