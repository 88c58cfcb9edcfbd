//! Pure Rust text shaping using harfrust
//!
//! Harfrust is a pure Rust port of HarfBuzz. Together with skrifa for glyph
//! outlines it gives richtext real shaping for complex scripts without any
//! C dependencies.

// this_file: crates/richtext-shape/src/hr.rs

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use harfrust::{FontRef as HrFontRef, GlyphBuffer, ShaperData, UnicodeBuffer};
use kurbo::BezPath;
use parking_lot::{Mutex, RwLock};
use read_fonts::{types::Tag, FontRef as ReadFontRef, TableProvider};
use skrifa::MetadataProvider;

use richtext_core::{
    types::{FaceMetrics, FontSource, GlyphPlacement, ShapedRun},
    FontLoadError, Result, RichTextError, Shaper,
};

use crate::outline::glyph_path;

/// A parsed face kept alive between calls
struct LoadedFace {
    data: Arc<Vec<u8>>,
    index: u32,
    metrics: FaceMetrics,
    /// Glyph id to unscaled outline; `None` marks a blank glyph
    outlines: Mutex<HashMap<u32, Option<Arc<BezPath>>>>,
}

impl LoadedFace {
    fn load(source: &FontSource) -> std::result::Result<Self, FontLoadError> {
        let (data, index) = match source {
            FontSource::File { path, index } => {
                let bytes = std::fs::read(path)
                    .map_err(|_| FontLoadError::FileNotFound(path.display().to_string()))?;
                (Arc::new(bytes), *index)
            },
            FontSource::Memory { data, index, .. } => (Arc::clone(data), *index),
        };

        let font =
            ReadFontRef::from_index(&data, index).map_err(|_| FontLoadError::InvalidData)?;

        let has_outlines = [b"glyf", b"CFF ", b"CFF2"]
            .iter()
            .any(|tag| font.table_data(Tag::new(tag)).is_some());
        if !has_outlines {
            return Err(FontLoadError::MissingOutlines(source.cache_key()));
        }

        let units_per_em = font
            .head()
            .map(|head| head.units_per_em())
            .unwrap_or(1000);
        let hhea = font.hhea().ok();

        Ok(Self {
            data: Arc::clone(&data),
            index,
            metrics: FaceMetrics {
                units_per_em,
                ascent: hhea.as_ref().map(|h| h.ascender().to_i16() as f64),
                descent: hhea.as_ref().map(|h| h.descender().to_i16() as f64),
            },
            outlines: Mutex::new(HashMap::new()),
        })
    }
}

/// Face cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaceCacheStats {
    pub hits: usize,
    pub misses: usize,
    pub entries: usize,
}

impl FaceCacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Shaping powered by harfrust, outlines by skrifa
///
/// Faces are parsed once per font source and kept until
/// [`Shaper::clear_cache`]. The shaper is `Send + Sync`; concurrent calls
/// share the face cache.
pub struct HarfrustShaper {
    faces: RwLock<HashMap<String, Arc<LoadedFace>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl HarfrustShaper {
    pub fn new() -> Self {
        Self {
            faces: RwLock::new(HashMap::new()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    pub fn cache_stats(&self) -> FaceCacheStats {
        FaceCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.faces.read().len(),
        }
    }

    fn face(&self, source: &FontSource) -> Result<Arc<LoadedFace>> {
        let key = source.cache_key();
        if let Some(face) = self.faces.read().get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(face));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let face = match LoadedFace::load(source) {
            Ok(face) => Arc::new(face),
            Err(FontLoadError::MissingOutlines(name)) => {
                return Err(RichTextError::unavailable(format!(
                    "{name} has no glyph outlines"
                )));
            },
            Err(err) => return Err(err.into()),
        };
        log::debug!("Loaded face {key} ({} upem)", face.metrics.units_per_em);

        self.faces
            .write()
            .entry(key)
            .or_insert_with(|| Arc::clone(&face));
        Ok(face)
    }

    /// Turn harfrust's output into placements, attaching cached outlines
    fn placements(face: &LoadedFace, output: &GlyphBuffer) -> Result<Vec<GlyphPlacement>> {
        let font = skrifa::FontRef::from_index(&face.data, face.index)
            .map_err(|_| FontLoadError::InvalidData)?;
        let outlines = font.outline_glyphs();
        let mut cache = face.outlines.lock();

        let placements = output
            .glyph_infos()
            .iter()
            .zip(output.glyph_positions())
            .map(|(info, pos)| {
                let glyph_id = info.glyph_id;
                let outline = cache
                    .entry(glyph_id)
                    .or_insert_with(|| glyph_path(&outlines, glyph_id).map(Arc::new))
                    .clone();
                GlyphPlacement {
                    glyph_id,
                    outline,
                    x_offset: pos.x_offset as f64,
                    y_offset: pos.y_offset as f64,
                    x_advance: pos.x_advance as f64,
                }
            })
            .collect();

        Ok(placements)
    }
}

impl Default for HarfrustShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl Shaper for HarfrustShaper {
    fn name(&self) -> &'static str {
        "harfrust"
    }

    fn shape(&self, font: &FontSource, text: &str, size: f64) -> Result<ShapedRun> {
        let face = self.face(font)?;
        let units_per_em = face.metrics.units_per_em;

        if text.is_empty() {
            return Ok(ShapedRun {
                glyphs: Vec::new(),
                units_per_em,
            });
        }

        let hr_font =
            HrFontRef::from_index(&face.data, face.index).map_err(|_| FontLoadError::InvalidData)?;

        // ShaperData caches font tables for this call
        let shaper_data = ShaperData::new(&hr_font);
        let shaper = shaper_data
            .shaper(&hr_font)
            .point_size(Some(size as f32))
            .build();

        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(text);
        buffer.guess_segment_properties();

        let output = shaper.shape(buffer, &[]);
        let glyphs = Self::placements(&face, &output)?;

        log::trace!(
            "Shaped {:?} into {} glyphs with {}",
            text,
            glyphs.len(),
            font.cache_key()
        );

        Ok(ShapedRun {
            glyphs,
            units_per_em,
        })
    }

    fn metrics(&self, font: &FontSource, _size: f64) -> Result<FaceMetrics> {
        Ok(self.face(font)?.metrics)
    }

    fn clear_cache(&self) {
        self.faces.write().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}
