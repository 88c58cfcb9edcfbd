//! Glyph outlines as kurbo paths

use kurbo::BezPath;
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlineGlyphCollection, OutlinePen};
use skrifa::GlyphId;

/// Collects skrifa's pen calls into a [`BezPath`] in font units, y up
#[derive(Debug, Default)]
pub struct BezPathPen {
    path: BezPath,
}

impl BezPathPen {
    pub fn finish(self) -> BezPath {
        self.path
    }
}

impl OutlinePen for BezPathPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to((x as f64, y as f64));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to((x as f64, y as f64));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.path
            .quad_to((cx0 as f64, cy0 as f64), (x as f64, y as f64));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.path.curve_to(
            (cx0 as f64, cy0 as f64),
            (cx1 as f64, cy1 as f64),
            (x as f64, y as f64),
        );
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}

/// Unscaled outline of one glyph; `None` for blank or missing glyphs
pub fn glyph_path(outlines: &OutlineGlyphCollection<'_>, glyph_id: u32) -> Option<BezPath> {
    let glyph = outlines.get(GlyphId::new(glyph_id))?;
    let mut pen = BezPathPen::default();
    let settings = DrawSettings::unhinted(Size::unscaled(), LocationRef::default());
    if let Err(err) = glyph.draw(settings, &mut pen) {
        log::debug!("Outline for glyph {glyph_id} failed: {err}");
        return None;
    }
    let path = pen.finish();
    (!path.elements().is_empty()).then_some(path)
}

#[cfg(test)]
mod tests {
    use kurbo::{PathEl, Point, Shape};

    use super::*;

    #[test]
    fn test_pen_records_elements() {
        let mut pen = BezPathPen::default();
        pen.move_to(0.0, 0.0);
        pen.line_to(100.0, 0.0);
        pen.quad_to(150.0, 50.0, 100.0, 100.0);
        pen.curve_to(80.0, 120.0, 20.0, 120.0, 0.0, 100.0);
        pen.close();

        let path = pen.finish();
        assert_eq!(path.elements().len(), 5);
        assert_eq!(path.elements()[0], PathEl::MoveTo(Point::new(0.0, 0.0)));
        assert_eq!(path.elements()[4], PathEl::ClosePath);

        // y is kept pointing up
        let bbox = path.bounding_box();
        assert!(bbox.y1 > 100.0);
        assert_eq!(bbox.y0, 0.0);
    }
}
