/// Opaque 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// RGB color with an alpha fraction in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba(pub u8, pub u8, pub u8, pub f32);

impl Rgba {
    /// Collapse to an opaque color by scaling against a black backdrop
    /// (terminals have no alpha channel)
    pub fn flatten(self) -> Rgb {
        let Rgba(r, g, b, a) = self;
        let scale = |c: u8| (f32::from(c) * a).round() as u8;
        Rgb(scale(r), scale(g), scale(b))
    }
}

/// Rendering style for a disaster marker. `radius` is in meters; the
/// projection layer converts it to pixels at draw time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisasterStyle {
    pub color: Rgb,
    pub fill: Rgba,
    pub radius: f64,
}

const FIRE: DisasterStyle = DisasterStyle {
    color: Rgb(255, 77, 77),
    fill: Rgba(255, 0, 0, 0.4),
    radius: 5000.0,
};

const FLOOD: DisasterStyle = DisasterStyle {
    color: Rgb(30, 144, 255),
    fill: Rgba(30, 144, 255, 0.4),
    radius: 12000.0,
};

const DAMAGED_BUILDINGS: DisasterStyle = DisasterStyle {
    color: Rgb(255, 204, 0),
    fill: Rgba(255, 204, 0, 0.4),
    radius: 3000.0,
};

const LANDSLIDE: DisasterStyle = DisasterStyle {
    color: Rgb(153, 102, 51),
    fill: Rgba(153, 102, 51, 0.4),
    radius: 8000.0,
};

const FALLEN_TREES: DisasterStyle = DisasterStyle {
    color: Rgb(34, 139, 34),
    fill: Rgba(34, 139, 34, 0.4),
    radius: 2000.0,
};

const FALLBACK: DisasterStyle = DisasterStyle {
    color: Rgb(178, 102, 255),
    fill: Rgba(178, 102, 255, 0.4),
    radius: 3000.0,
};

/// Keyword stems checked in order against the lower-cased category text.
/// The sequence is a deliberate tie-break: "fire and flood" must resolve
/// to the fire style because fire is tested first.
const STEMS: [(&str, DisasterStyle); 5] = [
    ("fire", FIRE),
    ("flood", FLOOD),
    ("damaged", DAMAGED_BUILDINGS),
    ("landslide", LANDSLIDE),
    ("tree", FALLEN_TREES),
];

/// Legend entries in display order
pub const LEGEND: [(&str, Rgb); 6] = [
    ("Flood", Rgb(30, 144, 255)),
    ("Fire", Rgb(255, 77, 77)),
    ("Damaged Buildings", Rgb(255, 204, 0)),
    ("Landslide", Rgb(153, 102, 51)),
    ("Fallen Trees", Rgb(34, 139, 34)),
    ("Other", Rgb(178, 102, 255)),
];

/// Cycle of chart series colors
const CHART_COLORS: [Rgb; 6] = [
    Rgb(255, 77, 77),
    Rgb(30, 144, 255),
    Rgb(255, 204, 0),
    Rgb(153, 102, 51),
    Rgb(34, 139, 34),
    Rgb(178, 102, 255),
];

/// Color for the i-th chart series (wraps around)
pub fn chart_color(index: usize) -> Rgb {
    CHART_COLORS[index % CHART_COLORS.len()]
}

/// Resolve a category label (+ optional classifier confidence) to a
/// marker style. Matching is substring-based: the first stem found
/// anywhere in the lower-cased text wins; no stem means the fallback
/// style. The radius scales with confidence when one is present; color
/// and fill are fixed per stem.
pub fn resolve_style(prediction: &str, confidence: Option<f64>) -> DisasterStyle {
    let key = prediction.to_lowercase();
    let base = STEMS
        .iter()
        .find(|(stem, _)| key.contains(stem))
        .map_or(FALLBACK, |&(_, style)| style);

    DisasterStyle {
        radius: base.radius * confidence.unwrap_or(1.0),
        ..base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_categories() {
        assert_eq!(resolve_style("flood", None), FLOOD);
        assert_eq!(resolve_style("landslide", None), LANDSLIDE);
    }

    #[test]
    fn test_case_insensitive_substring() {
        assert_eq!(resolve_style("Wildfire", None), FIRE);
        assert_eq!(resolve_style("damaged_buildings", None), DAMAGED_BUILDINGS);
        assert_eq!(resolve_style("Fallen Trees", None), FALLEN_TREES);
    }

    #[test]
    fn test_fire_beats_flood() {
        // Precedence: fire is checked before flood
        let style = resolve_style("Wildfire and Flood Damage", Some(0.5));
        assert_eq!(style.color, FIRE.color);
        assert_eq!(style.radius, FIRE.radius * 0.5);
    }

    #[test]
    fn test_mudslide_is_not_landslide() {
        // Substring match, not semantic: "mudslide" lacks the stem
        let style = resolve_style("mudslide event", None);
        assert_eq!(style, FALLBACK);
    }

    #[test]
    fn test_unknown_category_uses_fallback() {
        assert_eq!(resolve_style("volcanic eruption", None), FALLBACK);
    }

    #[test]
    fn test_no_confidence_keeps_base_radius() {
        assert_eq!(resolve_style("flood", None).radius, 12000.0);
    }

    #[test]
    fn test_confidence_scales_radius_only() {
        let style = resolve_style("flood", Some(0.25));
        assert_eq!(style.radius, 3000.0);
        assert_eq!(style.color, FLOOD.color);
        assert_eq!(style.fill, FLOOD.fill);
    }

    #[test]
    fn test_zero_confidence_zeroes_radius() {
        assert_eq!(resolve_style("fire", Some(0.0)).radius, 0.0);
    }

    #[test]
    fn test_flatten_alpha() {
        assert_eq!(Rgba(255, 0, 0, 0.4).flatten(), Rgb(102, 0, 0));
        assert_eq!(Rgba(100, 100, 100, 1.0).flatten(), Rgb(100, 100, 100));
    }
}
