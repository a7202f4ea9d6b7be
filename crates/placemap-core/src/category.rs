//! Category-to-colour reduction used by map markers.

use crate::place::Categories;

/// Marker colour for categories with no entry in [`CATEGORY_COLORS`].
pub const FALLBACK_COLOR: &str = "gray";

/// Marker colour per top-level category segment.
pub const CATEGORY_COLORS: &[(&str, &str)] = &[
    ("accommodation", "cornflowerblue"),
    ("activity", "tomato"),
    ("adult", "hotpink"),
    ("administrative", "red"),
    ("amenity", "mediumpurple"),
    ("airport", "darkkhaki"),
    ("beach", "lightseagreen"),
    ("building", "sienna"),
    ("camping", "olivedrab"),
    ("catering", "slategray"),
    ("childcare", "palevioletred"),
    ("commercial", "chocolate"),
    ("education", "goldenrod"),
    ("entertainment", "rebeccapurple"),
    ("healthcare", "crimson"),
    ("heritage", "mediumseagreen"),
    ("highway", "lightskyblue"),
    ("leisure", "darkorange"),
    ("low_emission_zone", "teal"),
    ("man_made", "maroon"),
    ("national_park", "forestgreen"),
    ("natural", "springgreen"),
    ("office", "teal"),
    ("parking", "silver"),
    ("pet", "deeppink"),
    ("political", "darkolivegreen"),
    ("populated_place", "royalblue"),
    ("postal_code", "indianred"),
    ("power", "blueviolet"),
    ("production", "saddlebrown"),
    ("public_transport", "mediumslateblue"),
    ("railway", "lightpink"),
    ("religion", "darkmagenta"),
    ("rental", "darkblue"),
    ("service", "darkslategray"),
    ("ski", "cornsilk"),
    ("sport", "mediumorchid"),
    ("tourism", "cadetblue"),
];

/// Resolve the marker colour for a category list.
#[must_use]
pub fn category_color(categories: &Categories) -> &'static str {
    categories
        .display_segment()
        .and_then(|segment| {
            CATEGORY_COLORS
                .iter()
                .find(|(name, _)| *name == segment)
                .map(|(_, color)| *color)
        })
        .unwrap_or(FALLBACK_COLOR)
}
