use crate::details::html_escape;
use crate::regions::{RegionShape, ViewBox};
use std::fmt::Write;

/// Serializes rendered regions as a standalone SVG document.
pub fn render_document(shapes: &[RegionShape], view: ViewBox) -> String {
    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" id=\"world-map\" viewBox=\"0 0 {} {}\">\n",
        view.width, view.height
    );
    for shape in shapes {
        let mut class = String::from("map-region");
        if shape.active {
            class.push_str(" is-active");
        }
        if shape.selected {
            class.push_str(" is-selected");
        }
        let _ = writeln!(
            svg,
            "  <path class=\"{class}\" d=\"{}\" data-country=\"{}\" data-label=\"{}\" />",
            shape.path,
            html_escape(&shape.key),
            html_escape(&shape.label),
        );
    }
    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::MultiPolygon;

    #[test]
    fn one_path_per_region_with_escaped_attributes() {
        let shapes = vec![
            RegionShape {
                key: "côte d\"ivoire".into(),
                label: "Côte d\"Ivoire".into(),
                path: "M1.00,1.00 L2.00,2.00 Z".into(),
                outline: MultiPolygon::new(vec![]),
                active: false,
                selected: true,
            },
            RegionShape {
                key: "chad".into(),
                label: "Chad".into(),
                path: "M3.00,3.00 Z".into(),
                outline: MultiPolygon::new(vec![]),
                active: false,
                selected: false,
            },
        ];
        let svg = render_document(&shapes, ViewBox::default());
        assert!(svg.contains("viewBox=\"0 0 1000 500\""));
        assert_eq!(svg.matches("<path ").count(), 2);
        assert!(svg.contains("class=\"map-region is-selected\""));
        assert!(svg.contains("data-label=\"Côte d&quot;Ivoire\""));
        assert!(svg.contains("d=\"M1.00,1.00 L2.00,2.00 Z\""));
    }

    #[test]
    fn empty_map_is_bare_svg() {
        let svg = render_document(&[], ViewBox::new(200.0, 100.0));
        assert!(!svg.contains("<path"));
        assert!(svg.ends_with("</svg>\n"));
    }
}
