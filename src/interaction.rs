use crate::details::{PanelContent, render_details};
use crate::posts::PostIndex;
use crate::regions::RegionShape;
use geo::{Coord, Rect};
use rand::Rng;
use tracing::debug;

/// Pointer bias applied to tooltip placement, in surface units.
pub const TOOLTIP_OFFSET: Coord<f64> = Coord { x: 12.0, y: -12.0 };

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tooltip {
    pub text: String,
    pub visible: bool,
    pub position: Coord<f64>,
}

/// Hover and selection state for the rendered regions.
///
/// Owns the shapes, the post index and the current panel, so a host only
/// forwards pointer events and draws what it reads back.
pub struct InteractionController {
    shapes: Vec<RegionShape>,
    index: PostIndex,
    tooltip: Tooltip,
    panel: Option<PanelContent>,
    surface: Rect<f64>,
    offset: Coord<f64>,
    hovered: Option<usize>,
}

impl InteractionController {
    pub fn new(shapes: Vec<RegionShape>, index: PostIndex) -> Self {
        Self {
            shapes,
            index,
            tooltip: Tooltip::default(),
            panel: None,
            surface: Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 0.0, y: 0.0 }),
            offset: TOOLTIP_OFFSET,
            hovered: None,
        }
    }

    /// Installs the rendered shapes. Shapes live for the session, so later calls are ignored.
    pub fn attach(&mut self, shapes: Vec<RegionShape>) {
        if self.shapes.is_empty() {
            self.shapes = shapes;
        }
    }

    pub fn with_offset(mut self, offset: Coord<f64>) -> Self {
        self.offset = offset;
        self
    }

    /// Bounding box of the rendering surface, in pointer coordinates.
    pub fn set_surface(&mut self, surface: Rect<f64>) {
        self.surface = surface;
    }

    pub fn shapes(&self) -> &[RegionShape] {
        &self.shapes
    }

    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    pub fn panel(&self) -> Option<&PanelContent> {
        self.panel.as_ref()
    }

    pub fn set_panel(&mut self, panel: PanelContent) {
        self.panel = Some(panel);
    }

    pub fn selected(&self) -> Option<&RegionShape> {
        self.shapes.iter().find(|s| s.selected)
    }

    /// Topmost shape under a geographic point. Later shapes paint over earlier ones.
    pub fn shape_at(&self, lon: f64, lat: f64) -> Option<usize> {
        self.shapes.iter().rposition(|s| s.contains(lon, lat))
    }

    fn place_tooltip(&mut self, pointer: Coord<f64>) {
        self.tooltip.position = pointer - self.surface.min() + self.offset;
    }

    pub fn on_hover(&mut self, shape: usize, pointer: Coord<f64>) {
        let Some(region) = self.shapes.get_mut(shape) else { return };
        region.active = true;
        self.tooltip.text = region.label.clone();
        self.tooltip.visible = true;
        self.hovered = Some(shape);
        self.place_tooltip(pointer);
    }

    pub fn on_move(&mut self, shape: usize, pointer: Coord<f64>) {
        if shape < self.shapes.len() {
            self.place_tooltip(pointer);
        }
    }

    pub fn on_leave(&mut self, shape: usize) {
        let Some(region) = self.shapes.get_mut(shape) else { return };
        region.active = false;
        self.tooltip.visible = false;
        if self.hovered == Some(shape) {
            self.hovered = None;
        }
    }

    /// Moves the selection to `shape` and re-renders the details panel.
    pub fn on_select(&mut self, shape: usize) -> Option<&PanelContent> {
        if shape >= self.shapes.len() {
            return None;
        }
        for region in &mut self.shapes {
            region.selected = false;
        }
        let region = &mut self.shapes[shape];
        region.selected = true;
        let label = if region.label.is_empty() { region.key.clone() } else { region.label.clone() };
        debug!(key = %region.key, label = %label, "Region selected");
        self.panel = Some(render_details(&self.index, &region.key, &label));
        self.panel.as_ref()
    }

    /// Turns raw pointer motion into leave/enter/move transitions.
    pub fn pointer_at(&mut self, hit: Option<usize>, pointer: Coord<f64>) {
        match (self.hovered, hit) {
            (Some(prev), Some(next)) if prev == next => self.on_move(next, pointer),
            (prev, next) => {
                if let Some(prev) = prev {
                    self.on_leave(prev);
                }
                if let Some(next) = next {
                    self.on_hover(next, pointer);
                }
            }
        }
    }

    /// Selects a random region that has at least one post.
    pub fn select_random_with_posts<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&PanelContent> {
        let candidates: Vec<usize> = self
            .shapes
            .iter()
            .enumerate()
            .filter(|(_, s)| self.index.has_posts(&s.key))
            .map(|(i, _)| i)
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let pick = candidates[rng.random_range(0..candidates.len())];
        self.on_select(pick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posts::Post;
    use geo::MultiPolygon;
    use rand::{SeedableRng, rngs::StdRng};

    fn shape(label: &str) -> RegionShape {
        RegionShape {
            key: label.to_lowercase(),
            label: label.into(),
            path: "M0.00,0.00 Z".into(),
            outline: MultiPolygon::new(vec![]),
            active: false,
            selected: false,
        }
    }

    fn controller() -> InteractionController {
        let index = PostIndex::build(vec![
            Post { title: "Baguettes".into(), country_key: Some("fr".into()), ..Default::default() },
            Post { title: "Louvre".into(), country_key: Some("fr".into()), ..Default::default() },
            Post { title: "Riviera".into(), country: "FR".into(), ..Default::default() },
        ]);
        let mut shapes = vec![shape("Spain"), shape("France")];
        shapes[1].key = "fr".into();
        let mut c = InteractionController::new(shapes, index);
        c.set_surface(Rect::new(Coord { x: 100.0, y: 50.0 }, Coord { x: 1100.0, y: 550.0 }));
        c
    }

    #[test]
    fn hover_shows_offset_tooltip_and_activates() {
        let mut c = controller();
        c.on_hover(0, Coord { x: 300.0, y: 200.0 });
        let t = c.tooltip();
        assert!(t.visible);
        assert_eq!(t.text, "Spain");
        assert_eq!(t.position, Coord { x: 212.0, y: 138.0 });
        assert!(c.shapes()[0].active);
        assert!(!c.shapes()[1].active);
    }

    #[test]
    fn move_only_repositions() {
        let mut c = controller();
        c.on_hover(0, Coord { x: 300.0, y: 200.0 });
        c.on_move(0, Coord { x: 310.0, y: 205.0 });
        assert_eq!(c.tooltip().position, Coord { x: 222.0, y: 143.0 });
        assert_eq!(c.tooltip().text, "Spain");
        assert!(c.shapes()[0].active);
        assert!(c.panel().is_none());
    }

    #[test]
    fn tooltip_is_not_clamped_to_surface() {
        let mut c = controller();
        c.on_hover(0, Coord { x: 1100.0, y: 50.0 });
        assert_eq!(c.tooltip().position, Coord { x: 1012.0, y: -12.0 });
    }

    #[test]
    fn leave_hides_tooltip_but_keeps_selection() {
        let mut c = controller();
        c.on_select(0);
        c.on_hover(0, Coord { x: 0.0, y: 0.0 });
        c.on_leave(0);
        assert!(!c.tooltip().visible);
        assert!(!c.shapes()[0].active);
        assert!(c.shapes()[0].selected);
    }

    #[test]
    fn click_moves_selection() {
        let mut c = controller();
        c.on_select(0);
        c.on_select(1);
        let selected: Vec<_> = c.shapes().iter().filter(|s| s.selected).map(|s| s.label.as_str()).collect();
        assert_eq!(selected, ["France"]);
        assert_eq!(c.selected().map(|s| s.key.as_str()), Some("fr"));
    }

    #[test]
    fn click_lists_all_matching_posts() {
        let mut c = controller();
        let panel = c.on_select(1).cloned().unwrap();
        assert_eq!(panel.count(), 3);
        assert_eq!(panel.header(), "France — 3 itineraries");
        let PanelContent::Posts { cards, .. } = panel else { panic!("expected posts") };
        let titles: Vec<_> = cards.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["Baguettes", "Louvre", "Riviera"]);
    }

    #[test]
    fn reselecting_is_idempotent() {
        let mut c = controller();
        let first = c.on_select(1).cloned();
        let second = c.on_select(1).cloned();
        assert_eq!(first, second);
        assert_eq!(c.shapes().iter().filter(|s| s.selected).count(), 1);
    }

    #[test]
    fn unmatched_click_shows_empty_state() {
        let mut c = controller();
        let panel = c.on_select(0).cloned().unwrap();
        assert_eq!(panel, PanelContent::Empty { label: "Spain".into() });
    }

    #[test]
    fn out_of_range_shape_is_ignored() {
        let mut c = controller();
        c.on_hover(9, Coord { x: 0.0, y: 0.0 });
        assert!(!c.tooltip().visible);
        assert!(c.on_select(9).is_none());
    }

    #[test]
    fn pointer_motion_synthesizes_transitions() {
        let mut c = controller();
        c.pointer_at(Some(0), Coord { x: 200.0, y: 100.0 });
        assert!(c.shapes()[0].active);
        c.pointer_at(Some(1), Coord { x: 210.0, y: 100.0 });
        assert!(!c.shapes()[0].active);
        assert!(c.shapes()[1].active);
        assert_eq!(c.tooltip().text, "France");
        c.pointer_at(None, Coord { x: 0.0, y: 0.0 });
        assert!(!c.shapes()[1].active);
        assert!(!c.tooltip().visible);
    }

    #[test]
    fn blank_region_lists_no_posts() {
        let index = PostIndex::build(vec![
            Post { title: "orphan".into(), ..Default::default() },
            Post { title: "tokyo".into(), country_key: Some("jp".into()), ..Default::default() },
        ]);
        let mut blank = shape("   ");
        blank.key = String::new();
        let mut c = InteractionController::new(vec![blank], index);
        let panel = c.on_select(0).cloned().unwrap();
        assert_eq!(panel.count(), 0);
        assert!(c.select_random_with_posts(&mut StdRng::seed_from_u64(1)).is_none());
    }

    #[test]
    fn random_pick_only_lands_on_regions_with_posts() {
        let mut c = controller();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            let panel = c.select_random_with_posts(&mut rng).cloned().unwrap();
            assert_eq!(panel.label(), "France");
        }
    }
}
