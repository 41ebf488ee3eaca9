use crate::{
    config::AppConfig,
    details::PanelContent,
    error::LoadError,
    interaction::InteractionController,
    posts::{Post, PostIndex},
    projection,
    regions::{self, ViewBox},
};
use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};
use geo::{Coord, Rect};
use geojson::FeatureCollection;
use ratatui::layout::Rect as TuiRect;
use tracing::{info, warn};

#[derive(Clone, Debug, PartialEq)]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed,
}

pub struct AppState {
    pub controller: InteractionController,
    pub status: LoadStatus,
    /// Inner area of the map canvas from the last draw.
    pub map_area: TuiRect,
    view: ViewBox,
    name_property: String,
}

impl AppState {
    pub const HELP_TEXT: &'static str = "\
mouse: hover / click a country
r: random destination
q / Esc: quit";

    pub fn new(config: &AppConfig, posts: Vec<Post>) -> Self {
        let index = PostIndex::build(posts);
        info!(posts = index.len(), countries = index.keys().count(), "Indexed posts");
        let [dx, dy] = config.ui.tooltip_offset;
        let controller = InteractionController::new(Vec::new(), index).with_offset(Coord { x: dx, y: dy });
        Self {
            controller,
            status: LoadStatus::Loading,
            map_area: TuiRect::default(),
            view: ViewBox::new(config.map.width, config.map.height),
            name_property: config.map.name_property.clone(),
        }
    }

    /// Applies the outcome of the one geometry load.
    pub fn finish_load(&mut self, result: Result<FeatureCollection, LoadError>) {
        match result {
            Ok(collection) => {
                let shapes = regions::render_all(&collection, self.view, &self.name_property);
                self.controller.attach(shapes);
                self.status = LoadStatus::Ready;
            }
            Err(e) => {
                warn!(error = %e, "Map unavailable");
                self.controller.set_panel(PanelContent::Unavailable);
                self.status = LoadStatus::Failed;
            }
        }
    }

    pub fn set_map_area(&mut self, area: TuiRect) {
        self.map_area = area;
        self.controller.set_surface(Rect::new(
            Coord { x: area.x as f64, y: area.y as f64 },
            Coord { x: area.right() as f64, y: area.bottom() as f64 },
        ));
    }

    /// Geographic point under a terminal cell, if the cell is on the map.
    pub fn cell_to_lon_lat(&self, column: u16, row: u16) -> Option<(f64, f64)> {
        let area = self.map_area;
        if area.width == 0 || area.height == 0 {
            return None;
        }
        if column < area.x || column >= area.right() || row < area.y || row >= area.bottom() {
            return None;
        }
        let x = (column - area.x) as f64 + 0.5;
        let y = (row - area.y) as f64 + 0.5;
        Some(projection::unproject(x, y, area.width as f64, area.height as f64))
    }

    /// Returns true when the app should exit.
    pub fn handle_input(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('r') => {
                if self.controller.select_random_with_posts(&mut rand::rng()).is_none() {
                    info!("No region has posts yet");
                }
            }
            _ => {}
        }
        false
    }

    pub fn handle_mouse(&mut self, event: MouseEvent) {
        let pointer = Coord { x: event.column as f64, y: event.row as f64 };
        let hit = self
            .cell_to_lon_lat(event.column, event.row)
            .and_then(|(lon, lat)| self.controller.shape_at(lon, lat));
        match event.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => self.controller.pointer_at(hit, pointer),
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(shape) = hit {
                    self.controller.on_select(shape);
                }
            }
            _ => {}
        }
    }
}
