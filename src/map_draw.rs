use crate::regions::RegionShape;
use geo::LineString;
use ratatui::layout::Rect as TuiRect;
use ratatui::style::Color;
use ratatui::widgets::canvas::{Canvas, Context, Line};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

fn region_color(shape: &RegionShape) -> Color {
    if shape.selected {
        Color::Red
    } else if shape.active {
        Color::Yellow
    } else {
        Color::White
    }
}

fn draw_ring(ctx: &mut Context, ring: &LineString<f64>, color: Color) {
    for window in ring.0.windows(2) {
        let (a, b) = (window[0], window[1]);
        ctx.draw(&Line { x1: a.x, y1: a.y, x2: b.x, y2: b.y, color });
    }
}

fn draw_shape(ctx: &mut Context, shape: &RegionShape, color: Color) {
    for poly in &shape.outline.0 {
        draw_ring(ctx, poly.exterior(), color);
        for hole in poly.interiors() {
            draw_ring(ctx, hole, color);
        }
    }
}

/// Draws region outlines on an equirectangular canvas.
///
/// Plain outlines go first so active and selected regions paint over shared borders.
pub fn render(f: &mut Frame, area: TuiRect, title: &str, shapes: &[RegionShape]) {
    let canvas = Canvas::default()
        .block(Block::default().title(title).borders(Borders::ALL))
        .x_bounds([-180.0, 180.0])
        .y_bounds([-90.0, 90.0])
        .paint(|ctx| {
            let mut highlighted: Vec<&RegionShape> = Vec::new();
            for shape in shapes {
                if shape.active || shape.selected {
                    highlighted.push(shape);
                    continue;
                }
                draw_shape(ctx, shape, Color::White);
            }
            ctx.layer();
            for shape in highlighted {
                draw_shape(ctx, shape, region_color(shape));
            }
        });
    f.render_widget(canvas, area);
}
