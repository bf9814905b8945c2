use crate::{
    geom::HexPolygon,
    render::{BoardRenderer, CellFill, CellShape, RenderFrame},
};
use svg::{
    node::{
        element::{Group, Line, Polygon, Rectangle},
        Comment,
    },
    Document,
};

/// Render a frame as an SVG. The view box matches the frame's screen size,
/// so the SVG looks exactly like the frame would on a canvas of that size.
/// Terrain cells can't embed their images here, so they get the configured
/// stand-in color and are tagged with their tile type.
pub fn frame_to_svg(frame: &RenderFrame, renderer: &BoardRenderer) -> Document {
    let config = renderer.render_config();
    let mut document = Document::new()
        .set(
            "viewBox",
            (0.0, 0.0, frame.screen_size.x, frame.screen_size.y),
        )
        .add(
            Rectangle::new()
                .set("width", "100%")
                .set("height", "100%")
                .set("fill", frame.background.as_str()),
        );

    let mut cells = Group::new();
    for cell in &frame.cells {
        cells = cells.add(draw_cell(renderer, cell));
    }
    document = document.add(cells);

    if !frame.grid_lines.is_empty() {
        let mut grid = Group::new()
            .set("stroke", config.line_color.to_html())
            .set("stroke-width", config.line_width)
            .set("stroke-linecap", "round");
        for line in &frame.grid_lines {
            grid = grid.add(
                Line::new()
                    .set("x1", line.p1.x)
                    .set("y1", line.p1.y)
                    .set("x2", line.p2.x)
                    .set("y2", line.p2.y),
            );
        }
        document = document.add(grid);
    }

    if let Some(hover) = &frame.hover {
        document = document.add(
            polygon(hover)
                .set("fill", config.hover_color.to_html())
                .set("fill-opacity", config.hover_opacity),
        );
    }

    document
}

/// Generate an SVG polygon for a single cell
fn draw_cell(renderer: &BoardRenderer, cell: &CellShape) -> Group {
    let group = Group::new().add(Comment::new(cell.hex.to_string())); // Readability!
    match &cell.fill {
        CellFill::Solid(color) => {
            group.add(polygon(&cell.polygon).set("fill", color.as_str()))
        }
        CellFill::Terrain(id) => group.add(
            polygon(&cell.polygon)
                .set("fill", renderer.render_config().terrain_color.to_html())
                .set("data-tile-type", id.index()),
        ),
    }
}

fn polygon(hex: &HexPolygon) -> Polygon {
    Polygon::new().set(
        "points",
        hex.points()
            .iter()
            .map(|point| (point.x, point.y))
            .collect::<Vec<_>>(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        board::{CellPaint, CellPos},
        config::GameConfig,
        geom::Point,
        grid::HexTile,
        render::config::RenderConfig,
        tile_type::TileTypeId,
        viewport::Viewport,
        GameModel,
    };

    #[test]
    fn test_frame_to_svg() {
        let renderer = BoardRenderer::new(RenderConfig::default()).unwrap();
        let mut game = GameModel::new(GameConfig {
            rows: 2,
            cols: 2,
            ..Default::default()
        })
        .unwrap();
        game.board_mut().set_paint(
            CellPos::new(1, 1),
            Some(CellPaint::Terrain(TileTypeId::new(7).unwrap())),
        );
        let frame = renderer.frame(
            &game,
            &Viewport::default(),
            Point::new(400.0, 300.0),
            Some(HexTile::new(0, 0)),
        );

        let svg = frame_to_svg(&frame, &renderer).to_string();
        assert!(svg.contains("viewBox=\"0 0 400 300\""));
        assert_eq!(svg.matches("<polygon").count(), 5); // 4 cells + hover
        assert_eq!(svg.matches("<line").count(), frame.grid_lines.len());
        assert!(svg.contains("data-tile-type=\"7\""));
        assert!(svg.contains("<!-- hex(1, 1) -->"));
    }
}
