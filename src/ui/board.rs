use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::prelude::*;

use super::state::AppState;

pub const CONTENT_MARGIN: i32 = 12;
pub const CELL_GAP: i32 = 2;

const EMPTY_RGB: (f64, f64, f64) = (0.13, 0.29, 0.85);
const FILLED_RGB: (f64, f64, f64) = (0.86, 0.16, 0.13);

pub fn build_board_grid(state: &Rc<RefCell<AppState>>) -> gtk::Grid {
    let grid = gtk::Grid::new();
    grid.add_css_class("blocks-board");
    grid.set_row_spacing(CELL_GAP as u32);
    grid.set_column_spacing(CELL_GAP as u32);
    grid.set_halign(gtk::Align::Fill);
    grid.set_valign(gtk::Align::Fill);
    grid.set_hexpand(true);
    grid.set_vexpand(true);

    let (rows, cols) = {
        let st = state.borrow();
        let spec = st.sequencer.spec();
        (spec.rows, spec.cols)
    };

    let mut areas = Vec::new();

    for index in 0..rows * cols {
        let aspect_frame = gtk::AspectFrame::builder()
            .ratio(1.0)
            .obey_child(false)
            .halign(gtk::Align::Fill)
            .valign(gtk::Align::Fill)
            .hexpand(true)
            .vexpand(true)
            .build();

        let area = gtk::DrawingArea::builder()
            .hexpand(true)
            .vexpand(true)
            .build();
        area.add_css_class("blocks-cell");

        let state_draw = state.clone();
        area.set_draw_func(move |_, cr, width, height| {
            let st = state_draw.borrow();
            let Some(cell) = st.cells.get(index) else {
                return;
            };

            cr.set_antialias(cairo::Antialias::Best);

            let (r, g, b) = if cell.filled { FILLED_RGB } else { EMPTY_RGB };
            cr.rectangle(0.5, 0.5, width as f64 - 1.0, height as f64 - 1.0);
            cr.set_source_rgba(r, g, b, cell.opacity);
            let _ = cr.fill_preserve();
            cr.set_source_rgb(0.0, 0.0, 0.0);
            cr.set_line_width(1.0);
            let _ = cr.stroke();
        });

        aspect_frame.set_child(Some(&area));
        grid.attach(
            &aspect_frame,
            (index % cols) as i32,
            (index / cols) as i32,
            1,
            1,
        );
        areas.push(area);
    }

    state.borrow_mut().cell_areas = areas;

    grid
}
