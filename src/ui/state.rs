use std::time::Duration;

use gtk4 as gtk;

use crate::sequencer::{GridSpec, Sequencer};

pub const FADE_DURATION: Duration = Duration::from_millis(500);
pub const FADE_STEP: Duration = Duration::from_millis(16);

pub const EMPTY_OPACITY: f64 = 0.3;
pub const FILLED_OPACITY: f64 = 1.0;

#[derive(Clone, Copy, Debug)]
pub struct CellVisual {
    pub filled: bool,
    pub opacity: f64,
    /// Bumped on every state change so an in-flight fade for an older
    /// change cancels itself.
    pub fade_seq: u64,
}

impl CellVisual {
    fn empty() -> Self {
        CellVisual {
            filled: false,
            opacity: EMPTY_OPACITY,
            fade_seq: 0,
        }
    }
}

pub struct AppState {
    pub subtitle: Option<gtk::Label>,
    pub pause_button: Option<gtk::Button>,
    pub cell_areas: Vec<gtk::DrawingArea>,

    // Animation state
    pub cells: Vec<CellVisual>,
    pub sequencer: Sequencer,
    pub clock_handle: Option<glib::SourceId>,
    pub run_id: u64,
    pub paused: bool,
}

impl AppState {
    pub fn new() -> Self {
        let spec = GridSpec::default();
        AppState {
            subtitle: None,
            pause_button: None,
            cell_areas: Vec::new(),
            cells: vec![CellVisual::empty(); spec.cell_count()],
            sequencer: Sequencer::new(spec),
            clock_handle: None,
            run_id: 0,
            paused: false,
        }
    }

    pub fn reset_run(&mut self) {
        let spec = self.sequencer.spec();
        self.run_id = self.run_id.wrapping_add(1);
        self.sequencer = Sequencer::new(spec);
        for cell in &mut self.cells {
            *cell = CellVisual::empty();
        }
        self.paused = false;
    }
}
