use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use gtk4::prelude::*;

use crate::sequencer::CellChange;

use super::hud::{sync_pause_button, update_subtitle};
use super::state::{AppState, EMPTY_OPACITY, FADE_DURATION, FADE_STEP, FILLED_OPACITY};

pub(super) fn stop_clock(st: &mut AppState) {
    if let Some(handle) = st.clock_handle.take() {
        handle.remove();
    }
}

pub(super) fn start_clock(state: &Rc<RefCell<AppState>>) {
    let (interval, run_id) = {
        let mut st = state.borrow_mut();
        stop_clock(&mut st);
        st.paused = false;
        update_subtitle(&st);
        sync_pause_button(&st);
        (st.sequencer.interval(), st.run_id)
    };
    schedule_ticks(state, interval, run_id);
}

pub(super) fn toggle_pause(state: &Rc<RefCell<AppState>>) {
    let resume = {
        let mut st = state.borrow_mut();
        if st.clock_handle.is_some() {
            stop_clock(&mut st);
            st.paused = true;
            update_subtitle(&st);
            sync_pause_button(&st);
            false
        } else {
            true
        }
    };
    if resume {
        start_clock(state);
    }
}

pub(super) fn restart_run(state: &Rc<RefCell<AppState>>) {
    {
        let mut st = state.borrow_mut();
        stop_clock(&mut st);
        st.reset_run();
        for area in &st.cell_areas {
            area.queue_draw();
        }
    }
    start_clock(state);
}

fn schedule_ticks(state: &Rc<RefCell<AppState>>, interval: Duration, run_id: u64) {
    let state_tick = state.clone();
    let handle = glib::timeout_add_local(interval, move || {
        let mut st = state_tick.borrow_mut();
        if st.run_id != run_id {
            return glib::ControlFlow::Break;
        }

        let change = match st.sequencer.tick() {
            Ok(change) => change,
            Err(err) => {
                // Counter and permutation fell out of sync. Stop loudly
                // instead of animating garbage.
                glib::g_warning!("blocks", "animation stopped: {}", err);
                st.clock_handle = None;
                return glib::ControlFlow::Break;
            }
        };

        apply_cell_change(&state_tick, &mut st, change);
        update_subtitle(&st);

        let next_interval = st.sequencer.interval();
        if next_interval == interval {
            return glib::ControlFlow::Continue;
        }

        // Phase boundary switched the cadence; re-arm at the new interval.
        st.clock_handle = None;
        drop(st);
        schedule_ticks(&state_tick, next_interval, run_id);
        glib::ControlFlow::Break
    });
    state.borrow_mut().clock_handle = Some(handle);
}

fn apply_cell_change(state: &Rc<RefCell<AppState>>, st: &mut AppState, change: CellChange) {
    let cols = st.sequencer.spec().cols;
    let index = change.row * cols + change.col;
    let run_id = st.run_id;

    let Some(cell) = st.cells.get_mut(index) else {
        return;
    };
    cell.filled = change.filled;
    cell.fade_seq = cell.fade_seq.wrapping_add(1);
    let fade_seq = cell.fade_seq;

    let target = if change.filled {
        FILLED_OPACITY
    } else {
        EMPTY_OPACITY
    };
    let steps = (FADE_DURATION.as_millis() / FADE_STEP.as_millis()).max(1) as f64;
    let step = (target - cell.opacity) / steps;

    if let Some(area) = st.cell_areas.get(index) {
        area.queue_draw();
    }

    let state_fade = state.clone();
    glib::timeout_add_local(FADE_STEP, move || {
        let mut st = state_fade.borrow_mut();
        if st.run_id != run_id {
            return glib::ControlFlow::Break;
        }
        let Some(cell) = st.cells.get_mut(index) else {
            return glib::ControlFlow::Break;
        };
        if cell.fade_seq != fade_seq {
            return glib::ControlFlow::Break;
        }

        let next = cell.opacity + step;
        let done = if step >= 0.0 {
            next >= target
        } else {
            next <= target
        };
        cell.opacity = if done { target } else { next };
        if let Some(area) = st.cell_areas.get(index) {
            area.queue_draw();
        }

        if done {
            glib::ControlFlow::Break
        } else {
            glib::ControlFlow::Continue
        }
    });
}
