use gtk4::prelude::*;

use crate::sequencer::Phase;

use super::state::AppState;

pub(super) fn update_subtitle(st: &AppState) {
    if let Some(subtitle) = &st.subtitle {
        let phase_label = match st.sequencer.phase() {
            Phase::Filling => "Filling",
            Phase::Clearing => "Clearing",
        };
        if st.paused {
            subtitle.set_text(&format!("{} | Paused", phase_label));
        } else {
            subtitle.set_text(&format!(
                "{} | {}/{}",
                phase_label,
                st.sequencer.count(),
                st.sequencer.spec().cell_count()
            ));
        }
    }
}

pub(super) fn sync_pause_button(st: &AppState) {
    if let Some(button) = &st.pause_button {
        if st.paused {
            button.set_icon_name("media-playback-start-symbolic");
            button.set_tooltip_text(Some("Resume"));
        } else {
            button.set_icon_name("media-playback-pause-symbolic");
            button.set_tooltip_text(Some("Pause"));
        }
    }
}
