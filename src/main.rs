mod sequencer;
mod ui;

fn main() {
    ui::app::run();
}
