use gtk4 as gtk;
use libadwaita as adw;

use adw::prelude::*;

pub fn show_about_dialog(app: &adw::Application) -> adw::AboutDialog {
    let dialog = adw::AboutDialog::builder()
        .application_name("Blocks")
        .version("1.0.0")
        .comments("A grid of blocks that fills up and empties out in random order.")
        .build();
    dialog.add_legal_section("Blocks", None, gtk::License::MitX11, None);
    dialog.present(app.active_window().as_ref());
    dialog
}
