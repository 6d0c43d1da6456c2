use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::gdk;
use gtk4::glib;
use gtk4::prelude::*;
use libadwaita as adw;
use adw::prelude::*;
use gio::SimpleAction;

use super::animation::{restart_run, start_clock, stop_clock, toggle_pause};
use super::board::{CONTENT_MARGIN, build_board_grid};
use super::dialogs::show_about_dialog;
use super::state::AppState;

const APP_ID: &str = "io.github.blocks.Blocks";

const APP_CSS: &str = "\
.blocks-card-container { \
    background: alpha(currentColor, 0.06); \
    border-radius: 12px; \
    padding: 10px; \
} \
.app-header { background: transparent; }";

pub fn run() {
    glib::set_prgname(Some(APP_ID));
    let app = adw::Application::builder().application_id(APP_ID).build();

    app.connect_activate(move |app| {
        load_css();

        let state = Rc::new(RefCell::new(AppState::new()));

        let about_action = SimpleAction::new("about", None);
        about_action.connect_activate({
            let app = app.clone();
            move |_, _| {
                show_about_dialog(&app);
            }
        });
        app.add_action(&about_action);

        let quit_action = SimpleAction::new("quit", None);
        quit_action.connect_activate({
            let app = app.clone();
            move |_, _| app.quit()
        });
        app.add_action(&quit_action);

        let title_box = gtk::Box::new(gtk::Orientation::Vertical, 0);
        title_box.set_valign(gtk::Align::Center);
        title_box.set_halign(gtk::Align::Center);

        let title = gtk::Label::builder()
            .label("Blocks")
            .halign(gtk::Align::Center)
            .css_classes(vec!["game-title-main"])
            .build();

        let subtitle = gtk::Label::builder()
            .label("")
            .halign(gtk::Align::Center)
            .css_classes(vec!["game-title-subtitle", "caption"])
            .build();

        title_box.append(&title);
        title_box.append(&subtitle);

        let header = adw::HeaderBar::builder().title_widget(&title_box).build();
        header.add_css_class("app-header");
        header.add_css_class("flat");

        let pause_button = gtk::Button::builder()
            .icon_name("media-playback-pause-symbolic")
            .build();
        pause_button.set_tooltip_text(Some("Pause"));
        pause_button.connect_clicked({
            let state = state.clone();
            move |_| {
                toggle_pause(&state);
            }
        });
        header.pack_start(&pause_button);

        let restart_button = gtk::Button::builder()
            .icon_name("view-refresh-symbolic")
            .build();
        restart_button.set_tooltip_text(Some("Restart"));
        restart_button.connect_clicked({
            let state = state.clone();
            move |_| {
                restart_run(&state);
            }
        });

        let menu_model = gio::Menu::new();
        menu_model.append(Some("About Blocks"), Some("app.about"));
        menu_model.append(Some("Quit"), Some("app.quit"));
        let menu_button = gtk::MenuButton::builder()
            .icon_name("open-menu-symbolic")
            .menu_model(&menu_model)
            .build();

        let end_box = gtk::Box::new(gtk::Orientation::Horizontal, 6);
        end_box.append(&restart_button);
        end_box.append(&menu_button);
        header.pack_end(&end_box);

        let board_view = build_board_view(&state);

        let toolbar = adw::ToolbarView::new();
        toolbar.set_hexpand(true);
        toolbar.set_vexpand(true);
        toolbar.add_top_bar(&header);
        toolbar.set_content(Some(&board_view));

        let win = adw::ApplicationWindow::builder()
            .application(app)
            .title("Blocks")
            .default_width(640)
            .default_height(700)
            .content(&toolbar)
            .build();
        win.set_size_request(320, 380);
        win.add_css_class("app-window");

        let style_manager = adw::StyleManager::default();
        if style_manager.is_dark() {
            win.add_css_class("theme-dark");
        } else {
            win.add_css_class("theme-light");
        }

        {
            let mut st = state.borrow_mut();
            st.subtitle = Some(subtitle);
            st.pause_button = Some(pause_button);
        }

        let global_key = gtk::EventControllerKey::new();
        global_key.set_propagation_phase(gtk::PropagationPhase::Capture);
        global_key.connect_key_pressed({
            let win = win.clone();
            move |_, key, _, _| {
                if key == gdk::Key::Escape {
                    win.close();
                    return gtk::glib::Propagation::Stop;
                }
                gtk::glib::Propagation::Proceed
            }
        });
        win.add_controller(global_key);

        win.connect_close_request({
            let state = state.clone();
            move |_| {
                let mut st = state.borrow_mut();
                stop_clock(&mut st);
                // Invalidate any fades still in flight.
                st.run_id = st.run_id.wrapping_add(1);
                gtk::glib::Propagation::Proceed
            }
        });

        win.present();
        start_clock(&state);
    });

    app.run();
}

fn load_css() {
    let Some(display) = gtk::gdk::Display::default() else {
        return;
    };

    let provider = gtk::CssProvider::new();
    provider.load_from_data(APP_CSS);
    gtk::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}

fn build_board_view(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 0);
    root.set_hexpand(true);
    root.set_vexpand(true);
    root.add_css_class("game-root");

    let content = gtk::Box::new(gtk::Orientation::Vertical, 12);
    content.set_hexpand(true);
    content.set_vexpand(true);
    content.set_halign(gtk::Align::Fill);
    content.set_valign(gtk::Align::Fill);
    content.set_margin_top(CONTENT_MARGIN);
    content.set_margin_bottom(CONTENT_MARGIN);
    content.set_margin_start(CONTENT_MARGIN);
    content.set_margin_end(CONTENT_MARGIN);

    let board_grid = build_board_grid(state);

    let board_card = gtk::Box::new(gtk::Orientation::Vertical, 0);
    board_card.set_halign(gtk::Align::Fill);
    board_card.set_valign(gtk::Align::Fill);
    board_card.set_hexpand(true);
    board_card.set_vexpand(true);
    board_card.add_css_class("blocks-card-container");

    let (grid_cols, grid_rows) = {
        let st = state.borrow();
        let spec = st.sequencer.spec();
        (spec.cols as f32, spec.rows as f32)
    };
    let grid_ratio = if grid_rows > 0.0 {
        grid_cols / grid_rows
    } else {
        1.0
    };
    let grid_frame = gtk::AspectFrame::new(0.5, 0.5, grid_ratio, false);
    grid_frame.set_halign(gtk::Align::Fill);
    grid_frame.set_valign(gtk::Align::Fill);
    grid_frame.set_hexpand(true);
    grid_frame.set_vexpand(true);
    grid_frame.set_child(Some(&board_grid));
    board_card.append(&grid_frame);

    content.append(&board_card);
    root.append(&content);

    root
}
