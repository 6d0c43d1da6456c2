pub mod app;
mod animation;
mod board;
mod dialogs;
mod hud;
mod state;
