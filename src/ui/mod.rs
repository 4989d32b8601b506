mod renderer;
mod state;
pub mod theme;

pub use renderer::render;
pub use state::{AppState, ConfirmAction, Modal, PageNav, Tab};
pub use theme::Theme;
