pub mod app_state;
pub mod captured;
pub mod editor;
pub mod focus;
pub mod mode;
pub mod response_state;
