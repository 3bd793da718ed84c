pub mod editor;
pub mod filter_bar;
pub mod highlight;
pub mod layout;
pub mod request_list;
pub mod response;
pub mod status_bar;
