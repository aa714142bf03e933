pub mod admin;
pub mod admin_contents;
pub mod auth;
pub mod content;
pub mod home;
pub mod social;

pub use admin::dashboard_handler;
pub use admin_contents::{
    content_delete_handler, content_edit_handler, content_new_handler, content_save_handler,
    contents_list_handler,
};
pub use auth::{login, login_form, logout};
pub use content::content_view_handler;
pub use home::home_handler;
pub use social::{social_callback, social_start};
