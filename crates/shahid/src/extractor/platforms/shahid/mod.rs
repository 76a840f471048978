mod api;
mod auth;
mod builder;
pub(crate) mod models;
mod show;

pub use api::{ShahidApi, ShahidEndpoints, ShahidOptions};
pub use auth::Credentials;
pub use builder::{ItemType, Shahid, URL_REGEX};
pub use show::{PAGE_SIZE, SHOW_URL_REGEX, ShahidShow};
