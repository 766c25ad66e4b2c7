mod selector;
mod service;
pub mod taxonomy;

pub use selector::ImageSelector;
pub use service::WallpaperService;
pub use taxonomy::Selection;
