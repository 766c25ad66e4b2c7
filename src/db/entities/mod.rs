pub mod images;
pub mod user_images;
pub mod users;
