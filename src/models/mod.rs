pub mod feed;
pub mod user;
