pub mod auth;
pub mod cart;
pub mod catalog;
pub mod courier;
pub mod orders;
pub mod users;
