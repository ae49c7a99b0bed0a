// Database entities - SeaORM models
pub mod category;
pub mod group;
pub mod refresh_token;
pub mod ticket;
pub mod ticket_comment;
pub mod user;
pub mod user_group;
