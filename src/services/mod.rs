// Services layer - Pure rules and cryptographic helpers
pub mod access_control;
pub mod crypto;
pub mod ticket_lifecycle;
pub mod token_service;
pub mod validation;

pub use access_control::TicketScope;
pub use token_service::TokenService;
