// Stores layer - Data access, one store per aggregate
//
// Every method takes the connection it runs on so coordinators can put
// several store calls in one transaction.
pub mod category_store;
pub mod comment_store;
pub mod credential_store;
pub mod ticket_store;
pub mod user_store;

pub use category_store::CategoryStore;
pub use comment_store::CommentStore;
pub use credential_store::CredentialStore;
pub use ticket_store::TicketStore;
pub use user_store::UserStore;
