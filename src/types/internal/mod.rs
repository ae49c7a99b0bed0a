// Internal types - never exposed on the wire directly
pub mod auth;
pub mod context;
pub mod principal;
pub mod ticket;
pub mod user;

pub use context::{RequestContext, RequestId};
pub use principal::{Principal, Role};
pub use ticket::{
    CommentDetails, CommentDraft, DashboardSummary, TicketDetails, TicketDraft, TicketPatch,
    TicketPriority, TicketStatus,
};
pub use user::{UserDetails, UserDraft, UserPatch};
