pub mod article;
pub mod notification;
pub mod outbox;
pub mod ticket;
pub mod user;

pub use article::KbArticle;
pub use notification::AppNotification;
pub use outbox::OutboxMessage;
pub use ticket::{InternalNote, Priority, Status, Ticket, TicketMessage, TimelineEntry};
pub use user::{ParseEnumError, Role, User};
