pub mod chat;
pub mod feed;
pub mod modals;
pub mod notifications;

pub use chat::ChatPanel;
pub use feed::FeedView;
pub use modals::ModalLayer;
pub use notifications::NotificationStack;
