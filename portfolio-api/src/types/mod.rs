//! Models exchanged with the portfolio backend.
//!
//! Timestamps are naive UTC, the way the backend serializes them.

pub mod blog;
pub mod contact;
pub mod forum;
pub mod portfolio;
pub mod project;
pub mod service;
pub mod user;

pub use blog::{Post, PostCreate, PostList, PostQuery, PostUpdate};
pub use contact::ContactMessage;
pub use forum::{Comment, CommentCreate, Topic, TopicCreate, TopicList};
pub use portfolio::{Portfolio, PortfolioCreate, PortfolioUpdate};
pub use project::{Project, ProjectCreate, ProjectUpdate};
pub use service::{
    Inquiry, InquiryCreate, InquiryStatus, InquiryUpdate, Order, OrderCreate, OrderStatus,
    OrderUpdate, PriceType, Service, ServiceCreate, ServiceUpdate,
};
pub use user::{Role, User, UserStats, UserUpdate};
