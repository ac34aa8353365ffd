pub mod assessment;
pub mod chat;
pub mod contact;
pub mod recommendation;
pub mod response;
pub mod session;
pub mod subscale;
pub mod user;
