pub mod activation;
pub mod content;
pub mod draft;
pub mod session;
pub mod slug;
pub mod trainer;
pub mod webhook;
