pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;

pub mod cache;
pub mod mock;

pub use cache::UserCache;
pub use mock::{MockUserCache, MockUserRepository};
pub use r#trait::UserRepository;
