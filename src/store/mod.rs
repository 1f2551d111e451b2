//! Conversation state persistence.

pub mod factory;
pub mod memory;
pub mod sqlite;
pub mod supabase;
pub mod traits;

pub use factory::create_store;
pub use memory::InMemoryStore;
pub use sqlite::SqliteConversationStore;
pub use supabase::SupabaseStore;
pub use traits::{ConversationStore, Feedback};
