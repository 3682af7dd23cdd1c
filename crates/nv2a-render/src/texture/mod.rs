//! Texture objects: layout planning, storage updates, and the handle store.

mod layout;
mod lock;
mod object;
mod store;

pub use layout::TextureLayout;
pub use lock::TextureLock;
pub use object::{AddressMode, ScaleMode, Texture, TextureAccess, TextureId, TextureInfo};
pub use store::TextureStore;
