mod directory;
mod key_value_store;
mod session;
mod work_items;

pub use directory::*;
pub use key_value_store::*;
pub use session::*;
pub use work_items::*;
