mod directory;
mod session;
mod work_items;

pub use directory::{DirectoryService, UNKNOWN_CLIENT};
pub use session::SessionService;
pub use work_items::{WorkItemService, WorkItemView, UNKNOWN_PARENT};
