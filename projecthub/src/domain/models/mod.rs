mod client;
mod contractor;
mod ids;
mod work_item;

pub use client::*;
pub use contractor::*;
pub use ids::*;
pub use work_item::*;
