pub mod docs;
pub mod items;
pub mod system;
