pub mod history;
pub mod list;
pub mod paths;

pub use history::*;
pub use list::*;
pub use paths::*;
