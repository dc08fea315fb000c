//! Loading and validation of draw configuration and rosters, plus file-backed
//! draw history.

pub mod history_file;
pub mod load;
pub mod schema;

pub use history_file::*;
pub use load::*;
pub use schema::*;
