pub mod cookies;
pub mod loaders;
pub mod tally;

pub use cookies::CookieRecord;
pub use loaders::load_cookie_file;
pub use tally::RunTally;
