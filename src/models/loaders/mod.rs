pub mod cookie_loader;

pub use cookie_loader::load_cookie_file;
