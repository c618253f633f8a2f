pub mod chromium;
pub mod driver;

pub use chromium::ChromiumDriver;
pub use driver::{SessionIdentity, UiDriver, UiPage, UiSession, WaitUntil};
