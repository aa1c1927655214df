pub mod address;
pub mod fetch;
pub mod markdown;
pub mod office;
pub mod session;

pub use address::Address;
pub use fetch::{Fetcher, Page, SearchHit, SearchProvider};
pub use session::Browser;
