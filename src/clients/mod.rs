pub mod http_fetcher;
pub mod mock;

pub use http_fetcher::{fetch_as, ApiRequest, JsonFetcher, ReqwestFetcher};
pub use mock::MockFetcher;
