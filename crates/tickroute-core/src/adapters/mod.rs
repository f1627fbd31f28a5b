mod ashare;
mod function;
mod gateway;
mod timeout;
mod unconfigured;

pub use ashare::{AShareCombinedProvider, ASHARE_FUNDAMENTALS_HEADING, ASHARE_PRICE_HEADING};
pub use function::{FnNewsFeed, FnProvider};
pub use gateway::{GatewayNewsFeed, GatewayProvider};
pub use timeout::TimeoutProvider;
pub use unconfigured::{UnconfiguredNewsFeed, UnconfiguredProvider};
