//! External collaborators: price history, live quotes, report delivery.

pub mod coinmarketcap;
pub mod error;
pub mod market_data;
pub mod memory;
pub mod notifier;
pub mod symbols;
pub mod yahoo;

pub use coinmarketcap::CoinMarketCapQuoteProvider;
pub use error::ProviderError;
pub use market_data::{LiveQuoteProvider, PriceHistoryProvider};
pub use memory::InMemoryMarketData;
pub use notifier::{LogSink, NotificationSink, WebhookSink};
pub use symbols::QuoteSymbolMap;
pub use yahoo::YahooHistoryProvider;
