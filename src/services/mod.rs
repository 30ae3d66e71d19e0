//! External collaborators: universe and price providers.

pub mod csv_directory;
pub mod market_data;
pub mod universe;
pub mod yahoo;

pub use csv_directory::CsvDirectoryPriceProvider;
pub use market_data::{InMemoryPriceProvider, PriceProvider, StaticUniverse, UniverseProvider};
pub use universe::CsvUniverseProvider;
pub use yahoo::YahooPriceProvider;
