pub mod historical;
pub mod mindicador;
pub mod mock;

pub use historical::HistoricalRequest;
pub use mindicador::MindicadorProvider;
pub use mock::MockRateProvider;
