pub mod address;
pub mod asset_id;
pub mod price;
pub mod quantity;
pub mod side;

pub use address::Address;
pub use asset_id::AssetId;
pub use price::Price;
pub use quantity::Quantity;
pub use side::Side;

pub type OrderId = uuid::Uuid;
pub type TradeId = uuid::Uuid;
pub type Timestamp = chrono::DateTime<chrono::Utc>;
