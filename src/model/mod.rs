pub mod coin;
pub mod price;
