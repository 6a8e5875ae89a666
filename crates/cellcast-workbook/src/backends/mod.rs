#[cfg(feature = "calamine")]
pub mod calamine;
pub mod json;

#[cfg(feature = "calamine")]
pub use calamine::CalamineAdapter;
pub use json::JsonAdapter;
