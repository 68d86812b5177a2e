pub mod oauth;
pub mod twitter;
