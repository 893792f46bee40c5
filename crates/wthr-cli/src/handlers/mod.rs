pub mod configure;
pub mod weather;
