pub mod filter;
pub mod playground;
pub mod snow_dome;
pub mod solar;
