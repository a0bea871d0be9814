pub mod enums;
pub mod snapshot;
