pub mod attendance;
pub mod hierarchy;
pub mod holiday;
pub mod leave;
pub mod scope;
