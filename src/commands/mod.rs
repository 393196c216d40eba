pub mod clear;
pub mod ls;
pub mod rm;
pub mod show;
