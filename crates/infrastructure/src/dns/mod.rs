pub mod listener;
pub mod upstream;
