pub mod me;
pub mod posts;
