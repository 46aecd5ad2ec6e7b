pub mod comments;
pub mod model;
pub mod ratings;
