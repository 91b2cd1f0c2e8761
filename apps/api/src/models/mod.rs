pub mod cv;
pub mod feedback;
pub mod user;
