pub mod contract;
pub mod post;
pub mod recommendation;
pub mod timefmt;
