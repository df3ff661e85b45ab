pub mod history;
pub mod product;
pub mod queues;
