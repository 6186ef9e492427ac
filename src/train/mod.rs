pub mod trainer;

pub use trainer::{predict, train_example, train_network};
