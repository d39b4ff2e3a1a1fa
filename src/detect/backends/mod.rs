pub mod mock;

pub use mock::MockSource;
