mod inspect;
mod simulate;

pub use inspect::Inspect;
pub use simulate::Simulate;
