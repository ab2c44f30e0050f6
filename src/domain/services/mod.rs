mod checker;

pub use checker::Checker;
