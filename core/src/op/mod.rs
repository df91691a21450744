mod ops;


pub use ops::*;
