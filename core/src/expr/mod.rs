mod expr_impl;

pub use expr_impl::*;
