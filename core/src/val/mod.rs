pub mod de;
pub mod methods;
mod values;


pub use values::*;
