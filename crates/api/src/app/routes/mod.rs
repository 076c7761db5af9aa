pub mod identify;
pub mod system;
