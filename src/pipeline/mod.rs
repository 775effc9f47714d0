pub mod builder;
pub mod defaults;
pub mod resources;
pub mod runtime;
pub mod traits;
