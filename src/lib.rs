pub mod bootstrap;
pub mod modules;
pub mod notify;
pub mod routers;
pub mod shared;
