pub mod debug;
pub mod manager;
pub mod opendmx;
pub mod threaded_device;
