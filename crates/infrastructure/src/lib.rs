//! gnocco infrastructure: cache storage, wire codec, transports and the
//! stub and iterative resolution engines.
pub mod dns;
pub mod system;
