mod mapper;

pub use mapper::*;
