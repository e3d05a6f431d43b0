pub mod atomic;
pub mod psql;
