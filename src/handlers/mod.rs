pub mod db;
pub mod probe;
