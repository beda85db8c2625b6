pub mod connections;
pub mod descriptor;
pub mod schema;
