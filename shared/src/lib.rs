pub mod models;
pub mod reports;
pub mod utils;

// Models and view structs shared between the engine and whatever renders its
// output. Formatting helpers live in `utils::brazilian_format`.
