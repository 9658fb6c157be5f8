pub mod entities;
pub mod forms;
pub mod table;
pub mod use_cases;
