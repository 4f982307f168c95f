pub mod line_string;
pub mod resilience;
