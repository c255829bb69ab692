// Domain layer - Core types, rules and failure taxonomy

pub mod errors;
pub mod model;
pub mod rules;
