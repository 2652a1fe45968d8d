pub mod integration;
pub mod report;
