// Domain layer - Plain records shared by every use case
pub mod dashboard;
pub mod photo;
pub mod property;
pub mod report;
