// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod http_response;
pub mod labels;
pub mod mime;
pub mod report_api;
pub mod resnet;
pub mod upload_dump;
