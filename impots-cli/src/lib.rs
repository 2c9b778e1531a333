pub mod app;
pub mod csv_loader;
pub mod logging;
pub mod report;
