pub mod model;
pub mod publisher;

pub use model::ReportModel;
pub use publisher::ReportPublisher;
