pub mod constants;
pub mod decode_error;
pub mod page;
pub mod page_manager;
pub mod route;
pub mod sensor_detail;
pub mod sensor_list;

pub use decode_error::DecodeErrorPage;
pub use page::{Page, PageWrapper};
pub use page_manager::PageManager;
pub use route::{Route, RouteError};
pub use sensor_detail::{Lifecycle, SensorDetailPage};
pub use sensor_list::SensorListPage;
